//! The open-position ledger: the only state carried across runs.

use crate::domain::position::{EntrySignal, ExitEvent, Position};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Ordered set of open positions, at most one per symbol. Order is
/// preserved across load/apply/save so the persisted file stays stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    positions: Vec<Position>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn from_positions(positions: Vec<Position>) -> Self {
        let mut ledger = Ledger::new();
        for pos in positions {
            if !ledger.holds(&pos.stock) {
                ledger.positions.push(pos);
            }
        }
        ledger
    }

    pub fn holds(&self, stock: &str) -> bool {
        self.positions.iter().any(|p| p.stock == stock)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Symbols currently held.
    pub fn symbols(&self) -> HashSet<String> {
        self.positions.iter().map(|p| p.stock.clone()).collect()
    }

    /// Produce the next ledger: drop every exited symbol, then append the new
    /// entries stamped with `entry_date`.
    ///
    /// Duplicate exit events for one symbol are a no-op after the first
    /// removal. An entry for a symbol still present is skipped, so the result
    /// can never hold two positions for the same instrument.
    pub fn apply(
        &self,
        exits: &[ExitEvent],
        entries: Vec<EntrySignal>,
        entry_date: NaiveDate,
    ) -> Ledger {
        let exited: HashSet<&str> = exits.iter().map(|e| e.stock.as_str()).collect();

        let mut next: Vec<Position> = self
            .positions
            .iter()
            .filter(|p| !exited.contains(p.stock.as_str()))
            .cloned()
            .collect();

        for signal in entries {
            if next.iter().any(|p| p.stock == signal.stock) {
                continue;
            }
            next.push(signal.into_position(entry_date));
        }

        Ledger { positions: next }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::ExitReason;
    use proptest::prelude::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn position(stock: &str) -> Position {
        Position {
            stock: stock.into(),
            buy: 100.0,
            stop_loss: 97.0,
            target: 105.0,
            entry: date(1),
        }
    }

    fn entry(stock: &str) -> EntrySignal {
        EntrySignal {
            stock: stock.into(),
            buy: 100.0,
            stop_loss: 97.0,
            target: 105.0,
        }
    }

    fn exit_event(stock: &str) -> ExitEvent {
        ExitEvent {
            stock: stock.into(),
            exit_price: 96.0,
            reason: ExitReason::StopLoss,
        }
    }

    #[test]
    fn apply_removes_exited_and_appends_entries() {
        let ledger = Ledger::from_positions(vec![position("A"), position("B")]);
        let next = ledger.apply(&[exit_event("A")], vec![entry("C")], date(5));

        assert_eq!(next.len(), 2);
        assert!(!next.holds("A"));
        assert!(next.holds("B"));
        assert!(next.holds("C"));
        assert_eq!(next.positions()[1].entry, date(5));
    }

    #[test]
    fn duplicate_exit_events_are_noop() {
        let ledger = Ledger::from_positions(vec![position("A")]);
        let next = ledger.apply(&[exit_event("A"), exit_event("A")], vec![], date(5));
        assert!(next.is_empty());
    }

    #[test]
    fn exit_for_unknown_symbol_is_noop() {
        let ledger = Ledger::from_positions(vec![position("A")]);
        let next = ledger.apply(&[exit_event("Z")], vec![], date(5));
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn entry_for_held_symbol_skipped() {
        let ledger = Ledger::from_positions(vec![position("A")]);
        let next = ledger.apply(&[], vec![entry("A")], date(5));

        assert_eq!(next.len(), 1);
        // The original position survives untouched.
        assert_eq!(next.positions()[0].entry, date(1));
    }

    #[test]
    fn exit_then_reentry_same_run() {
        let ledger = Ledger::from_positions(vec![position("A")]);
        let next = ledger.apply(&[exit_event("A")], vec![entry("A")], date(5));

        assert_eq!(next.len(), 1);
        assert_eq!(next.positions()[0].entry, date(5));
    }

    #[test]
    fn from_positions_dedupes() {
        let ledger = Ledger::from_positions(vec![position("A"), position("A")]);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn preserves_insertion_order() {
        let ledger = Ledger::from_positions(vec![position("B"), position("A")]);
        let next = ledger.apply(&[], vec![entry("C")], date(5));
        let order: Vec<&str> = next.positions().iter().map(|p| p.stock.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    proptest! {
        /// |new| = |old| - |exits ∩ old| + |fresh entries|, and no symbol
        /// appears twice afterwards.
        #[test]
        fn conservation(
            held in proptest::collection::btree_set("[A-E]", 0..5),
            exited in proptest::collection::btree_set("[A-E]", 0..5),
            entered in proptest::collection::btree_set("[F-J]", 0..5),
        ) {
            let ledger = Ledger::from_positions(
                held.iter().map(|s| position(s)).collect(),
            );
            let exits: Vec<ExitEvent> = exited.iter().map(|s| exit_event(s)).collect();
            let entries: Vec<EntrySignal> = entered.iter().map(|s| entry(s)).collect();

            let next = ledger.apply(&exits, entries, date(5));

            let removed = held.intersection(&exited).count();
            prop_assert_eq!(next.len(), held.len() - removed + entered.len());

            let mut seen = HashSet::new();
            for p in next.positions() {
                prop_assert!(seen.insert(p.stock.clone()), "duplicate {}", p.stock);
            }
        }
    }
}
