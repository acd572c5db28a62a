//! Open positions and exit events.

use chrono::NaiveDate;
use std::fmt;

/// An open swing position. Immutable while held: created by the entry
/// selector, removed by the exit evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub stock: String,
    pub buy: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub entry: NaiveDate,
}

impl Position {
    pub fn hit_stop_loss(&self, price: f64) -> bool {
        price <= self.stop_loss
    }

    pub fn hit_target(&self, price: f64) -> bool {
        price >= self.target
    }
}

/// A candidate entry before it is stamped with an entry date and added to
/// the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySignal {
    pub stock: String,
    pub buy: f64,
    pub stop_loss: f64,
    pub target: f64,
}

impl EntrySignal {
    pub fn into_position(self, entry: NaiveDate) -> Position {
        Position {
            stock: self.stock,
            buy: self.buy,
            stop_loss: self.stop_loss,
            target: self.target,
            entry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    Target,
    Reversal,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "STOPLOSS"),
            ExitReason::Target => write!(f, "TARGET"),
            ExitReason::Reversal => write!(f, "REVERSAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExitEvent {
    pub stock: String,
    pub exit_price: f64,
    pub reason: ExitReason,
}

/// Round to currency precision (2 decimal places).
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_position() -> Position {
        Position {
            stock: "BHP".into(),
            buy: 50.0,
            stop_loss: 48.5,
            target: 52.5,
            entry: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn stop_loss_inclusive_at_level() {
        let pos = sample_position();
        assert!(pos.hit_stop_loss(48.5));
        assert!(pos.hit_stop_loss(48.0));
        assert!(!pos.hit_stop_loss(48.6));
    }

    #[test]
    fn target_inclusive_at_level() {
        let pos = sample_position();
        assert!(pos.hit_target(52.5));
        assert!(pos.hit_target(53.0));
        assert!(!pos.hit_target(52.4));
    }

    #[test]
    fn entry_signal_stamps_date() {
        let signal = EntrySignal {
            stock: "CBA".into(),
            buy: 100.0,
            stop_loss: 97.0,
            target: 105.0,
        };
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let pos = signal.into_position(date);
        assert_eq!(pos.stock, "CBA");
        assert_eq!(pos.entry, date);
    }

    #[test]
    fn exit_reason_display() {
        assert_eq!(ExitReason::StopLoss.to_string(), "STOPLOSS");
        assert_eq!(ExitReason::Target.to_string(), "TARGET");
        assert_eq!(ExitReason::Reversal.to_string(), "REVERSAL");
    }

    #[test]
    fn round_cents_half_up_magnitude() {
        assert_eq!(round_cents(97.004), 97.0);
        assert_eq!(round_cents(97.006), 97.01);
        assert_eq!(round_cents(105.0), 105.0);
    }

    #[test]
    fn round_cents_policy_levels() {
        assert_eq!(round_cents(100.0 * (1.0 - 0.03)), 97.0);
        assert_eq!(round_cents(100.0 * (1.0 + 0.05)), 105.0);
    }
}
