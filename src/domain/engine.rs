//! Daily run orchestration.
//!
//! One logical pass per trading day: fetch fresh closes, extend seed history,
//! build features, evaluate exits, select entries, and produce the next
//! ledger. Pure over its ports; persistence and notification happen in the
//! caller, and only after this function has fully succeeded.

use crate::domain::entry::{select_entries, EntryPolicy};
use crate::domain::error::SwingbotError;
use crate::domain::exit::evaluate_exits;
use crate::domain::feature::{build_features, FeatureRow};
use crate::domain::ledger::Ledger;
use crate::domain::position::{ExitEvent, Position};
use crate::domain::price_series::{align_and_fill, merge_series, union_calendar, PricePoint};
use crate::ports::model_port::SignalModel;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub policy: EntryPolicy,
    pub fetch_start: NaiveDate,
}

/// A symbol excluded from this run, with the reason it was skipped.
#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct DailyReport {
    /// Last date on the union calendar; entries are stamped with it.
    pub as_of: NaiveDate,
    pub entries: Vec<Position>,
    pub exits: Vec<ExitEvent>,
    pub ledger: Ledger,
    pub skipped: Vec<SkippedSymbol>,
}

/// Execute one daily decision pass.
///
/// A failed or empty fetch excludes that symbol's *current* price for this
/// run (its seed history still feeds the feature table) but never aborts the
/// batch. The run fails with [`SwingbotError::NoData`] only when no symbol
/// yielded any fresh prices, and with a model error only on a fatal
/// feature-shape mismatch; in both cases no ledger mutation has happened.
pub fn run_daily(
    universe: &[String],
    seed_history: &HashMap<String, Vec<PricePoint>>,
    price_port: &dyn PricePort,
    model: &dyn SignalModel,
    ledger: &Ledger,
    config: &RunConfig,
    today: NaiveDate,
) -> Result<DailyReport, SwingbotError> {
    let mut fetched: HashMap<String, Vec<PricePoint>> = HashMap::new();
    let mut skipped: Vec<SkippedSymbol> = Vec::new();

    for symbol in universe {
        match price_port.fetch_closes(symbol, config.fetch_start, today) {
            Ok(points) if !points.is_empty() => {
                fetched.insert(symbol.clone(), points);
            }
            Ok(_) => {
                eprintln!("Warning: skipping {symbol} (no prices returned)");
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: "no prices returned".into(),
                });
            }
            Err(e) => {
                eprintln!("Warning: skipping {symbol} ({e})");
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if fetched.is_empty() {
        return Err(SwingbotError::NoData);
    }

    // Union calendar over everything we know, seed history included, so
    // feature windows reach as far back as the data allows.
    let mut all_series: HashMap<String, Vec<PricePoint>> = HashMap::new();
    for symbol in universe {
        let seed = seed_history.get(symbol).map(Vec::as_slice).unwrap_or(&[]);
        let fresh = fetched.get(symbol).map(Vec::as_slice).unwrap_or(&[]);
        let merged = merge_series(seed, fresh);
        if !merged.is_empty() {
            all_series.insert(symbol.clone(), merged);
        }
    }

    let calendar = union_calendar(&all_series);
    let as_of = *calendar.last().ok_or(SwingbotError::NoData)?;

    let mut latest_prices: HashMap<String, f64> = HashMap::new();
    let mut latest_features: HashMap<String, FeatureRow> = HashMap::new();

    for (symbol, series) in &all_series {
        let Some(closes) = align_and_fill(series, &calendar) else {
            continue;
        };
        if let Some(row) = build_features(&closes).pop() {
            latest_features.insert(symbol.clone(), row);
        }
        // Only symbols with a fresh observation have a usable current price;
        // a stale seed value must not trigger entries or exits.
        if fetched.contains_key(symbol) {
            if let Some(&last) = closes.last() {
                latest_prices.insert(symbol.clone(), last);
            }
        }
    }

    let exits = evaluate_exits(ledger.positions(), &latest_prices, &latest_features, model)?;

    let exited: HashSet<&str> = exits.iter().map(|e| e.stock.as_str()).collect();
    let held_after: HashSet<String> = ledger
        .symbols()
        .into_iter()
        .filter(|s| !exited.contains(s.as_str()))
        .collect();

    let entry_signals = select_entries(
        universe,
        &latest_features,
        &latest_prices,
        &held_after,
        model,
        &config.policy,
    )?;

    let next_ledger = ledger.apply(&exits, entry_signals.clone(), as_of);
    let entries: Vec<Position> = entry_signals
        .into_iter()
        .map(|s| s.into_position(as_of))
        .collect();

    Ok(DailyReport {
        as_of,
        entries,
        exits,
        ledger: next_ledger,
        skipped,
    })
}
