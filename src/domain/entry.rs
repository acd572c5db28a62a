//! Entry selection: rank bullish, trend-confirmed candidates and take the
//! top K.

use crate::domain::error::SwingbotError;
use crate::domain::feature::FeatureRow;
use crate::domain::position::{round_cents, EntrySignal};
use crate::ports::model_port::{Signal, SignalModel};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct EntryPolicy {
    pub top_k: usize,
    pub stop_loss_pct: f64,
    pub target_pct: f64,
}

/// Pick up to `top_k` new entries from the universe.
///
/// A symbol is a candidate only when it is not in `held`, has both a current
/// price and a feature row this run, the model calls it bullish, and
/// `sma20 > sma50`. Candidates are ranked by latest close descending (symbol
/// name breaks exact price ties deterministically) and truncated to K.
/// Stop and target levels come from the fixed percentage policy, rounded to
/// 2 decimal places. Pure: persisting the result is the caller's job.
pub fn select_entries(
    universe: &[String],
    latest_features: &HashMap<String, FeatureRow>,
    latest_prices: &HashMap<String, f64>,
    held: &HashSet<String>,
    model: &dyn SignalModel,
    policy: &EntryPolicy,
) -> Result<Vec<EntrySignal>, SwingbotError> {
    let mut picks: Vec<(String, f64)> = Vec::new();

    for symbol in universe {
        if held.contains(symbol) {
            continue;
        }
        let Some(price) = latest_prices.get(symbol) else {
            continue;
        };
        let Some(row) = latest_features.get(symbol) else {
            continue;
        };
        if model.predict(row)? == Signal::Bullish && row.trend_ok() {
            picks.push((symbol.clone(), *price));
        }
    }

    picks.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    picks.truncate(policy.top_k);

    Ok(picks
        .into_iter()
        .map(|(stock, price)| EntrySignal {
            stock,
            buy: round_cents(price),
            stop_loss: round_cents(price * (1.0 - policy.stop_loss_pct)),
            target: round_cents(price * (1.0 + policy.target_pct)),
        })
        .collect())
}
