//! Exit evaluation for open positions.
//!
//! Rules are checked in a fixed priority order and the first match wins, so
//! each position emits at most one exit per run:
//! stop-loss, then target, then trend/model reversal.

use crate::domain::error::SwingbotError;
use crate::domain::feature::FeatureRow;
use crate::domain::position::{ExitEvent, ExitReason, Position};
use crate::ports::model_port::{Signal, SignalModel};
use std::collections::HashMap;

/// Evaluate every open position against the latest observations.
///
/// A position with no current price this run is left open unconditionally: a
/// missing observation is never an exit trigger. Model errors propagate and
/// abort the run before any ledger mutation.
pub fn evaluate_exits(
    positions: &[Position],
    latest_prices: &HashMap<String, f64>,
    latest_features: &HashMap<String, FeatureRow>,
    model: &dyn SignalModel,
) -> Result<Vec<ExitEvent>, SwingbotError> {
    let mut events = Vec::new();

    for pos in positions {
        let Some(&price) = latest_prices.get(&pos.stock) else {
            continue;
        };

        if pos.hit_stop_loss(price) {
            events.push(ExitEvent {
                stock: pos.stock.clone(),
                exit_price: price,
                reason: ExitReason::StopLoss,
            });
            continue;
        }

        if pos.hit_target(price) {
            events.push(ExitEvent {
                stock: pos.stock.clone(),
                exit_price: price,
                reason: ExitReason::Target,
            });
            continue;
        }

        let Some(row) = latest_features.get(&pos.stock) else {
            continue;
        };
        if !row.trend_ok() || model.predict(row)? != Signal::Bullish {
            events.push(ExitEvent {
                stock: pos.stock.clone(),
                exit_price: price,
                reason: ExitReason::Reversal,
            });
        }
    }

    Ok(events)
}
