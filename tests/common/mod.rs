//! Shared fixtures for integration tests: mock ports and series builders.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use swingbot::domain::error::SwingbotError;
use swingbot::domain::feature::FeatureRow;
use swingbot::domain::ledger::Ledger;
use swingbot::domain::position::Position;
use swingbot::domain::price_series::PricePoint;
use swingbot::ports::model_port::{Signal, SignalModel};
use swingbot::ports::price_port::PricePort;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `days` consecutive dates from 2024-06-01, climbing by 1.0 to `end_close`.
pub fn rising_series(days: u32, end_close: f64) -> Vec<PricePoint> {
    let start = date(2024, 6, 1);
    (0..days)
        .map(|i| {
            PricePoint::new(
                start + chrono::Days::new(i as u64),
                end_close - (days - 1 - i) as f64,
            )
        })
        .collect()
}

/// `days` consecutive dates from 2024-06-01 at a constant close (flat trend,
/// sma20 == sma50).
pub fn flat_series(days: u32, close: f64) -> Vec<PricePoint> {
    let start = date(2024, 6, 1);
    (0..days)
        .map(|i| PricePoint::new(start + chrono::Days::new(i as u64), close))
        .collect()
}

pub fn open_position(stock: &str, buy: f64, stop_loss: f64, target: f64) -> Position {
    Position {
        stock: stock.into(),
        buy,
        stop_loss,
        target,
        entry: date(2024, 6, 1),
    }
}

pub fn ledger_of(positions: Vec<Position>) -> Ledger {
    Ledger::from_positions(positions)
}

#[derive(Default)]
pub struct MockPricePort {
    series: HashMap<String, Vec<PricePoint>>,
    failing: HashSet<String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.series.insert(symbol.to_string(), points);
        self
    }

    pub fn with_failure(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_closes(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<PricePoint>, SwingbotError> {
        if self.failing.contains(symbol) {
            return Err(SwingbotError::PriceFetch {
                symbol: symbol.to_string(),
                reason: "simulated outage".into(),
            });
        }
        Ok(self.series.get(symbol).cloned().unwrap_or_default())
    }
}

/// Bullish whenever the latest close is at or above the threshold. Lets a
/// test pick per-symbol signals through the prices it feeds in.
pub struct ThresholdModel {
    pub bullish_at_or_above: f64,
}

impl ThresholdModel {
    pub fn always_bullish() -> Self {
        ThresholdModel {
            bullish_at_or_above: f64::MIN,
        }
    }

    pub fn never_bullish() -> Self {
        ThresholdModel {
            bullish_at_or_above: f64::MAX,
        }
    }
}

impl SignalModel for ThresholdModel {
    fn predict(&self, features: &FeatureRow) -> Result<Signal, SwingbotError> {
        if features.close >= self.bullish_at_or_above {
            Ok(Signal::Bullish)
        } else {
            Ok(Signal::NotBullish)
        }
    }
}

/// A model whose every prediction fails, standing in for a shape mismatch.
pub struct BrokenModel;

impl SignalModel for BrokenModel {
    fn predict(&self, _features: &FeatureRow) -> Result<Signal, SwingbotError> {
        Err(SwingbotError::FeatureShape {
            reason: "model expects unknown feature 'macd'".into(),
        })
    }
}
