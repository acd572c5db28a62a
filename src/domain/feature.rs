//! Feature builder: one fixed-shape row per calendar date from a filled
//! close series.
//!
//! The classifier was trained on the columns in [`FEATURE_COLUMNS`], in that
//! order. Rows are assembled and consumed by field *name* so a reordering
//! here cannot silently shift values under the model; see
//! [`FeatureRow::get`].

use crate::domain::indicator::{pct_change, rolling_mean, rolling_std, rsi};
use crate::domain::price_series::fill_forward_backward;

/// Canonical feature order the pretrained classifier expects.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "close", "ret1", "ret5", "sma20", "sma50", "sma200", "rsi14", "atr",
];

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub close: f64,
    pub ret1: f64,
    pub ret5: f64,
    pub sma20: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub rsi14: f64,
    pub atr: f64,
}

impl FeatureRow {
    /// Look up a feature by column name. Unknown names return `None`, which
    /// the model adapter treats as a fatal shape mismatch.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "close" => Some(self.close),
            "ret1" => Some(self.ret1),
            "ret5" => Some(self.ret5),
            "sma20" => Some(self.sma20),
            "sma50" => Some(self.sma50),
            "sma200" => Some(self.sma200),
            "rsi14" => Some(self.rsi14),
            "atr" => Some(self.atr),
            _ => None,
        }
    }

    /// Whether the faster average sits above the slower one.
    pub fn trend_ok(&self) -> bool {
        self.sma20 > self.sma50
    }
}

/// Build one feature row per date from a gap-filled close series.
///
/// Window-short entries in each derived column are resolved by forward-then-
/// backward fill, so every returned row is fully populated. Empty input
/// yields an empty table.
pub fn build_features(closes: &[f64]) -> Vec<FeatureRow> {
    if closes.is_empty() {
        return Vec::new();
    }

    let ret1 = pct_change(closes, 1);
    let ret5 = pct_change(closes, 5);
    let sma20 = rolling_mean(closes, 20);
    let sma50 = rolling_mean(closes, 50);
    let sma200 = rolling_mean(closes, 200);
    let rsi14 = rsi(closes, 14);
    let atr = rolling_std(&ret1, 14);

    let fill = |col: Vec<Option<f64>>| -> Vec<f64> {
        // A one-point series has no defined change; fall back to zero rather
        // than leave the column undefined.
        fill_forward_backward(&col).unwrap_or_else(|| vec![0.0; closes.len()])
    };

    let ret1 = fill(ret1);
    let ret5 = fill(ret5);
    let sma20 = fill(sma20);
    let sma50 = fill(sma50);
    let sma200 = fill(sma200);
    let rsi14 = fill(rsi14);
    let atr = fill(atr);

    (0..closes.len())
        .map(|i| FeatureRow {
            close: closes[i],
            ret1: ret1[i],
            ret5: ret5[i],
            sma20: sma20[i],
            sma50: sma50[i],
            sma200: sma200[i],
            rsi14: rsi14[i],
            atr: atr[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_input_empty_table() {
        assert!(build_features(&[]).is_empty());
    }

    #[test]
    fn one_row_per_date() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert_eq!(build_features(&closes).len(), 30);
    }

    #[test]
    fn short_series_rows_fully_populated() {
        // Shorter than every window: warmup gaps must still be filled.
        let rows = build_features(&[100.0, 101.0, 99.0]);
        for row in &rows {
            for name in FEATURE_COLUMNS {
                assert!(
                    row.get(name).unwrap().is_finite(),
                    "{name} not populated"
                );
            }
        }
    }

    #[test]
    fn single_point_series_defaults_returns_to_zero() {
        let rows = build_features(&[42.0]);
        assert_eq!(rows.len(), 1);
        assert_relative_eq!(rows[0].ret1, 0.0);
        assert_relative_eq!(rows[0].close, 42.0);
    }

    #[test]
    fn sma_matches_trailing_mean() {
        let closes: Vec<f64> = (1..=60).map(|i| i as f64).collect();
        let rows = build_features(&closes);
        // sma20 at the last bar: mean of 41..=60 = 50.5
        assert_relative_eq!(rows[59].sma20, 50.5, epsilon = 1e-9);
        // sma50 at the last bar: mean of 11..=60 = 35.5
        assert_relative_eq!(rows[59].sma50, 35.5, epsilon = 1e-9);
    }

    #[test]
    fn warmup_backfilled_from_first_valid() {
        let closes: Vec<f64> = (1..=25).map(|i| i as f64).collect();
        let rows = build_features(&closes);
        // First valid sma20 is at index 19; earlier rows carry that value.
        assert_relative_eq!(rows[0].sma20, rows[19].sma20, epsilon = 1e-12);
    }

    #[test]
    fn deterministic_for_equal_input() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + ((i * 13) % 17) as f64).collect();
        assert_eq!(build_features(&closes), build_features(&closes));
    }

    #[test]
    fn get_rejects_unknown_column() {
        let rows = build_features(&[1.0, 2.0]);
        assert!(rows[0].get("volume").is_none());
    }

    #[test]
    fn trend_ok_compares_averages() {
        let row = FeatureRow {
            close: 100.0,
            ret1: 0.0,
            ret5: 0.0,
            sma20: 101.0,
            sma50: 99.0,
            sma200: 95.0,
            rsi14: 55.0,
            atr: 0.01,
        };
        assert!(row.trend_ok());
        let row = FeatureRow { sma20: 99.0, sma50: 99.0, ..row };
        assert!(!row.trend_ok());
    }
}
