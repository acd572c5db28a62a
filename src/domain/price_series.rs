//! Close-price series handling: merging seed history with fresh downloads,
//! building the union trading calendar, and gap filling.
//!
//! Every series is aligned to the union calendar and forward-filled then
//! backward-filled, so a symbol with any observations has a value for every
//! calendar date.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PricePoint { date, close }
    }
}

/// Merge a seed series with freshly fetched points. On a date collision the
/// fetched value wins. Output is sorted by date with no duplicates.
pub fn merge_series(seed: &[PricePoint], fetched: &[PricePoint]) -> Vec<PricePoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for p in seed {
        by_date.insert(p.date, p.close);
    }
    for p in fetched {
        by_date.insert(p.date, p.close);
    }
    by_date
        .into_iter()
        .map(|(date, close)| PricePoint { date, close })
        .collect()
}

/// Sorted union of all dates across the given series.
pub fn union_calendar(series: &HashMap<String, Vec<PricePoint>>) -> Vec<NaiveDate> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for points in series.values() {
        for p in points {
            dates.insert(p.date);
        }
    }
    dates.into_iter().collect()
}

/// Align a series to a calendar, filling gaps forward then backward.
/// Returns `None` when the series has no observation on any calendar date.
pub fn align_and_fill(series: &[PricePoint], calendar: &[NaiveDate]) -> Option<Vec<f64>> {
    let by_date: BTreeMap<NaiveDate, f64> = series.iter().map(|p| (p.date, p.close)).collect();
    let raw: Vec<Option<f64>> = calendar.iter().map(|d| by_date.get(d).copied()).collect();
    fill_forward_backward(&raw)
}

/// Forward-fill then backward-fill a sparse column. Returns `None` when every
/// entry is missing.
pub fn fill_forward_backward(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let first_valid = values.iter().position(|v| v.is_some())?;
    let mut filled = Vec::with_capacity(values.len());
    let mut last = values[first_valid].unwrap();
    for v in values {
        if let Some(x) = v {
            last = *x;
        }
        filled.push(last);
    }
    // Leading gap: backward-fill from the first observation.
    for slot in filled.iter_mut().take(first_valid) {
        *slot = values[first_valid].unwrap();
    }
    Some(filled)
}
