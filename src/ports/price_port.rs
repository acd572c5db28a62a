//! Market data port trait.

use crate::domain::error::SwingbotError;
use crate::domain::price_series::PricePoint;
use chrono::NaiveDate;

/// Daily closing-price source. A failure is per-symbol: the caller skips the
/// symbol for this run rather than aborting the batch.
pub trait PricePort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, SwingbotError>;
}
