//! Seed price-history adapter: one `SYMBOL.csv` per instrument with
//! `date,close` rows. This is the running history the feature builder
//! extends with freshly fetched closes each run.

use crate::domain::error::SwingbotError;
use crate::domain::price_series::PricePoint;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvHistoryAdapter {
    base_path: PathBuf,
}

impl CsvHistoryAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Path to a symbol's seed file. Symbols are reported uppercased, so on a
    /// case-sensitive filesystem the on-disk name may differ; fall back to a
    /// directory scan for a stem that matches ignoring case.
    fn csv_path(&self, symbol: &str) -> PathBuf {
        let exact = self.base_path.join(format!("{symbol}.csv"));
        if exact.exists() {
            return exact;
        }
        if let Ok(entries) = fs::read_dir(&self.base_path) {
            for entry in entries.flatten() {
                let name = entry.file_name();
                let name_str = name.to_string_lossy();
                if let Some(stem) = name_str.strip_suffix(".csv") {
                    if stem.eq_ignore_ascii_case(symbol) {
                        return entry.path();
                    }
                }
            }
        }
        exact
    }

    /// Symbols with a seed file, sorted. This defines the default universe.
    pub fn list_symbols(&self) -> Result<Vec<String>, SwingbotError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SwingbotError::History {
            reason: format!(
                "failed to read history directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SwingbotError::History {
                reason: format!("directory entry error: {e}"),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_uppercase());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    /// Load one symbol's seed series, sorted by date.
    pub fn load_series(&self, symbol: &str) -> Result<Vec<PricePoint>, SwingbotError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SwingbotError::History {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SwingbotError::History {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| SwingbotError::History {
                reason: format!("missing date column in {}", path.display()),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SwingbotError::History {
                    reason: format!("invalid date in {}: {}", path.display(), e),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| SwingbotError::History {
                    reason: format!("missing close column in {}", path.display()),
                })?
                .parse()
                .map_err(|e| SwingbotError::History {
                    reason: format!("invalid close value in {}: {}", path.display(), e),
                })?;

            points.push(PricePoint { date, close });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
