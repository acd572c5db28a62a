//! CSV persistence for the open-position ledger.
//!
//! Columns: `Stock,Buy,SL,Target,Entry`. Loaded once at run start and fully
//! rewritten at the end; a missing or unparsable file is recovered as an
//! empty ledger with a warning, never a fatal error.

use crate::domain::error::SwingbotError;
use crate::domain::ledger::Ledger;
use crate::domain::position::Position;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvLedgerAdapter {
    path: PathBuf,
}

impl CsvLedgerAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger, substituting an empty one when the file is missing
    /// or corrupt.
    pub fn load(&self) -> Ledger {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => {
                eprintln!(
                    "Warning: no ledger at {}, starting empty",
                    self.path.display()
                );
                return Ledger::new();
            }
        };

        match parse_ledger(&content) {
            Ok(ledger) => ledger,
            Err(e) => {
                eprintln!(
                    "Warning: unreadable ledger at {} ({}), starting empty",
                    self.path.display(),
                    e
                );
                Ledger::new()
            }
        }
    }

    /// Rewrite the ledger file in full.
    pub fn save(&self, ledger: &Ledger) -> Result<(), SwingbotError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["Stock", "Buy", "SL", "Target", "Entry"])
            .map_err(|e| SwingbotError::Ledger {
                reason: format!("CSV write error: {e}"),
            })?;

        for pos in ledger.positions() {
            wtr.write_record([
                pos.stock.as_str(),
                &format!("{:.2}", pos.buy),
                &format!("{:.2}", pos.stop_loss),
                &format!("{:.2}", pos.target),
                &pos.entry.format("%Y-%m-%d").to_string(),
            ])
            .map_err(|e| SwingbotError::Ledger {
                reason: format!("CSV write error: {e}"),
            })?;
        }

        let bytes = wtr.into_inner().map_err(|e| SwingbotError::Ledger {
            reason: format!("CSV write error: {e}"),
        })?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

fn parse_ledger(content: &str) -> Result<Ledger, String> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut positions = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| e.to_string())?;
        let field = |i: usize, name: &str| -> Result<&str, String> {
            record.get(i).ok_or_else(|| format!("missing {name} column"))
        };

        let stock = field(0, "Stock")?.to_string();
        let buy: f64 = field(1, "Buy")?
            .parse()
            .map_err(|e| format!("invalid Buy: {e}"))?;
        let stop_loss: f64 = field(2, "SL")?
            .parse()
            .map_err(|e| format!("invalid SL: {e}"))?;
        let target: f64 = field(3, "Target")?
            .parse()
            .map_err(|e| format!("invalid Target: {e}"))?;
        let entry = NaiveDate::parse_from_str(field(4, "Entry")?, "%Y-%m-%d")
            .map_err(|e| format!("invalid Entry: {e}"))?;

        positions.push(Position {
            stock,
            buy,
            stop_loss,
            target,
            entry,
        });
    }

    Ok(Ledger::from_positions(positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn ledger_path(dir: &TempDir) -> PathBuf {
        dir.path().join("open_positions.csv")
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvLedgerAdapter::new(ledger_path(&dir));
        assert!(adapter.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = ledger_path(&dir);
        fs::write(&path, "Stock,Buy,SL,Target,Entry\nAAPL,garbage,1,2,x\n").unwrap();
        let adapter = CsvLedgerAdapter::new(path);
        assert!(adapter.load().is_empty());
    }

    #[test]
    fn save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvLedgerAdapter::new(ledger_path(&dir));

        let ledger = Ledger::from_positions(vec![
            Position {
                stock: "AAPL".into(),
                buy: 100.0,
                stop_loss: 97.0,
                target: 105.0,
                entry: date(1),
            },
            Position {
                stock: "MSFT".into(),
                buy: 50.5,
                stop_loss: 48.99,
                target: 53.03,
                entry: date(2),
            },
        ]);

        adapter.save(&ledger).unwrap();
        let loaded = adapter.load();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.positions()[0].stock, "AAPL");
        assert_eq!(loaded.positions()[1].stop_loss, 48.99);
        assert_eq!(loaded.positions()[1].entry, date(2));
    }

    #[test]
    fn save_rewrites_in_full() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvLedgerAdapter::new(ledger_path(&dir));

        let first = Ledger::from_positions(vec![Position {
            stock: "OLD".into(),
            buy: 10.0,
            stop_loss: 9.7,
            target: 10.5,
            entry: date(1),
        }]);
        adapter.save(&first).unwrap();
        adapter.save(&Ledger::new()).unwrap();

        assert!(adapter.load().is_empty());
    }

    #[test]
    fn header_written_for_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let path = ledger_path(&dir);
        CsvLedgerAdapter::new(path.clone())
            .save(&Ledger::new())
            .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Stock,Buy,SL,Target,Entry"));
    }
}
