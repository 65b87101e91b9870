//! CSV file data adapter.
//!
//! Serves close prices from `{dir}/{SYMBOL}_{timeframe}.csv` files with
//! `date,close` rows. Rows are sorted by date and the trailing `limit`
//! closes are returned; a file with fewer rows than requested is an error,
//! never a shorter series.

use crate::domain::error::RegimixError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use log::debug;
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, timeframe: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}_{timeframe}.csv"))
    }
}

impl DataPort for CsvDataAdapter {
    fn load(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<f64>, RegimixError> {
        let path = self.csv_path(symbol, timeframe);
        let content = fs::read_to_string(&path).map_err(|e| RegimixError::DataUnavailable {
            asset: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut rows: Vec<(NaiveDate, f64)> = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| RegimixError::DataUnavailable {
                asset: symbol.to_string(),
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(0).ok_or_else(|| RegimixError::DataUnavailable {
                asset: symbol.to_string(),
                reason: "missing date column".to_string(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                RegimixError::DataUnavailable {
                    asset: symbol.to_string(),
                    reason: format!("invalid date {date_str}: {e}"),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| RegimixError::DataUnavailable {
                    asset: symbol.to_string(),
                    reason: "missing close column".to_string(),
                })?
                .parse()
                .map_err(|e| RegimixError::DataUnavailable {
                    asset: symbol.to_string(),
                    reason: format!("invalid close value: {e}"),
                })?;

            rows.push((date, close));
        }

        if rows.len() < limit {
            return Err(RegimixError::InsufficientData {
                asset: symbol.to_string(),
                have: rows.len(),
                need: limit,
            });
        }

        rows.sort_by_key(|(date, _)| *date);
        debug!("loaded {} rows for {symbol} from {}", rows.len(), path.display());
        Ok(rows[rows.len() - limit..]
            .iter()
            .map(|(_, close)| *close)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        // deliberately out of order: adapter must sort by date
        let csv_content = "date,close\n\
            2024-01-17,115.0\n\
            2024-01-15,105.0\n\
            2024-01-16,110.0\n\
            2024-01-18,112.0\n";
        fs::write(path.join("BTC_1d.csv"), csv_content).unwrap();

        fs::write(path.join("ETH_1d.csv"), "date,close\n2024-01-15,40.0\n").unwrap();
        fs::write(path.join("BAD_1d.csv"), "date,close\n2024-01-15,abc\n").unwrap();

        (dir, path)
    }

    #[test]
    fn load_returns_trailing_closes_in_date_order() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let prices = adapter.load("BTC", "1d", 3).unwrap();
        assert_eq!(prices, vec![110.0, 115.0, 112.0]);
    }

    #[test]
    fn load_exact_length() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);
        assert_eq!(adapter.load("BTC", "1d", 4).unwrap().len(), 4);
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);
        assert!(matches!(
            adapter.load("XYZ", "1d", 2),
            Err(RegimixError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn short_file_is_insufficient_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);
        match adapter.load("ETH", "1d", 100) {
            Err(RegimixError::InsufficientData { have, need, .. }) => {
                assert_eq!(have, 1);
                assert_eq!(need, 100);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unparsable_close_is_rejected() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);
        assert!(adapter.load("BAD", "1d", 1).is_err());
    }

    #[test]
    fn timeframe_selects_the_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);
        // only the 1d file exists
        assert!(adapter.load("BTC", "4h", 2).is_err());
    }
}
