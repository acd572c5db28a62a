//! HTTP daily-close source.
//!
//! Fetches stooq-style CSV exports (`Date,Open,High,Low,Close,Volume`) over
//! a blocking client with a per-request timeout. Failures are per-symbol;
//! the engine skips the symbol and carries on.

use crate::domain::error::SwingbotError;
use crate::domain::price_series::PricePoint;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://stooq.com";

pub struct HttpPriceAdapter {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpPriceAdapter {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, SwingbotError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SwingbotError::PriceFetch {
                symbol: "*".into(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SwingbotError> {
        let endpoint = config
            .get_string("data", "endpoint")
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let timeout_secs = config.get_int("data", "timeout_secs", 20);
        Self::new(endpoint, Duration::from_secs(timeout_secs as u64))
    }

    fn download_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/q/d/l/?s={}&d1={}&d2={}&i=d",
            self.endpoint,
            symbol.to_lowercase(),
            start.format("%Y%m%d"),
            end.format("%Y%m%d"),
        )
    }
}

impl PricePort for HttpPriceAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, SwingbotError> {
        let url = self.download_url(symbol, start, end);
        let fetch_err = |reason: String| SwingbotError::PriceFetch {
            symbol: symbol.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| fetch_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }

        let body = response.text().map_err(|e| fetch_err(e.to_string()))?;
        parse_close_csv(&body).map_err(fetch_err)
    }
}

fn parse_close_csv(body: &str) -> Result<Vec<PricePoint>, String> {
    let mut rdr = csv::Reader::from_reader(body.as_bytes());

    let headers = rdr.headers().map_err(|e| e.to_string())?;
    let date_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("date"))
        .ok_or_else(|| format!("unexpected response: {}", body.lines().next().unwrap_or("")))?;
    let close_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("close"))
        .ok_or_else(|| "response has no Close column".to_string())?;

    let mut points = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| e.to_string())?;
        let date_str = record
            .get(date_idx)
            .ok_or_else(|| "short record".to_string())?;
        let close_str = record
            .get(close_idx)
            .ok_or_else(|| "short record".to_string())?;

        // Sources mark halted days with placeholder closes; skip them.
        let close: f64 = match close_str.parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| format!("invalid date {date_str}: {e}"))?;
        points.push(PricePoint { date, close });
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_standard_export() {
        let body = "Date,Open,High,Low,Close,Volume\n\
                    2024-01-15,99.0,101.0,98.0,100.5,12345\n\
                    2024-01-16,100.5,102.0,100.0,101.25,23456\n";
        let points = parse_close_csv(body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date(2024, 1, 15));
        assert_eq!(points[0].close, 100.5);
        assert_eq!(points[1].close, 101.25);
    }

    #[test]
    fn parse_sorts_by_date() {
        let body = "Date,Open,High,Low,Close,Volume\n\
                    2024-01-16,1,1,1,2.0,0\n\
                    2024-01-15,1,1,1,1.0,0\n";
        let points = parse_close_csv(body).unwrap();
        assert_eq!(points[0].date, date(2024, 1, 15));
    }

    #[test]
    fn parse_skips_placeholder_close() {
        let body = "Date,Open,High,Low,Close,Volume\n\
                    2024-01-15,1,1,1,N/D,0\n\
                    2024-01-16,1,1,1,2.0,0\n";
        let points = parse_close_csv(body).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 2.0);
    }

    #[test]
    fn parse_rejects_non_csv_body() {
        assert!(parse_close_csv("No data").is_err());
    }

    #[test]
    fn parse_empty_export_is_empty() {
        let points = parse_close_csv("Date,Open,High,Low,Close,Volume\n").unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn download_url_shape() {
        let adapter =
            HttpPriceAdapter::new("https://stooq.com".into(), Duration::from_secs(5)).unwrap();
        let url = adapter.download_url("AAPL", date(2024, 1, 1), date(2024, 6, 30));
        assert_eq!(
            url,
            "https://stooq.com/q/d/l/?s=aapl&d1=20240101&d2=20240630&i=d"
        );
    }
}
