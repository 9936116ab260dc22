use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use log::warn;
use reqwest::Client;
use std::time::Duration as StdDuration;

use crate::models::{Candle, EngineError};

const STOOQ_DAILY_URL: &str = "https://stooq.com/q/d/l/";
const CONSTITUENTS_URL: &str =
    "https://datahub.io/core/s-and-p-500-companies/r/constituents.csv";
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Keyless daily-bar provider (Stooq CSV endpoint) plus the S&P 500
/// constituent list. One attempt per request; the core performs no
/// retries.
pub struct MarketDataClient {
    http: Client,
}

impl MarketDataClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("qrd-engine/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http })
    }

    /// Ordered S&P 500 symbols. The list may be stale; the core does
    /// not validate membership before fetching prices.
    pub async fn list_tickers(&self) -> Result<Vec<String>, EngineError> {
        let body = self.get_text(CONSTITUENTS_URL, "S&P 500 constituents").await?;
        let mut tickers = parse_constituents(&body);
        tickers.sort();
        tickers.dedup();
        Ok(tickers)
    }

    /// Daily bars from (today - lookback_days) through the most
    /// recent session, ascending by date.
    pub async fn load_prices(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<Vec<Candle>, EngineError> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(lookback_days as i64);
        let url = format!(
            "{}?s={}&d1={}&d2={}&i=d",
            STOOQ_DAILY_URL,
            stooq_symbol(ticker),
            start.format("%Y%m%d"),
            end.format("%Y%m%d"),
        );

        let body = self.get_text(&url, ticker).await?;
        let mut candles = parse_daily_csv(ticker, &body);
        if candles.is_empty() {
            return Err(EngineError::data_unavailable(
                ticker,
                "provider returned no price rows",
            ));
        }
        candles.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(candles)
    }

    async fn get_text(&self, url: &str, subject: &str) -> Result<String, EngineError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| EngineError::data_unavailable(subject, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::data_unavailable(
                subject,
                format!("provider responded with {status}"),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| EngineError::data_unavailable(subject, format!("invalid body: {e}")))
    }
}

/// Stooq keys US equities as lowercase `<symbol>.us`, with class
/// shares dashed (BRK.B -> brk-b.us).
fn stooq_symbol(ticker: &str) -> String {
    format!("{}.us", ticker.trim().to_lowercase().replace('.', "-"))
}

/// Parses the Stooq daily CSV (`Date,Open,High,Low,Close,Volume`).
/// Malformed rows are skipped with a warning; an error page like
/// "No data" yields an empty vector for the caller to reject.
fn parse_daily_csv(ticker: &str, body: &str) -> Vec<Candle> {
    let mut candles = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("Date") {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 5 {
            warn!("Skipping malformed price row for {}: {}", ticker, line);
            continue;
        }

        let parsed = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
            .ok()
            .and_then(|date| {
                Some(Candle {
                    ticker: ticker.to_uppercase(),
                    date,
                    open: fields[1].parse().ok()?,
                    high: fields[2].parse().ok()?,
                    low: fields[3].parse().ok()?,
                    close: fields[4].parse().ok()?,
                    volume: fields
                        .get(5)
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0.0),
                })
            });

        match parsed {
            Some(candle) => candles.push(candle),
            None => warn!("Skipping unparsable price row for {}: {}", ticker, line),
        }
    }
    candles
}

/// First column of the constituents CSV (`Symbol,Name,Sector`).
fn parse_constituents(body: &str) -> Vec<String> {
    body.lines()
        .skip(1)
        .filter_map(|line| {
            let symbol = line.split(',').next()?.trim();
            if symbol.is_empty() {
                None
            } else {
                Some(symbol.to_uppercase())
            }
        })
        .collect()
}
