// src/fetcher.rs
// Data source adapter for the XT public kline endpoint. Every failure mode
// (transport, timeout, HTTP status, API error code, malformed rows) collapses
// to an empty candle sequence; callers skip the symbol for this pass.

use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::ScannerConfig;
use crate::errors::FetchError;
use crate::types::CandleData;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize, Debug)]
struct KlineResponse {
    rc: i64,
    #[serde(default)]
    data: Option<Vec<Vec<Value>>>,
}

pub async fn fetch_klines(client: &Client, config: &ScannerConfig, symbol: &str) -> Vec<CandleData> {
    match fetch_klines_inner(client, config, symbol).await {
        Ok(candles) => {
            debug!("[Fetcher] {} returned {} candles", symbol, candles.len());
            candles
        }
        Err(e) => {
            warn!("[Fetcher] Fetch failed for {}: {}", symbol, e);
            Vec::new()
        }
    }
}

async fn fetch_klines_inner(
    client: &Client,
    config: &ScannerConfig,
    symbol: &str,
) -> Result<Vec<CandleData>, FetchError> {
    let limit = config.kline_limit.to_string();
    let response = client
        .get(&config.base_url)
        .query(&[
            ("symbol", symbol),
            ("interval", config.interval.as_str()),
            ("limit", limit.as_str()),
        ])
        .timeout(FETCH_TIMEOUT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let body: KlineResponse = response.json().await?;
    if body.rc != 0 {
        return Err(FetchError::ApiCode(body.rc));
    }

    let rows = body.data.unwrap_or_default();
    let mut candles = Vec::with_capacity(rows.len());
    for row in &rows {
        candles.push(parse_row(row)?);
    }
    Ok(candles)
}

/// One kline row is `[timestamp, open, high, low, close, volume]`; numeric
/// fields may arrive as JSON numbers or strings.
fn parse_row(row: &[Value]) -> Result<CandleData, FetchError> {
    if row.len() < 6 {
        return Err(FetchError::Malformed(format!(
            "expected 6 fields, got {}",
            row.len()
        )));
    }
    Ok(CandleData {
        timestamp: value_to_i64(&row[0])?,
        open: value_to_f64(&row[1])?,
        high: value_to_f64(&row[2])?,
        low: value_to_f64(&row[3])?,
        close: value_to_f64(&row[4])?,
        volume: value_to_f64(&row[5])?,
    })
}

fn value_to_f64(value: &Value) -> Result<f64, FetchError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| FetchError::Malformed(format!("non-finite number: {}", n))),
        Value::String(s) => s
            .parse()
            .map_err(|_| FetchError::Malformed(format!("unparseable number: {:?}", s))),
        other => Err(FetchError::Malformed(format!("unexpected value: {}", other))),
    }
}

fn value_to_i64(value: &Value) -> Result<i64, FetchError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| FetchError::Malformed(format!("non-integer timestamp: {}", n))),
        Value::String(s) => s
            .parse()
            .map_err(|_| FetchError::Malformed(format!("unparseable timestamp: {:?}", s))),
        other => Err(FetchError::Malformed(format!("unexpected timestamp: {}", other))),
    }
}
