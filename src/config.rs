// src/config.rs
// Scanner configuration, built once from the environment and passed into the
// pipeline rather than read ad hoc.

use std::env;

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub symbols: Vec<String>,
    pub base_url: String,
    pub interval: String,
    pub kline_limit: u32,
    pub webhook_url: Option<String>,
    pub state_file: String,
}

impl ScannerConfig {
    pub fn from_env() -> Self {
        let symbols: Vec<String> = env::var("SYMBOLS")
            .unwrap_or_else(|_| "BTC_USDT,ETH_USDT,SOL_USDT,BNB_USDT".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            symbols,
            base_url: env::var("KLINE_BASE_URL")
                .unwrap_or_else(|_| "https://sapi.xt.com/v4/public/kline".to_string()),
            interval: env::var("KLINE_INTERVAL").unwrap_or_else(|_| "5min".to_string()),
            kline_limit: env::var("KLINE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            webhook_url: env::var("DISCORD_WEBHOOK").ok().filter(|v| !v.is_empty()),
            state_file: env::var("SIGNAL_STATE_FILE")
                .unwrap_or_else(|_| "last_signal.json".to_string()),
        }
    }
}
