// src/history.rs
// Durable per-symbol record of the last alerted candle, used to suppress
// duplicate alerts across process invocations.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::types::Direction;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LastSignal {
    pub timestamp: String,
    pub direction: String,
}

/// Map of symbol -> last alerted signal, persisted as a flat JSON object.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SignalHistory {
    #[serde(flatten)]
    entries: HashMap<String, LastSignal>,
}

impl SignalHistory {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Loads history from file. A missing or corrupt file degrades to an
    /// empty history (no dedup context) rather than failing the pass.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("[History] No state file at {:?}, starting empty", path);
            return Self::new();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("[History] Failed to read {:?}: {}, starting empty", path, e);
                return Self::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(history) => history,
            Err(e) => {
                warn!("[History] Corrupt state file {:?}: {}, starting empty", path, e);
                Self::new()
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)?;
        debug!(
            "[History] Saved {} entries to {:?}",
            self.entries.len(),
            path.as_ref()
        );
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&LastSignal> {
        self.entries.get(symbol)
    }

    /// True when the stored entry matches both the candle timestamp and the
    /// direction of the new signal.
    pub fn is_duplicate(&self, symbol: &str, timestamp: i64, direction: Direction) -> bool {
        self.entries.get(symbol).map_or(false, |last| {
            last.timestamp == timestamp.to_string() && last.direction == direction.to_string()
        })
    }

    /// Overwrites only the entry for the given symbol.
    pub fn record(&mut self, symbol: &str, timestamp: i64, direction: Direction) {
        self.entries.insert(
            symbol.to_string(),
            LastSignal {
                timestamp: timestamp.to_string(),
                direction: direction.to_string(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "confluence_scanner_history_{}_{}.json",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        let history = SignalHistory::load_from_file(&path);
        assert!(history.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not valid json").unwrap();
        let history = SignalHistory::load_from_file(&path);
        assert!(history.is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_record_roundtrip_and_duplicate_detection() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);

        let mut history = SignalHistory::new();
        history.record("BTC_USDT", 1_700_000_000_000, Direction::Bullish);
        history.save_to_file(&path).unwrap();

        let loaded = SignalHistory::load_from_file(&path);
        assert_eq!(loaded.len(), 1);
        assert!(loaded.is_duplicate("BTC_USDT", 1_700_000_000_000, Direction::Bullish));
        // Different direction or timestamp is not a duplicate.
        assert!(!loaded.is_duplicate("BTC_USDT", 1_700_000_000_000, Direction::Bearish));
        assert!(!loaded.is_duplicate("BTC_USDT", 1_700_000_300_000, Direction::Bullish));
        assert!(!loaded.is_duplicate("ETH_USDT", 1_700_000_000_000, Direction::Bullish));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_record_overwrites_only_given_symbol() {
        let mut history = SignalHistory::new();
        history.record("BTC_USDT", 1000, Direction::Bullish);
        history.record("ETH_USDT", 2000, Direction::Bearish);
        history.record("BTC_USDT", 3000, Direction::Bearish);

        assert_eq!(history.get("BTC_USDT").unwrap().timestamp, "3000");
        assert_eq!(history.get("BTC_USDT").unwrap().direction, "BEARISH");
        assert_eq!(history.get("ETH_USDT").unwrap().timestamp, "2000");
        assert_eq!(history.len(), 2);
    }
}
