// src/scanner.rs
// Per-symbol pipeline: fetch -> evaluate -> dedup against history -> notify
// -> persist history. One sequential pass over the symbol list; a symbol's
// failure never aborts the rest of the pass.

use log::{error, info, warn};
use reqwest::Client;

use crate::config::ScannerConfig;
use crate::evaluator::{self, MIN_CANDLES};
use crate::fetcher;
use crate::history::SignalHistory;
use crate::notifier::DiscordNotifier;
use crate::types::CandleData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    InsufficientData,
    NoSignal,
    Duplicate,
    Alerted,
}

/// Runs the decision half of the pipeline on already-fetched candles.
/// History is read from the state file at the start of the evaluation and
/// written back only when a new alert fires.
pub async fn process_candles(
    config: &ScannerConfig,
    notifier: &DiscordNotifier,
    symbol: &str,
    candles: &[CandleData],
) -> PassOutcome {
    if candles.len() < MIN_CANDLES {
        info!(
            "[Scanner] {}: only {} candles (need {}), skipping",
            symbol,
            candles.len(),
            MIN_CANDLES
        );
        return PassOutcome::InsufficientData;
    }

    let signal = match evaluator::evaluate(symbol, candles) {
        Some(signal) => signal,
        None => return PassOutcome::NoSignal,
    };

    let mut history = SignalHistory::load_from_file(&config.state_file);
    if history.is_duplicate(symbol, signal.candle_timestamp, signal.direction) {
        info!(
            "[Scanner] {}: duplicate {} signal on candle {}, suppressed",
            symbol, signal.direction, signal.candle_timestamp
        );
        return PassOutcome::Duplicate;
    }

    info!(
        "[Scanner] {}: {} signal @ {:.4} (stop {:.4}, target {:.4})",
        symbol, signal.direction, signal.entry_price, signal.stop_loss, signal.take_profit
    );

    if let Err(e) = notifier.send_signal_alert(&signal).await {
        // History is updated below regardless, so an undelivered alert is
        // not retried on the next pass.
        warn!(
            "[Scanner] {}: alert delivery failed ({}), signal will not be re-sent",
            symbol, e
        );
    }

    history.record(symbol, signal.candle_timestamp, signal.direction);
    if let Err(e) = history.save_to_file(&config.state_file) {
        error!("[Scanner] {}: failed to persist signal history: {}", symbol, e);
    }

    PassOutcome::Alerted
}

pub async fn scan_symbol(
    client: &Client,
    config: &ScannerConfig,
    notifier: &DiscordNotifier,
    symbol: &str,
) -> PassOutcome {
    let candles = fetcher::fetch_klines(client, config, symbol).await;
    process_candles(config, notifier, symbol, &candles).await
}

/// One full pass over the configured symbol list, fully sequential.
pub async fn run_scan(config: &ScannerConfig) {
    let client = Client::new();
    let notifier = DiscordNotifier::new(config.webhook_url.clone());

    let mut alerted = 0;
    for symbol in &config.symbols {
        let outcome = scan_symbol(&client, config, &notifier, symbol).await;
        if outcome == PassOutcome::Alerted {
            alerted += 1;
        }
    }

    info!(
        "[Scanner] Pass complete: {} symbols scanned, {} alerts",
        config.symbols.len(),
        alerted
    );
}
