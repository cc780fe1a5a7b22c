// src/notifier.rs
use chrono::Utc;
use log::{error, info, warn};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::types::{Direction, TradeSignal};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DiscordNotifier {
    client: Client,
    webhook_url: Option<String>,
    enabled: bool,
}

impl DiscordNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let enabled = webhook_url.is_some();

        if enabled {
            info!("🔔 [Notifier] Discord notifier initialized");
        } else {
            warn!("🔔 [Notifier] Discord notifier disabled - DISCORD_WEBHOOK not set");
        }

        Self {
            client: Client::new(),
            webhook_url,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Posts a formatted alert to the webhook. Fire-and-forget with a bounded
    /// timeout; no retry. Disabled notifier is a no-op.
    pub async fn send_signal_alert(
        &self,
        signal: &TradeSignal,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.enabled {
            return Ok(());
        }

        let url = self.webhook_url.as_ref().unwrap();

        let emoji = match signal.direction {
            Direction::Bullish => "🟢",
            Direction::Bearish => "🔴",
        };

        let message = format!(
            "🚀 **Confluence Scanner SIGNAL**\n\
            **Symbol:** {}\n\
            **Direction:** {} {}\n\
            **Entry:** {:.4}\n\
            **Stop Loss:** {:.4}\n\
            **Take Profit:** {:.4}\n\
            **RR Ratio:** 1:2.5\n\
            **Time:** {} UTC",
            signal.symbol,
            signal.direction,
            emoji,
            signal.entry_price,
            signal.stop_loss,
            signal.take_profit,
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        );

        let response = self
            .client
            .post(url)
            .timeout(SEND_TIMEOUT)
            .json(&json!({ "content": message }))
            .send()
            .await?;

        if response.status().is_success() {
            info!(
                "🔔 [Notifier] Alert sent for {} {} @ {:.4}",
                signal.symbol, signal.direction, signal.entry_price
            );
            Ok(())
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("🔔 [Notifier] Webhook returned {}: {}", status, body);
            Err(format!("webhook returned {}", status).into())
        }
    }
}
