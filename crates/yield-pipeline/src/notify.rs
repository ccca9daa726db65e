//! Telegram notification of run results.
//!
//! Sends a summary via the Telegram Bot API once a run ends, so a failed run
//! that left funds mid-pipeline does not go unnoticed.

use reqwest::Client;
use std::fmt::Write;
use tracing::{debug, warn};
use yield_core::types::{format_base_units, ExplorerLink};
use yield_core::{PipelineConfig, TelegramConfig};

use crate::orchestrator::RunReport;

/// Telegram notifier for run summaries
pub struct TelegramNotifier {
    client: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            chat_id,
        }
    }

    /// Build a notifier if Telegram is fully configured
    pub fn from_config(config: &TelegramConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        let bot_token = config.bot_token.clone()?;
        let chat_id = config.chat_id.clone()?;
        Some(Self::new(bot_token, chat_id))
    }

    /// Post an HTML message to the chat. Delivery problems are logged and
    /// never reach the caller.
    pub async fn send_message(&self, text: &str) {
        let endpoint = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let form = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "HTML"),
        ];

        let response = match self.client.post(&endpoint).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Run summary not delivered");
                return;
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!(chat_id = %self.chat_id, "Run summary delivered");
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Telegram rejected run summary");
        }
    }

    pub async fn notify_run(&self, chain_id: u64, config: &PipelineConfig, report: &RunReport) {
        self.send_message(&format_report(chain_id, config, report)).await;
    }
}

/// HTML summary of a run
pub fn format_report(chain_id: u64, config: &PipelineConfig, report: &RunReport) -> String {
    let tokens = &config.tokens;
    let mut message = if report.is_success() {
        String::from("✅ <b>Swap and deposit complete</b>\n\n")
    } else if report.is_partial() {
        String::from("🚨 <b>Run failed after moving funds</b>\n\n")
    } else {
        String::from("⚠️ <b>Run failed</b>\n\n")
    };

    let _ = writeln!(message, "Chain: {}", chain_id);
    if let Some(amount) = &report.amount_in {
        let _ = writeln!(message, "Input: {} {}", amount.human(), tokens.source.symbol);
    }
    if let Some(balance) = report.swapped_balance {
        let _ = writeln!(
            message,
            "Received: {} {}",
            format_base_units(balance, tokens.destination.decimals),
            tokens.destination.symbol
        );
    }
    if let Some(error) = &report.error {
        let _ = writeln!(message, "Phase: {}", error.phase());
        let _ = writeln!(message, "Error: {}", escape_html(&error.to_string()));
    }
    for tx in report.transactions() {
        let _ = writeln!(message, "{}", ExplorerLink::new(&config.explorer_url, tx.tx_hash));
    }

    message
}

/// Escape text for Telegram's HTML parse mode
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
