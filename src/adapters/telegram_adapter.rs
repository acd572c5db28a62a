//! Telegram notification adapter.
//!
//! POSTs one `sendMessage` call per run. Delivery failure surfaces as a
//! `Notify` error that the caller logs; it never affects the ledger.

use crate::domain::error::SwingbotError;
use crate::ports::config_port::ConfigPort;
use crate::ports::notify_port::NotifyPort;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug)]
pub struct TelegramAdapter {
    client: reqwest::blocking::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramAdapter {
    pub fn new(
        api_base: String,
        bot_token: String,
        chat_id: String,
        timeout: Duration,
    ) -> Result<Self, SwingbotError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SwingbotError::Notify {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_base,
            bot_token,
            chat_id,
        })
    }

    /// Build from the `[telegram]` config section; `None` when the section
    /// is absent (notification is then skipped for the run).
    pub fn from_config(config: &dyn ConfigPort) -> Result<Option<Self>, SwingbotError> {
        let Some(bot_token) = config.get_string("telegram", "bot_token") else {
            return Ok(None);
        };
        let chat_id =
            config
                .get_string("telegram", "chat_id")
                .ok_or(SwingbotError::ConfigMissing {
                    section: "telegram".into(),
                    key: "chat_id".into(),
                })?;
        let api_base = config
            .get_string("telegram", "api_base")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let timeout_secs = config.get_int("telegram", "timeout_secs", 10);

        Self::new(
            api_base,
            bot_token,
            chat_id,
            Duration::from_secs(timeout_secs as u64),
        )
        .map(Some)
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

impl NotifyPort for TelegramAdapter {
    fn send_message(&self, text: &str) -> Result<(), SwingbotError> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let response = self
            .client
            .post(self.send_url())
            .json(&payload)
            .send()
            .map_err(|e| SwingbotError::Notify {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(SwingbotError::Notify {
                reason: format!("Telegram API returned {status}: {body}"),
            });
        }

        Ok(())
    }
}
