//! Telegram chat notifications
//!
//! Optional, best-effort channel. The notifier only exists when both the
//! bot token and chat id are configured; the dispatcher logs and swallows
//! every failure so chat problems never block the webhook.

use crate::config::TelegramConfig;
use crate::error::MonitorError;
use crate::signal::TriggerResult;
use reqwest::Client;
use serde_json::json;

/// Telegram Bot API base URL
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Sends trigger summaries to a Telegram chat
pub struct TelegramNotifier {
    base_url: String,
    bot_token: String,
    chat_id: String,
    client: Client,
}

impl TelegramNotifier {
    /// Build a notifier when the token/chat pair is fully configured
    pub fn from_config(config: &TelegramConfig) -> Option<Self> {
        let (bot_token, chat_id) = match (&config.bot_token, &config.chat_id) {
            (Some(token), Some(chat)) => (token.clone(), chat.clone()),
            _ => return None,
        };

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Some(Self {
            base_url: TELEGRAM_API_URL.to_string(),
            bot_token,
            chat_id,
            client,
        })
    }

    /// One-line summary for a fired trigger
    pub fn summary(symbol: &str, trigger: &TriggerResult) -> String {
        format!("{}: {}", symbol, trigger.reasons.join(", "))
    }

    /// Send a message to the configured chat
    pub async fn send(&self, text: &str) -> Result<(), MonitorError> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| MonitorError::Notification(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MonitorError::Notification(format!(
                "sendMessage returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Bot API sendMessage endpoint for the configured token
    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.bot_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config(bot_token: Option<&str>, chat_id: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: bot_token.map(String::from),
            chat_id: chat_id.map(String::from),
            timeout_secs: 1,
        }
    }

    #[test]
    fn test_from_config_requires_both_values() {
        assert!(TelegramNotifier::from_config(&config(None, None)).is_none());
        assert!(TelegramNotifier::from_config(&config(Some("123:abc"), None)).is_none());
        assert!(TelegramNotifier::from_config(&config(None, Some("-100123"))).is_none());
        assert!(TelegramNotifier::from_config(&config(Some("123:abc"), Some("-100123"))).is_some());
    }

    #[test]
    fn test_send_message_url() {
        let notifier =
            TelegramNotifier::from_config(&config(Some("123:abc"), Some("-100123"))).unwrap();
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_summary_joins_reasons() {
        let trigger = TriggerResult {
            fired: true,
            price_move_5m_pct: dec!(1),
            oi_delta_pct: dec!(0),
            big_liqs_count: 0,
            volume_spike: true,
            reasons: vec![
                "price_move_5m=1.00%".to_string(),
                "volume_spike".to_string(),
            ],
        };

        assert_eq!(
            TelegramNotifier::summary("BTCUSDT", &trigger),
            "BTCUSDT: price_move_5m=1.00%, volume_spike"
        );
    }
}
