//! Notification dispatch
//!
//! Fan-out for fired triggers: the mandatory webhook POST and the optional
//! Telegram summary run concurrently, and both complete before the cycle
//! ends. Only webhook problems propagate; chat is best-effort.

mod telegram;
mod webhook;

pub use telegram::{TelegramNotifier, TELEGRAM_API_URL};
pub use webhook::{AlertPayload, WebhookClient};

use crate::config::Config;
use crate::error::MonitorError;
use crate::market::MarketSnapshot;
use crate::signal::TriggerResult;
use async_trait::async_trait;

/// Trait for alert sink implementations
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver a fired trigger together with its snapshot
    async fn dispatch(
        &self,
        snapshot: &MarketSnapshot,
        trigger: &TriggerResult,
    ) -> Result<(), MonitorError>;
}

/// Default sink: webhook plus optional Telegram chat
pub struct Dispatcher {
    webhook: WebhookClient,
    telegram: Option<TelegramNotifier>,
}

impl Dispatcher {
    /// Build the dispatcher from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            webhook: WebhookClient::new(config.webhook.clone()),
            telegram: TelegramNotifier::from_config(&config.telegram),
        }
    }

    /// Whether the optional chat channel is active
    pub fn has_chat(&self) -> bool {
        self.telegram.is_some()
    }
}

#[async_trait]
impl AlertSink for Dispatcher {
    async fn dispatch(
        &self,
        snapshot: &MarketSnapshot,
        trigger: &TriggerResult,
    ) -> Result<(), MonitorError> {
        let chat = async {
            if let Some(telegram) = &self.telegram {
                let text = TelegramNotifier::summary(&snapshot.symbol, trigger);
                if let Err(e) = telegram.send(&text).await {
                    tracing::warn!(error = %e, "Chat notification failed");
                }
            }
        };

        let (webhook_result, ()) = tokio::join!(self.webhook.post_alert(snapshot, trigger), chat);
        webhook_result
    }
}
