//! Alert webhook delivery
//!
//! POSTs the enriched payload to the configured webhook URL. The URL is the
//! one mandatory piece of notification config: a fired trigger with no URL
//! is a configuration error, not a silent skip.

use crate::config::WebhookConfig;
use crate::error::MonitorError;
use crate::market::MarketSnapshot;
use crate::signal::TriggerResult;
use crate::telemetry::{inc_counter, CounterMetric};
use reqwest::Client;
use serde::Serialize;

/// Delivers fired alerts to the configured webhook
pub struct WebhookClient {
    config: WebhookConfig,
    client: Client,
}

impl WebhookClient {
    /// Create a client from webhook configuration
    pub fn new(config: WebhookConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// POST the enriched payload for a fired trigger
    ///
    /// A missing URL is a configuration error and transport failures are
    /// dispatch errors. A non-2xx response is recorded and accepted;
    /// delivery is attempted exactly once.
    pub async fn post_alert(
        &self,
        snapshot: &MarketSnapshot,
        trigger: &TriggerResult,
    ) -> Result<(), MonitorError> {
        let url = self.config.url.as_deref().ok_or_else(|| {
            MonitorError::Configuration("webhook.url is required to dispatch alerts".to_string())
        })?;

        let payload = AlertPayload { snapshot, trigger };

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MonitorError::Dispatch(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%status, "Alert delivered to webhook");
        } else {
            tracing::warn!(%status, "Webhook rejected the alert");
            inc_counter(CounterMetric::WebhookRejected);
        }

        Ok(())
    }
}

/// Alert body: the snapshot fields at the top level plus the trigger verdict
#[derive(Debug, Serialize)]
pub struct AlertPayload<'a> {
    #[serde(flatten)]
    pub snapshot: &'a MarketSnapshot,
    pub trigger: &'a TriggerResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{FundingRate, Ticker24h};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            symbol: "BTCUSDT".to_string(),
            mode: "test".to_string(),
            fetched_at: Utc::now(),
            candles: vec![],
            ticker: Ticker24h {
                symbol: "BTCUSDT".to_string(),
                last_price: dec!(43050),
                price_change: dec!(0),
                price_change_percent: dec!(0),
                high_price: dec!(43500),
                low_price: dec!(42800),
                volume: dec!(12000),
                quote_volume: dec!(516600000),
            },
            funding: FundingRate {
                symbol: "BTCUSDT".to_string(),
                funding_rate: dec!(0.0001),
                funding_time: 1700000000000,
            },
            open_interest: vec![],
            liquidations: vec![],
        }
    }

    fn trigger() -> TriggerResult {
        TriggerResult {
            fired: true,
            price_move_5m_pct: dec!(1),
            oi_delta_pct: dec!(0),
            big_liqs_count: 0,
            volume_spike: false,
            reasons: vec!["price_move_5m=1.00%".to_string()],
        }
    }

    #[tokio::test]
    async fn test_missing_url_is_configuration_error() {
        let client = WebhookClient::new(WebhookConfig {
            url: None,
            timeout_secs: 1,
        });

        let result = client.post_alert(&snapshot(), &trigger()).await;
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_unreachable_url_is_dispatch_error() {
        let client = WebhookClient::new(WebhookConfig {
            url: Some("http://127.0.0.1:9".to_string()),
            timeout_secs: 1,
        });

        let result = client.post_alert(&snapshot(), &trigger()).await;
        assert!(matches!(result, Err(MonitorError::Dispatch(_))));
    }

    #[test]
    fn test_payload_flattens_snapshot_fields() {
        let snapshot = snapshot();
        let trigger = trigger();
        let payload = AlertPayload {
            snapshot: &snapshot,
            trigger: &trigger,
        };

        let value = serde_json::to_value(&payload).unwrap();
        // Snapshot fields sit at the top level, not under a "snapshot" key
        assert_eq!(value["symbol"], "BTCUSDT");
        assert_eq!(value["mode"], "test");
        assert!(value["ticker"].is_object());
        assert!(value.get("snapshot").is_none());
        // Trigger verdict nests under its own key
        assert_eq!(value["trigger"]["fired"], true);
        assert_eq!(value["trigger"]["reasons"][0], "price_move_5m=1.00%");
    }
}
