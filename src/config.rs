//! Configuration types for perp-watch

use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub market: MarketConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Monitored market configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Binance USD-M futures symbol (e.g., "BTCUSDT")
    pub symbol: String,

    /// Free-form tag carried into the alert payload
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Minutes between polling cycles
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,
}

fn default_mode() -> String {
    "test".to_string()
}
fn default_refresh_minutes() -> u64 {
    5
}

impl MarketConfig {
    /// Sleep duration between polling cycles
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_minutes * 60)
    }
}

/// Market data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Binance USD-M futures REST base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_data_timeout_secs")]
    pub timeout_secs: u64,

    /// Candle interval for the klines request
    #[serde(default = "default_candle_interval")]
    pub candle_interval: String,

    /// Number of candles to request (the volume detector needs 31)
    #[serde(default = "default_candle_limit")]
    pub candle_limit: u32,

    /// Open interest history period
    #[serde(default = "default_oi_period")]
    pub oi_period: String,

    /// Number of open interest points to request
    #[serde(default = "default_oi_limit")]
    pub oi_limit: u32,

    /// Number of recent forced liquidations to request
    #[serde(default = "default_liquidation_limit")]
    pub liquidation_limit: u32,
}

fn default_base_url() -> String {
    "https://fapi.binance.com".to_string()
}
fn default_data_timeout_secs() -> u64 {
    15
}
fn default_candle_interval() -> String {
    "1m".to_string()
}
fn default_candle_limit() -> u32 {
    60
}
fn default_oi_period() -> String {
    "5m".to_string()
}
fn default_oi_limit() -> u32 {
    30
}
fn default_liquidation_limit() -> u32 {
    50
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: 15,
            candle_interval: "1m".to_string(),
            candle_limit: 60,
            oi_period: "5m".to_string(),
            oi_limit: 30,
            liquidation_limit: 50,
        }
    }
}

impl DataConfig {
    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Trigger threshold configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    /// Absolute price move over the last five candles (percent) that fires
    #[serde(default = "default_price_move_pct")]
    pub price_move_pct: Decimal,

    /// Absolute open interest change between the last two points (percent) that fires
    #[serde(default = "default_oi_delta_pct")]
    pub oi_delta_pct: Decimal,

    /// Number of large liquidations that fires
    #[serde(default = "default_big_liqs_count")]
    pub big_liqs_count: usize,

    /// Last volume vs median-of-previous-30 ratio that counts as a spike
    #[serde(default = "default_volume_spike_ratio")]
    pub volume_spike_ratio: Decimal,

    /// Notional USD above which a liquidation counts as large
    #[serde(default = "default_liq_notional_usd")]
    pub liq_notional_usd: Decimal,
}

fn default_price_move_pct() -> Decimal {
    Decimal::new(35, 2) // 0.35%
}
fn default_oi_delta_pct() -> Decimal {
    Decimal::new(8, 1) // 0.8%
}
fn default_big_liqs_count() -> usize {
    3
}
fn default_volume_spike_ratio() -> Decimal {
    Decimal::new(15, 1) // 1.5x
}
fn default_liq_notional_usd() -> Decimal {
    Decimal::new(100_000, 0)
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            price_move_pct: Decimal::new(35, 2), // 0.35%
            oi_delta_pct: Decimal::new(8, 1),    // 0.8%
            big_liqs_count: 3,
            volume_spike_ratio: Decimal::new(15, 1), // 1.5x
            liq_notional_usd: Decimal::new(100_000, 0),
        }
    }
}

/// Alert webhook configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Destination URL; alerts cannot be dispatched without it
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_webhook_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_webhook_timeout_secs() -> u64 {
    20
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 20,
        }
    }
}

impl WebhookConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Telegram chat notification configuration
///
/// Notifications are enabled only when both the bot token and the chat id
/// are set.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Destination chat id
    #[serde(default)]
    pub chat_id: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_telegram_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_telegram_timeout_secs() -> u64 {
    10
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            timeout_secs: 10,
        }
    }
}

impl TelegramConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prometheus exporter port; None disables the exporter
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check the loaded settings
    ///
    /// Settings the loop cannot run with are hard errors. Settings that only
    /// bite later are warnings: a missing webhook URL fails the first cycle
    /// that fires a trigger, not startup.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.market.symbol.trim().is_empty() {
            anyhow::bail!("market.symbol must not be empty");
        }
        if self.market.refresh_minutes == 0 {
            anyhow::bail!("market.refresh_minutes must be at least 1");
        }

        if self.data.candle_limit < 31 {
            tracing::warn!(
                candle_limit = self.data.candle_limit,
                "data.candle_limit below 31 keeps the volume detector permanently quiet"
            );
        }
        if self.webhook.url.is_none() {
            tracing::warn!("webhook.url is not set; fired triggers will fail to dispatch");
        }
        if self.telegram.bot_token.is_some() != self.telegram.chat_id.is_some() {
            tracing::warn!(
                "telegram needs both bot_token and chat_id; chat notifications stay disabled"
            );
        }

        Ok(())
    }
}
