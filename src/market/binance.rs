//! Binance USD-M futures REST client
//!
//! Pulls the five public data series for one symbol: klines, the 24-hour
//! ticker, the latest funding rate, open interest history, and recent
//! forced liquidations. All five travel together; a snapshot is never
//! assembled from partial data.

use super::types::{
    Candle, FundingRate, LiquidationEvent, MarketSnapshot, OpenInterestPoint, Ticker24h,
};
use super::MarketData;
use crate::config::DataConfig;
use crate::error::MonitorError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Binance USD-M futures REST base URL
pub const BINANCE_FUTURES_URL: &str = "https://fapi.binance.com";

/// Configuration for the futures data client
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// Base URL for the futures REST API
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Candle interval for the klines request
    pub candle_interval: String,
    /// Number of candles to request
    pub candle_limit: u32,
    /// Open interest history period
    pub oi_period: String,
    /// Number of open interest points to request
    pub oi_limit: u32,
    /// Number of recent forced liquidations to request
    pub liquidation_limit: u32,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: BINANCE_FUTURES_URL.to_string(),
            timeout: Duration::from_secs(15),
            candle_interval: "1m".to_string(),
            candle_limit: 60,
            oi_period: "5m".to_string(),
            oi_limit: 30,
            liquidation_limit: 50,
        }
    }
}

impl From<&DataConfig> for BinanceConfig {
    fn from(config: &DataConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            candle_interval: config.candle_interval.clone(),
            candle_limit: config.candle_limit,
            oi_period: config.oi_period.clone(),
            oi_limit: config.oi_limit,
            liquidation_limit: config.liquidation_limit,
        }
    }
}

/// Client for the Binance USD-M futures public REST API
pub struct BinanceFuturesClient {
    config: BinanceConfig,
    client: Client,
}

impl BinanceFuturesClient {
    /// Create a new client with default configuration
    pub fn new() -> Self {
        Self::with_config(BinanceConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: BinanceConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// GET a JSON payload, mapping transport, status and decode failures
    /// to the series' fetch error
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        series: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MonitorError> {
        let url = format!("{}{}", self.config.base_url, path);

        tracing::debug!(series, url = %url, "Fetching market data");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| MonitorError::fetch(series, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MonitorError::fetch(
                series,
                format!("{} - {}", status, body),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| MonitorError::fetch(series, e))
    }

    /// Fetch recent candles for the symbol
    async fn fetch_candles(&self, symbol: &str) -> Result<Vec<Candle>, MonitorError> {
        let params = [
            ("symbol", symbol.to_string()),
            ("interval", self.config.candle_interval.clone()),
            ("limit", self.config.candle_limit.to_string()),
        ];

        let rows: Vec<Value> = self.get_json("klines", "/fapi/v1/klines", &params).await?;
        parse_klines(&rows)
    }

    /// Fetch the 24-hour rolling ticker for the symbol
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker24h, MonitorError> {
        let params = [("symbol", symbol.to_string())];
        self.get_json("ticker", "/fapi/v1/ticker/24hr", &params)
            .await
    }

    /// Fetch the most recent funding rate record for the symbol
    async fn fetch_funding(&self, symbol: &str) -> Result<FundingRate, MonitorError> {
        let params = [("symbol", symbol.to_string()), ("limit", "1".to_string())];

        let records: Vec<FundingRate> = self
            .get_json("funding", "/fapi/v1/fundingRate", &params)
            .await?;
        latest_funding(records)
    }

    /// Fetch open interest history for the symbol
    async fn fetch_open_interest(
        &self,
        symbol: &str,
    ) -> Result<Vec<OpenInterestPoint>, MonitorError> {
        let params = [
            ("symbol", symbol.to_string()),
            ("period", self.config.oi_period.clone()),
            ("limit", self.config.oi_limit.to_string()),
        ];

        self.get_json("open_interest", "/futures/data/openInterestHist", &params)
            .await
    }

    /// Fetch recent forced liquidation orders for the symbol
    async fn fetch_liquidations(
        &self,
        symbol: &str,
    ) -> Result<Vec<LiquidationEvent>, MonitorError> {
        let params = [
            ("symbol", symbol.to_string()),
            ("limit", self.config.liquidation_limit.to_string()),
        ];

        self.get_json("liquidations", "/fapi/v1/allForceOrders", &params)
            .await
    }
}

#[async_trait]
impl MarketData for BinanceFuturesClient {
    async fn fetch(&self, symbol: &str, mode: &str) -> Result<MarketSnapshot, MonitorError> {
        let (candles, ticker, funding, open_interest, liquidations) = tokio::try_join!(
            self.fetch_candles(symbol),
            self.fetch_ticker(symbol),
            self.fetch_funding(symbol),
            self.fetch_open_interest(symbol),
            self.fetch_liquidations(symbol),
        )?;

        tracing::debug!(
            symbol,
            candles = candles.len(),
            open_interest = open_interest.len(),
            liquidations = liquidations.len(),
            "Snapshot assembled"
        );

        Ok(MarketSnapshot {
            symbol: symbol.to_string(),
            mode: mode.to_string(),
            fetched_at: Utc::now(),
            candles,
            ticker,
            funding,
            open_interest,
            liquidations,
        })
    }
}

impl Default for BinanceFuturesClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the klines response into candles
///
/// Any unparseable row fails the whole series; the window detectors assume
/// a gapless candle sequence.
fn parse_klines(rows: &[Value]) -> Result<Vec<Candle>, MonitorError> {
    rows.iter()
        .map(|row| {
            Candle::from_kline_row(row)
                .ok_or_else(|| MonitorError::fetch("klines", format!("unparseable kline row: {}", row)))
        })
        .collect()
}

/// Most recent record of the funding rate response
fn latest_funding(mut records: Vec<FundingRate>) -> Result<FundingRate, MonitorError> {
    records
        .pop()
        .ok_or_else(|| MonitorError::fetch("funding", "empty funding rate response"))
}
