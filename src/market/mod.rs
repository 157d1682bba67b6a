//! Market data module
//!
//! Fetches the five Binance USD-M futures series the trigger evaluator
//! consumes and bundles them into per-cycle snapshots.

mod binance;
mod types;

pub use binance::{BinanceConfig, BinanceFuturesClient, BINANCE_FUTURES_URL};
pub use types::{
    Candle, FundingRate, LiquidationEvent, MarketSnapshot, OpenInterestPoint, Ticker24h,
};

use crate::error::MonitorError;
use async_trait::async_trait;

/// Trait for market data source implementations
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch a complete snapshot for the symbol
    ///
    /// All five series travel together; any failure drops the whole
    /// snapshot so the evaluator never sees partial data.
    async fn fetch(&self, symbol: &str, mode: &str) -> Result<MarketSnapshot, MonitorError>;
}
