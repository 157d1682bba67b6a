//! Market data types
//!
//! One `MarketSnapshot` per polling cycle: the five Binance USD-M futures
//! series fetched together, evaluated, forwarded in the alert payload, then
//! dropped.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// A single kline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Base asset volume
    pub volume: Decimal,
    /// Candle close time
    pub close_time: DateTime<Utc>,
}

impl Candle {
    /// Parse one row of the klines response
    ///
    /// Binance encodes each kline as a JSON array whose numeric fields are
    /// strings: `[openTime, "open", "high", "low", "close", "volume",
    /// closeTime, ...]`. Returns None when any required field is missing or
    /// unparseable.
    pub fn from_kline_row(row: &Value) -> Option<Self> {
        let row = row.as_array()?;
        Some(Self {
            open_time: millis_field(row, 0)?,
            open: decimal_field(row, 1)?,
            high: decimal_field(row, 2)?,
            low: decimal_field(row, 3)?,
            close: decimal_field(row, 4)?,
            volume: decimal_field(row, 5)?,
            close_time: millis_field(row, 6)?,
        })
    }
}

/// Decimal-in-a-string at the given array index
fn decimal_field(row: &[Value], idx: usize) -> Option<Decimal> {
    row.get(idx)?.as_str().and_then(|s| Decimal::from_str(s).ok())
}

/// Millisecond timestamp at the given array index
fn millis_field(row: &[Value], idx: usize) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(row.get(idx)?.as_i64()?).single()
}

/// 24-hour rolling ticker statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    /// Most recent trade price
    pub last_price: Decimal,
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    /// Base asset volume over the window
    pub volume: Decimal,
    /// Quote asset volume over the window
    pub quote_volume: Decimal,
}

/// One funding rate record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRate {
    pub symbol: String,
    pub funding_rate: Decimal,
    /// Funding timestamp in exchange epoch milliseconds
    pub funding_time: i64,
}

/// One open interest history point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInterestPoint {
    pub symbol: String,
    /// Total open interest in contracts
    pub sum_open_interest: Decimal,
    /// Total open interest notional in USD
    pub sum_open_interest_value: Decimal,
    /// Point timestamp in exchange epoch milliseconds
    pub timestamp: i64,
}

/// One forced liquidation order
///
/// Price and quantity stay as the raw strings the exchange sent. A record
/// with missing or garbled fields still deserializes; `notional` returns
/// None for it and the detector skips it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationEvent {
    #[serde(default)]
    pub symbol: String,
    /// Order price as sent by the exchange
    #[serde(default)]
    pub price: String,
    /// Original order quantity as sent by the exchange
    #[serde(default)]
    pub orig_qty: String,
    /// BUY or SELL
    #[serde(default)]
    pub side: String,
    /// Order timestamp in exchange epoch milliseconds
    #[serde(default)]
    pub time: i64,
}

impl LiquidationEvent {
    /// Notional USD size, price times quantity
    pub fn notional(&self) -> Option<Decimal> {
        let price = Decimal::from_str(&self.price).ok()?;
        let qty = Decimal::from_str(&self.orig_qty).ok()?;
        Some(price * qty)
    }
}

/// Everything one polling cycle fetched for a symbol
///
/// Serialized as the body of the alert webhook, with the trigger verdict
/// appended by the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Trading symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Operating mode tag carried into the payload
    pub mode: String,
    /// Local capture timestamp
    pub fetched_at: DateTime<Utc>,
    /// Recent candles, most recent last
    pub candles: Vec<Candle>,
    /// 24-hour ticker statistics
    pub ticker: Ticker24h,
    /// Most recent funding rate record
    pub funding: FundingRate,
    /// Open interest history, most recent last
    pub open_interest: Vec<OpenInterestPoint>,
    /// Recent forced liquidations
    pub liquidations: Vec<LiquidationEvent>,
}

impl MarketSnapshot {
    /// Most recent trade price from the ticker
    pub fn last_price(&self) -> Decimal {
        self.ticker.last_price
    }
}
