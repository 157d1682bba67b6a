//! perp-watch: Market signal monitor for Binance USD-M perpetual futures
//!
//! This library provides the core components for:
//! - Market data fetches from the Binance futures REST API
//! - Pure signal detectors over candles, open interest, and liquidations
//! - Threshold evaluation into a single trigger verdict
//! - Alert dispatch to a webhook and an optional Telegram chat
//! - A resilient polling loop with graceful shutdown
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod error;
pub mod market;
pub mod monitor;
pub mod notify;
pub mod signal;
pub mod telemetry;
