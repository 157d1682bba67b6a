//! Polling loop
//!
//! One cycle at a time: fetch a snapshot, evaluate the thresholds, dispatch
//! if anything fired, then sleep out the interval. A failed cycle is logged
//! and the next one runs on schedule; only the shutdown signal stops the
//! loop.

use crate::config::MarketConfig;
use crate::error::MonitorError;
use crate::market::MarketData;
use crate::notify::AlertSink;
use crate::signal::{TriggerEvaluator, TriggerResult};
use crate::telemetry::{inc_counter, set_gauge, CounterMetric, GaugeMetric};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Periodic fetch-evaluate-dispatch loop for one symbol
pub struct Monitor {
    symbol: String,
    mode: String,
    poll_interval: Duration,
    source: Arc<dyn MarketData>,
    evaluator: TriggerEvaluator,
    sink: Arc<dyn AlertSink>,
}

impl Monitor {
    /// Create a monitor from market configuration
    pub fn new(
        config: &MarketConfig,
        source: Arc<dyn MarketData>,
        evaluator: TriggerEvaluator,
        sink: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            symbol: config.symbol.clone(),
            mode: config.mode.clone(),
            poll_interval: config.poll_interval(),
            source,
            evaluator,
            sink,
        }
    }

    /// Override the polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run until the shutdown flag flips
    ///
    /// The first cycle starts immediately. Cycle errors are logged and
    /// counted, never propagated. Shutdown is honored between cycles and
    /// during the sleep; an in-flight cycle always finishes first.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            symbol = %self.symbol,
            mode = %self.mode,
            interval_secs = self.poll_interval.as_secs(),
            "Monitor loop starting"
        );

        loop {
            match self.run_cycle().await {
                Ok(result) if result.fired => {
                    tracing::info!(reasons = ?result.reasons, "Alert dispatched");
                }
                Ok(_) => {
                    tracing::debug!("Cycle completed, no trigger");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Cycle failed");
                    inc_counter(CounterMetric::CyclesFailed);
                }
            }
            inc_counter(CounterMetric::CyclesCompleted);

            tokio::select! {
                _ = sleep(self.poll_interval) => {}
                changed = shutdown.changed() => {
                    // A dropped sender also stops the loop
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!(symbol = %self.symbol, "Monitor loop stopped");
    }

    /// Run one fetch-evaluate-dispatch cycle
    pub async fn run_cycle(&self) -> Result<TriggerResult, MonitorError> {
        let snapshot = self.source.fetch(&self.symbol, &self.mode).await?;
        let result = self.evaluator.evaluate(&snapshot);

        record_cycle_gauges(snapshot.last_price(), &result);

        if result.fired {
            tracing::info!(
                price_move_pct = %result.price_move_5m_pct,
                oi_delta_pct = %result.oi_delta_pct,
                big_liqs = result.big_liqs_count,
                volume_spike = result.volume_spike,
                "Trigger fired"
            );
            inc_counter(CounterMetric::AlertsFired);
            self.sink.dispatch(&snapshot, &result).await?;
        }

        Ok(result)
    }
}

/// Publish the per-cycle gauges
fn record_cycle_gauges(last_price: Decimal, result: &TriggerResult) {
    set_gauge(GaugeMetric::LastPrice, decimal_to_f64(last_price));
    set_gauge(
        GaugeMetric::PriceMovePct,
        decimal_to_f64(result.price_move_5m_pct),
    );
    set_gauge(GaugeMetric::OiDeltaPct, decimal_to_f64(result.oi_delta_pct));
    set_gauge(GaugeMetric::BigLiqsCount, result.big_liqs_count as f64);
    set_gauge(
        GaugeMetric::VolumeSpike,
        if result.volume_spike { 1.0 } else { 0.0 },
    );
}

/// Lossy conversion for gauge export
fn decimal_to_f64(value: Decimal) -> f64 {
    value.try_into().unwrap_or(0.0)
}
