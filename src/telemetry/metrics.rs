//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Last traded price
    LastPrice,
    /// Close-to-close price move over the candle lookback
    PriceMovePct,
    /// Open interest change between the last two points
    OiDeltaPct,
    /// Large liquidation count in the last window
    BigLiqsCount,
    /// Whether the last candle volume spiked
    VolumeSpike,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Polling cycles finished, successful or not
    CyclesCompleted,
    /// Polling cycles that ended in an error
    CyclesFailed,
    /// Triggers that produced an alert dispatch
    AlertsFired,
    /// Webhook deliveries rejected with a non-success status
    WebhookRejected,
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::LastPrice => "perpwatch_last_price",
            GaugeMetric::PriceMovePct => "perpwatch_price_move_pct",
            GaugeMetric::OiDeltaPct => "perpwatch_oi_delta_pct",
            GaugeMetric::BigLiqsCount => "perpwatch_big_liqs_count",
            GaugeMetric::VolumeSpike => "perpwatch_volume_spike",
        }
    }
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::CyclesCompleted => "perpwatch_cycles_completed_total",
            CounterMetric::CyclesFailed => "perpwatch_cycles_failed_total",
            CounterMetric::AlertsFired => "perpwatch_alerts_fired_total",
            CounterMetric::WebhookRejected => "perpwatch_webhook_rejected_total",
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}

/// Increment a counter by one
pub fn inc_counter(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Install the Prometheus exporter with an HTTP scrape endpoint
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(addr = %addr, "Prometheus exporter listening");
    Ok(())
}
