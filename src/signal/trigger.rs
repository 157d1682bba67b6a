//! Trigger evaluation
//!
//! Applies the configured thresholds to the detector outputs and collects
//! one human-readable reason per crossing. Any single crossing fires the
//! trigger.

use super::detectors;
use crate::config::Thresholds;
use crate::market::MarketSnapshot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal places kept on the reported percentage metrics
const METRIC_DECIMALS: u32 = 3;

/// Outcome of evaluating one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerResult {
    /// Whether any threshold was crossed
    pub fired: bool,
    /// Price move over the last five candles, percent
    pub price_move_5m_pct: Decimal,
    /// Open interest change between the last two points, percent
    pub oi_delta_pct: Decimal,
    /// Large liquidations in the snapshot
    pub big_liqs_count: usize,
    /// Whether the latest volume spiked above the recent median
    pub volume_spike: bool,
    /// One entry per crossed threshold, in evaluation order
    pub reasons: Vec<String>,
}

/// Applies thresholds to the detector outputs
pub struct TriggerEvaluator {
    thresholds: Thresholds,
}

impl TriggerEvaluator {
    /// Create an evaluator with the given thresholds
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Create an evaluator with the default thresholds
    pub fn with_defaults() -> Self {
        Self::new(Thresholds::default())
    }

    /// Evaluate one snapshot against the thresholds
    ///
    /// Metrics are computed and rounded whether or not anything fires, so a
    /// quiet cycle still reports its measurements.
    pub fn evaluate(&self, snapshot: &MarketSnapshot) -> TriggerResult {
        let price_move = detectors::price_move_pct(snapshot.last_price(), &snapshot.candles);
        let oi_delta = detectors::oi_delta_pct(&snapshot.open_interest);
        let big_liqs =
            detectors::big_liqs_count(&snapshot.liquidations, self.thresholds.liq_notional_usd);
        let spike = detectors::volume_spike(&snapshot.candles, self.thresholds.volume_spike_ratio);

        let mut reasons = Vec::new();

        if price_move.abs() >= self.thresholds.price_move_pct {
            reasons.push(format!("price_move_5m={:.2}%", price_move));
        }
        if oi_delta.abs() >= self.thresholds.oi_delta_pct {
            reasons.push(format!("oi_delta={:.2}%", oi_delta));
        }
        if big_liqs >= self.thresholds.big_liqs_count {
            reasons.push(format!("liqs>={}", self.thresholds.big_liqs_count));
        }
        if spike {
            reasons.push("volume_spike".to_string());
        }

        TriggerResult {
            fired: !reasons.is_empty(),
            price_move_5m_pct: price_move.round_dp(METRIC_DECIMALS),
            oi_delta_pct: oi_delta.round_dp(METRIC_DECIMALS),
            big_liqs_count: big_liqs,
            volume_spike: spike,
            reasons,
        }
    }
}
