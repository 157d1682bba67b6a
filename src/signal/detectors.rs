//! Trigger signal detectors
//!
//! Four pure measurements over one snapshot. Each returns a neutral value
//! (zero or false) when its input window is too short or a denominator is
//! zero; thin data is never an error.

use crate::market::{Candle, LiquidationEvent, OpenInterestPoint};
use rust_decimal::Decimal;

/// Candles needed before the five-candle price move is defined
const PRICE_MOVE_LOOKBACK: usize = 6;

/// Candles needed for the last-vs-previous-30 volume comparison
const VOLUME_WINDOW: usize = 31;

/// Percentage move of the last price against the close five candles back
///
/// Returns zero when fewer than six candles are available or the reference
/// close is zero.
pub fn price_move_pct(last_price: Decimal, candles: &[Candle]) -> Decimal {
    if candles.len() < PRICE_MOVE_LOOKBACK {
        return Decimal::ZERO;
    }

    let reference = candles[candles.len() - PRICE_MOVE_LOOKBACK].close;
    if reference.is_zero() {
        return Decimal::ZERO;
    }

    (last_price - reference) / reference * Decimal::ONE_HUNDRED
}

/// Whether the latest candle volume spikes above the recent median
///
/// Compares the last volume against `ratio` times the median of the 30
/// volumes before it. Returns false when fewer than 31 candles are
/// available or the median is zero.
pub fn volume_spike(candles: &[Candle], ratio: Decimal) -> bool {
    if candles.len() < VOLUME_WINDOW {
        return false;
    }

    let last = candles[candles.len() - 1].volume;
    let window: Vec<Decimal> = candles[candles.len() - VOLUME_WINDOW..candles.len() - 1]
        .iter()
        .map(|c| c.volume)
        .collect();

    let med = median(&window);
    if med.is_zero() {
        return false;
    }

    last >= ratio * med
}

/// Percentage change between the last two open interest points
///
/// Returns zero when fewer than two points are available or the earlier
/// value is zero.
pub fn oi_delta_pct(points: &[OpenInterestPoint]) -> Decimal {
    if points.len() < 2 {
        return Decimal::ZERO;
    }

    let previous = points[points.len() - 2].sum_open_interest;
    let latest = points[points.len() - 1].sum_open_interest;
    if previous.is_zero() {
        return Decimal::ZERO;
    }

    (latest - previous) / previous * Decimal::ONE_HUNDRED
}

/// Number of liquidations whose notional meets the minimum
///
/// Records whose price or quantity fail to parse are skipped, never
/// counted and never an error.
pub fn big_liqs_count(events: &[LiquidationEvent], min_notional: Decimal) -> usize {
    events
        .iter()
        .filter(|e| e.notional().map_or(false, |n| n >= min_notional))
        .count()
}

/// Median of a slice, mean of the two middle values for even lengths
fn median(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / Decimal::TWO
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn candle(close: Decimal, volume: Decimal) -> Candle {
        Candle {
            open_time: Utc::now(),
            open: close,
            high: close,
            low: close,
            close,
            volume,
            close_time: Utc::now(),
        }
    }

    fn flat_candles(count: usize, close: Decimal, volume: Decimal) -> Vec<Candle> {
        (0..count).map(|_| candle(close, volume)).collect()
    }

    fn oi_points(values: &[Decimal]) -> Vec<OpenInterestPoint> {
        values
            .iter()
            .map(|v| OpenInterestPoint {
                symbol: "BTCUSDT".to_string(),
                sum_open_interest: *v,
                sum_open_interest_value: Decimal::ZERO,
                timestamp: 1700000000000,
            })
            .collect()
    }

    fn liq(price: &str, qty: &str) -> LiquidationEvent {
        LiquidationEvent {
            symbol: "BTCUSDT".to_string(),
            price: price.to_string(),
            orig_qty: qty.to_string(),
            side: "SELL".to_string(),
            time: 1700000000000,
        }
    }

    #[test]
    fn test_price_move_basic() {
        let candles = flat_candles(6, dec!(100), dec!(10));
        assert_eq!(price_move_pct(dec!(101), &candles), dec!(1));
    }

    #[test]
    fn test_price_move_uses_close_five_candles_back() {
        let mut candles = flat_candles(10, dec!(90), dec!(10));
        // Reference candle is the sixth from the end
        candles[4] = candle(dec!(100), dec!(10));
        assert_eq!(price_move_pct(dec!(102), &candles), dec!(2));
    }

    #[test]
    fn test_price_move_negative() {
        let candles = flat_candles(6, dec!(100), dec!(10));
        assert_eq!(price_move_pct(dec!(99), &candles), dec!(-1));
    }

    #[test]
    fn test_price_move_short_history_is_zero() {
        let candles = flat_candles(5, dec!(100), dec!(10));
        assert_eq!(price_move_pct(dec!(150), &candles), Decimal::ZERO);
    }

    #[test]
    fn test_price_move_zero_reference_is_zero() {
        let candles = flat_candles(6, dec!(0), dec!(10));
        assert_eq!(price_move_pct(dec!(100), &candles), Decimal::ZERO);
    }

    #[test]
    fn test_volume_spike_fires_on_boundary() {
        let mut candles = flat_candles(31, dec!(100), dec!(10));
        // Exactly 1.5x the median of the previous 30
        candles[30] = candle(dec!(100), dec!(15));
        assert!(volume_spike(&candles, dec!(1.5)));
    }

    #[test]
    fn test_volume_spike_below_ratio() {
        let mut candles = flat_candles(31, dec!(100), dec!(10));
        candles[30] = candle(dec!(100), dec!(14.9));
        assert!(!volume_spike(&candles, dec!(1.5)));
    }

    #[test]
    fn test_volume_spike_short_history() {
        let mut candles = flat_candles(30, dec!(100), dec!(10));
        candles[29] = candle(dec!(100), dec!(1000));
        assert!(!volume_spike(&candles, dec!(1.5)));
    }

    #[test]
    fn test_volume_spike_zero_median() {
        let mut candles = flat_candles(31, dec!(100), dec!(0));
        candles[30] = candle(dec!(100), dec!(1000));
        assert!(!volume_spike(&candles, dec!(1.5)));
    }

    #[test]
    fn test_volume_spike_median_resists_outlier() {
        let mut candles = flat_candles(31, dec!(100), dec!(10));
        // One huge volume in the window moves the mean but not the median
        candles[5] = candle(dec!(100), dec!(1000));
        candles[30] = candle(dec!(100), dec!(20));
        assert!(volume_spike(&candles, dec!(1.5)));
    }

    #[test]
    fn test_volume_spike_excludes_last_candle_from_window() {
        // Previous 30 volumes are all 10; the last candle's own volume must
        // not drag the median up.
        let mut candles = flat_candles(31, dec!(100), dec!(10));
        candles[30] = candle(dec!(100), dec!(15));
        assert!(volume_spike(&candles, dec!(1.5)));

        candles[30] = candle(dec!(100), dec!(14));
        assert!(!volume_spike(&candles, dec!(1.5)));
    }

    #[test]
    fn test_oi_delta_basic() {
        let points = oi_points(&[dec!(1000), dec!(1010)]);
        assert_eq!(oi_delta_pct(&points), dec!(1));
    }

    #[test]
    fn test_oi_delta_negative() {
        let points = oi_points(&[dec!(1000), dec!(990)]);
        assert_eq!(oi_delta_pct(&points), dec!(-1));
    }

    #[test]
    fn test_oi_delta_uses_last_two_points() {
        let points = oi_points(&[dec!(500), dec!(1000), dec!(1010)]);
        assert_eq!(oi_delta_pct(&points), dec!(1));
    }

    #[test]
    fn test_oi_delta_single_point_is_zero() {
        let points = oi_points(&[dec!(1000)]);
        assert_eq!(oi_delta_pct(&points), Decimal::ZERO);
    }

    #[test]
    fn test_oi_delta_zero_base_is_zero() {
        let points = oi_points(&[dec!(0), dec!(50)]);
        assert_eq!(oi_delta_pct(&points), Decimal::ZERO);
    }

    #[test]
    fn test_big_liqs_counts_above_threshold() {
        let events = vec![
            liq("50000", "3"), // 150k
            liq("50000", "3"),
            liq("50000", "3"),
            liq("50000", "1"), // 50k, too small
        ];
        assert_eq!(big_liqs_count(&events, dec!(100000)), 3);
    }

    #[test]
    fn test_big_liqs_boundary_counts() {
        let events = vec![liq("50000", "2")]; // exactly 100k
        assert_eq!(big_liqs_count(&events, dec!(100000)), 1);
    }

    #[test]
    fn test_big_liqs_skips_malformed_records() {
        let clean = vec![liq("50000", "3"), liq("50000", "3"), liq("50000", "3")];
        let mut noisy = clean.clone();
        noisy.push(liq("n/a", "3"));
        noisy.push(liq("50000", ""));

        assert_eq!(
            big_liqs_count(&clean, dec!(100000)),
            big_liqs_count(&noisy, dec!(100000))
        );
    }

    #[test]
    fn test_big_liqs_empty() {
        assert_eq!(big_liqs_count(&[], dec!(100000)), 0);
    }

    #[test]
    fn test_median_odd() {
        let values = vec![dec!(3), dec!(1), dec!(2)];
        assert_eq!(median(&values), dec!(2));
    }

    #[test]
    fn test_median_even() {
        let values = vec![dec!(4), dec!(1), dec!(3), dec!(2)];
        assert_eq!(median(&values), dec!(2.5));
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&[]), Decimal::ZERO);
    }
}
