// src/indicators.rs
// Pure indicator computations over an ordered (oldest-to-newest) candle
// series. Positions with no value yet are `None`, never a numeric sentinel.

use crate::types::CandleData;

/// Exponential moving average with smoothing `alpha = 2 / (period + 1)`.
/// The first output equals the first input; no look-ahead.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    if values.is_empty() || period == 0 {
        return Vec::new();
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    out.push(values[0]);
    for i in 1..values.len() {
        let prev = out[i - 1];
        out.push(alpha * values[i] + (1.0 - alpha) * prev);
    }
    out
}

/// Rolling arithmetic mean. `None` until a full window exists.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out[i] = Some(sum / window as f64);
        }
    }
    out
}

/// Fair value gaps: a bullish gap at position i exists when the candle's low
/// sits above the high two bars back (`low[i] > high[i-2]`), leaving a price
/// void. Returns (bullish gap floor, bearish gap ceiling) series, each
/// forward-filled from the last gap and `None` before the first occurrence.
pub fn detect_fvg(candles: &[CandleData]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut floors = vec![None; candles.len()];
    let mut ceilings = vec![None; candles.len()];
    let mut last_floor: Option<f64> = None;
    let mut last_ceiling: Option<f64> = None;

    for i in 0..candles.len() {
        if i >= 2 {
            if candles[i].low > candles[i - 2].high {
                last_floor = Some(candles[i].low);
            }
            if candles[i].high < candles[i - 2].low {
                last_ceiling = Some(candles[i].high);
            }
        }
        floors[i] = last_floor;
        ceilings[i] = last_ceiling;
    }

    (floors, ceilings)
}

/// Order blocks: a bullish block is a bullish candle whose high the very next
/// close breaks above. The block is only known one bar after the fact, so its
/// low becomes the floor from that confirming bar onward, held until a newer
/// block supersedes it. Bearish mirror uses a bearish candle and a breakdown
/// below its low. Returns (bullish OB floor, bearish OB ceiling) series.
pub fn detect_order_blocks(candles: &[CandleData]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut floors = vec![None; candles.len()];
    let mut ceilings = vec![None; candles.len()];
    let mut last_floor: Option<f64> = None;
    let mut last_ceiling: Option<f64> = None;

    for i in 0..candles.len() {
        // The block candle is i-1; bar i confirms it.
        if i >= 1 {
            let block = &candles[i - 1];
            if block.close > block.open && candles[i].close > block.high {
                last_floor = Some(block.low);
            }
            if block.close < block.open && candles[i].close < block.low {
                last_ceiling = Some(block.high);
            }
        }
        floors[i] = last_floor;
        ceilings[i] = last_ceiling;
    }

    (floors, ceilings)
}

/// Most recent local support/resistance band: `(min low, max high)` over the
/// trailing `length` bars. `None` when fewer than `length` bars exist.
pub fn swing_levels(candles: &[CandleData], length: usize) -> Option<(f64, f64)> {
    if length == 0 || candles.len() < length {
        return None;
    }
    let window = &candles[candles.len() - length..];
    let mut swing_low = f64::INFINITY;
    let mut swing_high = f64::NEG_INFINITY;
    for c in window {
        swing_low = swing_low.min(c.low);
        swing_high = swing_high.max(c.high);
    }
    Some((swing_low, swing_high))
}
