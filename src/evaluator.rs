// src/evaluator.rs
// Confluence rule: trend filter, volume spike, fair value gap and order block
// confirmations must all agree on the latest bar before a signal is priced.

use crate::indicators::{detect_fvg, detect_order_blocks, ema, rolling_mean, swing_levels};
use crate::types::{CandleData, Direction, TradeSignal};

pub const MIN_CANDLES: usize = 200;

const EMA_PERIOD: usize = 200;
const VOLUME_WINDOW: usize = 20;
const VOLUME_SPIKE_FACTOR: f64 = 1.5;
const SWING_LENGTH: usize = 5;
const STOP_BUFFER_FRACTION: f64 = 0.0005;
const RISK_REWARD: f64 = 2.5;

/// Evaluates the latest bar of `candles` and prices a signal when every
/// confluence leg agrees. Fewer than 200 bars yields no signal, not an error.
/// Any undefined indicator value short-circuits its branch to false.
pub fn evaluate(symbol: &str, candles: &[CandleData]) -> Option<TradeSignal> {
    if candles.len() < MIN_CANDLES {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

    let ema200 = *ema(&closes, EMA_PERIOD).last()?;
    let vol_avg = rolling_mean(&volumes, VOLUME_WINDOW).last().copied().flatten();
    let (fvg_floors, fvg_ceilings) = detect_fvg(candles);
    let (ob_floors, ob_ceilings) = detect_order_blocks(candles);
    let (swing_low, swing_high) = swing_levels(candles, SWING_LENGTH)?;

    let last = candles.last()?;
    let p = last.close;
    let v = last.volume;

    let vol_spike = vol_avg.map_or(false, |avg| v > avg * VOLUME_SPIKE_FACTOR);
    let fvg_bull = fvg_floors.last().copied().flatten().map_or(false, |floor| p >= floor);
    let ob_bull = ob_floors.last().copied().flatten().map_or(false, |floor| p >= floor);
    let fvg_bear = fvg_ceilings.last().copied().flatten().map_or(false, |ceil| p <= ceil);
    let ob_bear = ob_ceilings.last().copied().flatten().map_or(false, |ceil| p <= ceil);

    if p > ema200 && vol_spike && fvg_bull && ob_bull {
        // Stop at the swing low with a small buffer, fixed 1:2.5 reward.
        let stop_loss = swing_low - p * STOP_BUFFER_FRACTION;
        let risk = p - stop_loss;
        return Some(TradeSignal {
            symbol: symbol.to_string(),
            direction: Direction::Bullish,
            entry_price: p,
            stop_loss,
            take_profit: p + risk * RISK_REWARD,
            candle_timestamp: last.timestamp,
        });
    }

    if p < ema200 && vol_spike && fvg_bear && ob_bear {
        let stop_loss = swing_high + p * STOP_BUFFER_FRACTION;
        let risk = stop_loss - p;
        return Some(TradeSignal {
            symbol: symbol.to_string(),
            direction: Direction::Bearish,
            entry_price: p,
            stop_loss,
            take_profit: p - risk * RISK_REWARD,
            candle_timestamp: last.timestamp,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn candle(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> CandleData {
        CandleData {
            timestamp: i as i64 * 300_000,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn flat_candle(i: usize) -> CandleData {
        candle(i, 100.0, 100.5, 99.5, 100.0, 150.0)
    }

    /// 201 bars, flat at 100 with an engineered tail:
    /// bullish gap floor 103, bullish OB floor 102, swing low 100,
    /// last close 105 on a 300-volume spike.
    fn bullish_series() -> Vec<CandleData> {
        let mut candles: Vec<CandleData> = (0..195).map(flat_candle).collect();
        // bar 195: bullish block (low 102), also gaps above high[193] = 100.5
        candles.push(candle(195, 102.5, 104.0, 102.0, 103.5, 150.0));
        // bar 196: close 104.5 breaks block high 104; gaps above high[194],
        // settling the gap floor at low 103
        candles.push(candle(196, 103.5, 105.0, 103.0, 104.5, 150.0));
        candles.push(candle(197, 104.5, 104.8, 102.5, 103.0, 150.0));
        // bar 198 carries the swing low at 100
        candles.push(candle(198, 102.0, 102.0, 100.0, 100.5, 150.0));
        candles.push(candle(199, 101.5, 102.0, 100.3, 100.8, 150.0));
        // last bar: close 105 above EMA200, volume 300 vs 20-bar mean 157.5
        candles.push(candle(200, 101.0, 105.2, 100.9, 105.0, 300.0));
        candles
    }

    /// Bearish mirror: gap ceiling 97, bearish OB ceiling, swing high 100,
    /// last close 95 on a volume spike.
    fn bearish_series() -> Vec<CandleData> {
        let mut candles: Vec<CandleData> = (0..195).map(flat_candle).collect();
        candles.push(candle(195, 97.5, 98.0, 96.0, 96.5, 150.0));
        candles.push(candle(196, 96.5, 97.0, 95.0, 95.5, 150.0));
        candles.push(candle(197, 95.5, 97.2, 95.2, 96.8, 150.0));
        candles.push(candle(198, 98.0, 100.0, 97.8, 99.5, 150.0));
        candles.push(candle(199, 99.5, 99.8, 96.5, 97.0, 150.0));
        candles.push(candle(200, 96.8, 97.0, 94.8, 95.0, 300.0));
        candles
    }

    #[test]
    fn test_short_input_yields_no_signal() {
        let candles: Vec<CandleData> = (0..199).map(flat_candle).collect();
        assert_eq!(evaluate("BTC_USDT", &candles), None);
    }

    #[test]
    fn test_empty_input_yields_no_signal() {
        assert_eq!(evaluate("BTC_USDT", &[]), None);
    }

    #[test]
    fn test_bullish_confluence_signal() {
        let candles = bullish_series();
        let signal = evaluate("BTC_USDT", &candles).expect("expected bullish signal");

        assert_eq!(signal.direction, Direction::Bullish);
        assert_eq!(signal.symbol, "BTC_USDT");
        assert_eq!(signal.candle_timestamp, 200 * 300_000);
        assert_eq!(signal.entry_price, 105.0);
        // stop at swing low 100 minus 5 bps of price
        assert!((signal.stop_loss - 99.9475).abs() < EPS);
        assert!((signal.take_profit - 117.63125).abs() < EPS);
        assert!(signal.stop_loss < signal.entry_price);
        assert!(signal.entry_price < signal.take_profit);

        let reward = signal.take_profit - signal.entry_price;
        let risk = signal.entry_price - signal.stop_loss;
        assert!((reward / risk - 2.5).abs() < EPS);
    }

    #[test]
    fn test_bearish_confluence_signal() {
        let candles = bearish_series();
        let signal = evaluate("ETH_USDT", &candles).expect("expected bearish signal");

        assert_eq!(signal.direction, Direction::Bearish);
        // stop at swing high 100 plus 5 bps of price
        assert!((signal.stop_loss - 100.0475).abs() < EPS);
        assert!(signal.take_profit < signal.entry_price);
        assert!(signal.entry_price < signal.stop_loss);

        let reward = signal.entry_price - signal.take_profit;
        let risk = signal.stop_loss - signal.entry_price;
        assert!((reward / risk - 2.5).abs() < EPS);
    }

    #[test]
    fn test_no_signal_without_volume_spike() {
        let mut candles = bullish_series();
        candles.last_mut().unwrap().volume = 150.0;
        assert_eq!(evaluate("BTC_USDT", &candles), None);
    }

    #[test]
    fn test_no_signal_when_no_gap_ever_occurred() {
        // Flat series with a volume spike on the last bar: every zone series
        // stays undefined, so no branch can confirm.
        let mut candles: Vec<CandleData> = (0..201).map(flat_candle).collect();
        candles.last_mut().unwrap().volume = 500.0;
        assert_eq!(evaluate("BTC_USDT", &candles), None);
    }

    #[test]
    fn test_no_signal_below_trend_filter() {
        // Same tail as bullish_series, but a long prior regime at 120 keeps
        // the EMA-200 well above the last close of 105. Every zone leg and
        // the volume spike still confirm; only the trend filter fails.
        let mut candles = bullish_series();
        for c in candles.iter_mut().take(181) {
            c.open = 120.0;
            c.high = 120.5;
            c.low = 119.5;
            c.close = 120.0;
        }

        let (fvg_floors, _) = detect_fvg(&candles);
        let (ob_floors, _) = detect_order_blocks(&candles);
        assert_eq!(fvg_floors.last().copied().flatten(), Some(103.0));
        assert_eq!(ob_floors.last().copied().flatten(), Some(102.0));
        let ema200 = *ema(&candles.iter().map(|c| c.close).collect::<Vec<_>>(), 200)
            .last()
            .unwrap();
        assert!(ema200 > 105.0);

        assert_eq!(evaluate("BTC_USDT", &candles), None);
    }

    #[test]
    fn test_no_signal_without_order_block_confirmation() {
        let mut candles = bullish_series();
        // Bar 196 no longer closes above the block high 104, so the bullish
        // block at bar 195 is never confirmed and that leg stays undefined.
        candles[196].close = 103.9;
        assert_eq!(evaluate("BTC_USDT", &candles), None);
    }
}
