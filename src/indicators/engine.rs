//! Full recomputation of every indicator column for a row sequence.
//!
//! There is no incremental state: each call derives the table from the close
//! prices it is given, so the output only ever reflects the current range.

use serde::{Deserialize, Serialize};

use super::error::IndicatorError;
use super::momentum::calculate_macd;
use super::trend::{calculate_sma, MA200_WINDOW, MA50_WINDOW};
use super::volatility::{calculate_bollinger_bands, DEFAULT_MULTIPLIER, DEFAULT_WINDOW};
use crate::models::{DerivedRow, DerivedTable, OhlcvRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub bollinger_window: usize,
    pub bollinger_k: f64,
    pub macd_short: usize,
    pub macd_long: usize,
    pub macd_signal: usize,
    pub ma_short_window: usize,
    pub ma_long_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            bollinger_window: DEFAULT_WINDOW,
            bollinger_k: DEFAULT_MULTIPLIER,
            macd_short: 12,
            macd_long: 26,
            macd_signal: 9,
            ma_short_window: MA50_WINDOW,
            ma_long_window: MA200_WINDOW,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let windows = [
            ("bollinger", self.bollinger_window),
            ("short moving average", self.ma_short_window),
            ("long moving average", self.ma_long_window),
        ];
        if let Some((name, _)) = windows.into_iter().find(|(_, w)| *w == 0) {
            return Err(IndicatorError::ZeroWindow { name });
        }

        let spans = [
            ("MACD short", self.macd_short),
            ("MACD long", self.macd_long),
            ("MACD signal", self.macd_signal),
        ];
        if let Some((name, _)) = spans.into_iter().find(|(_, s)| *s == 0) {
            return Err(IndicatorError::ZeroSpan { name });
        }

        if !self.bollinger_k.is_finite() || self.bollinger_k < 0.0 {
            return Err(IndicatorError::InvalidMultiplier(self.bollinger_k));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Result<Self, IndicatorError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Derive the indicator columns for `rows`. An empty input yields an empty table.
    pub fn compute(&self, rows: &[OhlcvRow]) -> DerivedTable {
        let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
        let p = &self.params;

        let bands = calculate_bollinger_bands(&closes, p.bollinger_window, p.bollinger_k);
        let macd = calculate_macd(&closes, p.macd_short, p.macd_long, p.macd_signal);
        let ma_short = calculate_sma(&closes, p.ma_short_window);
        let ma_long = calculate_sma(&closes, p.ma_long_window);

        let derived = rows
            .iter()
            .enumerate()
            .map(|(i, row)| DerivedRow {
                date: row.date(),
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
                bb_ma: bands.middle[i],
                bb_upper: bands.upper[i],
                bb_lower: bands.lower[i],
                macd: macd.macd[i],
                signal: macd.signal[i],
                histogram: macd.histogram[i],
                ma50: ma_short[i],
                ma200: ma_long[i],
            })
            .collect();

        DerivedTable::new(derived)
    }
}
