//! Descriptive statistics of a price history (count, mean, std, quartiles)

use std::fmt;

use crate::common::math;
use crate::models::OhlcvRow;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    fn from_values(name: &'static str, mut values: Vec<f64>) -> Self {
        values.sort_by(|a, b| a.total_cmp(b));
        Self {
            name,
            count: values.len(),
            mean: math::mean(&values),
            std: math::sample_std(&values),
            min: values.first().copied(),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }
}

/// Linearly interpolated quantile of an ascending slice
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// One summary per numeric column, in `Open, High, Low, Close, Volume` order
pub fn describe(rows: &[OhlcvRow]) -> Vec<ColumnSummary> {
    let column = |f: fn(&OhlcvRow) -> f64| rows.iter().map(f).collect::<Vec<_>>();
    vec![
        ColumnSummary::from_values("Open", column(|r| r.open)),
        ColumnSummary::from_values("High", column(|r| r.high)),
        ColumnSummary::from_values("Low", column(|r| r.low)),
        ColumnSummary::from_values("Close", column(|r| r.close)),
        ColumnSummary::from_values("Volume", column(|r| r.volume as f64)),
    ]
}

/// Per-column count of values that are not finite numbers, in `describe` order
pub fn missing_values(rows: &[OhlcvRow]) -> Vec<(&'static str, usize)> {
    let count = |f: fn(&OhlcvRow) -> f64| rows.iter().filter(|r| !f(r).is_finite()).count();
    vec![
        ("Date", 0),
        ("Open", count(|r| r.open)),
        ("High", count(|r| r.high)),
        ("Low", count(|r| r.low)),
        ("Close", count(|r| r.close)),
        ("Volume", 0),
    ]
}

/// Printable statistics grid, one row per statistic
pub struct SummaryTable<'a>(pub &'a [ColumnSummary]);

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8}", "")?;
        for column in self.0 {
            write!(f, "{:>16}", column.name)?;
        }
        writeln!(f)?;

        let stats: [(&str, fn(&ColumnSummary) -> Option<f64>); 8] = [
            ("count", |c| Some(c.count as f64)),
            ("mean", |c| c.mean),
            ("std", |c| c.std),
            ("min", |c| c.min),
            ("25%", |c| c.q25),
            ("50%", |c| c.median),
            ("75%", |c| c.q75),
            ("max", |c| c.max),
        ];
        for (label, stat) in stats {
            write!(f, "{:<8}", label)?;
            for column in self.0 {
                match stat(column) {
                    Some(v) => write!(f, "{:>16.4}", v)?,
                    None => write!(f, "{:>16}", "NaN")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
