use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Column;

/// Price metric selectable in the chart controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Close,
    Open,
    High,
    Low,
    Volume,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Close,
        Metric::Open,
        Metric::High,
        Metric::Low,
        Metric::Volume,
    ];

    pub fn column(self) -> Column {
        match self {
            Metric::Close => Column::Close,
            Metric::Open => Column::Open,
            Metric::High => Column::High,
            Metric::Low => Column::Low,
            Metric::Volume => Column::Volume,
        }
    }

    pub fn label(self) -> &'static str {
        self.column().header()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown metric '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "metrics", rename_all = "snake_case")]
pub enum ViewMode {
    Single(Metric),
    Multi(Vec<Metric>),
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Single(Metric::Close)
    }
}

impl ViewMode {
    pub fn default_multi() -> Self {
        ViewMode::Multi(vec![Metric::Close, Metric::Open, Metric::High])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub view: ViewMode,
    pub show_bollinger: bool,
    pub show_macd: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            view: ViewMode::default(),
            show_bollinger: true,
            show_macd: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Price,
    Oscillator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStyle {
    Line,
    Dashed,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub style: SeriesStyle,
    pub color: [u8; 3],
    pub width: u32,
    /// Aligned with `Chart::dates`; `None` where the value is undefined
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>, style: SeriesStyle, color: [u8; 3], values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            style,
            color,
            width: 2,
            values,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }
}

/// Renderer-independent figure: a title, a date axis and series over it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub dates: Vec<NaiveDate>,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}
