//! Derived table: OHLCV bars joined with their indicator columns

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column of the derived table, in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
    BbMa,
    BbUpper,
    BbLower,
    Macd,
    Signal,
    Histogram,
    Ma50,
    Ma200,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Date,
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
        Column::BbMa,
        Column::BbUpper,
        Column::BbLower,
        Column::Macd,
        Column::Signal,
        Column::Histogram,
        Column::Ma50,
        Column::Ma200,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Open => "Open",
            Column::High => "High",
            Column::Low => "Low",
            Column::Close => "Close",
            Column::Volume => "Volume",
            Column::BbMa => "BB_MA",
            Column::BbUpper => "BB_upper",
            Column::BbLower => "BB_lower",
            Column::Macd => "MACD",
            Column::Signal => "Signal",
            Column::Histogram => "Histogram",
            Column::Ma50 => "MA50",
            Column::Ma200 => "MA200",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == header)
    }

    pub fn headers() -> Vec<&'static str> {
        Column::ALL.iter().map(|c| c.header()).collect()
    }
}

/// Typed value of one table cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Date(NaiveDate),
    Number(f64),
    Integer(u64),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            // `{}` on f64 prints the shortest text that parses back to the same value
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
    #[serde(rename = "BB_MA")]
    pub bb_ma: Option<f64>,
    #[serde(rename = "BB_upper")]
    pub bb_upper: Option<f64>,
    #[serde(rename = "BB_lower")]
    pub bb_lower: Option<f64>,
    #[serde(rename = "MACD")]
    pub macd: f64,
    #[serde(rename = "Signal")]
    pub signal: f64,
    #[serde(rename = "Histogram")]
    pub histogram: f64,
    #[serde(rename = "MA50")]
    pub ma50: Option<f64>,
    #[serde(rename = "MA200")]
    pub ma200: Option<f64>,
}

impl DerivedRow {
    pub fn cell(&self, column: Column) -> Cell {
        let optional = |v: Option<f64>| v.map(Cell::Number).unwrap_or(Cell::Empty);
        match column {
            Column::Date => Cell::Date(self.date),
            Column::Open => Cell::Number(self.open),
            Column::High => Cell::Number(self.high),
            Column::Low => Cell::Number(self.low),
            Column::Close => Cell::Number(self.close),
            Column::Volume => Cell::Integer(self.volume),
            Column::BbMa => optional(self.bb_ma),
            Column::BbUpper => optional(self.bb_upper),
            Column::BbLower => optional(self.bb_lower),
            Column::Macd => Cell::Number(self.macd),
            Column::Signal => Cell::Number(self.signal),
            Column::Histogram => Cell::Number(self.histogram),
            Column::Ma50 => optional(self.ma50),
            Column::Ma200 => optional(self.ma200),
        }
    }

    /// Numeric value of a column as a float (volume widened); `None` for
    /// the date column and undefined indicator entries.
    pub fn value(&self, column: Column) -> Option<f64> {
        match self.cell(column) {
            Cell::Number(v) => Some(v),
            Cell::Integer(v) => Some(v as f64),
            Cell::Date(_) | Cell::Empty => None,
        }
    }
}

/// Output of one pipeline invocation, owned by that invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedTable {
    pub rows: Vec<DerivedRow>,
}

impl DerivedTable {
    pub fn new(rows: Vec<DerivedRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last `n` rows (all of them when shorter)
    pub fn tail(&self, n: usize) -> &[DerivedRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.value(column)).collect()
    }
}
