use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lookback window offered by the period selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[default]
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::TenYears,
    ];

    /// Range string understood by the chart API
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
        }
    }

    pub fn years(&self) -> u32 {
        match self {
            Period::OneYear => 1,
            Period::TwoYears => 2,
            Period::FiveYears => 5,
            Period::TenYears => 10,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown period '{}', expected one of 1y, 2y, 5y, 10y", s))
    }
}
