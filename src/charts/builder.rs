//! Figure construction for the price and MACD charts

use super::model::{Chart, ChartKind, ChartOptions, Metric, Series, SeriesStyle, ViewMode};
use crate::models::{Column, DerivedTable};

const CYAN: [u8; 3] = [0, 255, 255];
const ORANGE: [u8; 3] = [255, 165, 0];
const GREEN: [u8; 3] = [0, 128, 0];
const MAGENTA: [u8; 3] = [255, 0, 255];
const GRAY: [u8; 3] = [128, 128, 128];
const PALETTE: [[u8; 3]; 5] = [
    [99, 110, 250],
    [239, 85, 59],
    [0, 204, 150],
    [171, 99, 250],
    [255, 161, 90],
];

/// Produces renderable figures from a derived table
pub trait ChartBuilder: Send + Sync {
    fn price_chart(&self, ticker: &str, table: &DerivedTable, options: &ChartOptions) -> Chart;

    fn oscillator_chart(&self, ticker: &str, table: &DerivedTable) -> Chart;
}

/// Charts for one pipeline run: none for an empty table, otherwise the
/// price chart followed by the MACD chart when enabled.
pub fn build_charts(
    builder: &dyn ChartBuilder,
    ticker: &str,
    table: &DerivedTable,
    options: &ChartOptions,
) -> Vec<Chart> {
    if table.is_empty() {
        return Vec::new();
    }
    let mut charts = vec![builder.price_chart(ticker, table, options)];
    if options.show_macd {
        charts.push(builder.oscillator_chart(ticker, table));
    }
    charts
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FigureBuilder;

impl FigureBuilder {
    fn close_chart(ticker: &str, table: &DerivedTable, show_bollinger: bool) -> Chart {
        let mut series = vec![
            Series::new("Close", SeriesStyle::Line, CYAN, table.column(Column::Close)),
            Series::new("MA50", SeriesStyle::Line, ORANGE, table.column(Column::Ma50)),
            Series::new("MA200", SeriesStyle::Line, GREEN, table.column(Column::Ma200)),
        ];
        if show_bollinger {
            series.extend([
                Series::new("BB Upper", SeriesStyle::Dashed, MAGENTA, table.column(Column::BbUpper))
                    .with_width(1),
                Series::new("BB Lower", SeriesStyle::Dashed, MAGENTA, table.column(Column::BbLower))
                    .with_width(1),
                Series::new("BB MA (20)", SeriesStyle::Line, ORANGE, table.column(Column::BbMa))
                    .with_width(1),
            ]);
        }
        Chart {
            kind: ChartKind::Price,
            title: format!("{} - Close", ticker),
            dates: table.dates(),
            series,
        }
    }

    fn metric_chart(ticker: &str, table: &DerivedTable, metric: Metric) -> Chart {
        Chart {
            kind: ChartKind::Price,
            title: format!("{} - {}", ticker, metric),
            dates: table.dates(),
            series: vec![Series::new(
                metric.label(),
                SeriesStyle::Line,
                PALETTE[0],
                table.column(metric.column()),
            )],
        }
    }

    fn multi_chart(ticker: &str, table: &DerivedTable, metrics: &[Metric]) -> Chart {
        let series = metrics
            .iter()
            .enumerate()
            .map(|(i, &metric)| {
                let values = if metric == Metric::Volume {
                    scaled_volume(table)
                } else {
                    table.column(metric.column())
                };
                Series::new(metric.label(), SeriesStyle::Line, PALETTE[i % PALETTE.len()], values)
            })
            .collect();
        Chart {
            kind: ChartKind::Price,
            title: format!("{} - Multiple metrics", ticker),
            dates: table.dates(),
            series,
        }
    }
}

/// Volume rescaled so its maximum meets the highest price in the table
pub fn scaled_volume(table: &DerivedTable) -> Vec<Option<f64>> {
    let max_price = table
        .rows
        .iter()
        .flat_map(|r| [r.close, r.open, r.high, r.low])
        .fold(f64::NEG_INFINITY, f64::max);
    let max_volume = table.rows.iter().map(|r| r.volume).max().unwrap_or(0);

    table
        .rows
        .iter()
        .map(|r| {
            if max_volume == 0 {
                Some(0.0)
            } else {
                Some(r.volume as f64 / max_volume as f64 * max_price)
            }
        })
        .collect()
}

impl ChartBuilder for FigureBuilder {
    fn price_chart(&self, ticker: &str, table: &DerivedTable, options: &ChartOptions) -> Chart {
        match &options.view {
            ViewMode::Single(Metric::Close) => Self::close_chart(ticker, table, options.show_bollinger),
            ViewMode::Single(metric) => Self::metric_chart(ticker, table, *metric),
            ViewMode::Multi(metrics) => Self::multi_chart(ticker, table, metrics),
        }
    }

    fn oscillator_chart(&self, ticker: &str, table: &DerivedTable) -> Chart {
        Chart {
            kind: ChartKind::Oscillator,
            title: format!("{} - MACD", ticker),
            dates: table.dates(),
            series: vec![
                Series::new("MACD", SeriesStyle::Line, CYAN, table.column(Column::Macd)),
                Series::new("Signal", SeriesStyle::Line, ORANGE, table.column(Column::Signal)),
                Series::new("Histogram", SeriesStyle::Bar, GRAY, table.column(Column::Histogram)),
            ],
        }
    }
}
