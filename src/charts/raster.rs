//! PNG rasterization of chart figures.
//!
//! Rendering never fails loudly: every outcome is a [`ChartImage`], and callers
//! that need an image fall back to text when it is `Unavailable`.

use std::error::Error;
use std::io::Cursor;
use std::sync::OnceLock;

use image::{DynamicImage, ImageOutputFormat, RgbImage};
use plotters::chart::ChartBuilder as PlotArea;
use plotters::coord::Shift;
use plotters::prelude::{
    BitMapBackend, Color, DrawingArea, IntoDrawingArea, IntoFont, LineSeries, PathElement,
    RGBColor, Rectangle, SeriesLabelPosition, BLACK, WHITE,
};
use plotters::style::{register_font, FontStyle};
use serde::Serialize;
use tracing::warn;

use super::model::{Chart, SeriesStyle};
use crate::config::DashboardConfig;
use crate::error::DashboardError;

const FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedImage {
    #[serde(skip)]
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Outcome of turning a chart into pixels
#[derive(Debug, Clone, PartialEq)]
pub enum ChartImage {
    Rendered(RenderedImage),
    Unavailable(String),
}

impl ChartImage {
    pub fn is_rendered(&self) -> bool {
        matches!(self, ChartImage::Rendered(_))
    }
}

impl From<Result<RenderedImage, DashboardError>> for ChartImage {
    fn from(result: Result<RenderedImage, DashboardError>) -> Self {
        match result {
            Ok(image) => ChartImage::Rendered(image),
            Err(e) => ChartImage::Unavailable(e.to_string()),
        }
    }
}

pub trait ChartRasterizer: Send + Sync {
    fn rasterize(&self, chart: &Chart) -> ChartImage;
}

/// Rasterizer for deployments without chart images
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRasterizer;

impl ChartRasterizer for NoopRasterizer {
    fn rasterize(&self, _chart: &Chart) -> ChartImage {
        ChartImage::Unavailable("chart rendering is disabled".to_string())
    }
}

/// Draws charts with plotters into an RGB buffer and encodes it as PNG.
///
/// Labels need a TrueType font; it is loaded from `font_path` on first use.
pub struct PlottersRasterizer {
    width: u32,
    height: u32,
    font_path: String,
    font: OnceLock<Result<(), String>>,
}

impl PlottersRasterizer {
    pub fn new(width: u32, height: u32, font_path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            font_path: font_path.into(),
            font: OnceLock::new(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.chart_width, config.chart_height, config.font_path.clone())
    }

    fn ensure_font(&self) -> Result<(), DashboardError> {
        self.font
            .get_or_init(|| {
                let bytes = std::fs::read(&self.font_path)
                    .map_err(|e| format!("font {}: {}", self.font_path, e))?;
                // plotters keeps registered fonts for the life of the process
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                register_font(FONT_FAMILY, FontStyle::Normal, bytes)
                    .map_err(|_| format!("font {} is not a valid TrueType font", self.font_path))
            })
            .clone()
            .map_err(DashboardError::ImageRenderFailure)
    }

    pub fn render(&self, chart: &Chart) -> Result<RenderedImage, DashboardError> {
        if self.width == 0 || self.height == 0 {
            return Err(DashboardError::ImageRenderFailure("zero-sized canvas".into()));
        }
        self.ensure_font()?;

        let (width, height) = (self.width, self.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            draw_chart(&root, chart)
                .and_then(|_| root.present().map_err(Into::into))
                .map_err(|e| DashboardError::ImageRenderFailure(e.to_string()))?;
        }

        let pixels = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| DashboardError::ImageRenderFailure("pixel buffer size mismatch".into()))?;
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(pixels)
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .map_err(|e| DashboardError::ImageRenderFailure(e.to_string()))?;

        Ok(RenderedImage { png, width, height })
    }
}

impl ChartRasterizer for PlottersRasterizer {
    fn rasterize(&self, chart: &Chart) -> ChartImage {
        let outcome = ChartImage::from(self.render(chart));
        if let ChartImage::Unavailable(reason) = &outcome {
            warn!(title = %chart.title, reason = %reason, "Chart rasterization unavailable");
        }
        outcome
    }
}

type DrawResult = Result<(), Box<dyn Error>>;

fn draw_chart(root: &DrawingArea<BitMapBackend<'_>, Shift>, chart: &Chart) -> DrawResult {
    let (y_min, y_max) = value_bounds(chart).ok_or("chart has no finite values")?;
    let x_max = chart.dates.len().saturating_sub(1).max(1) as f64;
    let dates = &chart.dates;
    let date_label = |x: &f64| {
        let index = x.round();
        if index < 0.0 {
            return String::new();
        }
        dates
            .get(index as usize)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    root.fill(&WHITE)?;
    let mut plot = PlotArea::on(root)
        .caption(&chart.title, (FONT_FAMILY, 22).into_font())
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(72)
        .build_cartesian_2d(-0.5f64..x_max + 0.5, y_min..y_max)?;

    plot.configure_mesh()
        .x_labels(8)
        .x_label_formatter(&date_label)
        .label_style((FONT_FAMILY, 12).into_font())
        .draw()?;

    for series in &chart.series {
        let [r, g, b] = series.color;
        let color = RGBColor(r, g, b);
        match series.style {
            SeriesStyle::Bar => {
                let bars = series.values.iter().enumerate().filter_map(|(i, v)| {
                    v.map(|v| {
                        let x = i as f64;
                        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, v)], color.filled())
                    })
                });
                plot.draw_series(bars)?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 14, y + 4)], color.filled()));
            }
            // dashed envelopes are drawn as thin solid strokes
            SeriesStyle::Line | SeriesStyle::Dashed => {
                let style = color.stroke_width(series.width);
                for (k, segment) in defined_segments(&series.values).into_iter().enumerate() {
                    let annotation = plot.draw_series(LineSeries::new(segment, style))?;
                    if k == 0 {
                        annotation
                            .label(series.name.as_str())
                            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], style));
                    }
                }
            }
        }
    }

    plot.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT_FAMILY, 12).into_font())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// Runs of consecutive defined points as `(index, value)` pairs
pub fn defined_segments(values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value.filter(|v| v.is_finite()) {
            Some(v) => current.push((i as f64, v)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Padded vertical range covering every finite value (and zero for bars)
pub fn value_bounds(chart: &Chart) -> Option<(f64, f64)> {
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for series in &chart.series {
        if series.style == SeriesStyle::Bar {
            low = low.min(0.0);
            high = high.max(0.0);
        }
        for v in series.values.iter().flatten().filter(|v| v.is_finite()) {
            low = low.min(*v);
            high = high.max(*v);
        }
    }
    if !low.is_finite() || !high.is_finite() {
        return None;
    }
    if (high - low).abs() < f64::EPSILON {
        return Some((low - 1.0, high + 1.0));
    }
    let pad = (high - low) * 0.05;
    Some((low - pad, high + pad))
}
