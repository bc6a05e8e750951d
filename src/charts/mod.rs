//! Chart capability: figure models built from a derived table and their
//! optional rasterization to PNG.

pub mod builder;
pub mod model;
pub mod raster;

pub use builder::{build_charts, ChartBuilder, FigureBuilder};
pub use model::{Chart, ChartKind, ChartOptions, Metric, Series, SeriesStyle, ViewMode};
pub use raster::{ChartImage, ChartRasterizer, NoopRasterizer, PlottersRasterizer, RenderedImage};
