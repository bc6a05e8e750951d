//! PDF report: title, generation time, chart image (or a note) and the last
//! rows of the derived table.
//!
//! The page content is decided by [`ReportLayout::build`]; [`render_pdf`]
//! only places it on A4 pages.

use chrono::NaiveDateTime;
use image::{GenericImageView, ImageFormat};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point,
};
use tracing::warn;

use crate::charts::{ChartImage, RenderedImage};
use crate::error::DashboardError;
use crate::models::{Column, DerivedTable};

pub const SUMMARY_ROWS: usize = 5;
pub const MAX_CELL_CHARS: usize = 18;
const TRUNCATED_CHARS: usize = 15;
const ELLIPSIS: &str = "...";
pub const IMAGE_NOTE: &str = "Chart image not available. The data summary follows.";
pub const SUMMARY_HEADING: &str = "Data summary (last 5 rows):";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const TOP_MARGIN: f32 = 15.0;
const BOTTOM_MARGIN: f32 = 15.0;
const IMAGE_WIDTH: f32 = 190.0;
const COLUMN_WIDTH: f32 = 28.0;
const ROW_HEIGHT: f32 = 6.0;
const PT_TO_MM: f32 = 0.3528;

/// Cap a cell at 18 characters: longer text keeps 15 and gains "..."
pub fn truncate_cell(text: &str) -> String {
    if text.chars().count() > MAX_CELL_CHARS {
        let mut short: String = text.chars().take(TRUNCATED_CHARS).collect();
        short.push_str(ELLIPSIS);
        short
    } else {
        text.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportImage {
    Chart(RenderedImage),
    Note(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    pub generated: String,
    pub image: ReportImage,
    pub summary_heading: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportLayout {
    pub fn build(
        ticker: &str,
        table: &DerivedTable,
        image: &ChartImage,
        generated_at: NaiveDateTime,
    ) -> Self {
        let image = match image {
            ChartImage::Rendered(rendered) => ReportImage::Chart(rendered.clone()),
            ChartImage::Unavailable(_) => ReportImage::Note(IMAGE_NOTE.to_string()),
        };
        let headers = Column::ALL
            .iter()
            .map(|c| truncate_cell(c.header()))
            .collect();
        let rows = table
            .tail(SUMMARY_ROWS)
            .iter()
            .map(|row| {
                Column::ALL
                    .iter()
                    .map(|&c| truncate_cell(&row.cell(c).to_string()))
                    .collect()
            })
            .collect();

        Self {
            title: format!("Stock Report - {}", ticker),
            generated: format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
            image,
            summary_heading: SUMMARY_HEADING.to_string(),
            headers,
            rows,
        }
    }

    pub fn has_chart(&self) -> bool {
        matches!(self.image, ReportImage::Chart(_))
    }

    /// Column indexes per printed block; each block fits the printable width
    pub fn column_groups(&self) -> Vec<Vec<usize>> {
        let per_group = ((PAGE_WIDTH - 2.0 * MARGIN) / COLUMN_WIDTH).floor().max(1.0) as usize;
        (0..self.headers.len())
            .collect::<Vec<_>>()
            .chunks(per_group)
            .map(|chunk| chunk.to_vec())
            .collect()
    }
}

fn pdf_error<E: std::fmt::Debug>(e: E) -> DashboardError {
    DashboardError::ExportFailure(format!("pdf: {:?}", e))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

/// Vertical write position, starting a new page when content would cross
/// the bottom margin
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PageCursor<'_> {
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < BOTTOM_MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - TOP_MARGIN;
        }
    }

    fn text(&mut self, text: &str, size: f32, font: &IndirectFontRef, x: f32, line_height: f32) {
        self.ensure_space(line_height);
        let baseline = self.y - line_height + (line_height - size * PT_TO_MM) / 2.0;
        self.layer.use_text(text, size, Mm(x), Mm(baseline), font);
        self.y -= line_height;
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn cell(&self, x: f32, text: &str, font: &IndirectFontRef, size: f32) {
        let top = self.y;
        let bottom = self.y - ROW_HEIGHT;
        let corners = [
            (x, top),
            (x + COLUMN_WIDTH, top),
            (x + COLUMN_WIDTH, bottom),
            (x, bottom),
        ];
        self.layer.add_line(Line {
            points: corners
                .iter()
                .map(|&(px, py)| (Point::new(Mm(px), Mm(py)), false))
                .collect(),
            is_closed: true,
        });
        self.layer
            .use_text(text, size, Mm(x + 1.0), Mm(bottom + 1.8), font);
    }
}

/// Approximate Helvetica text width, for centering
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

pub fn render_pdf(layout: &ReportLayout) -> Result<Vec<u8>, DashboardError> {
    let (doc, page, layer) =
        PdfDocument::new(layout.title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
        italic: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_error)?,
    };

    {
        let mut cursor = PageCursor {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT - TOP_MARGIN,
        };
        draw_report(&mut cursor, layout, &fonts);
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn draw_report(cursor: &mut PageCursor<'_>, layout: &ReportLayout, fonts: &Fonts) {
    let title_x = ((PAGE_WIDTH - text_width(&layout.title, 14.0)) / 2.0).max(MARGIN);
    cursor.text(&layout.title, 14.0, &fonts.bold, title_x, 8.0);
    cursor.gap(4.0);
    cursor.text(&layout.generated, 10.0, &fonts.regular, MARGIN, 6.0);
    cursor.gap(6.0);

    let note = match &layout.image {
        ReportImage::Chart(rendered) => (!embed_chart(cursor, rendered)).then_some(IMAGE_NOTE),
        ReportImage::Note(note) => Some(note.as_str()),
    };
    if let Some(note) = note {
        cursor.text(note, 10.0, &fonts.italic, MARGIN, 5.0);
    }
    cursor.gap(6.0);

    cursor.text(&layout.summary_heading, 12.0, &fonts.bold, MARGIN, 8.0);
    for group in layout.column_groups() {
        cursor.ensure_space(ROW_HEIGHT * (layout.rows.len() + 1) as f32);
        for (slot, &col) in group.iter().enumerate() {
            let x = MARGIN + slot as f32 * COLUMN_WIDTH;
            cursor.cell(x, &layout.headers[col], &fonts.bold, 9.0);
        }
        cursor.gap(ROW_HEIGHT);
        for row in &layout.rows {
            for (slot, &col) in group.iter().enumerate() {
                let x = MARGIN + slot as f32 * COLUMN_WIDTH;
                let value = row.get(col).map(String::as_str).unwrap_or("");
                cursor.cell(x, value, &fonts.regular, 9.0);
            }
            cursor.gap(ROW_HEIGHT);
        }
        cursor.gap(4.0);
    }
}

/// Place the chart full-width; `false` if the PNG cannot be decoded
fn embed_chart(cursor: &mut PageCursor<'_>, rendered: &RenderedImage) -> bool {
    let decoded = match image::load_from_memory_with_format(&rendered.png, ImageFormat::Png) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(error = %e, "Chart image could not be decoded, using text note");
            return false;
        }
    };
    let (width_px, height_px) = decoded.dimensions();
    if width_px == 0 || height_px == 0 {
        return false;
    }

    let dpi = width_px as f32 * 25.4 / IMAGE_WIDTH;
    let height_mm = height_px as f32 * 25.4 / dpi;
    cursor.ensure_space(height_mm);

    Image::from_dynamic_image(&decoded).add_to_layer(
        cursor.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(Mm(cursor.y - height_mm)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    cursor.y -= height_mm;
    true
}
