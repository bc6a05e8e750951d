//! Unit tests for the PDF report

use std::io::Cursor;

use chrono::NaiveDate;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use stockscope::charts::{ChartImage, RenderedImage};
use stockscope::export::pdf::{IMAGE_NOTE, SUMMARY_HEADING};
use stockscope::export::{
    render_pdf, truncate_cell, ExportFormat, ExportPipeline, ReportImage, ReportLayout,
};
use stockscope::indicators::IndicatorEngine;
use stockscope::models::{DerivedTable, OhlcvRow};

fn create_test_table(count: usize) -> DerivedTable {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let rows: Vec<OhlcvRow> = (0..count)
        .map(|i| {
            let close = 100.0 + i as f64;
            OhlcvRow::new(
                close,
                close + 1.0,
                close - 1.0,
                close,
                1_000,
                (start + chrono::Duration::days(i as i64)).and_hms_opt(0, 0, 0).unwrap(),
            )
        })
        .collect();
    IndicatorEngine::default().compute(&rows)
}

fn generated_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 30)
        .unwrap()
        .and_hms_opt(18, 5, 9)
        .unwrap()
}

#[test]
fn test_truncate_cell_limits_to_eighteen_chars() {
    assert_eq!(truncate_cell("short"), "short");
    assert_eq!(truncate_cell("exactly18chars!!!!"), "exactly18chars!!!!");
    let long = truncate_cell("1234567890.123456789");
    assert_eq!(long, "1234567890.1234...");
    assert_eq!(long.chars().count(), 18);
}

#[test]
fn test_layout_contents() {
    let table = create_test_table(12);
    let layout = ReportLayout::build(
        "INFY.BO",
        &table,
        &ChartImage::Unavailable("disabled".into()),
        generated_at(),
    );

    assert_eq!(layout.title, "Stock Report - INFY.BO");
    assert_eq!(layout.generated, "Generated: 2024-06-30 18:05:09");
    assert_eq!(layout.summary_heading, SUMMARY_HEADING);
    assert_eq!(layout.headers.len(), 14);
    assert_eq!(layout.rows.len(), 5);
    assert_eq!(layout.rows[0][0], "2024-01-08");
    assert_eq!(layout.rows[4][0], "2024-01-12");
    assert!(layout
        .rows
        .iter()
        .flatten()
        .all(|cell| cell.chars().count() <= 18));
}

#[test]
fn test_unavailable_image_becomes_note() {
    let layout = ReportLayout::build(
        "INFY.BO",
        &create_test_table(3),
        &ChartImage::Unavailable("no font".into()),
        generated_at(),
    );
    assert!(!layout.has_chart());
    assert_eq!(layout.image, ReportImage::Note(IMAGE_NOTE.to_string()));
    assert_eq!(layout.rows.len(), 3);
}

#[test]
fn test_rendered_image_is_kept() {
    let image = RenderedImage {
        png: vec![1, 2, 3],
        width: 10,
        height: 5,
    };
    let layout = ReportLayout::build(
        "INFY.BO",
        &create_test_table(3),
        &ChartImage::Rendered(image),
        generated_at(),
    );
    assert!(layout.has_chart());
}

#[test]
fn test_columns_are_grouped_to_fit_the_page() {
    let layout = ReportLayout::build(
        "INFY.BO",
        &create_test_table(5),
        &ChartImage::Unavailable(String::new()),
        generated_at(),
    );
    let groups = layout.column_groups();
    assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 14);
    assert!(groups.iter().all(|g| g.len() <= 6));
    assert_eq!(groups[0][0], 0);
}

#[test]
fn test_render_produces_pdf_bytes() {
    let layout = ReportLayout::build(
        "INFY.BO",
        &create_test_table(30),
        &ChartImage::Unavailable(String::new()),
        generated_at(),
    );
    let bytes = render_pdf(&layout).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let pixels = RgbImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb([31, 119, 180])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
        .unwrap();
    png
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn test_rendered_chart_is_embedded_as_image() {
    let image = RenderedImage {
        png: create_test_png(120, 60),
        width: 120,
        height: 60,
    };
    let artifact = ExportPipeline::pdf(
        "INFY.BO",
        &create_test_table(30),
        &ChartImage::Rendered(image),
        generated_at(),
    )
    .unwrap();
    assert!(artifact.bytes.starts_with(b"%PDF"));
    assert!(contains(&artifact.bytes, b"/Image"));
}

#[test]
fn test_report_without_chart_has_no_image() {
    let artifact = ExportPipeline::pdf(
        "INFY.BO",
        &create_test_table(30),
        &ChartImage::Unavailable("disabled".into()),
        generated_at(),
    )
    .unwrap();
    assert!(!contains(&artifact.bytes, b"/Image"));
}

#[test]
fn test_undecodable_chart_falls_back_to_note() {
    let image = RenderedImage {
        png: b"not a png".to_vec(),
        width: 10,
        height: 5,
    };
    let artifact = ExportPipeline::pdf(
        "INFY.BO",
        &create_test_table(8),
        &ChartImage::Rendered(image),
        generated_at(),
    )
    .unwrap();
    assert!(artifact.bytes.starts_with(b"%PDF"));
}

#[test]
fn test_pipeline_names_the_report() {
    let artifact = ExportPipeline::pdf(
        "TCS.NS",
        &DerivedTable::default(),
        &ChartImage::Unavailable(String::new()),
        generated_at(),
    )
    .unwrap();
    assert_eq!(artifact.format, ExportFormat::Pdf);
    assert_eq!(artifact.file_name, "TCS.NS_report.pdf");
    assert_eq!(artifact.content_type(), "application/pdf");
}
