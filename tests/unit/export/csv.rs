//! Unit tests for CSV export

use chrono::{Duration, NaiveDate};
use stockscope::export::{read_csv, write_csv, ExportFormat, ExportPipeline};
use stockscope::indicators::IndicatorEngine;
use stockscope::models::{DerivedTable, OhlcvRow};
use stockscope::DashboardError;

fn create_test_table(count: usize) -> DerivedTable {
    let start = NaiveDate::from_ymd_opt(2022, 8, 1).unwrap();
    let rows: Vec<OhlcvRow> = (0..count)
        .map(|i| {
            let close = 1450.0 + (i as f64 * 0.7).sin() * 20.0;
            OhlcvRow::new(
                close - 3.25,
                close + 5.5,
                close - 6.75,
                close,
                250_000 + i as u64 * 17,
                (start + Duration::days(i as i64)).and_hms_opt(0, 0, 0).unwrap(),
            )
        })
        .collect();
    IndicatorEngine::default().compute(&rows)
}

#[test]
fn test_header_row() {
    let bytes = write_csv(&create_test_table(3)).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(
        text.lines().next().unwrap(),
        "Date,Open,High,Low,Close,Volume,BB_MA,BB_upper,BB_lower,MACD,Signal,Histogram,MA50,MA200"
    );
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn test_undefined_values_are_empty_cells() {
    let bytes = write_csv(&create_test_table(1)).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let record: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();

    assert_eq!(record[0], "2022-08-01");
    assert_eq!(record[6], "");
    assert_eq!(record[9], "0");
    assert_eq!(record[12], "");
    assert_eq!(record[13], "");
}

#[test]
fn test_reimport_reproduces_table() {
    let table = create_test_table(60);
    let bytes = write_csv(&table).unwrap();
    assert_eq!(read_csv(&bytes).unwrap(), table);
}

#[test]
fn test_empty_table_has_header_only() {
    let bytes = write_csv(&DerivedTable::default()).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(read_csv(text.as_bytes()).unwrap().is_empty());
}

#[test]
fn test_missing_column_is_rejected() {
    let err = read_csv(b"Date,Open\n2024-01-01,1\n").unwrap_err();
    assert!(matches!(err, DashboardError::ExportFailure(_)));
}

#[test]
fn test_pipeline_names_the_download() {
    let artifact = ExportPipeline::csv("INFY.BO", &create_test_table(5)).unwrap();
    assert_eq!(artifact.format, ExportFormat::Csv);
    assert_eq!(artifact.file_name, "INFY.BO_filtered.csv");
    assert_eq!(artifact.content_type(), "text/csv");
    assert!(!artifact.bytes.is_empty());
}

#[test]
fn test_format_parsing() {
    assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
    assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
    assert!("docx".parse::<ExportFormat>().is_err());
    assert_eq!(ExportFormat::Pdf.file_name("TCS.NS"), "TCS.NS_report.pdf");
    assert_eq!(ExportFormat::Xlsx.file_name("TCS.NS"), "TCS.NS_filtered.xlsx");
}
