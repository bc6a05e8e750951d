//! CSV export and re-import of the derived table

use chrono::NaiveDate;

use crate::error::DashboardError;
use crate::models::{Column, DerivedRow, DerivedTable};

/// Header row then one record per table row. Undefined values are empty cells.
pub fn write_csv(table: &DerivedTable) -> Result<Vec<u8>, DashboardError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(Column::headers())?;
    for row in &table.rows {
        writer.write_record(Column::ALL.iter().map(|&c| row.cell(c).to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| DashboardError::ExportFailure(format!("csv: {}", e)))
}

/// Parse a buffer produced by [`write_csv`] back into a table.
///
/// Columns are matched by header name, so their order does not matter, but
/// every column of the derived table must be present.
pub fn read_csv(bytes: &[u8]) -> Result<DerivedTable, DashboardError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut positions = Vec::with_capacity(Column::ALL.len());
    for column in Column::ALL {
        let index = headers
            .iter()
            .position(|h| h == column.header())
            .ok_or_else(|| parse_error(format!("missing column {}", column.header())))?;
        positions.push((column, index));
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let field = |column: Column| {
            let index = positions
                .iter()
                .find(|(c, _)| *c == column)
                .map(|(_, i)| *i)
                .unwrap_or_default();
            record.get(index).unwrap_or("").trim()
        };
        let row = parse_row(&field).map_err(|e| parse_error(format!("row {}: {}", line + 1, e)))?;
        rows.push(row);
    }
    Ok(DerivedTable::new(rows))
}

fn parse_row<'a>(field: &dyn Fn(Column) -> &'a str) -> Result<DerivedRow, String> {
    let required = |c: Column| -> Result<f64, String> {
        field(c)
            .parse::<f64>()
            .map_err(|_| format!("{} is not a number: '{}'", c.header(), field(c)))
    };
    let optional = |c: Column| -> Result<Option<f64>, String> {
        match field(c) {
            "" => Ok(None),
            text => text
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("{} is not a number: '{}'", c.header(), text)),
        }
    };

    Ok(DerivedRow {
        date: NaiveDate::parse_from_str(field(Column::Date), "%Y-%m-%d")
            .map_err(|_| format!("bad date '{}'", field(Column::Date)))?,
        open: required(Column::Open)?,
        high: required(Column::High)?,
        low: required(Column::Low)?,
        close: required(Column::Close)?,
        volume: field(Column::Volume)
            .parse::<u64>()
            .map_err(|_| format!("Volume is not an integer: '{}'", field(Column::Volume)))?,
        bb_ma: optional(Column::BbMa)?,
        bb_upper: optional(Column::BbUpper)?,
        bb_lower: optional(Column::BbLower)?,
        macd: required(Column::Macd)?,
        signal: required(Column::Signal)?,
        histogram: required(Column::Histogram)?,
        ma50: optional(Column::Ma50)?,
        ma200: optional(Column::Ma200)?,
    })
}

fn parse_error(message: String) -> DashboardError {
    DashboardError::ExportFailure(format!("csv import: {}", message))
}
