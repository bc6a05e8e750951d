//! Spreadsheet export: one sheet with the same layout as the CSV

use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use crate::error::DashboardError;
use crate::models::{Cell, Column, DerivedTable};

pub const SHEET_NAME: &str = "data";

pub fn write_xlsx(table: &DerivedTable) -> Result<Vec<u8>, DashboardError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, column) in Column::ALL.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column.header(), &header_format)?;
    }
    worksheet.set_column_width(0, 12.0)?;

    for (i, row) in table.rows.iter().enumerate() {
        let excel_row = (i + 1) as u32;
        for (col, &column) in Column::ALL.iter().enumerate() {
            let col = col as u16;
            match row.cell(column) {
                Cell::Date(date) => {
                    let value = ExcelDateTime::from_ymd(
                        date.year() as u16,
                        date.month() as u8,
                        date.day() as u8,
                    )?;
                    worksheet.write_datetime_with_format(excel_row, col, &value, &date_format)?;
                }
                Cell::Number(v) => {
                    worksheet.write_number(excel_row, col, v)?;
                }
                Cell::Integer(v) => {
                    worksheet.write_number(excel_row, col, v as f64)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
