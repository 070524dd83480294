use regdesk_state::Registration;
use rust_xlsxwriter::{Format, Workbook};

use crate::columns::{COLUMNS, Cell};
use crate::error::ReportResult;

pub const SHEET_NAME: &str = "Registrations";

/// Write `records` to a single-sheet workbook: a bold header row, then one
/// row per record in the order given.
pub fn render_xlsx(records: &[Registration]) -> ReportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, column) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, column.title, &header)?;
        sheet.set_column_width(col, column_width(column.title))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, column) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            match (column.value)(record) {
                Cell::Text(text) => {
                    sheet.write_string(row, col, text)?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row, col, n)?;
                }
                Cell::Empty => {}
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(rows = records.len(), bytes = bytes.len(), "rendered xlsx");
    Ok(bytes)
}

fn column_width(title: &str) -> f64 {
    (title.len() as f64 + 4.0).max(14.0)
}
