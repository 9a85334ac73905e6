//! Spreadsheet export: one row per record, one column per declared field.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::extraction::{DocumentType, ExtractionRecord};

pub fn write_spreadsheet(
    path: &Path,
    document_type: DocumentType,
    records: &[&ExtractionRecord],
) -> Result<(), XlsxError> {
    let columns = document_type.columns();
    let header = Format::new().set_bold();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(document_type.code())?;

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, name) in columns.iter().enumerate() {
            // Absent values stay blank cells.
            if let Some(value) = record.get(name) {
                worksheet.write_string(row, col as u16, value)?;
            }
        }
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}
