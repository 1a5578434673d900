use crate::errors::AppError;
use crate::pipeline::OutputRecord;
use crate::spreadsheets::headers::{column_of, Field, RESULT_FIELDS};
use crate::spreadsheets::input_sheet::InputSheet;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Header and field positions of the report: the input columns, then any missing result columns.
pub fn report_layout(sheet: &InputSheet) -> (Vec<String>, BTreeMap<usize, Field>) {
    let mut header = sheet.header.clone();
    let mut columns = sheet.columns.clone();

    for field in RESULT_FIELDS {
        if column_of(&columns, field).is_none() {
            columns.insert(header.len(), field);
            header.push(field.title().to_string());
        }
    }

    (header, columns)
}

/// An `.xlsx` input is updated in place; anything else gets a `.xlsx` next to it.
pub fn default_report_path(input: &Path) -> PathBuf {
    let is_xlsx = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));

    if is_xlsx {
        input.to_path_buf()
    } else {
        input.with_extension("xlsx")
    }
}

/// Copies an input cell, keeping numbers numeric.
fn write_copied(worksheet: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), AppError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => {
            worksheet.write_number(row, col, n)?;
        }
        _ => {
            worksheet.write_string(row, col, value)?;
        }
    }
    Ok(())
}

fn write_optional(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
) -> Result<(), AppError> {
    if let Some(v) = value {
        worksheet.write_number(row, col, v)?;
    }
    Ok(())
}

fn write_result(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    field: Field,
    record: &OutputRecord,
) -> Result<(), AppError> {
    match field {
        // Copied from the input row.
        Field::SearchContent | Field::Level => {}
        Field::Highest => write_optional(worksheet, row, col, record.highest())?,
        Field::Lowest => write_optional(worksheet, row, col, record.lowest())?,
        Field::Average => write_optional(worksheet, row, col, record.average())?,
        Field::Count => {
            worksheet.write_number(row, col, record.count() as f64)?;
        }
        Field::Source => {
            worksheet.write_string(row, col, &record.source)?;
        }
    }
    Ok(())
}

/// Writes the input sheet with its results merged in.
///
/// Records are matched to the non-blank rows in order, so `records` must come
/// from this sheet's requests. Cells in result columns are replaced, every
/// other cell is copied, with numeric text written as a number.
pub fn build_report(sheet: &InputSheet, records: &[OutputRecord]) -> Result<Workbook, AppError> {
    let (header, columns) = report_layout(sheet);
    let requests = sheet.requests(None, None);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, title) in header.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &bold)?;
    }

    let mut pending = records.iter();

    for (i, (row, request)) in sheet.rows.iter().zip(&requests).enumerate() {
        let r = (i + 1) as u32;
        let record = if request.is_blank() {
            None
        } else {
            pending.next()
        };

        for (col, value) in row.iter().enumerate() {
            let is_result_col = record.is_some()
                && columns
                    .get(&col)
                    .is_some_and(|f| RESULT_FIELDS.contains(f));
            if !value.is_empty() && !is_result_col {
                write_copied(worksheet, r, col as u16, value)?;
            }
        }

        if let Some(record) = record {
            for (col, field) in columns.iter().filter(|(_, f)| RESULT_FIELDS.contains(f)) {
                write_result(worksheet, r, *col as u16, *field, record)?;
            }
        }
    }

    if pending.next().is_some() {
        return Err(AppError::Input(format!(
            "{} records for {} searchable rows",
            records.len(),
            requests.iter().filter(|r| !r.is_blank()).count()
        )));
    }

    Ok(workbook)
}

pub fn export_report_xlsx(
    path: &Path,
    sheet: &InputSheet,
    records: &[OutputRecord],
) -> Result<(), AppError> {
    let mut workbook = build_report(sheet, records)?;
    workbook.save(path)?;
    Ok(())
}
