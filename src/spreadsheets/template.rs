use crate::errors::AppError;
use crate::spreadsheets::headers::CANONICAL_TITLES;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// Adds `.xlsx` unless the path already ends with it (any case).
pub fn template_path(path: &Path) -> PathBuf {
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));

    if is_xlsx {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".xlsx");
        PathBuf::from(name)
    }
}

/// Writes an empty input workbook containing only the canonical header row.
pub fn dump_template(path: &Path) -> Result<PathBuf, AppError> {
    let target = template_path(path);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();
    for (col, (title, _)) in CANONICAL_TITLES.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    workbook.save(&target)?;

    Ok(target)
}
