use crate::errors::AppError;
use crate::pipeline::SearchRequest;
use crate::spreadsheets::headers::{column_of, index_fields, Field};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A sheet read from a workbook or CSV: the header row, the recognised columns,
/// and every data row verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSheet {
    pub header: Vec<String>,
    pub columns: BTreeMap<usize, Field>,
    pub rows: Vec<Vec<String>>,
}

/// True for extensions calamine opens (`xlsx`, `xlsm`, `xls`, `ods`).
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            ["xlsx", "xlsm", "xls", "ods"]
                .iter()
                .any(|w| e.eq_ignore_ascii_case(w))
        })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

impl InputSheet {
    /// Workbooks are read through their first worksheet, anything else as CSV.
    pub fn read(path: &Path) -> Result<Self, AppError> {
        if is_workbook(path) {
            Self::read_xlsx(path)
        } else {
            Self::read_csv(path)
        }
    }

    pub fn read_xlsx(path: &Path) -> Result<Self, AppError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Err(AppError::Input(format!("{} has no worksheet", path.display()))),
        };

        // calamine starts the range at the first used cell; pad back to A1 so
        // column positions match the file.
        let (first_row, first_col) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); first_row as usize];
        for row in range.rows() {
            let mut cells = vec![String::new(); first_col as usize];
            cells.extend(row.iter().map(cell_text));
            rows.push(cells);
        }
        debug!(path = %path.display(), rows = rows.len(), "read worksheet");

        Self::from_rows(rows)
    }

    pub fn read_csv(path: &Path) -> Result<Self, AppError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Self::from_rows(rows)
    }

    /// The first row is the header; it must name a search column.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, AppError> {
        let mut rows = rows.into_iter();

        let header: Vec<String> = match rows.next() {
            Some(row) => row.iter().map(|c| c.trim().to_string()).collect(),
            None => return Err(AppError::Input("the sheet has no header row".into())),
        };

        let columns = index_fields(&header);
        if column_of(&columns, Field::SearchContent).is_none() {
            return Err(AppError::Input(format!(
                "no column matching \"{}\" in header {:?}",
                Field::SearchContent.title(),
                header
            )));
        }

        Ok(Self {
            header,
            columns,
            rows: rows.collect(),
        })
    }

    fn cell(&self, row: &[String], field: Field) -> Option<String> {
        column_of(&self.columns, field)
            .and_then(|i| row.get(i))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// One request per data row, blank ones included so rows and requests stay aligned.
    pub fn requests(&self, min_price: Option<f64>, max_price: Option<f64>) -> Vec<SearchRequest> {
        self.rows
            .iter()
            .map(|row| {
                let content = self.cell(row, Field::SearchContent).unwrap_or_default();
                let mut request = SearchRequest::new(content).with_bounds(min_price, max_price);
                request.level = self.cell(row, Field::Level);
                request
            })
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.requests(None, None)
            .iter()
            .filter(|r| !r.is_blank())
            .count()
    }
}
