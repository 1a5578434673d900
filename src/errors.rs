// errors.rs
use crate::pipeline::RunAborted;
use crate::scraper::ScraperError;

/// Everything that can stop the command-line run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Aborted(#[from] RunAborted),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Sheet(#[from] calamine::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad input: {0}")]
    Input(String),
}
