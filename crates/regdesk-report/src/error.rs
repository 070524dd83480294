use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no data to export")]
    NoData,

    #[error("xlsx error: {0}")]
    Xlsx(String),

    #[error("pdf error: {0}")]
    Pdf(String),
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::Xlsx(e.to_string())
    }
}

impl From<lopdf::Error> for ReportError {
    fn from(e: lopdf::Error) -> Self {
        ReportError::Pdf(e.to_string())
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
