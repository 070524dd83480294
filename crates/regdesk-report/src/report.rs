use std::fmt;
use std::str::FromStr;

use regdesk_state::Registration;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::{pdf, xlsx};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DEFAULT_PDF_TITLE: &str = "Training Registrations Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => PDF_CONTENT_TYPE,
            ExportFormat::Excel => XLSX_CONTENT_TYPE,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            other => Err(format!("invalid format '{other}' (expected pdf or excel)")),
        }
    }
}

/// Knobs that come from the daemon config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub pdf_title: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            pdf_title: DEFAULT_PDF_TITLE.to_string(),
        }
    }
}

/// A finished document ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct Report {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl Report {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Build a report of `records` in their given order.
pub fn build_report(
    records: &[Registration],
    format: ExportFormat,
    options: &ReportOptions,
) -> ReportResult<Report> {
    if records.is_empty() {
        return Err(ReportError::NoData);
    }

    let bytes = match format {
        ExportFormat::Excel => xlsx::render_xlsx(records)?,
        ExportFormat::Pdf => pdf::render_pdf(&options.pdf_title, records)?,
    };

    Ok(Report {
        bytes,
        content_type: format.content_type(),
        filename: format!("registrations.{}", format.extension()),
    })
}
