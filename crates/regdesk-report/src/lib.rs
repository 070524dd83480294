//! regdesk-report — turns an ordered list of registrations into a
//! downloadable document.
//!
//! Two formats are supported: an xlsx workbook with one row per record
//! (see [`columns::COLUMNS`] for the header table) and a plain A4 PDF with
//! one labelled block per record. Both are built fully in memory.

pub mod columns;
pub mod error;
pub mod pdf;
pub mod report;
pub mod xlsx;

pub use error::{ReportError, ReportResult};
pub use report::{ExportFormat, Report, ReportOptions, build_report};
