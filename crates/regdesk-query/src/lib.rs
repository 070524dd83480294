//! regdesk-query — the read side of the registration table.
//!
//! Pure functions over `&[Registration]`: text search, status and date
//! range filtering, collation-aware sorting, pagination, and the
//! aggregates behind the dashboard KPI cards and charts. Nothing here
//! touches the store; callers load records and hand them in.

pub mod collate;
pub mod error;
pub mod filter;
pub mod page;
pub mod params;
pub mod sort;
pub mod stats;

pub use error::QueryError;
pub use filter::{DatePreset, RegistrationQuery, StatusFilter};
pub use page::{Page, paginate};
pub use params::QueryParams;
pub use sort::SortKey;
pub use stats::{MonthlyCount, StatusSummary, monthly_counts};
