//! redb table definitions for the regdesk state store.
//!
//! Document tables use `&str` keys (UUIDs) and `&[u8]` values (JSON).
//! Upload bytes live in their own table so listing metadata never pulls
//! file contents.

use redb::TableDefinition;

/// Registrations keyed by `{id}`.
pub const REGISTRATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("registrations");

/// Named monotonically increasing counters.
pub const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Uploaded file metadata keyed by `{upload_id}`.
pub const UPLOADS: TableDefinition<&str, &[u8]> = TableDefinition::new("uploads");

/// Raw uploaded file contents keyed by `{upload_id}`.
pub const UPLOAD_BLOBS: TableDefinition<&str, &[u8]> = TableDefinition::new("upload_blobs");

/// Counter row backing ticket numbers.
pub const TICKET_COUNTER: &str = "ticket";

/// Counter value before the first ticket is issued; the first ticket is 211550.
pub const TICKET_SEQ_START: u64 = 211_549;
