//! regdesk-state — embedded record store for regdesk.
//!
//! Backed by [redb](https://docs.rs/redb), provides persistent and in-memory
//! storage for registrations, the ticket sequence, and uploaded files.
//!
//! # Architecture
//!
//! Registrations and file metadata are JSON-serialized into redb's `&[u8]`
//! value columns, keyed by their UUID. Ticket numbers come from a counter
//! row that is incremented in the same write transaction as the insert, so
//! a ticket is never handed out twice.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and is constructed once by the daemon and shared across handlers.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::StateStore;
pub use types::*;
