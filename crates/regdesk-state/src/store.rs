//! StateStore — redb-backed persistence for regdesk.
//!
//! Provides typed CRUD operations over registrations, the ticket
//! sequence, and uploaded files. Documents are JSON-serialized into
//! redb's `&[u8]` value columns. The store supports both on-disk and
//! in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe state store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(REGISTRATIONS).map_err(map_err!(Table))?;
        txn.open_table(COUNTERS).map_err(map_err!(Table))?;
        txn.open_table(UPLOADS).map_err(map_err!(Table))?;
        txn.open_table(UPLOAD_BLOBS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Registrations ──────────────────────────────────────────────

    /// Validate and insert a new registration, assigning its id and the
    /// next ticket number in one write transaction.
    pub fn create_registration(&self, draft: RegistrationDraft) -> StateResult<Registration> {
        draft.validate()?;

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let registration;
        {
            let mut counters = txn.open_table(COUNTERS).map_err(map_err!(Table))?;
            let current = counters
                .get(TICKET_COUNTER)
                .map_err(map_err!(Read))?
                .map(|guard| guard.value())
                .unwrap_or(TICKET_SEQ_START);
            let ticket_no = current + 1;
            counters
                .insert(TICKET_COUNTER, ticket_no)
                .map_err(map_err!(Write))?;

            registration = draft.into_registration(new_id(), ticket_no, Utc::now());
            let value = serde_json::to_vec(&registration).map_err(map_err!(Serialize))?;

            let mut table = txn.open_table(REGISTRATIONS).map_err(map_err!(Table))?;
            table
                .insert(registration.table_key(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(id = %registration.id, ticket_no = ?registration.ticket_no, "registration created");
        Ok(registration)
    }

    /// Get a registration by id.
    pub fn get_registration(&self, id: &str) -> StateResult<Option<Registration>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(REGISTRATIONS).map_err(map_err!(Table))?;
        match table.get(id).map_err(map_err!(Read))? {
            Some(guard) => {
                let reg: Registration =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(reg))
            }
            None => Ok(None),
        }
    }

    /// Get the registrations for `ids`, in the order given. Unknown and
    /// repeated ids are skipped.
    pub fn get_registrations(&self, ids: &[String]) -> StateResult<Vec<Registration>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(REGISTRATIONS).map_err(map_err!(Table))?;
        let mut results: Vec<Registration> = Vec::with_capacity(ids.len());
        for id in ids {
            if results.iter().any(|r| &r.id == id) {
                continue;
            }
            if let Some(guard) = table.get(id.as_str()).map_err(map_err!(Read))? {
                let reg: Registration =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                results.push(reg);
            }
        }
        Ok(results)
    }

    /// List all registrations, newest first.
    pub fn list_registrations(&self) -> StateResult<Vec<Registration>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(REGISTRATIONS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let reg: Registration =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(reg);
        }
        results.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.ticket_no.cmp(&a.ticket_no))
        });
        Ok(results)
    }

    /// Set status (and the derived expiry flag). Returns `None` if the id
    /// is unknown.
    pub fn update_status(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> StateResult<Option<Registration>> {
        update.validate()?;
        self.modify_registration(id, |reg| {
            reg.set_status(update.status);
            Ok(())
        })
    }

    /// Apply a partial edit. Returns `None` if the id is unknown.
    pub fn patch_registration(
        &self,
        id: &str,
        patch: &RegistrationPatch,
    ) -> StateResult<Option<Registration>> {
        self.modify_registration(id, |reg| patch.apply(reg))
    }

    /// Set the same status on every id in one write transaction. If any id
    /// is unknown nothing is written and `NotFound` is returned.
    pub fn update_status_batch(
        &self,
        ids: &[String],
        update: &StatusUpdate,
    ) -> StateResult<Vec<Registration>> {
        update.validate()?;
        let now = Utc::now();

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let mut updated: Vec<Registration> = Vec::with_capacity(ids.len());
        {
            let mut table = txn.open_table(REGISTRATIONS).map_err(map_err!(Table))?;
            for id in ids {
                if updated.iter().any(|r| &r.id == id) {
                    continue;
                }
                let bytes = table
                    .get(id.as_str())
                    .map_err(map_err!(Read))?
                    .map(|guard| guard.value().to_vec())
                    .ok_or_else(|| StateError::NotFound(id.clone()))?;
                let mut reg: Registration =
                    serde_json::from_slice(&bytes).map_err(map_err!(Deserialize))?;
                reg.set_status(update.status);
                reg.updated_at = now;

                let value = serde_json::to_vec(&reg).map_err(map_err!(Serialize))?;
                table
                    .insert(id.as_str(), value.as_slice())
                    .map_err(map_err!(Write))?;
                updated.push(reg);
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(count = updated.len(), status = %update.status, "batch status applied");
        Ok(updated)
    }

    /// Delete a registration by id. Returns true if it existed.
    pub fn delete_registration(&self, id: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(REGISTRATIONS).map_err(map_err!(Table))?;
            existed = table.remove(id).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%id, existed, "registration deleted");
        Ok(existed)
    }

    /// Read-modify-write a single registration inside one write transaction.
    fn modify_registration<F>(&self, id: &str, f: F) -> StateResult<Option<Registration>>
    where
        F: FnOnce(&mut Registration) -> StateResult<()>,
    {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let result;
        {
            let mut table = txn.open_table(REGISTRATIONS).map_err(map_err!(Table))?;
            let bytes = table
                .get(id)
                .map_err(map_err!(Read))?
                .map(|guard| guard.value().to_vec());
            let Some(bytes) = bytes else {
                return Ok(None);
            };

            let mut reg: Registration =
                serde_json::from_slice(&bytes).map_err(map_err!(Deserialize))?;
            f(&mut reg)?;
            reg.updated_at = Utc::now();

            let value = serde_json::to_vec(&reg).map_err(map_err!(Serialize))?;
            table.insert(id, value.as_slice()).map_err(map_err!(Write))?;
            result = reg;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%id, "registration updated");
        Ok(Some(result))
    }

    // ── Uploads ────────────────────────────────────────────────────

    /// Store a file and return its metadata.
    pub fn put_file(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> StateResult<StoredFile> {
        if filename.trim().is_empty() {
            return Err(StateError::Invalid("filename is required".to_string()));
        }
        let meta = StoredFile {
            id: new_id(),
            filename: filename.trim().to_string(),
            content_type: content_type.to_string(),
            size: bytes.len() as u64,
            created_at: Utc::now(),
        };
        let value = serde_json::to_vec(&meta).map_err(map_err!(Serialize))?;

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut uploads = txn.open_table(UPLOADS).map_err(map_err!(Table))?;
            uploads
                .insert(meta.id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
            let mut blobs = txn.open_table(UPLOAD_BLOBS).map_err(map_err!(Table))?;
            blobs
                .insert(meta.id.as_str(), bytes)
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(id = %meta.id, size = meta.size, "file stored");
        Ok(meta)
    }

    /// Get a stored file's metadata and contents.
    pub fn get_file(&self, id: &str) -> StateResult<Option<(StoredFile, Vec<u8>)>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let uploads = txn.open_table(UPLOADS).map_err(map_err!(Table))?;
        let meta: StoredFile = match uploads.get(id).map_err(map_err!(Read))? {
            Some(guard) => serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?,
            None => return Ok(None),
        };
        let blobs = txn.open_table(UPLOAD_BLOBS).map_err(map_err!(Table))?;
        let bytes = blobs
            .get(id)
            .map_err(map_err!(Read))?
            .map(|guard| guard.value().to_vec())
            .ok_or_else(|| StateError::NotFound(format!("contents of upload {id}")))?;
        Ok(Some((meta, bytes)))
    }
}
