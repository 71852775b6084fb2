use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, ErrorCode, params};
use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::model::PhraseRecord;
use crate::util::now_utc_string;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(i64),
    AlreadyExists,
    Failed(String),
}

pub trait PhraseStore {
    fn create(&mut self, record: &PhraseRecord) -> CreateOutcome;

    fn find_texts(&self) -> Result<Vec<String>, StoreError>;

    fn find_all(&self) -> Result<Vec<PhraseRecord>, StoreError>;

    fn count(&self) -> Result<i64, StoreError>;

    fn disconnect(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

pub struct SqlitePhraseStore {
    connection: Connection,
}

impl SqlitePhraseStore {
    pub fn connect(db_path: &Path) -> Result<Self, StoreError> {
        let connection = Connection::open(db_path).map_err(|source| StoreError::Connection {
            path: db_path.to_path_buf(),
            source,
        })?;
        let store = Self { connection };
        store
            .configure()
            .and_then(|()| store.ensure_schema())
            .map_err(|source| StoreError::Connection {
                path: db_path.to_path_buf(),
                source,
            })?;
        info!(path = %db_path.display(), "connected to phrase store");
        Ok(store)
    }

    #[cfg(test)]
    pub fn connect_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory()?;
        let store = Self { connection };
        store.ensure_schema()?;
        Ok(store)
    }

    fn configure(&self) -> rusqlite::Result<()> {
        self.connection.pragma_update(None, "journal_mode", "WAL")?;
        self.connection.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(())
    }

    fn ensure_schema(&self) -> rusqlite::Result<()> {
        self.connection.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS phrases (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              text TEXT NOT NULL UNIQUE CHECK (length(text) > 0),
              translation TEXT NOT NULL DEFAULT '',
              created_at TEXT NOT NULL
            );
            ",
        )
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

impl PhraseStore for SqlitePhraseStore {
    fn create(&mut self, record: &PhraseRecord) -> CreateOutcome {
        let result = self.connection.execute(
            "INSERT INTO phrases(text, translation, created_at) VALUES (?1, ?2, ?3)",
            params![record.text, record.translation, now_utc_string()],
        );

        match result {
            Ok(_) => CreateOutcome::Created(self.connection.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => CreateOutcome::AlreadyExists,
            Err(err) => CreateOutcome::Failed(err.to_string()),
        }
    }

    fn find_texts(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .connection
            .prepare("SELECT text FROM phrases ORDER BY id")?;
        let texts = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(texts)
    }

    fn find_all(&self) -> Result<Vec<PhraseRecord>, StoreError> {
        let mut stmt = self
            .connection
            .prepare("SELECT text, translation FROM phrases ORDER BY id")?;
        let records = stmt
            .query_map([], |row| {
                Ok(PhraseRecord {
                    text: row.get(0)?,
                    translation: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn count(&self) -> Result<i64, StoreError> {
        let count = self
            .connection
            .query_row("SELECT COUNT(*) FROM phrases", [], |row| row.get(0))?;
        Ok(count)
    }

    fn disconnect(self) -> Result<(), StoreError> {
        self.connection
            .close()
            .map_err(|(_, err)| StoreError::Disconnect(err))?;
        debug!("released phrase store connection");
        Ok(())
    }
}

/// Runs `operation` against `store`, then releases the store exactly once,
/// whether or not the operation succeeded.
pub fn with_store<S, T, F>(mut store: S, operation: F) -> Result<T>
where
    S: PhraseStore,
    F: FnOnce(&mut S) -> Result<T>,
{
    let outcome = operation(&mut store);
    let released = store.disconnect();

    match (outcome, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(release_err)) => {
            warn!(error = %release_err, "failed to release phrase store after error");
            Err(err)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertCounts {
    pub created: usize,
    pub existing: usize,
    pub failed: usize,
}

impl UpsertCounts {
    fn record(&mut self, index: usize, record: &PhraseRecord, outcome: &CreateOutcome) {
        match outcome {
            CreateOutcome::Created(id) => {
                self.created += 1;
                debug!(index, id, phrase = %record.text, "phrase created");
            }
            CreateOutcome::AlreadyExists => {
                self.existing += 1;
                info!(index, phrase = %record.text, "phrase already exists");
            }
            CreateOutcome::Failed(reason) => {
                self.failed += 1;
                error!(index, phrase = %record.text, reason = %reason, "failed to store phrase");
            }
        }
    }

    fn reject(&mut self, index: usize, reason: &str) {
        self.failed += 1;
        warn!(index, reason = %reason, "skipping invalid import entry");
    }
}

pub fn upsert_records<S: PhraseStore>(store: &mut S, records: &[PhraseRecord]) -> UpsertCounts {
    let mut counts = UpsertCounts::default();
    for (index, record) in records.iter().enumerate() {
        let outcome = store.create(record);
        counts.record(index, record, &outcome);
    }

    info!(
        created = counts.created,
        existing = counts.existing,
        failed = counts.failed,
        "phrase store upsert finished"
    );
    counts
}

pub fn import_entries<S: PhraseStore>(
    store: &mut S,
    entries: &[Result<PhraseRecord, String>],
) -> UpsertCounts {
    let mut counts = UpsertCounts::default();
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Ok(record) => {
                let outcome = store.create(record);
                counts.record(index, record, &outcome);
            }
            Err(reason) => counts.reject(index, reason),
        }
    }

    info!(
        created = counts.created,
        existing = counts.existing,
        failed = counts.failed,
        "phrase import finished"
    );
    counts
}
