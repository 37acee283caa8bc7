//! Persistent record of everything currently in the rubbish bin.
//!
//! The journal maps an item name (the object's name inside the container) to
//! its [`MetaData`]. It is backed by a redb database living in
//! `<container>/.journal/journal.redb` and is the single source of truth for
//! what the bin holds.
//!
//! Every mutating call is its own write transaction and touches one key
//! (except [`Journal::clear`]). There are no multi-key transactions: keeping
//! the journal and the container in step is up to the engines.
//!
//! # Example
//!
//! ```ignore
//! use rubbish::journal::Journal;
//!
//! let journal = Journal::open("/home/me/.local/share/rubbish/.journal")?;
//! journal.add("notes.txt_K3J9QZ", Path::new("notes.txt"), 30)?;
//! for record in journal.filter_wipeable()? {
//!     println!("{}", record.item);
//! }
//! journal.close()?;
//! ```

mod types;


pub use types::{ItemType, MetaData, SECS_PER_DAY};

use crate::error::{Error, Result};
use crate::paths;
use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable};
use std::path::{Path, PathBuf};
use types::JOURNAL_TABLE;

/// Name of the journal directory inside the container.
pub const JOURNAL_DIR: &str = ".journal";

/// Database file inside [`JOURNAL_DIR`].
const JOURNAL_FILE: &str = "journal.redb";

/// Handle to the on-disk journal.
///
/// Created unloaded with [`Journal::new`]; every operation other than
/// [`Journal::load`] and [`Journal::close`] fails with
/// [`Error::StoreUnavailable`] until the store is loaded.
pub struct Journal {
    path: PathBuf,
    db: Option<Database>,
}

impl Journal {
    /// Creates an unloaded handle for the journal directory at `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            db: None,
        }
    }

    /// Creates a handle and loads it in one step.
    ///
    /// # Errors
    ///
    /// See [`Journal::load`].
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let mut journal = Self::new(path);
        journal.load()?;
        Ok(journal)
    }

    /// Opens or creates the backing store.
    ///
    /// Loading an already loaded journal is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if:
    /// - The journal path is empty
    /// - The journal directory cannot be created
    /// - The database cannot be opened (permissions, corruption, held by another process)
    /// - The journal table cannot be initialized
    pub fn load(&mut self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(self.unavailable("journal path is not set"));
        }
        if self.db.is_some() {
            return Ok(());
        }

        std::fs::create_dir_all(&self.path)
            .map_err(|e| self.unavailable(format!("cannot create journal directory: {e}")))?;

        let db_path = self.path.join(JOURNAL_FILE);
        let db = Database::create(&db_path)
            .map_err(|e| self.unavailable(format!("cannot open journal database: {e}")))?;

        // Create the table up front so read transactions never miss it
        let write_txn = db
            .begin_write()
            .map_err(|e| self.unavailable(format!("cannot begin initialization: {e}")))?;
        {
            let _table = write_txn
                .open_table(JOURNAL_TABLE)
                .map_err(|e| self.unavailable(format!("cannot initialize journal table: {e}")))?;
        }
        write_txn
            .commit()
            .map_err(|e| self.unavailable(format!("cannot commit initialization: {e}")))?;

        tracing::debug!(path = %db_path.display(), "Journal loaded");
        self.db = Some(db);
        Ok(())
    }

    /// Directory holding the journal database.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.db.is_some()
    }

    /// Releases the backing store. Safe to call on a journal that was never loaded.
    ///
    /// Commits are already durable; nothing is flushed here.
    ///
    /// # Errors
    ///
    /// Currently infallible.
    pub fn close(&mut self) -> Result<()> {
        if self.db.take().is_some() {
            tracing::debug!(path = %self.path.display(), "Journal closed");
        }
        Ok(())
    }

    fn unavailable(&self, reason: impl Into<String>) -> Error {
        Error::StoreUnavailable {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn db(&self) -> Result<&Database> {
        self.db
            .as_ref()
            .ok_or_else(|| self.unavailable("journal is not loaded"))
    }

    /// Records a freshly tossed object.
    ///
    /// `origin` is made absolute and `.`/`..` are resolved lexically (symlinks
    /// are not followed), the object type
    /// is read from its current filesystem state without following symlinks,
    /// and the toss time is stamped as now. An existing record with the same
    /// `item` key is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin cannot be made absolute, the journal is
    /// not loaded, or the write transaction fails.
    pub fn add(&self, item: &str, origin: &Path, wipeout_days: u32) -> Result<MetaData> {
        let origin = paths::absolute(origin).map_err(|e| {
            Error::filesystem(
                format!("cannot resolve absolute path of {}", origin.display()),
                e,
            )
        })?;

        let record = MetaData {
            item: item.to_string(),
            kind: ItemType::of_path(&origin),
            origin,
            wipeout_time: wipeout_days,
            tossed_time: Utc::now().timestamp(),
        };

        self.insert(&record)?;
        Ok(record)
    }

    /// Writes `record` exactly as given, overwriting any record with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal is not loaded, the record cannot be
    /// encoded, or the write transaction fails.
    pub fn insert(&self, record: &MetaData) -> Result<()> {
        let db = self.db()?;
        let item = record.item.as_str();

        let json = serde_json::to_vec(record).map_err(|e| Error::Codec {
            item: item.to_string(),
            source: e,
        })?;

        let write_txn = db
            .begin_write()
            .map_err(|e| Error::journal_write(item, e))?;
        {
            let mut table = write_txn
                .open_table(JOURNAL_TABLE)
                .map_err(|e| Error::journal_write(item, e))?;

            table
                .insert(item, json.as_slice())
                .map_err(|e| Error::journal_write(item, e))?;
        }
        write_txn
            .commit()
            .map_err(|e| Error::journal_write(item, e))?;

        tracing::debug!(item, origin = %record.origin.display(), "Journal record written");
        Ok(())
    }

    /// Looks up a record, returning `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal is not loaded, the read fails, or the
    /// stored record is malformed.
    pub fn find(&self, item: &str) -> Result<Option<MetaData>> {
        let db = self.db()?;

        let read_txn = db.begin_read().map_err(Error::journal_read)?;
        let table = read_txn
            .open_table(JOURNAL_TABLE)
            .map_err(Error::journal_read)?;

        match table.get(item).map_err(Error::journal_read)? {
            Some(guard) => {
                let record = serde_json::from_slice(guard.value()).map_err(|e| Error::Codec {
                    item: item.to_string(),
                    source: e,
                })?;
                Ok(Some(record))
            },
            None => Ok(None),
        }
    }

    /// Looks up a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has this key, or any error of
    /// [`Journal::find`].
    pub fn get(&self, item: &str) -> Result<MetaData> {
        self.find(item)?.ok_or_else(|| Error::not_found(item))
    }

    /// All records, ordered lexicographically by item name.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal is not loaded, the read fails, or any
    /// stored record is malformed ([`Error::Codec`] naming its key).
    pub fn list(&self) -> Result<Vec<MetaData>> {
        let (records, malformed) = self.list_lenient()?;
        match malformed.into_iter().next() {
            Some((item, source)) => Err(Error::Codec { item, source }),
            None => Ok(records),
        }
    }

    /// Like [`Journal::list`], but malformed records are returned by key
    /// alongside the decode error instead of failing the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal is not loaded or the read fails.
    pub fn list_lenient(&self) -> Result<(Vec<MetaData>, Vec<(String, serde_json::Error)>)> {
        let db = self.db()?;

        let read_txn = db.begin_read().map_err(Error::journal_read)?;
        let table = read_txn
            .open_table(JOURNAL_TABLE)
            .map_err(Error::journal_read)?;

        let mut records = Vec::new();
        let mut malformed = Vec::new();
        for entry in table.iter().map_err(Error::journal_read)? {
            let (key, value) = entry.map_err(Error::journal_read)?;
            match serde_json::from_slice::<MetaData>(value.value()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(item = key.value(), error = %e, "Malformed journal record");
                    malformed.push((key.value().to_string(), e));
                },
            }
        }

        Ok((records, malformed))
    }

    /// Records whose origin directory lies inside `dir`'s subtree.
    ///
    /// # Errors
    ///
    /// Same as [`Journal::list`].
    pub fn filter_path(&self, dir: &Path) -> Result<Vec<MetaData>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| record.is_within(dir))
            .collect())
    }

    /// Records whose retention period has elapsed.
    ///
    /// # Errors
    ///
    /// Same as [`Journal::list`].
    pub fn filter_wipeable(&self) -> Result<Vec<MetaData>> {
        let now = Utc::now().timestamp();
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| record.is_wipeable_at(now))
            .collect())
    }

    /// Removes a record.
    ///
    /// Returns `Ok(true)` if the record existed, `Ok(false)` if it didn't.
    /// Idempotent - deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal is not loaded or the write fails.
    pub fn delete(&self, item: &str) -> Result<bool> {
        let db = self.db()?;

        let write_txn = db
            .begin_write()
            .map_err(|e| Error::journal_write(item, e))?;
        let removed = {
            let mut table = write_txn
                .open_table(JOURNAL_TABLE)
                .map_err(|e| Error::journal_write(item, e))?;

            table
                .remove(item)
                .map_err(|e| Error::journal_write(item, e))?
                .is_some()
        };
        write_txn
            .commit()
            .map_err(|e| Error::journal_write(item, e))?;

        tracing::debug!(item, removed, "Journal record deleted");
        Ok(removed)
    }

    /// Removes every record, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal is not loaded or the write fails.
    pub fn clear(&self) -> Result<usize> {
        let db = self.db()?;

        let write_txn = db
            .begin_write()
            .map_err(|e| Error::journal_write("*", e))?;
        let removed = {
            let mut table = write_txn
                .open_table(JOURNAL_TABLE)
                .map_err(|e| Error::journal_write("*", e))?;

            let mut keys = Vec::new();
            for entry in table.iter().map_err(|e| Error::journal_write("*", e))? {
                let (key, _) = entry.map_err(|e| Error::journal_write("*", e))?;
                keys.push(key.value().to_string());
            }

            for key in &keys {
                table
                    .remove(key.as_str())
                    .map_err(|e| Error::journal_write(key.as_str(), e))?;
            }
            keys.len()
        };
        write_txn
            .commit()
            .map_err(|e| Error::journal_write("*", e))?;

        tracing::info!(removed, "Journal cleared");
        Ok(removed)
    }

    /// Number of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal is not loaded or the read fails.
    pub fn count(&self) -> Result<usize> {
        let db = self.db()?;

        let read_txn = db.begin_read().map_err(Error::journal_read)?;
        let table = read_txn
            .open_table(JOURNAL_TABLE)
            .map_err(Error::journal_read)?;

        let mut count = 0;
        for entry in table.iter().map_err(Error::journal_read)? {
            entry.map_err(Error::journal_read)?;
            count += 1;
        }
        Ok(count)
    }

    /// Total bytes of encoded record values.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal is not loaded or the read fails.
    pub fn size(&self) -> Result<u64> {
        let db = self.db()?;

        let read_txn = db.begin_read().map_err(Error::journal_read)?;
        let table = read_txn
            .open_table(JOURNAL_TABLE)
            .map_err(Error::journal_read)?;

        let mut size = 0u64;
        for entry in table.iter().map_err(Error::journal_read)? {
            let (_, value) = entry.map_err(Error::journal_read)?;
            size += value.value().len() as u64;
        }
        Ok(size)
    }
}

impl Drop for Journal {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
impl Journal {
    /// Stores `bytes` under `item` without encoding, for corrupt-record tests.
    pub(crate) fn insert_raw(&self, item: &str, bytes: &[u8]) {
        let db = self.db().unwrap();
        let write_txn = db.begin_write().unwrap();
        {
            let mut table = write_txn.open_table(JOURNAL_TABLE).unwrap();
            table.insert(item, bytes).unwrap();
        }
        write_txn.commit().unwrap();
    }
}
