//! Database connection management
//!
//! Each process opens its own connection to the shared store file; the file
//! (plus its WAL/SHM companions) is the only resource shared across
//! processes. Concurrent commits are serialized by SQLite itself.

use crate::error::{Error, Result};
use crate::paths::StoreLocation;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::history::HistoryReconciler;
use super::migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database wrapper owning one process's connection to the store
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    location: StoreLocation,
}

impl Database {
    /// Open the store at the given path, creating it if it doesn't exist.
    ///
    /// If the existing file cannot be opened (corruption, schema damage),
    /// the store and its `-wal`/`-shm` companions are deleted and opening is
    /// retried exactly once. The retry failing is surfaced as
    /// [`Error::Unrecoverable`]; there is no further retry loop. Silent data
    /// loss on reset is the accepted tradeoff for availability.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match Self::open_at(path) {
            Ok(conn) => Ok(Self {
                conn,
                location: StoreLocation::OnDisk(path.to_path_buf()),
            }),
            Err(error) => {
                tracing::warn!("Failed to open store at {}: {error}", path.display());
                reset_store_files(path);

                let conn = Self::open_at(path)
                    .map_err(|retry_error| Error::Unrecoverable(retry_error.to_string()))?;
                tracing::info!("Recovered store at {} after reset", path.display());
                Ok(Self {
                    conn,
                    location: StoreLocation::OnDisk(path.to_path_buf()),
                })
            }
        }
    }

    /// Open an ephemeral in-memory store (tests, unresolvable container).
    ///
    /// In-memory stores never attempt recovery; an open failure here is
    /// final.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        migrations::run(&conn)?;
        Ok(Self {
            conn,
            location: StoreLocation::InMemory,
        })
    }

    /// Open the store at a resolved location
    pub fn open_at_location(location: &StoreLocation) -> Result<Self> {
        match location {
            StoreLocation::OnDisk(path) => Self::open(path),
            StoreLocation::InMemory => Self::open_in_memory(),
        }
    }

    fn open_at(path: &Path) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        configure(&conn)?;
        migrations::run(&conn)?;
        Ok(conn)
    }

    /// Where this database lives
    pub const fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// SQLite's cross-connection change counter.
    ///
    /// The value changes whenever another connection commits to the same
    /// file, so a long-running reader can poll it to learn that a re-query
    /// is worthwhile.
    pub fn data_version(&self) -> Result<i64> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA data_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Change-history reconciler for the given client name.
    ///
    /// Each consumer keeps a durable cursor under its own name, so pending
    /// cross-process changes survive process restarts.
    pub fn history(&self, client: impl Into<String>) -> HistoryReconciler<'_> {
        HistoryReconciler::new(&self.conn, client)
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Configure SQLite for multi-process access
fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    // WAL so the app and the share surface can commit through independent
    // connections; this query also fails fast on a file that is not a
    // database, which is what routes a corrupt store into recovery.
    conn.query_row("PRAGMA journal_mode = WAL", [], |row| {
        row.get::<_, String>(0)
    })?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

/// Delete the store file and its WAL/SHM companions at the given location.
///
/// Used only as the recovery step when opening fails: the existing store is
/// treated as unrecoverable and a fresh one is started. Missing files are
/// fine; anything else is logged and left for the retry to surface.
pub fn reset_store_files(path: &Path) {
    let mut files = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut companion = path.as_os_str().to_os_string();
        companion.push(suffix);
        files.push(PathBuf::from(companion));
    }

    for file in files {
        match std::fs::remove_file(&file) {
            Ok(()) => tracing::debug!("Removed store file {}", file.display()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!("Could not remove store file {}: {error}", file.display());
            }
        }
    }
}
