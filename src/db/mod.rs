//! SQLite persistence for diary entries, the trash, settings and token usage.
//!
//! Connections come from an r2d2 pool; every connection is configured with the
//! same pragmas when it is acquired. A `Database` also holds an exclusive lock
//! on a sibling `.lock` file for as long as it lives, so two mindtalk processes
//! never write the same diary at once.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Active entry operations
//! - `trash`: Soft delete, restore and purge
//! - `settings`: Key/value app settings
//! - `usage`: Cumulative token usage counter
//!
//! # Example
//!
//! ```no_run
//! use mindtalk::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/mindtalk_diary.db"))?;
//! db.initialize_schema()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod schema;
pub mod settings;
pub mod trash;
pub mod usage;

use crate::constants::SQLITE_BUSY_TIMEOUT_MS;
use crate::errors::{AppResult, DatabaseError};
use fs2::FileExt;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    // Held for the lifetime of the handle; the OS releases it on drop.
    _lock: WriterLock,
}

impl Database {
    /// Opens or creates the diary database at `db_path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory or lock file cannot be created
    /// - Another process holds the writer lock (`DatabaseError::Busy`)
    /// - The connection pool cannot be initialized
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let lock = WriterLock::acquire(db_path)?;

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout_ms: SQLITE_BUSY_TIMEOUT_MS,
            }))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        // Fail early if the file is not a usable database
        let conn = pool.get().map_err(DatabaseError::Pool)?;
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(DatabaseError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool, _lock: lock })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool.get().map_err(|e| DatabaseError::Pool(e).into())
    }

    /// Creates all tables and indexes if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

/// Exclusive advisory lock on `<db>.lock`.
struct WriterLock {
    file: File,
    path: PathBuf,
}

impl WriterLock {
    fn acquire(db_path: &Path) -> AppResult<Self> {
        let mut lock_name = db_path.as_os_str().to_owned();
        lock_name.push(".lock");
        let path = PathBuf::from(lock_name);

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            warn!("Writer lock already held: {:?}", path);
            return Err(DatabaseError::Busy { path }.into());
        }

        debug!("Acquired writer lock {:?}", path);
        Ok(Self { file, path })
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!("Failed to release writer lock {:?}: {}", self.path, e);
        }
    }
}

/// Connection customizer applying durability pragmas.
#[derive(Debug)]
struct ConnectionPragmas {
    busy_timeout_ms: u64,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.pragma_update(None, "busy_timeout", self.busy_timeout_ms)?;
        // FULL: every acknowledged write must survive a crash
        conn.pragma_update(None, "synchronous", 2)?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}
