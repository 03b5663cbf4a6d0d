//! SQLite database with a single shared read-write handle

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// SQLite database wrapping one long-lived read-write handle.
///
/// ## Architecture
///
/// A single-connection pool (`max_connections = 1`) stands in for the raw
/// handle: every read and write statement in the process runs against the
/// same underlying session, serialized by the pool checkout. Callers borrow
/// the pool through [`Database::pool`] and never close it — the handle is
/// released at process exit.
///
/// ## Usage Pattern
///
/// ```text
/// 1. Connect once, early in the process (Arc<Database>)
/// 2. Every component borrows &Database and runs statements on pool()
/// 3. Drop at process exit — no explicit close
/// ```
#[derive(Debug)]
pub struct Database {
   /// Single read-write connection pool (max_connections=1)
   pool: Pool<Sqlite>,

   /// Path to the database file
   path: PathBuf,
}

impl Database {
   /// Open the database file and return the shared handle.
   ///
   /// A failed open (missing file, lock held by another process, corrupt
   /// header) yields [`Error::Open`] with the path and underlying cause.
   /// Dependent components must treat that as service-unavailable for the
   /// rest of the process.
   pub async fn connect(
      path: impl AsRef<Path>,
      custom_config: Option<DatabaseConfig>,
   ) -> Result<Arc<Self>> {
      let config = custom_config.unwrap_or_default();
      let path = path.as_ref().to_path_buf();

      let options = SqliteConnectOptions::new()
         .filename(&path)
         .create_if_missing(config.create_if_missing)
         .busy_timeout(config.busy_timeout);

      let pool = SqlitePoolOptions::new()
         .max_connections(1)
         .connect_with(options)
         .await
         .map_err(|source| Error::Open {
            path: path.clone(),
            source,
         })?;

      debug!(path = %path.display(), "Opened madang database");

      Ok(Arc::new(Self { pool, path }))
   }

   /// Open using a connection URL string (e.g. `sqlite::memory:`).
   ///
   /// Exists mainly for tests; production callers use [`Database::connect`]
   /// with a file path.
   pub async fn connect_url(url: &str) -> Result<Arc<Self>> {
      let options = SqliteConnectOptions::from_str(url).map_err(|source| Error::Open {
         path: PathBuf::from(url),
         source,
      })?;

      let pool = SqlitePoolOptions::new()
         .max_connections(1)
         .connect_with(options)
         .await
         .map_err(|source| Error::Open {
            path: PathBuf::from(url),
            source,
         })?;

      Ok(Arc::new(Self {
         pool,
         path: PathBuf::from(url),
      }))
   }

   /// Borrow the shared connection pool.
   ///
   /// All statements — reads, writes, DDL — go through this pool. With one
   /// connection, checkout order is the only in-process serialization; a
   /// `SELECT MAX` followed by an `INSERT` is two separate checkouts and is
   /// not atomic.
   pub fn pool(&self) -> &Pool<Sqlite> {
      &self.pool
   }

   /// Path of the database file this handle was opened on.
   pub fn path(&self) -> &Path {
      &self.path
   }
}
