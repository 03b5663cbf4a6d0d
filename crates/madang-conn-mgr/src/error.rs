//! Error types for madang-conn-mgr

use std::path::PathBuf;

use thiserror::Error;

/// Errors that may occur when working with madang-conn-mgr
#[derive(Error, Debug)]
pub enum Error {
   /// The database file could not be opened. Carries the path and the
   /// underlying engine error so callers can report the cause.
   #[error("cannot open database file {path}: {source}")]
   Open {
      path: PathBuf,
      #[source]
      source: sqlx::Error,
   },

   /// IO error when accessing database files. Standard library IO errors
   /// are converted to this variant.
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   /// Error from the sqlx library. Standard sqlx errors are converted to this variant
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
