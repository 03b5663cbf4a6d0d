/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for madang store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// Error from the connection manager.
   #[error(transparent)]
   ConnectionManager(#[from] madang_conn_mgr::Error),

   /// A single statement failed at the engine (constraint violation, syntax
   /// error, type mismatch). Carries the original statement text so the end
   /// user can correct the input — surfacing the text is part of the
   /// contract, not just a log line.
   #[error("statement failed: {source}; statement: {sql}")]
   Statement {
      sql: String,
      #[source]
      source: sqlx::Error,
   },

   /// Ad-hoc input was blank after trimming; no engine round-trip attempted.
   #[error("query text is empty")]
   EmptyQuery,

   /// SQLite type that cannot be mapped to JSON.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),

   /// Table or column name contains invalid characters.
   ///
   /// Identifiers interpolated into SQL must match
   /// `[a-zA-Z_][a-zA-Z0-9_.]*` (letters, digits, underscores, and dots for
   /// qualified names like `table.column`).
   #[error("invalid identifier '{name}': must match [a-zA-Z_][a-zA-Z0-9_.]*")]
   InvalidIdentifier { name: String },

   /// Table name is not one of the madang tables.
   #[error("unknown table: {0}")]
   UnknownTable(String),
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) | Error::Statement { source: e, .. } => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::ConnectionManager(_) => "CONNECTION_ERROR".to_string(),
         Error::EmptyQuery => "EMPTY_QUERY".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
         Error::InvalidIdentifier { .. } => "INVALID_IDENTIFIER".to_string(),
         Error::UnknownTable(_) => "UNKNOWN_TABLE".to_string(),
      }
   }
}
