//! Configuration for opening the madang database

use std::time::Duration;

/// Configuration for [`Database`](crate::Database) open behavior
///
/// # Examples
///
/// ```
/// use madang_conn_mgr::DatabaseConfig;
/// use std::time::Duration;
///
/// // Use defaults
/// let config = DatabaseConfig::default();
///
/// // Customize specific fields
/// let config = DatabaseConfig {
///     create_if_missing: true,
///     busy_timeout: Duration::from_secs(10),
/// };
///
/// // Override just one field
/// let config = DatabaseConfig {
///     create_if_missing: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
   /// Whether to create the database file if it does not exist
   ///
   /// The production madang file is provisioned externally, so a missing
   /// file is an error by default. Tests and seed tooling turn this on.
   ///
   /// Default: false
   pub create_if_missing: bool,

   /// How long a statement waits on a locked database before failing
   ///
   /// The single shared handle serializes in-process callers, but another
   /// process holding the file lock still surfaces as SQLITE_BUSY.
   ///
   /// Default: 5 seconds
   pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
   fn default() -> Self {
      Self {
         create_if_missing: false,
         busy_timeout: Duration::from_secs(5),
      }
   }
}
