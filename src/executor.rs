//! Mutation execution against the shared handle.

use madang_conn_mgr::Database;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::decode::bind_value;
use crate::error::{Error, Result};

/// Result returned from write operations (e.g. INSERT, UPDATE, DELETE).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResult {
   /// The number of rows affected by the write operation.
   pub rows_affected: u64,
   /// The last inserted row ID (SQLite ROWID).
   ///
   /// Only set for INSERT operations on tables with a ROWID.
   pub last_insert_id: i64,
}

/// Execute exactly one parameterized statement.
///
/// No retry, no transaction wrapping — the only atomicity is what the single
/// statement itself provides. On failure the returned [`Error::Statement`]
/// carries the original statement text; invalidating the read cache on
/// success is the caller's responsibility so that a failed write leaves the
/// cache untouched.
pub(crate) async fn run_statement(
   db: &Database,
   sql: &str,
   params: Vec<JsonValue>,
) -> Result<WriteResult> {
   let mut q = sqlx::query(sql);
   for value in params {
      q = bind_value(q, value);
   }

   let result = q.execute(db.pool()).await.map_err(|source| {
      warn!(sql, error = %source, "statement failed");
      Error::Statement {
         sql: sql.to_string(),
         source,
      }
   })?;

   debug!(sql, rows_affected = result.rows_affected(), "statement executed");

   Ok(WriteResult {
      rows_affected: result.rows_affected(),
      last_insert_id: result.last_insert_rowid(),
   })
}
