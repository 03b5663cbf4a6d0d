//! Next-identifier suggestion for append-only tables.
//!
//! `next_id` is a read-then-suggest pattern: it scans the current maximum
//! and proposes `max + 1`. It takes no lock and reserves nothing, so two
//! callers between the same mutation boundary will be handed the same value
//! and the second insert will fail on the table's primary-key check — that
//! check, not this function, is the authoritative uniqueness enforcement.

use madang_conn_mgr::Database;
use tracing::debug;

use crate::error::{Error, Result};

/// Validate that an identifier is safe for SQL interpolation.
///
/// Accepts names matching `[a-zA-Z_][a-zA-Z0-9_.]*`, which covers plain
/// table/column names, qualified names (e.g., `table.column`), and
/// underscored identifiers.
pub(crate) fn validate_identifier(name: &str) -> Result<()> {
   let mut chars = name.chars();

   let Some(first) = chars.next() else {
      return Err(Error::InvalidIdentifier {
         name: name.to_string(),
      });
   };
   if !first.is_ascii_alphabetic() && first != '_' {
      return Err(Error::InvalidIdentifier {
         name: name.to_string(),
      });
   }

   for ch in chars {
      if !ch.is_ascii_alphanumeric() && ch != '_' && ch != '.' {
         return Err(Error::InvalidIdentifier {
            name: name.to_string(),
         });
      }
   }

   Ok(())
}

/// Quote an identifier with double-quote delimiters.
///
/// Any embedded double quotes are doubled per SQL standard (`"` → `""`).
pub(crate) fn quote_identifier(name: &str) -> String {
   format!("\"{}\"", name.replace('"', "\"\""))
}

/// Suggest the next integer primary key for `table`.
///
/// Runs `SELECT COALESCE(MAX(id_column), 0) + 1`, so an empty table yields 1.
/// Not concurrency-safe; see the module docs.
pub async fn next_id(db: &Database, table: &str, id_column: &str) -> Result<i64> {
   validate_identifier(table)?;
   validate_identifier(id_column)?;

   let sql = format!(
      "SELECT COALESCE(MAX({}), 0) + 1 FROM {}",
      quote_identifier(id_column),
      quote_identifier(table),
   );

   let next: i64 = sqlx::query_scalar(&sql)
      .fetch_one(db.pool())
      .await
      .map_err(|source| Error::Statement {
         sql: sql.clone(),
         source,
      })?;

   debug!(table, id_column, next, "suggested next id");
   Ok(next)
}

#[cfg(test)]
mod tests {
   use super::*;

   // ─── validate_identifier ───

   #[test]
   fn identifier_valid_simple() {
      assert!(validate_identifier("custid").is_ok());
      assert!(validate_identifier("Orders").is_ok());
      assert!(validate_identifier("_private").is_ok());
      assert!(validate_identifier("col_123").is_ok());
   }

   #[test]
   fn identifier_valid_qualified() {
      assert!(validate_identifier("Orders.orderid").is_ok());
   }

   #[test]
   fn identifier_rejects_empty() {
      assert!(validate_identifier("").is_err());
   }

   #[test]
   fn identifier_rejects_injection() {
      assert!(validate_identifier("Orders; DROP TABLE Customer --").is_err());
      assert!(validate_identifier("orderid)--").is_err());
      assert!(validate_identifier("1bad").is_err());
      assert!(validate_identifier("col name").is_err());
   }

   // ─── quote_identifier ───

   #[test]
   fn quote_identifier_simple() {
      assert_eq!(quote_identifier("orderid"), r#""orderid""#);
   }

   #[test]
   fn quote_identifier_doubles_embedded_quotes() {
      assert_eq!(quote_identifier(r#"a"b"#), r#""a""b""#);
   }
}
