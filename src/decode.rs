//! Row decoding and parameter binding between SQLite and JSON values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteRow, SqliteValueRef};
use sqlx::{Column, Row, TypeInfo, Value, ValueRef};

use crate::error::{Error, Result};

/// A single record: column name to typed JSON value, in query column order.
pub type MadangRow = IndexMap<String, JsonValue>;

/// An ordered sequence of records, as the glossary defines a RowSet.
pub type RowSet = Vec<MadangRow>;

/// Convert one SQLite value to JSON.
///
/// NULL maps to null, INTEGER to a JSON number (i64 precision preserved),
/// REAL to f64, TEXT and the datetime affinities to strings, and BLOB to a
/// base64 string. Anything else is an [`Error::UnsupportedDatatype`].
pub(crate) fn to_json(value: SqliteValueRef<'_>) -> Result<JsonValue> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let owned = ValueRef::to_owned(&value);
   match owned.type_info().name() {
      "TEXT" | "DATE" | "TIME" | "DATETIME" => {
         let s: String = owned.try_decode()?;
         Ok(JsonValue::String(s))
      }
      "INTEGER" | "NUMERIC" => {
         let n: i64 = owned.try_decode()?;
         Ok(JsonValue::Number(n.into()))
      }
      "BOOLEAN" => {
         // Stored as an integer; surfaced the same way
         let b: bool = owned.try_decode()?;
         Ok(JsonValue::Number(i64::from(b).into()))
      }
      "REAL" => {
         let f: f64 = owned.try_decode()?;
         Ok(serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null))
      }
      "BLOB" => {
         let bytes: Vec<u8> = owned.try_decode()?;
         Ok(JsonValue::String(BASE64.encode(bytes)))
      }
      other => Err(Error::UnsupportedDatatype(other.to_string())),
   }
}

/// Decode SQLite rows to JSON, preserving column order.
pub(crate) fn decode_rows(rows: Vec<SqliteRow>) -> Result<RowSet> {
   let mut values = Vec::with_capacity(rows.len());
   for row in rows {
      let mut value = IndexMap::default();
      for (i, column) in row.columns().iter().enumerate() {
         let v = row.try_get_raw(i)?;
         let v = to_json(v)?;
         value.insert(column.name().to_string(), v);
      }
      values.push(value);
   }
   Ok(values)
}

/// Bind a JSON value to a SQLx query as a positional parameter.
pub(crate) fn bind_value<'a>(
   query: sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>>,
   value: JsonValue,
) -> sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>> {
   match value {
      JsonValue::Null => query.bind(None::<JsonValue>),
      JsonValue::String(s) => query.bind(s),
      JsonValue::Number(number) => {
         // Preserve integer precision by binding as i64 when possible
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else if let Some(uint_val) = number.as_u64() {
            if uint_val <= i64::MAX as u64 {
               query.bind(uint_val as i64)
            } else {
               // Value too large for i64, use f64 (will lose precision)
               query.bind(uint_val as f64)
            }
         } else {
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      other => query.bind(other),
   }
}
