//! Classification of ad-hoc user statements as reads or writes.
//!
//! The rule is a syntactic heuristic, kept deliberately naive: trim the
//! input, take the first whitespace-delimited token, uppercase it, compare
//! against `SELECT`. Anything else — including a CTE (`WITH … SELECT …`)
//! that ultimately reads — goes to the mutation path. The CTE case is a
//! known limitation of this classifier, not something it tries to fix: such
//! a statement executes as a write, discarding its rows.

use serde::Serialize;

use crate::decode::RowSet;
use crate::error::{Error, Result};
use crate::executor::WriteResult;

/// How an ad-hoc statement was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatementKind {
   /// First token is `SELECT`: executed on the read path, never cached.
   Read,
   /// Everything else: dispatched to the mutation executor.
   Write,
}

/// Outcome of routing an ad-hoc statement.
#[derive(Debug, Clone)]
pub enum AdHocOutcome {
   /// A read: the materialized result rows.
   Rows(RowSet),
   /// A write (or anything classified as one): the execution summary.
   Write(WriteResult),
}

/// Classify raw user text.
///
/// Blank input (after trimming) is [`Error::EmptyQuery`] and never reaches
/// the engine.
pub fn classify(raw: &str) -> Result<StatementKind> {
   let trimmed = raw.trim();
   if trimmed.is_empty() {
      return Err(Error::EmptyQuery);
   }

   let first = trimmed
      .split_whitespace()
      .next()
      .unwrap_or_default();

   if first.eq_ignore_ascii_case("SELECT") {
      Ok(StatementKind::Read)
   } else {
      Ok(StatementKind::Write)
   }
}
