//! # madang-store
//!
//! Cache-coherent read/write query layer over the madang SQLite database
//! (Customer, Orders, Book). The UI collaborator renders forms and tables;
//! this crate is the layer it calls for every read and write.
//!
//! ## Core Types
//!
//! - **[`MadangStore`]**: Context object owning the shared handle and the
//!   read-query cache; the entry point for every operation
//! - **[`MadangTable`]**: The three externally-owned tables and their fixed
//!   dump queries
//! - **[`AdHocOutcome`]**: Result of routing free-form user SQL
//! - **[`Error`]**: Error type for store operations
//!
//! ## Coherence policy
//!
//! Fixed read queries are cached by statement text with a TTL (default 60s).
//! Any successful mutation invalidates the entire cache generation — coarse
//! and table-oblivious, so there is no staleness window after a write, only
//! before one. Ad-hoc reads bypass the cache entirely. Failed mutations
//! leave the cache untouched.

mod cache;
mod decode;
mod error;
mod executor;
mod ident;
mod router;
mod store;

pub use cache::{CacheStats, DEFAULT_TTL, QueryCache};
pub use decode::{MadangRow, RowSet};
pub use error::{Error, Result};
pub use executor::WriteResult;
pub use ident::next_id;
pub use router::{AdHocOutcome, StatementKind, classify};
pub use store::{DB_FILE_PATH, MadangStore, MadangTable};
