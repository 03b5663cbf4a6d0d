//! # madang-conn-mgr
//!
//! A minimal wrapper around SQLx that enforces the connection policy the
//! madang store relies on: one long-lived handle to the database file per
//! process, shared by every read and write path.
//!
//! ## Core Types
//!
//! - **[`Database`]**: Main database type owning the single-connection pool
//! - **[`DatabaseConfig`]**: Configuration for open behavior and timeouts
//! - **[`Error`]**: Error type for connection operations
//!
//! ## Architecture
//!
//! - **Single handle**: A one-connection pool (max_connections=1) so every
//!   statement runs against the same underlying session
//! - **Borrow, never close**: Components borrow the pool; none of them close
//!   it independently — the handle lives until process exit
//! - **Typed open failures**: A failed open carries the path and the
//!   underlying cause, and callers treat it as service-unavailable

mod config;
mod database;
mod error;

pub use config::DatabaseConfig;
pub use database::Database;
pub use error::{Error, Result};
