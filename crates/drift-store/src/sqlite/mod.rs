//! `SQLite` backend for the context store.
//!
//! - **[`connection`]**: `r2d2` connection pool with WAL mode, foreign
//!   keys, and performance pragmas applied to every connection.
//! - **[`migrations`]**: version-tracked schema evolution; migrations are
//!   embedded at compile time and run transactionally.
//! - **[`row_types`]**: raw database row structs for `rusqlite` mapping.
//! - **[`repositories`]**: stateless repository fns that take a
//!   `&Connection` and execute SQL. No shared mutable state.

pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod row_types;

pub use connection::{ConnectionConfig, ConnectionPool, PooledConnection, new_file, new_in_memory};
pub use migrations::{current_version, latest_version, run_migrations};
