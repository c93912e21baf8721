//! # drift-store
//!
//! The single source of truth for [`drift_core::Context`] records.
//!
//! - **`SQLite` backend**: `rusqlite` behind an `r2d2` pool, WAL mode,
//!   version-tracked migrations, and a stateless repository layer.
//! - **[`ContextStore`]**: read/query operations plus guarded mutation:
//!   create, partial-patch update, active-context switching, memory
//!   append/replace, thread markers, archival.
//! - **Change signal**: an in-process broadcast fired after every
//!   committed mutation, consumed by display collaborators.
//!
//! Each context is one row: a few duplicated scalar columns for indexed
//! queries plus the authoritative serialized document payload.

#![deny(unsafe_code)]

pub mod errors;
pub mod sqlite;
pub mod store;

pub use errors::{Result, StoreError};
pub use store::{ChangeSignal, ContextPatch, ContextStore};
