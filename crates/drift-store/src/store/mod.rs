//! High-level store API over the `SQLite` backend.

pub mod change_signal;
pub mod context_store;

pub use change_signal::ChangeSignal;
pub use context_store::{ContextPatch, ContextStore};
