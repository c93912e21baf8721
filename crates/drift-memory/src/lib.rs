//! # drift-memory
//!
//! Memory consolidation for the Drift engine.
//!
//! Two pieces:
//!
//! - [`ShortTermBuffer`] — a bounded, most-recent-first window of raw file
//!   observations.
//! - [`consolidate`] — a deterministic, information-preserving merge that
//!   collapses memories referencing the same file into one
//!   higher-confidence memory.
//!
//! Consolidation never increases the memory count and never drops a tag,
//! reference, or content fragment. The store persists the result; this
//! crate never writes anywhere itself.

#![deny(unsafe_code)]

pub mod consolidate;
pub mod short_term;

pub use consolidate::consolidate;
pub use short_term::{Observation, ShortTermBuffer};
