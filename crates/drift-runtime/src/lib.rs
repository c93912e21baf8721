//! # drift-runtime
//!
//! Wiring for the Drift engine: turns the library crates into a running
//! per-save pipeline.
//!
//! - **[`ActivityPipeline`]**: exclusion filtering, access tracking,
//!   insight extraction, memory capture, and consolidation for each
//!   `(path, content)` save event. All dependencies injected; no globals.
//! - **[`init_logging`]**: process-wide `tracing` subscriber setup.
//!
//! The editor integration that produces save events lives outside this
//! workspace; the pipeline consumes them at its boundary.

#![deny(unsafe_code)]

pub mod errors;
pub mod logging;
pub mod pipeline;

pub use errors::{Result, RuntimeError};
pub use logging::init_logging;
pub use pipeline::ActivityPipeline;
