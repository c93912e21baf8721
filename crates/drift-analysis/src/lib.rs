//! # drift-analysis
//!
//! Lightweight static code analysis for memory capture.
//!
//! [`InsightExtractor`] is a pure function of its inputs: source text plus
//! a file path in, a [`CodeInsight`] out. No I/O, no state beyond the
//! compiled regexes, and no failure mode: analysis is advisory, so even
//! empty or unparseable input produces a best-effort, zero-valued result.

#![deny(unsafe_code)]

pub mod insight;

pub use insight::{CodeInsight, InsightExtractor};
