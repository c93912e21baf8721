//! # drift-core
//!
//! Foundation types for the Drift context engine.
//!
//! This crate provides the shared vocabulary the other Drift crates depend on:
//!
//! - **Branded IDs**: `ContextId`, `MemoryId`, `ThreadId`, … as newtypes for type safety
//! - **Contexts**: [`Context`] — a unit of work with state, memories, and tags
//! - **Memories**: [`Memory`] — an atomic retained fact with clamped importance/confidence
//! - **Code references**: [`CodeReference`] — a file path plus line range

#![deny(unsafe_code)]

pub mod context;
pub mod ids;
pub mod memory;

pub use context::{Context, ContextKind, ContextState, Conversation, Milestone, Roadmap};
pub use ids::{ContextId, ConversationId, MemoryId, MilestoneId, RoadmapId, ThreadId};
pub use memory::{CodeReference, Memory, clamp_confidence, clamp_importance};
