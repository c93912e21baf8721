//! Memory types — atomic retained facts about a context.
//!
//! A [`Memory`] carries free-text content plus the code references it was
//! derived from. Importance is clamped to `[1.0, 5.0]` and confidence to
//! `[0.0, 1.0]` at every construction and mutation site, so persisted
//! values can never leave those ranges.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ContextId, MemoryId, ThreadId};

/// Lowest valid importance.
pub const IMPORTANCE_MIN: f64 = 1.0;
/// Highest valid importance.
pub const IMPORTANCE_MAX: f64 = 5.0;

/// A reference to a span of code: file path plus inclusive line range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeReference {
    /// Path of the referenced file. Never empty.
    pub file_path: String,
    /// First referenced line (zero-based).
    pub start_line: u32,
    /// Last referenced line (zero-based, inclusive).
    pub end_line: u32,
}

impl CodeReference {
    /// Create a reference, rejecting empty file paths.
    #[must_use]
    pub fn new(file_path: impl Into<String>, start_line: u32, end_line: u32) -> Option<Self> {
        let file_path = file_path.into();
        if file_path.is_empty() {
            return None;
        }
        Some(Self {
            file_path,
            start_line,
            end_line,
        })
    }
}

/// An atomic retained fact about a context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    /// Memory ID.
    pub id: MemoryId,
    /// Free-text content.
    pub content: String,
    /// Owning context.
    pub context_id: ContextId,
    /// Code references this memory was derived from.
    pub references: Vec<CodeReference>,
    /// Tags, kept sorted for deterministic serialization.
    pub tags: BTreeSet<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Importance in `[1.0, 5.0]`.
    pub importance: f64,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Thread this memory belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<ThreadId>,
}

impl Memory {
    /// Create a memory with default importance (1.0) and confidence (1.0).
    #[must_use]
    pub fn new(context_id: ContextId, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: MemoryId::new(),
            content: content.into(),
            context_id,
            references: Vec::new(),
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
            importance: IMPORTANCE_MIN,
            confidence: 1.0,
            thread_id: None,
        }
    }

    /// Set importance, clamped to `[1.0, 5.0]`.
    #[must_use]
    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = clamp_importance(importance);
        self
    }

    /// Set confidence, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    /// Attach code references.
    #[must_use]
    pub fn with_references(mut self, references: Vec<CodeReference>) -> Self {
        self.references = references;
        self
    }

    /// Attach tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Clamp an importance value to `[1.0, 5.0]`.
#[must_use]
pub fn clamp_importance(value: f64) -> f64 {
    value.clamp(IMPORTANCE_MIN, IMPORTANCE_MAX)
}

/// Clamp a confidence value to `[0.0, 1.0]`.
#[must_use]
pub fn clamp_confidence(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
