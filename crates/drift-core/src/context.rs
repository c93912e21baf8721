//! Context types — the canonical unit-of-work record.
//!
//! A [`Context`] owns everything the engine retains about one unit of work:
//! memories, conversations, code references, tags, and an optional roadmap.
//! The full struct is what the store serializes as its authoritative
//! document payload.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{ContextId, ConversationId, MilestoneId, RoadmapId, ThreadId};
use crate::memory::{CodeReference, Memory};

/// What kind of work a context represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// A whole project.
    Project,
    /// A discrete task.
    Task,
    /// A conversation worth retaining.
    Conversation,
    /// Exploratory research.
    Research,
    /// Implementation work.
    Implementation,
    /// A bug fix.
    Bugfix,
    /// A feature.
    Feature,
    /// Documentation work.
    Documentation,
    /// A meeting.
    Meeting,
    /// Refactoring / code-quality work.
    CodeQuality,
    /// Anything else.
    Other,
}

/// Lifecycle state of a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextState {
    /// Currently being worked on.
    Active,
    /// Set aside, resumable.
    Paused,
    /// Finished.
    Completed,
    /// Soft-deleted. Contexts are never physically removed.
    Archived,
}

impl ContextState {
    /// String form matching the persisted column value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

/// A conversation attached to a context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation ID.
    pub id: ConversationId,
    /// Owning context.
    pub context_id: ContextId,
    /// Raw message payloads.
    pub messages: Vec<Value>,
    /// Optional rollup summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Decisions recorded during the conversation.
    pub decisions: Vec<String>,
    /// Action items recorded during the conversation.
    pub action_items: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A milestone within a roadmap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Milestone ID.
    pub id: MilestoneId,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Due date, if scheduled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Completion timestamp, once done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// IDs of milestones this one depends on.
    pub dependencies: Vec<MilestoneId>,
    /// Free-form task descriptions.
    pub tasks: Vec<String>,
}

/// A roadmap attached to a context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    /// Roadmap ID.
    pub id: RoadmapId,
    /// Owning context.
    pub context_id: ContextId,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Ordered milestones.
    pub milestones: Vec<Milestone>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A unit of work: the canonical record the store owns and persists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    /// Context ID. Immutable, never reassigned.
    pub id: ContextId,
    /// Human-readable name.
    pub name: String,
    /// What kind of work this is.
    pub kind: ContextKind,
    /// Lifecycle state.
    pub state: ContextState,
    /// Free-text description.
    pub description: String,
    /// Root path of the project this context belongs to.
    pub project_root: String,
    /// Code references attached directly to the context.
    pub references: Vec<CodeReference>,
    /// Opaque editor-configuration map.
    pub ide_config: Map<String, Value>,
    /// Memories, in insertion order.
    pub memories: Vec<Memory>,
    /// Conversations, in insertion order.
    pub conversations: Vec<Conversation>,
    /// Optional roadmap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<Roadmap>,
    /// IDs of related contexts.
    pub related_contexts: Vec<ContextId>,
    /// Tags, kept sorted for deterministic serialization.
    pub tags: BTreeSet<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp. Monotonically non-decreasing.
    pub updated_at: DateTime<Utc>,
    /// Active thread marker, if a thread has been started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_thread_id: Option<ThreadId>,
}

impl Context {
    /// Create a new active context with empty collections.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: ContextKind,
        description: impl Into<String>,
        project_root: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ContextId::new(),
            name: name.into(),
            kind,
            state: ContextState::Active,
            description: description.into(),
            project_root: project_root.into(),
            references: Vec::new(),
            ide_config: Map::new(),
            memories: Vec::new(),
            conversations: Vec::new(),
            roadmap: None,
            related_contexts: Vec::new(),
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
            active_thread_id: None,
        }
    }

    /// Refresh `updated_at`. Never moves the timestamp backwards, even if
    /// the wall clock does.
    pub fn touch(&mut self) {
        self.updated_at = self.updated_at.max(Utc::now());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
