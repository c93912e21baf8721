//! High-level [`ContextStore`] API.
//!
//! Composes the repository layer into guarded context operations over a
//! connection pool. Every mutation follows the same shape: load, change,
//! touch, persist, fire the change signal. Concurrent writers race the
//! read-modify-write cycle and the last write wins; writes are whole-row,
//! so a lost update is a stale document, never a torn one.

use std::collections::BTreeSet;

use drift_core::{Context, ContextId, ContextKind, ContextState, Memory, ThreadId};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::{Result, StoreError};
use crate::sqlite::connection::{ConnectionConfig, ConnectionPool, PooledConnection};
use crate::sqlite::repositories::context as context_repo;
use crate::sqlite::{migrations, new_file, new_in_memory};
use crate::store::change_signal::ChangeSignal;

/// A typed partial update for a context.
///
/// `None` fields are left untouched; `Some` fields overwrite. Memories,
/// conversations, and the roadmap have dedicated store operations and are
/// deliberately absent here.
#[derive(Clone, Debug, Default)]
pub struct ContextPatch {
    /// New name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<ContextKind>,
    /// New lifecycle state.
    pub state: Option<ContextState>,
    /// New description.
    pub description: Option<String>,
    /// New project root.
    pub project_root: Option<String>,
    /// Replacement tag set.
    pub tags: Option<BTreeSet<String>>,
    /// Replacement related-context list.
    pub related_contexts: Option<Vec<ContextId>>,
    /// Replacement editor-configuration map.
    pub ide_config: Option<Map<String, Value>>,
}

impl ContextPatch {
    /// True if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kind.is_none()
            && self.state.is_none()
            && self.description.is_none()
            && self.project_root.is_none()
            && self.tags.is_none()
            && self.related_contexts.is_none()
            && self.ide_config.is_none()
    }

    fn apply(self, context: &mut Context) {
        if let Some(name) = self.name {
            context.name = name;
        }
        if let Some(kind) = self.kind {
            context.kind = kind;
        }
        if let Some(state) = self.state {
            context.state = state;
        }
        if let Some(description) = self.description {
            context.description = description;
        }
        if let Some(project_root) = self.project_root {
            context.project_root = project_root;
        }
        if let Some(tags) = self.tags {
            context.tags = tags;
        }
        if let Some(related) = self.related_contexts {
            context.related_contexts = related;
        }
        if let Some(ide_config) = self.ide_config {
            context.ide_config = ide_config;
        }
    }
}

/// High-level context store wrapping a connection pool.
///
/// Methods are synchronous; async collaborators wrap calls at their own
/// boundary. The store owns a [`ChangeSignal`] and fires it after every
/// committed mutation.
pub struct ContextStore {
    pool: ConnectionPool,
    changes: ChangeSignal,
}

impl ContextStore {
    /// Create a store over an existing pool, running pending migrations.
    pub fn new(pool: ConnectionPool) -> Result<Self> {
        let conn = pool.get()?;
        let applied = migrations::run_migrations(&conn)?;
        if applied > 0 {
            info!(applied, "applied schema migrations");
        }
        drop(conn);
        Ok(Self {
            pool,
            changes: ChangeSignal::new(),
        })
    }

    /// Open an in-memory store (tests and ephemeral runs).
    pub fn open_in_memory() -> Result<Self> {
        Self::new(new_in_memory(&ConnectionConfig::default())?)
    }

    /// Open a file-backed store.
    pub fn open_file(path: &str, config: &ConnectionConfig) -> Result<Self> {
        Self::new(new_file(path, config)?)
    }

    /// The change signal fired after every committed mutation.
    pub fn changes(&self) -> &ChangeSignal {
        &self.changes
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    /// Fetch a context by ID.
    pub fn get(&self, id: &ContextId) -> Result<Option<Context>> {
        let conn = self.conn()?;
        context_repo::get_by_id(&conn, id)
    }

    /// List all contexts, most recently updated first.
    pub fn list(&self) -> Result<Vec<Context>> {
        let conn = self.conn()?;
        context_repo::list(&conn)
    }

    /// List contexts in a given state, most recently updated first.
    pub fn list_by_state(&self, state: ContextState) -> Result<Vec<Context>> {
        let conn = self.conn()?;
        context_repo::list_by_state(&conn, state)
    }

    /// The current context: the most recently updated active one, if any.
    pub fn current(&self) -> Result<Option<Context>> {
        let conn = self.conn()?;
        context_repo::current_active(&conn)
    }

    /// Count all contexts.
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn()?;
        context_repo::count(&conn)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Create a new active context.
    pub fn create_context(
        &self,
        name: impl Into<String>,
        kind: ContextKind,
        description: impl Into<String>,
        project_root: impl Into<String>,
    ) -> Result<Context> {
        let context = Context::new(name, kind, description, project_root);
        let conn = self.conn()?;
        context_repo::insert(&conn, &context)?;
        info!(context_id = %context.id, name = %context.name, "created context");
        let _ = self.changes.notify();
        Ok(context)
    }

    /// Apply a partial update to a context.
    ///
    /// An empty patch is a no-op that touches nothing and fires no signal.
    pub fn update(&self, id: &ContextId, patch: ContextPatch) -> Result<Context> {
        let conn = self.conn()?;
        let mut context = Self::require(&conn, id)?;
        if patch.is_empty() {
            return Ok(context);
        }
        patch.apply(&mut context);
        context.touch();
        context_repo::update(&conn, &context)?;
        debug!(context_id = %id, "updated context");
        let _ = self.changes.notify();
        Ok(context)
    }

    /// Make the given context the single active one.
    ///
    /// Pauses every other active context, then activates the target.
    /// Runs in one transaction, so observers never see zero or two
    /// active contexts mid-switch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidOperation`] if the target is archived.
    pub fn switch_active(&self, id: &ContextId) -> Result<Context> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut target = Self::require(&tx, id)?;
        if target.state == ContextState::Archived {
            return Err(StoreError::InvalidOperation(format!(
                "cannot activate archived context {id}"
            )));
        }

        for mut other in context_repo::list_by_state(&tx, ContextState::Active)? {
            if other.id == target.id {
                continue;
            }
            other.state = ContextState::Paused;
            other.touch();
            context_repo::update(&tx, &other)?;
        }

        target.state = ContextState::Active;
        target.touch();
        context_repo::update(&tx, &target)?;
        tx.commit()?;

        info!(context_id = %id, "switched active context");
        let _ = self.changes.notify();
        Ok(target)
    }

    /// Create and append a plain memory from free text.
    ///
    /// Default importance (1.0) and confidence (1.0); callers with derived
    /// scores build the [`Memory`] themselves and use [`Self::push_memory`].
    pub fn add_memory(&self, id: &ContextId, content: impl Into<String>) -> Result<Memory> {
        let memory = Memory::new(id.clone(), content);
        let _ = self.push_memory(id, memory.clone())?;
        Ok(memory)
    }

    /// Append a memory to a context.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidOperation`] if the context is archived.
    pub fn push_memory(&self, id: &ContextId, memory: Memory) -> Result<Context> {
        let conn = self.conn()?;
        let mut context = Self::require_mutable(&conn, id)?;
        context.memories.push(memory);
        context.touch();
        context_repo::update(&conn, &context)?;
        debug!(context_id = %id, memories = context.memories.len(), "pushed memory");
        let _ = self.changes.notify();
        Ok(context)
    }

    /// Replace a context's memory list wholesale.
    ///
    /// Used after consolidation: the caller computed the new list from a
    /// snapshot and swaps it in. Races with a concurrent `push_memory`
    /// resolve last-write-wins.
    pub fn replace_memories(&self, id: &ContextId, memories: Vec<Memory>) -> Result<Context> {
        let conn = self.conn()?;
        let mut context = Self::require_mutable(&conn, id)?;
        let before = context.memories.len();
        context.memories = memories;
        context.touch();
        context_repo::update(&conn, &context)?;
        debug!(
            context_id = %id,
            before,
            after = context.memories.len(),
            "replaced memories"
        );
        let _ = self.changes.notify();
        Ok(context)
    }

    /// Start a new thread on a context, returning the new thread ID.
    ///
    /// Only the identifier is retained on the context; the name is a
    /// logging label, not a persisted entity. Any previous thread marker
    /// is overwritten.
    pub fn start_thread(&self, id: &ContextId, name: &str) -> Result<ThreadId> {
        let conn = self.conn()?;
        let mut context = Self::require_mutable(&conn, id)?;
        let thread_id = ThreadId::new();
        context.active_thread_id = Some(thread_id.clone());
        context.touch();
        context_repo::update(&conn, &context)?;
        info!(context_id = %id, thread_id = %thread_id, name, "started thread");
        let _ = self.changes.notify();
        Ok(thread_id)
    }

    /// Clear a context's thread marker, if set.
    pub fn end_thread(&self, id: &ContextId) -> Result<Context> {
        let conn = self.conn()?;
        let mut context = Self::require_mutable(&conn, id)?;
        if context.active_thread_id.is_none() {
            return Ok(context);
        }
        context.active_thread_id = None;
        context.touch();
        context_repo::update(&conn, &context)?;
        let _ = self.changes.notify();
        Ok(context)
    }

    /// Archive a context. Soft delete: the row stays, queries for active
    /// work skip it. Idempotent.
    pub fn archive(&self, id: &ContextId) -> Result<Context> {
        let conn = self.conn()?;
        let mut context = Self::require(&conn, id)?;
        if context.state == ContextState::Archived {
            return Ok(context);
        }
        context.state = ContextState::Archived;
        context.touch();
        context_repo::update(&conn, &context)?;
        info!(context_id = %id, "archived context");
        let _ = self.changes.notify();
        Ok(context)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────

    fn require(conn: &rusqlite::Connection, id: &ContextId) -> Result<Context> {
        context_repo::get_by_id(conn, id)?
            .ok_or_else(|| StoreError::ContextNotFound(id.to_string()))
    }

    fn require_mutable(conn: &rusqlite::Connection, id: &ContextId) -> Result<Context> {
        let context = Self::require(conn, id)?;
        if context.state == ContextState::Archived {
            return Err(StoreError::InvalidOperation(format!(
                "context {id} is archived"
            )));
        }
        Ok(context)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
