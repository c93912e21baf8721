//! Raw database row structs for `rusqlite` mapping.
//!
//! Scalar columns exist for indexed queries; the `data` column holds the
//! serialized [`Context`] document and is authoritative. Deserialization
//! always reads from `data`, never reassembles from the scalars.

use drift_core::Context;
use rusqlite::Row;

use crate::errors::Result;

/// A row from the `contexts` table.
#[derive(Clone, Debug)]
pub struct ContextRow {
    /// Context ID (primary key).
    pub id: String,
    /// Context name.
    pub name: String,
    /// Context kind, serialized form.
    pub kind: String,
    /// Lifecycle state, serialized form.
    pub state: String,
    /// Serialized [`Context`] document. Authoritative.
    pub data: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last-update timestamp (RFC 3339).
    pub updated_at: String,
}

impl ContextRow {
    /// Map a `rusqlite` row. Column order must match the SELECT list in
    /// [`crate::sqlite::repositories::context`].
    pub fn from_row(row: &Row<'_>) -> std::result::Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: row.get(2)?,
            state: row.get(3)?,
            data: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    /// Deserialize the authoritative document payload.
    pub fn into_context(self) -> Result<Context> {
        let context: Context = serde_json::from_str(&self.data)?;
        Ok(context)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::{ContextKind, ContextState};

    #[test]
    fn into_context_reads_payload_not_scalars() {
        let ctx = Context::new("payload wins", ContextKind::Task, "", "/repo");
        let row = ContextRow {
            id: "stale-id".into(),
            name: "stale-name".into(),
            kind: "bugfix".into(),
            state: "archived".into(),
            data: serde_json::to_string(&ctx).unwrap(),
            created_at: String::new(),
            updated_at: String::new(),
        };

        let back = row.into_context().unwrap();
        assert_eq!(back.name, "payload wins");
        assert_eq!(back.state, ContextState::Active);
        assert_eq!(back.id, ctx.id);
    }

    #[test]
    fn into_context_rejects_malformed_payload() {
        let row = ContextRow {
            id: "x".into(),
            name: "x".into(),
            kind: "task".into(),
            state: "active".into(),
            data: "{not json".into(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert!(row.into_context().is_err());
    }
}
