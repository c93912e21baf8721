//! Context repository: CRUD over the `contexts` table.
//!
//! Every write serializes the full [`Context`] document into the `data`
//! column and refreshes the scalar columns alongside it. Reads go through
//! [`ContextRow::into_context`] so the document payload stays
//! authoritative.

use chrono::SecondsFormat;
use drift_core::{Context, ContextId, ContextState};
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError};
use crate::sqlite::row_types::ContextRow;

const SELECT_COLUMNS: &str = "id, name, kind, state, data, created_at, updated_at";

/// Insert a new context.
///
/// # Errors
///
/// Returns [`StoreError::Sqlite`] on constraint violations, including a
/// duplicate ID.
pub fn insert(conn: &Connection, context: &Context) -> Result<()> {
    let data = serde_json::to_string(context)?;
    let _ = conn.execute(
        "INSERT INTO contexts (id, name, kind, state, description, project_root, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            context.id.as_str(),
            context.name,
            kind_str(context)?,
            context.state.as_str(),
            context.description,
            context.project_root,
            data,
            rfc3339(context.created_at),
            rfc3339(context.updated_at),
        ],
    )?;
    Ok(())
}

/// Fetch a context by ID.
pub fn get_by_id(conn: &Connection, id: &ContextId) -> Result<Option<Context>> {
    let row = conn
        .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM contexts WHERE id = ?1"),
            params![id.as_str()],
            ContextRow::from_row,
        )
        .optional()?;
    row.map(ContextRow::into_context).transpose()
}

/// List all contexts, most recently updated first.
pub fn list(conn: &Connection) -> Result<Vec<Context>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM contexts ORDER BY updated_at DESC, id"
    ))?;
    collect(stmt.query_map([], ContextRow::from_row)?)
}

/// List contexts in a given state, most recently updated first.
pub fn list_by_state(conn: &Connection, state: ContextState) -> Result<Vec<Context>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM contexts WHERE state = ?1 ORDER BY updated_at DESC, id"
    ))?;
    collect(stmt.query_map(params![state.as_str()], ContextRow::from_row)?)
}

/// Fetch the most recently updated active context, if any.
pub fn current_active(conn: &Connection) -> Result<Option<Context>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {SELECT_COLUMNS} FROM contexts
                 WHERE state = 'active' ORDER BY updated_at DESC, id LIMIT 1"
            ),
            [],
            ContextRow::from_row,
        )
        .optional()?;
    row.map(ContextRow::into_context).transpose()
}

/// Rewrite an existing context row from the given document.
///
/// # Errors
///
/// Returns [`StoreError::ContextNotFound`] if no row matches the ID.
pub fn update(conn: &Connection, context: &Context) -> Result<()> {
    let data = serde_json::to_string(context)?;
    let changed = conn.execute(
        "UPDATE contexts
         SET name = ?2, kind = ?3, state = ?4, description = ?5,
             project_root = ?6, data = ?7, updated_at = ?8
         WHERE id = ?1",
        params![
            context.id.as_str(),
            context.name,
            kind_str(context)?,
            context.state.as_str(),
            context.description,
            context.project_root,
            data,
            rfc3339(context.updated_at),
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::ContextNotFound(context.id.to_string()));
    }
    Ok(())
}

/// Count all contexts.
pub fn count(conn: &Connection) -> Result<u64> {
    let n: u64 = conn.query_row("SELECT COUNT(*) FROM contexts", [], |row| row.get(0))?;
    Ok(n)
}

fn collect(
    rows: impl Iterator<Item = std::result::Result<ContextRow, rusqlite::Error>>,
) -> Result<Vec<Context>> {
    let mut contexts = Vec::new();
    for row in rows {
        contexts.push(row?.into_context()?);
    }
    Ok(contexts)
}

fn kind_str(context: &Context) -> Result<String> {
    // ContextKind serializes as a bare string; reuse that form for the column.
    let value = serde_json::to_value(context.kind)?;
    Ok(value.as_str().unwrap_or("other").to_string())
}

fn rfc3339(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
