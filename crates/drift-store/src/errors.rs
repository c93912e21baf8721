//! Error types for the context store.
//!
//! [`StoreError`] is the primary error type returned by all store
//! operations. Variants cover the failure taxonomy: not-found conditions
//! are surfaced explicitly, persistence failures are propagated rather
//! than retried, and nothing is swallowed.

use thiserror::Error;

/// Errors that can occur during context store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// Referenced context has no record.
    #[error("context not found: {0}")]
    ContextNotFound(String),

    /// Invalid operation on the store.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn sqlite_error_display() {
        let err = StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().contains("sqlite error"));
    }

    #[test]
    fn serde_error_display() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = StoreError::Serde(serde_err);
        assert!(err.to_string().contains("serde error"));
    }

    #[test]
    fn migration_error_display() {
        let err = StoreError::Migration {
            message: "v001 failed: table already exists".into(),
        };
        assert_eq!(
            err.to_string(),
            "migration error: v001 failed: table already exists"
        );
    }

    #[test]
    fn context_not_found_display() {
        let err = StoreError::ContextNotFound("ctx-123".into());
        assert_eq!(err.to_string(), "context not found: ctx-123");
    }

    #[test]
    fn invalid_operation_display() {
        let err = StoreError::InvalidOperation("cannot activate archived context".into());
        assert_eq!(
            err.to_string(),
            "invalid operation: cannot activate archived context"
        );
    }

    #[test]
    fn from_rusqlite_error() {
        let sqlite_err = rusqlite::Error::QueryReturnedNoRows;
        let err: StoreError = sqlite_err.into();
        assert_matches!(err, StoreError::Sqlite(_));
    }

    #[test]
    fn from_serde_error() {
        let serde_err = serde_json::from_str::<String>("bad").unwrap_err();
        let err: StoreError = serde_err.into();
        assert_matches!(err, StoreError::Serde(_));
    }
}
