//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so partial
//! JSON files work; missing fields get their compiled default during
//! deserialization.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Default path patterns excluded from activity tracking.
///
/// Version-control metadata, dependency trees, and build output are never
/// interesting working context.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "**/.git/**",
    "**/node_modules/**",
    "**/target/**",
    "**/out/**",
    "**/dist/**",
];

/// Root settings type for the Drift engine.
///
/// Loaded from a JSON file with defaults applied for missing fields.
/// Thresholds are in minutes and must be positive; [`DriftSettings::validate`]
/// rejects invalid values at the load boundary so a bad file never replaces
/// a working configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriftSettings {
    /// Master switch for activity tracking and memory capture.
    pub enabled: bool,
    /// Inactivity gap (minutes) that finalizes a context summary.
    pub context_switch_threshold: u64,
    /// Maximum access-time gap (minutes) for two files to share a group.
    pub file_group_threshold: u64,
    /// Glob patterns for paths excluded from tracking.
    pub exclude_patterns: Vec<String>,
    /// Persistence settings.
    pub database: DatabaseSettings,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            context_switch_threshold: 15,
            file_group_threshold: 30,
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(ToString::to_string)
                .collect(),
            database: DatabaseSettings::default(),
        }
    }
}

impl DriftSettings {
    /// Check every invariant, rejecting the whole document on the first
    /// violation. Callers keep their previous valid configuration when
    /// this fails.
    pub fn validate(&self) -> Result<()> {
        if self.context_switch_threshold == 0 {
            return Err(SettingsError::InvalidValue(
                "contextSwitchThreshold must be > 0".to_string(),
            ));
        }
        if self.file_group_threshold == 0 {
            return Err(SettingsError::InvalidValue(
                "fileGroupThreshold must be > 0".to_string(),
            ));
        }
        if self.exclude_patterns.iter().any(String::is_empty) {
            return Err(SettingsError::InvalidValue(
                "excludePatterns must not contain empty patterns".to_string(),
            ));
        }
        self.database.validate()
    }
}

/// Persistence settings for the context store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file. `None` selects in-memory
    /// (useful for tests and ephemeral runs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Maximum connection pool size.
    pub pool_size: u32,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            pool_size: 8,
            busy_timeout_ms: 30_000,
        }
    }
}

impl DatabaseSettings {
    fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(SettingsError::InvalidValue(
                "database.poolSize must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
