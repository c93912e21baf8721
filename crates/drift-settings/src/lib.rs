//! # drift-settings
//!
//! Configuration for the Drift engine.
//!
//! Settings are loaded from a JSON file (deep-merged over compiled
//! defaults) and validated at the boundary: an invalid file never replaces
//! a working configuration.
//!
//! There is no global singleton. A [`SettingsHandle`] is constructed once
//! at process start and passed explicitly to every consumer; collaborators
//! take [`Arc`] snapshots so a reload never mutates a configuration
//! somebody is mid-way through reading.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_from_path};
pub use types::{DEFAULT_EXCLUDE_PATTERNS, DatabaseSettings, DriftSettings};

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared, reloadable settings handle.
///
/// Reads are cheap (shared lock + `Arc::clone`); writes only happen on
/// reload. A failed reload keeps the previous valid snapshot.
#[derive(Debug)]
pub struct SettingsHandle {
    current: RwLock<Arc<DriftSettings>>,
}

impl SettingsHandle {
    /// Create a handle around an already-validated settings value.
    #[must_use]
    pub fn new(settings: DriftSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    /// Load from a file, falling back to defaults when the file is absent.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(load_from_path(path)?))
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DriftSettings> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Re-read the file and swap the snapshot.
    ///
    /// On any load or validation error the previous configuration is
    /// retained and the error is returned to the caller.
    pub fn reload(&self, path: &Path) -> Result<()> {
        match load_from_path(path) {
            Ok(settings) => {
                let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
                *guard = Arc::new(settings);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "settings reload rejected, keeping previous");
                Err(e)
            }
        }
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(DriftSettings::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
