//! # drift-tracker
//!
//! Temporal file-access clustering.
//!
//! [`ActivityTracker`] consumes a stream of (path, timestamp) access events,
//! groups temporally-related files, and finalizes an immutable
//! [`ContextSummary`] whenever an inactivity gap exceeds the configured
//! context-switch threshold. Everything here is volatile in-memory state,
//! a parallel, lighter-weight view of activity, never canonical.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One timestamped file access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAccess {
    /// Accessed file path.
    pub file_path: String,
    /// When the access happened.
    pub access_time: DateTime<Utc>,
}

/// A cluster of accesses judged temporally related.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileGroup {
    /// Display name, `Group N` by position.
    pub group_name: String,
    /// Member accesses in insertion order.
    pub files: Vec<FileAccess>,
}

/// Finalized snapshot of the groups at the moment a switch was detected.
///
/// Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    /// Display name, `Context N` by position in history.
    pub context_name: String,
    /// The groups as they stood at switch time.
    pub file_groups: Vec<FileGroup>,
    /// When the switch was detected.
    pub switch_time: DateTime<Utc>,
}

/// Temporal file-access clusterer with inactivity-based switch detection.
///
/// Thresholds are injected at construction (minutes, both positive).
/// Grouping is recomputed from scratch on every access: a single
/// chronological pass where each access joins the first existing group
/// containing any member within the file-group threshold, or opens a new
/// group. The pass is order-dependent by contract and reproduced exactly
/// on every recompute.
#[derive(Debug)]
pub struct ActivityTracker {
    active_files: Vec<FileAccess>,
    file_groups: Vec<FileGroup>,
    summaries: Vec<ContextSummary>,
    context_switch_threshold_min: u64,
    file_group_threshold_min: u64,
}

impl ActivityTracker {
    /// Create a tracker with the given thresholds (minutes).
    #[must_use]
    pub fn new(context_switch_threshold_min: u64, file_group_threshold_min: u64) -> Self {
        Self {
            active_files: Vec::new(),
            file_groups: Vec::new(),
            summaries: Vec::new(),
            context_switch_threshold_min,
            file_group_threshold_min,
        }
    }

    /// Record an access at the current wall-clock time.
    pub fn record_access(&mut self, file_path: impl Into<String>) {
        self.record_access_at(file_path, Utc::now());
    }

    /// Record an access at an explicit time.
    ///
    /// Switch detection runs against the previous most-recent access
    /// before the new one is appended: a gap above the context-switch
    /// threshold finalizes the current groups into a summary and clears
    /// the access list, so the new access starts the next unit of work.
    pub fn record_access_at(&mut self, file_path: impl Into<String>, now: DateTime<Utc>) {
        let _ = self.check_switch_at(now);
        self.active_files.push(FileAccess {
            file_path: file_path.into(),
            access_time: now,
        });
        self.regroup();
    }

    /// Timer-driven switch detection.
    ///
    /// Returns `true` when the gap between `now` and the last recorded
    /// access exceeds the context-switch threshold; the current groups are
    /// then finalized into a [`ContextSummary`] and the access list is
    /// cleared. A single access list with no prior gap never triggers.
    pub fn check_switch_at(&mut self, now: DateTime<Utc>) -> bool {
        let Some(last) = self.active_files.last() else {
            return false;
        };
        let gap_min = (now - last.access_time).num_seconds() as f64 / 60.0;
        if gap_min <= self.context_switch_threshold_min as f64 {
            return false;
        }

        let summary = ContextSummary {
            context_name: format!("Context {}", self.summaries.len() + 1),
            file_groups: std::mem::take(&mut self.file_groups),
            switch_time: now,
        };
        debug!(
            name = %summary.context_name,
            groups = summary.file_groups.len(),
            "context switch detected"
        );
        self.summaries.push(summary);
        self.active_files.clear();
        true
    }

    /// Current file groups.
    #[must_use]
    pub fn file_groups(&self) -> &[FileGroup] {
        &self.file_groups
    }

    /// Accesses since the last detected switch.
    #[must_use]
    pub fn active_files(&self) -> &[FileAccess] {
        &self.active_files
    }

    /// Finalized context summaries, oldest first.
    #[must_use]
    pub fn summaries(&self) -> &[ContextSummary] {
        &self.summaries
    }

    /// Rebuild groups from scratch over the full access list, in original
    /// chronological insertion order.
    fn regroup(&mut self) {
        let threshold_min = self.file_group_threshold_min;
        let mut groups: Vec<FileGroup> = Vec::new();

        for access in &self.active_files {
            let joined = groups.iter_mut().find(|g| {
                g.files
                    .iter()
                    .any(|f| within_threshold(f.access_time, access.access_time, threshold_min))
            });
            match joined {
                Some(group) => group.files.push(access.clone()),
                None => groups.push(FileGroup {
                    group_name: format!("Group {}", groups.len() + 1),
                    files: vec![access.clone()],
                }),
            }
        }

        self.file_groups = groups;
    }
}

/// Absolute time difference within `threshold` minutes.
fn within_threshold(a: DateTime<Utc>, b: DateTime<Utc>, threshold_min: u64) -> bool {
    let diff_min = (a - b).num_seconds().unsigned_abs() as f64 / 60.0;
    diff_min <= threshold_min as f64
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
