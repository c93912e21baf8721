//! File-event pipeline: from a saved file to a consolidated memory.
//!
//! [`ActivityPipeline`] is constructed once with explicit dependencies and
//! shared behind an `Arc`. There is no ambient global state; everything
//! the pipeline touches is injected. Volatile collaborators (tracker,
//! short-term buffer) sit behind mutexes because file-save events can
//! arrive from concurrent tasks.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use drift_analysis::InsightExtractor;
use drift_core::Context;
use drift_memory::{Observation, ShortTermBuffer, consolidate};
use drift_settings::DriftSettings;
use drift_store::ContextStore;
use drift_tracker::ActivityTracker;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};

use crate::errors::Result;

/// The per-save processing pipeline.
///
/// One instance per process. Handles each `(path, content)` save event:
/// exclusion filtering, access tracking, insight extraction, memory
/// capture, and consolidation against the current context.
pub struct ActivityPipeline {
    store: Arc<ContextStore>,
    extractor: InsightExtractor,
    tracker: Mutex<ActivityTracker>,
    buffer: Mutex<ShortTermBuffer>,
    settings: Arc<DriftSettings>,
    exclude: GlobSet,
}

impl ActivityPipeline {
    /// Wire a pipeline from its dependencies.
    ///
    /// Compiles the exclude patterns once; an invalid pattern fails
    /// construction rather than being silently skipped.
    pub fn new(store: Arc<ContextStore>, settings: Arc<DriftSettings>) -> Result<Self> {
        let exclude = compile_globs(&settings.exclude_patterns)?;
        let tracker = ActivityTracker::new(
            settings.context_switch_threshold,
            settings.file_group_threshold,
        );
        Ok(Self {
            store,
            extractor: InsightExtractor::new(),
            tracker: Mutex::new(tracker),
            buffer: Mutex::new(ShortTermBuffer::new()),
            settings,
            exclude,
        })
    }

    /// The store this pipeline writes to.
    pub fn store(&self) -> &Arc<ContextStore> {
        &self.store
    }

    /// Process one file-save event.
    ///
    /// Returns the updated current context, or `None` when the event was
    /// skipped: tracking disabled, path excluded, or no active context to
    /// attach the memory to. Persistence errors propagate; the advisory
    /// analysis step itself never fails.
    pub fn handle_file_saved(&self, path: &str, content: &str) -> Result<Option<Context>> {
        if !self.settings.enabled {
            debug!(path, "tracking disabled, skipping");
            return Ok(None);
        }
        if self.exclude.is_match(path) {
            debug!(path, "path excluded, skipping");
            return Ok(None);
        }

        self.lock_tracker().record_access(path);

        let insight = self.extractor.analyze(content, path);

        let Some(current) = self.store.current()? else {
            debug!(path, "no active context, observation not captured");
            return Ok(None);
        };

        self.lock_buffer().push(Observation {
            content: content.to_string(),
            timestamp: Utc::now(),
            file_path: path.to_string(),
        });

        let memory = self.extractor.memory_for_context(&insight, current.id.clone());
        let context = self.store.push_memory(&current.id, memory)?;

        let consolidated = consolidate(&context.memories);
        if consolidated.len() < context.memories.len() {
            info!(
                context_id = %context.id,
                before = context.memories.len(),
                after = consolidated.len(),
                "consolidated memories"
            );
            let context = self.store.replace_memories(&context.id, consolidated)?;
            return Ok(Some(context));
        }

        Ok(Some(context))
    }

    /// Timer-driven switch detection hook.
    ///
    /// Returns `true` when an inactivity gap finalized a context summary.
    pub fn detect_switch(&self) -> bool {
        self.lock_tracker().check_switch_at(Utc::now())
    }

    /// Snapshot of the finalized context summaries, oldest first.
    pub fn summaries(&self) -> Vec<drift_tracker::ContextSummary> {
        self.lock_tracker().summaries().to_vec()
    }

    /// Observations currently held in the short-term buffer, most recent
    /// first.
    pub fn recent_observations(&self) -> Vec<Observation> {
        self.lock_buffer().recent().cloned().collect()
    }

    // A poisoned mutex means a panic mid-update in volatile advisory
    // state; recover the inner value rather than cascading the panic.
    fn lock_tracker(&self) -> std::sync::MutexGuard<'_, ActivityTracker> {
        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_buffer(&self) -> std::sync::MutexGuard<'_, ShortTermBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn compile_globs(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let _ = builder.add(Glob::new(pattern)?);
    }
    let set = builder.build()?;
    if !patterns.is_empty() {
        debug!(patterns = patterns.len(), "compiled exclude patterns");
    }
    if set.is_empty() && !patterns.is_empty() {
        warn!("exclude patterns compiled to an empty set");
    }
    Ok(set)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use drift_core::ContextKind;

    fn pipeline_with(settings: DriftSettings) -> ActivityPipeline {
        let store = Arc::new(ContextStore::open_in_memory().unwrap());
        ActivityPipeline::new(store, Arc::new(settings)).unwrap()
    }

    fn default_pipeline() -> ActivityPipeline {
        pipeline_with(DriftSettings::default())
    }

    const SAMPLE: &str = "import fs from 'fs'\nexport function read() {\n  if (true) { return fs }\n}\n";

    #[test]
    fn disabled_pipeline_skips() {
        let pipeline = pipeline_with(DriftSettings {
            enabled: false,
            ..Default::default()
        });
        pipeline
            .store()
            .create_context("x", ContextKind::Task, "", "/repo")
            .unwrap();

        let result = pipeline.handle_file_saved("src/a.ts", SAMPLE).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn excluded_path_skips() {
        let pipeline = default_pipeline();
        pipeline
            .store()
            .create_context("x", ContextKind::Task, "", "/repo")
            .unwrap();

        let result = pipeline
            .handle_file_saved("node_modules/lodash/index.js", SAMPLE)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn no_active_context_skips_capture() {
        let pipeline = default_pipeline();
        let result = pipeline.handle_file_saved("src/a.ts", SAMPLE).unwrap();
        assert!(result.is_none());
        assert!(pipeline.recent_observations().is_empty());
    }

    #[test]
    fn save_captures_memory_on_current_context() {
        let pipeline = default_pipeline();
        let ctx = pipeline
            .store()
            .create_context("x", ContextKind::Task, "", "/repo")
            .unwrap();

        let updated = pipeline
            .handle_file_saved("src/a.ts", SAMPLE)
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, ctx.id);
        assert_eq!(updated.memories.len(), 1);
        let memory = &updated.memories[0];
        assert_eq!(memory.references[0].file_path, "src/a.ts");
        assert!((memory.confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn save_records_observation_and_access() {
        let pipeline = default_pipeline();
        pipeline
            .store()
            .create_context("x", ContextKind::Task, "", "/repo")
            .unwrap();

        pipeline.handle_file_saved("src/a.ts", SAMPLE).unwrap();

        let observations = pipeline.recent_observations();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].file_path, "src/a.ts");
    }

    #[test]
    fn repeat_saves_of_same_file_consolidate() {
        let pipeline = default_pipeline();
        pipeline
            .store()
            .create_context("x", ContextKind::Task, "", "/repo")
            .unwrap();

        pipeline.handle_file_saved("src/a.ts", SAMPLE).unwrap();
        let updated = pipeline
            .handle_file_saved("src/a.ts", SAMPLE)
            .unwrap()
            .unwrap();

        // Two captures of the same path merge into one memory.
        assert_eq!(updated.memories.len(), 1);
    }

    #[test]
    fn saves_of_distinct_files_stay_separate() {
        let pipeline = default_pipeline();
        pipeline
            .store()
            .create_context("x", ContextKind::Task, "", "/repo")
            .unwrap();

        pipeline.handle_file_saved("src/a.ts", SAMPLE).unwrap();
        let updated = pipeline
            .handle_file_saved("src/b.ts", SAMPLE)
            .unwrap()
            .unwrap();

        assert_eq!(updated.memories.len(), 2);
    }

    #[test]
    fn invalid_exclude_pattern_fails_construction() {
        let store = Arc::new(ContextStore::open_in_memory().unwrap());
        let settings = DriftSettings {
            exclude_patterns: vec!["a{b".to_string()],
            ..Default::default()
        };
        assert!(ActivityPipeline::new(store, Arc::new(settings)).is_err());
    }

    #[test]
    fn detect_switch_false_when_idle_within_threshold() {
        let pipeline = default_pipeline();
        pipeline
            .store()
            .create_context("x", ContextKind::Task, "", "/repo")
            .unwrap();
        pipeline.handle_file_saved("src/a.ts", SAMPLE).unwrap();

        assert!(!pipeline.detect_switch());
        assert!(pipeline.summaries().is_empty());
    }
}
