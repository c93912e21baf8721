//! Deterministic memory consolidation.
//!
//! Memories are grouped by referenced file path and each group with more
//! than one member is merged into a single higher-confidence memory. The
//! merge is information-preserving: union of tags, concatenated contents
//! in original order, maximum importance, mean confidence, earliest
//! creation time.
//!
//! Two invariants the grouping enforces beyond the naive algorithm:
//!
//! - a memory is consumed by at most one merge group, so a memory with
//!   references to several files can never be emitted twice and the
//!   output count never exceeds the input count;
//! - memories without any code reference pass through unchanged instead
//!   of silently disappearing.
//!
//! Output preserves insertion order: a merged memory occupies the slot
//! of its earliest constituent.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use drift_core::{Memory, clamp_confidence, clamp_importance};

/// Consolidate a context's memory list.
///
/// Pure with respect to its input; callers persist the returned list via
/// the context store.
#[must_use]
pub fn consolidate(memories: &[Memory]) -> Vec<Memory> {
    // Index memories under every path they reference, path keys in
    // first-occurrence order.
    let mut path_order: Vec<&str> = Vec::new();
    let mut by_path: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, memory) in memories.iter().enumerate() {
        for reference in &memory.references {
            let path = reference.file_path.as_str();
            let entry = by_path.entry(path).or_insert_with(|| {
                path_order.push(path);
                Vec::new()
            });
            // A memory with two references into the same file counts once.
            if entry.last() != Some(&index) {
                entry.push(index);
            }
        }
    }

    let mut consumed = vec![false; memories.len()];
    let mut merged_by_slot: HashMap<usize, Memory> = HashMap::new();

    for path in path_order {
        let members: Vec<usize> = by_path[path]
            .iter()
            .copied()
            .filter(|&i| !consumed[i])
            .collect();
        if members.len() < 2 {
            continue;
        }
        for &i in &members {
            consumed[i] = true;
        }
        let merged = merge_group(memories, &members, path);
        debug!(path, members = members.len(), "merged memory group");
        let _ = merged_by_slot.insert(members[0], merged);
    }

    let mut result = Vec::with_capacity(memories.len());
    for (index, memory) in memories.iter().enumerate() {
        if let Some(merged) = merged_by_slot.remove(&index) {
            result.push(merged);
        } else if !consumed[index] {
            result.push(memory.clone());
        }
    }
    result
}

/// Merge one group of memories that all reference `path`.
fn merge_group(memories: &[Memory], members: &[usize], path: &str) -> Memory {
    let first = &memories[members[0]];

    let mut tags = first.tags.clone();
    let mut importance = first.importance;
    let mut confidence_sum = 0.0;
    let mut created_at = first.created_at;
    let mut contents: Vec<&str> = Vec::with_capacity(members.len());
    let mut references = Vec::new();
    let mut leftover = Vec::new();

    for &i in members {
        let memory = &memories[i];
        tags.extend(memory.tags.iter().cloned());
        importance = importance.max(memory.importance);
        confidence_sum += memory.confidence;
        created_at = created_at.min(memory.created_at);
        contents.push(&memory.content);
        for reference in &memory.references {
            if reference.file_path == path {
                references.push(reference.clone());
            } else {
                // A consumed multi-file memory will not appear in any other
                // group, so its remaining references ride along here rather
                // than vanish.
                leftover.push(reference.clone());
            }
        }
    }
    references.append(&mut leftover);

    Memory {
        id: first.id.clone(),
        content: contents.join("\n").trim().to_string(),
        context_id: first.context_id.clone(),
        references,
        tags,
        created_at,
        updated_at: Utc::now(),
        importance: clamp_importance(importance),
        confidence: clamp_confidence(confidence_sum / members.len() as f64),
        thread_id: first.thread_id.clone(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::{CodeReference, ContextId};

    fn mem(content: &str, paths: &[&str]) -> Memory {
        let references = paths
            .iter()
            .map(|p| CodeReference::new(*p, 0, 10).unwrap())
            .collect();
        Memory::new(ContextId::from("ctx-1"), content).with_references(references)
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(consolidate(&[]).is_empty());
    }

    #[test]
    fn single_memory_passes_through() {
        let input = vec![mem("only", &["a.ts"])];
        let output = consolidate(&input);
        assert_eq!(output, input);
    }

    #[test]
    fn same_file_memories_merge() {
        let a = mem("first note", &["foo.ts"])
            .with_importance(2.0)
            .with_confidence(0.6);
        let b = mem("second note", &["foo.ts"])
            .with_importance(4.0)
            .with_confidence(1.0);
        let output = consolidate(&[a.clone(), b]);

        assert_eq!(output.len(), 1);
        let merged = &output[0];
        assert_eq!(merged.content, "first note\nsecond note");
        assert!((merged.importance - 4.0).abs() < f64::EPSILON);
        assert!((merged.confidence - 0.8).abs() < f64::EPSILON);
        assert_eq!(merged.id, a.id, "merged memory keeps the first ID");
        assert_eq!(merged.references.len(), 2);
    }

    #[test]
    fn merge_unions_tags() {
        let a = mem("a", &["x.ts"]).with_tags(["react"]);
        let b = mem("b", &["x.ts"]).with_tags(["testing", "react"]);
        let output = consolidate(&[a, b]);

        assert_eq!(output.len(), 1);
        let tags: Vec<&str> = output[0].tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["react", "testing"]);
    }

    #[test]
    fn merge_keeps_earliest_created_at() {
        let mut a = mem("a", &["x.ts"]);
        let mut b = mem("b", &["x.ts"]);
        let early = Utc::now() - chrono::Duration::hours(2);
        let late = Utc::now() - chrono::Duration::hours(1);
        a.created_at = late;
        b.created_at = early;

        let output = consolidate(&[a, b]);
        assert_eq!(output[0].created_at, early);
    }

    #[test]
    fn unrelated_files_stay_separate() {
        let input = vec![mem("a", &["a.ts"]), mem("b", &["b.ts"])];
        let output = consolidate(&input);
        assert_eq!(output, input);
    }

    #[test]
    fn memory_without_references_passes_through() {
        let bare = Memory::new(ContextId::from("ctx-1"), "no refs");
        let input = vec![mem("a", &["x.ts"]), bare.clone(), mem("b", &["x.ts"])];
        let output = consolidate(&input);

        assert_eq!(output.len(), 2);
        assert!(output.iter().any(|m| *m == bare));
    }

    #[test]
    fn never_increases_count() {
        // A multi-reference memory indexed under two paths must not be
        // emitted twice.
        let input = vec![
            mem("spans both", &["a.ts", "b.ts"]),
            mem("a only", &["a.ts"]),
            mem("b only", &["b.ts"]),
        ];
        let output = consolidate(&input);
        assert!(output.len() <= input.len());
        // The spanning memory merged into the a.ts group; b.ts keeps one.
        assert_eq!(output.len(), 2);
        assert_eq!(output[0].content, "spans both\na only");
        assert_eq!(output[1].content, "b only");
    }

    #[test]
    fn preserves_insertion_order() {
        let input = vec![
            mem("first", &["a.ts"]),
            mem("solo", &["z.ts"]),
            mem("second", &["a.ts"]),
        ];
        let output = consolidate(&input);

        assert_eq!(output.len(), 2);
        // Merged memory occupies the earliest constituent's slot.
        assert_eq!(output[0].content, "first\nsecond");
        assert_eq!(output[1].content, "solo");
    }

    #[test]
    fn merged_references_list_group_path_first() {
        let a = mem("a", &["x.ts", "other.md"]);
        let b = mem("b", &["x.ts"]);
        let output = consolidate(&[a, b]);

        assert_eq!(output.len(), 1);
        let refs: Vec<&str> = output[0]
            .references
            .iter()
            .map(|r| r.file_path.as_str())
            .collect();
        // Group-path references first, then retained references from
        // consumed multi-file members.
        assert_eq!(refs, vec!["x.ts", "x.ts", "other.md"]);
    }

    #[test]
    fn no_tag_is_lost() {
        let input = vec![
            mem("a", &["x.ts"]).with_tags(["one"]),
            mem("b", &["x.ts"]).with_tags(["two"]),
            mem("c", &["y.ts"]).with_tags(["three"]),
        ];
        let before: Vec<String> = input.iter().flat_map(|m| m.tags.clone()).collect();
        let output = consolidate(&input);
        let after: Vec<String> = output.iter().flat_map(|m| m.tags.clone()).collect();
        for tag in before {
            assert!(after.contains(&tag), "lost tag {tag}");
        }
    }

    #[test]
    fn no_reference_is_lost() {
        let input = vec![
            mem("spans", &["a.ts", "b.ts", "c.md"]),
            mem("a only", &["a.ts"]),
        ];
        let before: usize = input.iter().map(|m| m.references.len()).sum();
        let output = consolidate(&input);
        let after: usize = output.iter().map(|m| m.references.len()).sum();
        assert_eq!(before, after);
    }

    #[test]
    fn no_content_fragment_is_lost() {
        let input = vec![
            mem("alpha", &["x.ts"]),
            mem("beta", &["x.ts"]),
            mem("gamma", &["y.ts"]),
        ];
        let output = consolidate(&input);
        let all_content: String = output
            .iter()
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n");
        for fragment in ["alpha", "beta", "gamma"] {
            assert!(all_content.contains(fragment));
        }
    }

    #[test]
    fn idempotent_once_paths_are_unique() {
        let input = vec![
            mem("a", &["x.ts"]).with_confidence(0.4),
            mem("b", &["x.ts"]).with_confidence(0.8),
            mem("c", &["y.ts"]),
        ];
        let once = consolidate(&input);
        let twice = consolidate(&once);

        // updated_at advances on merge; compare everything else.
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.content, b.content);
            assert_eq!(a.tags, b.tags);
            assert_eq!(a.references, b.references);
            assert!((a.importance - b.importance).abs() < f64::EPSILON);
            assert!((a.confidence - b.confidence).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn merged_values_stay_in_range() {
        let input = vec![
            mem("a", &["x.ts"])
                .with_importance(5.0)
                .with_confidence(1.0),
            mem("b", &["x.ts"])
                .with_importance(1.0)
                .with_confidence(0.0),
        ];
        let output = consolidate(&input);
        let merged = &output[0];
        assert!(merged.importance >= 1.0 && merged.importance <= 5.0);
        assert!(merged.confidence >= 0.0 && merged.confidence <= 1.0);
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        let input = vec![mem("first  \n", &["x.ts"]), mem("second\n\n", &["x.ts"])];
        let output = consolidate(&input);
        assert!(!output[0].content.ends_with(char::is_whitespace));
        assert!(output[0].content.contains("first"));
        assert!(output[0].content.contains("second"));
    }
}
