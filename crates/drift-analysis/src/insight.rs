//! Code insight extraction.
//!
//! Deterministic, regex-grade heuristics: dependency scanning, a crude
//! complexity score, rule-table tag suggestion, and a one-line summary.
//! Importance is derived from complexity and dependency count and feeds
//! straight into auto-captured memories.

use regex::Regex;
use serde::{Deserialize, Serialize};

use drift_core::{CodeReference, ContextId, Memory};

/// Confidence assigned to auto-captured memories. Analysis is heuristic,
/// so it never claims full confidence.
const AUTO_MEMORY_CONFIDENCE: f64 = 0.8;

/// Result of analyzing one file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeInsight {
    /// One-line description of the file.
    pub summary: String,
    /// Crude structural complexity score.
    pub complexity: u32,
    /// Import/require targets, first occurrence order.
    pub dependencies: Vec<String>,
    /// Suggested tags from the fixed rule table.
    pub suggested_tags: Vec<String>,
    /// A single reference spanning the whole file.
    pub references: Vec<CodeReference>,
}

impl CodeInsight {
    /// Importance derived from complexity and dependency count:
    /// `1 + min(complexity/10, 2) + min(deps/5, 1)`, capped at 5.
    #[must_use]
    pub fn importance(&self) -> f64 {
        let complexity_part = (f64::from(self.complexity) / 10.0).min(2.0);
        let dependency_part = (self.dependencies.len() as f64 / 5.0).min(1.0);
        (1.0 + complexity_part + dependency_part).min(5.0)
    }
}

/// Stateless analyzer holding its compiled regexes.
///
/// Constructed once at process start and passed by reference to every
/// consumer.
#[derive(Debug)]
pub struct InsightExtractor {
    import_re: Regex,
    require_re: Regex,
    control_flow_re: Regex,
    function_re: Regex,
    named_function_re: Regex,
    class_re: Regex,
}

impl InsightExtractor {
    /// Compile the extraction regexes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            import_re: Regex::new(
                r#"import\s+(?:\{[^}]+\}|\*\s+as\s+\w+|\w+)\s+from\s+['"]([^'"]+)['"]"#,
            )
            .expect("import regex is valid"),
            require_re: Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
                .expect("require regex is valid"),
            control_flow_re: Regex::new(r"\b(?:if|while|for|switch)\b")
                .expect("control-flow regex is valid"),
            function_re: Regex::new(r"\bfunction\b|=>").expect("function regex is valid"),
            named_function_re: Regex::new(r"\bfunction\s+\w+")
                .expect("named-function regex is valid"),
            class_re: Regex::new(r"\bclass\s+(\w+)").expect("class regex is valid"),
        }
    }

    /// Analyze source text. Always succeeds.
    #[must_use]
    pub fn analyze(&self, text: &str, file_path: &str) -> CodeInsight {
        let line_count = text.split('\n').count() as u32;
        let dependencies = self.extract_dependencies(text);
        let complexity = self.complexity(text);
        let suggested_tags = self.suggest_tags(text, &dependencies);
        let summary = self.summarize(text, &dependencies, line_count);

        let references = CodeReference::new(file_path, 0, line_count.saturating_sub(1))
            .into_iter()
            .collect();

        CodeInsight {
            summary,
            complexity,
            dependencies,
            suggested_tags,
            references,
        }
    }

    /// Build an auto-captured memory for a context from one analysis.
    ///
    /// Content is the summary; importance is derived; confidence is fixed
    /// at 0.8 because the heuristics are advisory.
    #[must_use]
    pub fn memory_for_context(&self, insight: &CodeInsight, context_id: ContextId) -> Memory {
        Memory::new(context_id, insight.summary.clone())
            .with_references(insight.references.clone())
            .with_tags(insight.suggested_tags.iter().cloned())
            .with_importance(insight.importance())
            .with_confidence(AUTO_MEMORY_CONFIDENCE)
    }

    /// Collect unique import/require targets in first-occurrence order.
    fn extract_dependencies(&self, text: &str) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();
        for line in text.lines() {
            for caps in self
                .import_re
                .captures_iter(line)
                .chain(self.require_re.captures_iter(line))
            {
                let target = &caps[1];
                if !deps.iter().any(|d| d == target) {
                    deps.push(target.to_string());
                }
            }
        }
        deps
    }

    /// Control-flow keywords + function tokens + 2 × class declarations.
    fn complexity(&self, text: &str) -> u32 {
        let control = self.control_flow_re.find_iter(text).count() as u32;
        let functions = self.function_re.find_iter(text).count() as u32;
        let classes = self.class_re.find_iter(text).count() as u32;
        control + functions + classes * 2
    }

    /// Fixed rule table: framework markers and dependency-name hints.
    fn suggest_tags(&self, text: &str, dependencies: &[String]) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        let mut add = |tag: &str, tags: &mut Vec<String>| {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        };

        if text.contains("React") {
            add("react", &mut tags);
        }
        if text.contains("useState") || text.contains("useEffect") {
            add("react-hooks", &mut tags);
        }
        if text.contains("export class") {
            add("class-based", &mut tags);
        }
        if text.contains("interface") {
            add("typescript", &mut tags);
        }

        for dep in dependencies {
            if dep.starts_with("@types/") {
                add("typescript", &mut tags);
            }
            if dep.contains("test") {
                add("testing", &mut tags);
            }
            if dep.contains("react") {
                add("react", &mut tags);
            }
        }

        tags
    }

    /// "Class X with N function(s) using a, b (L lines)". N counts named
    /// `function` declarations only; arrows still count toward complexity.
    fn summarize(&self, text: &str, dependencies: &[String], line_count: u32) -> String {
        let mut summary = String::new();

        if let Some(caps) = self.class_re.captures(text) {
            summary.push_str(&format!("Class {} ", &caps[1]));
        }

        let function_count = self.named_function_re.find_iter(text).count();
        if function_count > 0 {
            summary.push_str(&format!("with {function_count} function(s) "));
        }

        if !dependencies.is_empty() {
            summary.push_str(&format!("using {} ", dependencies.join(", ")));
        }

        summary.push_str(&format!("({line_count} lines)"));
        summary.trim().to_string()
    }
}

impl Default for InsightExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
