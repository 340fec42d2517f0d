//! Per-file analysis orchestration.

use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;

use crate::component::Location;
use crate::parser;
use crate::thresholds::Thresholds;

use super::registry::registry;
use super::{FileResult, Issue, PatternId, Severity, SourceFile};

/// Analyze one component source. Never fails: an unparseable file yields a
/// result with a single `PARSE_ERROR` sentinel issue, and a panicking
/// detector is noted on stderr while the rest of the registry still runs.
pub fn analyze(file_path: &str, source: &str, thresholds: &Thresholds) -> FileResult {
    let component = match parser::parse(source) {
        Ok(component) => component,
        Err(err) => {
            return FileResult {
                file_path: file_path.to_string(),
                issues: vec![Issue::new(
                    PatternId::ParseError,
                    Severity::Critical,
                    format!("file could not be parsed: {}", err),
                    Location::default(),
                )],
            }
        }
    };

    let mut issues = Vec::new();
    for entry in registry() {
        let run = entry.run;
        match catch_unwind(AssertUnwindSafe(|| run(&component, file_path, thresholds))) {
            Ok(found) => issues.extend(found),
            Err(_) => {
                eprintln!(
                    "warning: detector {} failed on {}; its findings are omitted",
                    entry.id, file_path
                );
            }
        }
    }

    // Stable sort: equal severities keep registration order.
    issues.sort_by(|a, b| b.severity.weight().cmp(&a.severity.weight()));

    FileResult {
        file_path: file_path.to_string(),
        issues,
    }
}

/// Analyze a batch of files in parallel. Results come back in input order,
/// one per file, regardless of individual parse failures.
pub fn analyze_many(files: &[SourceFile], thresholds: &Thresholds) -> Vec<FileResult> {
    files
        .par_iter()
        .map(|file| analyze(&file.path, &file.content, thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn test_parse_failure_yields_sentinel() {
        let result = analyze("broken.vue", "just some text", &defaults());
        assert_eq!(result.issues.len(), 1);
        let issue = &result.issues[0];
        assert_eq!(issue.pattern, PatternId::ParseError);
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.location, Location::new(1, 1));
    }

    #[test]
    fn test_issues_sorted_by_descending_severity() {
        let source = r#"<template>
  <div style="color: red">
    <li v-for="(u, i) in users" v-if="u.active" :key="i">{{ u.name }}</li>
  </div>
</template>"#;
        let result = analyze("list.vue", source, &defaults());
        assert!(result.issues.len() >= 3);
        for pair in result.issues.windows(2) {
            assert!(pair[0].severity.weight() >= pair[1].severity.weight());
        }
        assert_eq!(result.issues[0].pattern, PatternId::VifWithVfor);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let source = r#"<template><li v-for="u in users">{{ u.name }}</li></template>
<script>export default { props: ['users', 'stale'] }</script>"#;
        let a = analyze("a.vue", source, &defaults());
        let b = analyze("a.vue", source, &defaults());
        assert_eq!(a.issues.len(), b.issues.len());
        for (x, y) in a.issues.iter().zip(&b.issues) {
            assert_eq!(x.pattern, y.pattern);
            assert_eq!(x.message, y.message);
            assert_eq!(x.location, y.location);
        }
    }

    #[test]
    fn test_clean_component_has_no_issues() {
        let source = r#"<template><p data-testid="greeting">{{ greeting }}</p></template>
<script>export default { props: { greeting: String }, computed: { shout() { return this.greeting } } }</script>"#;
        let result = analyze("clean.vue", source, &defaults());
        assert!(result.issues.is_empty(), "unexpected: {:?}", result.issues);
    }

    #[test]
    fn test_analyze_many_preserves_input_order() {
        let files = vec![
            SourceFile {
                path: "first.vue".to_string(),
                content: "<template><p>ok</p></template>".to_string(),
            },
            SourceFile {
                path: "second.vue".to_string(),
                content: "nonsense".to_string(),
            },
            SourceFile {
                path: "third.vue".to_string(),
                content: "<template><p>ok</p></template>".to_string(),
            },
        ];
        let results = analyze_many(&files, &defaults());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].file_path, "first.vue");
        assert_eq!(results[1].file_path, "second.vue");
        assert_eq!(results[2].file_path, "third.vue");
        assert_eq!(results[1].issues[0].pattern, PatternId::ParseError);
    }
}
