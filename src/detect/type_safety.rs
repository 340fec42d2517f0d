//! TypeScript hygiene detectors. All of these are scoped to components
//! whose logic block declares `lang="ts"`; plain JavaScript blocks are
//! never flagged.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::{LogicBlock, ParsedComponent};
use crate::thresholds::Thresholds;

use super::{Issue, PatternId, Severity};

static ANY_USE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":\s*any\b|\bas\s+any\b|<any[,>]").unwrap());
static ARRAY_PROPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bprops\s*:\s*\[|\bdefineProps\s*\(\s*\[").unwrap());
static UNTYPED_EMITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdefineEmits\s*\(\s*\[").unwrap());
static NON_NULL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w\])]!(?:\.|\)|,|;|\s)").unwrap());

fn ts_block(component: &ParsedComponent) -> Option<&LogicBlock> {
    component.script.as_ref().filter(|s| s.is_typescript())
}

/// Explicit `any` annotations and casts.
pub fn detect_any_type(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = ts_block(component) else {
        return Vec::new();
    };
    ANY_USE
        .find_iter(&script.text)
        .map(|m| {
            Issue::new(
                PatternId::AnyType,
                Severity::Medium,
                format!("explicit any defeats type checking: {}", m.as_str().trim()),
                script.location_of(m.start()),
            )
            .with_refactoring("Name the real type, or use unknown and narrow it")
        })
        .collect()
}

/// String-array prop declarations in a typed block carry no types.
pub fn detect_untyped_props(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = ts_block(component) else {
        return Vec::new();
    };
    ARRAY_PROPS
        .find_iter(&script.text)
        .map(|m| {
            Issue::new(
                PatternId::UntypedProps,
                Severity::Medium,
                "props are declared as a bare name list with no types".to_string(),
                script.location_of(m.start()),
            )
            .with_refactoring("Declare props with defineProps<{...}>() or typed object entries")
        })
        .collect()
}

/// `defineEmits` called with a bare event-name array.
pub fn detect_untyped_emits(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = ts_block(component) else {
        return Vec::new();
    };
    UNTYPED_EMITS
        .find_iter(&script.text)
        .map(|m| {
            Issue::new(
                PatternId::UntypedEmits,
                Severity::Low,
                "emits are declared without payload types".to_string(),
                script.location_of(m.start()),
            )
            .with_refactoring("Declare emits with defineEmits<{...}>() to type the payloads")
        })
        .collect()
}

/// Non-null assertions past the configured tolerance.
pub fn detect_non_null_assertion(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = ts_block(component) else {
        return Vec::new();
    };
    let sites: Vec<usize> = NON_NULL.find_iter(&script.text).map(|m| m.start()).collect();
    if sites.len() <= thresholds.non_null_assertions {
        return Vec::new();
    }
    vec![Issue::new(
        PatternId::NonNullAssertion,
        Severity::Medium,
        format!(
            "{} non-null assertions (limit {})",
            sites.len(),
            thresholds.non_null_assertions
        ),
        script.location_of(sites[0]),
    )
    .with_refactoring("Narrow with explicit checks instead of asserting non-null")]
}
