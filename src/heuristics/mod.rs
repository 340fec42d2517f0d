//! Text heuristic extractors over raw logic-block source.
//!
//! Everything here is a best-effort approximation: extractors may under- or
//! over-report facts and must never panic. Absent input (empty text) always
//! yields empty results. Detectors stay declarative by composing these
//! routines instead of scanning strings themselves.

pub mod effects;
pub mod hooks;
pub mod props;
pub mod scanner;
pub mod stores;

use once_cell::sync::Lazy;
use regex::Regex;

pub use effects::{has_async_marker, side_effects, SideEffect};
pub use hooks::{
    cleanup_hooks, computed_bodies, global_listeners, interval_cleared, interval_timers,
    listener_released, watcher_bodies, BodySpan, GlobalListener,
};
pub use props::{declared_props, prop_mutations, prop_usage, PropMutation};
pub use stores::{guard_bodies, mutation_handlers, store_definitions, GuardBody, MutationHandler, StoreDef};

static METHODS_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmethods\s*:\s*\{").unwrap());
static MIXINS_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmixins\s*:\s*\[").unwrap());
static TOP_LEVEL_FN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:export\s+)?(?:async\s+)?function\s+\w+|^const\s+\w+\s*=\s*(?:async\s*)?(?:\([^)]*\)|\w+)\s*=>").unwrap()
});
static COMPONENT_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*import\s+\w+\s+from\s+['"][^'"]+\.vue['"]"#).unwrap()
});
static COMPUTED_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcomputed\s*\(").unwrap());
static COMPUTED_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcomputed\s*:\s*\{").unwrap());

/// Estimated number of methods: entries of the options-API `methods`
/// object plus top-level function declarations in a setup-style script.
pub fn count_methods(text: &str) -> usize {
    let mut count = 0;
    if let Some(m) = METHODS_OBJECT.find(text) {
        if let Some(close) = scanner::matching_bracket(text, m.end() - 1) {
            count += scanner::entry_count(&text[m.end()..close]);
        }
    }
    count + TOP_LEVEL_FN.find_iter(text).count()
}

/// Estimated number of computed properties, both API styles.
pub fn count_computed(text: &str) -> usize {
    // Each composition-API call registers exactly one property.
    let mut count = COMPUTED_CALL.find_iter(text).count();
    for m in COMPUTED_OBJECT.find_iter(text) {
        if let Some(close) = scanner::matching_bracket(text, m.end() - 1) {
            count += scanner::entry_count(&text[m.end()..close]);
        }
    }
    count
}

/// Number of entries in the options-API `mixins` array.
pub fn count_mixins(text: &str) -> usize {
    let Some(m) = MIXINS_ARRAY.find(text) else {
        return 0;
    };
    match scanner::matching_bracket(text, m.end() - 1) {
        Some(close) => scanner::entry_count(&text[m.end()..close]),
        None => 0,
    }
}

/// Number of statically imported component modules (`.vue` paths).
pub fn count_component_imports(text: &str) -> usize {
    COMPONENT_IMPORT.find_iter(text).count()
}

/// Entry count of the first object literal at or after `from`.
pub fn object_literal_keys(text: &str, from: usize) -> usize {
    match scanner::brace_block(text, from) {
        Some((start, end)) => scanner::entry_count(&text[start..end]),
        None => 0,
    }
}

/// Entry count of the first array literal at or after `from`.
pub fn array_literal_len(text: &str, from: usize) -> usize {
    let Some(open) = text[from..].find('[').map(|i| i + from) else {
        return 0;
    };
    match scanner::matching_bracket(text, open) {
        Some(close) => scanner::entry_count(&text[open + 1..close]),
        None => 0,
    }
}
