//! Lifecycle hook, listener, timer, watcher and computed extraction.
//!
//! Resource-acquisition detectors pair acquire sites (listeners, interval
//! timers) with release calls inside cleanup-hook bodies extracted here.
//! Both API styles are recognized: options-API hook methods and
//! composition-API `on*` registration calls.

use once_cell::sync::Lazy;
use regex::Regex;

use super::scanner;

/// An extracted code span with its byte offset in the logic text.
#[derive(Debug, Clone)]
pub struct BodySpan {
    /// Hook or call name the body belongs to.
    pub name: String,
    pub body: String,
    pub offset: usize,
}

static OPTIONS_CLEANUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(beforeUnmount|unmounted|beforeDestroy|destroyed)\s*[:(]").unwrap()
});
static COMPOSITION_CLEANUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(onBeforeUnmount|onUnmounted)\s*\(").unwrap());
static GLOBAL_LISTENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(window|document|globalThis)\.addEventListener\s*\(\s*['"]([\w-]+)['"]"#)
        .unwrap()
});
static SET_INTERVAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsetInterval\s*\(").unwrap());
static WATCH_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(watch|watchEffect)\s*\(").unwrap());
static WATCH_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bwatch\s*:\s*\{").unwrap());
static COMPUTED_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcomputed\s*\(").unwrap());
static COMPUTED_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcomputed\s*:\s*\{").unwrap());

/// Bodies of lifecycle cleanup hooks, both API styles.
pub fn cleanup_hooks(text: &str) -> Vec<BodySpan> {
    let mut hooks = Vec::new();

    for cap in OPTIONS_CLEANUP.captures_iter(text) {
        let m = cap.get(0).expect("whole match");
        // Hook method or property: the body is the next brace block.
        if let Some((start, end)) = scanner::brace_block(text, m.end()) {
            hooks.push(BodySpan {
                name: cap[1].to_string(),
                body: text[start..end].to_string(),
                offset: m.start(),
            });
        }
    }

    for cap in COMPOSITION_CLEANUP.captures_iter(text) {
        let m = cap.get(0).expect("whole match");
        // The whole registration argument (callback included) is the body.
        if let Some(close) = scanner::matching_bracket(text, m.end() - 1) {
            hooks.push(BodySpan {
                name: cap[1].to_string(),
                body: text[m.end()..close].to_string(),
                offset: m.start(),
            });
        }
    }

    hooks.sort_by_key(|h| h.offset);
    hooks
}

/// A global event subscription site.
#[derive(Debug, Clone)]
pub struct GlobalListener {
    /// Subscription target (`window`, `document`, `globalThis`).
    pub target: String,
    pub event: String,
    pub offset: usize,
}

/// `addEventListener` calls on global targets.
pub fn global_listeners(text: &str) -> Vec<GlobalListener> {
    GLOBAL_LISTENER
        .captures_iter(text)
        .map(|cap| GlobalListener {
            target: cap[1].to_string(),
            event: cap[2].to_string(),
            offset: cap.get(0).expect("whole match").start(),
        })
        .collect()
}

/// Whether any cleanup hook body releases the given event.
pub fn listener_released(hooks: &[BodySpan], event: &str) -> bool {
    let pattern = format!(
        r#"removeEventListener\s*\(\s*['"]{}['"]"#,
        regex::escape(event)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return false;
    };
    hooks.iter().any(|h| re.is_match(&h.body))
}

/// Byte offsets of `setInterval(` call sites.
pub fn interval_timers(text: &str) -> Vec<usize> {
    SET_INTERVAL.find_iter(text).map(|m| m.start()).collect()
}

/// Whether any cleanup hook body clears an interval.
pub fn interval_cleared(hooks: &[BodySpan]) -> bool {
    hooks.iter().any(|h| h.body.contains("clearInterval"))
}

/// Watcher bodies: each `watch(...)`/`watchEffect(...)` call argument, and
/// the whole options-API `watch: { ... }` object as one span (per-handler
/// splitting is not attempted — documented approximation).
pub fn watcher_bodies(text: &str) -> Vec<BodySpan> {
    let mut bodies = Vec::new();
    for cap in WATCH_CALL.captures_iter(text) {
        let m = cap.get(0).expect("whole match");
        if let Some(close) = scanner::matching_bracket(text, m.end() - 1) {
            bodies.push(BodySpan {
                name: cap[1].to_string(),
                body: text[m.end()..close].to_string(),
                offset: m.start(),
            });
        }
    }
    for m in WATCH_OBJECT.find_iter(text) {
        if let Some(close) = scanner::matching_bracket(text, m.end() - 1) {
            bodies.push(BodySpan {
                name: "watch".to_string(),
                body: text[m.end()..close].to_string(),
                offset: m.start(),
            });
        }
    }
    bodies.sort_by_key(|b| b.offset);
    bodies
}

/// Computed bodies: `computed(...)` call arguments plus the options-API
/// `computed: { ... }` object body.
pub fn computed_bodies(text: &str) -> Vec<BodySpan> {
    let mut bodies = Vec::new();
    for m in COMPUTED_CALL.find_iter(text) {
        if let Some(close) = scanner::matching_bracket(text, m.end() - 1) {
            bodies.push(BodySpan {
                name: "computed".to_string(),
                body: text[m.end()..close].to_string(),
                offset: m.start(),
            });
        }
    }
    for m in COMPUTED_OBJECT.find_iter(text) {
        if let Some(close) = scanner::matching_bracket(text, m.end() - 1) {
            bodies.push(BodySpan {
                name: "computed".to_string(),
                body: text[m.end()..close].to_string(),
                offset: m.start(),
            });
        }
    }
    bodies.sort_by_key(|b| b.offset);
    bodies
}
