//! Side-effect classification for code spans.
//!
//! Classifies a body of logic text into coarse side-effect categories by
//! marker presence. Categories are deduplicated; a body is either in a
//! category or not, with no occurrence counting.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Coarse side-effect categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SideEffect {
    /// Assignments to reactive state, store commits/patches.
    StateMutation,
    /// Promises, timers, fetch-like calls, `async`/`await`.
    AsyncOperation,
    /// `document`/`window`/`navigator` access.
    DomAccess,
    /// Console logging or web storage access.
    LoggingOrStorage,
}

impl SideEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SideEffect::StateMutation => "state mutation",
            SideEffect::AsyncOperation => "async operation",
            SideEffect::DomAccess => "DOM/global access",
            SideEffect::LoggingOrStorage => "logging/storage access",
        }
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static STATE_MUTATION: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\bthis\.\w+\s*[+\-*/]?=([^=]|$)").unwrap(),
        Regex::new(r"\.value\s*[+\-*/]?=([^=]|$)").unwrap(),
        Regex::new(r"\.commit\s*\(").unwrap(),
        Regex::new(r"\.dispatch\s*\(").unwrap(),
        Regex::new(r"\$patch\s*\(").unwrap(),
    ]
});

const ASYNC_MARKERS: &[&str] = &[
    "await ",
    "async ",
    "async(",
    "setTimeout(",
    "setInterval(",
    "fetch(",
    ".then(",
    ".catch(",
    ".finally(",
    "Promise.",
    "axios.",
    "new Promise",
];

const DOM_MARKERS: &[&str] = &["document.", "window.", "navigator."];

const LOGGING_MARKERS: &[&str] = &["console.", "localStorage", "sessionStorage"];

/// Deduplicated set of side-effect categories present in `body`.
pub fn side_effects(body: &str) -> BTreeSet<SideEffect> {
    let mut found = BTreeSet::new();
    if STATE_MUTATION.iter().any(|re| re.is_match(body)) {
        found.insert(SideEffect::StateMutation);
    }
    if has_async_marker(body) {
        found.insert(SideEffect::AsyncOperation);
    }
    if DOM_MARKERS.iter().any(|m| body.contains(m)) {
        found.insert(SideEffect::DomAccess);
    }
    if LOGGING_MARKERS.iter().any(|m| body.contains(m)) {
        found.insert(SideEffect::LoggingOrStorage);
    }
    found
}

/// Whether the span contains any asynchronous-operation marker.
pub fn has_async_marker(body: &str) -> bool {
    ASYNC_MARKERS.iter().any(|m| body.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_body_has_no_effects() {
        assert!(side_effects("return a + b").is_empty());
    }

    #[test]
    fn test_state_mutation() {
        let found = side_effects("this.count = 1");
        assert!(found.contains(&SideEffect::StateMutation));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_comparison_is_not_mutation() {
        assert!(side_effects("if (this.count === 1) return").is_empty());
    }

    #[test]
    fn test_multiple_categories_deduplicated() {
        let body = "await save(); await flush(); console.log('x'); console.log('y')";
        let found = side_effects(body);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&SideEffect::AsyncOperation));
        assert!(found.contains(&SideEffect::LoggingOrStorage));
    }

    #[test]
    fn test_dom_access() {
        assert!(side_effects("document.title = q").contains(&SideEffect::DomAccess));
    }

    #[test]
    fn test_async_markers() {
        assert!(has_async_marker("return fetch(url)"));
        assert!(has_async_marker("p.then(done)"));
        assert!(!has_async_marker("return total"));
    }
}
