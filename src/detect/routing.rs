//! Navigation and routing detectors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::{Location, ParsedComponent};
use crate::heuristics;
use crate::thresholds::Thresholds;

use super::{Issue, PatternId, Severity};

/// Responsibility categories recognized inside guard bodies, each with the
/// keywords that mark it. Ten categories total; presence is boolean.
const RESPONSIBILITIES: &[(&str, &[&str])] = &[
    ("authentication", &["auth", "token", "login", "session"]),
    ("permissions", &["permission", "role", "allowed", "acl"]),
    ("redirection", &["redirect", "next('/", "next(\"/", "next({"]),
    ("data fetching", &["fetch(", "axios.", "api.", "await "]),
    ("analytics", &["track", "analytics", "gtag", "pageview"]),
    ("meta validation", &["meta."]),
    ("loading state", &["loading", "spinner", "progress"]),
    ("document mutation", &["document."]),
    ("store access", &["store", "dispatch(", "commit(", "$patch"]),
    ("error handling", &["try", "catch", "error"]),
];

static ROUTE_ACCESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$route\.(params|query|meta|path|name)|\broute\.(params|query|meta)\.").unwrap()
});
static NEXT_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bnext\s*\(").unwrap());
static NEXT_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bnext\b").unwrap());

fn at(component: &ParsedComponent, offset: usize) -> Location {
    component
        .script
        .as_ref()
        .map(|s| s.location_of(offset))
        .unwrap_or_default()
}

fn responsibility_names(body: &str) -> Vec<&'static str> {
    RESPONSIBILITIES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| body.contains(k)))
        .map(|(name, _)| *name)
        .collect()
}

/// Guards carrying too many responsibilities or too many lines.
pub fn detect_overloaded_guard(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    let mut issues = Vec::new();
    for guard in heuristics::guard_bodies(text) {
        let responsibilities = responsibility_names(&guard.body);
        let lines = guard.body.lines().count();
        let over_responsibilities = responsibilities.len() > thresholds.guard_responsibilities;
        let over_lines = lines > thresholds.guard_lines;
        let severity = match (over_responsibilities, over_lines) {
            (true, true) => Severity::Critical,
            (true, false) => Severity::High,
            (false, true) => Severity::Medium,
            (false, false) => continue,
        };
        issues.push(
            Issue::new(
                PatternId::OverloadedGuard,
                severity,
                format!(
                    "{} guard spans {} lines and handles {} concerns: {}",
                    guard.name,
                    lines,
                    responsibilities.len(),
                    responsibilities.join(", ")
                ),
                at(component, guard.offset),
            )
            .with_refactoring("Split the guard into focused per-concern guards or composables"),
        );
    }
    issues
}

/// Components reading the route object in many places are coupled to URL
/// structure.
pub fn detect_route_coupling(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = &component.script else {
        return Vec::new();
    };
    let accesses: Vec<usize> = ROUTE_ACCESS
        .find_iter(&script.text)
        .map(|m| m.start())
        .collect();
    if accesses.len() <= thresholds.route_access_count {
        return Vec::new();
    }
    vec![Issue::new(
        PatternId::RouteCoupling,
        Severity::Medium,
        format!(
            "component reads the route object {} times (limit {})",
            accesses.len(),
            thresholds.route_access_count
        ),
        at(component, accesses[0]),
    )
    .with_refactoring("Pass route params in as props via the route's props option")]
}

/// Guards that accept a `next` callback but never invoke it leave the
/// navigation pending forever.
pub fn detect_guard_missing_resolution(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    heuristics::guard_bodies(text)
        .into_iter()
        .filter(|guard| NEXT_PARAM.is_match(&guard.params) && !NEXT_CALL.is_match(&guard.body))
        .map(|guard| {
            Issue::new(
                PatternId::GuardMissingResolution,
                Severity::Critical,
                format!("{} guard declares next but never calls it", guard.name),
                at(component, guard.offset),
            )
            .with_refactoring("Call next() on every code path, or drop the parameter")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn defaults() -> Thresholds {
        Thresholds::default()
    }

    fn script(body: &str) -> ParsedComponent {
        parser::parse(&format!("<script>{}</script>", body)).expect("fixture parses")
    }

    #[test]
    fn test_overloaded_guard_responsibilities() {
        let c = script(
            "router.beforeEach(async (to, from, next) => {\n  if (!auth.token) { next('/login'); return }\n  if (!hasPermission(to.meta.role)) { next('/denied'); return }\n  store.dispatch('load')\n  analytics.track('nav')\n  next()\n})",
        );
        let issues = detect_overloaded_guard(&c, "router.js", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn test_focused_guard_is_silent() {
        let c = script("router.beforeEach((to, from, next) => { next() })");
        assert!(detect_overloaded_guard(&c, "router.js", &defaults()).is_empty());
    }

    #[test]
    fn test_long_guard_is_medium() {
        let mut body = String::from("router.beforeEach((to, from, next) => {\n");
        for _ in 0..60 {
            body.push_str("  noop()\n");
        }
        body.push_str("  next()\n})");
        let issues = detect_overloaded_guard(&script(&body), "router.js", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_route_coupling() {
        let c = script(
            "const id = this.$route.params.id\nconst tab = this.$route.query.tab\nconst page = this.$route.query.page\nconst sort = this.$route.query.sort",
        );
        let issues = detect_route_coupling(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_guard_missing_resolution() {
        let c = script("router.beforeEach((to, from, next) => { if (to.meta.auth) { redirect() } })");
        let issues = detect_guard_missing_resolution(&c, "router.js", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_guard_calling_next_is_silent() {
        let c = script("router.beforeEach((to, from, next) => { next() })");
        assert!(detect_guard_missing_resolution(&c, "router.js", &defaults()).is_empty());
    }
}
