//! Reactivity and lifecycle detectors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::{Location, ParsedComponent};
use crate::heuristics;
use crate::thresholds::Thresholds;

use super::{Issue, PatternId, Severity};

static DEEP_WATCH_OPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdeep\s*:\s*true\b").unwrap());
static REACTIVE_DESTRUCTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:const|let|var)\s*\{[^}]*\}\s*=\s*(reactive\s*\(|props\s*[;\n)])").unwrap()
});
static DOM_MANIPULATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"document\.(querySelector(All)?|getElementById|getElementsBy\w+|createElement)\s*\(|\.innerHTML\s*=[^=]",
    )
    .unwrap()
});

fn at(component: &ParsedComponent, offset: usize) -> Location {
    component
        .script
        .as_ref()
        .map(|s| s.location_of(offset))
        .unwrap_or_default()
}

/// Writes to declared props through an instance-qualified path.
pub fn detect_prop_mutation(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    let props = heuristics::declared_props(text);
    heuristics::prop_mutations(text, &props)
        .into_iter()
        .map(|m| {
            Issue::new(
                PatternId::PropMutation,
                Severity::Critical,
                format!("prop '{}' is mutated directly: {}", m.prop, m.site),
                at(component, m.offset),
            )
            .with_refactoring("Emit an update event or copy the prop into local state")
        })
        .collect()
}

/// Global event subscriptions with no matching release in any cleanup hook.
pub fn detect_unreleased_listener(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    let hooks = heuristics::cleanup_hooks(text);
    heuristics::global_listeners(text)
        .into_iter()
        .filter(|listener| !heuristics::listener_released(&hooks, &listener.event))
        .map(|listener| {
            Issue::new(
                PatternId::UnreleasedListener,
                Severity::High,
                format!(
                    "'{}' listener on {} is never removed in a cleanup hook",
                    listener.event, listener.target
                ),
                at(component, listener.offset),
            )
            .with_refactoring("Call removeEventListener in beforeUnmount/onBeforeUnmount")
        })
        .collect()
}

/// Interval timers never cleared in a cleanup hook.
pub fn detect_unreleased_timer(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    let hooks = heuristics::cleanup_hooks(text);
    if heuristics::interval_cleared(&hooks) {
        return Vec::new();
    }
    heuristics::interval_timers(text)
        .into_iter()
        .map(|offset| {
            Issue::new(
                PatternId::UnreleasedTimer,
                Severity::High,
                "setInterval timer is never cleared in a cleanup hook".to_string(),
                at(component, offset),
            )
            .with_refactoring("Store the interval id and clearInterval it on unmount")
        })
        .collect()
}

/// Watchers touching more side-effect categories than allowed.
pub fn detect_watcher_side_effects(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    heuristics::watcher_bodies(text)
        .into_iter()
        .filter_map(|watcher| {
            let effects = heuristics::side_effects(&watcher.body);
            if effects.len() <= thresholds.watcher_effect_categories {
                return None;
            }
            let names: Vec<&str> = effects.iter().map(|e| e.as_str()).collect();
            Some(
                Issue::new(
                    PatternId::WatcherSideEffects,
                    Severity::Medium,
                    format!(
                        "{} body mixes {} side-effect categories: {}",
                        watcher.name,
                        effects.len(),
                        names.join(", ")
                    ),
                    at(component, watcher.offset),
                )
                .with_refactoring("Split the watcher so each handles one concern"),
            )
        })
        .collect()
}

/// `deep: true` watchers traverse the whole value on every change.
pub fn detect_deep_watcher(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    heuristics::watcher_bodies(text)
        .into_iter()
        .filter(|watcher| DEEP_WATCH_OPTION.is_match(&watcher.body))
        .map(|watcher| {
            Issue::new(
                PatternId::DeepWatcher,
                Severity::Medium,
                "deep watcher re-traverses the whole watched value on every change".to_string(),
                at(component, watcher.offset),
            )
            .with_refactoring("Watch the specific nested paths that actually matter")
        })
        .collect()
}

/// Destructuring a reactive object or the props object severs reactivity.
pub fn detect_reactive_destructure(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = &component.script else {
        return Vec::new();
    };
    REACTIVE_DESTRUCTURE
        .find_iter(&script.text)
        .map(|m| {
            Issue::new(
                PatternId::ReactiveDestructure,
                Severity::High,
                "destructuring a reactive source loses reactivity on the extracted fields"
                    .to_string(),
                script.location_of(m.start()),
            )
            .with_refactoring("Use toRefs() or access the fields through the source object")
        })
        .collect()
}

/// Direct DOM queries and writes bypass the component's rendered output.
pub fn detect_direct_dom_manipulation(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = &component.script else {
        return Vec::new();
    };
    DOM_MANIPULATION
        .find_iter(&script.text)
        .map(|m| {
            Issue::new(
                PatternId::DirectDomManipulation,
                Severity::Medium,
                format!("direct DOM manipulation: {}", m.as_str().trim_end_matches('(')),
                script.location_of(m.start()),
            )
            .with_refactoring("Use template refs and reactive bindings instead of DOM queries")
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
    fn test_prop_mutation_is_critical() {
        let c = script("export default { props: ['total'], methods: { bump() { this.total += 1 } } }");
        let issues = detect_prop_mutation(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].message.contains("total"));
    }

    #[test]
    fn test_unreleased_listener_fires_per_unpaired_event() {
        let c = script(
            "mounted() {\n  window.addEventListener('scroll', this.onScroll)\n  window.addEventListener('resize', this.onResize)\n}\nbeforeUnmount() { window.removeEventListener('scroll', this.onScroll) }",
        );
        let issues = detect_unreleased_listener(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("resize"));
    }

    #[test]
    fn test_released_listener_is_silent() {
        let c = script(
            "onMounted(() => window.addEventListener('keydown', h))\nonUnmounted(() => window.removeEventListener('keydown', h))",
        );
        assert!(detect_unreleased_listener(&c, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_unreleased_timer() {
        let c = script("mounted() { this.poll = setInterval(this.tick, 1000) }");
        let issues = detect_unreleased_timer(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);

        let cleared = script(
            "mounted() { this.poll = setInterval(this.tick, 1000) }\nbeforeUnmount() { clearInterval(this.poll) }",
        );
        assert!(detect_unreleased_timer(&cleared, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_watcher_side_effects_over_threshold() {
        let c = script(
            "watch(query, async (q) => {\n  this.loading = true\n  await search(q)\n  document.title = q\n})",
        );
        let issues = detect_watcher_side_effects(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("3 side-effect categories"));
    }

    #[test]
    fn test_focused_watcher_is_silent() {
        let c = script("watch(query, (q) => { results.value = filter(q) })");
        assert!(detect_watcher_side_effects(&c, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_deep_watcher() {
        let c = script("watch(form, onChange, { deep: true })");
        assert_eq!(detect_deep_watcher(&c, "a.vue", &defaults()).len(), 1);
        let shallow = script("watch(form, onChange)");
        assert!(detect_deep_watcher(&shallow, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_reactive_destructure() {
        let c = script("const { name, email } = reactive(form)");
        let issues = detect_reactive_destructure(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn test_to_refs_destructure_is_fine() {
        let c = script("const { name, email } = toRefs(props)");
        assert!(detect_reactive_destructure(&c, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_direct_dom_manipulation() {
        let c = script("mounted() { document.querySelector('.box').innerHTML = html }");
        let issues = detect_direct_dom_manipulation(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::Medium);
    }
}
