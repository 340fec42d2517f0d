//! Store and state-management detectors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::{Location, ParsedComponent};
use crate::heuristics;
use crate::thresholds::Thresholds;

use super::{Issue, PatternId, Severity};

static STORE_STATE_WRITE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:this\.)?\$?store\.state\.[\w.$]+\s*(?:\+\+|--|[+\-*/]?=([^=]|$))").unwrap()
});

fn at(component: &ParsedComponent, offset: usize) -> Location {
    component
        .script
        .as_ref()
        .map(|s| s.location_of(offset))
        .unwrap_or_default()
}

/// Mutation handlers are synchronous by contract; any async marker inside
/// one is a violation.
pub fn detect_async_mutation(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    heuristics::mutation_handlers(text)
        .into_iter()
        .filter(|handler| heuristics::has_async_marker(&handler.body))
        .map(|handler| {
            Issue::new(
                PatternId::AsyncMutation,
                Severity::Critical,
                format!("mutation handler '{}' performs asynchronous work", handler.name),
                at(component, handler.offset),
            )
            .with_refactoring("Move the async work into an action and commit the result")
        })
        .collect()
}

/// Two co-defined stores whose bodies reference each other. Bounded to
/// single-file co-definition; cross-file cycles are invisible here.
pub fn detect_circular_store_refs(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    let stores = heuristics::store_definitions(text);
    let mut issues = Vec::new();
    for (i, a) in stores.iter().enumerate() {
        for b in &stores[i + 1..] {
            if b.referenced_in(&a.body) && a.referenced_in(&b.body) {
                issues.push(
                    Issue::new(
                        PatternId::CircularStoreRefs,
                        Severity::High,
                        format!("stores '{}' and '{}' reference each other", a.id, b.id),
                        at(component, a.offset),
                    )
                    .with_refactoring("Extract the shared state into a third store or a composable"),
                );
            }
        }
    }
    issues
}

/// Writes to store state from outside the store's own handlers.
pub fn detect_direct_state_mutation(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = &component.script else {
        return Vec::new();
    };
    STORE_STATE_WRITE
        .find_iter(&script.text)
        .map(|m| {
            Issue::new(
                PatternId::DirectStateMutation,
                Severity::High,
                format!("store state mutated outside a handler: {}", m.as_str().trim_end()),
                script.location_of(m.start()),
            )
            .with_refactoring("Commit a mutation or call a store action instead")
        })
        .collect()
}

/// Stores that have grown past the state-key or action-count limits.
pub fn detect_god_store(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    let mut issues = Vec::new();
    for store in heuristics::store_definitions(text) {
        let keys = store.state_key_count();
        let actions = store.action_count();
        let over_keys = keys > thresholds.store_state_keys;
        let over_actions = actions > thresholds.store_action_count;
        let severity = match (over_keys, over_actions) {
            (true, true) => Severity::High,
            (true, false) | (false, true) => Severity::Medium,
            (false, false) => continue,
        };
        issues.push(
            Issue::new(
                PatternId::GodStore,
                severity,
                format!(
                    "store '{}' holds {} state keys and {} actions",
                    store.id, keys, actions
                ),
                at(component, store.offset),
            )
            .with_refactoring("Split the store along its feature boundaries"),
        );
    }
    issues
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
    fn test_async_mutation_is_critical() {
        let c = script(
            "export default { mutations: { setUser(state, u) { state.user = u }, async load(state) { state.x = await get() } } }",
        );
        let issues = detect_async_mutation(&c, "store.js", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].message.contains("load"));
    }

    #[test]
    fn test_circular_store_refs_fires_per_pair() {
        let c = script(
            "const useA = defineStore('a', { actions: { sync() { useB().pull() } } })\nconst useB = defineStore('b', { actions: { pull() { useA().push() } } })",
        );
        let issues = detect_circular_store_refs(&c, "stores.js", &defaults());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("'a'"));
        assert!(issues[0].message.contains("'b'"));
    }

    #[test]
    fn test_one_way_reference_is_silent() {
        let c = script(
            "const useA = defineStore('a', { actions: { sync() { useB().pull() } } })\nconst useB = defineStore('b', { actions: { pull() { return 1 } } })",
        );
        assert!(detect_circular_store_refs(&c, "stores.js", &defaults()).is_empty());
    }

    #[test]
    fn test_direct_state_mutation() {
        let c = script("methods: { reset() { this.$store.state.cart.items = [] } }");
        let issues = detect_direct_state_mutation(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn test_state_read_is_not_a_mutation() {
        let c = script("computed: { items() { return this.$store.state.cart.items } }");
        assert!(detect_direct_state_mutation(&c, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_god_store_thresholds() {
        let keys: Vec<String> = (0..25).map(|i| format!("k{}: {}", i, i)).collect();
        let c = script(&format!(
            "export const useBig = defineStore('big', {{ state: () => ({{ {} }}) }})",
            keys.join(", ")
        ));
        let issues = detect_god_store(&c, "store.js", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);
    }
}
