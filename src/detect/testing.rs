//! Testability detectors.

use once_cell::sync::Lazy;
use phf::phf_set;
use regex::Regex;

use crate::component::{NodeKind, ParsedComponent};
use crate::thresholds::Thresholds;
use crate::tree;

use super::{Issue, PatternId, Severity};

/// Elements users interact with; these are the ones test suites need to
/// address.
static INTERACTIVE_TAGS: phf::Set<&'static str> = phf_set! {
    "button", "input", "select", "textarea", "form", "a",
};

/// Attributes accepted as a stable test handle.
const TEST_HANDLES: &[&str] = &["data-testid", "data-test", "data-cy", "id"];

static NONDETERMINISTIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Math\.random\s*\(|Date\.now\s*\(|new\s+Date\s*\(\s*\)").unwrap());

/// Interactive elements with no stable selector attribute.
pub fn detect_missing_test_handle(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(root) = &component.template else {
        return Vec::new();
    };
    tree::elements(root)
        .into_iter()
        .filter(|el| {
            let interactive = INTERACTIVE_TAGS.contains(el.tag_name())
                || el.bindings.iter().any(|b| b.dynamic && b.name == "v-on");
            interactive
                && !TEST_HANDLES
                    .iter()
                    .any(|handle| tree::get_attr(el, handle).is_some())
        })
        .map(|el| {
            Issue::new(
                PatternId::MissingTestHandle,
                Severity::Low,
                format!("<{}> has no stable test selector", el.tag_name()),
                el.location,
            )
            .with_refactoring("Add a data-testid attribute so tests can address the element")
        })
        .collect()
}

/// Rendered output that changes between identical renders.
pub fn detect_nondeterministic_render(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(root) = &component.template {
        tree::traverse(root, &mut |node| {
            if node.kind == NodeKind::Expression && NONDETERMINISTIC.is_match(&node.text) {
                issues.push(nondeterministic_issue(node.location));
            }
        });
    }

    if let Some(script) = &component.script {
        for body in crate::heuristics::computed_bodies(&script.text) {
            if NONDETERMINISTIC.is_match(&body.body) {
                issues.push(nondeterministic_issue(script.location_of(body.offset)));
            }
        }
    }

    issues
}

fn nondeterministic_issue(location: crate::component::Location) -> Issue {
    Issue::new(
        PatternId::NondeterministicRender,
        Severity::Medium,
        "rendered value depends on Math.random/Date.now and differs between renders".to_string(),
        location,
    )
    .with_refactoring("Compute the value once in state, or inject a clock/rng seam")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn defaults() -> Thresholds {
        Thresholds::default()
    }

    fn component(source: &str) -> ParsedComponent {
        parser::parse(source).expect("fixture parses")
    }

    #[test]
    fn test_button_without_handle() {
        let c = component("<template><button @click=\"save\">Save</button></template>");
        let issues = detect_missing_test_handle(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Low);
    }

    #[test]
    fn test_handle_attributes_satisfy() {
        let c = component(
            "<template><button data-testid=\"save\" @click=\"save\">Save</button><input id=\"q\"/></template>",
        );
        assert!(detect_missing_test_handle(&c, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_clickable_div_counts_as_interactive() {
        let c = component("<template><div @click=\"open\">more</div></template>");
        assert_eq!(detect_missing_test_handle(&c, "a.vue", &defaults()).len(), 1);
    }

    #[test]
    fn test_plain_div_is_not_interactive() {
        let c = component("<template><div class=\"box\">text</div></template>");
        assert!(detect_missing_test_handle(&c, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_nondeterministic_interpolation() {
        let c = component("<template><p>{{ Date.now() }}</p></template>");
        let issues = detect_nondeterministic_render(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_nondeterministic_computed() {
        let c = component(
            "<script>const shuffled = computed(() => items.value.slice().sort(() => Math.random() - 0.5))</script>",
        );
        assert_eq!(detect_nondeterministic_render(&c, "a.vue", &defaults()).len(), 1);
    }

    #[test]
    fn test_deterministic_render_is_silent() {
        let c = component("<template><p>{{ createdAt }}</p></template>");
        assert!(detect_nondeterministic_render(&c, "a.vue", &defaults()).is_empty());
    }
}
