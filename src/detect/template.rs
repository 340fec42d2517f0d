//! Template (markup) detectors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::{NodeKind, ParsedComponent, TreeNode};
use crate::thresholds::Thresholds;
use crate::tree;

use super::{Issue, PatternId, Severity};

/// Path segments that mark a shared component directory. Files under one
/// get a severity bump for missing iteration keys. This is policy, not a
/// law: the segment match is deliberately narrow (whole segment, not
/// substring) so `my-components-util/` does not trigger it.
const COMPONENT_DIR_MARKERS: &[&str] = &["components"];

static CALL_EXPR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w$]+\s*\(").unwrap());
static MEMBER_CHAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w$]+(?:\.[\w$]+)+").unwrap());
static STRING_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^('[^']*'|"[^"]*")$"#).unwrap());

/// A parsed `v-for` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Iteration {
    pub item: String,
    /// Secondary (index) variable of the `(item, index)` form.
    pub index: Option<String>,
    pub iterable: String,
}

static ITER_TUPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(\s*([\w$]+)\s*,\s*([\w$]+)\s*(?:,\s*[\w$]+\s*)?\)\s+(?:in|of)\s+(.+)$")
        .unwrap()
});
static ITER_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\w$]+)\s+(?:in|of)\s+(.+)$").unwrap());

/// Parse the expression of an iteration binding. Returns `None` for forms
/// the detector cannot reason about (destructured items, malformed text).
pub(crate) fn parse_iteration(expr: &str) -> Option<Iteration> {
    let expr = expr.trim();
    if let Some(cap) = ITER_TUPLE.captures(expr) {
        return Some(Iteration {
            item: cap[1].to_string(),
            index: Some(cap[2].to_string()),
            iterable: cap[3].trim().to_string(),
        });
    }
    let cap = ITER_SINGLE.captures(expr)?;
    Some(Iteration {
        item: cap[1].to_string(),
        index: None,
        iterable: cap[2].trim().to_string(),
    })
}

/// Conditional rendering on an iterated element: the evaluation order of
/// the two directives is undefined, so this is always CRITICAL. Exactly
/// one issue per element.
pub fn detect_vif_with_vfor(
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
            tree::has_directive(el, "v-for")
                && (tree::has_directive(el, "v-if") || tree::has_directive(el, "v-else-if"))
        })
        .map(|el| {
            Issue::new(
                PatternId::VifWithVfor,
                Severity::Critical,
                format!(
                    "<{}> combines v-for and v-if; the directives have no defined evaluation order",
                    el.tag_name()
                ),
                el.location,
            )
            .with_refactoring("Move the v-if to a wrapper element or filter the list in a computed property")
        })
        .collect()
}

/// Iterated element with no key in either accepted form.
pub fn detect_vfor_without_key(
    component: &ParsedComponent,
    file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(root) = &component.template else {
        return Vec::new();
    };
    let severity = if in_component_dir(file_path) {
        Severity::High
    } else {
        Severity::Medium
    };
    tree::elements(root)
        .into_iter()
        .filter(|el| tree::has_directive(el, "v-for") && !tree::has_key(el))
        .map(|el| {
            Issue::new(
                PatternId::VforWithoutKey,
                severity,
                format!("<{}> iterates without a key binding", el.tag_name()),
                el.location,
            )
            .with_refactoring("Bind :key to a stable identifier of the iterated item")
        })
        .collect()
}

fn in_component_dir(file_path: &str) -> bool {
    file_path
        .split(['/', '\\'])
        .any(|segment| COMPONENT_DIR_MARKERS.contains(&segment.to_lowercase().as_str()))
}

/// Key bound to the iteration's index variable: reordering the list
/// produces stale renders.
pub fn detect_index_as_key(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(root) = &component.template else {
        return Vec::new();
    };
    let mut issues = Vec::new();
    for el in tree::elements(root) {
        let Some(vfor) = tree::get_directive(el, "v-for") else {
            continue;
        };
        let Some(key) = tree::get_bound_attr(el, "key") else {
            continue;
        };
        let Some(iteration) = parse_iteration(&vfor.value) else {
            continue;
        };
        // Identifier comparison, not substring: `:key="idx"` matches the
        // loop's `idx`, `:key="item.idx"` does not.
        if iteration.index.as_deref() == Some(key.value.trim()) {
            issues.push(
                Issue::new(
                    PatternId::IndexAsKey,
                    Severity::High,
                    format!(
                        "<{}> keys its v-for by the index variable '{}'",
                        el.tag_name(),
                        key.value.trim()
                    ),
                    el.location,
                )
                .with_refactoring("Key by a stable property of the item instead of its position"),
            );
        }
    }
    issues
}

/// Classify an interpolation expression. Returns `None` below every tier.
///
/// A call expression is always CRITICAL; length alone never downgrades it.
fn classify_expression(expr: &str, limit: usize) -> Option<Severity> {
    let len = expr.len();
    let has_call = CALL_EXPR.is_match(expr);
    let has_ops =
        expr.contains("&&") || expr.contains("||") || (expr.contains('?') && expr.contains(':'));
    let chain_depth = MEMBER_CHAIN
        .find_iter(expr)
        .map(|m| m.as_str().matches('.').count())
        .max()
        .unwrap_or(0);

    if has_call || len > limit * 3 {
        Some(Severity::Critical)
    } else if len > limit * 2 || (has_ops && len > limit) {
        Some(Severity::High)
    } else if len > limit || chain_depth >= 3 {
        Some(Severity::Medium)
    } else {
        None
    }
}

/// Logic embedded in interpolation expressions.
pub fn detect_complex_expression(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(root) = &component.template else {
        return Vec::new();
    };
    let limit = thresholds.template_expression_length;
    let mut issues = Vec::new();
    tree::traverse(root, &mut |node| {
        if node.kind != NodeKind::Expression {
            return;
        }
        if let Some(severity) = classify_expression(&node.text, limit) {
            issues.push(
                Issue::new(
                    PatternId::ComplexTemplateExpression,
                    severity,
                    format!(
                        "interpolation expression is too complex ({} chars)",
                        node.text.len()
                    ),
                    node.location,
                )
                .with_refactoring("Move the expression into a computed property"),
            );
        }
    });
    issues
}

/// Raw-HTML binding fed by anything that is not a literal.
pub fn detect_unsanitized_vhtml(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(root) = &component.template else {
        return Vec::new();
    };
    let mut issues = Vec::new();
    for el in tree::elements(root) {
        let Some(binding) = tree::get_directive(el, "v-html") else {
            continue;
        };
        let expr = binding.value.trim();
        // A single quoted literal cannot carry injected markup.
        if STRING_LITERAL.is_match(expr) {
            continue;
        }
        let dynamic = expr.contains('.')
            || expr.contains('(')
            || expr.contains("${")
            || expr.contains('[')
            || expr.contains('+');
        let severity = if dynamic {
            Severity::Critical
        } else {
            Severity::High
        };
        issues.push(
            Issue::new(
                PatternId::UnsanitizedVhtml,
                severity,
                format!("<{}> renders raw HTML from '{}'", el.tag_name(), expr),
                el.location,
            )
            .with_refactoring("Sanitize the value or render it as text"),
        );
    }
    issues
}

/// Markup nesting beyond the configured depth, three escalating tiers.
pub fn detect_deep_nesting(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(root) = &component.template else {
        return Vec::new();
    };
    let depth = tree::max_depth(root);
    let limit = thresholds.template_depth;
    let severity = if depth > limit + 4 {
        Severity::Critical
    } else if depth > limit + 2 {
        Severity::High
    } else if depth > limit {
        Severity::Medium
    } else {
        return Vec::new();
    };
    vec![Issue::new(
        PatternId::DeepNesting,
        severity,
        format!("template nests {} levels deep (limit {})", depth, limit),
        deepest_location(root),
    )
    .with_refactoring("Extract nested sections into child components")]
}

fn deepest_location(root: &TreeNode) -> crate::component::Location {
    let mut best = (0usize, root.location);
    walk_depth(root, 0, &mut best);
    best.1
}

fn walk_depth(node: &TreeNode, depth: usize, best: &mut (usize, crate::component::Location)) {
    if node.kind == NodeKind::Element && depth > best.0 {
        *best = (depth, node.location);
    }
    let next = if node.kind == NodeKind::Element {
        depth + 1
    } else {
        depth
    };
    for child in &node.children {
        walk_depth(child, next, best);
    }
}

/// Static `style` attributes on elements.
pub fn detect_inline_styles(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(root) = &component.template else {
        return Vec::new();
    };
    tree::elements(root)
        .into_iter()
        .filter(|el| tree::get_attr(el, "style").is_some())
        .map(|el| {
            Issue::new(
                PatternId::InlineStyles,
                Severity::Low,
                format!("<{}> carries an inline style attribute", el.tag_name()),
                el.location,
            )
            .with_refactoring("Move the declaration into the component's style block")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn component(template: &str) -> ParsedComponent {
        parser::parse(&format!("<template>{}</template>", template)).expect("fixture parses")
    }

    fn defaults() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn test_vif_with_vfor_fires_once_per_element() {
        let c = component(r#"<div v-for="u in users" v-if="u.active">{{ u.name }}</div>"#);
        let issues = detect_vif_with_vfor(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_vif_alone_does_not_fire() {
        let c = component(r#"<div v-if="ready"><span v-for="u in users" :key="u.id"></span></div>"#);
        assert!(detect_vif_with_vfor(&c, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_vfor_without_key_accepts_either_key_form() {
        let bound = component(r#"<li v-for="u in users" :key="u.id"></li>"#);
        assert!(detect_vfor_without_key(&bound, "a.vue", &defaults()).is_empty());

        let static_key = component(r#"<li v-for="u in users" key="row"></li>"#);
        assert!(detect_vfor_without_key(&static_key, "a.vue", &defaults()).is_empty());

        let keyless = component(r#"<li v-for="u in users"></li>"#);
        let issues = detect_vfor_without_key(&keyless, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_vfor_without_key_severity_bump_in_component_dir() {
        let c = component(r#"<li v-for="u in users"></li>"#);
        let issues = detect_vfor_without_key(&c, "src/components/List.vue", &defaults());
        assert_eq!(issues[0].severity, Severity::High);
        // Whole-segment match only.
        let issues = detect_vfor_without_key(&c, "src/my-components-util/List.vue", &defaults());
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_index_as_key_fires_on_secondary_variable() {
        let c = component(r#"<li v-for="(u, index) in users" :key="index"></li>"#);
        let issues = detect_index_as_key(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn test_index_as_key_item_property_is_fine() {
        let c = component(r#"<li v-for="(u, index) in users" :key="u.id"></li>"#);
        assert!(detect_index_as_key(&c, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_parse_iteration_forms() {
        let it = parse_iteration("(item, i) in rows").unwrap();
        assert_eq!(it.item, "item");
        assert_eq!(it.index.as_deref(), Some("i"));
        assert_eq!(it.iterable, "rows");

        let it = parse_iteration("n of 10").unwrap();
        assert_eq!(it.index, None);
        assert_eq!(it.iterable, "10");

        assert!(parse_iteration("{ a, b } in rows").is_none());
    }

    #[test]
    fn test_complex_expression_call_is_critical() {
        let c = component("<p>{{ formatDate(created) }}</p>");
        let issues = detect_complex_expression(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_complex_expression_tiers() {
        assert_eq!(classify_expression("name", 40), None);
        assert_eq!(
            classify_expression("a.b.c.d", 40),
            Some(Severity::Medium)
        );
        let long_ternary = format!("{} ? x : y", "a".repeat(45));
        assert_eq!(classify_expression(&long_ternary, 40), Some(Severity::High));
        let very_long = "a + ".repeat(40) + "b";
        assert_eq!(classify_expression(&very_long, 40), Some(Severity::Critical));
    }

    #[test]
    fn test_vhtml_member_access_is_critical() {
        let c = component(r#"<div v-html="apiResponse.html"></div>"#);
        let issues = detect_unsanitized_vhtml(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_vhtml_static_literal_does_not_fire() {
        let c = component(r#"<div v-html="'<b>static</b>'"></div>"#);
        assert!(detect_unsanitized_vhtml(&c, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_vhtml_bare_identifier_is_high() {
        let c = component(r#"<div v-html="content"></div>"#);
        let issues = detect_unsanitized_vhtml(&c, "a.vue", &defaults());
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn test_deep_nesting_tiers() {
        let mut thresholds = defaults();
        thresholds.template_depth = 2;
        let shallow = component("<a><b><i>x</i></b></a>");
        assert!(detect_deep_nesting(&shallow, "a.vue", &defaults()).is_empty());

        let issues = detect_deep_nesting(&shallow, "a.vue", &thresholds);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);

        let deep = component("<a><b><i><u><s><q><em>x</em></q></s></u></i></b></a>");
        let issues = detect_deep_nesting(&deep, "a.vue", &thresholds);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_inline_styles() {
        let c = component(r#"<div style="color: red"><span :style="dyn"></span></div>"#);
        let issues = detect_inline_styles(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Low);
    }

    #[test]
    fn test_no_template_degrades_gracefully() {
        let c = parser::parse("<script>export default {}</script>").unwrap();
        assert!(detect_vif_with_vfor(&c, "a.vue", &defaults()).is_empty());
        assert!(detect_deep_nesting(&c, "a.vue", &defaults()).is_empty());
    }
}
