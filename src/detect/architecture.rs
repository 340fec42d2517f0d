//! Architecture (component shape) detectors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::{Location, NodeKind, ParsedComponent, TreeNode};
use crate::heuristics;
use crate::thresholds::Thresholds;
use crate::tree;

use super::{Issue, PatternId, Severity};

static PARENT_REACH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:this\.)?\$(parent|root)\b").unwrap());

fn script_location(component: &ParsedComponent) -> Location {
    component
        .script
        .as_ref()
        .map(|s| s.location)
        .unwrap_or_default()
}

/// Component doing too much, measured on five independent metrics: script
/// lines, method count, prop count, computed count and markup depth.
pub fn detect_god_component(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    let mut violations = Vec::new();

    if let Some(script) = &component.script {
        if script.line_count() > thresholds.script_lines {
            violations.push(format!("{} script lines", script.line_count()));
        }
    }
    let methods = heuristics::count_methods(text);
    if methods > thresholds.method_count {
        violations.push(format!("{} methods", methods));
    }
    let props = heuristics::declared_props(text).len();
    if props > thresholds.prop_count {
        violations.push(format!("{} props", props));
    }
    let computed = heuristics::count_computed(text);
    if computed > thresholds.computed_count {
        violations.push(format!("{} computed properties", computed));
    }
    if let Some(root) = &component.template {
        let depth = tree::max_depth(root);
        if depth > thresholds.template_depth {
            violations.push(format!("markup {} levels deep", depth));
        }
    }

    let severity = match violations.len() {
        0 => return Vec::new(),
        1 | 2 => Severity::Medium,
        3 => Severity::High,
        _ => Severity::Critical,
    };
    vec![Issue::new(
        PatternId::GodComponent,
        severity,
        format!(
            "component exceeds {} size limits: {}",
            violations.len(),
            violations.join(", ")
        ),
        script_location(component),
    )
    .with_refactoring("Split the component along its distinct responsibilities")]
}

/// Prop interface wider than the configured maximum.
pub fn detect_too_many_props(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let count = heuristics::declared_props(component.script_text()).len();
    if count <= thresholds.max_props {
        return Vec::new();
    }
    let severity = if count > thresholds.max_props * 2 {
        Severity::High
    } else {
        Severity::Medium
    };
    vec![Issue::new(
        PatternId::TooManyProps,
        severity,
        format!("component declares {} props (limit {})", count, thresholds.max_props),
        script_location(component),
    )
    .with_refactoring("Group related props into a single object or split the component")]
}

/// Whether an identifier is referenced anywhere in the markup tree, either
/// in an interpolation expression or a dynamic binding value.
fn referenced_in_template(root: &TreeNode, name: &str) -> bool {
    let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(name))) else {
        return false;
    };
    let mut found = false;
    tree::traverse(root, &mut |node| {
        if found {
            return;
        }
        if node.kind == NodeKind::Expression && re.is_match(&node.text) {
            found = true;
            return;
        }
        found = node
            .bindings
            .iter()
            .any(|b| b.dynamic && re.is_match(&b.value));
    });
    found
}

/// Whether a prop is passed straight through as a dynamic binding value on
/// some element (`:user="user"`).
fn passed_through(root: &TreeNode, name: &str) -> bool {
    let mut found = false;
    tree::traverse(root, &mut |node| {
        if found {
            return;
        }
        found = node
            .bindings
            .iter()
            .any(|b| b.dynamic && b.name == "v-bind" && b.value.trim() == name);
    });
    found
}

/// Declared props never referenced in script or markup.
pub fn detect_unused_props(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    let declared = heuristics::declared_props(text);
    if declared.is_empty() {
        return Vec::new();
    }
    let used = heuristics::prop_usage(text, &declared);
    declared
        .iter()
        .filter(|prop| !used.contains(prop))
        .filter(|prop| {
            component
                .template
                .as_ref()
                .map(|root| !referenced_in_template(root, prop))
                .unwrap_or(true)
        })
        .map(|prop| {
            Issue::new(
                PatternId::UnusedProps,
                Severity::Low,
                format!("prop '{}' is declared but never used", prop),
                script_location(component),
            )
            .with_refactoring("Remove the prop or wire it into the component")
        })
        .collect()
}

/// Props the component only forwards to children without using itself.
pub fn detect_prop_drilling(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(root) = &component.template else {
        return Vec::new();
    };
    let text = component.script_text();
    let declared = heuristics::declared_props(text);
    let used = heuristics::prop_usage(text, &declared);
    let drilled: Vec<&String> = declared
        .iter()
        .filter(|prop| !used.contains(prop) && passed_through(root, prop))
        .collect();
    if drilled.len() < thresholds.prop_drilling_min {
        return Vec::new();
    }
    let names: Vec<&str> = drilled.iter().map(|p| p.as_str()).collect();
    vec![Issue::new(
        PatternId::PropDrilling,
        Severity::Medium,
        format!(
            "{} props are only passed through to children: {}",
            drilled.len(),
            names.join(", ")
        ),
        script_location(component),
    )
    .with_refactoring("Provide the values via provide/inject or a store instead of relaying them")]
}

/// More mixins than the configured limit.
pub fn detect_mixin_overuse(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let count = heuristics::count_mixins(component.script_text());
    if count <= thresholds.mixin_count {
        return Vec::new();
    }
    vec![Issue::new(
        PatternId::MixinOveruse,
        Severity::Medium,
        format!("component mixes in {} mixins (limit {})", count, thresholds.mixin_count),
        script_location(component),
    )
    .with_refactoring("Replace mixins with composables to make the data flow explicit")]
}

/// Reaching through `$parent`/`$root` couples the component to its host tree.
pub fn detect_parent_coupling(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = &component.script else {
        return Vec::new();
    };
    PARENT_REACH
        .captures_iter(&script.text)
        .map(|cap| {
            let m = cap.get(0).expect("whole match");
            Issue::new(
                PatternId::ParentCoupling,
                Severity::High,
                format!("component reaches into its ancestor via ${}", &cap[1]),
                script.location_of(m.start()),
            )
            .with_refactoring("Communicate through props and events instead of $parent/$root")
        })
        .collect()
}
