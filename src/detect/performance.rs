//! Rendering and reactivity performance detectors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::{Location, ParsedComponent};
use crate::heuristics;
use crate::thresholds::Thresholds;
use crate::tree;

use super::template::parse_iteration;
use super::{Issue, PatternId, Severity};

static REACTIVE_WRAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(reactive|ref)\s*\(\s*\{").unwrap());

const LOOP_MARKERS: &[&str] = &["for (", "for(", "while (", "while(", ".map(", ".filter(", ".reduce(", ".forEach("];
const HEAVY_MARKERS: &[&str] = &[".sort(", "JSON.parse(", "JSON.stringify("];

fn at(component: &ParsedComponent, offset: usize) -> Location {
    component
        .script
        .as_ref()
        .map(|s| s.location_of(offset))
        .unwrap_or_default()
}

/// Static length of the array literal bound to `name` in the logic text,
/// when one is co-defined. Only declaration forms are recognized; computed
/// or imported lists report `None` (documented limitation).
fn static_list_len(text: &str, name: &str) -> Option<usize> {
    let pattern = format!(
        r"\b{}\s*(?::|=)\s*(?:ref\s*\(\s*)?\[",
        regex::escape(name)
    );
    let re = Regex::new(&pattern).ok()?;
    let m = re.find(text)?;
    Some(heuristics::array_literal_len(text, m.end() - 1))
}

/// Iterations over large statically-declared lists without virtualization.
pub fn detect_large_list_unvirtualized(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(root) = &component.template else {
        return Vec::new();
    };
    let text = component.script_text();
    let mut issues = Vec::new();
    for el in tree::elements(root) {
        let Some(vfor) = tree::get_directive(el, "v-for") else {
            continue;
        };
        let Some(iteration) = parse_iteration(&vfor.value) else {
            continue;
        };
        // Plain identifiers only; expressions cannot be sized statically.
        if !iteration.iterable.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            continue;
        }
        let Some(len) = static_list_len(text, &iteration.iterable) else {
            continue;
        };
        if len > thresholds.virtualization_threshold {
            issues.push(
                Issue::new(
                    PatternId::LargeListUnvirtualized,
                    Severity::High,
                    format!(
                        "<{}> renders all {} items of '{}' without virtualization",
                        el.tag_name(),
                        len,
                        iteration.iterable
                    ),
                    el.location,
                )
                .with_refactoring("Render the list through a virtual scroller"),
            );
        }
    }
    issues
}

/// Large object literals made deeply reactive.
pub fn detect_missing_shallow_reactivity(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = &component.script else {
        return Vec::new();
    };
    let mut issues = Vec::new();
    for cap in REACTIVE_WRAP.captures_iter(&script.text) {
        let m = cap.get(0).expect("whole match");
        let keys = heuristics::object_literal_keys(&script.text, m.start());
        if keys > thresholds.shallow_reactivity_keys {
            issues.push(
                Issue::new(
                    PatternId::MissingShallowReactivity,
                    Severity::Medium,
                    format!(
                        "{}() wraps an object with {} keys in deep reactivity",
                        &cap[1], keys
                    ),
                    script.location_of(m.start()),
                )
                .with_refactoring("Use shallowReactive/shallowRef for large mostly-static data"),
            );
        }
    }
    issues
}

/// Computed bodies doing heavyweight work on every dependency change.
pub fn detect_expensive_computed(
    component: &ParsedComponent,
    _file_path: &str,
    _thresholds: &Thresholds,
) -> Vec<Issue> {
    let text = component.script_text();
    heuristics::computed_bodies(text)
        .into_iter()
        .filter_map(|body| {
            let loops = LOOP_MARKERS.iter().filter(|m| body.body.contains(*m)).count();
            let heavy = HEAVY_MARKERS.iter().any(|m| body.body.contains(m));
            if !heavy && loops < 2 {
                return None;
            }
            Some(
                Issue::new(
                    PatternId::ExpensiveComputed,
                    Severity::Medium,
                    "computed property performs expensive work on every re-evaluation".to_string(),
                    at(component, body.offset),
                )
                .with_refactoring("Precompute outside the reactive path or memoize the heavy step"),
            )
        })
        .collect()
}

/// Many statically imported child components bloat the initial chunk.
pub fn detect_eager_component_imports(
    component: &ParsedComponent,
    _file_path: &str,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let Some(script) = &component.script else {
        return Vec::new();
    };
    let count = heuristics::count_component_imports(&script.text);
    if count <= thresholds.component_import_count {
        return Vec::new();
    }
    vec![Issue::new(
        PatternId::EagerComponentImports,
        Severity::Medium,
        format!(
            "{} components are imported statically (limit {})",
            count, thresholds.component_import_count
        ),
        script.location,
    )
    .with_refactoring("Load rarely-shown components with defineAsyncComponent")]
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

    fn big_array(n: usize) -> String {
        let items: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        format!("[{}]", items.join(", "))
    }

    #[test]
    fn test_large_static_list() {
        let source = format!(
            "<template><li v-for=\"row in rows\" :key=\"row\"></li></template>\n<script>const rows = ref({})</script>",
            big_array(150)
        );
        let issues = detect_large_list_unvirtualized(&component(&source), "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
        assert!(issues[0].message.contains("150"));
    }

    #[test]
    fn test_small_or_unknown_list_is_silent() {
        let small = format!(
            "<template><li v-for=\"row in rows\" :key=\"row\"></li></template>\n<script>const rows = ref({})</script>",
            big_array(5)
        );
        assert!(detect_large_list_unvirtualized(&component(&small), "a.vue", &defaults()).is_empty());

        // A fetched list has no static size; nothing to flag.
        let unknown = "<template><li v-for=\"row in rows\" :key=\"row\"></li></template>\n<script>const rows = await loadRows()</script>";
        assert!(detect_large_list_unvirtualized(&component(unknown), "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_missing_shallow_reactivity() {
        let keys: Vec<String> = (0..60).map(|i| format!("k{}: {}", i, i)).collect();
        let source = format!("<script>const data = reactive({{ {} }})</script>", keys.join(", "));
        let issues = detect_missing_shallow_reactivity(&component(&source), "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("60 keys"));
    }

    #[test]
    fn test_expensive_computed() {
        let c = component(
            "<script>const sorted = computed(() => items.value.filter(keep).sort(byDate))</script>",
        );
        let issues = detect_expensive_computed(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);

        let cheap = component("<script>const total = computed(() => a.value + b.value)</script>");
        assert!(detect_expensive_computed(&cheap, "a.vue", &defaults()).is_empty());
    }

    #[test]
    fn test_eager_component_imports() {
        let imports: Vec<String> = (0..20)
            .map(|i| format!("import C{} from './C{}.vue'", i, i))
            .collect();
        let c = component(&format!("<script>{}</script>", imports.join("\n")));
        let issues = detect_eager_component_imports(&c, "a.vue", &defaults());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);
    }
}
