//! Prop declaration, usage and mutation extraction.
//!
//! All three extractors are best-effort text heuristics. They recognize
//! the common declaration forms (array literal, object literal, typed
//! `defineProps` call) and fall back to empty results for anything else —
//! a named-type generic like `defineProps<Props>()` cannot be resolved
//! without cross-file analysis and reports no props.

use once_cell::sync::Lazy;
use regex::Regex;

use super::scanner;

static PROPS_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bprops\s*:\s*").unwrap());
static DEFINE_PROPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdefineProps\s*").unwrap());
static QUOTED_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"]([A-Za-z_$][\w$]*)['"]"#).unwrap());
static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap());

/// A prop mutation site found in the logic text.
#[derive(Debug, Clone)]
pub struct PropMutation {
    pub prop: String,
    /// The matched mutation text, e.g. `this.total += 1`.
    pub site: String,
    /// Byte offset of the mutation in the logic text.
    pub offset: usize,
}

/// Names of declared props, in declaration order, deduplicated.
pub fn declared_props(text: &str) -> Vec<String> {
    let mut props = Vec::new();
    for (start, end) in declaration_spans(text) {
        collect_names(&text[start..end], text.as_bytes().get(start.wrapping_sub(1)), &mut props);
    }
    props
}

/// Subset of `props` referenced by name outside their declaration.
///
/// Simple word-boundary matching; a local variable shadowing a prop name
/// counts as usage. Intentionally approximate.
pub fn prop_usage(text: &str, props: &[String]) -> Vec<String> {
    let stripped = strip_declarations(text);
    props
        .iter()
        .filter(|prop| {
            Regex::new(&format!(r"\b{}\b", regex::escape(prop)))
                .map(|re| re.is_match(&stripped))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Assignment, increment and compound-assignment sites targeting a
/// declared prop through an instance-qualified path.
pub fn prop_mutations(text: &str, props: &[String]) -> Vec<PropMutation> {
    let mut mutations = Vec::new();
    for prop in props {
        let pattern = format!(
            r"\b(?:this|props)\.{}\s*(?:\+\+|--|[+\-*/]?=([^=]|$))",
            regex::escape(prop)
        );
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        for m in re.find_iter(text) {
            mutations.push(PropMutation {
                prop: prop.clone(),
                site: m.as_str().trim_end().to_string(),
                offset: m.start(),
            });
        }
    }
    mutations.sort_by_key(|m| m.offset);
    mutations
}

/// Byte spans of prop declaration bodies (exclusive of their brackets).
fn declaration_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();

    for m in PROPS_KEY.find_iter(text) {
        if let Some(span) = literal_body(text, m.end()) {
            spans.push(span);
        }
    }

    for m in DEFINE_PROPS.find_iter(text) {
        let after = m.end();
        match text[after..].chars().next() {
            // defineProps<{ ... }>() — read keys from the type literal.
            Some('<') => {
                if let Some(open) = text[after..].find('{') {
                    // Only a type literal directly inside the generic; a
                    // named type has no brace before the closing `>`.
                    let gap = &text[after + 1..after + open];
                    if gap.trim().is_empty() {
                        if let Some(close) = scanner::matching_bracket(text, after + open) {
                            spans.push((after + open + 1, close));
                        }
                    }
                }
            }
            // defineProps({...}) / defineProps([...])
            Some('(') => {
                if let Some(close) = scanner::matching_bracket(text, after) {
                    if let Some(span) = literal_body(text, after + 1) {
                        if span.1 <= close {
                            spans.push(span);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    spans
}

/// Body span of an object or array literal starting at or after `from`,
/// provided only whitespace precedes it.
fn literal_body(text: &str, from: usize) -> Option<(usize, usize)> {
    let rest = &text[from..];
    let offset = rest.len() - rest.trim_start().len();
    let open = from + offset;
    match text.as_bytes().get(open)? {
        b'{' | b'[' => {
            let close = scanner::matching_bracket(text, open)?;
            Some((open + 1, close))
        }
        _ => None,
    }
}

/// Pull prop names out of a declaration body. The byte before the body
/// distinguishes array form (quoted names) from object/type form (keys).
fn collect_names(body: &str, open_bracket: Option<&u8>, out: &mut Vec<String>) {
    if open_bracket == Some(&b'[') {
        for cap in QUOTED_NAME.captures_iter(body) {
            push_unique(out, &cap[1]);
        }
        return;
    }
    for (_, entry) in scanner::split_top_level(body, &[',', ';']) {
        let key = entry
            .split(':')
            .next()
            .unwrap_or("")
            .trim()
            .trim_end_matches('?')
            .trim_matches(|c| c == '"' || c == '\'');
        if IDENT.is_match(key) {
            push_unique(out, key);
        }
    }
}

fn push_unique(out: &mut Vec<String>, name: &str) {
    if !out.iter().any(|n| n == name) {
        out.push(name.to_string());
    }
}

/// Blank out declaration bodies so usage search does not count the
/// declaration itself.
fn strip_declarations(text: &str) -> String {
    let spans = declaration_spans(text);
    if spans.is_empty() {
        return text.to_string();
    }
    let mut bytes = text.as_bytes().to_vec();
    for (start, end) in spans {
        for b in &mut bytes[start..end] {
            if *b != b'\n' {
                *b = b' ';
            }
        }
    }
    String::from_utf8(bytes).unwrap_or_else(|_| text.to_string())
}
