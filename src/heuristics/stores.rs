//! Store definition, mutation handler and navigation guard extraction.
//!
//! Store shapes are approximated from static source: `defineStore` call
//! bodies, Vuex `mutations` objects, and router guard callbacks. Cross-file
//! store relationships are invisible here by design; detectors that use
//! these facts are scoped to single-file co-definition.

use once_cell::sync::Lazy;
use regex::Regex;

use super::scanner;

static DEFINE_STORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:(?:const|let|var)\s+(\w+)\s*=\s*)?\bdefineStore\s*\(\s*['"]([\w-]+)['"]"#)
        .unwrap()
});
static MUTATIONS_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmutations\s*:\s*\{").unwrap());
static ACTIONS_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bactions\s*:\s*\{").unwrap());
static STATE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bstate\s*:").unwrap());
static GUARD_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.\s*(beforeEach|beforeResolve|afterEach)\s*\(").unwrap()
});
static GUARD_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(beforeRouteEnter|beforeRouteUpdate|beforeRouteLeave)\s*\(").unwrap()
});
static GUARD_PROPERTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bbeforeEnter\s*:").unwrap());
static HANDLER_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:async\s+)?(\w+)").unwrap());

/// A store defined in this file.
#[derive(Debug, Clone)]
pub struct StoreDef {
    /// Variable the store factory was assigned to (`useCartStore`).
    pub var_name: Option<String>,
    /// The store id string passed to `defineStore`.
    pub id: String,
    /// Full text of the `defineStore(...)` argument list.
    pub body: String,
    pub offset: usize,
}

impl StoreDef {
    /// Whether another chunk of code textually references this store.
    pub fn referenced_in(&self, body: &str) -> bool {
        if let Some(var) = &self.var_name {
            let pattern = format!(r"\b{}\b", regex::escape(var));
            if Regex::new(&pattern).map(|re| re.is_match(body)).unwrap_or(false) {
                return true;
            }
        }
        body.contains(&format!("'{}'", self.id)) || body.contains(&format!("\"{}\"", self.id))
    }

    /// Number of state keys, estimated from the `state` literal.
    pub fn state_key_count(&self) -> usize {
        let Some(m) = STATE_KEY.find(&self.body) else {
            return 0;
        };
        // state: () => ({...}) or state: {...}; take the first brace block.
        match scanner::brace_block(&self.body, m.end()) {
            Some((start, end)) => scanner::entry_count(&self.body[start..end]),
            None => 0,
        }
    }

    /// Number of actions, estimated from the `actions` object literal.
    pub fn action_count(&self) -> usize {
        let Some(m) = ACTIONS_KEY.find(&self.body) else {
            return 0;
        };
        match scanner::matching_bracket(&self.body, m.end() - 1) {
            Some(close) => scanner::entry_count(&self.body[m.end()..close]),
            None => 0,
        }
    }
}

/// All `defineStore` definitions in the file.
pub fn store_definitions(text: &str) -> Vec<StoreDef> {
    let mut stores = Vec::new();
    for cap in DEFINE_STORE.captures_iter(text) {
        let m = cap.get(0).expect("whole match");
        let open = match text[m.start()..].find("defineStore") {
            Some(rel) => match text[m.start() + rel..].find('(') {
                Some(prel) => m.start() + rel + prel,
                None => continue,
            },
            None => continue,
        };
        let Some(close) = scanner::matching_bracket(text, open) else {
            continue;
        };
        stores.push(StoreDef {
            var_name: cap.get(1).map(|v| v.as_str().to_string()),
            id: cap[2].to_string(),
            body: text[open + 1..close].to_string(),
            offset: m.start(),
        });
    }
    stores
}

/// A named handler inside a `mutations: { ... }` object.
#[derive(Debug, Clone)]
pub struct MutationHandler {
    pub name: String,
    pub body: String,
    pub offset: usize,
}

/// Handlers of every Vuex `mutations` object in the file.
pub fn mutation_handlers(text: &str) -> Vec<MutationHandler> {
    let mut handlers = Vec::new();
    for m in MUTATIONS_KEY.find_iter(text) {
        let Some(close) = scanner::matching_bracket(text, m.end() - 1) else {
            continue;
        };
        let object_body = &text[m.end()..close];
        for (entry_offset, entry) in scanner::split_top_level(object_body, &[',']) {
            let Some(name_cap) = HANDLER_NAME.captures(entry) else {
                continue;
            };
            let body = match scanner::brace_block(entry, 0) {
                Some((start, end)) => entry[start..end].to_string(),
                None => entry.to_string(),
            };
            handlers.push(MutationHandler {
                name: name_cap[1].to_string(),
                body,
                offset: m.end() + entry_offset,
            });
        }
    }
    handlers
}

/// A navigation guard body.
#[derive(Debug, Clone)]
pub struct GuardBody {
    /// Guard name (`beforeEach`, `beforeRouteEnter`, `beforeEnter`).
    pub name: String,
    /// Parameter list text of the guard callback.
    pub params: String,
    /// Guard body text (the callback's brace block when present).
    pub body: String,
    pub offset: usize,
}

/// All recognized navigation guard bodies in the file.
pub fn guard_bodies(text: &str) -> Vec<GuardBody> {
    let mut guards = Vec::new();

    for cap in GUARD_CALL.captures_iter(text) {
        let m = cap.get(0).expect("whole match");
        if let Some(guard) = callback_guard(text, &cap[1], m.start(), m.end() - 1) {
            guards.push(guard);
        }
    }

    for cap in GUARD_METHOD.captures_iter(text) {
        let m = cap.get(0).expect("whole match");
        // Method form: the paren right after the name is the param list.
        let Some(params_close) = scanner::matching_bracket(text, m.end() - 1) else {
            continue;
        };
        let params = text[m.end()..params_close].to_string();
        if params.trim_start().starts_with('(') || params.contains("=>") {
            // Actually a callback argument (composition-style registration).
            if let Some(guard) = callback_guard(text, &cap[1], m.start(), m.end() - 1) {
                guards.push(guard);
            }
            continue;
        }
        let body = match scanner::brace_block(text, params_close) {
            Some((start, end)) => text[start..end].to_string(),
            None => String::new(),
        };
        guards.push(GuardBody {
            name: cap[1].to_string(),
            params,
            body,
            offset: m.start(),
        });
    }

    for m in GUARD_PROPERTY.find_iter(text) {
        // beforeEnter: (to, from, next) => { ... }
        let Some((popen, pclose)) = scanner::paren_group(text, m.end()) else {
            continue;
        };
        let params = text[popen..pclose].to_string();
        let body = match scanner::brace_block(text, pclose) {
            Some((start, end)) => text[start..end].to_string(),
            None => String::new(),
        };
        guards.push(GuardBody {
            name: "beforeEnter".to_string(),
            params,
            body,
            offset: m.start(),
        });
    }

    guards.sort_by_key(|g| g.offset);
    guards
}

/// Build a guard from a registration call whose argument is the callback.
fn callback_guard(text: &str, name: &str, offset: usize, open: usize) -> Option<GuardBody> {
    let close = scanner::matching_bracket(text, open)?;
    let callback = &text[open + 1..close];
    let params = match scanner::paren_group(callback, 0) {
        Some((start, end)) if callback[..start].trim_start_matches('(').trim().is_empty() => {
            callback[start..end].to_string()
        }
        _ => callback
            .split("=>")
            .next()
            .unwrap_or("")
            .trim()
            .to_string(),
    };
    let body = match scanner::brace_block(callback, 0) {
        Some((start, end)) => callback[start..end].to_string(),
        None => callback.to_string(),
    };
    Some(GuardBody {
        name: name.to_string(),
        params,
        body,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_definitions() {
        let text = r#"
export const useCartStore = defineStore('cart', {
  state: () => ({ items: [], total: 0 }),
  actions: { add(item) { this.items.push(item) }, clear() { this.items = [] } },
})
"#;
        let stores = store_definitions(text);
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].id, "cart");
        assert_eq!(stores[0].var_name.as_deref(), Some("useCartStore"));
        assert_eq!(stores[0].state_key_count(), 2);
        assert_eq!(stores[0].action_count(), 2);
    }

    #[test]
    fn test_store_cross_reference() {
        let text = r#"
const useA = defineStore('a', { actions: { sync() { useB().pull() } } })
const useB = defineStore('b', { actions: { pull() { useA().push() } } })
"#;
        let stores = store_definitions(text);
        assert_eq!(stores.len(), 2);
        assert!(stores[1].referenced_in(&stores[0].body));
        assert!(stores[0].referenced_in(&stores[1].body));
    }

    #[test]
    fn test_mutation_handlers() {
        let text = r#"
const store = { mutations: { setUser(state, user) { state.user = user }, async load(state) { state.x = await get() } } }
"#;
        let handlers = mutation_handlers(text);
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].name, "setUser");
        assert_eq!(handlers[1].name, "load");
        assert!(handlers[1].body.contains("await"));
    }

    #[test]
    fn test_guard_call_form() {
        let text = "router.beforeEach((to, from, next) => { if (to.meta.auth) { next('/login') } else { next() } })";
        let guards = guard_bodies(text);
        assert_eq!(guards.len(), 1);
        assert_eq!(guards[0].name, "beforeEach");
        assert!(guards[0].params.contains("next"));
        assert!(guards[0].body.contains("to.meta.auth"));
    }

    #[test]
    fn test_guard_method_form() {
        let text = "export default { beforeRouteEnter(to, from, next) { next() } }";
        let guards = guard_bodies(text);
        assert_eq!(guards.len(), 1);
        assert_eq!(guards[0].params.trim(), "to, from, next");
        assert!(guards[0].body.contains("next()"));
    }

    #[test]
    fn test_before_enter_property() {
        let text = "{ path: '/a', beforeEnter: (to, from, next) => { next() } }";
        let guards = guard_bodies(text);
        assert_eq!(guards.len(), 1);
        assert_eq!(guards[0].name, "beforeEnter");
    }
}
