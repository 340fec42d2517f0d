//! Markup tree traversal and binding accessors.
//!
//! Detectors never walk the tree by hand; they go through `traverse` and
//! the binding accessors so that static attributes and directives keep
//! their distinct semantics.

use crate::component::{Binding, NodeKind, TreeNode};

/// Visit `root` and every descendant of container nodes, pre-order.
pub fn traverse<F>(root: &TreeNode, visit: &mut F)
where
    F: FnMut(&TreeNode),
{
    visit(root);
    if root.kind.is_container() {
        for child in &root.children {
            traverse(child, visit);
        }
    }
}

/// Collect every element node in the tree, pre-order.
pub fn elements(root: &TreeNode) -> Vec<&TreeNode> {
    let mut out = Vec::new();
    collect_elements(root, &mut out);
    out
}

fn collect_elements<'a>(node: &'a TreeNode, out: &mut Vec<&'a TreeNode>) {
    if node.kind == NodeKind::Element {
        out.push(node);
    }
    if node.kind.is_container() {
        for child in &node.children {
            collect_elements(child, out);
        }
    }
}

/// Greatest count of element-kind ancestors below `root`.
///
/// The root itself counts as depth 0; `k` directly nested elements yield
/// exactly `k`. Text, expression and comment children never add depth.
pub fn max_depth(root: &TreeNode) -> usize {
    root.children.iter().map(depth_below).max().unwrap_or(0)
}

fn depth_below(node: &TreeNode) -> usize {
    match node.kind {
        NodeKind::Element => {
            1 + node.children.iter().map(depth_below).max().unwrap_or(0)
        }
        NodeKind::Root => node.children.iter().map(depth_below).max().unwrap_or(0),
        _ => 0,
    }
}

/// Find a dynamic binding (directive) by name, exact match.
///
/// For shorthand forms the parser normalizes `:key` to `v-bind` with arg
/// `key` and `@click` to `v-on` with arg `click`, so directives are looked
/// up by their canonical name here.
pub fn get_directive<'a>(node: &'a TreeNode, name: &str) -> Option<&'a Binding> {
    node.bindings.iter().find(|b| b.dynamic && b.name == name)
}

/// Find a `v-bind`-style binding by its argument (e.g. `:key`).
pub fn get_bound_attr<'a>(node: &'a TreeNode, arg: &str) -> Option<&'a Binding> {
    node.bindings
        .iter()
        .find(|b| b.dynamic && b.name == "v-bind" && b.arg.as_deref() == Some(arg))
}

/// Find a static attribute by name.
pub fn get_attr<'a>(node: &'a TreeNode, name: &str) -> Option<&'a Binding> {
    node.bindings.iter().find(|b| !b.dynamic && b.name == name)
}

/// Whether the node carries a directive with the given name.
pub fn has_directive(node: &TreeNode, name: &str) -> bool {
    get_directive(node, name).is_some()
}

/// Whether the node has a key in either accepted form: a bound `:key`
/// or a static `key` attribute.
pub fn has_key(node: &TreeNode) -> bool {
    get_bound_attr(node, "key").is_some() || get_attr(node, "key").is_some()
}
