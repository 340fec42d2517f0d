//! Parsed component data model.
//!
//! A single-file component splits into a markup tree (from the `<template>`
//! block) and a raw logic block (from `<script>`). Detectors consume this
//! shape read-only; nothing here is mutated after parsing.

use std::fmt;

/// Source position (1-indexed line and column).
///
/// Defaults to (1,1) when the real position is unknown, never absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Default for Location {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Kind of markup tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Synthetic container for the template's top-level nodes.
    Root,
    /// An element with a tag name, bindings and children.
    Element,
    /// An interpolation position (`{{ expr }}`); `text` holds the expression.
    Expression,
    /// Plain text between tags.
    Text,
    /// An HTML comment.
    Comment,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Element => "element",
            NodeKind::Expression => "expression",
            NodeKind::Text => "text",
            NodeKind::Comment => "comment",
        }
    }

    /// Container kinds carry children; the rest are leaves.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Element)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A directive or attribute attached to an element.
///
/// Directives (`v-for`, `:key`, `@click`) carry `dynamic: true`; plain
/// attributes (`key="a"`, `class="row"`) carry `dynamic: false`. The two
/// have different semantics and accessors must not conflate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Directive or attribute name (`v-for`, `v-bind`, `v-on`, `class`).
    pub name: String,
    /// Directive argument, e.g. `key` for `:key` or `click` for `@click`.
    pub arg: Option<String>,
    /// Raw expression or attribute value text.
    pub value: String,
    /// True for directives and bound attributes, false for static attributes.
    pub dynamic: bool,
}

impl Binding {
    /// Static attribute.
    pub fn attr(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            arg: None,
            value: value.to_string(),
            dynamic: false,
        }
    }

    /// Directive with an optional argument.
    pub fn directive(name: &str, arg: Option<&str>, value: &str) -> Self {
        Self {
            name: name.to_string(),
            arg: arg.map(str::to_string),
            value: value.to_string(),
            dynamic: true,
        }
    }
}

/// One node in the markup tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: NodeKind,
    /// Tag name; only meaningful for `Element` nodes.
    pub tag: Option<String>,
    /// Text payload for `Expression`/`Text`/`Comment` nodes.
    pub text: String,
    /// Ordered children; only container kinds have any.
    pub children: Vec<TreeNode>,
    /// Ordered bindings; only elements have any.
    pub bindings: Vec<Binding>,
    pub location: Location,
}

impl TreeNode {
    pub fn root() -> Self {
        Self {
            kind: NodeKind::Root,
            tag: None,
            text: String::new(),
            children: Vec::new(),
            bindings: Vec::new(),
            location: Location::default(),
        }
    }

    pub fn element(tag: &str, location: Location) -> Self {
        Self {
            kind: NodeKind::Element,
            tag: Some(tag.to_string()),
            text: String::new(),
            children: Vec::new(),
            bindings: Vec::new(),
            location,
        }
    }

    pub fn expression(expr: &str, location: Location) -> Self {
        Self {
            kind: NodeKind::Expression,
            tag: None,
            text: expr.to_string(),
            children: Vec::new(),
            bindings: Vec::new(),
            location,
        }
    }

    pub fn text(text: &str, location: Location) -> Self {
        Self {
            kind: NodeKind::Text,
            tag: None,
            text: text.to_string(),
            children: Vec::new(),
            bindings: Vec::new(),
            location,
        }
    }

    pub fn comment(text: &str, location: Location) -> Self {
        Self {
            kind: NodeKind::Comment,
            tag: None,
            text: text.to_string(),
            children: Vec::new(),
            bindings: Vec::new(),
            location,
        }
    }

    /// Tag name, or "" for non-element nodes.
    pub fn tag_name(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }
}

/// The raw logic block of a component.
#[derive(Debug, Clone)]
pub struct LogicBlock {
    /// Unparsed script source between the block tags.
    pub text: String,
    /// `lang` attribute of the script tag, if any (e.g. "ts").
    pub lang: Option<String>,
    /// Whether the block carried the `setup` attribute.
    pub setup: bool,
    /// Position of the first line of script content in the file.
    pub location: Location,
}

impl LogicBlock {
    /// Whether the block is TypeScript.
    pub fn is_typescript(&self) -> bool {
        matches!(self.lang.as_deref(), Some("ts") | Some("tsx"))
    }

    /// Number of lines of script content.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// Map a byte offset inside `text` to a file location.
    pub fn location_of(&self, offset: usize) -> Location {
        let clamped = offset.min(self.text.len());
        let prefix = &self.text[..clamped];
        let rel_line = prefix.matches('\n').count();
        let column = match prefix.rfind('\n') {
            Some(pos) => clamped - pos,
            None => self.location.column + clamped,
        };
        Location::new(self.location.line + rel_line, column.max(1))
    }
}

/// Immutable result of parsing one component source file.
#[derive(Debug, Clone)]
pub struct ParsedComponent {
    /// Markup tree root, absent when the file has no template block.
    pub template: Option<TreeNode>,
    /// Logic block, absent when the file has no script block.
    pub script: Option<LogicBlock>,
}

impl ParsedComponent {
    /// Script text, or "" when there is no logic block.
    ///
    /// Extractors treat the empty string as "no facts", so detectors can
    /// call this unconditionally.
    pub fn script_text(&self) -> &str {
        self.script.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }
}
