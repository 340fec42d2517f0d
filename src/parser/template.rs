//! Markup tree parser for template block content.
//!
//! Produces the `TreeNode` tree the detectors traverse. Shorthand bindings
//! are normalized while parsing: `:key` becomes `v-bind` with arg `key`,
//! `@click` becomes `v-on` with arg `click`, `#slot` becomes `v-slot`.
//! Modifiers (`.prevent`, `.lazy`) are stripped from directive arguments.

use phf::phf_set;

use super::ParseError;
use crate::component::{Binding, Location, NodeKind, TreeNode};

/// Elements that never have a closing tag.
static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
};

/// Parse template content into a tree rooted at a synthetic `Root` node.
///
/// `base` is the file location of the first content byte, so node
/// locations point into the original file.
pub fn parse_template(content: &str, base: Location) -> Result<TreeNode, ParseError> {
    let mut cur = Cursor::new(content, base);
    let mut stack: Vec<TreeNode> = vec![TreeNode::root()];

    while !cur.at_end() {
        if cur.starts_with("<!--") {
            parse_comment(&mut cur, &mut stack);
        } else if cur.starts_with("</") {
            parse_close_tag(&mut cur, &mut stack);
        } else if cur.starts_with("<") && tag_follows(content, cur.pos + 1) {
            parse_open_tag(&mut cur, &mut stack);
        } else {
            parse_text_run(&mut cur, &mut stack);
        }
    }

    if stack.len() > 1 {
        let node = stack.pop().expect("stack has more than the root");
        return Err(ParseError::UnclosedElement {
            tag: node.tag_name().to_string(),
            location: node.location,
        });
    }
    Ok(stack.pop().expect("root node"))
}

/// Byte cursor that tracks line/column as it moves.
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, base: Location) -> Self {
        Self {
            src,
            pos: 0,
            line: base.line,
            column: base.column,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.src[self.pos..].starts_with(prefix)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.src[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Move forward to an absolute byte offset (never backwards).
    fn advance_to(&mut self, target: usize) {
        while self.pos < target && self.bump().is_some() {}
    }
}

fn tag_follows(content: &str, at: usize) -> bool {
    content[at..]
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false)
}

fn push_child(stack: &mut [TreeNode], node: TreeNode) {
    stack
        .last_mut()
        .expect("stack always holds the root")
        .children
        .push(node);
}

fn parse_comment(cur: &mut Cursor, stack: &mut [TreeNode]) {
    let loc = cur.location();
    let start = cur.pos + 4;
    let (text_end, after) = match cur.src[start..].find("-->") {
        Some(rel) => (start + rel, start + rel + 3),
        // Unterminated comment swallows the rest of the template.
        None => (cur.src.len(), cur.src.len()),
    };
    let text = cur.src[start..text_end].trim().to_string();
    cur.advance_to(after);
    push_child(stack, TreeNode::comment(&text, loc));
}

fn parse_close_tag(cur: &mut Cursor, stack: &mut Vec<TreeNode>) {
    let start = cur.pos + 2;
    match cur.src[start..].find('>') {
        Some(rel) => {
            let name = cur.src[start..start + rel].trim().to_string();
            cur.advance_to(start + rel + 1);
            close_element(stack, &name);
        }
        None => cur.advance_to(cur.src.len()),
    }
}

/// Pop the stack down to the element named `name`, auto-closing anything
/// still open above it. A stray closer with no matching open is ignored.
fn close_element(stack: &mut Vec<TreeNode>, name: &str) {
    let Some(idx) = stack
        .iter()
        .rposition(|n| n.kind == NodeKind::Element && n.tag_name() == name)
    else {
        return;
    };
    while stack.len() > idx {
        let node = stack.pop().expect("idx is within the stack");
        push_child(stack, node);
    }
}

fn parse_open_tag(cur: &mut Cursor, stack: &mut Vec<TreeNode>) {
    let loc = cur.location();
    let name_start = cur.pos + 1;
    let rest = &cur.src[name_start..];
    let name_len = rest
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    let name = rest[..name_len].to_string();
    cur.advance_to(name_start + name_len);

    let mut node = TreeNode::element(&name, loc);
    let mut self_closing = false;
    loop {
        skip_whitespace(cur);
        if cur.at_end() {
            break;
        }
        if cur.starts_with("/>") {
            self_closing = true;
            cur.advance_to(cur.pos + 2);
            break;
        }
        if cur.starts_with(">") {
            cur.advance_to(cur.pos + 1);
            break;
        }
        parse_attribute(cur, &mut node);
    }

    if self_closing || VOID_ELEMENTS.contains(name.as_str()) {
        push_child(stack, node);
    } else {
        stack.push(node);
    }
}

fn skip_whitespace(cur: &mut Cursor) {
    while cur
        .src[cur.pos..]
        .chars()
        .next()
        .map(|c| c.is_whitespace())
        .unwrap_or(false)
    {
        cur.bump();
    }
}

fn parse_attribute(cur: &mut Cursor, node: &mut TreeNode) {
    let start = cur.pos;
    let rest = &cur.src[start..];
    let name_len = rest
        .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
        .unwrap_or(rest.len());
    if name_len == 0 {
        // Stray character inside the tag; skip it to keep making progress.
        cur.bump();
        return;
    }
    let raw_name = rest[..name_len].to_string();
    cur.advance_to(start + name_len);

    let mut value = String::new();
    if cur.starts_with("=") {
        cur.advance_to(cur.pos + 1);
        let rest = &cur.src[cur.pos..];
        match rest.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let vstart = cur.pos + 1;
                match cur.src[vstart..].find(q) {
                    Some(rel) => {
                        value = cur.src[vstart..vstart + rel].to_string();
                        cur.advance_to(vstart + rel + 1);
                    }
                    None => {
                        value = cur.src[vstart..].to_string();
                        cur.advance_to(cur.src.len());
                    }
                }
            }
            Some(_) => {
                let vlen = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                value = rest[..vlen].to_string();
                cur.advance_to(cur.pos + vlen);
            }
            None => {}
        }
    }

    node.bindings.push(classify_binding(&raw_name, &value));
}

/// Normalize an attribute name into a `Binding`.
fn classify_binding(raw: &str, value: &str) -> Binding {
    if let Some(rest) = raw.strip_prefix(':') {
        return Binding::directive("v-bind", Some(strip_modifiers(rest)), value);
    }
    if let Some(rest) = raw.strip_prefix('@') {
        return Binding::directive("v-on", Some(strip_modifiers(rest)), value);
    }
    if let Some(rest) = raw.strip_prefix('#') {
        return Binding::directive("v-slot", Some(strip_modifiers(rest)), value);
    }
    if raw.starts_with("v-") {
        return match raw.find(':') {
            Some(i) => Binding::directive(&raw[..i], Some(strip_modifiers(&raw[i + 1..])), value),
            None => Binding::directive(strip_modifiers(raw), None, value),
        };
    }
    Binding::attr(raw, value)
}

fn strip_modifiers(s: &str) -> &str {
    s.split('.').next().unwrap_or(s)
}

fn parse_text_run(cur: &mut Cursor, stack: &mut [TreeNode]) {
    let start = cur.pos;
    // A leading '<' that did not open a tag is plain text.
    let search_from = if cur.starts_with("<") { start + 1 } else { start };
    let end = cur.src[search_from..]
        .find('<')
        .map(|i| i + search_from)
        .unwrap_or(cur.src.len());

    let mut pos = start;
    while pos < end {
        match cur.src[pos..end].find("{{") {
            Some(rel) => {
                let open = pos + rel;
                emit_text(cur, stack, pos, open);
                match cur.src[open + 2..end].find("}}") {
                    Some(crel) => {
                        let close = open + 2 + crel;
                        cur.advance_to(open);
                        let loc = cur.location();
                        let expr = cur.src[open + 2..close].trim().to_string();
                        cur.advance_to(close + 2);
                        push_child(stack, TreeNode::expression(&expr, loc));
                        pos = close + 2;
                    }
                    None => {
                        // Unterminated interpolation degrades to text.
                        emit_text(cur, stack, open, end);
                        pos = end;
                    }
                }
            }
            None => {
                emit_text(cur, stack, pos, end);
                pos = end;
            }
        }
    }
    cur.advance_to(end);
}

fn emit_text(cur: &mut Cursor, stack: &mut [TreeNode], from: usize, to: usize) {
    cur.advance_to(from);
    let loc = cur.location();
    let text = cur.src[from..to].trim().to_string();
    cur.advance_to(to);
    if !text.is_empty() {
        push_child(stack, TreeNode::text(&text, loc));
    }
}
