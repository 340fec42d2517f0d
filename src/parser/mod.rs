//! Built-in parser adapter for single-file components.
//!
//! Splits a source file into its `<template>` and `<script>` blocks and
//! parses the template into a markup tree. This is a best-effort component
//! parser, not a full HTML parser: it understands tags, attributes,
//! comments and interpolations, which is all the detection engine consumes.
//!
//! Callers with their own parser can build a `ParsedComponent` directly and
//! skip this module entirely.

mod template;

use crate::component::{Location, LogicBlock, ParsedComponent};

pub use template::parse_template;

/// Errors for source that cannot be understood as a component.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Neither a template nor a script block was found.
    #[error("source has no template or script block")]
    NotAComponent,
    /// A block opening tag has no matching close tag.
    #[error("unterminated <{block}> block")]
    UnterminatedBlock { block: String },
    /// An element was still open at the end of the template.
    #[error("unclosed <{tag}> element at {location}")]
    UnclosedElement { tag: String, location: Location },
}

/// Parse component source into a markup tree plus raw logic block.
pub fn parse(source: &str) -> Result<ParsedComponent, ParseError> {
    let template_block = extract_block(source, "template")?;
    let script_block = extract_block(source, "script")?;

    if template_block.is_none() && script_block.is_none() {
        return Err(ParseError::NotAComponent);
    }

    let template = match &template_block {
        Some(block) => Some(parse_template(&block.content, block.content_start)?),
        None => None,
    };

    let script = script_block.map(|block| LogicBlock {
        text: block.content,
        lang: attr_value(&block.attrs, "lang"),
        setup: has_flag(&block.attrs, "setup"),
        location: block.content_start,
    });

    Ok(ParsedComponent { template, script })
}

/// A raw top-level block, before any inner parsing.
struct RawBlock {
    /// Attribute text of the opening tag (between tag name and `>`).
    attrs: String,
    /// Content between the opening and closing tags.
    content: String,
    /// Location of the first content byte in the file.
    content_start: Location,
}

/// Extract the first `<tag ...>...</tag>` block, honoring nested
/// occurrences of the same tag (slot templates inside a template block).
fn extract_block(source: &str, tag: &str) -> Result<Option<RawBlock>, ParseError> {
    let open_marker = format!("<{}", tag);
    let close_marker = format!("</{}>", tag);

    let Some(open_at) = find_tag_open(source, &open_marker) else {
        return Ok(None);
    };

    let after_name = open_at + open_marker.len();
    let Some(open_end) = find_tag_end(source, after_name) else {
        return Err(ParseError::UnterminatedBlock {
            block: tag.to_string(),
        });
    };
    let attrs = source[after_name..open_end].to_string();
    let content_at = open_end + 1;

    // Walk forward balancing nested opens of the same tag.
    let mut depth = 1usize;
    let mut pos = content_at;
    let close_at = loop {
        let next_open = find_tag_open(&source[pos..], &open_marker).map(|i| i + pos);
        let next_close = source[pos..].find(&close_marker).map(|i| i + pos);
        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                pos = o + open_marker.len();
            }
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    break c;
                }
                pos = c + close_marker.len();
            }
            _ => {
                return Err(ParseError::UnterminatedBlock {
                    block: tag.to_string(),
                })
            }
        }
    };

    Ok(Some(RawBlock {
        attrs,
        content: source[content_at..close_at].to_string(),
        content_start: location_at(source, content_at),
    }))
}

/// Find `marker` where it starts a real tag (followed by whitespace, `>`
/// or `/`), not a longer tag name sharing the prefix.
fn find_tag_open(haystack: &str, marker: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = haystack[from..].find(marker) {
        let at = from + rel;
        let after = haystack[at + marker.len()..].chars().next();
        match after {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => return Some(at),
            None => return Some(at),
            _ => from = at + marker.len(),
        }
    }
    None
}

/// Position of the `>` ending a tag, skipping quoted attribute values.
fn find_tag_end(source: &str, from: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(i),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Compute the 1-indexed location of a byte offset.
fn location_at(source: &str, offset: usize) -> Location {
    let clamped = offset.min(source.len());
    let prefix = &source[..clamped];
    let line = prefix.matches('\n').count() + 1;
    let column = match prefix.rfind('\n') {
        Some(pos) => clamped - pos,
        None => clamped + 1,
    };
    Location::new(line, column)
}

/// Read `name="value"` out of a raw attribute string.
fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let marker = format!("{}=", name);
    let at = attrs.find(&marker)?;
    let rest = &attrs[at + marker.len()..];
    match rest.chars().next() {
        Some(q @ ('"' | '\'')) => {
            let tail = &rest[1..];
            tail.find(q).map(|end| tail[..end].to_string())
        }
        Some(_) => Some(
            rest.split(|c: char| c.is_whitespace() || c == '>')
                .next()
                .unwrap_or("")
                .to_string(),
        ),
        None => None,
    }
}

/// Whether a bare flag attribute (like `setup`) is present.
fn has_flag(attrs: &str, name: &str) -> bool {
    attrs
        .split(|c: char| c.is_whitespace())
        .any(|word| word == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_blocks() {
        let source =
            "<template>\n  <div>hi</div>\n</template>\n<script>\nexport default {}\n</script>\n";
        let parsed = parse(source).unwrap();
        assert!(parsed.template.is_some());
        let script = parsed.script.unwrap();
        assert!(script.text.contains("export default"));
        assert_eq!(script.location.line, 4);
    }

    #[test]
    fn test_parse_script_attrs() {
        let source = "<script setup lang=\"ts\">\nconst a = 1;\n</script>";
        let parsed = parse(source).unwrap();
        let script = parsed.script.unwrap();
        assert!(script.setup);
        assert_eq!(script.lang.as_deref(), Some("ts"));
        assert!(script.is_typescript());
    }

    #[test]
    fn test_parse_rejects_non_component() {
        assert!(matches!(
            parse("not a component at all"),
            Err(ParseError::NotAComponent)
        ));
    }

    #[test]
    fn test_parse_unterminated_template() {
        let err = parse("<template><div></div>").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedBlock { .. }));
    }

    #[test]
    fn test_nested_slot_templates_stay_inside_block() {
        let source = "<template>\n<MyList>\n<template #item>\n<span>x</span>\n</template>\n</MyList>\n</template>";
        let parsed = parse(source).unwrap();
        let root = parsed.template.unwrap();
        // The outer block swallowed the nested slot template.
        assert_eq!(crate::tree::elements(&root).len(), 3);
    }

    #[test]
    fn test_location_at() {
        let src = "ab\ncd";
        assert_eq!(location_at(src, 0), Location::new(1, 1));
        assert_eq!(location_at(src, 3), Location::new(2, 1));
        assert_eq!(location_at(src, 4), Location::new(2, 2));
    }
}
