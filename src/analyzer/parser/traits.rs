use crate::types::{DocsiftError, Result};

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// 1-based line of the node's first character.
#[inline]
pub fn node_line(node: tree_sitter::Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| DocsiftError::Parse {
            message: format!("Failed to set {} language: {}", lang_name, e),
            path: String::new(),
        })?;
    Ok(parser)
}

/// Named children of a node, collected so callers can keep borrowing the tree.
pub fn named_children(node: tree_sitter::Node) -> Vec<tree_sitter::Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Value of a plain Python string literal node.
///
/// Returns `None` for anything that is not a constant `str`: f-strings,
/// bytes literals, implicit concatenations, and non-string expressions.
pub fn string_literal(node: tree_sitter::Node, content: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let mut value = String::new();
    for child in named_children(node) {
        match child.kind() {
            "string_start" => {
                let prefix = get_node_text(child, content).to_ascii_lowercase();
                if prefix.contains('f') || prefix.contains('b') {
                    return None;
                }
            }
            "string_content" => value.push_str(get_node_text(child, content)),
            "interpolation" => return None,
            _ => {}
        }
    }
    Some(value)
}

/// Normalize docstring indentation the way Python's `inspect.cleandoc` does:
/// leading/trailing blank lines dropped, common indentation of lines after
/// the first removed.
pub fn clean_docstring(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let indent = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return line.trim().to_string();
            }
            let cut = line
                .char_indices()
                .take_while(|(pos, c)| *pos < indent && c.is_whitespace())
                .map(|(pos, c)| pos + c.len_utf8())
                .last()
                .unwrap_or(0);
            line[cut..].trim_end().to_string()
        })
        .collect();

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}
