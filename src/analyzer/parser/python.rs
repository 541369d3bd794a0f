//! Python module syntax extraction.
//!
//! Produces a lightweight outline of one module: its docstring, the
//! top-level definitions (recursing into class bodies), import bindings,
//! and every assignment of a list/tuple literal to a plain name.

use tree_sitter::Node;

use super::{clean_docstring, create_ts_parser, get_node_text, named_children, node_line, string_literal};
use crate::types::{DocsiftError, Result};

#[derive(Debug, Clone, Default)]
pub struct ModuleSyntax {
    pub docstring: Option<String>,
    pub definitions: Vec<Definition>,
    /// `NAME = [..]` / `NAME = (..)` assignments anywhere in the module, in
    /// source order
    pub sequence_assignments: Vec<SequenceAssignment>,
    pub has_errors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceAssignment {
    pub target: String,
    pub line: u32,
    /// Plain string elements, in order; other elements are skipped
    pub strings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    pub line: u32,
    pub kind: DefinitionKind,
}

#[derive(Debug, Clone)]
pub enum DefinitionKind {
    Class {
        docstring: Option<String>,
        body: Vec<Definition>,
    },
    Function {
        docstring: Option<String>,
        is_async: bool,
    },
    Attribute,
    Import(ImportSpec),
}

/// Where an import binding points.
///
/// `from ..a.b import C` is `{ level: 2, module: Some("a.b"), member: Some("C") }`;
/// `import a.b as c` is `{ level: 0, module: Some("a.b"), member: None }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub level: usize,
    pub module: Option<String>,
    pub member: Option<String>,
}

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Result<Self> {
        // Validate that the language is available
        let _ = create_ts_parser(tree_sitter_python::LANGUAGE, "Python")?;
        Ok(Self)
    }

    pub fn parse(&self, path: &str, content: &str) -> Result<ModuleSyntax> {
        let mut parser = create_ts_parser(tree_sitter_python::LANGUAGE, "Python")
            .map_err(|e| DocsiftError::parse(path, e.to_string()))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| DocsiftError::parse(path, "Failed to parse Python file"))?;

        let root = tree.root_node();
        let bytes = content.as_bytes();

        let mut sequence_assignments = Vec::new();
        collect_sequence_assignments(root, bytes, &mut sequence_assignments);

        Ok(ModuleSyntax {
            docstring: block_docstring(root, bytes),
            definitions: extract_definitions(root, bytes),
            sequence_assignments,
            has_errors: root.has_error(),
        })
    }
}

/// Docstring of a module or block: a string literal as first statement.
fn block_docstring(block: Node, content: &[u8]) -> Option<String> {
    let first = named_children(block)
        .into_iter()
        .find(|n| n.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    string_literal(expr, content).map(|raw| clean_docstring(&raw))
}

fn extract_definitions(block: Node, content: &[u8]) -> Vec<Definition> {
    let mut definitions = Vec::new();

    for statement in named_children(block) {
        match statement.kind() {
            "class_definition" | "function_definition" => {
                definitions.extend(definition(statement, content));
            }
            "decorated_definition" => {
                if let Some(inner) = statement.child_by_field_name("definition") {
                    definitions.extend(definition(inner, content));
                }
            }
            "expression_statement" => {
                for expr in named_children(statement) {
                    if expr.kind() == "assignment" {
                        definitions.extend(assignment_target(expr, content));
                    }
                }
            }
            "import_from_statement" => definitions.extend(from_imports(statement, content)),
            "import_statement" => definitions.extend(plain_imports(statement, content)),
            "if_statement" | "try_statement" | "with_statement" => {
                for nested in branch_blocks(statement) {
                    definitions.extend(extract_definitions(nested, content));
                }
            }
            _ => {}
        }
    }

    definitions
}

/// Blocks of a compound statement and its clauses, in source order.
/// Every branch counts: bindings made under `if`/`try` are visible members.
fn branch_blocks(statement: Node) -> Vec<Node> {
    let mut blocks = Vec::new();
    for child in named_children(statement) {
        match child.kind() {
            "block" => blocks.push(child),
            "elif_clause" | "else_clause" | "except_clause" | "except_group_clause"
            | "finally_clause" => blocks.extend(branch_blocks(child)),
            _ => {}
        }
    }
    blocks
}

fn definition(node: Node, content: &[u8]) -> Option<Definition> {
    let name = get_node_text(node.child_by_field_name("name")?, content).to_string();
    let body = node.child_by_field_name("body");
    let docstring = body.and_then(|b| block_docstring(b, content));

    let kind = if node.kind() == "class_definition" {
        DefinitionKind::Class {
            docstring,
            body: body
                .map(|b| extract_definitions(b, content))
                .unwrap_or_default(),
        }
    } else {
        let is_async = node.child(0).is_some_and(|c| c.kind() == "async");
        DefinitionKind::Function {
            docstring,
            is_async,
        }
    };

    Some(Definition {
        name,
        line: node_line(node),
        kind,
    })
}

fn assignment_target(assignment: Node, content: &[u8]) -> Option<Definition> {
    let left = assignment.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    Some(Definition {
        name: get_node_text(left, content).to_string(),
        line: node_line(assignment),
        kind: DefinitionKind::Attribute,
    })
}

fn from_imports(statement: Node, content: &[u8]) -> Vec<Definition> {
    let Some(module_node) = statement.child_by_field_name("module_name") else {
        return Vec::new();
    };

    let (level, module) = if module_node.kind() == "relative_import" {
        let mut level = 0;
        let mut module = None;
        for child in named_children(module_node) {
            match child.kind() {
                "import_prefix" => level = get_node_text(child, content).trim().len(),
                "dotted_name" => module = Some(get_node_text(child, content).to_string()),
                _ => {}
            }
        }
        (level, module)
    } else {
        (0, Some(get_node_text(module_node, content).to_string()))
    };

    let mut cursor = statement.walk();
    statement
        .children_by_field_name("name", &mut cursor)
        .filter_map(|name_node| {
            let (member, bound) = aliased(name_node, content)?;
            Some(Definition {
                name: bound,
                line: node_line(statement),
                kind: DefinitionKind::Import(ImportSpec {
                    level,
                    module: module.clone(),
                    member: Some(member),
                }),
            })
        })
        .collect()
}

fn plain_imports(statement: Node, content: &[u8]) -> Vec<Definition> {
    let mut cursor = statement.walk();
    statement
        .children_by_field_name("name", &mut cursor)
        .filter_map(|name_node| {
            let is_aliased = name_node.kind() == "aliased_import";
            let (dotted, bound) = aliased(name_node, content)?;
            // `import a.b` binds `a`; `import a.b as c` binds `c` to `a.b`
            let (module, bound) = if is_aliased {
                (dotted, bound)
            } else {
                let head = dotted.split('.').next().unwrap_or(&dotted).to_string();
                (head.clone(), head)
            };
            Some(Definition {
                name: bound,
                line: node_line(statement),
                kind: DefinitionKind::Import(ImportSpec {
                    level: 0,
                    module: Some(module),
                    member: None,
                }),
            })
        })
        .collect()
}

/// `(imported, bound)` names of a `dotted_name` or `aliased_import` node.
fn aliased(node: Node, content: &[u8]) -> Option<(String, String)> {
    match node.kind() {
        "dotted_name" => {
            let text = get_node_text(node, content).to_string();
            Some((text.clone(), text))
        }
        "aliased_import" => {
            let name = get_node_text(node.child_by_field_name("name")?, content).to_string();
            let alias = get_node_text(node.child_by_field_name("alias")?, content).to_string();
            Some((name, alias))
        }
        _ => None,
    }
}

fn collect_sequence_assignments(node: Node, content: &[u8], out: &mut Vec<SequenceAssignment>) {
    if node.kind() == "assignment"
        && let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        )
        && left.kind() == "identifier"
        && matches!(right.kind(), "list" | "tuple")
    {
        out.push(SequenceAssignment {
            target: get_node_text(left, content).to_string(),
            line: node_line(node),
            strings: named_children(right)
                .into_iter()
                .filter_map(|element| string_literal(element, content))
                .collect(),
        });
    }

    for child in named_children(node) {
        collect_sequence_assignments(child, content, out);
    }
}
