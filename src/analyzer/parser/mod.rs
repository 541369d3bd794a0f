//! Language Parser Module
//!
//! Tree-sitter based parsing of Python package sources.
//!
//! ```rust,ignore
//! use docsift::analyzer::parser::PythonParser;
//!
//! let parser = PythonParser::new()?;
//! let module = parser.parse("pkg/__init__.py", source_code)?;
//! ```

pub mod python;
pub mod traits;

pub use python::{
    Definition, DefinitionKind, ImportSpec, ModuleSyntax, PythonParser, SequenceAssignment,
};
pub use traits::{
    clean_docstring, create_ts_parser, get_node_text, named_children, node_line, string_literal,
};
