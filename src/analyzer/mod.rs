//! Code Analyzer Module
//!
//! Static (never executed) analysis of Python package sources:
//! - Module outlines via tree-sitter
//! - Package file scanning with gitignore support

pub mod parser;
pub mod scanner;

pub use parser::{ModuleSyntax, PythonParser};
pub use scanner::{ModuleScanner, ScannedModule};
