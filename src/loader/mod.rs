//! Object-Model Loader Seam
//!
//! The pipeline never inspects package code itself. It asks an
//! [`ObjectLoader`] for objects and reads their kind, members, line numbers
//! and docstrings. Any of those accessors may fail lazily (aliases are only
//! followed when something is read through them), which is why every
//! accessor returns a [`LoadResult`].
//!
//! - [`adapter`]: the single boundary that resolves symbols the way the
//!   renderer does
//! - [`source`]: static loader built on tree-sitter

pub mod adapter;
pub mod source;

pub use adapter::{Resolved, SymbolAdapter};
pub use source::SourceLoader;

use std::fmt;
use thiserror::Error;

use crate::types::FailureKind;

// =============================================================================
// Load Errors
// =============================================================================

/// Closed failure taxonomy for loader calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("'{0}' not found")]
    NotFound(String),

    #[error("cyclic alias detected at '{0}'")]
    CyclicReference(String),

    #[error("could not resolve alias '{path}' pointing at '{target}'")]
    UnresolvedReference { path: String, target: String },

    /// Catch-all carrying the loader's own error type name
    #[error("{type_name}: {message}")]
    Other { type_name: String, message: String },
}

impl LoadError {
    pub fn other(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Other {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Diagnostic classification used in exclusion records
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::NotFound,
            Self::CyclicReference(_) => FailureKind::CyclicAlias,
            Self::UnresolvedReference { .. } => FailureKind::UnresolvableAlias,
            Self::Other { type_name, .. } => FailureKind::Other(type_name.clone()),
        }
    }

    pub fn is_cyclic(&self) -> bool {
        matches!(self, Self::CyclicReference(_))
    }
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;

// =============================================================================
// Object Kinds & Options
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Module,
    Class,
    Function,
    Method,
    Attribute,
}

impl ObjectKind {
    pub fn is_function_like(self) -> bool {
        matches!(self, Self::Function | Self::Method)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Class => write!(f, "class"),
            Self::Function => write!(f, "function"),
            Self::Method => write!(f, "method"),
            Self::Attribute => write!(f, "attribute"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocstringStyle {
    #[default]
    Numpy,
    Google,
    Sphinx,
}

/// Options passed to [`ObjectLoader::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Allow the loader to fall back to runtime inspection
    pub dynamic: bool,
    pub docstring_style: DocstringStyle,
}

/// The option set the reference renderer resolves with. Trial validation
/// must use exactly these so its failures match what rendering would hit.
pub const RENDERER_OPTIONS: ResolveOptions = ResolveOptions {
    dynamic: true,
    docstring_style: DocstringStyle::Numpy,
};

// =============================================================================
// Loader Traits
// =============================================================================

/// An object handed out by a loader. Accessors may trigger lazy resolution.
pub trait LoadedObject: Sized {
    /// Dotted path of the object as it was reached
    fn path(&self) -> &str;

    fn kind(&self) -> LoadResult<ObjectKind>;

    /// Direct members in declaration order
    fn members(&self) -> LoadResult<Vec<(String, Self)>>;

    /// 1-based line of the declaration, if known
    fn lineno(&self) -> Option<u32>;

    fn docstring(&self) -> LoadResult<Option<String>>;
}

pub trait ObjectLoader {
    type Object: LoadedObject;

    /// Load the package itself
    fn load(&self, package: &str) -> LoadResult<Self::Object>;

    /// Resolve a `package:dotted.name` path
    fn resolve(&self, qualified: &str, options: &ResolveOptions) -> LoadResult<Self::Object>;

    /// Whether the runtime value of `package.name` is a module. `None` when
    /// the loader has no runtime view of the package.
    fn runtime_module(&self, _package: &str, _name: &str) -> Option<bool> {
        None
    }
}
