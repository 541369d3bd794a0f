//! Docsift - API Reference Resolution for Python Packages
//!
//! Turns a Python package into an ordered list of documentation sections
//! that a reference renderer can consume without failing on a single bad
//! symbol.
//!
//! ## Pipeline
//!
//! - **Export Discovery**: `__all__` from source, or loader introspection
//! - **Trial Validation**: every candidate resolved exactly as the renderer would
//! - **Categorization**: classes, functions and other objects, with methods
//! - **Directives**: `%family`, `%order`, `%seealso`, `%nodoc` in docstrings
//! - **Section Assembly**: explicit, family-based or category-based sections
//!
//! ## Quick Start
//!
//! ```ignore
//! use docsift::{ConfigLoader, PackageHandle, ResolutionPipeline, SourceLoader};
//!
//! let config = ConfigLoader::load(&root)?;
//! let package = PackageHandle::new("widgets");
//! let loader = SourceLoader::open(&root, &package)?;
//! let resolution = ResolutionPipeline::new(&loader, &package, &config).run(Some(&source))?;
//! println!("{}", resolution.report);
//! ```
//!
//! ## Modules
//!
//! - [`loader`]: object-model loader seam and the static source loader
//! - [`discovery`]: export discovery and exclusion filtering
//! - [`analyzer`]: tree-sitter parsing of Python sources
//! - [`config`]: layered configuration

pub mod analyzer;
pub mod categorizer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod directives;
pub mod discovery;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod sections;
pub mod types;
pub mod validator;

#[cfg(test)]
mod testing;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, DiscoveryMethod, FamilyConfig};

// Error Types
pub use types::error::{DocsiftError, Result, ResultExt};

// Domain Types
pub use types::{
    CandidateSymbol, ContentRef, ExclusionReason, ExclusionRecord, FailureKind, PackageHandle,
    SectionDescriptor, SymbolKind, ValidatedSymbol,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use directives::{Directive, DirectiveMap, extract_directives};
pub use discovery::{Discovery, ExportDiscovery, Strategy};
pub use loader::{LoadError, LoadedObject, ObjectLoader, SourceLoader, SymbolAdapter};
pub use pipeline::{Resolution, ResolutionPipeline};
pub use report::DiagnosticReport;
pub use sections::{SectionAssembler, SectionOutcome};
