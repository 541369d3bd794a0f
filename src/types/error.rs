//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! Only run-level failures live here. Per-symbol loader failures are modelled
//! by [`crate::loader::LoadError`] and never surface as a `DocsiftError`:
//! the validator turns them into exclusion records instead.

use thiserror::Error;

use crate::loader::LoadError;

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DocsiftError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Config error: {0}")]
    Config(String),

    /// The package itself could not be loaded by the object-model loader
    #[error("Could not load package '{package}': {source}")]
    PackageLoad {
        package: String,
        #[source]
        source: LoadError,
    },

    /// Neither discovery strategy produced a candidate list
    #[error("Could not discover any exports for package '{package}'")]
    DiscoveryAbsent { package: String },

    /// No package name was given and none could be detected
    #[error("Could not detect a package under {0}")]
    PackageNotDetected(String),

    /// Automatic assembly produced nothing to document
    #[error("Could not auto-generate sections for package '{package}'")]
    NoSections { package: String },
}

pub type Result<T> = std::result::Result<T, DocsiftError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl DocsiftError {
    /// Create a parse error for a file path
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Whether the error ends the run before any output could be produced
    pub fn is_discovery_failure(&self) -> bool {
        matches!(
            self,
            Self::DiscoveryAbsent { .. } | Self::PackageLoad { .. } | Self::PackageNotDetected(_)
        )
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| DocsiftError::Config(format!("{}: {}", context.into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
