//! Global Constants
//!
//! Centralized constants for discovery, assembly and scanning.
//! All magic numbers and fixed name lists should be defined here.

/// Export discovery constants
pub mod discovery {
    /// Variable holding the package's declared public names
    pub const PUBLIC_NAMES_VAR: &str = "__all__";

    /// Legacy in-module exclusion list
    pub const LEGACY_EXCLUDE_VAR: &str = "__gt_exclude__";

    /// Leading marker of internal names
    pub const INTERNAL_PREFIX: char = '_';

    /// Boilerplate names never documented unless explicitly included
    pub const AUTO_EXCLUDE: &[&str] = &[
        // CLI and entry points
        "main",
        "cli",
        // Version and metadata
        "version",
        "VERSION",
        "VERSION_INFO",
        // Common module re-exports
        "core",
        "utils",
        "helpers",
        "constants",
        "config",
        "settings",
        // Standard library re-exports
        "PackageNotFoundError",
        "typing",
        "annotations",
        "TYPE_CHECKING",
        // Logging
        "logger",
        "log",
        "logging",
    ];

    /// Directories searched (relative to the project root) for the package
    pub const PACKAGE_SEARCH_DIRS: &[&str] = &["", "python", "src", "lib"];
}

/// Section assembly constants
pub mod sections {
    /// Classes with more validated methods than this get a dedicated
    /// methods section
    pub const DEFAULT_METHOD_THRESHOLD: usize = 5;

    pub const CLASSES_TITLE: &str = "Classes";
    pub const CLASSES_DESC: &str = "Core classes and types";
    pub const FUNCTIONS_TITLE: &str = "Functions";
    pub const FUNCTIONS_DESC: &str = "Public functions";
    pub const OTHER_TITLE: &str = "Other";
    pub const OTHER_DESC: &str = "Additional exports";
}

/// Directive constants
pub mod directives {
    /// Token that starts a directive line in a docstring
    pub const MARKER: char = '%';
}

/// Module scanning constants
pub mod scanner {
    /// Maximum module size to parse (2MB)
    pub const MAX_MODULE_SIZE: u64 = 2 * 1024 * 1024;

    /// Directories never descended into
    pub const SKIP_DIRS: &[&str] = &["__pycache__", ".venv", "venv", "build", "dist", ".git"];

    /// Upper bound on alias hops before giving up
    pub const MAX_ALIAS_DEPTH: usize = 64;
}
