//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/docsift/config.toml)
//! 3. `[tool.docsift]` in pyproject.toml
//! 4. Project config (docsift.toml)
//! 5. Environment variables (DOCSIFT_*)
//! 6. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
