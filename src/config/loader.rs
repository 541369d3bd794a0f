//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/docsift/config.toml)
//! 3. `[tool.docsift]` table of the project's pyproject.toml
//! 4. Project config (docsift.toml)
//! 5. Environment variables (DOCSIFT_* prefix, `__` between nested keys)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{DocsiftError, Result};

const PROJECT_CONFIG_FILE: &str = "docsift.toml";
const PYPROJECT_TABLE: &str = "tool.docsift";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the project at `project_root` with the full
    /// resolution chain: defaults → global → pyproject → project → env vars
    pub fn load(project_root: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Merge global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        // Merge [tool.docsift] from pyproject.toml
        let pyproject = project_root.join("pyproject.toml");
        if pyproject.exists() {
            debug!("Loading [{}] from: {}", PYPROJECT_TABLE, pyproject.display());
            figment = figment.merge(Figment::from(Toml::file(&pyproject)).focus(PYPROJECT_TABLE));
        }

        // Merge project config
        let project_path = Self::project_config_path(project_root);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // Merge environment variables (e.g., DOCSIFT_METHOD_THRESHOLD -> method_threshold)
        figment = figment.merge(Env::prefixed("DOCSIFT_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| DocsiftError::Config(format!("Configuration error: {}", e)))?;

        // Validate configuration after loading
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DocsiftError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/docsift/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("docsift"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_CONFIG_FILE)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path(project_root: &Path) {
        println!("Configuration paths:");
        println!();

        // Global config
        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:    {} {}", exists, global.display());
        } else {
            println!("  Global:    (not available)");
        }

        let pyproject = project_root.join("pyproject.toml");
        let exists = if pyproject.exists() { "✓" } else { "✗" };
        println!(
            "  Pyproject: {} {} [{}]",
            exists,
            pyproject.display(),
            PYPROJECT_TABLE
        );

        // Project config
        let project = Self::project_config_path(project_root);
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project:   {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(project_root: &Path, as_json: bool) -> Result<()> {
        let config = Self::load(project_root)?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            // Pretty print in TOML format
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| DocsiftError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a commented default `docsift.toml` into `project_root`
    pub fn init_project(project_root: &Path, package: Option<&str>, force: bool) -> Result<PathBuf> {
        let config_path = Self::project_config_path(project_root);
        if config_path.exists() && !force {
            info!("Project config exists: {}", config_path.display());
            return Ok(config_path);
        }

        fs::write(&config_path, Self::default_project_config(package))?;
        info!("Created project config: {}", config_path.display());
        Ok(config_path)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Generate default project config content (TOML)
    fn default_project_config(package: Option<&str>) -> String {
        let package_line = match package {
            Some(name) => format!("package = \"{}\"", name),
            None => "# package = \"my_package\"".to_string(),
        };
        format!(
            r#"# docsift Project Configuration
# Settings here override the global config and [tool.docsift] in pyproject.toml.

version = "1.0"
{}

# auto: __all__ first, then introspection
# declared: __all__ only
# introspect: introspection first, then __all__
discovery_method = "auto"

# Names never documented
exclude = []

# Names documented even when auto-excluded (e.g. "config", "main")
include = []

# Classes with more methods than this get a "<Class> Methods" section
method_threshold = 5

# Explicit sections replace automatic grouping:
#
# [[reference]]
# title = "Core"
# desc = "Main entry points"
# contents = ["Widget", {{ name = "Engine", members = false }}]

# Titles for %family groups, keyed by lowercase-hyphenated family name:
#
# [families.data-loading]
# title = "Loading Data"
# desc = "Readers and parsers"
"#,
            package_line
        )
    }
}
