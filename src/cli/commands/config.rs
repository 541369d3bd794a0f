//! Config Command
//!
//! Manage docsift configuration.
//!
//! Usage:
//!   docsift config show [-g] [-f toml|json]
//!   docsift config path
//!   docsift config init [--package NAME] [--force]

use std::path::PathBuf;

use crate::cli::util::project_root;
use crate::config::ConfigLoader;
use crate::discovery::locate::detect_package_name;
use crate::types::Result;

/// Show configuration
pub fn show(root: Option<PathBuf>, global: bool, format: &str) -> Result<()> {
    if global {
        match ConfigLoader::global_config_path() {
            Some(path) if path.exists() => {
                println!("# Global Config: {}\n", path.display());
                println!("{}", std::fs::read_to_string(&path)?);
            }
            Some(_) => {
                println!("No global config found.");
            }
            None => println!("Cannot determine global config directory."),
        }
        return Ok(());
    }

    // Merged effective config
    ConfigLoader::show_config(&project_root(root)?, format == "json")
}

/// Show configuration paths
pub fn path(root: Option<PathBuf>) -> Result<()> {
    ConfigLoader::show_path(&project_root(root)?);
    Ok(())
}

/// Initialize project configuration
pub fn init_project(root: Option<PathBuf>, package: Option<String>, force: bool) -> Result<()> {
    let root = project_root(root)?;
    let package = package.or_else(|| detect_package_name(&root));

    let path = ConfigLoader::init_project(&root, package.as_deref(), force)?;
    println!("✓ Initialized project configuration");
    println!("  Config:  {}", path.display());
    if let Some(name) = package {
        println!("  Package: {}", name);
    }
    Ok(())
}
