//! CLI Common Utilities
//!
//! Shared initialization for command handlers: project root, configuration,
//! package detection and the static loader.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{Config, ConfigLoader};
use crate::discovery::locate::{detect_package_name, find_package_init};
use crate::loader::SourceLoader;
use crate::pipeline::{Resolution, ResolutionPipeline};
use crate::types::{DocsiftError, PackageHandle, Result};

/// Command execution context
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub package: PackageHandle,
    pub loader: SourceLoader,
    /// Text of the package's `__init__.py`, when one was found
    pub entry_source: Option<String>,
}

impl CommandContext {
    /// Load full command context.
    ///
    /// The package name comes from `--package`, then the `package` config
    /// key, then project metadata detection.
    pub fn load(root: Option<PathBuf>, package: Option<String>) -> Result<Self> {
        let project_root = project_root(root)?;
        let config = ConfigLoader::load(&project_root)?;

        let name = package
            .or_else(|| config.package.clone())
            .or_else(|| detect_package_name(&project_root))
            .ok_or_else(|| DocsiftError::PackageNotDetected(project_root.display().to_string()))?;
        let package = PackageHandle::new(&name);
        debug!("Resolving package '{}' under {}", package, project_root.display());

        let loader = SourceLoader::open(&project_root, &package)?;
        let entry_source = read_entry_source(&project_root, package.as_str());

        Ok(Self {
            project_root,
            config,
            package,
            loader,
            entry_source,
        })
    }

    /// Run the full resolution pipeline
    pub fn resolve(&self) -> Result<Resolution> {
        ResolutionPipeline::new(&self.loader, &self.package, &self.config)
            .run(self.entry_source.as_deref())
    }
}

/// `root` when given, the current directory otherwise
pub fn project_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) if root.is_dir() => Ok(root),
        Some(root) => Err(DocsiftError::Config(format!(
            "Project root is not a directory: {}",
            root.display()
        ))),
        None => Ok(std::env::current_dir()?),
    }
}

fn read_entry_source(project_root: &Path, package: &str) -> Option<String> {
    let init = find_package_init(project_root, package)?;
    match fs::read_to_string(&init) {
        Ok(source) => Some(source),
        Err(e) => {
            warn!("Could not read {}: {}", init.display(), e);
            None
        }
    }
}

/// Render `value` as `json` or `yaml`
pub fn render<T: serde::Serialize>(value: &T, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(value)?),
        "yaml" => Ok(serde_yaml::to_string(value)?),
        other => Err(DocsiftError::Config(format!(
            "Unknown output format '{}'. Valid values: yaml, json",
            other
        ))),
    }
}
