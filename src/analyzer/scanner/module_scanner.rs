use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::constants::scanner::{MAX_MODULE_SIZE, SKIP_DIRS};
use crate::types::Result;

/// Walks a package directory and maps every Python file to its dotted
/// module name.
pub struct ModuleScanner {
    package_dir: PathBuf,
    package: String,
    max_file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedModule {
    /// Dotted module name (`pkg.sub.mod`)
    pub name: String,
    pub path: PathBuf,
    /// `__init__.py` of a (sub)package
    pub is_package: bool,
}

impl ModuleScanner {
    pub fn new<P: AsRef<Path>>(package_dir: P, package: impl Into<String>) -> Self {
        Self {
            package_dir: package_dir.as_ref().to_path_buf(),
            package: package.into(),
            max_file_size: MAX_MODULE_SIZE,
        }
    }

    /// Modules sorted by dotted name
    pub fn scan(&self) -> Result<Vec<ScannedModule>> {
        let mut modules = Vec::new();

        let walker = WalkBuilder::new(&self.package_dir)
            .hidden(true)
            .git_ignore(true)
            .git_exclude(true)
            .follow_links(false)
            .filter_entry(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !SKIP_DIRS.contains(&name))
            })
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("py") {
                continue;
            }

            let Ok(metadata) = path.metadata() else {
                continue;
            };
            if metadata.len() > self.max_file_size {
                tracing::debug!("Skipping oversized module {}", path.display());
                continue;
            }

            if let Some(module) = self.module_for(path) {
                modules.push(module);
            }
        }

        modules.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(modules)
    }

    fn module_for(&self, path: &Path) -> Option<ScannedModule> {
        let relative = path.strip_prefix(&self.package_dir).ok()?;
        let mut parts: Vec<String> = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();

        let is_package = parts.last().is_some_and(|p| p == "__init__");
        if is_package {
            parts.pop();
        }

        // Files like `my-script.py` are not importable
        if parts
            .iter()
            .any(|p| p.is_empty() || p.contains('-') || p.contains('.'))
        {
            return None;
        }

        let name = std::iter::once(self.package.clone())
            .chain(parts)
            .collect::<Vec<_>>()
            .join(".");

        Some(ScannedModule {
            name,
            path: path.to_path_buf(),
            is_package,
        })
    }
}
