//! Package location
//!
//! Finds the package directory and its entry module under the layouts Python
//! projects commonly use, and detects the package name when none is given.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::constants::discovery::{PACKAGE_SEARCH_DIRS, PUBLIC_NAMES_VAR};

/// Importable form of a distribution name (`my-pkg` → `my_pkg`)
pub fn normalize_package_name(name: &str) -> String {
    name.trim().replace('-', "_")
}

/// Entry module (`__init__.py`) of `package` below `project_root`.
///
/// Searches `<root>`, `python/`, `src/` and `lib/` for both the given and the
/// normalized name. An `__init__.py` mentioning `__version__` or `__all__` is
/// preferred over a bare one.
pub fn find_package_init(project_root: &Path, package: &str) -> Option<PathBuf> {
    let normalized = normalize_package_name(package);
    let mut names = vec![package.to_string()];
    if normalized != package {
        names.push(normalized);
    }

    let candidates: Vec<PathBuf> = PACKAGE_SEARCH_DIRS
        .iter()
        .flat_map(|dir| {
            names
                .iter()
                .map(move |name| project_root.join(dir).join(name).join("__init__.py"))
        })
        .filter(|init| init.is_file())
        .collect();

    let preferred = candidates.iter().find(|init| {
        fs::read_to_string(init)
            .map(|content| content.contains("__version__") || content.contains(PUBLIC_NAMES_VAR))
            .unwrap_or(false)
    });

    let found = preferred.or(candidates.first()).cloned();
    if let Some(init) = &found {
        debug!("Found package entry module at {}", init.display());
    }
    found
}

/// Directory holding the package's entry module
pub fn find_package_dir(project_root: &Path, package: &str) -> Option<PathBuf> {
    find_package_init(project_root, package).and_then(|init| init.parent().map(Path::to_path_buf))
}

/// Detect the package name of the project at `project_root`.
///
/// Order: `[project].name` in `pyproject.toml`, `name=` in `setup.py`, then
/// the only top-level directory carrying an `__init__.py`.
pub fn detect_package_name(project_root: &Path) -> Option<String> {
    let pyproject = project_root.join("pyproject.toml");
    if pyproject.is_file() {
        let name = fs::read_to_string(&pyproject)
            .ok()
            .and_then(|content| toml::from_str::<toml::Table>(&content).ok())
            .and_then(|table| {
                table
                    .get("project")?
                    .get("name")?
                    .as_str()
                    .map(String::from)
            });
        if name.is_some() {
            return name;
        }
    }

    let setup_py = project_root.join("setup.py");
    if setup_py.is_file()
        && let Ok(content) = fs::read_to_string(&setup_py)
        && let Some(name) = setup_py_name(&content)
    {
        return Some(name);
    }

    let packages: Vec<String> = fs::read_dir(project_root)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path.join("__init__.py").is_file())
        .filter_map(|path| path.file_name()?.to_str().map(String::from))
        .filter(|name| !name.starts_with('.'))
        .collect();

    match packages.as_slice() {
        [single] => Some(single.clone()),
        _ => None,
    }
}

fn setup_py_name(content: &str) -> Option<String> {
    let pattern = Regex::new(r#"name\s*=\s*["']([^"']+)["']"#).ok()?;
    pattern
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
