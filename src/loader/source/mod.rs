//! Static Source Loader
//!
//! An [`ObjectLoader`] that reads a package from disk without importing it.
//! Every module is outlined with tree-sitter up front; objects are then
//! addressed by dotted path. Import bindings become aliases that are only
//! followed when an accessor needs the target, so alias failures surface
//! lazily like they do with a runtime introspection engine.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{LoadError, LoadResult, LoadedObject, ObjectKind, ObjectLoader, ResolveOptions};
use crate::analyzer::parser::{Definition, DefinitionKind, ImportSpec, ModuleSyntax, PythonParser};
use crate::analyzer::scanner::ModuleScanner;
use crate::constants::scanner::MAX_ALIAS_DEPTH;
use crate::discovery::locate;
use crate::types::{DocsiftError, PackageHandle, Result};

struct ModuleEntry {
    path: PathBuf,
    is_package: bool,
    syntax: ModuleSyntax,
}

struct PackageIndex {
    package: String,
    modules: BTreeMap<String, ModuleEntry>,
}

/// Address of an object inside the index
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeRef {
    Module(String),
    /// `trail` indexes into the module's definitions, then into class bodies
    Definition { module: String, trail: Vec<usize> },
}

pub struct SourceLoader {
    index: Arc<PackageIndex>,
}

impl SourceLoader {
    /// Locate `package` under `project_root` and index it
    pub fn open(project_root: &Path, package: &PackageHandle) -> Result<Self> {
        let package_dir = locate::find_package_dir(project_root, package.as_str()).ok_or_else(
            || DocsiftError::PackageLoad {
                package: package.to_string(),
                source: LoadError::NotFound(package.to_string()),
            },
        )?;
        Self::from_dir(&package_dir, package)
    }

    /// Index the package rooted at `package_dir`
    pub fn from_dir(package_dir: &Path, package: &PackageHandle) -> Result<Self> {
        let parser = PythonParser::new()?;
        let mut modules = BTreeMap::new();

        for scanned in ModuleScanner::new(package_dir, package.as_str()).scan()? {
            let content = match fs::read_to_string(&scanned.path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable module {}: {}", scanned.path.display(), e);
                    continue;
                }
            };
            let syntax = parser.parse(&scanned.path.to_string_lossy(), &content)?;
            if syntax.has_errors {
                debug!("Syntax errors in {}", scanned.path.display());
            }
            modules.insert(
                scanned.name,
                ModuleEntry {
                    path: scanned.path,
                    is_package: scanned.is_package,
                    syntax,
                },
            );
        }

        info!(
            "Indexed {} module(s) for package '{}'",
            modules.len(),
            package
        );

        Ok(Self {
            index: Arc::new(PackageIndex {
                package: package.to_string(),
                modules,
            }),
        })
    }

    /// Path of the package's `__init__.py`, when indexed
    pub fn entry_module(&self) -> Option<&Path> {
        self.index
            .modules
            .get(&self.index.package)
            .map(|m| m.path.as_path())
    }

    pub fn module_count(&self) -> usize {
        self.index.modules.len()
    }

    fn object(&self, path: String, node: NodeRef) -> SourceObject {
        SourceObject {
            index: Arc::clone(&self.index),
            path,
            node,
        }
    }
}

impl ObjectLoader for SourceLoader {
    type Object = SourceObject;

    fn load(&self, package: &str) -> LoadResult<SourceObject> {
        if package != self.index.package {
            return Err(LoadError::NotFound(package.to_string()));
        }
        let entry = self
            .index
            .modules
            .get(package)
            .ok_or_else(|| LoadError::NotFound(package.to_string()))?;
        if entry.syntax.has_errors {
            return Err(syntax_error(&entry.path));
        }
        Ok(self.object(package.to_string(), NodeRef::Module(package.to_string())))
    }

    fn resolve(&self, qualified: &str, options: &ResolveOptions) -> LoadResult<SourceObject> {
        debug!("Resolving {} (dynamic={})", qualified, options.dynamic);
        let path = qualified.replacen(':', ".", 1);
        let node = self.index.lookup(&path, 0)?;
        Ok(self.object(path, node))
    }

    fn runtime_module(&self, package: &str, name: &str) -> Option<bool> {
        if package != self.index.package {
            return None;
        }
        let path = format!("{}.{}", package, name);
        let node = self.index.lookup(&path, 0).ok()?;
        let concrete = self.index.concrete(&path, node, 0).ok()?;
        Some(matches!(concrete, NodeRef::Module(_)))
    }
}

// =============================================================================
// Objects
// =============================================================================

#[derive(Clone)]
pub struct SourceObject {
    index: Arc<PackageIndex>,
    path: String,
    node: NodeRef,
}

impl SourceObject {
    fn concrete(&self) -> LoadResult<NodeRef> {
        self.index.concrete(&self.path, self.node.clone(), 0)
    }

    fn child(&self, name: &str, node: NodeRef) -> Self {
        Self {
            index: Arc::clone(&self.index),
            path: format!("{}.{}", self.path, name),
            node,
        }
    }
}

impl LoadedObject for SourceObject {
    fn path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> LoadResult<ObjectKind> {
        let concrete = self.concrete()?;
        Ok(match &concrete {
            NodeRef::Module(_) => ObjectKind::Module,
            NodeRef::Definition { trail, .. } => match &self.index.definition(&concrete)?.kind {
                DefinitionKind::Class { .. } => ObjectKind::Class,
                DefinitionKind::Function { .. } if trail.len() > 1 => ObjectKind::Method,
                DefinitionKind::Function { .. } => ObjectKind::Function,
                DefinitionKind::Attribute | DefinitionKind::Import(_) => ObjectKind::Attribute,
            },
        })
    }

    fn members(&self) -> LoadResult<Vec<(String, Self)>> {
        let concrete = self.concrete()?;
        Ok(self
            .index
            .children(&concrete)?
            .into_iter()
            .map(|(name, node)| {
                let object = self.child(&name, node);
                (name, object)
            })
            .collect())
    }

    fn lineno(&self) -> Option<u32> {
        match self.concrete().ok()? {
            NodeRef::Module(_) => None,
            node => self.index.definition(&node).ok().map(|d| d.line),
        }
    }

    fn docstring(&self) -> LoadResult<Option<String>> {
        let concrete = self.concrete()?;
        Ok(match &concrete {
            NodeRef::Module(name) => self.index.module(name)?.syntax.docstring.clone(),
            NodeRef::Definition { .. } => match &self.index.definition(&concrete)?.kind {
                DefinitionKind::Class { docstring, .. }
                | DefinitionKind::Function { docstring, .. } => docstring.clone(),
                DefinitionKind::Attribute | DefinitionKind::Import(_) => None,
            },
        })
    }
}

// =============================================================================
// Index Navigation
// =============================================================================

impl PackageIndex {
    fn module(&self, name: &str) -> LoadResult<&ModuleEntry> {
        self.modules
            .get(name)
            .ok_or_else(|| LoadError::NotFound(name.to_string()))
    }

    fn definition(&self, node: &NodeRef) -> LoadResult<&Definition> {
        let NodeRef::Definition { module, trail } = node else {
            return Err(LoadError::other("TypeError", "modules have no definition"));
        };
        let not_found = || LoadError::NotFound(module.clone());

        let mut definitions = &self.module(module)?.syntax.definitions;
        let mut current: Option<&Definition> = None;
        for &idx in trail {
            if let Some(Definition {
                kind: DefinitionKind::Class { body, .. },
                ..
            }) = current
            {
                definitions = body;
            } else if current.is_some() {
                return Err(not_found());
            }
            current = Some(definitions.get(idx).ok_or_else(not_found)?);
        }
        current.ok_or_else(not_found)
    }

    /// Direct members of a concrete node, last binding of a name winning
    /// but keeping the position of its first binding.
    fn children(&self, node: &NodeRef) -> LoadResult<Vec<(String, NodeRef)>> {
        match node {
            NodeRef::Module(name) => {
                let entry = self.module(name)?;
                if entry.syntax.has_errors {
                    return Err(syntax_error(&entry.path));
                }

                let mut children: Vec<(String, NodeRef)> =
                    unique_bindings(&entry.syntax.definitions)
                        .into_iter()
                        .map(|(member, idx)| {
                            let node = NodeRef::Definition {
                                module: name.clone(),
                                trail: vec![idx],
                            };
                            (member, node)
                        })
                        .collect();

                let prefix = format!("{}.", name);
                for submodule in self.modules.keys() {
                    let Some(rest) = submodule.strip_prefix(&prefix) else {
                        continue;
                    };
                    if rest.contains('.') || children.iter().any(|(n, _)| n == rest) {
                        continue;
                    }
                    children.push((rest.to_string(), NodeRef::Module(submodule.clone())));
                }
                Ok(children)
            }
            NodeRef::Definition { module, trail } => match &self.definition(node)?.kind {
                DefinitionKind::Class { body, .. } => Ok(unique_bindings(body)
                    .into_iter()
                    .map(|(member, idx)| {
                        let mut trail = trail.clone();
                        trail.push(idx);
                        let node = NodeRef::Definition {
                            module: module.clone(),
                            trail,
                        };
                        (member, node)
                    })
                    .collect()),
                _ => Ok(Vec::new()),
            },
        }
    }

    fn child(&self, node: &NodeRef, name: &str) -> LoadResult<Option<NodeRef>> {
        Ok(self
            .children(node)?
            .into_iter()
            .find(|(member, _)| member == name)
            .map(|(_, node)| node))
    }

    /// Walk a dotted path, following aliases met along the way. The final
    /// node is returned as-is and may itself be an alias.
    fn lookup(&self, path: &str, depth: usize) -> LoadResult<NodeRef> {
        let segments: Vec<&str> = path.split('.').collect();

        let (mut node, consumed) = (1..=segments.len())
            .rev()
            .find_map(|i| {
                let name = segments[..i].join(".");
                self.modules
                    .contains_key(&name)
                    .then_some((NodeRef::Module(name), i))
            })
            .ok_or_else(|| LoadError::NotFound(path.to_string()))?;

        let mut current_path = segments[..consumed].join(".");
        for segment in &segments[consumed..] {
            let concrete = self.concrete(&current_path, node, depth)?;
            node = self
                .child(&concrete, segment)?
                .ok_or_else(|| LoadError::NotFound(path.to_string()))?;
            current_path = format!("{}.{}", current_path, segment);
        }
        Ok(node)
    }

    /// Follow alias bindings until a module, class, function or attribute
    fn concrete(&self, path: &str, node: NodeRef, depth: usize) -> LoadResult<NodeRef> {
        let mut current = node;
        let mut current_path = path.to_string();
        let mut seen: Vec<String> = Vec::new();

        loop {
            let spec = match &current {
                NodeRef::Module(_) => return Ok(current),
                NodeRef::Definition { .. } => match &self.definition(&current)?.kind {
                    DefinitionKind::Import(spec) => spec.clone(),
                    _ => return Ok(current),
                },
            };

            if seen.contains(&current_path) || depth + seen.len() >= MAX_ALIAS_DEPTH {
                return Err(LoadError::CyclicReference(current_path));
            }
            seen.push(current_path.clone());

            let NodeRef::Definition { module, .. } = &current else {
                return Ok(current);
            };
            let target = self.import_target(module, &spec).ok_or_else(|| {
                LoadError::UnresolvedReference {
                    path: current_path.clone(),
                    target: describe_import(&spec),
                }
            })?;

            current = match self.lookup(&target, depth + seen.len()) {
                Ok(node) => node,
                Err(LoadError::NotFound(_)) => {
                    return Err(LoadError::UnresolvedReference {
                        path: current_path,
                        target,
                    });
                }
                Err(e) => return Err(e),
            };
            current_path = target;
        }
    }

    /// Absolute dotted target of an import binding made in `module`
    fn import_target(&self, module: &str, spec: &ImportSpec) -> Option<String> {
        let mut parts: Vec<String> = if spec.level == 0 {
            Vec::new()
        } else {
            let entry = self.modules.get(module)?;
            let mut base: Vec<String> = module.split('.').map(String::from).collect();
            if !entry.is_package {
                base.pop();
            }
            for _ in 1..spec.level {
                base.pop()?;
            }
            if base.is_empty() {
                return None;
            }
            base
        };

        parts.extend(spec.module.iter().cloned());
        parts.extend(spec.member.iter().cloned());
        (!parts.is_empty()).then(|| parts.join("."))
    }
}

fn unique_bindings(definitions: &[Definition]) -> Vec<(String, usize)> {
    let mut bindings: Vec<(String, usize)> = Vec::new();
    for (idx, definition) in definitions.iter().enumerate() {
        match bindings.iter_mut().find(|(name, _)| *name == definition.name) {
            Some(binding) => binding.1 = idx,
            None => bindings.push((definition.name.clone(), idx)),
        }
    }
    bindings
}

fn describe_import(spec: &ImportSpec) -> String {
    format!(
        "{}{}{}",
        ".".repeat(spec.level),
        spec.module.as_deref().unwrap_or(""),
        spec.member
            .as_deref()
            .map(|m| format!(" import {}", m))
            .unwrap_or_default()
    )
}

fn syntax_error(path: &Path) -> LoadError {
    LoadError::other("SyntaxError", format!("could not parse {}", path.display()))
}
