//! Export Discovery
//!
//! Decides which names a package exports, then filters out the ones that
//! should never be documented.
//!
//! - [`declared`]: the package's own `__all__` list, read from source text
//! - [`introspect`]: public members reported by the object-model loader
//! - [`exclusion`]: auto, in-module and user exclusion lists
//! - [`locate`]: finds the package and its entry module on disk

pub mod declared;
pub mod exclusion;
pub mod introspect;
pub mod locate;

pub use declared::{DeclaredExports, parse_declared};
pub use exclusion::{ExclusionFilter, Filtered};
pub use introspect::introspect_exports;

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::analyzer::parser::PythonParser;
use crate::config::{Config, DiscoveryMethod};
use crate::loader::{ObjectLoader, SymbolAdapter};
use crate::types::{CandidateSymbol, DocsiftError, ExclusionRecord, Result};

const ENTRY_MODULE: &str = "__init__.py";

/// Which strategy produced the candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    DeclaredList,
    Introspection,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclaredList => write!(f, "declared list"),
            Self::Introspection => write!(f, "introspection"),
        }
    }
}

impl Strategy {
    fn order(method: DiscoveryMethod) -> &'static [Strategy] {
        match method {
            DiscoveryMethod::Auto => &[Strategy::DeclaredList, Strategy::Introspection],
            DiscoveryMethod::Declared => &[Strategy::DeclaredList],
            DiscoveryMethod::Introspect => &[Strategy::Introspection, Strategy::DeclaredList],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Discovery {
    pub strategy: Strategy,
    pub candidates: Vec<CandidateSymbol>,
    pub exclusions: Vec<ExclusionRecord>,
}

pub struct ExportDiscovery<'a, L: ObjectLoader> {
    adapter: &'a SymbolAdapter<'a, L>,
    config: &'a Config,
}

impl<'a, L: ObjectLoader> ExportDiscovery<'a, L> {
    pub fn new(adapter: &'a SymbolAdapter<'a, L>, config: &'a Config) -> Self {
        Self { adapter, config }
    }

    /// Run the configured strategies in order; the first one with a result
    /// wins. `source` is the entry-module text, when available.
    pub fn discover(&self, source: Option<&str>) -> Result<Discovery> {
        for &strategy in Strategy::order(self.config.discovery_method) {
            let found = match strategy {
                Strategy::DeclaredList => self.declared(source),
                Strategy::Introspection => {
                    introspect_exports(self.adapter).map(|names| (names, Vec::new()))
                }
            };

            if let Some((names, legacy)) = found {
                info!("Discovered exports via {}", strategy);
                let filtered = ExclusionFilter::new(&self.config.include, &self.config.exclude)
                    .with_legacy(&legacy)
                    .apply(&names);
                return Ok(Discovery {
                    strategy,
                    candidates: filtered.candidates,
                    exclusions: filtered.exclusions,
                });
            }
        }

        Err(DocsiftError::DiscoveryAbsent {
            package: self.adapter.package().to_string(),
        })
    }

    fn declared(&self, source: Option<&str>) -> Option<(Vec<String>, Vec<String>)> {
        let text = source?;
        let parsed = PythonParser::new().and_then(|parser| parse_declared(&parser, ENTRY_MODULE, text));
        match parsed {
            Ok(found) => found.map(|d| (d.public, d.legacy_exclude)),
            Err(e) => {
                warn!("Error parsing declared exports: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryLoader, MemoryNode};
    use crate::types::{ExclusionReason, PackageHandle};

    fn loader() -> MemoryLoader {
        MemoryLoader::new("pkg")
            .with(MemoryNode::class("Widget", 3))
            .with(MemoryNode::function("make", 10))
            .with(MemoryNode::function("_hidden", 12))
            .with(MemoryNode::function("main", 14))
    }

    fn names(discovery: &Discovery) -> Vec<&str> {
        discovery.candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_declared_list_preferred() {
        let loader = loader();
        let handle = PackageHandle::new("pkg");
        let adapter = SymbolAdapter::new(&loader, &handle);
        let config = Config::default();

        let discovery = ExportDiscovery::new(&adapter, &config)
            .discover(Some("__all__ = ['make', 'Widget', 'Legacy']\n__gt_exclude__ = ['Legacy']\n"))
            .unwrap();

        assert_eq!(discovery.strategy, Strategy::DeclaredList);
        assert_eq!(names(&discovery), vec!["make", "Widget"]);
        assert_eq!(discovery.exclusions[0].reason, ExclusionReason::CodeExcluded);
    }

    #[test]
    fn test_falls_back_to_introspection() {
        let loader = loader();
        let handle = PackageHandle::new("pkg");
        let adapter = SymbolAdapter::new(&loader, &handle);
        let config = Config::default();

        let discovery = ExportDiscovery::new(&adapter, &config)
            .discover(Some("from .core import Widget\n"))
            .unwrap();

        assert_eq!(discovery.strategy, Strategy::Introspection);
        assert_eq!(names(&discovery), vec!["Widget", "make"]);
        assert_eq!(discovery.exclusions.len(), 1);
        assert_eq!(discovery.exclusions[0].name, "main");
    }

    #[test]
    fn test_introspect_first_when_configured() {
        let loader = loader();
        let handle = PackageHandle::new("pkg");
        let adapter = SymbolAdapter::new(&loader, &handle);
        let config = Config {
            discovery_method: DiscoveryMethod::Introspect,
            include: vec!["main".to_string()],
            ..Config::default()
        };

        let discovery = ExportDiscovery::new(&adapter, &config)
            .discover(Some("__all__ = ['make']\n"))
            .unwrap();

        assert_eq!(discovery.strategy, Strategy::Introspection);
        assert_eq!(names(&discovery), vec!["Widget", "make", "main"]);
    }

    #[test]
    fn test_absence_is_an_error() {
        let loader = MemoryLoader::new("pkg").failing(crate::loader::LoadError::NotFound("pkg".into()));
        let handle = PackageHandle::new("pkg");
        let adapter = SymbolAdapter::new(&loader, &handle);
        let config = Config::default();

        let err = ExportDiscovery::new(&adapter, &config)
            .discover(None)
            .unwrap_err();
        assert!(matches!(err, DocsiftError::DiscoveryAbsent { ref package } if package == "pkg"));

        let declared_only = Config {
            discovery_method: DiscoveryMethod::Declared,
            ..Config::default()
        };
        let err = ExportDiscovery::new(&adapter, &declared_only)
            .discover(Some("X = 1\n"))
            .unwrap_err();
        assert!(err.is_discovery_failure());
    }
}
