//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/docsift/) and project (docsift.toml) level configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::sections::DEFAULT_METHOD_THRESHOLD;
use crate::types::{DocsiftError, SectionDescriptor};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Package to document (detected from the project when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Order in which discovery strategies are tried
    pub discovery_method: DiscoveryMethod,

    /// Names never documented
    pub exclude: Vec<String>,

    /// Names documented even when auto-excluded
    pub include: Vec<String>,

    /// Classes with more methods than this get their own methods section
    pub method_threshold: usize,

    /// Explicit section structure; disables automatic grouping when non-empty
    pub reference: Vec<SectionDescriptor>,

    /// Per-family section titles, keyed by [`family_key`]
    pub families: BTreeMap<String, FamilyConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            package: None,
            discovery_method: DiscoveryMethod::default(),
            exclude: Vec::new(),
            include: Vec::new(),
            method_threshold: DEFAULT_METHOD_THRESHOLD,
            reference: Vec::new(),
            families: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocsiftError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.method_threshold == 0 {
            return Err(DocsiftError::Config(
                "method_threshold must be greater than 0".to_string(),
            ));
        }

        if let Some(idx) = self
            .reference
            .iter()
            .position(|group| group.title.trim().is_empty())
        {
            return Err(DocsiftError::Config(format!(
                "reference group #{} has an empty title",
                idx + 1
            )));
        }

        Ok(())
    }

    /// Whether the user supplied an explicit section structure
    pub fn is_explicit(&self) -> bool {
        !self.reference.is_empty()
    }

    /// Configured presentation of a family, looked up by normalized key
    pub fn family(&self, name: &str) -> Option<&FamilyConfig> {
        self.families.get(&family_key(name))
    }
}

// =============================================================================
// Discovery
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMethod {
    /// Declared `__all__` first, introspection as fallback
    #[default]
    Auto,
    /// Declared `__all__` only
    #[serde(alias = "all")]
    Declared,
    /// Introspection first, declared `__all__` as fallback
    #[serde(alias = "dir")]
    Introspect,
}

impl std::fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryMethod::Auto => write!(f, "auto"),
            DiscoveryMethod::Declared => write!(f, "declared"),
            DiscoveryMethod::Introspect => write!(f, "introspect"),
        }
    }
}

// =============================================================================
// Families
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FamilyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// Section position; unordered families follow in order of appearance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// Lookup key of a family name: lowercase, words joined by `-`
pub fn family_key(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
