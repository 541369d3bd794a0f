//! Symbol model shared by the resolution stages.
//!
//! Discovery produces [`CandidateSymbol`]s; the validator and categorizer turn
//! each one into either a [`ValidatedSymbol`] or an [`ExclusionRecord`].

use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// Package Handle
// =============================================================================

/// Normalized importable package name
///
/// Distribution names use dashes (`my-pkg`) while the importable name uses
/// underscores (`my_pkg`); the handle always holds the importable form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageHandle(String);

impl PackageHandle {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().replace('-', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Qualified path of a member in the `package:dotted.name` form used by
    /// the renderer's resolver.
    pub fn qualify(&self, dotted: &str) -> String {
        format!("{}:{}", self.0, dotted)
    }
}

impl fmt::Display for PackageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PackageHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Candidates & Exclusions
// =============================================================================

/// A discovered export name, not yet validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSymbol {
    pub name: String,
    /// Index in discovery order
    pub position: usize,
}

impl CandidateSymbol {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Why a candidate was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionReason {
    AutoExcluded,
    CodeExcluded,
    UserExcluded,
    Submodule,
    ValidationFailed,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoExcluded => write!(f, "auto-excluded"),
            Self::CodeExcluded => write!(f, "code-excluded"),
            Self::UserExcluded => write!(f, "user-excluded"),
            Self::Submodule => write!(f, "submodule"),
            Self::ValidationFailed => write!(f, "validation-failed"),
        }
    }
}

/// Classified cause of a failed trial resolution
///
/// The `Other` variant carries the loader's own error type name so nothing is
/// lost for errors the validator does not know about.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureKind {
    NotFound,
    CyclicAlias,
    UnresolvableAlias,
    Other(String),
}

impl FailureKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotFound => "not-found",
            Self::CyclicAlias => "cyclic-alias",
            Self::UnresolvableAlias => "unresolvable-alias",
            Self::Other(type_name) => type_name,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FailureKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionRecord {
    pub name: String,
    pub reason: ExclusionReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
}

impl ExclusionRecord {
    pub fn new(name: impl Into<String>, reason: ExclusionReason) -> Self {
        Self {
            name: name.into(),
            reason,
            failure_kind: None,
        }
    }

    pub fn validation_failed(name: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            name: name.into(),
            reason: ExclusionReason::ValidationFailed,
            failure_kind: Some(kind),
        }
    }
}

// =============================================================================
// Validated Symbols
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Function,
    Other,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Function => write!(f, "function"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Line position of a declaration; unknown positions sort after known ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourceOrder(Option<u32>);

impl SourceOrder {
    pub const UNKNOWN: Self = Self(None);

    pub const fn line(line: u32) -> Self {
        Self(Some(line))
    }

    pub const fn from_lineno(lineno: Option<u32>) -> Self {
        Self(lineno)
    }

    pub const fn get(self) -> Option<u32> {
        self.0
    }
}

impl Ord for SourceOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for SourceOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedMethod {
    pub name: String,
    pub order: SourceOrder,
    #[serde(skip)]
    pub docstring: Option<String>,
}

impl ValidatedMethod {
    /// `Class.method` reference used by the renderer
    pub fn qualified(&self, class_name: &str) -> String {
        format!("{}.{}", class_name, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub order: SourceOrder,
    /// Index in discovery order
    pub position: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<ValidatedMethod>,
    #[serde(skip)]
    pub docstring: Option<String>,
}

impl ValidatedSymbol {
    pub fn is_class(&self) -> bool {
        self.kind == SymbolKind::Class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_handle_normalizes_dashes() {
        let handle = PackageHandle::new("great-docs ");
        assert_eq!(handle.as_str(), "great_docs");
        assert_eq!(handle.qualify("Widget.run"), "great_docs:Widget.run");
    }

    #[test]
    fn test_source_order_unknown_sorts_last() {
        let mut orders = vec![
            SourceOrder::UNKNOWN,
            SourceOrder::line(30),
            SourceOrder::line(10),
        ];
        orders.sort();
        assert_eq!(
            orders,
            vec![
                SourceOrder::line(10),
                SourceOrder::line(30),
                SourceOrder::UNKNOWN
            ]
        );
    }

    #[test]
    fn test_failure_kind_strings() {
        assert_eq!(FailureKind::NotFound.to_string(), "not-found");
        assert_eq!(FailureKind::CyclicAlias.to_string(), "cyclic-alias");
        assert_eq!(
            FailureKind::UnresolvableAlias.to_string(),
            "unresolvable-alias"
        );
        assert_eq!(
            FailureKind::Other("KeyError".to_string()).to_string(),
            "KeyError"
        );
    }

    #[test]
    fn test_exclusion_record_serialization() {
        let record = ExclusionRecord::validation_failed("Broken", FailureKind::CyclicAlias);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["reason"], "validation-failed");
        assert_eq!(json["failure_kind"], "cyclic-alias");

        let plain = ExclusionRecord::new("main", ExclusionReason::AutoExcluded);
        let json = serde_json::to_value(&plain).unwrap();
        assert_eq!(json["reason"], "auto-excluded");
        assert!(json.get("failure_kind").is_none());
    }

    #[test]
    fn test_method_qualified_name() {
        let method = ValidatedMethod {
            name: "run".to_string(),
            order: SourceOrder::line(4),
            docstring: None,
        };
        assert_eq!(method.qualified("Widget"), "Widget.run");
    }
}
