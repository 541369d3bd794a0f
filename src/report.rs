//! Diagnostic report
//!
//! One consolidated summary per run: what was included, what was excluded
//! and why, grouped by reason and failure kind.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::categorizer::SkippedMethod;
use crate::discovery::Strategy;
use crate::types::{ExclusionReason, ExclusionRecord};

const CYCLIC_ALIAS_ADVICE: &str = "Cyclic aliases were found. Disabling dynamic introspection \
     in the renderer (dynamic: false) usually resolves them.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub package: String,
    pub strategy: Strategy,
    /// Documented names, in discovery order
    pub included: Vec<String>,
    pub excluded: BTreeMap<ExclusionReason, Vec<String>>,
    /// Validation failures per failure kind
    pub failures: BTreeMap<String, Vec<String>>,
    pub cyclic_aliases: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_methods: Vec<SkippedMethod>,
    /// Validated names hidden by `%nodoc`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl DiagnosticReport {
    pub fn new(package: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            package: package.into(),
            strategy,
            included: Vec::new(),
            excluded: BTreeMap::new(),
            failures: BTreeMap::new(),
            cyclic_aliases: 0,
            skipped_methods: Vec::new(),
            suppressed: Vec::new(),
            recommendation: None,
        }
    }

    pub fn record_exclusions(&mut self, records: &[ExclusionRecord]) {
        for record in records {
            self.excluded
                .entry(record.reason)
                .or_default()
                .push(record.name.clone());
            if let Some(kind) = &record.failure_kind {
                self.failures
                    .entry(kind.to_string())
                    .or_default()
                    .push(record.name.clone());
            }
        }
    }

    pub fn set_cyclic_aliases(&mut self, count: usize) {
        self.cyclic_aliases = count;
        self.recommendation = (count > 0).then(|| CYCLIC_ALIAS_ADVICE.to_string());
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.values().map(Vec::len).sum()
    }

    pub fn failure_tallies(&self) -> BTreeMap<&str, usize> {
        self.failures
            .iter()
            .map(|(kind, names)| (kind.as_str(), names.len()))
            .collect()
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} included, {} excluded (via {})",
            self.package,
            self.included.len(),
            self.excluded_count(),
            self.strategy
        )?;
        for (reason, names) in &self.excluded {
            writeln!(f, "  {} ({}): {}", reason, names.len(), names.join(", "))?;
        }
        for (kind, names) in &self.failures {
            writeln!(f, "  failed [{}]: {}", kind, names.join(", "))?;
        }
        if !self.skipped_methods.is_empty() {
            writeln!(f, "  skipped methods: {}", self.skipped_methods.len())?;
        }
        if !self.suppressed.is_empty() {
            writeln!(f, "  %nodoc: {}", self.suppressed.join(", "))?;
        }
        if let Some(advice) = &self.recommendation {
            writeln!(f, "  {}", advice)?;
        }
        Ok(())
    }
}
