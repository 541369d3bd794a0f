//! Exclusion filtering
//!
//! Sorts discovered names into candidates and exclusion records. A name hit
//! by several rules is recorded once, under the first reason in priority
//! order: auto-exclusion, then the in-module legacy list, then the user's
//! `exclude` list.

use tracing::info;

use crate::constants::discovery::AUTO_EXCLUDE;
use crate::types::{CandidateSymbol, ExclusionReason, ExclusionRecord};

#[derive(Debug, Clone, Copy)]
pub struct ExclusionFilter<'a> {
    include: &'a [String],
    exclude: &'a [String],
    legacy: &'a [String],
}

/// Result of filtering a discovered name list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtered {
    pub candidates: Vec<CandidateSymbol>,
    pub exclusions: Vec<ExclusionRecord>,
}

impl<'a> ExclusionFilter<'a> {
    pub fn new(include: &'a [String], exclude: &'a [String]) -> Self {
        Self {
            include,
            exclude,
            legacy: &[],
        }
    }

    pub fn with_legacy(mut self, legacy: &'a [String]) -> Self {
        self.legacy = legacy;
        self
    }

    /// First matching exclusion reason for `name`, if any
    pub fn reason(&self, name: &str) -> Option<ExclusionReason> {
        let listed = |list: &[String]| list.iter().any(|n| n == name);

        if AUTO_EXCLUDE.contains(&name) && !listed(self.include) {
            Some(ExclusionReason::AutoExcluded)
        } else if listed(self.legacy) {
            Some(ExclusionReason::CodeExcluded)
        } else if listed(self.exclude) {
            Some(ExclusionReason::UserExcluded)
        } else {
            None
        }
    }

    /// Partition `names`, keeping discovery order on both sides
    pub fn apply(&self, names: &[String]) -> Filtered {
        let mut filtered = Filtered::default();

        for name in names {
            match self.reason(name) {
                Some(reason) => filtered
                    .exclusions
                    .push(ExclusionRecord::new(name.clone(), reason)),
                None => {
                    let position = filtered.candidates.len();
                    filtered
                        .candidates
                        .push(CandidateSymbol::new(name.clone(), position));
                }
            }
        }

        let overridden: Vec<&str> = names
            .iter()
            .filter(|n| AUTO_EXCLUDE.contains(&n.as_str()) && self.include.contains(*n))
            .map(String::as_str)
            .collect();
        if !overridden.is_empty() {
            info!(
                "Including {} auto-excluded item(s) via include: {}",
                overridden.len(),
                overridden.join(", ")
            );
        }
        if !filtered.exclusions.is_empty() {
            info!(
                "Filtered out {} of {} discovered name(s)",
                filtered.exclusions.len(),
                names.len()
            );
        }

        filtered
    }
}
