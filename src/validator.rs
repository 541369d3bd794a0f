//! Trial Validator
//!
//! Re-resolves every candidate exactly the way the renderer will. Anything
//! that fails here would fail rendering, so it becomes an exclusion record
//! instead of a section entry.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::loader::{ObjectLoader, Resolved, SymbolAdapter};
use crate::types::{CandidateSymbol, ExclusionReason, ExclusionRecord, FailureKind};

/// A candidate that survived trial resolution
pub struct Validated<O> {
    pub candidate: CandidateSymbol,
    pub resolved: Resolved<O>,
}

pub struct Validation<O> {
    /// Survivors, in discovery order
    pub accepted: Vec<Validated<O>>,
    pub exclusions: Vec<ExclusionRecord>,
    /// Candidates rejected because of a cyclic alias
    pub cyclic_aliases: usize,
}

pub struct TrialValidator<'a, L: ObjectLoader> {
    adapter: &'a SymbolAdapter<'a, L>,
}

impl<'a, L: ObjectLoader> TrialValidator<'a, L> {
    pub fn new(adapter: &'a SymbolAdapter<'a, L>) -> Self {
        Self { adapter }
    }

    pub fn validate(&self, candidates: Vec<CandidateSymbol>) -> Validation<L::Object> {
        let mut accepted = Vec::with_capacity(candidates.len());
        let mut exclusions = Vec::new();
        let mut cyclic_aliases = 0;
        let mut submodules: Vec<String> = Vec::new();
        let mut failures: BTreeMap<FailureKind, Vec<String>> = BTreeMap::new();

        for candidate in candidates {
            if self.adapter.runtime_module(&candidate.name) == Some(true) {
                submodules.push(candidate.name.clone());
                exclusions.push(ExclusionRecord::new(
                    candidate.name,
                    ExclusionReason::Submodule,
                ));
                continue;
            }

            match self.adapter.trial(&candidate.name) {
                Ok(resolved) => accepted.push(Validated {
                    candidate,
                    resolved,
                }),
                Err(e) => {
                    if e.is_cyclic() {
                        cyclic_aliases += 1;
                    }
                    let kind = e.failure_kind();
                    failures
                        .entry(kind.clone())
                        .or_default()
                        .push(candidate.name.clone());
                    exclusions.push(ExclusionRecord::validation_failed(candidate.name, kind));
                }
            }
        }

        if !submodules.is_empty() {
            info!(
                "Excluded {} submodule(s): {}",
                submodules.len(),
                submodules.join(", ")
            );
        }
        for (kind, names) in &failures {
            warn!(
                "Excluded {} item(s) that failed to resolve ({}): {}",
                names.len(),
                kind,
                names.join(", ")
            );
        }
        info!(
            "{} of {} candidate(s) passed trial resolution",
            accepted.len(),
            accepted.len() + exclusions.len()
        );

        Validation {
            accepted,
            exclusions,
            cyclic_aliases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ObjectKind;
    use crate::testing::{MemoryLoader, MemoryNode};
    use crate::types::PackageHandle;

    fn candidates(names: &[&str]) -> Vec<CandidateSymbol> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| CandidateSymbol::new(*n, i))
            .collect()
    }

    #[test]
    fn test_classifies_every_failure() {
        let loader = MemoryLoader::new("pkg")
            .with(MemoryNode::class("Widget", 1))
            .with(MemoryNode::module("codecs"))
            .with(MemoryNode::cyclic("Loop"))
            .with(MemoryNode::unresolved("ndarray"))
            .with(MemoryNode::broken_members("RustThing", "KeyError"));
        let handle = PackageHandle::new("pkg");
        let adapter = SymbolAdapter::new(&loader, &handle);

        let validation = TrialValidator::new(&adapter).validate(candidates(&[
            "Widget", "codecs", "Loop", "ndarray", "RustThing", "Ghost",
        ]));

        let accepted: Vec<_> = validation
            .accepted
            .iter()
            .map(|v| (v.candidate.name.as_str(), v.resolved.kind))
            .collect();
        assert_eq!(accepted, vec![("Widget", ObjectKind::Class)]);
        assert_eq!(validation.cyclic_aliases, 1);

        let records: Vec<_> = validation
            .exclusions
            .iter()
            .map(|e| (e.name.as_str(), e.reason, e.failure_kind.clone()))
            .collect();
        assert_eq!(
            records,
            vec![
                ("codecs", ExclusionReason::Submodule, None),
                ("Loop", ExclusionReason::ValidationFailed, Some(FailureKind::CyclicAlias)),
                (
                    "ndarray",
                    ExclusionReason::ValidationFailed,
                    Some(FailureKind::UnresolvableAlias)
                ),
                (
                    "RustThing",
                    ExclusionReason::ValidationFailed,
                    Some(FailureKind::Other("KeyError".into()))
                ),
                ("Ghost", ExclusionReason::ValidationFailed, Some(FailureKind::NotFound)),
            ]
        );
    }

    #[test]
    fn test_resolves_with_qualified_names() {
        let loader = MemoryLoader::new("pkg").with(MemoryNode::function("make", 4));
        let handle = PackageHandle::new("pkg");
        let adapter = SymbolAdapter::new(&loader, &handle);

        let validation = TrialValidator::new(&adapter).validate(candidates(&["make"]));

        assert_eq!(validation.accepted.len(), 1);
        assert!(validation.exclusions.is_empty());
        assert_eq!(loader.resolved_paths(), vec!["pkg:make"]);
    }
}
