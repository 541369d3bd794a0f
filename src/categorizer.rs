//! Categorizer
//!
//! Turns validated candidates into [`ValidatedSymbol`]s: a kind, a source
//! position, and for classes the public methods that survive their own trial
//! resolution as `Class.method`, in source order.

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::discovery::INTERNAL_PREFIX;
use crate::loader::{LoadedObject, ObjectKind, ObjectLoader, SymbolAdapter};
use crate::types::{FailureKind, SourceOrder, SymbolKind, ValidatedMethod, ValidatedSymbol};
use crate::validator::Validated;

/// A class member that looked like a method but could not be documented
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMethod {
    pub class: String,
    pub method: String,
    pub failure_kind: FailureKind,
}

#[derive(Debug, Clone, Default)]
pub struct Categorized {
    /// In discovery order
    pub symbols: Vec<ValidatedSymbol>,
    pub skipped_methods: Vec<SkippedMethod>,
}

pub struct Categorizer<'a, L: ObjectLoader> {
    adapter: &'a SymbolAdapter<'a, L>,
}

impl<'a, L: ObjectLoader> Categorizer<'a, L> {
    pub fn new(adapter: &'a SymbolAdapter<'a, L>) -> Self {
        Self { adapter }
    }

    pub fn categorize(&self, validated: Vec<Validated<L::Object>>) -> Categorized {
        let mut categorized = Categorized::default();

        for Validated {
            candidate,
            resolved,
        } in validated
        {
            let kind = symbol_kind(resolved.kind);
            let methods = if kind == SymbolKind::Class {
                self.methods(&candidate.name, &resolved.object, &mut categorized.skipped_methods)
            } else {
                Vec::new()
            };

            categorized.symbols.push(ValidatedSymbol {
                name: candidate.name,
                kind,
                order: SourceOrder::from_lineno(resolved.object.lineno()),
                position: candidate.position,
                methods,
                docstring: resolved.object.docstring().ok().flatten(),
            });
        }

        let classes = categorized.symbols.iter().filter(|s| s.is_class()).count();
        info!(
            "Categorized {} symbol(s): {} class(es), {} skipped method(s)",
            categorized.symbols.len(),
            classes,
            categorized.skipped_methods.len()
        );
        categorized
    }

    fn methods(
        &self,
        class: &str,
        object: &L::Object,
        skipped: &mut Vec<SkippedMethod>,
    ) -> Vec<ValidatedMethod> {
        let members = match object.members() {
            Ok(members) => members,
            Err(e) => {
                debug!("{}: members unavailable ({})", class, e.failure_kind());
                return Vec::new();
            }
        };

        let mut methods = Vec::new();
        let mut failed: Vec<String> = Vec::new();

        for (name, member) in members {
            if name.starts_with(INTERNAL_PREFIX) {
                continue;
            }

            let outcome = member.kind().and_then(|kind| {
                if kind.is_function_like() {
                    self.adapter.trial(&format!("{}.{}", class, name)).map(Some)
                } else {
                    Ok(None)
                }
            });

            match outcome {
                Ok(Some(resolved)) => methods.push(ValidatedMethod {
                    name,
                    order: SourceOrder::from_lineno(member.lineno()),
                    docstring: resolved.object.docstring().ok().flatten(),
                }),
                Ok(None) => {}
                Err(e) => {
                    failed.push(name.clone());
                    skipped.push(SkippedMethod {
                        class: class.to_string(),
                        method: name,
                        failure_kind: e.failure_kind(),
                    });
                }
            }
        }

        // Stable: equal or unknown positions keep member order
        methods.sort_by_key(|m| m.order);

        if failed.is_empty() {
            debug!("{}: class with {} public method(s)", class, methods.len());
        } else {
            info!(
                "{}: class with {} public method(s) (skipped {} undocumentable: {}{})",
                class,
                methods.len(),
                failed.len(),
                failed.iter().take(3).cloned().collect::<Vec<_>>().join(", "),
                if failed.len() > 3 { "..." } else { "" }
            );
        }
        methods
    }
}

fn symbol_kind(kind: ObjectKind) -> SymbolKind {
    match kind {
        ObjectKind::Class => SymbolKind::Class,
        ObjectKind::Function | ObjectKind::Method => SymbolKind::Function,
        ObjectKind::Module | ObjectKind::Attribute => SymbolKind::Other,
    }
}
