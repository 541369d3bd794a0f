//! Declared-list strategy
//!
//! Reads the package's `__all__` from the entry-module text without running
//! it. Only plain string literals count; anything computed is ignored.
//! Internal names listed there are dropped just like introspected ones.

use tracing::{debug, info};

use crate::analyzer::parser::PythonParser;
use crate::constants::discovery::{INTERNAL_PREFIX, LEGACY_EXCLUDE_VAR, PUBLIC_NAMES_VAR};
use crate::types::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredExports {
    /// Public names from the last `__all__` assignment, first occurrence kept
    pub public: Vec<String>,
    /// Names from every legacy in-module exclude list
    pub legacy_exclude: Vec<String>,
}

/// Parse the declared public names out of `source`.
///
/// `Ok(None)` is a genuine absence: no `__all__` assignment, or one whose
/// literal holds no usable string.
pub fn parse_declared(parser: &PythonParser, path: &str, source: &str) -> Result<Option<DeclaredExports>> {
    let syntax = parser.parse(path, source)?;

    let Some(declared) = syntax
        .sequence_assignments
        .iter()
        .rev()
        .find(|a| a.target == PUBLIC_NAMES_VAR)
    else {
        debug!("No {} assignment in {}", PUBLIC_NAMES_VAR, path);
        return Ok(None);
    };

    let mut public: Vec<String> = Vec::with_capacity(declared.strings.len());
    for name in &declared.strings {
        if name.starts_with(INTERNAL_PREFIX) {
            debug!("Dropping internal name '{}' from {}", name, PUBLIC_NAMES_VAR);
            continue;
        }
        if !public.contains(name) {
            public.push(name.clone());
        }
    }
    if public.is_empty() {
        debug!(
            "{} at line {} holds no public string literals",
            PUBLIC_NAMES_VAR, declared.line
        );
        return Ok(None);
    }

    let legacy_exclude: Vec<String> = syntax
        .sequence_assignments
        .iter()
        .filter(|a| a.target == LEGACY_EXCLUDE_VAR)
        .flat_map(|a| a.strings.iter().cloned())
        .collect();

    info!(
        "Parsed {} with {} export(s) from {}",
        PUBLIC_NAMES_VAR,
        public.len(),
        path
    );

    Ok(Some(DeclaredExports {
        public,
        legacy_exclude,
    }))
}
