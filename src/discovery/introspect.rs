//! Introspective strategy
//!
//! Asks the object-model loader for the package's direct members and keeps
//! the public ones.

use tracing::{info, warn};

use crate::constants::discovery::INTERNAL_PREFIX;
use crate::loader::{LoadedObject, ObjectLoader, SymbolAdapter};

/// Public member names of the package, or `None` when the package or its
/// members cannot be loaded.
pub fn introspect_exports<L: ObjectLoader>(adapter: &SymbolAdapter<'_, L>) -> Option<Vec<String>> {
    let package = match adapter.load_package() {
        Ok(package) => package,
        Err(e) => {
            warn!(
                "Could not load package '{}' ({})",
                adapter.package(),
                e.failure_kind()
            );
            return None;
        }
    };

    let members = match package.members() {
        Ok(members) => members,
        Err(e) => {
            warn!(
                "Could not list members of '{}' ({})",
                adapter.package(),
                e.failure_kind()
            );
            return None;
        }
    };

    let mut public: Vec<String> = Vec::new();
    for (name, _) in members {
        if !name.starts_with(INTERNAL_PREFIX) && !public.contains(&name) {
            public.push(name);
        }
    }

    if public.is_empty() {
        return None;
    }
    info!("Discovered {} public name(s)", public.len());
    Some(public)
}
