//! Symbol Loader Adapter
//!
//! Every trial resolution in the pipeline goes through here, using the same
//! qualified form and [`RENDERER_OPTIONS`] the renderer uses.

use tracing::debug;

use super::{LoadResult, LoadedObject, ObjectKind, ObjectLoader, RENDERER_OPTIONS};
use crate::types::PackageHandle;

/// A successfully trial-resolved object with its kind already forced
pub struct Resolved<O> {
    pub object: O,
    pub kind: ObjectKind,
}

pub struct SymbolAdapter<'a, L: ObjectLoader> {
    loader: &'a L,
    package: &'a PackageHandle,
}

impl<'a, L: ObjectLoader> SymbolAdapter<'a, L> {
    pub fn new(loader: &'a L, package: &'a PackageHandle) -> Self {
        Self { loader, package }
    }

    pub fn package(&self) -> &PackageHandle {
        self.package
    }

    pub fn load_package(&self) -> LoadResult<L::Object> {
        self.loader.load(self.package.as_str())
    }

    /// Resolve `dotted` (e.g. `Widget` or `Widget.run`) without forcing it
    pub fn resolve(&self, dotted: &str) -> LoadResult<L::Object> {
        self.loader
            .resolve(&self.package.qualify(dotted), &RENDERER_OPTIONS)
    }

    /// Resolve `dotted` and force its member collection and kind, the two
    /// accessors the renderer reads first.
    pub fn trial(&self, dotted: &str) -> LoadResult<Resolved<L::Object>> {
        let object = self.resolve(dotted)?;
        let member_count = object.members()?.len();
        let kind = object.kind()?;
        debug!(
            "Trial resolved {} as {} ({} members)",
            dotted, kind, member_count
        );
        Ok(Resolved { object, kind })
    }

    pub fn runtime_module(&self, name: &str) -> Option<bool> {
        self.loader.runtime_module(self.package.as_str(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadError;
    use crate::testing::{MemoryLoader, MemoryNode};

    fn loader() -> MemoryLoader {
        MemoryLoader::new("pkg")
            .with(
                MemoryNode::class("Widget", 3)
                    .with_member(MemoryNode::function("run", 5))
                    .with_member(MemoryNode::function("stop", 8)),
            )
            .with(MemoryNode::function("make", 12))
            .with(MemoryNode::cyclic("Loop"))
            .with(MemoryNode::broken_members("Fragile", "KeyError"))
    }

    #[test]
    fn test_trial_forces_kind() {
        let loader = loader();
        let handle = PackageHandle::new("pkg");
        let adapter = SymbolAdapter::new(&loader, &handle);

        let resolved = adapter.trial("Widget").ok().unwrap();
        assert_eq!(resolved.kind, ObjectKind::Class);

        let method = adapter.trial("Widget.run").ok().unwrap();
        assert!(method.kind.is_function_like());
    }

    #[test]
    fn test_trial_failures_are_classified() {
        let loader = loader();
        let handle = PackageHandle::new("pkg");
        let adapter = SymbolAdapter::new(&loader, &handle);

        assert!(matches!(
            adapter.trial("Missing").err(),
            Some(LoadError::NotFound(_))
        ));
        assert!(matches!(
            adapter.trial("Loop").err(),
            Some(LoadError::CyclicReference(_))
        ));
        assert!(matches!(
            adapter.trial("Fragile").err(),
            Some(LoadError::Other { ref type_name, .. }) if type_name == "KeyError"
        ));
    }

    #[test]
    fn test_trial_uses_qualified_path() {
        let loader = loader();
        let handle = PackageHandle::new("pkg");
        let adapter = SymbolAdapter::new(&loader, &handle);

        adapter.trial("make").ok().unwrap();
        assert_eq!(loader.resolved_paths(), vec!["pkg:make".to_string()]);
    }
}
