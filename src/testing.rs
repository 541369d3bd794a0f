//! In-memory object model for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::loader::{LoadError, LoadResult, LoadedObject, ObjectKind, ObjectLoader, ResolveOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    Cyclic,
    Unresolved,
    BrokenMembers(String),
    /// Members list on the first `allowed` calls, then fails with `type_name`
    MembersFailAfter {
        allowed: u32,
        type_name: String,
        calls: Rc<Cell<u32>>,
    },
}

#[derive(Debug, Clone)]
pub struct MemoryNode {
    pub name: String,
    pub kind: ObjectKind,
    pub lineno: Option<u32>,
    pub docstring: Option<String>,
    pub members: Vec<MemoryNode>,
    pub behavior: Behavior,
}

impl MemoryNode {
    fn new(name: &str, kind: ObjectKind, lineno: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            lineno,
            docstring: None,
            members: Vec::new(),
            behavior: Behavior::Normal,
        }
    }

    pub fn class(name: &str, line: u32) -> Self {
        Self::new(name, ObjectKind::Class, Some(line))
    }

    pub fn function(name: &str, line: u32) -> Self {
        Self::new(name, ObjectKind::Function, Some(line))
    }

    pub fn method(name: &str, line: u32) -> Self {
        Self::new(name, ObjectKind::Method, Some(line))
    }

    pub fn attribute(name: &str, line: u32) -> Self {
        Self::new(name, ObjectKind::Attribute, Some(line))
    }

    pub fn module(name: &str) -> Self {
        Self::new(name, ObjectKind::Module, None)
    }

    pub fn cyclic(name: &str) -> Self {
        Self {
            behavior: Behavior::Cyclic,
            ..Self::new(name, ObjectKind::Attribute, None)
        }
    }

    pub fn unresolved(name: &str) -> Self {
        Self {
            behavior: Behavior::Unresolved,
            ..Self::new(name, ObjectKind::Attribute, None)
        }
    }

    pub fn broken_members(name: &str, type_name: &str) -> Self {
        Self {
            behavior: Behavior::BrokenMembers(type_name.to_string()),
            ..Self::new(name, ObjectKind::Class, None)
        }
    }

    pub fn members_fail_after(name: &str, line: u32, allowed: u32, type_name: &str) -> Self {
        Self {
            behavior: Behavior::MembersFailAfter {
                allowed,
                type_name: type_name.to_string(),
                calls: Rc::new(Cell::new(0)),
            },
            ..Self::class(name, line)
        }
    }

    pub fn with_member(mut self, member: MemoryNode) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.docstring = Some(doc.to_string());
        self
    }

    pub fn without_line(mut self) -> Self {
        self.lineno = None;
        self
    }

    fn error(&self, path: &str) -> Option<LoadError> {
        match &self.behavior {
            Behavior::Normal
            | Behavior::BrokenMembers(_)
            | Behavior::MembersFailAfter { .. } => None,
            Behavior::Cyclic => Some(LoadError::CyclicReference(path.to_string())),
            Behavior::Unresolved => Some(LoadError::UnresolvedReference {
                path: path.to_string(),
                target: format!("external.{}", self.name),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryObject {
    path: String,
    node: MemoryNode,
}

impl LoadedObject for MemoryObject {
    fn path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> LoadResult<ObjectKind> {
        match self.node.error(&self.path) {
            Some(err) => Err(err),
            None => Ok(self.node.kind),
        }
    }

    fn members(&self) -> LoadResult<Vec<(String, Self)>> {
        if let Some(err) = self.node.error(&self.path) {
            return Err(err);
        }
        match &self.node.behavior {
            Behavior::BrokenMembers(type_name) => {
                return Err(LoadError::other(type_name.clone(), "members unavailable"));
            }
            Behavior::MembersFailAfter {
                allowed,
                type_name,
                calls,
            } => {
                calls.set(calls.get() + 1);
                if calls.get() > *allowed {
                    return Err(LoadError::other(type_name.clone(), "members unavailable"));
                }
            }
            _ => {}
        }
        Ok(self
            .node
            .members
            .iter()
            .map(|m| {
                (
                    m.name.clone(),
                    MemoryObject {
                        path: format!("{}.{}", self.path, m.name),
                        node: m.clone(),
                    },
                )
            })
            .collect())
    }

    fn lineno(&self) -> Option<u32> {
        self.node.lineno
    }

    fn docstring(&self) -> LoadResult<Option<String>> {
        match self.node.error(&self.path) {
            Some(err) => Err(err),
            None => Ok(self.node.docstring.clone()),
        }
    }
}

pub struct MemoryLoader {
    root: MemoryNode,
    load_error: Option<LoadError>,
    resolved: RefCell<Vec<String>>,
}

impl MemoryLoader {
    pub fn new(package: &str) -> Self {
        Self {
            root: MemoryNode::module(package),
            load_error: None,
            resolved: RefCell::new(Vec::new()),
        }
    }

    pub fn with(mut self, node: MemoryNode) -> Self {
        self.root.members.push(node);
        self
    }

    pub fn failing(mut self, err: LoadError) -> Self {
        self.load_error = Some(err);
        self
    }

    pub fn resolved_paths(&self) -> Vec<String> {
        self.resolved.borrow().clone()
    }
}

impl ObjectLoader for MemoryLoader {
    type Object = MemoryObject;

    fn load(&self, package: &str) -> LoadResult<MemoryObject> {
        if let Some(err) = &self.load_error {
            return Err(err.clone());
        }
        if package != self.root.name {
            return Err(LoadError::NotFound(package.to_string()));
        }
        Ok(MemoryObject {
            path: package.to_string(),
            node: self.root.clone(),
        })
    }

    fn resolve(&self, qualified: &str, _options: &ResolveOptions) -> LoadResult<MemoryObject> {
        self.resolved.borrow_mut().push(qualified.to_string());

        let (package, dotted) = qualified
            .split_once(':')
            .ok_or_else(|| LoadError::NotFound(qualified.to_string()))?;
        let mut current = self.load(package)?;

        for segment in dotted.split('.') {
            let next = current
                .members()?
                .into_iter()
                .find(|(name, _)| name == segment)
                .map(|(_, obj)| obj);
            current = next.ok_or_else(|| LoadError::NotFound(qualified.to_string()))?;
        }
        Ok(current)
    }

    fn runtime_module(&self, package: &str, name: &str) -> Option<bool> {
        if package != self.root.name {
            return None;
        }
        self.root
            .members
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.kind == ObjectKind::Module)
    }
}
