//! Section descriptors handed to the reference renderer.
//!
//! Wire shape (YAML or JSON):
//!
//! ```yaml
//! - title: Classes
//!   desc: Core classes and types
//!   contents:
//!     - SmallClass
//!     - name: Widget
//!       members: false
//! ```

use serde::{Deserialize, Serialize};

/// One entry in a section's contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawContentRef", into = "RawContentRef")]
pub enum ContentRef {
    /// Documented inline, members included
    Inline(String),
    /// Documented without the inline member listing
    MembersSuppressed(String),
}

impl ContentRef {
    pub fn inline(name: impl Into<String>) -> Self {
        Self::Inline(name.into())
    }

    pub fn suppressed(name: impl Into<String>) -> Self {
        Self::MembersSuppressed(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Inline(name) | Self::MembersSuppressed(name) => name,
        }
    }

    /// Name of the top-level symbol this entry refers to (`Widget` for
    /// `Widget.run`)
    pub fn base_name(&self) -> &str {
        let name = self.name();
        name.split_once('.').map_or(name, |(base, _)| base)
    }

    pub fn members_suppressed(&self) -> bool {
        matches!(self, Self::MembersSuppressed(_))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawContentRef {
    Name(String),
    Entry {
        name: String,
        #[serde(default = "default_members")]
        members: RawMembers,
    },
}

/// `members: false` or `members: []` both hide the member listing
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawMembers {
    Flag(bool),
    Listed(Vec<String>),
}

impl RawMembers {
    fn shown(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Listed(names) => !names.is_empty(),
        }
    }
}

fn default_members() -> RawMembers {
    RawMembers::Flag(true)
}

impl From<RawContentRef> for ContentRef {
    fn from(raw: RawContentRef) -> Self {
        match raw {
            RawContentRef::Name(name) => Self::Inline(name),
            RawContentRef::Entry { name, members } if members.shown() => Self::Inline(name),
            RawContentRef::Entry { name, .. } => Self::MembersSuppressed(name),
        }
    }
}

impl From<ContentRef> for RawContentRef {
    fn from(content: ContentRef) -> Self {
        match content {
            ContentRef::Inline(name) => Self::Name(name),
            ContentRef::MembersSuppressed(name) => Self::Entry {
                name,
                members: RawMembers::Flag(false),
            },
        }
    }
}

/// A titled, ordered group of reference entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub contents: Vec<ContentRef>,
}

impl SectionDescriptor {
    pub fn new(title: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            desc: desc.into(),
            contents: Vec::new(),
        }
    }

    pub fn with_contents(mut self, contents: Vec<ContentRef>) -> Self {
        self.contents = contents;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().map(ContentRef::name)
    }
}
