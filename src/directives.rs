//! Directive Extractor
//!
//! Docstrings carry organizational markers on lines of their own:
//!
//! ```text
//! Encode a frame.
//!
//! %family Codecs
//! %order 2
//! %seealso decode, Frame
//! ```
//!
//! `%nodoc` suppresses a symbol entirely. Unknown directive names are
//! ignored so newer markers never break older readers.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::directives::MARKER;
use crate::types::ValidatedSymbol;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Directive {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seealso: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nodoc: bool,
}

static NO_DIRECTIVES: Directive = Directive {
    family: None,
    order: None,
    seealso: Vec::new(),
    nodoc: false,
};

impl Directive {
    pub fn is_default(&self) -> bool {
        self == &NO_DIRECTIVES
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveName {
    Family,
    Order,
    SeeAlso,
    NoDoc,
}

impl DirectiveName {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "family" => Some(Self::Family),
            "order" => Some(Self::Order),
            "seealso" => Some(Self::SeeAlso),
            "nodoc" => Some(Self::NoDoc),
            _ => None,
        }
    }
}

/// Split a directive line into its name and (trimmed) argument
fn directive_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix(MARKER)?;
    let (name, argument) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    (!name.is_empty()).then(|| (name, argument.trim()))
}

/// Scan `text` for directive lines.
///
/// Later `%family`/`%order` lines override earlier ones; `%seealso` lines
/// accumulate. A malformed `%order` is ignored.
pub fn extract_directives(text: &str) -> Directive {
    let mut directive = Directive::default();

    for (name, argument) in text.lines().filter_map(directive_line) {
        match DirectiveName::parse(name) {
            Some(DirectiveName::Family) if !argument.is_empty() => {
                directive.family = Some(argument.to_string());
            }
            Some(DirectiveName::Order) => {
                if let Ok(order) = argument.parse::<i64>() {
                    directive.order = Some(order);
                }
            }
            Some(DirectiveName::SeeAlso) => directive.seealso.extend(
                argument
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from),
            ),
            Some(DirectiveName::NoDoc) => directive.nodoc = true,
            Some(DirectiveName::Family) | None => {}
        }
    }

    directive
}

/// `text` without its recognized directive lines, for display
pub fn strip_directives(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| {
            directive_line(line).is_none_or(|(name, _)| DirectiveName::parse(name).is_none())
        })
        .collect();

    let end = kept
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |idx| idx + 1);
    kept[..end].join("\n")
}

/// First non-blank line of a docstring once its directives are removed
pub fn summary_line(docstring: &str) -> Option<String> {
    strip_directives(docstring)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from)
}

/// Directives of every validated symbol and method, keyed by `Name` or
/// `Class.method`. Symbols without any marker are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DirectiveMap(BTreeMap<String, Directive>);

impl DirectiveMap {
    pub fn from_symbols(symbols: &[ValidatedSymbol]) -> Self {
        let mut map = BTreeMap::new();
        let mut insert = |key: String, docstring: Option<&str>| {
            let directive = docstring.map(extract_directives).unwrap_or_default();
            if !directive.is_default() {
                map.insert(key, directive);
            }
        };

        for symbol in symbols {
            insert(symbol.name.clone(), symbol.docstring.as_deref());
            for method in &symbol.methods {
                insert(method.qualified(&symbol.name), method.docstring.as_deref());
            }
        }
        Self(map)
    }

    /// Directive for `name`; all-default when none was found
    pub fn get(&self, name: &str) -> &Directive {
        self.0.get(name).unwrap_or(&NO_DIRECTIVES)
    }

    pub fn insert(&mut self, name: impl Into<String>, directive: Directive) {
        self.0.insert(name.into(), directive);
    }

    pub fn is_suppressed(&self, name: &str) -> bool {
        self.get(name).nodoc
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Directive)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
