//! Section Assembler
//!
//! Builds the ordered section list handed to the renderer. Two mutually
//! exclusive modes:
//!
//! - **Explicit**: the configured `reference` groups are authoritative; only
//!   excluded or `%nodoc` names are removed from them.
//! - **Automatic**: `%family` groups when any symbol declares one, otherwise
//!   fixed "Classes"/"Functions"/"Other" sections. Classes with more methods
//!   than the threshold are listed with `members: false` and followed by a
//!   dedicated "<Class> Methods" section.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::Config;
use crate::constants::sections::{
    CLASSES_DESC, CLASSES_TITLE, FUNCTIONS_DESC, FUNCTIONS_TITLE, OTHER_DESC, OTHER_TITLE,
};
use crate::directives::DirectiveMap;
use crate::types::{
    ContentRef, ExclusionRecord, SectionDescriptor, SymbolKind, ValidatedMethod, ValidatedSymbol,
};

/// Result of section assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome {
    Sections(Vec<SectionDescriptor>),
    /// Assembly produced no non-empty section
    NoSections,
}

impl SectionOutcome {
    fn from_sections(sections: Vec<SectionDescriptor>) -> Self {
        let sections: Vec<_> = sections.into_iter().filter(|s| !s.is_empty()).collect();
        if sections.is_empty() {
            Self::NoSections
        } else {
            Self::Sections(sections)
        }
    }

    pub fn sections(&self) -> Option<&[SectionDescriptor]> {
        match self {
            Self::Sections(sections) => Some(sections),
            Self::NoSections => None,
        }
    }

    pub fn titles(&self) -> Vec<&str> {
        self.sections()
            .map(|sections| sections.iter().map(|s| s.title.as_str()).collect())
            .unwrap_or_default()
    }
}

/// A symbol that survived `%nodoc`, with its surviving methods
struct Visible<'s> {
    symbol: &'s ValidatedSymbol,
    methods: Vec<&'s ValidatedMethod>,
}

/// One entry of a family section
struct FamilyEntry<'s> {
    name: String,
    order: Option<i64>,
    class: Option<&'s Visible<'s>>,
}

pub struct SectionAssembler<'a> {
    config: &'a Config,
}

impl<'a> SectionAssembler<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn assemble(
        &self,
        symbols: &[ValidatedSymbol],
        exclusions: &[ExclusionRecord],
        directives: &DirectiveMap,
    ) -> SectionOutcome {
        let sections = if self.config.is_explicit() {
            self.explicit(symbols, exclusions, directives)
        } else {
            self.automatic(symbols, directives)
        };

        let outcome = SectionOutcome::from_sections(sections);
        match &outcome {
            SectionOutcome::Sections(sections) => info!("Assembled {} section(s)", sections.len()),
            SectionOutcome::NoSections => info!("Assembly produced no sections"),
        }
        outcome
    }

    // =========================================================================
    // Explicit Mode
    // =========================================================================

    fn explicit(
        &self,
        symbols: &[ValidatedSymbol],
        exclusions: &[ExclusionRecord],
        directives: &DirectiveMap,
    ) -> Vec<SectionDescriptor> {
        let mut hidden: BTreeSet<&str> = exclusions.iter().map(|e| e.name.as_str()).collect();
        hidden.extend(
            symbols
                .iter()
                .filter(|s| directives.is_suppressed(&s.name))
                .map(|s| s.name.as_str()),
        );

        self.config
            .reference
            .iter()
            .map(|group| {
                let contents = group
                    .contents
                    .iter()
                    .filter(|entry| {
                        let keep = !hidden.contains(entry.base_name())
                            && !directives.is_suppressed(entry.name());
                        if !keep {
                            debug!("Dropping '{}' from '{}'", entry.name(), group.title);
                        }
                        keep
                    })
                    .cloned()
                    .collect();
                SectionDescriptor::new(group.title.clone(), group.desc.clone())
                    .with_contents(contents)
            })
            .collect()
    }

    // =========================================================================
    // Automatic Mode
    // =========================================================================

    fn automatic(
        &self,
        symbols: &[ValidatedSymbol],
        directives: &DirectiveMap,
    ) -> Vec<SectionDescriptor> {
        let mut ordered: Vec<&ValidatedSymbol> = symbols.iter().collect();
        ordered.sort_by_key(|s| s.position);

        let visible: Vec<Visible<'_>> = ordered
            .into_iter()
            .filter(|s| !directives.is_suppressed(&s.name))
            .map(|symbol| Visible {
                symbol,
                methods: symbol
                    .methods
                    .iter()
                    .filter(|m| !directives.is_suppressed(&m.qualified(&symbol.name)))
                    .collect(),
            })
            .collect();

        let has_family = visible.iter().any(|v| {
            directives.get(&v.symbol.name).family.is_some()
                || v.methods
                    .iter()
                    .any(|m| directives.get(&m.qualified(&v.symbol.name)).family.is_some())
        });

        if has_family {
            self.family_sections(&visible, directives)
        } else {
            self.category_sections(&visible)
        }
    }

    fn is_large(&self, visible: &Visible<'_>) -> bool {
        visible.symbol.is_class() && visible.methods.len() > self.config.method_threshold
    }

    fn content_ref(&self, visible: &Visible<'_>) -> ContentRef {
        if self.is_large(visible) {
            ContentRef::suppressed(visible.symbol.name.clone())
        } else {
            ContentRef::inline(visible.symbol.name.clone())
        }
    }

    /// Push `section`, then a methods section for every large class in it
    fn push_with_methods(
        &self,
        sections: &mut Vec<SectionDescriptor>,
        section: SectionDescriptor,
        classes: &[&Visible<'_>],
        placed: &BTreeSet<String>,
    ) {
        sections.push(section);

        for class in classes.iter().filter(|c| self.is_large(c)) {
            let name = &class.symbol.name;
            let contents: Vec<ContentRef> = class
                .methods
                .iter()
                .map(|m| m.qualified(name))
                .filter(|qualified| !placed.contains(qualified))
                .map(ContentRef::inline)
                .collect();

            debug!("{}: {} method(s) in dedicated section", name, contents.len());
            sections.push(
                SectionDescriptor::new(
                    format!("{} Methods", name),
                    format!("Methods for the {} class", name),
                )
                .with_contents(contents),
            );
        }
    }

    fn category_sections(&self, visible: &[Visible<'_>]) -> Vec<SectionDescriptor> {
        let by_kind = |kind: SymbolKind| {
            let mut members: Vec<&Visible<'_>> =
                visible.iter().filter(|v| v.symbol.kind == kind).collect();
            members.sort_by(|a, b| {
                a.symbol
                    .name
                    .to_lowercase()
                    .cmp(&b.symbol.name.to_lowercase())
                    .then_with(|| a.symbol.name.cmp(&b.symbol.name))
            });
            members
        };

        let placed = BTreeSet::new();
        let mut sections = Vec::new();

        for (kind, title, desc) in [
            (SymbolKind::Class, CLASSES_TITLE, CLASSES_DESC),
            (SymbolKind::Function, FUNCTIONS_TITLE, FUNCTIONS_DESC),
            (SymbolKind::Other, OTHER_TITLE, OTHER_DESC),
        ] {
            let members = by_kind(kind);
            if members.is_empty() {
                continue;
            }
            let section = SectionDescriptor::new(title, desc)
                .with_contents(members.iter().map(|v| self.content_ref(v)).collect());
            self.push_with_methods(&mut sections, section, &members, &placed);
        }

        sections
    }

    fn family_sections(
        &self,
        visible: &[Visible<'_>],
        directives: &DirectiveMap,
    ) -> Vec<SectionDescriptor> {
        let mut families: Vec<(String, Vec<FamilyEntry<'_>>)> = Vec::new();
        let mut unfamilied: Vec<&Visible<'_>> = Vec::new();
        let mut placed: BTreeSet<String> = BTreeSet::new();

        fn family_of<'f, 's>(
            families: &'f mut Vec<(String, Vec<FamilyEntry<'s>>)>,
            family: &str,
        ) -> &'f mut Vec<FamilyEntry<'s>> {
            let idx = match families.iter().position(|(name, _)| name == family) {
                Some(idx) => idx,
                None => {
                    families.push((family.to_string(), Vec::new()));
                    families.len() - 1
                }
            };
            &mut families[idx].1
        }

        for v in visible {
            let directive = directives.get(&v.symbol.name);
            match &directive.family {
                Some(family) => family_of(&mut families, family).push(FamilyEntry {
                    name: v.symbol.name.clone(),
                    order: directive.order,
                    class: v.symbol.is_class().then_some(v),
                }),
                None => unfamilied.push(v),
            }
        }

        for v in visible {
            for method in &v.methods {
                let qualified = method.qualified(&v.symbol.name);
                let directive = directives.get(&qualified);
                if let Some(family) = &directive.family {
                    family_of(&mut families, family).push(FamilyEntry {
                        name: qualified.clone(),
                        order: directive.order,
                        class: None,
                    });
                    placed.insert(qualified);
                }
            }
        }

        info!("Found {} family group(s)", families.len());

        // Configured family order first, then order of first appearance
        families.sort_by_key(|(name, _)| {
            let order = self.config.family(name).and_then(|f| f.order);
            (order.is_none(), order.unwrap_or_default())
        });

        let mut sections = Vec::new();
        for (family, mut entries) in families {
            entries.sort_by_key(|e| (e.order.is_none(), e.order.unwrap_or_default()));

            let configured = self.config.family(&family);
            let title = configured
                .and_then(|f| f.title.clone())
                .unwrap_or_else(|| family.clone());
            let desc = configured.and_then(|f| f.desc.clone()).unwrap_or_default();

            let contents = entries
                .iter()
                .map(|e| match e.class {
                    Some(class) => self.content_ref(class),
                    None => ContentRef::inline(e.name.clone()),
                })
                .collect();
            let classes: Vec<&Visible<'_>> = entries.iter().filter_map(|e| e.class).collect();

            let section = SectionDescriptor::new(title, desc).with_contents(contents);
            self.push_with_methods(&mut sections, section, &classes, &placed);
        }

        if !unfamilied.is_empty() {
            let section = SectionDescriptor::new(OTHER_TITLE, OTHER_DESC)
                .with_contents(unfamilied.iter().map(|v| self.content_ref(v)).collect());
            let classes: Vec<&Visible<'_>> = unfamilied
                .iter()
                .copied()
                .filter(|v| v.symbol.is_class())
                .collect();
            self.push_with_methods(&mut sections, section, &classes, &placed);
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FamilyConfig;
    use crate::directives::extract_directives;
    use crate::types::{ExclusionReason, SourceOrder};

    fn class(name: &str, position: usize, methods: usize) -> ValidatedSymbol {
        ValidatedSymbol {
            name: name.into(),
            kind: SymbolKind::Class,
            order: SourceOrder::line(1),
            position,
            methods: (0..methods)
                .map(|i| ValidatedMethod {
                    name: format!("m{}", i),
                    order: SourceOrder::line(10 + i as u32),
                    docstring: None,
                })
                .collect(),
            docstring: None,
        }
    }

    fn function(name: &str, position: usize) -> ValidatedSymbol {
        ValidatedSymbol {
            name: name.into(),
            kind: SymbolKind::Function,
            order: SourceOrder::line(1),
            position,
            methods: Vec::new(),
            docstring: None,
        }
    }

    fn other(name: &str, position: usize) -> ValidatedSymbol {
        ValidatedSymbol {
            kind: SymbolKind::Other,
            ..function(name, position)
        }
    }

    fn with_doc(mut symbol: ValidatedSymbol, doc: &str) -> ValidatedSymbol {
        symbol.docstring = Some(doc.into());
        symbol
    }

    fn assemble(config: &Config, symbols: &[ValidatedSymbol]) -> SectionOutcome {
        let directives = DirectiveMap::from_symbols(symbols);
        SectionAssembler::new(config).assemble(symbols, &[], &directives)
    }

    fn names(section: &SectionDescriptor) -> Vec<&str> {
        section.names().collect()
    }

    #[test]
    fn test_threshold_boundary() {
        let config = Config::default();

        let outcome = assemble(&config, &[class("Five", 0, 5)]);
        let sections = outcome.sections().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].contents, vec![ContentRef::inline("Five")]);

        let outcome = assemble(&config, &[class("Six", 0, 6)]);
        assert_eq!(outcome.titles(), vec!["Classes", "Six Methods"]);
        let sections = outcome.sections().unwrap();
        assert_eq!(sections[0].contents, vec![ContentRef::suppressed("Six")]);
        assert_eq!(sections[1].desc, "Methods for the Six class");
        assert_eq!(sections[1].contents.len(), 6);
        assert_eq!(names(&sections[1])[0], "Six.m0");
    }

    #[test]
    fn test_configurable_threshold() {
        let config = Config {
            method_threshold: 2,
            ..Config::default()
        };
        let outcome = assemble(&config, &[class("Small", 0, 3)]);
        assert_eq!(outcome.titles(), vec!["Classes", "Small Methods"]);
    }

    #[test]
    fn test_categories_sorted_alphabetically() {
        let config = Config::default();
        let symbols = [
            function("zeta", 0),
            class("Beta", 1, 0),
            function("alpha", 2),
            other("VERSION_TABLE", 3),
            class("alphaClass", 4, 0),
        ];

        let outcome = assemble(&config, &symbols);
        let sections = outcome.sections().unwrap();

        assert_eq!(outcome.titles(), vec!["Classes", "Functions", "Other"]);
        assert_eq!(names(&sections[0]), vec!["alphaClass", "Beta"]);
        assert_eq!(names(&sections[1]), vec!["alpha", "zeta"]);
        assert_eq!(sections[1].desc, "Public functions");
        assert_eq!(names(&sections[2]), vec!["VERSION_TABLE"]);
    }

    #[test]
    fn test_nodoc_suppresses_symbols_and_methods() {
        let config = Config {
            method_threshold: 1,
            ..Config::default()
        };
        let mut widget = class("Widget", 0, 3);
        widget.methods[1].docstring = Some("%nodoc".into());
        let symbols = [
            widget,
            with_doc(function("hidden", 1), "Internal.\n\n%nodoc"),
            function("shown", 2),
        ];

        let outcome = assemble(&config, &symbols);
        let sections = outcome.sections().unwrap();

        let all: Vec<&str> = sections.iter().flat_map(|s| s.names()).collect();
        assert!(!all.contains(&"hidden"));
        assert!(!all.contains(&"Widget.m1"));
        assert_eq!(names(&sections[1]), vec!["Widget.m0", "Widget.m2"]);
    }

    #[test]
    fn test_all_suppressed_is_no_sections() {
        let config = Config::default();
        let outcome = assemble(&config, &[with_doc(function("gone", 0), "%nodoc")]);
        assert_eq!(outcome, SectionOutcome::NoSections);
        assert_eq!(assemble(&config, &[]), SectionOutcome::NoSections);
    }

    #[test]
    fn test_family_sections_in_first_appearance_order() {
        let config = Config::default();
        let symbols = [
            with_doc(function("send", 0), "%family Networking\n%order 2"),
            function("util", 1),
            with_doc(function("parse", 2), "%family Parsing"),
            with_doc(function("connect", 3), "%family Networking\n%order 1"),
            with_doc(function("listen", 4), "%family Networking"),
        ];

        let outcome = assemble(&config, &symbols);
        let sections = outcome.sections().unwrap();

        assert_eq!(outcome.titles(), vec!["Networking", "Parsing", "Other"]);
        assert_eq!(names(&sections[0]), vec!["connect", "send", "listen"]);
        assert_eq!(sections[2].desc, "Additional exports");
        assert_eq!(names(&sections[2]), vec!["util"]);
    }

    #[test]
    fn test_family_config_titles_and_order() {
        let mut config = Config::default();
        config.families.insert(
            "data-io".into(),
            FamilyConfig {
                title: Some("Reading and Writing".into()),
                desc: Some("File formats".into()),
                order: Some(1),
            },
        );
        let symbols = [
            with_doc(function("fit", 0), "%family Models"),
            with_doc(function("read", 1), "%family Data IO"),
        ];

        let outcome = assemble(&config, &symbols);
        let sections = outcome.sections().unwrap();

        assert_eq!(outcome.titles(), vec!["Reading and Writing", "Models"]);
        assert_eq!(sections[0].desc, "File formats");
        assert_eq!(sections[1].desc, "");
    }

    #[test]
    fn test_family_methods_not_repeated_in_methods_section() {
        let config = Config {
            method_threshold: 2,
            ..Config::default()
        };
        let mut client = class("Client", 0, 3);
        client.methods[0].docstring = Some("%family Networking".into());
        let symbols = [client, with_doc(function("serve", 1), "%family Networking")];

        let outcome = assemble(&config, &symbols);
        let sections = outcome.sections().unwrap();

        assert_eq!(outcome.titles(), vec!["Networking", "Other", "Client Methods"]);
        assert_eq!(names(&sections[0]), vec!["serve", "Client.m0"]);
        assert_eq!(sections[1].contents, vec![ContentRef::suppressed("Client")]);
        assert_eq!(names(&sections[2]), vec!["Client.m1", "Client.m2"]);
    }

    #[test]
    fn test_explicit_mode_is_authoritative() {
        let config = Config {
            reference: vec![
                SectionDescriptor::new("Core", "Main API").with_contents(vec![
                    ContentRef::suppressed("Widget"),
                    ContentRef::inline("Widget.m1"),
                    ContentRef::inline("Unknown"),
                    ContentRef::inline("Dropped"),
                    ContentRef::inline("quiet"),
                ]),
                SectionDescriptor::new("Empty", "").with_contents(vec![ContentRef::inline(
                    "Dropped.thing",
                )]),
            ],
            ..Config::default()
        };
        let mut widget = class("Widget", 0, 8);
        widget.methods[1].docstring = Some("%nodoc".into());
        let symbols = [widget, with_doc(function("quiet", 1), "%nodoc")];
        let exclusions = [crate::types::ExclusionRecord::new(
            "Dropped",
            ExclusionReason::UserExcluded,
        )];
        let directives = DirectiveMap::from_symbols(&symbols);

        let outcome = SectionAssembler::new(&config).assemble(&symbols, &exclusions, &directives);
        let sections = outcome.sections().unwrap();

        assert_eq!(outcome.titles(), vec!["Core"]);
        assert_eq!(
            sections[0].contents,
            vec![ContentRef::suppressed("Widget"), ContentRef::inline("Unknown")]
        );
        for title in ["Classes", "Functions", "Other", "Widget Methods"] {
            assert!(!outcome.titles().contains(&title));
        }
    }

    #[test]
    fn test_directive_order_uses_extracted_values() {
        let directive = extract_directives("%family Networking\n%order 1");
        let mut directives = DirectiveMap::default();
        directives.insert("b", directive);

        let symbols = [function("a", 0), function("b", 1)];
        let config = Config::default();
        let outcome = SectionAssembler::new(&config).assemble(&symbols, &[], &directives);

        assert_eq!(outcome.titles(), vec!["Networking", "Other"]);
    }
}
