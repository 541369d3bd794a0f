//! Resolution Pipeline
//!
//! Runs the stages in order, each exactly once:
//!
//! ```text
//! Discovery → Trial Validator → Categorizer → Directives → Section Assembler
//! ```
//!
//! Only discovery absence is fatal. Everything that goes wrong for a single
//! symbol ends up in the [`DiagnosticReport`].

use tracing::info;

use crate::categorizer::Categorizer;
use crate::config::Config;
use crate::directives::DirectiveMap;
use crate::discovery::ExportDiscovery;
use crate::loader::{ObjectLoader, SymbolAdapter};
use crate::report::DiagnosticReport;
use crate::sections::{SectionAssembler, SectionOutcome};
use crate::types::{PackageHandle, Result, ValidatedSymbol};
use crate::validator::TrialValidator;

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct Resolution {
    pub outcome: SectionOutcome,
    /// Surviving symbols after `%nodoc`, in discovery order
    pub symbols: Vec<ValidatedSymbol>,
    pub directives: DirectiveMap,
    pub report: DiagnosticReport,
}

pub struct ResolutionPipeline<'a, L: ObjectLoader> {
    loader: &'a L,
    package: &'a PackageHandle,
    config: &'a Config,
}

impl<'a, L: ObjectLoader> ResolutionPipeline<'a, L> {
    pub fn new(loader: &'a L, package: &'a PackageHandle, config: &'a Config) -> Self {
        Self {
            loader,
            package,
            config,
        }
    }

    /// Resolve the package. `source` is the entry-module text used by the
    /// declared-list strategy.
    pub fn run(&self, source: Option<&str>) -> Result<Resolution> {
        let adapter = SymbolAdapter::new(self.loader, self.package);

        let discovery = ExportDiscovery::new(&adapter, self.config).discover(source)?;
        let candidate_count = discovery.candidates.len();

        let validation = TrialValidator::new(&adapter).validate(discovery.candidates);
        let categorized = Categorizer::new(&adapter).categorize(validation.accepted);
        let directives = DirectiveMap::from_symbols(&categorized.symbols);

        let mut report = DiagnosticReport::new(self.package.as_str(), discovery.strategy);
        report.record_exclusions(&discovery.exclusions);
        report.record_exclusions(&validation.exclusions);
        report.set_cyclic_aliases(validation.cyclic_aliases);
        report.skipped_methods = categorized.skipped_methods;

        let mut exclusions = discovery.exclusions;
        exclusions.extend(validation.exclusions);

        let mut symbols = categorized.symbols;
        for symbol in &mut symbols {
            let class = symbol.name.clone();
            symbol.methods.retain(|m| {
                let qualified = m.qualified(&class);
                let keep = !directives.is_suppressed(&qualified);
                if !keep {
                    report.suppressed.push(qualified);
                }
                keep
            });
        }
        symbols.retain(|s| {
            let keep = !directives.is_suppressed(&s.name);
            if !keep {
                report.suppressed.push(s.name.clone());
            }
            keep
        });
        report.included = symbols.iter().map(|s| s.name.clone()).collect();

        let outcome = SectionAssembler::new(self.config).assemble(&symbols, &exclusions, &directives);

        info!(
            "Resolved {}: {} of {} candidate(s) documented",
            self.package,
            symbols.len(),
            candidate_count
        );

        Ok(Resolution {
            outcome,
            symbols,
            directives,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryLoader, MemoryNode};
    use crate::types::{ContentRef, DocsiftError, ExclusionReason, SectionDescriptor};
    use proptest::prelude::*;

    fn widget_loader() -> MemoryLoader {
        let mut widget = MemoryNode::class("Widget", 1);
        for (i, name) in ["start", "stop", "pause", "resume", "reset", "render", "close"]
            .iter()
            .enumerate()
        {
            widget = widget.with_member(MemoryNode::method(name, 10 + i as u32 * 5));
        }
        MemoryLoader::new("pkg")
            .with(widget)
            .with(MemoryNode::function("make", 60))
            .with(MemoryNode::function("_helper", 70))
    }

    const WIDGET_SOURCE: &str = "__all__ = [\"Widget\", \"make\", \"_helper\"]\n";

    fn run(loader: &MemoryLoader, config: &Config, source: Option<&str>) -> Resolution {
        let handle = PackageHandle::new("pkg");
        ResolutionPipeline::new(loader, &handle, config)
            .run(source)
            .unwrap()
    }

    #[test]
    fn test_widget_scenario() {
        let loader = widget_loader();
        let config = Config::default();

        let resolution = run(&loader, &config, Some(WIDGET_SOURCE));
        let sections = resolution.outcome.sections().unwrap();

        assert_eq!(
            resolution.outcome.titles(),
            vec!["Classes", "Widget Methods", "Functions"]
        );
        assert_eq!(sections[0].contents, vec![ContentRef::suppressed("Widget")]);
        assert_eq!(
            sections[1].names().collect::<Vec<_>>(),
            vec![
                "Widget.start",
                "Widget.stop",
                "Widget.pause",
                "Widget.resume",
                "Widget.reset",
                "Widget.render",
                "Widget.close",
            ]
        );
        assert!(
            sections
                .iter()
                .flat_map(|s| s.names())
                .all(|name| !name.contains("_helper"))
        );
    }

    #[test]
    fn test_networking_scenario() {
        let loader = MemoryLoader::new("pkg")
            .with(MemoryNode::function("connect", 1).with_doc("Open.\n\n%family Networking"))
            .with(MemoryNode::function("parse", 5))
            .with(MemoryNode::function("send", 9).with_doc("Send.\n\n%family Networking"));
        let config = Config::default();

        let resolution = run(&loader, &config, None);
        let sections = resolution.outcome.sections().unwrap();

        assert_eq!(resolution.outcome.titles(), vec!["Networking", "Other"]);
        assert_eq!(
            sections[0].names().collect::<Vec<_>>(),
            vec!["connect", "send"]
        );
        assert_eq!(sections[1].names().collect::<Vec<_>>(), vec!["parse"]);
    }

    #[test]
    fn test_idempotent_output() {
        let loader = widget_loader();
        let config = Config::default();

        let first = run(&loader, &config, Some(WIDGET_SOURCE));
        let second = run(&loader, &config, Some(WIDGET_SOURCE));

        let render = |r: &Resolution| serde_yaml::to_string(&r.outcome.sections().unwrap()).unwrap();
        assert_eq!(render(&first), render(&second));
        assert_eq!(first.report, second.report);
    }

    #[test]
    fn test_nodoc_removed_from_surviving_set() {
        let loader = MemoryLoader::new("pkg")
            .with(MemoryNode::function("public", 1))
            .with(MemoryNode::function("secret", 3).with_doc("%nodoc"));
        let config = Config::default();

        let resolution = run(&loader, &config, None);

        assert_eq!(resolution.report.included, vec!["public"]);
        assert_eq!(resolution.report.suppressed, vec!["secret"]);
        assert!(resolution.symbols.iter().all(|s| s.name != "secret"));
    }

    #[test]
    fn test_explicit_reference_skips_automatic_grouping() {
        let loader = widget_loader();
        let config = Config {
            reference: vec![
                SectionDescriptor::new("API", "Everything")
                    .with_contents(vec![ContentRef::inline("make"), ContentRef::inline("Widget")]),
            ],
            ..Config::default()
        };

        let resolution = run(&loader, &config, Some(WIDGET_SOURCE));
        assert_eq!(resolution.outcome.titles(), vec!["API"]);
        assert_eq!(
            resolution.outcome.sections().unwrap()[0].contents,
            vec![ContentRef::inline("make"), ContentRef::inline("Widget")]
        );
    }

    #[test]
    fn test_exclusion_priority_in_report() {
        let loader = MemoryLoader::new("pkg")
            .with(MemoryNode::function("main", 1))
            .with(MemoryNode::function("run", 2));
        let config = Config {
            exclude: vec!["main".into()],
            ..Config::default()
        };

        let resolution = run(&loader, &config, None);
        assert_eq!(
            resolution.report.excluded.get(&ExclusionReason::AutoExcluded),
            Some(&vec!["main".to_string()])
        );
        assert!(
            !resolution
                .report
                .excluded
                .contains_key(&ExclusionReason::UserExcluded)
        );
    }

    #[test]
    fn test_discovery_absence_propagates() {
        let loader = MemoryLoader::new("pkg").failing(crate::loader::LoadError::other(
            "ImportError",
            "broken",
        ));
        let handle = PackageHandle::new("pkg");
        let config = Config::default();

        let err = ResolutionPipeline::new(&loader, &handle, &config)
            .run(None)
            .unwrap_err();
        assert!(matches!(err, DocsiftError::DiscoveryAbsent { .. }));
    }

    fn node_strategy() -> impl Strategy<Value = MemoryNode> {
        (0usize..5, "[A-Za-z][a-z0-9]{0,6}").prop_map(|(variant, name)| match variant {
            0 => MemoryNode::class(&name, 1),
            1 => MemoryNode::function(&name, 2),
            2 => MemoryNode::cyclic(&name),
            3 => MemoryNode::unresolved(&name),
            _ => MemoryNode::module(&name),
        })
    }

    proptest! {
        #[test]
        fn prop_every_candidate_accounted_for(
            nodes in proptest::collection::vec(node_strategy(), 0..12),
            ghosts in proptest::collection::vec("[A-Z][a-z]{1,5}", 0..4),
        ) {
            let mut loader = MemoryLoader::new("pkg");
            let mut declared: Vec<String> = Vec::new();
            for node in nodes {
                if !declared.contains(&node.name) {
                    declared.push(node.name.clone());
                    loader = loader.with(node);
                }
            }
            declared.extend(ghosts);

            let handle = PackageHandle::new("pkg");
            let config = Config::default();
            let adapter = SymbolAdapter::new(&loader, &handle);

            let source = format!(
                "__all__ = [{}]\n",
                declared.iter().map(|n| format!("\"{}\"", n)).collect::<Vec<_>>().join(", ")
            );
            let discovery = match ExportDiscovery::new(&adapter, &config).discover(Some(&source)) {
                Ok(discovery) => discovery,
                Err(_) => return Ok(()),
            };

            let candidates = discovery.candidates.len();
            let validation = TrialValidator::new(&adapter).validate(discovery.candidates);

            prop_assert_eq!(
                candidates,
                validation.accepted.len() + validation.exclusions.len()
            );
            let mut seen: Vec<&str> = validation
                .accepted
                .iter()
                .map(|v| v.candidate.name.as_str())
                .chain(validation.exclusions.iter().map(|e| e.name.as_str()))
                .collect();
            seen.sort_unstable();
            let before = seen.len();
            seen.dedup();
            prop_assert_eq!(before, seen.len());
        }
    }
}
