//! Sections Command
//!
//! Resolve the package and print the reference sections.
//!
//! Usage:
//!   docsift sections [--package NAME] [-f yaml|json|text] [-o FILE] [--report]

use std::fs;
use std::path::PathBuf;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, render};
use crate::types::{DocsiftError, Result, ResultExt};

pub struct SectionsOptions {
    pub root: Option<PathBuf>,
    pub package: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub report: bool,
}

pub fn run(options: SectionsOptions) -> Result<()> {
    if options.format == "text" && options.output.is_some() {
        return Err(DocsiftError::Config(
            "--output needs a data format (yaml or json), not text".to_string(),
        ));
    }

    let ctx = CommandContext::load(options.root, options.package)?;
    let resolution = ctx.resolve()?;
    let out = Output::new();

    if options.report {
        out.report(&resolution.report);
    }

    let Some(sections) = resolution.outcome.sections() else {
        out.error("could not auto-generate sections");
        return Err(DocsiftError::NoSections {
            package: ctx.package.to_string(),
        });
    };

    if options.format == "text" {
        out.outline(sections);
        return Ok(());
    }

    let text = render(&sections, &options.format)?;
    match options.output {
        Some(path) => {
            fs::write(&path, text).with_context(format!("writing {}", path.display()))?;
            out.success(&format!(
                "Wrote {} section(s) to {}",
                sections.len(),
                path.display()
            ));
        }
        None => print!("{}", text),
    }
    Ok(())
}
