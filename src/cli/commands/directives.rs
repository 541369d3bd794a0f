//! Directives Command
//!
//! Dump the docstring directives found on validated symbols.

use std::path::PathBuf;

use console::style;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, render};
use crate::directives::summary_line;
use crate::types::{Result, ValidatedSymbol};

pub fn run(root: Option<PathBuf>, package: Option<String>, format: &str) -> Result<()> {
    let ctx = CommandContext::load(root, package)?;
    let resolution = ctx.resolve()?;

    if format != "text" {
        println!("{}", render(&resolution.directives, format)?);
        return Ok(());
    }

    let out = Output::new();
    if resolution.directives.is_empty() {
        out.info("No directives found");
        return Ok(());
    }

    out.section(&format!("Directives ({})", resolution.directives.len()));
    for (name, directive) in resolution.directives.iter() {
        let mut parts = Vec::new();
        if let Some(family) = &directive.family {
            parts.push(format!("family={}", family));
        }
        if let Some(order) = directive.order {
            parts.push(format!("order={}", order));
        }
        if !directive.seealso.is_empty() {
            parts.push(format!("seealso={}", directive.seealso.join(",")));
        }
        if directive.nodoc {
            parts.push("nodoc".to_string());
        }
        let summary = docstring(&resolution.symbols, name)
            .and_then(summary_line)
            .unwrap_or_default();
        println!("  {:<32} {}  {}", name, parts.join(" "), style(summary).dim());
    }
    Ok(())
}

/// Docstring of `Name` or `Class.method` among the validated symbols
fn docstring<'s>(symbols: &'s [ValidatedSymbol], key: &str) -> Option<&'s str> {
    let (base, method) = match key.split_once('.') {
        Some((base, method)) => (base, Some(method)),
        None => (key, None),
    };
    let symbol = symbols.iter().find(|s| s.name == base)?;
    match method {
        Some(method) => symbol
            .methods
            .iter()
            .find(|m| m.name == method)?
            .docstring
            .as_deref(),
        None => symbol.docstring.as_deref(),
    }
}
