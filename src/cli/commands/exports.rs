//! Exports Command
//!
//! Show what discovery and validation decided for every exported name,
//! without assembling sections.

use std::path::PathBuf;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, render};
use crate::types::Result;

pub fn run(root: Option<PathBuf>, package: Option<String>, format: &str) -> Result<()> {
    let ctx = CommandContext::load(root, package)?;
    let resolution = ctx.resolve()?;

    if format != "text" {
        println!("{}", render(&resolution.report, format)?);
        return Ok(());
    }

    let out = Output::new();
    out.section(&format!("{} ({} modules indexed)", ctx.package, ctx.loader.module_count()));
    for symbol in &resolution.symbols {
        println!("  {:<9} {}", symbol.kind.to_string(), symbol.name);
        for method in &symbol.methods {
            println!("  {:<9} {}", "method", method.qualified(&symbol.name));
        }
    }
    println!();
    out.report(&resolution.report);
    Ok(())
}
