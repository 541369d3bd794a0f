use console::style;

use crate::report::DiagnosticReport;
use crate::types::SectionDescriptor;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Section outline: titles with their entries
    pub fn outline(&self, sections: &[SectionDescriptor]) {
        for section in sections {
            self.section(&section.title);
            if !section.desc.is_empty() {
                println!("{}", style(&section.desc).dim());
            }
            for entry in &section.contents {
                if entry.members_suppressed() {
                    println!("  {} {}", entry.name(), style("(members hidden)").dim());
                } else {
                    println!("  {}", entry.name());
                }
            }
        }
    }

    /// Diagnostic report, to stderr so stdout stays machine-readable
    pub fn report(&self, report: &DiagnosticReport) {
        eprintln!(
            "{} {} included, {} excluded (via {})",
            style(&report.package).bold(),
            style(report.included.len()).green(),
            style(report.excluded_count()).yellow(),
            report.strategy
        );
        for (reason, names) in &report.excluded {
            eprintln!(
                "  {} ({}): {}",
                style(reason).dim(),
                names.len(),
                names.join(", ")
            );
        }
        for (kind, count) in report.failure_tallies() {
            eprintln!("  {} {}: {}", style("failed").red(), kind, count);
        }
        if !report.skipped_methods.is_empty() {
            eprintln!(
                "  {} method(s) skipped during categorization",
                report.skipped_methods.len()
            );
        }
        if let Some(advice) = &report.recommendation {
            self.warning(advice);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
