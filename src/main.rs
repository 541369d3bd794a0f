use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsift::cli::commands::sections::SectionsOptions;

/// Validate an output format against the accepted values
fn parse_format(valid: &'static [&'static str]) -> impl Fn(&str) -> Result<String, String> + Clone {
    move |s: &str| {
        let lowered = s.to_lowercase();
        if valid.contains(&lowered.as_str()) {
            Ok(lowered)
        } else {
            Err(format!(
                "Invalid format '{}'. Valid values: {}",
                s,
                valid.join(", ")
            ))
        }
    }
}

const DATA_FORMATS: &[&str] = &["yaml", "json", "text"];
const CONFIG_FORMATS: &[&str] = &["toml", "json"];

#[derive(Parser)]
#[command(name = "docsift")]
#[command(
    version,
    about = "Resolve a Python package's public API into reference sections"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root (defaults to the current directory)
    #[arg(long, short, global = true, env = "DOCSIFT_ROOT")]
    root: Option<PathBuf>,

    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the package and print its reference sections
    Sections {
        #[arg(long, short, help = "Package import name (detected when omitted)")]
        package: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "yaml",
            value_parser = parse_format(DATA_FORMATS),
            help = "Output format: yaml, json, text"
        )]
        format: String,
        #[arg(long, short, help = "Write sections to a file instead of stdout")]
        output: Option<PathBuf>,
        #[arg(long, help = "Print the diagnostic report to stderr")]
        report: bool,
    },

    /// Show discovered exports and why names were excluded
    Exports {
        #[arg(long, short)]
        package: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_format(DATA_FORMATS),
            help = "Output format: text, json, yaml"
        )]
        format: String,
    },

    /// Show docstring directives of validated symbols
    Directives {
        #[arg(long, short)]
        package: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_format(DATA_FORMATS),
            help = "Output format: text, json, yaml"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            value_parser = parse_format(CONFIG_FORMATS),
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Write a docsift.toml into the project root
    Init {
        #[arg(long, short, help = "Package import name")]
        package: Option<String>,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let root = cli.root;
    match cli.command {
        Commands::Sections {
            package,
            format,
            output,
            report,
        } => {
            docsift::cli::commands::sections::run(SectionsOptions {
                root,
                package,
                format,
                output,
                report,
            })?;
        }
        Commands::Exports { package, format } => {
            docsift::cli::commands::exports::run(root, package, &format)?;
        }
        Commands::Directives { package, format } => {
            docsift::cli::commands::directives::run(root, package, &format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                docsift::cli::commands::config::show(root, global, &format)?;
            }
            ConfigAction::Path => {
                docsift::cli::commands::config::path(root)?;
            }
            ConfigAction::Init { package, force } => {
                docsift::cli::commands::config::init_project(root, package, force)?;
            }
        },
    }

    Ok(())
}
