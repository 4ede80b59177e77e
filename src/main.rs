use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codeopt::cli::RequestOptions;
use codeopt::cli::commands::analyze::AnalyzeOptions;

#[derive(Parser)]
#[command(name = "codeopt")]
#[command(
    version,
    about = "Pattern-based code rewrites with optimization scores and insights"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more source files
    Analyze {
        #[arg(required = true, help = "Files to analyze")]
        files: Vec<PathBuf>,
        #[arg(
            short = 't',
            long,
            help = "Optimization types: performance,security,readability"
        )]
        types: Option<String>,
        #[arg(short = 'l', long, help = "Declared language (default: from extension)")]
        language: Option<String>,
        #[arg(short = 'd', long, help = "Only report these knowledge domains")]
        domains: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
        #[arg(long, env = "CODEOPT_SEED", help = "Seed for placeholder scores")]
        seed: Option<u64>,
        #[arg(long, help = "Print the optimized code")]
        show_code: bool,
    },

    /// Analyze every supported file under a directory
    Scan {
        #[arg(default_value = ".", help = "Directory to scan")]
        dir: PathBuf,
        #[arg(short = 't', long, help = "Optimization types")]
        types: Option<String>,
        #[arg(short = 'd', long, help = "Only report these knowledge domains")]
        domains: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
        #[arg(long, env = "CODEOPT_SEED", help = "Seed for placeholder scores")]
        seed: Option<u64>,
    },

    /// List knowledge domains
    Domains {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// List rewrite rules
    Rules {
        #[arg(short = 'l', long, help = "Only rules for this language")]
        language: Option<String>,
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
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize project configuration
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mcodeopt encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

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

    match cli.command {
        Commands::Analyze {
            files,
            types,
            language,
            domains,
            format,
            seed,
            show_code,
        } => {
            codeopt::cli::commands::analyze::run(AnalyzeOptions {
                files,
                request: RequestOptions {
                    types,
                    language,
                    domains,
                },
                format,
                seed,
                show_code,
            })?;
        }
        Commands::Scan {
            dir,
            types,
            domains,
            format,
            seed,
        } => {
            let request = RequestOptions {
                types,
                language: None,
                domains,
            };
            codeopt::cli::commands::scan::run(&dir, request, &format, seed)?;
        }
        Commands::Domains { format } => {
            codeopt::cli::commands::domains::run(&format)?;
        }
        Commands::Rules { language } => {
            codeopt::cli::commands::rules::run(language.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                codeopt::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                codeopt::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                codeopt::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
