//! Analyze Command
//!
//! Runs the optimizer over individual files and prints the results.
//!
//! Usage:
//!   codeopt analyze <FILES>... [--types performance,security] [--language ts]
//!                   [--domains Mathematics] [--format json] [--seed 42]

use std::path::PathBuf;

use tracing::{info, warn};

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, RequestOptions, StoredResult};
use crate::types::{OptError, Result};

pub struct AnalyzeOptions {
    pub files: Vec<PathBuf>,
    pub request: RequestOptions,
    pub format: String,
    pub seed: Option<u64>,
    pub show_code: bool,
}

pub fn run(options: AnalyzeOptions) -> Result<()> {
    let format: OutputFormat = options.format.parse()?;
    let ctx = CommandContext::load(options.seed)?;
    let output = Output::new();

    let mut analyzed: Vec<StoredResult> = Vec::with_capacity(options.files.len());
    let mut failures = 0usize;

    for path in &options.files {
        match ctx.analyze_file(path, &options.request) {
            Ok(stored) => analyzed.push(stored),
            Err(e) if e.is_skippable() => {
                warn!("Skipping {}: {}", path.display(), e);
                output.error(&format!("{}: {}", path.display(), e));
                failures += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        analyzed = analyzed.len(),
        failed = failures,
        "Analysis finished"
    );

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ctx.store.list())?);
        }
        OutputFormat::Text => {
            for stored in &analyzed {
                output.analysis(stored.id.get(), &stored.result, options.show_code);
            }
            println!();
            if failures == 0 {
                output.success(&format!("Analyzed {} file(s)", analyzed.len()));
            } else {
                output.warning(&format!(
                    "Analyzed {} file(s), {} skipped",
                    analyzed.len(),
                    failures
                ));
            }
        }
    }

    if analyzed.is_empty() && failures > 0 {
        return Err(OptError::unsupported_file(
            format!("{} file(s)", failures),
            "no file could be analyzed",
        ));
    }

    Ok(())
}
