//! Scan Command
//!
//! Discovers every supported source file under a directory and analyzes it,
//! one summary line per file.

use std::path::Path;

use console::style;
use serde::Serialize;
use tracing::{info, warn};

use crate::analyzer::FileScanner;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, RequestOptions, domain_names};
use crate::types::{AnalysisId, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanEntry {
    id: AnalysisId,
    path: String,
    techniques: Vec<String>,
    improvement_percentage: u8,
    modified: bool,
}

pub fn run(dir: &Path, request: RequestOptions, format: &str, seed: Option<u64>) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let ctx = CommandContext::load(seed)?;
    let output = Output::new();

    let files = FileScanner::new(dir)
        .with_exclude(ctx.config.analysis.exclude.clone())
        .with_max_file_size(ctx.config.analysis.max_code_bytes as u64)
        .scan()?;
    info!("Found {} files to analyze", files.len());

    let mut entries = Vec::with_capacity(files.len());
    for file in &files {
        let stored = match ctx.analyze_file(&file.path, &request) {
            Ok(stored) => stored,
            Err(e) if e.is_skippable() => {
                warn!("Skipping {}: {}", file.path.display(), e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let relative = file
            .path
            .strip_prefix(dir)
            .unwrap_or(&file.path)
            .display()
            .to_string();

        if format == OutputFormat::Text {
            let domains: Vec<&str> = domain_names(&stored.result).into_iter().collect();
            println!(
                "{:>4}  {:<40} {:>4}  {}{}",
                style(stored.id.get()).dim(),
                relative,
                style(format!("{}%", stored.result.metrics.improvement_percentage)).cyan(),
                stored.result.techniques().join(", "),
                if domains.is_empty() {
                    String::new()
                } else {
                    format!("  {}", style(format!("[{}]", domains.join(", "))).dim())
                }
            );
        }

        entries.push(ScanEntry {
            id: stored.id,
            path: relative,
            techniques: stored
                .result
                .techniques()
                .into_iter()
                .map(String::from)
                .collect(),
            improvement_percentage: stored.result.metrics.improvement_percentage,
            modified: stored.result.is_modified(),
        });
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            let modified = entries.iter().filter(|e| e.modified).count();
            println!();
            output.success(&format!(
                "Scanned {} file(s), {} with rewrites",
                entries.len(),
                modified
            ));
        }
    }

    Ok(())
}
