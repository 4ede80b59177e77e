//! Domains Command
//!
//! Lists the knowledge domain table used for result tagging.

use console::style;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat};
use crate::types::Result;

pub fn run(format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let ctx = CommandContext::load(None)?;
    let domains = ctx.optimizer.knowledge().domains();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(domains)?);
        return Ok(());
    }

    let output = Output::new();
    output.section("Knowledge Domains");
    for domain in domains {
        let status = if domain.active {
            style("active").green()
        } else {
            style("inactive").dim()
        };
        println!(
            "{}  {}  {}",
            style(&domain.name).bold(),
            status,
            style(format!("{}% accuracy", domain.learning_accuracy)).dim()
        );
        if !domain.description.is_empty() {
            println!("    {}", domain.description);
        }
        println!("    {}", domain.algorithms.join(", "));
    }

    Ok(())
}
