use console::style;

use crate::types::{AnalysisResult, OptimizationType};

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
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Colored score: green from 85, yellow from 70, red below
    pub fn score(&self, value: u8) -> String {
        let text = format!("{:>3}", value);
        match value {
            85..=u8::MAX => style(text).green().to_string(),
            70..=84 => style(text).yellow().to_string(),
            _ => style(text).red().to_string(),
        }
    }

    /// Multi-line summary of one analysis
    pub fn analysis(&self, id: u64, result: &AnalysisResult, show_code: bool) {
        self.header(&format!("#{} {} ({})", id, result.filename, result.language));

        let metrics = &result.metrics;
        let scores: Vec<String> = OptimizationType::ALL
            .iter()
            .map(|kind| format!("{} {}", kind, self.score(metrics.score_for(*kind))))
            .collect();
        println!("  Scores:      {}", scores.join("  "));
        println!(
            "  Improvement: {}",
            style(format!("{}%", metrics.improvement_percentage)).cyan()
        );

        for insight in &result.insights {
            println!(
                "  {} {} {}",
                style("•").dim(),
                style(&insight.applied_technique).bold(),
                style(format!("[{}]", insight.kind)).dim()
            );
            println!("      {}", insight.description);
            println!("      {}", style(&insight.impact).italic());
        }

        if !result.domains.is_empty() {
            let names: Vec<&str> = result.domains.iter().map(|d| d.name.as_str()).collect();
            println!("  Domains:     {}", names.join(", "));
        }

        if !metrics.optimized_lines.is_empty() {
            let lines: Vec<String> = metrics
                .optimized_lines
                .iter()
                .map(|l| l.to_string())
                .collect();
            println!("  Lines:       {}", lines.join(", "));
        }

        if show_code && result.is_modified() {
            self.section("Optimized code");
            for (idx, line) in result.optimized_code.lines().enumerate() {
                let number = idx + 1;
                if metrics.optimized_lines.binary_search(&number).is_ok() {
                    println!("{} {}", style(format!("{:>4}", number)).green(), line);
                } else {
                    println!("{} {}", style(format!("{:>4}", number)).dim(), line);
                }
            }
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
