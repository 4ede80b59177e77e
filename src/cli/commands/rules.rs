//! Rules Command
//!
//! Lists the rewrite catalog, optionally for a single language.

use console::style;

use crate::analyzer::Language;
use crate::catalog::{PatternCatalog, Rule};
use crate::cli::ui::Output;
use crate::types::{Result, ValidationError, ValidationErrorKind};

pub fn run(language: Option<&str>) -> Result<()> {
    let catalog = PatternCatalog::builtin();
    let language = match language {
        Some(name) => Some(name.parse::<Language>().map_err(|_| {
            ValidationError::new(
                ValidationErrorKind::Format,
                format!("unknown language '{}'", name),
            )
            .with_field("language")
        })?),
        None => None,
    };

    let output = Output::new();
    output.section("Rewrite Rules");

    let rules = catalog
        .rules()
        .iter()
        .chain([catalog.fallback()])
        .filter(|rule| language.is_none_or(|lang| rule.applies_to(lang)));
    for rule in rules {
        print_rule(rule, std::ptr::eq(rule, catalog.fallback()));
    }

    Ok(())
}

fn print_rule(rule: &Rule, fallback: bool) {
    println!(
        "{:<24} {:<12} {:<28} {}{}",
        style(rule.id).bold(),
        rule.kind.as_str(),
        rule.technique,
        style(rule.applies).dim(),
        if fallback {
            style(" (fallback)").yellow().to_string()
        } else {
            String::new()
        }
    );
    println!(
        "    {} · score {} · improvement {}%",
        rule.description,
        rule.score().unwrap_or_default(),
        rule.improvement
    );
}
