//! Fallback readability rule
//!
//! Always detected. Renames single-letter variables with conventional
//! meanings to descriptive names; when nothing qualifies the rewrite is a
//! no-op and only the insight survives.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::text::{Rewrite, changed_lines, contains_word, pattern, rename_identifier};
use crate::analyzer::Language;
use crate::types::RewriteError;

pub const FALLBACK_ID: &str = "default-naming";

static RE_JS_SHORT_DECL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:var|let|const)\s+([abijknsxy])\s*=").ok());

static RE_PY_SHORT_ASSIGN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*([abijknsxy])[ \t]*=[^=]").ok());

fn descriptive_name(short: &str) -> Option<&'static str> {
    Some(match short {
        "a" => "first",
        "b" => "second",
        "i" => "index",
        "j" => "innerIndex",
        "k" => "counter",
        "n" => "count",
        "s" => "text",
        "x" => "value",
        "y" => "output",
        _ => return None,
    })
}

fn python_name(name: &str) -> String {
    match name {
        "innerIndex" => "inner_index".to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn detect_naming(_source: &str, _language: Language) -> bool {
    true
}

pub(crate) fn rewrite_naming(source: &str, language: Language) -> Result<Rewrite, RewriteError> {
    let re = if language == Language::Python {
        pattern(&RE_PY_SHORT_ASSIGN, "py-short-assign")?
    } else {
        pattern(&RE_JS_SHORT_DECL, "js-short-decl")?
    };

    let shorts: BTreeSet<&str> = re
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let mut code = source.to_string();
    for short in shorts {
        let Some(long) = descriptive_name(short) else {
            continue;
        };
        let long = if language == Language::Python {
            python_name(long)
        } else {
            long.to_string()
        };
        if contains_word(&code, &long)? {
            continue;
        }
        code = rename_identifier(&code, short, &long)?;
    }

    let lines = changed_lines(source, &code);
    Ok(Rewrite::new(code, lines))
}
