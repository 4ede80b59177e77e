//! Rewrite Engine
//!
//! Applies exactly one rule to a source text. Failures never escape: a rule
//! that cannot rewrite is reported as "no optimization available".

use tracing::{debug, warn};

use crate::analyzer::Language;
use crate::catalog::{Rewrite, Rule};
use crate::types::RewriteError;

#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteEngine;

impl RewriteEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply `rule` to `source`. `None` when the rewrite fails or changes nothing.
    pub fn apply(&self, rule: &Rule, source: &str, language: Language) -> Option<Rewrite> {
        match rule.rewrite(source, language) {
            Ok(rewrite) if rewrite.code == source => {
                debug!(rule = rule.id, "Rewrite produced no change");
                None
            }
            Ok(rewrite) => {
                debug!(
                    rule = rule.id,
                    lines = rewrite.lines.len(),
                    "Rewrite applied"
                );
                Some(rewrite)
            }
            Err(RewriteError::NoMatch(id)) => {
                debug!(rule = id, "Rewrite found nothing to change");
                None
            }
            Err(e) => {
                warn!(rule = rule.id, error = %e, "Rewrite failed");
                None
            }
        }
    }

    /// Like [`apply`](Self::apply), but hands back the original text untouched
    /// when nothing was rewritten
    pub fn apply_or_original(&self, rule: &Rule, source: &str, language: Language) -> Rewrite {
        self.apply(rule, source, language)
            .unwrap_or_else(|| Rewrite::new(source.to_string(), Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternCatalog;

    fn rule(id: &str) -> &'static Rule {
        PatternCatalog::builtin().get(id).unwrap()
    }

    #[test]
    fn test_apply_changes_code() {
        let engine = RewriteEngine::new();
        let out = engine
            .apply(rule("js-inner-html"), "a.innerHTML = b;", Language::JavaScript)
            .unwrap();
        assert_eq!(out.code, "a.textContent = b;");
        assert_eq!(out.lines, vec![1]);
    }

    #[test]
    fn test_no_match_is_none() {
        let engine = RewriteEngine::new();
        assert!(
            engine
                .apply(rule("js-inner-html"), "a.textContent = b;", Language::JavaScript)
                .is_none()
        );
    }

    #[test]
    fn test_noop_is_none() {
        let engine = RewriteEngine::new();
        let source = "const total = 1;";
        assert!(
            engine
                .apply(rule("default-naming"), source, Language::JavaScript)
                .is_none()
        );
        let same = engine.apply_or_original(rule("default-naming"), source, Language::JavaScript);
        assert_eq!(same.code, source);
        assert!(same.lines.is_empty());
    }

    #[test]
    fn test_unbalanced_is_absorbed() {
        let engine = RewriteEngine::new();
        let source = "function fibonacci(n) { return fibonacci(n - 1)";
        assert!(
            engine
                .apply(rule("js-fibonacci-memo"), source, Language::JavaScript)
                .is_none()
        );
    }

    #[test]
    fn test_reapply_is_noop() {
        let engine = RewriteEngine::new();
        let fib = rule("js-fibonacci-memo");
        let source = "function fibonacci(n) { if (n < 2) return n; return fibonacci(n - 1) + fibonacci(n - 2); }";
        let once = engine.apply_or_original(fib, source, Language::JavaScript);
        let twice = engine.apply_or_original(fib, &once.code, Language::JavaScript);
        assert_eq!(once.code, twice.code);
    }
}
