//! Pattern Catalog
//!
//! Ordered registry of canned rewrite rules. Each rule pairs a text detector
//! with a rewrite action and fixed display metadata.
//!
//! ## Selection
//! - Declaration order is priority order
//! - Each optimization type is evaluated independently; the first rule of that
//!   type whose detector matches is the one that fires
//! - The fallback rule is never part of a per-type sequence; the composer uses
//!   it when nothing else applied
//!
//! Detectors are regex/substring tests over raw text. Code that merely looks
//! like a pattern will be rewritten, and that is accepted.

mod fallback;
mod javascript;
mod python;
pub mod text;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::analyzer::Language;
use crate::types::{OptimizationType, RewriteError};
pub use text::Rewrite;

type DetectFn = fn(&str, Language) -> bool;
type RewriteFn = fn(&str, Language) -> Result<Rewrite, RewriteError>;

/// Rules that fired for a request, at most one per optimization type
pub type FiredRules = BTreeMap<OptimizationType, &'static Rule>;

/// Which languages a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    JavaScriptFamily,
    Python,
    Any,
}

impl Applicability {
    pub fn covers(&self, language: Language) -> bool {
        match self {
            Self::JavaScriptFamily => language.is_javascript_family(),
            Self::Python => language == Language::Python,
            Self::Any => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JavaScriptFamily => "javascript/typescript",
            Self::Python => "python",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores a rule claims for the axes it touches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclaredScores {
    pub performance: Option<u8>,
    pub security: Option<u8>,
    pub readability: Option<u8>,
}

impl DeclaredScores {
    const fn performance(score: u8) -> Self {
        Self {
            performance: Some(score),
            security: None,
            readability: None,
        }
    }

    const fn security(score: u8) -> Self {
        Self {
            performance: None,
            security: Some(score),
            readability: None,
        }
    }

    const fn readability(score: u8) -> Self {
        Self {
            performance: None,
            security: None,
            readability: Some(score),
        }
    }

    pub fn get(&self, kind: OptimizationType) -> Option<u8> {
        match kind {
            OptimizationType::Performance => self.performance,
            OptimizationType::Security => self.security,
            OptimizationType::Readability => self.readability,
        }
    }
}

/// One canned optimization
pub struct Rule {
    pub id: &'static str,
    pub applies: Applicability,
    pub kind: OptimizationType,
    pub technique: &'static str,
    pub description: &'static str,
    pub impact: &'static str,
    pub scores: DeclaredScores,
    pub improvement: u8,
    detect: DetectFn,
    rewrite: RewriteFn,
}

impl Rule {
    pub fn detect(&self, source: &str, language: Language) -> bool {
        self.applies.covers(language) && (self.detect)(source, language)
    }

    pub fn rewrite(&self, source: &str, language: Language) -> Result<Rewrite, RewriteError> {
        (self.rewrite)(source, language)
    }

    /// Declared score for the rule's own axis
    pub fn score(&self) -> Option<u8> {
        self.scores.get(self.kind)
    }

    pub fn applies_to(&self, language: Language) -> bool {
        self.applies.covers(language)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("technique", &self.technique)
            .finish_non_exhaustive()
    }
}

/// Rule registry in priority order
const RULE_REGISTRY: &[Rule] = &[
    // ===== Performance =====
    Rule {
        id: javascript::FIBONACCI_ID,
        applies: Applicability::JavaScriptFamily,
        kind: OptimizationType::Performance,
        technique: "Dynamic Programming",
        description: "Recursive Fibonacci rewritten with a memo table keyed by n",
        impact: "Exponential O(2^n) recursion reduced to O(n) with cached subproblems",
        scores: DeclaredScores::performance(87),
        improvement: 95,
        detect: javascript::detect_fibonacci,
        rewrite: javascript::rewrite_fibonacci,
    },
    Rule {
        id: javascript::NESTED_LOOP_ID,
        applies: Applicability::JavaScriptFamily,
        kind: OptimizationType::Performance,
        technique: "Dimensional Reduction",
        description: "Perfectly nested loops collapsed into a single loop over the index product",
        impact: "60% performance gain and 40% complexity reduction from a flattened iteration space",
        scores: DeclaredScores::performance(82),
        improvement: 60,
        detect: javascript::detect_nested_loop,
        rewrite: javascript::rewrite_nested_loop,
    },
    Rule {
        id: python::COMPREHENSION_ID,
        applies: Applicability::Python,
        kind: OptimizationType::Performance,
        technique: "Pythonic Patterns",
        description: "Accumulator loop with append replaced by a list comprehension",
        impact: "Comprehensions avoid repeated append lookups and run faster in CPython",
        scores: DeclaredScores::performance(85),
        improvement: 40,
        detect: python::detect_comprehension,
        rewrite: python::rewrite_comprehension,
    },
    // ===== Security =====
    Rule {
        id: javascript::INNER_HTML_ID,
        applies: Applicability::JavaScriptFamily,
        kind: OptimizationType::Security,
        technique: "Input Sanitization",
        description: "innerHTML assignments replaced with textContent",
        impact: "Eliminates a DOM-based XSS vector by never parsing assigned strings as HTML",
        scores: DeclaredScores::security(92),
        improvement: 25,
        detect: javascript::detect_inner_html,
        rewrite: javascript::rewrite_inner_html,
    },
    Rule {
        id: python::LITERAL_EVAL_ID,
        applies: Applicability::Python,
        kind: OptimizationType::Security,
        technique: "Safe Evaluation",
        description: "eval calls replaced with ast.literal_eval",
        impact: "Arbitrary code execution removed; only Python literals are evaluated",
        scores: DeclaredScores::security(90),
        improvement: 20,
        detect: python::detect_eval,
        rewrite: python::rewrite_eval,
    },
    // ===== Readability =====
    Rule {
        id: javascript::VAR_CONST_ID,
        applies: Applicability::JavaScriptFamily,
        kind: OptimizationType::Readability,
        technique: "Code Style Standardization",
        description: "var declarations converted to const/let and snake_case names to camelCase",
        impact: "Block scoping and consistent naming make intent explicit",
        scores: DeclaredScores::readability(78),
        improvement: 30,
        detect: javascript::detect_var_const,
        rewrite: javascript::rewrite_var_const,
    },
];

/// Last-resort readability rule
static FALLBACK_RULE: Rule = Rule {
    id: fallback::FALLBACK_ID,
    applies: Applicability::Any,
    kind: OptimizationType::Readability,
    technique: "Naming Conventions",
    description: "Ambiguous single-letter variables renamed to descriptive names",
    impact: "Descriptive identifiers reduce the effort needed to read the code",
    scores: DeclaredScores::readability(75),
    improvement: 15,
    detect: fallback::detect_naming,
    rewrite: fallback::rewrite_naming,
};

/// Read-only view over the rule registry
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternCatalog;

impl PatternCatalog {
    pub fn builtin() -> Self {
        Self
    }

    /// All per-type rules in priority order (fallback excluded)
    pub fn rules(&self) -> &'static [Rule] {
        RULE_REGISTRY
    }

    /// Candidate rules for one language and type, in priority order.
    /// Unknown languages get no rules.
    pub fn rules_for(&self, language: Language, kind: OptimizationType) -> Vec<&'static Rule> {
        if !language.is_known() {
            return Vec::new();
        }
        RULE_REGISTRY
            .iter()
            .filter(|rule| rule.kind == kind && rule.applies_to(language))
            .collect()
    }

    pub fn fallback(&self) -> &'static Rule {
        &FALLBACK_RULE
    }

    pub fn get(&self, id: &str) -> Option<&'static Rule> {
        RULE_REGISTRY
            .iter()
            .chain(std::iter::once(&FALLBACK_RULE))
            .find(|rule| rule.id == id)
    }

    /// First matching rule per requested type. Detection always runs against
    /// the original source.
    pub fn select(
        &self,
        source: &str,
        language: Language,
        types: &BTreeSet<OptimizationType>,
    ) -> FiredRules {
        let mut fired = FiredRules::new();
        for &kind in types {
            let hit = self
                .rules_for(language, kind)
                .into_iter()
                .find(|rule| rule.detect(source, language));
            match hit {
                Some(rule) => {
                    debug!(rule = rule.id, kind = %kind, %language, "Rule matched");
                    fired.insert(kind, rule);
                }
                None => debug!(kind = %kind, %language, "No rule matched"),
            }
        }
        fired
    }
}
