//! Scoring & Insight Composer
//!
//! Turns the rules that fired for a request into an [`AnalysisResult`].
//!
//! ## Assembly
//! 1. Fired rules are applied performance → security → readability, each to
//!    the output of the previous one; a failed rewrite drops its axis
//! 2. Applied rules contribute their declared score, improvement and insight
//! 3. Untouched axes get a bounded random placeholder score
//! 4. Nothing applied: the fallback rule runs and its insight is always kept
//!
//! Composition never fails.

use std::collections::{BTreeSet, HashSet};
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::analyzer::Language;
use crate::catalog::text::{line_count, remap_lines};
use crate::catalog::{FiredRules, Rule};
use crate::config::ScoringConfig;
use crate::constants::scoring;
use crate::engine::RewriteEngine;
use crate::knowledge::KnowledgeBase;
use crate::types::{
    AnalysisRequest, AnalysisResult, DomainTag, Insight, Metrics, OptimizationType, clamp_percent,
};

// =============================================================================
// Placeholder Scores
// =============================================================================

/// Source of scores for axes no rule touched
#[derive(Debug)]
pub struct PlaceholderScores {
    range: RangeInclusive<u8>,
    /// Seeded generator; the thread-local RNG is used when absent
    rng: Option<Mutex<StdRng>>,
}

impl Default for PlaceholderScores {
    fn default() -> Self {
        Self::new(scoring::PLACEHOLDER_MIN, scoring::PLACEHOLDER_MAX)
    }
}

impl PlaceholderScores {
    pub fn new(min: u8, max: u8) -> Self {
        let (lo, hi) = Self::normalize(min, max);
        Self {
            range: lo..=hi,
            rng: None,
        }
    }

    pub fn seeded(min: u8, max: u8, seed: u64) -> Self {
        Self {
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
            ..Self::new(min, max)
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        match config.seed {
            Some(seed) => Self::seeded(config.placeholder_min, config.placeholder_max, seed),
            None => Self::new(config.placeholder_min, config.placeholder_max),
        }
    }

    fn normalize(min: u8, max: u8) -> (u8, u8) {
        let min = min.min(scoring::MAX_SCORE);
        let max = max.min(scoring::MAX_SCORE);
        if min <= max { (min, max) } else { (max, min) }
    }

    pub fn range(&self) -> &RangeInclusive<u8> {
        &self.range
    }

    pub fn sample(&self) -> u8 {
        match &self.rng {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                rng.random_range(self.range.clone())
            }
            None => rand::rng().random_range(self.range.clone()),
        }
    }
}

// =============================================================================
// Composer
// =============================================================================

pub struct ScoringComposer {
    engine: RewriteEngine,
    fallback: &'static Rule,
    knowledge: Arc<KnowledgeBase>,
    placeholder: PlaceholderScores,
}

impl ScoringComposer {
    pub fn new(
        fallback: &'static Rule,
        knowledge: Arc<KnowledgeBase>,
        placeholder: PlaceholderScores,
    ) -> Self {
        Self {
            engine: RewriteEngine::new(),
            fallback,
            knowledge,
            placeholder,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn compose(
        &self,
        request: &AnalysisRequest,
        language: Language,
        fired: &FiredRules,
    ) -> AnalysisResult {
        let mut code = request.code.clone();
        let mut touched: BTreeSet<usize> = BTreeSet::new();
        let mut applied: Vec<&'static Rule> = Vec::with_capacity(fired.len() + 1);

        for (kind, rule) in fired {
            match self.engine.apply(rule, &code, language) {
                Some(rewrite) => {
                    touched = remap_lines(&code, &rewrite.code, touched).into_iter().collect();
                    touched.extend(rewrite.lines);
                    code = rewrite.code;
                    applied.push(*rule);
                }
                None => debug!(rule = rule.id, kind = %kind, "Dropped rule without a rewrite"),
            }
        }

        if applied.is_empty() {
            let rewrite = self.engine.apply_or_original(self.fallback, &code, language);
            debug!(
                rule = self.fallback.id,
                changed = rewrite.code != code,
                "Fallback applied"
            );
            code = rewrite.code;
            touched.extend(rewrite.lines);
            applied.push(self.fallback);
        }

        let metrics = self.metrics(&applied, &code, touched);
        let insights = applied.iter().map(|rule| Self::insight(rule)).collect();
        let domains = self.domains(request, &applied);

        AnalysisResult {
            original_code: request.code.clone(),
            optimized_code: code,
            filename: request.filename.clone(),
            language: request.language.clone(),
            metrics,
            insights,
            domains,
        }
    }

    fn metrics(&self, applied: &[&'static Rule], code: &str, touched: BTreeSet<usize>) -> Metrics {
        let score = |kind: OptimizationType| {
            applied
                .iter()
                .find(|rule| rule.kind == kind)
                .and_then(|rule| rule.score())
                .map(|s| s.min(scoring::MAX_SCORE))
                .unwrap_or_else(|| self.placeholder.sample())
        };

        let improvement = applied
            .iter()
            .map(|rule| i64::from(rule.improvement))
            .max()
            .unwrap_or(0);

        let max_line = line_count(code);
        Metrics {
            performance_score: score(OptimizationType::Performance),
            security_score: score(OptimizationType::Security),
            readability_score: score(OptimizationType::Readability),
            improvement_percentage: clamp_percent(improvement),
            optimized_lines: touched
                .into_iter()
                .filter(|line| (1..=max_line).contains(line))
                .collect(),
        }
    }

    fn insight(rule: &Rule) -> Insight {
        Insight {
            kind: rule.kind,
            description: rule.description.to_string(),
            applied_technique: rule.technique.to_string(),
            impact: rule.impact.to_string(),
        }
    }

    fn domains(&self, request: &AnalysisRequest, applied: &[&'static Rule]) -> Vec<DomainTag> {
        let mut seen = HashSet::new();
        applied
            .iter()
            .filter_map(|rule| self.knowledge.tags_for(rule.technique))
            .filter(|domain| request.allows_domain(&domain.name))
            .filter(|domain| seen.insert(domain.name.clone()))
            .map(|domain| DomainTag {
                name: domain.name.clone(),
                algorithms: domain.algorithms.clone(),
            })
            .collect()
    }
}
