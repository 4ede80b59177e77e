//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/codeopt/) and project (.codeopt/) level configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::constants::{analysis, scoring};
use crate::types::{OptError, OptimizationType};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Request defaults and limits
    pub analysis: AnalysisConfig,

    /// Placeholder score settings
    pub scoring: ScoringConfig,

    /// Domain table source
    pub knowledge: KnowledgeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalysisConfig::default(),
            scoring: ScoringConfig::default(),
            knowledge: KnowledgeConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `OptError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        let ScoringConfig {
            placeholder_min,
            placeholder_max,
            ..
        } = self.scoring;

        if placeholder_min > scoring::MAX_SCORE || placeholder_max > scoring::MAX_SCORE {
            return Err(OptError::Config(format!(
                "scoring placeholder range must be within 0-{}, got {}-{}",
                scoring::MAX_SCORE,
                placeholder_min,
                placeholder_max
            )));
        }

        if placeholder_min > placeholder_max {
            return Err(OptError::Config(format!(
                "scoring.placeholder_min ({}) is greater than scoring.placeholder_max ({})",
                placeholder_min, placeholder_max
            )));
        }

        if self.analysis.max_code_bytes == 0 {
            return Err(OptError::Config(
                "analysis.max_code_bytes must be greater than 0".to_string(),
            ));
        }

        if self.analysis.default_types.is_empty() {
            return Err(OptError::Config(
                "analysis.default_types must name at least one optimization type".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Types analyzed when the command line does not name any
    pub default_types: BTreeSet<OptimizationType>,

    /// Requests with more code than this are rejected before analysis
    pub max_code_bytes: usize,

    /// Domain filter applied when the command line does not give one
    pub applicable_domains: Option<Vec<String>>,

    /// Glob patterns skipped by `scan`
    pub exclude: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_types: OptimizationType::ALL.into_iter().collect(),
            max_code_bytes: analysis::MAX_CODE_BYTES,
            applicable_domains: None,
            exclude: vec![
                "**/*.min.js".to_string(),
                "**/*.bundle.js".to_string(),
            ],
        }
    }
}

// =============================================================================
// Scoring Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Lowest placeholder score
    pub placeholder_min: u8,

    /// Highest placeholder score (inclusive)
    pub placeholder_max: u8,

    /// Fixed seed for reproducible placeholder scores
    pub seed: Option<u64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            placeholder_min: scoring::PLACEHOLDER_MIN,
            placeholder_max: scoring::PLACEHOLDER_MAX,
            seed: None,
        }
    }
}

// =============================================================================
// Knowledge Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// JSON file holding the domain table; the built-in table when unset
    pub domains_path: Option<PathBuf>,
}

// =============================================================================
// Tests
// =============================================================================
