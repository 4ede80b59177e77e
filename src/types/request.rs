//! Analysis Request Types
//!
//! The input side of the core: what to analyze and which axes to score.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ValidationError, ValidationErrorKind};
use crate::constants::analysis::MAX_CODE_BYTES;

/// One of the three independently scored axes.
///
/// Variant order is application priority: performance rewrites run first,
/// readability last. `Ord` follows declaration order, so a `BTreeSet` of types
/// iterates in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationType {
    Performance,
    Security,
    Readability,
}

impl OptimizationType {
    /// All types in priority order
    pub const ALL: [OptimizationType; 3] = [
        OptimizationType::Performance,
        OptimizationType::Security,
        OptimizationType::Readability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Security => "security",
            Self::Readability => "readability",
        }
    }

    /// Parse a comma separated list such as `performance,security`
    pub fn parse_list(s: &str) -> Result<BTreeSet<Self>, ValidationError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<Self>())
            .collect()
    }
}

impl fmt::Display for OptimizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "performance" | "perf" => Ok(Self::Performance),
            "security" | "sec" => Ok(Self::Security),
            "readability" | "style" => Ok(Self::Readability),
            other => Err(ValidationError::new(
                ValidationErrorKind::Format,
                format!(
                    "unknown optimization type '{}'. Valid values: performance, security, readability",
                    other
                ),
            )
            .with_field("optimizationTypes")),
        }
    }
}

/// A single analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub code: String,
    pub filename: String,
    /// Declared language, free-form (`"javascript"`, `"ts"`, `"Python"`, ...)
    pub language: String,
    pub optimization_types: BTreeSet<OptimizationType>,
    /// When present, only these knowledge domains are reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable_domains: Option<BTreeSet<String>>,
}

impl AnalysisRequest {
    pub fn new(
        code: impl Into<String>,
        filename: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            filename: filename.into(),
            language: language.into(),
            optimization_types: OptimizationType::ALL.into_iter().collect(),
            applicable_domains: None,
        }
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = OptimizationType>) -> Self {
        self.optimization_types = types.into_iter().collect();
        self
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable_domains = Some(domains.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a domain passes the optional filter (case-insensitive)
    pub fn allows_domain(&self, name: &str) -> bool {
        match &self.applicable_domains {
            None => true,
            Some(filter) => filter.iter().any(|d| d.eq_ignore_ascii_case(name)),
        }
    }

    /// Upstream validation. The core itself tolerates invalid requests.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with_limit(MAX_CODE_BYTES)
    }

    pub fn validate_with_limit(&self, max_code_bytes: usize) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::missing("code"));
        }
        if self.filename.trim().is_empty() {
            return Err(ValidationError::missing("filename"));
        }
        if self.language.trim().is_empty() {
            return Err(ValidationError::missing("language"));
        }
        if self.optimization_types.is_empty() {
            return Err(ValidationError::missing("optimizationTypes"));
        }
        if self.code.len() > max_code_bytes {
            return Err(ValidationError::new(
                ValidationErrorKind::Range,
                format!(
                    "code is {} bytes, limit is {} bytes",
                    self.code.len(),
                    max_code_bytes
                ),
            )
            .with_field("code"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_priority_order() {
        let set: BTreeSet<_> = [
            OptimizationType::Readability,
            OptimizationType::Performance,
            OptimizationType::Security,
        ]
        .into_iter()
        .collect();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(ordered, OptimizationType::ALL.to_vec());
    }

    #[test]
    fn test_parse_list() {
        let types = OptimizationType::parse_list("security, performance").unwrap();
        assert_eq!(types.len(), 2);
        assert!(types.contains(&OptimizationType::Security));
        assert!(OptimizationType::parse_list("speed").is_err());
    }

    #[test]
    fn test_validate() {
        let ok = AnalysisRequest::new("let x = 1;", "a.js", "javascript");
        assert!(ok.validate().is_ok());

        let empty = AnalysisRequest::new("  ", "a.js", "javascript");
        assert_eq!(empty.validate().unwrap_err().field.as_deref(), Some("code"));

        let no_types = AnalysisRequest::new("x", "a.js", "javascript")
            .with_types(Vec::<OptimizationType>::new());
        assert!(no_types.validate().is_err());

        let large = AnalysisRequest::new("x".repeat(20), "a.js", "javascript");
        assert_eq!(
            large.validate_with_limit(10).unwrap_err().kind,
            ValidationErrorKind::Range
        );
    }

    #[test]
    fn test_domain_filter() {
        let request = AnalysisRequest::new("x", "a.js", "js");
        assert!(request.allows_domain("Mathematics"));

        let filtered = request.with_domains(["mathematics"]);
        assert!(filtered.allows_domain("Mathematics"));
        assert!(!filtered.allows_domain("Cybersecurity"));
    }

    #[test]
    fn test_serde_camel_case() {
        let request = AnalysisRequest::new("x", "a.js", "js")
            .with_types([OptimizationType::Security]);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"optimizationTypes\":[\"security\"]"));
        assert!(!json.contains("applicableDomains"));
    }
}
