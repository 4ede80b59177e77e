//! Analysis Result Types
//!
//! Output of the composer. Field names serialize in camelCase because the
//! consumers of this JSON are JavaScript dashboards.

use serde::{Deserialize, Serialize};

use super::request::OptimizationType;

/// Complete analysis output for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub original_code: String,
    pub optimized_code: String,
    pub filename: String,
    pub language: String,
    pub metrics: Metrics,
    pub insights: Vec<Insight>,
    pub domains: Vec<DomainTag>,
}

impl AnalysisResult {
    /// Whether any rewrite changed the code
    pub fn is_modified(&self) -> bool {
        self.original_code != self.optimized_code
    }

    /// Techniques of all recorded insights, in insight order
    pub fn techniques(&self) -> Vec<&str> {
        self.insights
            .iter()
            .map(|i| i.applied_technique.as_str())
            .collect()
    }
}

/// Numeric scores, all within `0..=100`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub performance_score: u8,
    pub security_score: u8,
    pub readability_score: u8,
    pub improvement_percentage: u8,
    /// 1-based line numbers into `optimized_code`, ascending
    pub optimized_lines: Vec<usize>,
}

impl Metrics {
    pub fn score_for(&self, kind: OptimizationType) -> u8 {
        match kind {
            OptimizationType::Performance => self.performance_score,
            OptimizationType::Security => self.security_score,
            OptimizationType::Readability => self.readability_score,
        }
    }
}

/// Human-readable record of one applied technique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: OptimizationType,
    pub description: String,
    pub applied_technique: String,
    pub impact: String,
}

/// Knowledge domain attached to a result for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTag {
    pub name: String,
    pub algorithms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_serializes_type_field() {
        let insight = Insight {
            kind: OptimizationType::Security,
            description: "d".to_string(),
            applied_technique: "Input Sanitization".to_string(),
            impact: "i".to_string(),
        };
        let json = serde_json::to_string(&insight).unwrap();
        assert!(json.contains("\"type\":\"security\""));
        assert!(json.contains("\"appliedTechnique\":\"Input Sanitization\""));
    }

    #[test]
    fn test_score_for() {
        let metrics = Metrics {
            performance_score: 87,
            security_score: 71,
            readability_score: 75,
            improvement_percentage: 95,
            optimized_lines: vec![1, 2],
        };
        assert_eq!(metrics.score_for(OptimizationType::Performance), 87);
        assert_eq!(metrics.score_for(OptimizationType::Readability), 75);
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("\"optimizedLines\":[1,2]"));
    }
}
