pub mod domain;
pub mod error;
pub mod request;
pub mod result;

pub use domain::{Domain, default_domains};
pub use error::{OptError, Result, RewriteError, ValidationError, ValidationErrorKind};
pub use request::{AnalysisRequest, OptimizationType};
pub use result::{AnalysisResult, DomainTag, Insight, Metrics};

// =============================================================================
// Domain Newtypes
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type-safe wrapper for stored analysis IDs
///
/// IDs are allocated by a store, start at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(u64);

impl AnalysisId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AnalysisId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Clamp any integer score into the `0..=100` percentage range
pub fn clamp_percent(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_id() {
        let id = AnalysisId::new(7);
        assert_eq!(id.get(), 7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        assert_eq!(AnalysisId::from(7), id);
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(-5), 0);
        assert_eq!(clamp_percent(42), 42);
        assert_eq!(clamp_percent(250), 100);
    }
}
