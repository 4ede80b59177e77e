//! Knowledge Domain Types
//!
//! Read-only reference data describing which technique belongs to which
//! knowledge area. Used only for display tagging of analysis results.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::scoring::MAX_SCORE;

/// A named category of algorithmic techniques
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub name: String,
    pub description: String,
    /// Technique names, in match priority order
    pub algorithms: Vec<String>,
    /// Claimed accuracy percentage, display only
    #[serde(default, deserialize_with = "deserialize_accuracy")]
    pub learning_accuracy: u8,
    /// Inactive domains are kept for listing but never used for tagging
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Accept any JSON number and clamp it to a percentage
fn deserialize_accuracy<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(0.0, f64::from(MAX_SCORE)) as u8)
}

impl Domain {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            algorithms: Vec::new(),
            learning_accuracy: 0,
            active: true,
        }
    }

    pub fn with_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.algorithms = algorithms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_accuracy(mut self, accuracy: u8) -> Self {
        self.learning_accuracy = accuracy.min(100);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Case-insensitive substring match in either direction
    pub fn matches_technique(&self, technique: &str) -> bool {
        let technique = technique.trim().to_lowercase();
        if technique.is_empty() {
            return false;
        }
        self.algorithms.iter().any(|algorithm| {
            let algorithm = algorithm.to_lowercase();
            !algorithm.is_empty()
                && (algorithm.contains(&technique) || technique.contains(&algorithm))
        })
    }
}

/// Built-in seed table, in tagging priority order
pub fn default_domains() -> Vec<Domain> {
    vec![
        Domain::new(
            "Mathematics",
            "Recurrence elimination and dimensional analysis of iteration spaces",
        )
        .with_algorithms([
            "Dynamic Programming",
            "Memoization",
            "Dimensional Reduction",
            "Matrix Factorization",
        ])
        .with_accuracy(94),
        Domain::new(
            "Computer Science",
            "Idiomatic control flow and data structure usage",
        )
        .with_algorithms([
            "Pythonic Patterns",
            "Loop Fusion",
            "Algorithm Optimization",
            "Cache-Aware Traversal",
        ])
        .with_accuracy(91),
        Domain::new(
            "Cybersecurity",
            "Injection prevention and untrusted input handling",
        )
        .with_algorithms([
            "Input Sanitization",
            "Safe Evaluation",
            "XSS Prevention",
            "Content Security Policy",
        ])
        .with_accuracy(89),
        Domain::new(
            "Software Engineering",
            "Consistent style and intention-revealing names",
        )
        .with_algorithms(["Code Style Standardization", "Naming Conventions", "Refactoring"])
        .with_accuracy(87),
        Domain::new(
            "Physics",
            "Geometric flow and cohomological views of program structure",
        )
        .with_algorithms([
            "Geometric Flow",
            "Tensor Contraction",
            "Cohomological Analysis",
        ])
        .with_accuracy(82),
        Domain::new("Quantum Computing", "Search-space amplification heuristics")
            .with_algorithms(["Quantum Annealing", "Amplitude Amplification"])
            .with_accuracy(64)
            .inactive(),
    ]
}
