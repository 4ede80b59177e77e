//! Knowledge Tagging
//!
//! Maps an applied technique to the knowledge domain it belongs to. The domain
//! table is injected at start-up and never mutated by the core.

use std::path::Path;

use tracing::debug;

use crate::types::{Domain, OptError, Result, default_domains};

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    domains: Vec<Domain>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    pub fn new(domains: Vec<Domain>) -> Self {
        Self { domains }
    }

    /// Built-in seed table
    pub fn builtin() -> Self {
        Self::new(default_domains())
    }

    /// Load a seed table from a JSON array of domains
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let domains: Vec<Domain> = serde_json::from_str(&content)?;
        if domains.is_empty() {
            return Err(OptError::Config(format!(
                "domain table {} is empty",
                path.display()
            )));
        }
        debug!(path = %path.display(), count = domains.len(), "Loaded domain table");
        Ok(Self::new(domains))
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// First active domain, in declaration order, whose algorithms match
    pub fn tags_for(&self, technique: &str) -> Option<&Domain> {
        self.domains
            .iter()
            .filter(|d| d.active)
            .find(|d| d.matches_technique(technique))
    }

    pub fn get(&self, name: &str) -> Option<&Domain> {
        self.domains
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_tags() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(
            kb.tags_for("Dynamic Programming").map(|d| d.name.as_str()),
            Some("Mathematics")
        );
        assert_eq!(
            kb.tags_for("input sanitization").map(|d| d.name.as_str()),
            Some("Cybersecurity")
        );
        assert_eq!(
            kb.tags_for("Naming Conventions").map(|d| d.name.as_str()),
            Some("Software Engineering")
        );
        assert!(kb.tags_for("Interpretive Dance").is_none());
        assert!(kb.tags_for("").is_none());
    }

    #[test]
    fn test_inactive_skipped() {
        let kb = KnowledgeBase::new(vec![
            Domain::new("Old", "retired")
                .with_algorithms(["Loop Tiling"])
                .inactive(),
            Domain::new("New", "current").with_algorithms(["Loop Tiling"]),
        ]);
        assert_eq!(kb.tags_for("loop tiling").map(|d| d.name.as_str()), Some("New"));
        assert!(kb.get("old").is_some());
    }

    #[test]
    fn test_first_match_wins() {
        let kb = KnowledgeBase::new(vec![
            Domain::new("A", "").with_algorithms(["Programming"]),
            Domain::new("B", "").with_algorithms(["Dynamic Programming"]),
        ]);
        assert_eq!(
            kb.tags_for("Dynamic Programming").map(|d| d.name.as_str()),
            Some("A")
        );
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"Graphs","description":"graph work","algorithms":["Dimensional Reduction"],"learningAccuracy":77}}]"#
        )
        .unwrap();

        let kb = KnowledgeBase::from_json_file(file.path()).unwrap();
        let domain = kb.tags_for("Dimensional Reduction").unwrap();
        assert_eq!(domain.name, "Graphs");
        assert_eq!(domain.learning_accuracy, 77);
        assert!(domain.active);
    }

    #[test]
    fn test_from_json_file_clamps_accuracy() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"Graphs","description":"d","algorithms":["Path Finding"],"learningAccuracy":150}},{{"name":"Audio","description":"d","algorithms":["FFT"],"learningAccuracy":512}}]"#
        )
        .unwrap();

        let kb = KnowledgeBase::from_json_file(file.path()).unwrap();
        assert!(kb.domains().iter().all(|d| d.learning_accuracy == 100));
    }

    #[test]
    fn test_from_json_file_rejects_empty() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(matches!(
            KnowledgeBase::from_json_file(file.path()),
            Err(OptError::Config(_))
        ));
    }
}
