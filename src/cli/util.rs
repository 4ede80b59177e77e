//! CLI Common Utilities
//!
//! Shared initialization and request building for CLI commands.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::analyzer::Language;
use crate::config::{Config, ConfigLoader};
use crate::optimizer::Optimizer;
use crate::store::{InMemoryStore, ResultStore};
use crate::types::{
    AnalysisRequest, AnalysisResult, OptError, OptimizationType, Result, ValidationError,
    ValidationErrorKind,
};

/// Output format shared by listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ValidationError::new(
                ValidationErrorKind::Format,
                format!("unknown format '{}'. Valid values: text, json", other),
            )
            .with_field("format")
            .into()),
        }
    }
}

/// Request options given on the command line
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Comma separated optimization types
    pub types: Option<String>,
    /// Declared language for every file
    pub language: Option<String>,
    /// Comma separated domain filter
    pub domains: Option<String>,
}

/// Command execution context
///
/// Loaded configuration, an optimizer built from it and the store results
/// are kept in for the duration of the command.
#[derive(Clone)]
pub struct CommandContext {
    pub config: Config,
    pub optimizer: Arc<Optimizer>,
    pub store: Arc<dyn ResultStore>,
}

impl CommandContext {
    /// Load configuration and build the optimizer. `seed` overrides
    /// `scoring.seed`.
    pub fn load(seed: Option<u64>) -> Result<Self> {
        let mut config = ConfigLoader::load()?;
        if seed.is_some() {
            config.scoring.seed = seed;
        }
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let optimizer = Optimizer::from_config(&config)?;
        Ok(Self {
            config,
            optimizer: Arc::new(optimizer),
            store: Arc::new(InMemoryStore::new()),
        })
    }

    /// Build a validated request for one file
    pub fn request_for(
        &self,
        path: &Path,
        code: String,
        options: &RequestOptions,
    ) -> Result<AnalysisRequest> {
        let types = match &options.types {
            Some(list) => OptimizationType::parse_list(list)?,
            None => self.config.analysis.default_types.clone(),
        };

        let language = match &options.language {
            Some(language) => language.clone(),
            None => Language::from_path(path).highlight_str().to_string(),
        };

        let mut request = AnalysisRequest::new(code, path.display().to_string(), language)
            .with_types(types);

        let domains = options
            .domains
            .as_deref()
            .map(split_list)
            .or_else(|| self.config.analysis.applicable_domains.clone());
        if let Some(domains) = domains {
            request = request.with_domains(domains);
        }

        request.validate_with_limit(self.config.analysis.max_code_bytes)?;
        Ok(request)
    }

    /// Read, analyze and store one file
    pub fn analyze_file(&self, path: &Path, options: &RequestOptions) -> Result<StoredResult> {
        let code = std::fs::read_to_string(path).map_err(|e| {
            OptError::unsupported_file(path.display().to_string(), e.to_string())
        })?;
        let request = self.request_for(path, code, options)?;
        let result = self.optimizer.analyze(&request);
        let id = self.store.insert(result.clone());
        debug!(%id, path = %path.display(), "Analysis stored");
        Ok(StoredResult { id, result })
    }
}

/// Analysis result with the ID it was stored under
#[derive(Debug, Clone)]
pub struct StoredResult {
    pub id: crate::types::AnalysisId,
    pub result: AnalysisResult,
}

/// Split a comma separated list, dropping empty entries
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Domain names as a set, for display
pub fn domain_names(result: &AnalysisResult) -> BTreeSet<&str> {
    result.domains.iter().map(|d| d.name.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn context() -> CommandContext {
        let mut config = Config::default();
        config.scoring.seed = Some(3);
        config.analysis.max_code_bytes = 64;
        CommandContext::from_config(config).unwrap()
    }

    #[test]
    fn test_output_format() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a, ,b "), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_request_for_defaults() {
        let ctx = context();
        let request = ctx
            .request_for(&PathBuf::from("src/app.ts"), "let x = 1;".into(), &RequestOptions::default())
            .unwrap();
        assert_eq!(request.language, "typescript");
        assert_eq!(request.optimization_types.len(), 3);
        assert!(request.applicable_domains.is_none());
    }

    #[test]
    fn test_request_for_options() {
        let ctx = context();
        let options = RequestOptions {
            types: Some("security".into()),
            language: Some("python".into()),
            domains: Some("Cybersecurity".into()),
        };
        let request = ctx
            .request_for(&PathBuf::from("x.txt"), "eval(x)".into(), &options)
            .unwrap();
        assert_eq!(request.language, "python");
        assert_eq!(request.optimization_types.len(), 1);
        assert!(request.allows_domain("cybersecurity"));
        assert!(!request.allows_domain("Mathematics"));
    }

    #[test]
    fn test_request_for_rejects_oversized_and_bad_types() {
        let ctx = context();
        let path = PathBuf::from("a.js");
        let big = ctx.request_for(&path, "x".repeat(100), &RequestOptions::default());
        assert!(matches!(big, Err(OptError::Validation(_))));

        let options = RequestOptions {
            types: Some("speed".into()),
            ..Default::default()
        };
        assert!(ctx.request_for(&path, "x".into(), &options).is_err());
    }

    #[test]
    fn test_analyze_file_stores_result() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dom.js");
        std::fs::write(&path, "el.innerHTML = v;").unwrap();

        let ctx = context();
        let stored = ctx.analyze_file(&path, &RequestOptions::default()).unwrap();
        assert_eq!(stored.id.get(), 1);
        assert_eq!(stored.result.optimized_code, "el.textContent = v;");
        assert_eq!(ctx.store.len(), 1);

        let missing = ctx.analyze_file(&dir.path().join("none.js"), &RequestOptions::default());
        assert!(matches!(missing, Err(OptError::UnsupportedFile { .. })));
    }
}
