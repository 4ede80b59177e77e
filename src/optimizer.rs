//! Optimizer Facade
//!
//! Wires catalog, engine, composer and knowledge base into a single
//! `analyze(request) -> result` entry point. Safe to share across threads.

use std::sync::Arc;

use tracing::{debug, info};

use crate::analyzer::Language;
use crate::catalog::PatternCatalog;
use crate::composer::{PlaceholderScores, ScoringComposer};
use crate::config::Config;
use crate::knowledge::KnowledgeBase;
use crate::types::{AnalysisRequest, AnalysisResult, Result};

pub struct Optimizer {
    catalog: PatternCatalog,
    composer: ScoringComposer,
}

impl Optimizer {
    pub fn new(knowledge: Arc<KnowledgeBase>, placeholder: PlaceholderScores) -> Self {
        let catalog = PatternCatalog::builtin();
        let composer = ScoringComposer::new(catalog.fallback(), knowledge, placeholder);
        Self { catalog, composer }
    }

    /// Built-in domain table and default placeholder range
    pub fn builtin() -> Self {
        Self::new(Arc::new(KnowledgeBase::builtin()), PlaceholderScores::default())
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let knowledge = match &config.knowledge.domains_path {
            Some(path) => {
                info!("Loading domain table from {}", path.display());
                KnowledgeBase::from_json_file(path)?
            }
            None => KnowledgeBase::builtin(),
        };
        Ok(Self::new(
            Arc::new(knowledge),
            PlaceholderScores::from_config(&config.scoring),
        ))
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        self.composer.knowledge()
    }

    /// Analyze one request. Never fails: malformed input takes the fallback path.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let language = Language::resolve(&request.language, &request.filename);
        let fired = self
            .catalog
            .select(&request.code, language, &request.optimization_types);
        debug!(
            filename = %request.filename,
            %language,
            fired = fired.len(),
            "Selected rules"
        );
        self.composer.compose(request, language, &fired)
    }
}
