//! codeopt - Pattern-Based Code Rewrite Engine
//!
//! Accepts source code and returns a synthetic optimization analysis: per-axis
//! scores, an improvement percentage, rewritten code, narrative insights and
//! knowledge domain tags.
//!
//! ## Core Features
//!
//! - **Pattern Catalog**: canned rewrite rules for JavaScript/TypeScript and Python
//! - **Rewrite Engine**: one rule at a time, failures absorbed
//! - **Scoring Composer**: declared scores, bounded placeholders, insights
//! - **Knowledge Tagging**: techniques mapped onto a domain table
//!
//! Detectors are regular expressions over raw text. There is no parsing and no
//! guarantee that a rewrite preserves behavior.
//!
//! ## Quick Start
//!
//! ```ignore
//! use codeopt::{AnalysisRequest, Optimizer};
//!
//! let optimizer = Optimizer::builtin();
//! let request = AnalysisRequest::new("element.innerHTML = x;", "dom.js", "javascript");
//! let result = optimizer.analyze(&request);
//! assert_eq!(result.optimized_code, "element.textContent = x;");
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: rule registry and per-language rewrites
//! - [`engine`]: single-rule application
//! - [`composer`]: result assembly and placeholder scoring
//! - [`knowledge`]: domain lookup
//! - [`store`]: injected result storage
//! - [`analyzer`]: language detection and file scanning
//! - [`config`]: layered configuration

pub mod analyzer;
pub mod catalog;
pub mod cli;
pub mod composer;
pub mod config;
pub mod constants;
pub mod engine;
pub mod knowledge;
pub mod optimizer;
pub mod store;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use catalog::{PatternCatalog, Rule};
pub use composer::{PlaceholderScores, ScoringComposer};
pub use engine::RewriteEngine;
pub use knowledge::KnowledgeBase;
pub use optimizer::Optimizer;

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{OptError, Result, RewriteError, ValidationError};

// Data Model
pub use types::{
    AnalysisId, AnalysisRequest, AnalysisResult, Domain, DomainTag, Insight, Metrics,
    OptimizationType,
};

// Storage
pub use store::{InMemoryStore, ResultStore, StoredAnalysis};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{FileScanner, Language};
