//! Source Analyzer Module
//!
//! Language identification and source file discovery:
//! - Language detection from declared names and file extensions
//! - File scanning with gitignore support

pub mod language;
pub mod scanner;

pub use language::Language;
pub use scanner::{FileScanner, ScannedFile};
