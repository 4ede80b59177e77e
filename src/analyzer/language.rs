//! Language Detection Module
//!
//! **Single source of truth** for language identification. Requests carry a
//! free-form language string; the catalog keys its rules on [`Language`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use codeopt::analyzer::Language;
//!
//! let lang = Language::from_path("src/app.ts");
//! assert_eq!(lang, Language::TypeScript);
//! assert!(lang.is_javascript_family());
//!
//! // Declared language wins, the filename fills in when it is unknown
//! let lang = Language::resolve("text", "script.py");
//! assert_eq!(lang, Language::Python);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Language Metadata Table - Single Source of Truth
// =============================================================================

/// Language metadata entry
struct LanguageMeta {
    /// Display name (human-readable)
    display_name: &'static str,
    /// Lowercase identifier, also used for syntax highlighting
    highlight_str: &'static str,
    /// File extensions that map to this language
    extensions: &'static [&'static str],
    /// Alternative names for parsing from string
    aliases: &'static [&'static str],
}

/// Macro to define language metadata concisely
macro_rules! lang_meta {
    ($display:literal, $highlight:literal, [$($ext:literal),*], [$($alias:literal),*]) => {
        LanguageMeta {
            display_name: $display,
            highlight_str: $highlight,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
        }
    };
}

impl Language {
    /// Get metadata for this language variant
    fn meta(&self) -> LanguageMeta {
        match self {
            // Web
            Language::JavaScript => lang_meta!("JavaScript", "javascript", ["js", "mjs", "cjs"], ["javascript", "js", "node"]),
            Language::TypeScript => lang_meta!("TypeScript", "typescript", ["ts", "mts", "cts"], ["typescript", "ts"]),
            Language::Jsx => lang_meta!("JSX", "jsx", ["jsx"], ["jsx"]),
            Language::Tsx => lang_meta!("TSX", "tsx", ["tsx"], ["tsx"]),

            // Scripting
            Language::Python => lang_meta!("Python", "python", ["py", "pyi", "pyw"], ["python", "py", "python3"]),
            Language::Ruby => lang_meta!("Ruby", "ruby", ["rb"], ["ruby", "rb"]),

            // Systems
            Language::Rust => lang_meta!("Rust", "rust", ["rs"], ["rust", "rs"]),
            Language::Go => lang_meta!("Go", "go", ["go"], ["go", "golang"]),
            Language::C => lang_meta!("C", "c", ["c", "h"], ["c"]),
            Language::Cpp => lang_meta!("C++", "cpp", ["cpp", "cc", "cxx", "hpp"], ["cpp", "c++", "cxx"]),
            Language::Java => lang_meta!("Java", "java", ["java"], ["java"]),
            Language::CSharp => lang_meta!("C#", "csharp", ["cs"], ["csharp", "c#", "cs"]),

            Language::Unknown => lang_meta!("Unknown", "text", [], ["unknown", "text", ""]),
        }
    }
}

// =============================================================================
// Language Enum Definition
// =============================================================================

/// Languages recognized by the analyzer.
///
/// Only the JavaScript family and Python carry rewrite rules; the rest are
/// recognized so that results report a sensible language name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
    Python,
    Ruby,
    Rust,
    Go,
    C,
    Cpp,
    Java,
    CSharp,
    #[default]
    Unknown,
}

// =============================================================================
// Language Methods (using metadata table)
// =============================================================================

impl Language {
    /// Display name (human-readable)
    pub fn as_str(&self) -> &'static str {
        self.meta().display_name
    }

    /// Lowercase identifier (`"javascript"`, `"python"`, ...)
    pub fn highlight_str(&self) -> &'static str {
        self.meta().highlight_str
    }

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.to_lowercase();

        for lang in Self::all_variants() {
            if lang.meta().extensions.iter().any(|e| *e == ext_lower) {
                return *lang;
            }
        }

        Language::Unknown
    }

    /// Detect language from file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Resolve a request's language: the declared name when recognized,
    /// otherwise whatever the filename extension says.
    pub fn resolve(declared: &str, filename: &str) -> Self {
        match declared.parse::<Language>() {
            Ok(lang) if lang.is_known() => lang,
            _ => Self::from_path(filename),
        }
    }

    /// Check if this is a known language (not Unknown)
    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Unknown)
    }

    /// JavaScript, TypeScript and their JSX variants share one rule set
    pub fn is_javascript_family(&self) -> bool {
        matches!(
            self,
            Language::JavaScript | Language::TypeScript | Language::Jsx | Language::Tsx
        )
    }

    /// Whether the source may carry type annotations (`n: number`)
    pub fn is_typed_javascript(&self) -> bool {
        matches!(self, Language::TypeScript | Language::Tsx)
    }

    /// Get all language variants for iteration
    pub fn all_variants() -> &'static [Language] {
        &[
            Language::JavaScript, Language::TypeScript, Language::Jsx, Language::Tsx,
            Language::Python, Language::Ruby, Language::Rust, Language::Go,
            Language::C, Language::Cpp, Language::Java, Language::CSharp,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.trim().to_lowercase();

        for lang in Self::all_variants() {
            if lang.meta().aliases.iter().any(|a| *a == s_lower) {
                return Ok(*lang);
            }
        }

        if s_lower.is_empty() || s_lower == "unknown" || s_lower == "text" {
            return Ok(Language::Unknown);
        }

        Err(())
    }
}
