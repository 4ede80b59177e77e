use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::analyzer::Language;
use crate::catalog::PatternCatalog;
use crate::constants::analysis::MAX_FILE_SIZE;
use crate::types::{OptError, Result};

/// Default directories to skip
const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    ".git",
    "build",
    "dist",
    "__pycache__",
    "vendor",
    ".venv",
];

/// Walks a directory for files the catalog has rules for
pub struct FileScanner {
    root: PathBuf,
    exclude: Vec<String>,
    max_file_size: u64,
    languages: Option<Vec<Language>>,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude: vec![],
            max_file_size: MAX_FILE_SIZE,
            languages: None,
        }
    }

    /// Glob patterns, matched against paths relative to the root
    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Restrict to these languages instead of every language with rules
    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = Some(languages);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(OptError::unsupported_file(
                self.root.display().to_string(),
                "not a directory",
            ));
        }

        let excludes = self
            .exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p)
                    .map_err(|e| OptError::Config(format!("invalid exclude pattern '{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .build();

        let mut files = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            if Self::in_skipped_dir(relative) {
                continue;
            }

            let relative_str = relative.to_string_lossy();
            if excludes.iter().any(|p| p.matches(&relative_str)) {
                debug!("Excluded by pattern: {}", relative_str);
                continue;
            }

            let language = Language::from_path(path);
            if !self.accepts(language) {
                continue;
            }

            match path.metadata() {
                Ok(metadata) if metadata.len() > self.max_file_size => {
                    debug!(
                        "Skipping {} ({} bytes over limit)",
                        relative_str,
                        metadata.len() - self.max_file_size
                    );
                }
                Ok(metadata) => files.push(ScannedFile {
                    path: path.to_path_buf(),
                    size: metadata.len(),
                    language,
                }),
                Err(e) => warn!("Cannot read metadata for {}: {}", path.display(), e),
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Get relative paths as strings
    pub fn paths(&self) -> Result<Vec<String>> {
        let files = self.scan()?;
        Ok(files
            .into_iter()
            .filter_map(|f| {
                f.path
                    .strip_prefix(&self.root)
                    .ok()
                    .map(|p| p.to_string_lossy().to_string())
            })
            .collect())
    }

    fn in_skipped_dir(relative: &Path) -> bool {
        relative.components().any(|c| match c {
            Component::Normal(name) => name
                .to_str()
                .is_some_and(|name| DEFAULT_SKIP_DIRS.contains(&name)),
            _ => false,
        })
    }

    fn accepts(&self, language: Language) -> bool {
        match &self.languages {
            Some(languages) => languages.contains(&language),
            None => PatternCatalog::builtin()
                .rules()
                .iter()
                .any(|rule| rule.applies_to(language)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/app.js", "var a = 1;");
        touch(dir.path(), "src/view.tsx", "el.innerHTML = x;");
        touch(dir.path(), "tools/gen.py", "x = eval(s)");
        touch(dir.path(), "src/lib.rs", "fn main() {}");
        touch(dir.path(), "README.md", "# readme");
        touch(dir.path(), "node_modules/pkg/index.js", "var b = 2;");
        touch(dir.path(), "web/dist/app.js", "var c = 3;");
        touch(dir.path(), "public/vendor.min.js", "var d=4;");
        dir
    }

    #[test]
    fn test_scan_keeps_rule_languages() {
        let dir = fixture();
        let paths = FileScanner::new(dir.path()).paths().unwrap();
        assert_eq!(
            paths,
            vec![
                "public/vendor.min.js".to_string(),
                "src/app.js".to_string(),
                "src/view.tsx".to_string(),
                "tools/gen.py".to_string(),
            ]
        );
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = fixture();
        let paths = FileScanner::new(dir.path())
            .with_exclude(vec!["**/*.min.js".to_string(), "tools/**".to_string()])
            .paths()
            .unwrap();
        assert_eq!(paths, vec!["src/app.js".to_string(), "src/view.tsx".to_string()]);
    }

    #[test]
    fn test_language_filter_and_size_limit() {
        let dir = fixture();
        touch(dir.path(), "big.py", &"x = 1\n".repeat(100));

        let files = FileScanner::new(dir.path())
            .with_languages(vec![Language::Python])
            .with_max_file_size(64)
            .scan()
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("tools/gen.py"));
        assert_eq!(files[0].language, Language::Python);
    }

    #[test]
    fn test_invalid_root_and_pattern() {
        let dir = fixture();
        assert!(FileScanner::new(dir.path().join("missing")).scan().is_err());
        assert!(matches!(
            FileScanner::new(dir.path())
                .with_exclude(vec!["[".to_string()])
                .scan(),
            Err(OptError::Config(_))
        ));
    }
}
