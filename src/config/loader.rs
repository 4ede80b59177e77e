//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/codeopt/config.toml)
//! 3. Project config (.codeopt/config.toml)
//! 4. Environment variables (CODEOPT_* prefix, `__` between section and key)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{OptError, Result};

const ENV_PREFIX: &str = "CODEOPT_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let global = Self::global_config_path();
        let project = Self::project_config_path();
        Self::load_layers(global.as_deref(), &project, ENV_PREFIX)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| OptError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn load_layers(global: Option<&Path>, project: &Path, env_prefix: &str) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        // Field names contain underscores, so sections split on `__`
        // (e.g., CODEOPT_SCORING__PLACEHOLDER_MIN -> scoring.placeholder_min)
        figment = figment.merge(Env::prefixed(env_prefix).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| OptError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/codeopt/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("codeopt"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".codeopt")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| OptError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize project configuration under `root`
    pub fn init_project(root: &Path, force: bool) -> Result<PathBuf> {
        let project_dir = root.join(Self::project_dir());
        fs::create_dir_all(&project_dir)?;

        let config_path = project_dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_project_config())?;
            info!("Created project config: {}", config_path.display());
        } else {
            info!("Project config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Generate default project config content (TOML)
    fn default_project_config() -> String {
        r#"# codeopt Project Configuration
# Project-specific settings that override global defaults.

version = "1.0"

[analysis]
default_types = ["performance", "security", "readability"]
max_code_bytes = 1048576
# applicable_domains = ["Mathematics", "Cybersecurity"]
exclude = ["**/*.min.js", "**/*.bundle.js"]

# Placeholder scores for axes no rule touched
[scoring]
placeholder_min = 70
placeholder_max = 90
# seed = 42

[knowledge]
# domains_path = "domains.json"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_layers(
            None,
            &temp_dir.path().join("missing.toml"),
            "CODEOPT_TEST_NONE_",
        )
        .unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.scoring.placeholder_min, 70);
    }

    #[test]
    fn test_init_project_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::init_project(temp_dir.path(), false).unwrap();

        assert!(path.ends_with(".codeopt/config.toml"));
        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.analysis.default_types.len(), 3);
        assert_eq!(config.scoring.seed, None);
    }

    #[test]
    fn test_init_project_keeps_existing_unless_forced() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::init_project(temp_dir.path(), false).unwrap();
        fs::write(&path, "version = \"custom\"\n").unwrap();

        ConfigLoader::init_project(temp_dir.path(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"custom\"\n");

        ConfigLoader::init_project(temp_dir.path(), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[scoring]"));
    }

    #[test]
    fn test_project_overrides_global() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project.toml");
        fs::write(&global, "[scoring]\nplaceholder_min = 60\nseed = 1\n").unwrap();
        fs::write(&project, "[scoring]\nseed = 7\n").unwrap();

        let config =
            ConfigLoader::load_layers(Some(&global), &project, "CODEOPT_TEST_LAYERS_").unwrap();
        assert_eq!(config.scoring.placeholder_min, 60);
        assert_eq!(config.scoring.seed, Some(7));
    }

    #[test]
    fn test_env_override() {
        let temp_dir = TempDir::new().unwrap();
        // SAFETY: the prefix is unique to this test
        unsafe {
            std::env::set_var("CODEOPT_TEST_ENV_SCORING__PLACEHOLDER_MAX", "85");
        }
        let config = ConfigLoader::load_layers(
            None,
            &temp_dir.path().join("missing.toml"),
            "CODEOPT_TEST_ENV_",
        )
        .unwrap();
        assert_eq!(config.scoring.placeholder_max, 85);
        unsafe {
            std::env::remove_var("CODEOPT_TEST_ENV_SCORING__PLACEHOLDER_MAX");
        }
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[scoring]\nplaceholder_min = 95\nplaceholder_max = 75\n").unwrap();
        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(OptError::Config(_))
        ));
    }
}
