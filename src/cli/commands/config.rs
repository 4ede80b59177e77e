//! Config Command
//!
//! Manage codeopt configuration.
//!
//! Usage:
//!   codeopt config show [-f json]
//!   codeopt config path
//!   codeopt config init [--force]

use crate::cli::util::OutputFormat;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    ConfigLoader::show_config(format == OutputFormat::Json)
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize project configuration in the current directory
pub fn init(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    let config_path = ConfigLoader::init_project(&root, force)?;
    println!("✓ Initialized project configuration");
    println!("  Config: {}", config_path.display());
    Ok(())
}
