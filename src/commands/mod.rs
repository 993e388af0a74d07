//! CLI command implementations
//!
//! Each subcommand lives in its own module and returns a [`CommandError`].
//! The error distinguishes three situations a caller must treat differently:
//! ordinary recoverable failures, user cancellation, and critical partial
//! success where files were already mutated but the state write failed and
//! the state document needs manual attention.

pub mod add;
pub mod init;
pub mod list;
pub mod manifest;
pub mod remove;
pub mod sync;
pub mod update;
pub mod update_agents;
pub mod validate;

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;

use crate::copy::CopyError;
use crate::project::{ConfigError, ProjectConfig, PROJECT_CONFIG_FILE_NAME};
use crate::source::SourceError;
use crate::ui;

/// Error type shared by all commands
#[derive(Debug)]
pub enum CommandError {
    /// Invalid flag/argument combination
    Usage(String),
    /// No project state document in the current directory
    NotInitialized,
    /// Project state could not be loaded or saved
    Config(ConfigError),
    /// Fetching or validating a source failed
    Source(SourceError),
    /// A copy batch failed and was rolled back
    Copy(CopyError),
    /// The user declined a confirmation prompt
    Canceled,
    /// Ordinary operation failure
    Failed(String),
    /// Files were already mutated but the state write failed; the state
    /// document requires manual reconciliation. Never retried blindly.
    Critical(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Usage(msg) => write!(f, "{}", msg),
            CommandError::NotInitialized => write!(f, "project not initialized"),
            CommandError::Config(e) => write!(f, "{}", e),
            CommandError::Source(e) => write!(f, "{}", e),
            CommandError::Copy(e) => write!(f, "{}", e),
            CommandError::Canceled => write!(f, "canceled by user"),
            CommandError::Failed(msg) => write!(f, "{}", msg),
            CommandError::Critical(msg) => write!(f, "critical: {}", msg),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Config(e) => Some(e),
            CommandError::Source(e) => Some(e),
            CommandError::Copy(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        CommandError::Config(e)
    }
}

impl From<SourceError> for CommandError {
    fn from(e: SourceError) -> Self {
        CommandError::Source(e)
    }
}

impl From<CopyError> for CommandError {
    fn from(e: CopyError) -> Self {
        CommandError::Copy(e)
    }
}

impl CommandError {
    /// Exit code for the process: critical partial-success states get their
    /// own code so scripts can tell them from recoverable failures
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Critical(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Resolve the project root (the current working directory)
pub fn project_root() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|e| CommandError::Failed(format!("could not determine current directory: {}", e)))
}

/// Load the project state document, printing a friendly hint when the
/// project has not been initialized yet.
pub fn load_required_config(root: &std::path::Path) -> Result<ProjectConfig> {
    let path = root.join(PROJECT_CONFIG_FILE_NAME);
    if !path.exists() {
        println!("{} No project configuration found", ui::error("Error:"));
        println!(
            "  Run {} first to initialize a project",
            "graft init".cyan()
        );
        return Err(CommandError::NotInitialized);
    }
    ProjectConfig::load(&path).map_err(CommandError::Config)
}
