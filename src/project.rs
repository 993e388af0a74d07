//! Persisted project state
//!
//! `graft.yaml` is the single root of persisted truth: the selected agents
//! and every configured source with its retained guidelines and prompts.
//! Every mutating command loads it, computes a new value, and writes it back
//! atomically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::copy;
use crate::paths;

/// File name of the project state document
pub const PROJECT_CONFIG_FILE_NAME: &str = "graft.yaml";

/// Directory under the project root holding vendored source content
pub const VENDOR_DIR_NAME: &str = "graft";

/// Directory a source's files are vendored into, relative to the project root
pub fn vendor_dir(source_name: &str) -> std::path::PathBuf {
    Path::new(VENDOR_DIR_NAME).join(source_name)
}

/// How a source's content is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "git-repo")]
    GitRepo,
    #[serde(rename = "local-path")]
    LocalPath,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::GitRepo => write!(f, "git-repo"),
            SourceKind::LocalPath => write!(f, "local-path"),
        }
    }
}

/// The project state structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ProjectSource>,
}

/// A configured guideline source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, rename = "ref", skip_serializing_if = "String::is_empty")]
    pub git_ref: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guidelines: Vec<ProjectGuideline>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<ProjectPrompt>,
}

/// A guideline retained in the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGuideline {
    pub name: String,
    pub file: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applicable_scenarios: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<String>,
}

/// A prompt retained in the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPrompt {
    pub name: String,
    pub file: String,
    pub description: String,
}

/// Error type for project state operations
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: std::path::PathBuf,
        source: serde_yaml::Error,
    },
    Serialize(serde_yaml::Error),
    Write(copy::CopyError),
    DuplicateSource(String),
    Path(paths::PathError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            ConfigError::Serialize(source) => {
                write!(f, "failed to serialize project state: {}", source)
            }
            ConfigError::Write(source) => write!(f, "{}", source),
            ConfigError::DuplicateSource(name) => write!(
                f,
                "source with name '{}' already exists, use --name to specify a different name",
                name
            ),
            ConfigError::Path(source) => write!(f, "{}", source),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize(source) => Some(source),
            ConfigError::Write(source) => Some(source),
            ConfigError::Path(source) => Some(source),
            ConfigError::DuplicateSource(_) => None,
        }
    }
}

impl From<copy::CopyError> for ConfigError {
    fn from(e: copy::CopyError) -> Self {
        ConfigError::Write(e)
    }
}

impl From<paths::PathError> for ConfigError {
    fn from(e: paths::PathError) -> Self {
        ConfigError::Path(e)
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl ProjectConfig {
    /// Load and parse the project state document
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Persist the project state atomically via temp-write-then-rename
    pub fn save_atomic(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(ConfigError::Serialize)?;
        copy::write_atomic(path, content.as_bytes())?;
        Ok(())
    }

    /// Find a source by name
    pub fn find_source(&self, name: &str) -> Option<&ProjectSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Append a new source, rejecting duplicate names
    pub fn add_source(&mut self, source: ProjectSource) -> Result<()> {
        if self.find_source(&source.name).is_some() {
            return Err(ConfigError::DuplicateSource(source.name));
        }
        self.sources.push(source);
        Ok(())
    }

    /// Replace the source with the given name. A missing name is a no-op,
    /// matching the append-or-replace flow in `update`.
    pub fn update_source(&mut self, name: &str, updated: ProjectSource) {
        if let Some(slot) = self.sources.iter_mut().find(|s| s.name == name) {
            *slot = updated;
        }
    }

    /// Replace the selected agent set
    pub fn set_agents(&mut self, agents: Vec<String>) {
        self.agents = agents;
    }

    /// Convert legacy absolute local-path records to project-relative form.
    /// Paths that genuinely live outside the project are left alone; that
    /// case is surfaced as a warning by `validate`, not rewritten here.
    pub fn migrate_to_relative_paths(&mut self, project_root: &Path) {
        for source in &mut self.sources {
            if source.kind == SourceKind::LocalPath && Path::new(&source.path).is_absolute() {
                if let Ok(rel) = paths::make_relative(project_root, Path::new(&source.path)) {
                    source.path = rel;
                }
            }
        }
    }
}

/// Example project state written by `graft init`
pub const EXAMPLE_PROJECT_YAML: &str = r#"# Graft project state
# Managed by the graft CLI. Run `graft add` to pull in guideline sources;
# editing this file by hand is rarely necessary.

version: 1

# AI agents selected by `graft update-agents`
# agents:
#   - claude-code
#   - cursor

# Guideline sources added by `graft add`
# sources:
#   - name: team-guidelines
#     type: git-repo
#     url: https://github.com/acme/team-guidelines
#     ref: main
"#;

/// Create an example project state file at the given path
pub fn create_example_project_config(path: &Path) -> std::io::Result<()> {
    fs::write(path, EXAMPLE_PROJECT_YAML)
}
