//! Manifest document for guideline sources
//!
//! A source repository describes what it offers in a `graft-manifest.yaml`
//! at its root. The manifest is ephemeral on the consuming side: it is
//! fetched, validated, diffed against project state, and discarded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// File name of the manifest at a source root
pub const MANIFEST_FILE_NAME: &str = "graft-manifest.yaml";

/// The manifest structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    #[serde(default)]
    pub guidelines: Vec<ManifestGuideline>,
    #[serde(default)]
    pub prompts: Vec<ManifestPrompt>,
}

/// A single guideline entry in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestGuideline {
    pub name: String,
    pub file: String,
    pub description: String,
    #[serde(default)]
    pub applicable_scenarios: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<String>,
}

/// A single prompt entry in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPrompt {
    pub name: String,
    pub file: String,
    pub description: String,
}

/// Error type for manifest I/O
#[derive(Debug)]
pub enum ManifestError {
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: std::path::PathBuf,
        source: serde_yaml::Error,
    },
    Serialize(serde_yaml::Error),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io { path, source } => {
                write!(f, "failed to read manifest {}: {}", path.display(), source)
            }
            ManifestError::Parse { path, source } => {
                write!(f, "failed to parse manifest {}: {}", path.display(), source)
            }
            ManifestError::Serialize(source) => {
                write!(f, "failed to serialize manifest: {}", source)
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Io { source, .. } => Some(source),
            ManifestError::Parse { source, .. } => Some(source),
            ManifestError::Serialize(source) => Some(source),
        }
    }
}

impl Manifest {
    /// Load and parse a manifest file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write a manifest file
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let content = serde_yaml::to_string(self).map_err(ManifestError::Serialize)?;
        fs::write(path, content).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a guideline by name
    pub fn find_guideline(&self, name: &str) -> Option<&ManifestGuideline> {
        self.guidelines.iter().find(|g| g.name == name)
    }
}

/// Example manifest content written by `graft manifest init`
pub const EXAMPLE_MANIFEST_YAML: &str = r#"# Graft manifest
# This file defines the guidelines and prompts available in this repository.

version: 1

guidelines:
  # Example guideline entry
  - name: rust-style
    file: guidelines/rust-style.md
    description: Rust style conventions and best practices
    applicable_scenarios:
      - "Writing Rust code"
      - "Reviewing Rust code"
    prompts:
      - code-review
      - implementation

  # Add more guidelines here
  # - name: rest-api
  #   file: guidelines/rest-api.md
  #   description: RESTful API design guidelines
  #   applicable_scenarios:
  #     - "Designing REST APIs"

prompts:
  # Example prompt entry
  - name: code-review
    file: prompts/code-review.md
    description: Prompt for conducting thorough code reviews

  - name: implementation
    file: prompts/implementation.md
    description: Prompt for implementing new features
"#;

/// Create an example manifest file at the given path
pub fn create_example_manifest(path: &Path) -> std::io::Result<()> {
    fs::write(path, EXAMPLE_MANIFEST_YAML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let yaml = r#"
version: 1
guidelines:
  - name: rust-style
    file: guidelines/rust-style.md
    description: Rust style conventions
    applicable_scenarios:
      - "Writing Rust code"
    prompts:
      - code-review
prompts:
  - name: code-review
    file: prompts/code-review.md
    description: Code review prompt
"#;
        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(manifest.version, 1);
        assert_eq!(manifest.guidelines.len(), 1);
        assert_eq!(manifest.guidelines[0].name, "rust-style");
        assert_eq!(manifest.guidelines[0].prompts, vec!["code-review"]);
        assert_eq!(manifest.prompts.len(), 1);
    }

    #[test]
    fn test_parse_manifest_optional_fields() {
        let yaml = r#"
version: 1
guidelines:
  - name: minimal
    file: guidelines/minimal.md
    description: Minimal entry
"#;
        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
        assert!(manifest.guidelines[0].applicable_scenarios.is_empty());
        assert!(manifest.guidelines[0].prompts.is_empty());
        assert!(manifest.prompts.is_empty());
    }

    #[test]
    fn test_example_manifest_parses() {
        let manifest: Manifest = serde_yaml::from_str(EXAMPLE_MANIFEST_YAML).unwrap();
        assert_eq!(manifest.version, 1);
        assert!(!manifest.guidelines.is_empty());
        assert!(!manifest.prompts.is_empty());
    }

    #[test]
    fn test_load_missing_manifest() {
        let err = Manifest::load(Path::new("/nonexistent/graft-manifest.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read manifest"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);

        let manifest: Manifest = serde_yaml::from_str(EXAMPLE_MANIFEST_YAML).unwrap();
        manifest.save(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded.version, manifest.version);
        assert_eq!(loaded.guidelines, manifest.guidelines);
        assert_eq!(loaded.prompts, manifest.prompts);
    }

    #[test]
    fn test_find_guideline() {
        let manifest: Manifest = serde_yaml::from_str(EXAMPLE_MANIFEST_YAML).unwrap();
        assert!(manifest.find_guideline("rust-style").is_some());
        assert!(manifest.find_guideline("nope").is_none());
    }
}
