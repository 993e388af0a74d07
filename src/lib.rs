//! Graft - sync shared AI guidelines and prompts into your project
//!
//! One source of truth, every agent configured, user edits preserved.
//!
//! # Overview
//!
//! Graft keeps a project's set of shared "guideline" and "prompt" markdown
//! assets synchronized with an external source of truth (a git repository or
//! a local directory). It vendors the selected files under `graft/`, records
//! what it took in `graft.yaml`, and regenerates per-agent integration files
//! (AGENTS.md, CLAUDE.md, slash commands, workflow files) without touching
//! text the user wrote around the managed blocks.
//!
//! # How a sync works
//!
//! 1. The origin adapter fetches a manifest snapshot and a readable content
//!    root ([`source`]).
//! 2. The reconciler partitions the project's guidelines against the
//!    manifest into unchanged / updated / new / removed ([`diff`]).
//! 3. A selection decision (flags or prompt) picks what to keep.
//! 4. The selected files are copied with all-or-nothing semantics and the
//!    state document is written atomically ([`copy`], [`project`]).
//! 5. Integration files are regenerated, replacing only the marker-delimited
//!    managed region ([`managed`], [`agents`]).
//!
//! Every path that crosses the project boundary goes through [`paths`]
//! first; anything that escapes the project root is rejected.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use graft::project::ProjectConfig;
//!
//! let cfg = ProjectConfig::load(Path::new("graft.yaml")).unwrap();
//! let source = &cfg.sources[0];
//! println!("{} guidelines from {}", source.guidelines.len(), source.name);
//! ```

pub mod agents;
pub mod commands;
pub mod copy;
pub mod diff;
pub mod git;
pub mod managed;
pub mod manifest;
pub mod naming;
pub mod paths;
pub mod project;
pub mod source;
pub mod ui;
pub mod validate;

pub use commands::CommandError;
pub use diff::{compare_guidelines, extract_referenced_prompts, GuidelineComparison};
pub use managed::{
    append_managed_block, detect_managed_block, remove_managed_block, replace_managed_block,
    MANAGED_BLOCK_END, MANAGED_BLOCK_START,
};
pub use manifest::{Manifest, ManifestGuideline, ManifestPrompt, MANIFEST_FILE_NAME};
pub use project::{
    ProjectConfig, ProjectGuideline, ProjectPrompt, ProjectSource, SourceKind,
    PROJECT_CONFIG_FILE_NAME,
};
pub use validate::{validate_manifest, ValidationError, ValidationErrors};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify core constants are re-exported from the crate root
        assert_eq!(PROJECT_CONFIG_FILE_NAME, "graft.yaml");
        assert_eq!(MANIFEST_FILE_NAME, "graft-manifest.yaml");
        assert!(MANAGED_BLOCK_START.contains("GRAFT"));
    }
}
