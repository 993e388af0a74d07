//! Guideline reconciliation
//!
//! Pure functions that partition the project's current guideline metadata
//! against a freshly fetched manifest. File bodies are never inspected here;
//! they are recopied from the source regardless of how the metadata diff
//! comes out.

use std::collections::BTreeSet;

use crate::manifest::{Manifest, ManifestGuideline, ManifestPrompt};
use crate::project::{ProjectGuideline, ProjectPrompt};

/// Partition of guideline names produced by comparing project state against
/// a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuidelineComparison {
    /// Present in both, metadata differs
    pub updated: Vec<String>,
    /// Present in the manifest only
    pub new: Vec<String>,
    /// Present in project state only (orphaned by the source)
    pub removed: Vec<String>,
    /// Present in both, metadata identical
    pub unchanged: Vec<String>,
}

/// Compare current project guidelines with the latest manifest guidelines.
///
/// Names are emitted in sorted order so the partition is deterministic for
/// identical inputs.
pub fn compare_guidelines(
    current: &[ProjectGuideline],
    manifest: &[ManifestGuideline],
) -> GuidelineComparison {
    let current_names: BTreeSet<&str> = current.iter().map(|g| g.name.as_str()).collect();
    let manifest_names: BTreeSet<&str> = manifest.iter().map(|g| g.name.as_str()).collect();

    let mut result = GuidelineComparison::default();

    for name in &current_names {
        let cur = current.iter().find(|g| g.name == *name);
        match manifest.iter().find(|g| g.name == *name) {
            Some(latest) => {
                let changed = cur.is_some_and(|c| has_changes(c, latest));
                if changed {
                    result.updated.push((*name).to_string());
                } else {
                    result.unchanged.push((*name).to_string());
                }
            }
            None => result.removed.push((*name).to_string()),
        }
    }

    for name in &manifest_names {
        if !current_names.contains(name) {
            result.new.push((*name).to_string());
        }
    }

    result
}

/// Metadata equality: description plus the ordered scenario and prompt
/// lists. File content is deliberately not part of this check.
fn has_changes(current: &ProjectGuideline, latest: &ManifestGuideline) -> bool {
    current.description != latest.description
        || current.applicable_scenarios != latest.applicable_scenarios
        || current.prompts != latest.prompts
}

/// Filter manifest prompts down to exactly those referenced by the selected
/// guidelines. Prompts nothing references are dropped even when the
/// manifest still lists them.
pub fn extract_referenced_prompts(
    selected: &[ManifestGuideline],
    all_prompts: &[ManifestPrompt],
) -> Vec<ProjectPrompt> {
    let referenced: BTreeSet<&str> = selected
        .iter()
        .flat_map(|g| g.prompts.iter().map(|p| p.as_str()))
        .collect();

    all_prompts
        .iter()
        .filter(|p| referenced.contains(p.name.as_str()))
        .map(|p| ProjectPrompt {
            name: p.name.clone(),
            file: p.file.clone(),
            description: p.description.clone(),
        })
        .collect()
}

/// Convert manifest guidelines into their project-state form
pub fn to_project_guidelines(guidelines: &[ManifestGuideline]) -> Vec<ProjectGuideline> {
    guidelines
        .iter()
        .map(|g| ProjectGuideline {
            name: g.name.clone(),
            file: g.file.clone(),
            description: g.description.clone(),
            applicable_scenarios: g.applicable_scenarios.clone(),
            prompts: g.prompts.clone(),
        })
        .collect()
}

/// Rebuild a source's retained guideline list after a selection decision.
///
/// Every retained name takes its metadata from the manifest, never from the
/// old project-side values, so a retained-but-updated guideline always picks
/// up the latest description, scenarios, and prompt references. Names
/// missing from the manifest are orphaned and dropped; `added_new` appends
/// newly accepted guidelines.
pub fn retain_guidelines(
    current: &[ProjectGuideline],
    manifest: &Manifest,
    added_new: &[String],
) -> Vec<ManifestGuideline> {
    let mut retained = Vec::new();

    for g in current {
        if let Some(latest) = manifest.find_guideline(&g.name) {
            retained.push(latest.clone());
        }
    }

    for name in added_new {
        if let Some(latest) = manifest.find_guideline(name) {
            retained.push(latest.clone());
        }
    }

    retained
}
