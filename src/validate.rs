//! Manifest validation
//!
//! All violations are collected and reported together rather than stopping
//! at the first, so a maintainer can fix a manifest in one pass. Validation
//! runs before any reconciliation or file mutation.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::Path;

use crate::manifest::{Manifest, ManifestGuideline, ManifestPrompt};

lazy_static! {
    // Valid spinal-case names: lowercase alphanumeric segments joined by hyphens
    static ref SPINAL_CASE: Regex = Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").unwrap();
}

/// A single validation error with the field it applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A collection of validation errors
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            0 => write!(f, "no errors"),
            1 => write!(f, "{}", self.0[0]),
            n => write!(f, "{} validation errors", n),
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Check a name against the spinal-case convention
pub fn is_spinal_case(name: &str) -> bool {
    SPINAL_CASE.is_match(name)
}

/// Validate a manifest against `base_dir`, the directory holding the files
/// it references. Returns every violation found.
pub fn validate_manifest(manifest: &Manifest, base_dir: &Path) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if manifest.version == 0 {
        errors.add("version", "missing required field: version");
    }

    let mut guideline_names: Vec<&str> = Vec::new();
    for (i, guideline) in manifest.guidelines.iter().enumerate() {
        let prefix = format!("guidelines[{}]", i);
        errors.extend(validate_guideline(guideline, &prefix, base_dir, &mut guideline_names));
    }

    let mut prompt_names: Vec<&str> = Vec::new();
    for (i, prompt) in manifest.prompts.iter().enumerate() {
        let prefix = format!("prompts[{}]", i);
        errors.extend(validate_prompt(prompt, &prefix, base_dir, &mut prompt_names));
    }

    // Cross-references: every prompt a guideline names must exist
    for (i, guideline) in manifest.guidelines.iter().enumerate() {
        for prompt_name in &guideline.prompts {
            if !prompt_names.contains(&prompt_name.as_str()) {
                errors.add(
                    format!("guidelines[{}].prompts", i),
                    format!(
                        "guideline '{}' references non-existent prompt '{}'",
                        guideline.name, prompt_name
                    ),
                );
            }
        }
    }

    errors
}

fn validate_guideline<'a>(
    g: &'a ManifestGuideline,
    prefix: &str,
    base_dir: &Path,
    seen_names: &mut Vec<&'a str>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if g.name.is_empty() {
        errors.add(format!("{}.name", prefix), "missing required field: name");
    } else {
        if seen_names.contains(&g.name.as_str()) {
            errors.add(
                format!("{}.name", prefix),
                format!("duplicate guideline name: {}", g.name),
            );
        }
        seen_names.push(&g.name);

        if !is_spinal_case(&g.name) {
            errors.add(
                format!("{}.name", prefix),
                format!(
                    "invalid naming format: '{}' (expected spinal-case: lowercase letters and hyphens only)",
                    g.name
                ),
            );
        }
    }

    if g.file.is_empty() {
        errors.add(format!("{}.file", prefix), "missing required field: file");
    } else {
        errors.extend(validate_file_path(
            &g.file,
            &format!("{}.file", prefix),
            base_dir,
            "guidelines/",
        ));
    }

    if g.description.is_empty() {
        errors.add(
            format!("{}.description", prefix),
            "missing required field: description",
        );
    }

    if g.applicable_scenarios.is_empty() {
        errors.add(
            format!("{}.applicable_scenarios", prefix),
            format!(
                "guideline '{}' has empty applicable_scenarios (required for AGENTS.md)",
                g.name
            ),
        );
    }

    errors
}

fn validate_prompt<'a>(
    p: &'a ManifestPrompt,
    prefix: &str,
    base_dir: &Path,
    seen_names: &mut Vec<&'a str>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if p.name.is_empty() {
        errors.add(format!("{}.name", prefix), "missing required field: name");
    } else {
        if seen_names.contains(&p.name.as_str()) {
            errors.add(
                format!("{}.name", prefix),
                format!("duplicate prompt name: {}", p.name),
            );
        }
        seen_names.push(&p.name);

        if !is_spinal_case(&p.name) {
            errors.add(
                format!("{}.name", prefix),
                format!(
                    "invalid naming format: '{}' (expected spinal-case: lowercase letters and hyphens only)",
                    p.name
                ),
            );
        }
    }

    if p.file.is_empty() {
        errors.add(format!("{}.file", prefix), "missing required field: file");
    } else {
        errors.extend(validate_file_path(
            &p.file,
            &format!("{}.file", prefix),
            base_dir,
            "prompts/",
        ));
    }

    if p.description.is_empty() {
        errors.add(
            format!("{}.description", prefix),
            "missing required field: description",
        );
    }

    errors
}

/// Validate a manifest file reference: relative, traversal-free, under the
/// expected subtree, and present on disk.
fn validate_file_path(
    path: &str,
    field: &str,
    base_dir: &Path,
    expected_prefix: &str,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if Path::new(path).is_absolute() {
        errors.add(field, format!("absolute paths not allowed: {}", path));
        return errors;
    }

    if path.split('/').any(|seg| seg == "..") {
        errors.add(field, format!("path traversal not allowed: {}", path));
        return errors;
    }

    if !path.starts_with(expected_prefix) {
        errors.add(
            field,
            format!("path must be within {}: {}", expected_prefix, path),
        );
        return errors;
    }

    if !base_dir.join(path).exists() {
        errors.add(field, format!("file not found: {}", path));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn valid_manifest() -> Manifest {
        Manifest {
            version: 1,
            guidelines: vec![ManifestGuideline {
                name: "rust-style".to_string(),
                file: "guidelines/rust-style.md".to_string(),
                description: "Rust style conventions".to_string(),
                applicable_scenarios: vec!["Writing Rust code".to_string()],
                prompts: vec!["code-review".to_string()],
            }],
            prompts: vec![ManifestPrompt {
                name: "code-review".to_string(),
                file: "prompts/code-review.md".to_string(),
                description: "Code review prompt".to_string(),
            }],
        }
    }

    fn materialize(dir: &TempDir, manifest: &Manifest) {
        for g in &manifest.guidelines {
            let path = dir.path().join(&g.file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "guideline body").unwrap();
        }
        for p in &manifest.prompts {
            let path = dir.path().join(&p.file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "prompt body").unwrap();
        }
    }

    #[test]
    fn test_valid_manifest_passes() {
        let dir = TempDir::new().unwrap();
        let manifest = valid_manifest();
        materialize(&dir, &manifest);

        let errors = validate_manifest(&manifest, dir.path());
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn test_missing_version() {
        let dir = TempDir::new().unwrap();
        let mut manifest = valid_manifest();
        materialize(&dir, &manifest);
        manifest.version = 0;

        let errors = validate_manifest(&manifest, dir.path());
        assert!(errors.iter().any(|e| e.field == "version"));
    }

    #[test]
    fn test_duplicate_names() {
        let dir = TempDir::new().unwrap();
        let mut manifest = valid_manifest();
        materialize(&dir, &manifest);
        manifest.guidelines.push(manifest.guidelines[0].clone());

        let errors = validate_manifest(&manifest, dir.path());
        assert!(errors
            .iter()
            .any(|e| e.message.contains("duplicate guideline name")));
    }

    #[test]
    fn test_invalid_naming() {
        let dir = TempDir::new().unwrap();
        let mut manifest = valid_manifest();
        materialize(&dir, &manifest);
        manifest.guidelines[0].name = "Rust_Style".to_string();

        let errors = validate_manifest(&manifest, dir.path());
        assert!(errors.iter().any(|e| e.message.contains("invalid naming format")));
    }

    #[test]
    fn test_dangling_prompt_reference() {
        let dir = TempDir::new().unwrap();
        let mut manifest = valid_manifest();
        materialize(&dir, &manifest);
        manifest.guidelines[0].prompts.push("missing-prompt".to_string());

        let errors = validate_manifest(&manifest, dir.path());
        assert!(errors
            .iter()
            .any(|e| e.message.contains("non-existent prompt 'missing-prompt'")));
    }

    #[test]
    fn test_path_violations() {
        let dir = TempDir::new().unwrap();
        let mut manifest = valid_manifest();
        materialize(&dir, &manifest);

        manifest.guidelines[0].file = "/etc/passwd".to_string();
        let errors = validate_manifest(&manifest, dir.path());
        assert!(errors.iter().any(|e| e.message.contains("absolute paths not allowed")));

        manifest.guidelines[0].file = "guidelines/../../escape.md".to_string();
        let errors = validate_manifest(&manifest, dir.path());
        assert!(errors.iter().any(|e| e.message.contains("path traversal not allowed")));

        manifest.guidelines[0].file = "other/place.md".to_string();
        let errors = validate_manifest(&manifest, dir.path());
        assert!(errors
            .iter()
            .any(|e| e.message.contains("path must be within guidelines/")));
    }

    #[test]
    fn test_missing_file_on_disk() {
        let dir = TempDir::new().unwrap();
        let manifest = valid_manifest();
        // Files never materialized

        let errors = validate_manifest(&manifest, dir.path());
        assert!(errors.iter().any(|e| e.message.contains("file not found")));
    }

    #[test]
    fn test_all_errors_collected() {
        let dir = TempDir::new().unwrap();
        let manifest = Manifest {
            version: 0,
            guidelines: vec![ManifestGuideline {
                name: "Bad Name".to_string(),
                file: String::new(),
                description: String::new(),
                applicable_scenarios: Vec::new(),
                prompts: vec!["ghost".to_string()],
            }],
            prompts: Vec::new(),
        };

        let errors = validate_manifest(&manifest, dir.path());
        // version + naming + file + description + scenarios + dangling ref
        assert!(errors.len() >= 6, "expected all errors collected, got {}", errors.len());
    }

    #[test]
    fn test_is_spinal_case() {
        assert!(is_spinal_case("rust-style"));
        assert!(is_spinal_case("a"));
        assert!(is_spinal_case("a1-b2"));
        assert!(!is_spinal_case("Rust-Style"));
        assert!(!is_spinal_case("rust_style"));
        assert!(!is_spinal_case("-leading"));
        assert!(!is_spinal_case("trailing-"));
        assert!(!is_spinal_case("double--hyphen"));
        assert!(!is_spinal_case(""));
        assert!(!is_spinal_case("1-starts-with-digit"));
    }
}
