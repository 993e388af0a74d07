//! `graft validate` - check the project state document
//!
//! Structural errors (bad version, missing fields, unknown agents, missing
//! vendored files) are hard failures. A legacy absolute local-path record is
//! only a warning: the project still works on this machine.

use colored::Colorize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::agents::is_valid_agent;
use crate::project::{vendor_dir, ProjectConfig, SourceKind, PROJECT_CONFIG_FILE_NAME};
use crate::ui;

use super::{load_required_config, project_root, CommandError, Result};

pub fn run() -> Result<()> {
    let root = project_root()?;
    let cfg = load_required_config(&root)?;

    println!("Validating {}...", PROJECT_CONFIG_FILE_NAME.cyan());

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut validated_files = 0usize;

    if cfg.version != 1 {
        errors.push(format!(
            "unsupported config version: {} (expected 1)",
            cfg.version
        ));
    }

    println!("{} {} sources configured", ui::success(""), cfg.sources.len());
    validate_sources(&root, &cfg, &mut errors, &mut warnings, &mut validated_files);
    validate_agent_ids(&cfg, &mut errors);

    report(&errors, &warnings, validated_files)
}

fn validate_sources(
    root: &Path,
    cfg: &ProjectConfig,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
    validated_files: &mut usize,
) {
    let mut seen_names: BTreeSet<&str> = BTreeSet::new();

    for source in &cfg.sources {
        if source.name.is_empty() {
            errors.push("source with empty name".to_string());
            continue;
        }
        if !seen_names.insert(&source.name) {
            errors.push(format!("duplicate source name: {}", source.name));
        }

        match source.kind {
            SourceKind::GitRepo => {
                if source.url.is_empty() {
                    errors.push(format!("source {}: git-repo source missing url", source.name));
                }
            }
            SourceKind::LocalPath => {
                if source.path.is_empty() {
                    errors.push(format!(
                        "source {}: local-path source missing path",
                        source.name
                    ));
                } else if Path::new(&source.path).is_absolute() {
                    warnings.push(format!(
                        "source {}: absolute path won't work on other machines: {}",
                        source.name, source.path
                    ));
                }
            }
        }

        let source_dir = root.join(vendor_dir(&source.name));
        let files = source
            .guidelines
            .iter()
            .map(|g| g.file.as_str())
            .chain(source.prompts.iter().map(|p| p.file.as_str()));
        for file in files {
            if source_dir.join(file).exists() {
                *validated_files += 1;
            } else {
                errors.push(format!(
                    "file not found: {}",
                    vendor_dir(&source.name).join(file).display()
                ));
            }
        }
    }
}

fn validate_agent_ids(cfg: &ProjectConfig, errors: &mut Vec<String>) {
    for agent_id in &cfg.agents {
        if !is_valid_agent(agent_id) {
            errors.push(format!("unknown agent id: {}", agent_id));
        }
    }
}

fn report(errors: &[String], warnings: &[String], validated_files: usize) -> Result<()> {
    if validated_files > 0 {
        println!("{} {} file reference(s) verified", ui::success(""), validated_files);
    }

    for warning in warnings {
        println!("{} {}", ui::warning("Warning:"), warning);
    }

    if errors.is_empty() {
        println!("\n{}", ui::success("Project configuration is valid"));
        return Ok(());
    }

    println!(
        "\n{}",
        ui::error(&format!("Found {} validation error(s):", errors.len()))
    );
    for error in errors {
        println!("  • {}", error);
    }

    Err(CommandError::Failed("validation failed".to_string()))
}
