//! `graft remove` - remove a source and its generated files

use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::agents::AGENT_TARGETS;
use crate::project::{vendor_dir, ProjectConfig, PROJECT_CONFIG_FILE_NAME};
use crate::ui;

use super::{load_required_config, project_root, CommandError, Result};

pub fn run(source_name: &str, force: bool) -> Result<()> {
    let root = project_root()?;
    let mut cfg = load_required_config(&root)?;

    let Some(index) = cfg.sources.iter().position(|s| s.name == source_name) else {
        println!("{} Source not found: {}", ui::error("Error:"), source_name.cyan());
        if cfg.sources.is_empty() {
            println!("\nNo sources configured.");
        } else {
            println!("\nAvailable sources:");
            for s in &cfg.sources {
                println!("  - {}", s.name);
            }
        }
        return Err(CommandError::Failed(format!(
            "source not found: {}",
            source_name
        )));
    };

    display_impact(&root, source_name);

    if !force {
        println!();
        if !ui::confirm("This cannot be undone. Continue?") {
            println!("\nCanceled. No changes made.");
            return Ok(());
        }
    }
    println!();

    perform_removal(&root, &mut cfg, source_name, index)
}

fn display_impact(root: &Path, source_name: &str) {
    println!("\nThe following will be deleted:");
    println!(
        "  - {} entry for {}",
        PROJECT_CONFIG_FILE_NAME,
        source_name.cyan()
    );

    let source_dir = root.join(vendor_dir(source_name));
    if source_dir.is_dir() {
        let guideline_count = count_dir_entries(&source_dir.join("guidelines"));
        let prompt_count = count_dir_entries(&source_dir.join("prompts"));
        println!(
            "  - {} directory ({} guidelines, {} prompts)",
            vendor_dir(source_name).display().to_string().cyan(),
            guideline_count,
            prompt_count
        );
    } else {
        println!(
            "  - {} directory (not found, will skip)",
            vendor_dir(source_name).display().to_string().cyan()
        );
    }

    for target in AGENT_TARGETS {
        let files = target.generated_files(root, source_name);
        if !files.is_empty() {
            println!(
                "  - {} ({} files)",
                target.display_pattern(source_name),
                files.len()
            );
        }
    }
}

fn count_dir_entries(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).count())
        .unwrap_or(0)
}

fn perform_removal(
    root: &Path,
    cfg: &mut ProjectConfig,
    source_name: &str,
    index: usize,
) -> Result<()> {
    let deleted = delete_generated_files(root, source_name)?;

    let source_dir = root.join(vendor_dir(source_name));
    if let Err(e) = fs::remove_dir_all(&source_dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            return Err(CommandError::Failed(format!(
                "failed to delete source directory {}: {}",
                source_dir.display(),
                e
            )));
        }
    }

    cfg.sources.remove(index);

    // Files are already gone; a failed state write leaves the document
    // pointing at deleted content and needs manual repair
    cfg.save_atomic(&root.join(PROJECT_CONFIG_FILE_NAME))
        .map_err(|e| {
            println!(
                "{} Failed to update configuration: {}",
                ui::error("Critical:"),
                e
            );
            println!("  Files have been deleted but the configuration update failed.");
            println!(
                "  You may need to manually remove the source entry from {}",
                PROJECT_CONFIG_FILE_NAME.cyan()
            );
            CommandError::Critical(format!(
                "files deleted but saving {} failed: {}",
                PROJECT_CONFIG_FILE_NAME, e
            ))
        })?;

    println!(
        "{} Removed source {}",
        ui::success("Success:"),
        source_name.cyan()
    );
    println!("  Cleaned up {} file(s)", deleted);
    println!();
    println!("Next steps:");
    println!(
        "  Run {} to regenerate AGENTS.md",
        "graft update-agents".cyan()
    );

    Ok(())
}

fn delete_generated_files(root: &Path, source_name: &str) -> Result<usize> {
    let mut deleted = 0;

    for target in AGENT_TARGETS {
        for file in target.generated_files(root, source_name) {
            if let Err(e) = fs::remove_file(&file) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(CommandError::Failed(format!(
                        "failed to delete {}: {}",
                        file.display(),
                        e
                    )));
                }
            }
            deleted += 1;
        }
    }

    Ok(deleted)
}
