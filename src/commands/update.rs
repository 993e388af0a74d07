//! `graft update` - refresh source(s) from their origin

use colored::Colorize;
use std::path::Path;

use crate::copy::copy_guideline_files;
use crate::diff::{
    compare_guidelines, extract_referenced_prompts, retain_guidelines, to_project_guidelines,
};
use crate::manifest::Manifest;
use crate::paths;
use crate::project::{
    vendor_dir, ProjectConfig, ProjectSource, SourceKind, PROJECT_CONFIG_FILE_NAME,
};
use crate::source::{fetch_git_source, fetch_local_source, FetchedSource};
use crate::ui;

use super::{load_required_config, project_root, CommandError, Result};

/// Policy for guidelines that appeared in the manifest since the last sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddNewPolicy {
    /// Accept every new guideline
    All,
    /// Skip new guidelines
    None,
    /// Ask the user
    Ask,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions {
    pub all: bool,
    pub dry_run: bool,
    pub add_new: AddNewPolicy,
}

pub fn run(source_name: Option<String>, opts: UpdateOptions) -> Result<()> {
    match (&source_name, opts.all) {
        (None, false) => {
            return Err(CommandError::Usage(
                "must specify either a source name or --all flag".to_string(),
            ))
        }
        (Some(_), true) => {
            return Err(CommandError::Usage(
                "cannot specify both a source name and --all flag".to_string(),
            ))
        }
        _ => {}
    }

    let root = project_root()?;
    let mut cfg = load_required_config(&root)?;

    match source_name {
        Some(name) => update_single_source(&root, &mut cfg, &name, opts),
        None => update_all_sources(&root, &mut cfg, opts),
    }
}

pub fn update_all_sources(
    root: &Path,
    cfg: &mut ProjectConfig,
    opts: UpdateOptions,
) -> Result<()> {
    if cfg.sources.is_empty() {
        println!("No sources configured");
        return Ok(());
    }

    println!("Updating {} sources...\n", cfg.sources.len());

    let names: Vec<String> = cfg.sources.iter().map(|s| s.name.clone()).collect();
    let mut failures = 0;
    for name in names {
        println!("=== Updating {} ===", name);
        if let Err(e) = update_single_source(root, cfg, &name, opts) {
            failures += 1;
            println!("{} {}", ui::error("Failed:"), e);
        }
        println!();
    }

    if failures > 0 {
        return Err(CommandError::Failed(format!(
            "failed to update {} sources",
            failures
        )));
    }

    println!("{}", ui::success("All sources updated"));
    Ok(())
}

pub fn update_single_source(
    root: &Path,
    cfg: &mut ProjectConfig,
    source_name: &str,
    opts: UpdateOptions,
) -> Result<()> {
    let Some(src) = cfg.find_source(source_name).cloned() else {
        println!("{} Source not found: {}", ui::error("Error:"), source_name);
        if !cfg.sources.is_empty() {
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

    let Some(fetched) = fetch_and_check(root, &src)? else {
        // Revision marker unchanged: skip reconciliation entirely
        println!("{} Already at latest commit", ui::success(""));
        println!("\nAll guidelines up to date.");
        return Ok(());
    };

    let manifest = fetched.manifest();
    let comparison = compare_guidelines(&src.guidelines, &manifest.guidelines);

    if !comparison.updated.is_empty() {
        println!("\nUpdated guidelines:");
        for name in &comparison.updated {
            println!("{} {}", ui::success(""), name);
        }
    }

    let added_new = handle_new_guidelines(manifest, &comparison.new, opts.add_new);

    if !comparison.removed.is_empty() {
        println!("\nRemoved from source:");
        for name in &comparison.removed {
            println!("  - {} (no longer in manifest)", name);
        }
    }

    if opts.dry_run {
        println!("\n=== Dry Run - Preview ===");
        println!("Would update: {} guidelines", comparison.updated.len());
        println!("Would add: {} guidelines", added_new.len());
        println!("Removed from source: {} guidelines", comparison.removed.len());
        println!("\nNo changes made (dry run)");
        return Ok(());
    }

    apply_update(root, cfg, &src, &fetched, &added_new)
}

/// Fetch the latest snapshot for a source. Returns `None` when a git
/// source's resolved commit matches the recorded one, meaning there is
/// nothing to reconcile.
fn fetch_and_check(root: &Path, src: &ProjectSource) -> Result<Option<FetchedSource>> {
    match src.kind {
        SourceKind::GitRepo => {
            println!("Fetching latest from {}...", src.url);
            let fetched = fetch_git_source(&src.url, &src.git_ref)?;

            if !src.commit.is_empty() && fetched.info.commit == src.commit {
                println!("{} Current commit: {}", ui::success(""), short_commit(&src.commit));
                return Ok(None);
            }

            if !src.commit.is_empty() {
                println!("{} Current commit: {}", ui::success(""), short_commit(&src.commit));
            }
            println!(
                "{} Latest commit: {} (changed)",
                ui::success(""),
                short_commit(&fetched.info.commit)
            );
            Ok(Some(fetched))
        }
        SourceKind::LocalPath => {
            println!("Refreshing from local directory...");
            let source_path = if Path::new(&src.path).is_absolute() {
                Path::new(&src.path).to_path_buf()
            } else {
                paths::resolve_relative(root, Path::new(&src.path)).map_err(|e| {
                    CommandError::Failed(format!(
                        "failed to resolve relative path {}: {}",
                        src.path, e
                    ))
                })?
            };
            Ok(Some(fetch_local_source(&source_path)?))
        }
    }
}

fn short_commit(commit: &str) -> &str {
    if commit.len() > 8 {
        &commit[..8]
    } else {
        commit
    }
}

/// Decide which new guidelines to accept, per the explicit policy. `Ask`
/// prompts once for the whole batch.
fn handle_new_guidelines(
    manifest: &Manifest,
    new_names: &[String],
    policy: AddNewPolicy,
) -> Vec<String> {
    if new_names.is_empty() {
        return Vec::new();
    }

    println!("\nNew guidelines available:");
    for name in new_names {
        if let Some(g) = manifest.find_guideline(name) {
            println!("  - {}: {}", name, g.description);
        }
    }

    let accept = match policy {
        AddNewPolicy::All => true,
        AddNewPolicy::None => false,
        AddNewPolicy::Ask => ui::confirm("\nAdd new guidelines?"),
    };

    if accept {
        new_names.to_vec()
    } else {
        Vec::new()
    }
}

fn apply_update(
    root: &Path,
    cfg: &mut ProjectConfig,
    src: &ProjectSource,
    fetched: &FetchedSource,
    added_new: &[String],
) -> Result<()> {
    let manifest = fetched.manifest();

    // Retained metadata always comes from the manifest
    let retained = retain_guidelines(&src.guidelines, manifest, added_new);
    for name in added_new {
        println!("{} Added {}", ui::success(""), name);
    }

    let mut updated_source = src.clone();
    updated_source.guidelines = to_project_guidelines(&retained);
    updated_source.prompts = extract_referenced_prompts(&retained, &manifest.prompts);
    if src.kind == SourceKind::GitRepo {
        updated_source.commit = fetched.info.commit.clone();
    }

    let dest_dir = root.join(vendor_dir(&src.name));
    copy_guideline_files(fetched.source_dir(), &dest_dir, &retained, &manifest.prompts)?;

    cfg.update_source(&src.name, updated_source);

    // Guideline files already replaced; a failed state write is critical
    cfg.save_atomic(&root.join(PROJECT_CONFIG_FILE_NAME))
        .map_err(|e| {
            CommandError::Critical(format!(
                "guideline files updated but saving {} failed: {}; re-run update once the cause is fixed",
                PROJECT_CONFIG_FILE_NAME, e
            ))
        })?;

    println!("\n{} Updated {}", ui::success(""), PROJECT_CONFIG_FILE_NAME.cyan());
    println!(
        "\nRun {} to regenerate agent files",
        "graft update-agents".cyan()
    );

    Ok(())
}
