//! `graft add` - add a guideline source to the project

use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::copy::copy_guideline_files;
use crate::diff::{extract_referenced_prompts, to_project_guidelines};
use crate::manifest::ManifestGuideline;
use crate::naming::derive_source_name;
use crate::paths;
use crate::project::{vendor_dir, ProjectSource, SourceKind, PROJECT_CONFIG_FILE_NAME};
use crate::source::{fetch_git_source, fetch_local_source, FetchedSource};
use crate::ui;

use super::{load_required_config, project_root, CommandError, Result};

/// How guidelines are picked from the fetched manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidelineSelection {
    /// Take everything without prompting
    All,
    /// Take the named guidelines, failing on unknown names
    Named(Vec<String>),
    /// Ask the user
    Interactive,
}

impl GuidelineSelection {
    fn is_interactive(&self) -> bool {
        matches!(self, GuidelineSelection::Interactive)
    }
}

#[derive(Debug)]
pub struct AddOptions {
    pub git_repo: Option<String>,
    pub git_ref: Option<String>,
    pub name: Option<String>,
    pub selection: GuidelineSelection,
    pub dry_run: bool,
}

pub fn run(local_path: Option<PathBuf>, opts: AddOptions) -> Result<()> {
    validate_flags(&opts, local_path.as_deref())?;

    let root = project_root()?;
    let mut cfg = load_required_config(&root)?;

    // For local paths, warn about out-of-project locations before fetching
    if let (None, Some(path)) = (&opts.git_repo, &local_path) {
        check_local_path_location(&root, path, &opts.selection)?;
    }

    let fetched = fetch(&opts, local_path.as_deref())?;
    println!("{} Source loaded successfully", ui::success(""));

    let selected = select_guidelines(&opts.selection, &fetched)?;
    if selected.is_empty() {
        println!("No guidelines selected. Exiting.");
        return Ok(());
    }

    let new_source = build_source_entry(&root, &opts, &fetched, &selected, &cfg)?;

    if opts.dry_run {
        print_dry_run(&new_source);
        return Ok(());
    }

    let dest_dir = root.join(vendor_dir(&new_source.name));
    println!(
        "Copying files to {}",
        vendor_dir(&new_source.name).display().to_string().cyan()
    );
    copy_guideline_files(
        fetched.source_dir(),
        &dest_dir,
        &selected,
        &fetched.manifest().prompts,
    )?;

    let source_name = new_source.name.clone();
    let guideline_count = new_source.guidelines.len();
    let prompt_count = new_source.prompts.len();
    cfg.add_source(new_source)?;

    // Files are on disk at this point; a failed state write is critical
    cfg.save_atomic(&root.join(PROJECT_CONFIG_FILE_NAME))
        .map_err(|e| {
            CommandError::Critical(format!(
                "files copied but saving {} failed: {}; remove {} or re-run add",
                PROJECT_CONFIG_FILE_NAME,
                e,
                vendor_dir(&source_name).display()
            ))
        })?;

    println!();
    println!(
        "{} Added source {}",
        ui::success("Success:"),
        source_name.cyan()
    );
    println!("  Guidelines: {}", guideline_count);
    println!("  Prompts: {}", prompt_count);
    println!("  Files copied to: {}", vendor_dir(&source_name).display());
    println!();
    println!("Next steps:");
    println!("  Run {} to configure AI agents", "graft update-agents".cyan());

    Ok(())
}

fn validate_flags(opts: &AddOptions, local_path: Option<&Path>) -> Result<()> {
    if opts.git_repo.is_none() && local_path.is_none() {
        return Err(CommandError::Usage(
            "must specify either --git-repo or a local path".to_string(),
        ));
    }
    if opts.git_repo.is_some() && local_path.is_some() {
        return Err(CommandError::Usage(
            "cannot specify both --git-repo and a local path".to_string(),
        ));
    }
    Ok(())
}

/// Warn when a local source lives outside the project directory: the stored
/// absolute path will not work on other machines. Interactive runs ask for
/// confirmation; non-interactive selection implies acceptance.
fn check_local_path_location(
    root: &Path,
    local_path: &Path,
    selection: &GuidelineSelection,
) -> Result<()> {
    let abs = if local_path.is_absolute() {
        local_path.to_path_buf()
    } else {
        root.join(local_path)
    };

    if paths::make_relative(root, &abs).is_ok() {
        return Ok(());
    }

    println!();
    println!(
        "{} Local source is outside project directory",
        ui::warning("Warning:")
    );
    println!("  Project: {}", root.display());
    println!("  Source: {}", abs.display());
    println!();
    println!("This absolute path won't work on other machines.");
    println!("Consider moving the source into your project directory.");
    println!();

    if selection.is_interactive() && !ui::confirm("Continue with absolute path?") {
        return Err(CommandError::Canceled);
    }

    Ok(())
}

fn fetch(opts: &AddOptions, local_path: Option<&Path>) -> Result<FetchedSource> {
    match (&opts.git_repo, local_path) {
        (Some(url), _) => {
            println!("Cloning repository...");
            Ok(fetch_git_source(url, opts.git_ref.as_deref().unwrap_or(""))?)
        }
        (None, Some(path)) => {
            println!("Loading local source...");
            Ok(fetch_local_source(path)?)
        }
        (None, None) => Err(CommandError::Usage(
            "must specify either --git-repo or a local path".to_string(),
        )),
    }
}

fn select_guidelines(
    selection: &GuidelineSelection,
    fetched: &FetchedSource,
) -> Result<Vec<ManifestGuideline>> {
    match selection {
        GuidelineSelection::All => {
            let selected = fetched.manifest().guidelines.clone();
            println!("Selected all {} guidelines", selected.len());
            Ok(selected)
        }
        GuidelineSelection::Named(names) => {
            let selected = ui::select_guidelines_by_name(&fetched.manifest().guidelines, names)
                .map_err(CommandError::Failed)?;
            println!("Selected {} guidelines", selected.len());
            Ok(selected)
        }
        GuidelineSelection::Interactive => ui::select_guidelines(&fetched.manifest().guidelines)
            .map_err(|e| CommandError::Failed(format!("failed to select guidelines: {}", e))),
    }
}

fn build_source_entry(
    root: &Path,
    opts: &AddOptions,
    fetched: &FetchedSource,
    selected: &[ManifestGuideline],
    cfg: &crate::project::ProjectConfig,
) -> Result<ProjectSource> {
    let info = &fetched.info;
    let source_name = match &opts.name {
        Some(name) => name.clone(),
        None => derive_source_name(&info.url, &info.path),
    };

    if cfg.find_source(&source_name).is_some() {
        return Err(CommandError::Failed(format!(
            "source with name '{}' already exists, use --name to specify a different name",
            source_name
        )));
    }

    let prompts = extract_referenced_prompts(selected, &info.manifest.prompts);
    let path = stored_path(root, info.kind, &info.path);

    Ok(ProjectSource {
        name: source_name,
        kind: info.kind,
        url: info.url.clone(),
        path,
        git_ref: info.git_ref.clone(),
        commit: info.commit.clone(),
        guidelines: to_project_guidelines(selected),
        prompts,
    })
}

/// Local sources inside the project are stored relative to the root so the
/// record travels with the repository; out-of-project sources keep their
/// absolute path.
fn stored_path(root: &Path, kind: SourceKind, path: &str) -> String {
    if kind != SourceKind::LocalPath || path.is_empty() {
        return path.to_string();
    }
    match paths::make_relative(root, Path::new(path)) {
        Ok(rel) => rel,
        Err(_) => path.to_string(),
    }
}

fn print_dry_run(new_source: &ProjectSource) {
    println!();
    println!("Dry run - would add source:");
    println!("  Name: {}", new_source.name.cyan());
    println!("  Type: {}", new_source.kind);
    if !new_source.url.is_empty() {
        println!("  URL: {}", new_source.url);
    }
    if !new_source.path.is_empty() {
        println!("  Path: {}", new_source.path);
    }
    println!("  Guidelines: {}", new_source.guidelines.len());
    println!("  Prompts: {}", new_source.prompts.len());
}
