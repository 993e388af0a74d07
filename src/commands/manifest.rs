//! `graft manifest` - maintainer-side manifest commands

use colored::Colorize;

use crate::manifest::{create_example_manifest, Manifest, MANIFEST_FILE_NAME};
use crate::ui;
use crate::validate::validate_manifest;

use super::{project_root, CommandError, Result};

/// `graft manifest init` - scaffold a manifest in the current directory
pub fn run_init() -> Result<()> {
    let root = project_root()?;
    let path = root.join(MANIFEST_FILE_NAME);

    if path.exists() {
        println!(
            "{} Manifest file already exists: {}",
            ui::error("Error:"),
            MANIFEST_FILE_NAME.cyan()
        );
        println!("  To create a new manifest, first remove or rename the existing file.");
        return Err(CommandError::Failed("manifest file already exists".to_string()));
    }

    create_example_manifest(&path)
        .map_err(|e| CommandError::Failed(format!("failed to create manifest: {}", e)))?;

    println!("{} Created {}", ui::success("Success:"), MANIFEST_FILE_NAME.cyan());
    println!();
    println!("Next steps:");
    println!("  1. Edit the manifest file to add your guidelines and prompts");
    println!(
        "  2. Create the referenced files in {} and {} directories",
        "guidelines/".cyan(),
        "prompts/".cyan()
    );
    println!(
        "  3. Run {} to check your manifest",
        "graft manifest validate".cyan()
    );

    Ok(())
}

/// `graft manifest validate` - check the manifest in the current directory
pub fn run_validate() -> Result<()> {
    let root = project_root()?;
    let path = root.join(MANIFEST_FILE_NAME);

    if !path.exists() {
        println!("{} {} not found", ui::error("Error:"), MANIFEST_FILE_NAME.cyan());
        println!(
            "  Run {} to create a new manifest.",
            "graft manifest init".cyan()
        );
        return Err(CommandError::Failed("manifest file not found".to_string()));
    }

    let manifest = Manifest::load(&path)
        .map_err(|e| CommandError::Failed(format!("failed to load manifest: {}", e)))?;

    let errors = validate_manifest(&manifest, &root);

    if errors.is_empty() {
        println!("{}", ui::success("Manifest is valid"));
        return Ok(());
    }

    println!(
        "{}",
        ui::error(&format!("Found {} validation error(s):", errors.len()))
    );
    println!();
    for error in errors.iter() {
        println!("  • {}: {}", error.field.cyan(), error.message);
    }
    println!();
    println!(
        "Fix these errors and run {} again.",
        "graft manifest validate".cyan()
    );

    Err(CommandError::Failed("validation failed".to_string()))
}
