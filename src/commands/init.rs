//! `graft init` - create a new project state document

use colored::Colorize;

use crate::project::{create_example_project_config, PROJECT_CONFIG_FILE_NAME};
use crate::ui;

use super::{project_root, CommandError, Result};

pub fn run() -> Result<()> {
    let root = project_root()?;
    let path = root.join(PROJECT_CONFIG_FILE_NAME);

    if path.exists() {
        println!(
            "{} Project configuration already exists: {}",
            ui::error("Error:"),
            PROJECT_CONFIG_FILE_NAME.cyan()
        );
        println!("  To create a new configuration, first remove or rename the existing file.");
        return Err(CommandError::Failed(
            "project configuration already exists".to_string(),
        ));
    }

    create_example_project_config(&path).map_err(|e| {
        CommandError::Failed(format!("failed to create project configuration: {}", e))
    })?;

    println!(
        "{} Created {}",
        ui::success("Success:"),
        PROJECT_CONFIG_FILE_NAME.cyan()
    );
    println!();
    println!("Next steps:");
    println!(
        "  1. Run {} to add guideline sources (git repositories or local directories)",
        "graft add".cyan()
    );
    println!("  2. Select which guidelines to include from each source");
    println!();
    println!("Examples:");
    println!("  {}", "graft add --git-repo https://github.com/acme/team-guidelines".cyan());
    println!("  {}", "graft add ./shared/guidelines".cyan());

    Ok(())
}
