//! `graft sync` - update every source and regenerate agent files
//!
//! Non-interactive by construction: new guidelines are skipped
//! (`add-new=none`) and the saved agent selection is reused, so the command
//! is safe for CI pipelines and idempotent against an unchanged origin.

use crate::ui;

use super::update::{AddNewPolicy, UpdateOptions};
use super::{load_required_config, project_root, update, update_agents, Result};

pub fn run(dry_run: bool) -> Result<()> {
    let root = project_root()?;
    let mut cfg = load_required_config(&root)?;

    if cfg.sources.is_empty() {
        println!("No sources configured");
        return Ok(());
    }

    println!("Syncing all guideline sources...");

    let opts = UpdateOptions {
        all: true,
        dry_run,
        add_new: AddNewPolicy::None,
    };
    update::update_all_sources(&root, &mut cfg, opts)?;

    if dry_run {
        println!("\n=== Dry Run - Preview ===");
        println!("No changes made (dry run)");
        return Ok(());
    }

    println!("\nRegenerating agent files...");
    update_agents::regenerate_saved(&root, &cfg)?;

    println!("\n{}", ui::success("Sync complete"));
    Ok(())
}
