//! `graft update-agents` - select agents and regenerate integration files

use colored::Colorize;
use std::path::Path;

use crate::agents::{cleanup_agent_files, generate_agent_files, GenerationSummary};
use crate::project::{ProjectConfig, PROJECT_CONFIG_FILE_NAME};
use crate::ui;

use super::{load_required_config, project_root, CommandError, Result};

/// How the agent set is chosen. Threaded explicitly through the call chain;
/// there is no ambient non-interactive flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentSelectionMode {
    /// Prompt the user and persist the choice
    Interactive,
    /// Reuse the agent set saved in project state
    UseSaved,
}

pub fn run(mode: AgentSelectionMode) -> Result<()> {
    let root = project_root()?;
    let mut cfg = load_required_config(&root)?;

    if cfg.sources.is_empty() {
        return cleanup_when_empty(&root);
    }

    let selected = match mode {
        AgentSelectionMode::UseSaved => {
            if cfg.agents.is_empty() {
                return Err(CommandError::Failed(
                    "no agents configured, run without --no-ask to select agents".to_string(),
                ));
            }
            println!("Using saved agents: {}", cfg.agents.join(", "));
            cfg.agents.clone()
        }
        AgentSelectionMode::Interactive => {
            let selected = ui::select_agents(&cfg.agents)
                .map_err(|e| CommandError::Failed(format!("agent selection canceled: {}", e)))?;

            cfg.set_agents(selected.clone());
            cfg.save_atomic(&root.join(PROJECT_CONFIG_FILE_NAME))?;
            println!("{} Updated {}", ui::success(""), PROJECT_CONFIG_FILE_NAME.cyan());
            selected
        }
    };

    println!("\nGenerating agent files...");
    let summary = generate_agent_files(&root, &cfg, &selected);
    display_summary(&summary);

    if !summary.is_ok() {
        return Err(CommandError::Failed(format!(
            "generation completed with {} errors",
            summary.errors.len()
        )));
    }

    println!("\n{}", ui::success("Agent files generated successfully"));
    Ok(())
}

/// With no sources configured there is nothing to generate; strip any
/// leftover managed blocks instead.
fn cleanup_when_empty(root: &Path) -> Result<()> {
    println!("No guideline sources configured.");
    println!("Checking for managed blocks to remove...");

    let summary = cleanup_agent_files(root).map_err(CommandError::Failed)?;

    if !summary.agents_md_cleaned && !summary.claude_md_cleaned {
        println!("No managed blocks found to remove.");
        println!("Run {} to add guidelines first.", "graft add".cyan());
        return Ok(());
    }

    println!("\nRemoved managed blocks from:");
    if summary.agents_md_cleaned {
        println!("{} AGENTS.md", ui::success(""));
    }
    if summary.claude_md_cleaned {
        println!("{} CLAUDE.md", ui::success(""));
    }

    Ok(())
}

fn display_summary(summary: &GenerationSummary) {
    if summary.agents_md {
        println!("{} AGENTS.md", ui::success(""));
    }
    if summary.claude_md {
        println!("{} CLAUDE.md", ui::success(""));
    }
    for (agent_id, count) in &summary.prompt_files {
        println!("{} Generated {} {} file(s)", ui::success(""), count, agent_id);
    }

    if !summary.errors.is_empty() {
        println!("\n{}", ui::error(&format!("{} error(s) occurred:", summary.errors.len())));
        for err in &summary.errors {
            println!("  • {}", err);
        }
    }
}

/// Regenerate using the saved agent selection against an already-loaded
/// config. Used by `sync` after it has refreshed every source.
pub fn regenerate_saved(root: &Path, cfg: &ProjectConfig) -> Result<()> {
    if cfg.agents.is_empty() {
        return Err(CommandError::Failed(
            "no agents configured, run 'graft update-agents' to select agents".to_string(),
        ));
    }

    let summary = generate_agent_files(root, cfg, &cfg.agents);
    display_summary(&summary);

    if !summary.is_ok() {
        return Err(CommandError::Failed(format!(
            "generation completed with {} errors",
            summary.errors.len()
        )));
    }
    Ok(())
}
