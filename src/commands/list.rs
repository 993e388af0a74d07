//! `graft list` - display configured sources, guidelines, prompts, agents

use std::path::Path;

use crate::agents::get_agent;
use crate::project::{ProjectConfig, ProjectSource, SourceKind};

use super::{load_required_config, project_root, Result};

pub fn run() -> Result<()> {
    let root = project_root()?;
    let cfg = load_required_config(&root)?;

    display_agents(&cfg);
    println!();
    display_sources(&cfg);

    Ok(())
}

fn display_agents(cfg: &ProjectConfig) {
    println!("Configured agents:");
    if cfg.agents.is_empty() {
        println!("  None configured");
        return;
    }
    for agent_id in &cfg.agents {
        match get_agent(agent_id) {
            Some(agent) => println!("  - {}", agent.display_name),
            // Unknown ids still listed; validate reports them
            None => println!("  - {}", agent_id),
        }
    }
}

fn display_sources(cfg: &ProjectConfig) {
    println!("Sources:");
    if cfg.sources.is_empty() {
        println!("  No sources configured");
        return;
    }

    println!();
    for (i, source) in cfg.sources.iter().enumerate() {
        println!("{} ({})", source.name, source.kind);

        match source.kind {
            SourceKind::GitRepo => {
                println!("  URL: {}", source.url);
                if !source.git_ref.is_empty() {
                    println!("  Ref: {}", source.git_ref);
                }
                if !source.commit.is_empty() {
                    let display = if source.commit.len() > 8 {
                        &source.commit[..8]
                    } else {
                        &source.commit
                    };
                    println!("  Commit: {}", display);
                }
            }
            SourceKind::LocalPath => {
                let marker = if Path::new(&source.path).is_absolute() {
                    "(absolute)"
                } else {
                    "(relative)"
                };
                println!("  Path: {} {}", source.path, marker);
            }
        }

        display_guidelines(source);
        display_prompts(source);

        if i < cfg.sources.len() - 1 {
            println!();
        }
    }
}

fn display_guidelines(source: &ProjectSource) {
    println!();
    println!("  Guidelines:");
    if source.guidelines.is_empty() {
        println!("    None");
        return;
    }
    for guideline in &source.guidelines {
        println!("    - {}: {}", guideline.name, guideline.description);
    }
}

fn display_prompts(source: &ProjectSource) {
    println!();
    println!("  Prompts:");
    if source.prompts.is_empty() {
        println!("    None");
        return;
    }
    for prompt in &source.prompts {
        println!("    - {}: {}", prompt.name, prompt.description);
    }
}
