use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use graft::commands::add::{AddOptions, GuidelineSelection};
use graft::commands::update::{AddNewPolicy, UpdateOptions};
use graft::commands::update_agents::AgentSelectionMode;
use graft::commands::{self, CommandError};
use graft::ui;

#[derive(Parser, Debug)]
#[command(name = "graft")]
#[command(author, version)]
#[command(about = "Sync shared AI guidelines and prompts into your project")]
#[command(
    long_about = "Graft helps guideline repository maintainers create and validate manifest \
files, and project developers pull shared guidelines into their projects and keep \
AI-agent integration files up to date."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new project configuration
    Init,

    /// Add a guideline source to the project
    Add {
        /// Local directory containing a manifest
        path: Option<PathBuf>,

        /// Git repository URL
        #[arg(long)]
        git_repo: Option<String>,

        /// Git reference (branch or tag)
        #[arg(long)]
        git_ref: Option<String>,

        /// Custom source name (auto-derived if not specified)
        #[arg(long)]
        name: Option<String>,

        /// Add all guidelines without prompting
        #[arg(long, conflicts_with = "guideline")]
        all: bool,

        /// Add a specific guideline by name (repeatable)
        #[arg(long = "guideline")]
        guideline: Vec<String>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Update source(s) from their origin
    Update {
        /// Source name to update
        source: Option<String>,

        /// Update all sources
        #[arg(long)]
        all: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Policy for new guidelines (all|none); prompts when omitted
        #[arg(long, value_parser = parse_add_new)]
        add_new: Option<AddNewPolicy>,
    },

    /// Configure AI agents and generate agent integration files
    UpdateAgents {
        /// Skip agent selection, use saved configuration
        #[arg(long)]
        no_ask: bool,
    },

    /// Remove a guideline source from the project
    Remove {
        /// Source name to remove
        source: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Display configured sources, guidelines, prompts, and agents
    List,

    /// Update all sources and regenerate agent files
    Sync {
        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the project configuration
    Validate,

    /// Manage guideline repository manifest files
    Manifest {
        #[command(subcommand)]
        command: ManifestCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ManifestCommand {
    /// Initialize a new manifest file
    Init,
    /// Validate the manifest file
    Validate,
}

fn parse_add_new(value: &str) -> Result<AddNewPolicy, String> {
    match value {
        "all" => Ok(AddNewPolicy::All),
        "none" => Ok(AddNewPolicy::None),
        _ => Err("--add-new must be either 'all' or 'none'".to_string()),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        // Canceled prompts already printed their own message
        if !matches!(e, CommandError::Canceled) {
            eprintln!("{}", ui::error(&e.to_string()));
        }
        std::process::exit(e.exit_code());
    }
}

fn run(command: Command) -> Result<(), CommandError> {
    match command {
        Command::Init => commands::init::run(),

        Command::Add {
            path,
            git_repo,
            git_ref,
            name,
            all,
            guideline,
            dry_run,
        } => {
            let selection = if all {
                GuidelineSelection::All
            } else if !guideline.is_empty() {
                GuidelineSelection::Named(guideline)
            } else {
                GuidelineSelection::Interactive
            };
            commands::add::run(
                path,
                AddOptions {
                    git_repo,
                    git_ref,
                    name,
                    selection,
                    dry_run,
                },
            )
        }

        Command::Update {
            source,
            all,
            dry_run,
            add_new,
        } => commands::update::run(
            source,
            UpdateOptions {
                all,
                dry_run,
                add_new: add_new.unwrap_or(AddNewPolicy::Ask),
            },
        ),

        Command::UpdateAgents { no_ask } => {
            let mode = if no_ask {
                AgentSelectionMode::UseSaved
            } else {
                AgentSelectionMode::Interactive
            };
            commands::update_agents::run(mode)
        }

        Command::Remove { source, force } => commands::remove::run(&source, force),

        Command::List => commands::list::run(),

        Command::Sync { dry_run } => commands::sync::run(dry_run),

        Command::Validate => commands::validate::run(),

        Command::Manifest { command } => match command {
            ManifestCommand::Init => commands::manifest::run_init(),
            ManifestCommand::Validate => commands::manifest::run_validate(),
        },

        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
