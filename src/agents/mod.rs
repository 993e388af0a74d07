//! Supported AI agents and their integration-file targets
//!
//! Each supported agent maps to one record in [`AGENT_TARGETS`] describing
//! where its generated prompt files live and which frontmatter they carry.
//! Generation, removal, and the impact display all read the same table, and
//! the output path is a pure function of `(source, prompt)` per record.

mod generate;

pub use generate::{
    cleanup_agent_files, generate_agent_files, instructions_content, CleanupSummary,
    GenerationSummary,
};

use std::fs;
use std::path::{Path, PathBuf};

/// An AI agent that can consume synced guidelines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
}

/// The supported agents
pub const SUPPORTED_AGENTS: &[Agent] = &[
    Agent {
        id: "antigravity",
        display_name: "Antigravity",
        description: "AI development assistant",
    },
    Agent {
        id: "claude-code",
        display_name: "Claude Code",
        description: "Anthropic's AI assistant with slash commands",
    },
    Agent {
        id: "cursor",
        display_name: "Cursor",
        description: "AI-first code editor",
    },
    Agent {
        id: "github-copilot",
        display_name: "GitHub Copilot",
        description: "GitHub's AI pair programmer",
    },
    Agent {
        id: "windsurf",
        display_name: "Windsurf",
        description: "AI-powered code editor",
    },
];

/// Frontmatter flavor of a generated prompt file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    ClaudeCommand,
    CopilotPrompt,
    AntigravityWorkflow,
    WindsurfWorkflow,
    CursorCommand,
}

/// Where and how one agent's prompt files are generated
#[derive(Debug, Clone, Copy)]
pub struct AgentTarget {
    pub agent_id: &'static str,
    /// Directory under the project root
    pub output_dir: &'static str,
    /// File name prefix before `<source>-<prompt>`
    pub file_prefix: &'static str,
    /// File name suffix after `<source>-<prompt>`
    pub file_suffix: &'static str,
    pub template: TemplateKind,
}

/// The fixed per-agent output table
pub const AGENT_TARGETS: &[AgentTarget] = &[
    AgentTarget {
        agent_id: "antigravity",
        output_dir: ".agent/workflows",
        file_prefix: "graft-",
        file_suffix: ".md",
        template: TemplateKind::AntigravityWorkflow,
    },
    AgentTarget {
        agent_id: "claude-code",
        output_dir: ".claude/commands/graft",
        file_prefix: "",
        file_suffix: ".md",
        template: TemplateKind::ClaudeCommand,
    },
    AgentTarget {
        agent_id: "cursor",
        output_dir: ".cursor/commands",
        file_prefix: "graft-",
        file_suffix: ".md",
        template: TemplateKind::CursorCommand,
    },
    AgentTarget {
        agent_id: "github-copilot",
        output_dir: ".github/prompts",
        file_prefix: "graft-",
        file_suffix: ".prompt.md",
        template: TemplateKind::CopilotPrompt,
    },
    AgentTarget {
        agent_id: "windsurf",
        output_dir: ".windsurf/workflows",
        file_prefix: "graft-",
        file_suffix: ".md",
        template: TemplateKind::WindsurfWorkflow,
    },
];

impl AgentTarget {
    /// File name for one `(source, prompt)` pair
    pub fn file_name(&self, source_name: &str, prompt_name: &str) -> String {
        format!(
            "{}{}-{}{}",
            self.file_prefix, source_name, prompt_name, self.file_suffix
        )
    }

    /// Output path relative to the project root; distinct `(source, prompt)`
    /// pairs never collide because both names are embedded in the file name
    pub fn output_path(&self, source_name: &str, prompt_name: &str) -> PathBuf {
        Path::new(self.output_dir).join(self.file_name(source_name, prompt_name))
    }

    /// Human-readable pattern covering every file this target generates for
    /// a source, used in the removal impact display
    pub fn display_pattern(&self, source_name: &str) -> String {
        format!(
            "{}/{}{}-*{}",
            self.output_dir, self.file_prefix, source_name, self.file_suffix
        )
    }

    /// List the files this target has generated for a source
    pub fn generated_files(&self, project_root: &Path, source_name: &str) -> Vec<PathBuf> {
        let dir = project_root.join(self.output_dir);
        let prefix = format!("{}{}-", self.file_prefix, source_name);

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name();
                let name = name.to_string_lossy();
                name.starts_with(&prefix) && name.ends_with(self.file_suffix)
            })
            .map(|e| e.path())
            .collect();
        files.sort();
        files
    }
}

/// Return the list of supported agents
pub fn available_agents() -> &'static [Agent] {
    SUPPORTED_AGENTS
}

/// Check whether an agent id is supported
pub fn is_valid_agent(id: &str) -> bool {
    SUPPORTED_AGENTS.iter().any(|a| a.id == id)
}

/// Look up an agent by id
pub fn get_agent(id: &str) -> Option<&'static Agent> {
    SUPPORTED_AGENTS.iter().find(|a| a.id == id)
}

/// Look up the output target for an agent id
pub fn target_for(agent_id: &str) -> Option<&'static AgentTarget> {
    AGENT_TARGETS.iter().find(|t| t.agent_id == agent_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        assert!(is_valid_agent("claude-code"));
        assert!(is_valid_agent("windsurf"));
        assert!(!is_valid_agent("emacs"));

        let agent = get_agent("cursor").unwrap();
        assert_eq!(agent.display_name, "Cursor");
        assert!(get_agent("emacs").is_none());
    }

    #[test]
    fn test_every_agent_has_a_target() {
        for agent in SUPPORTED_AGENTS {
            assert!(
                target_for(agent.id).is_some(),
                "agent {} has no output target",
                agent.id
            );
        }
        assert_eq!(SUPPORTED_AGENTS.len(), AGENT_TARGETS.len());
    }

    #[test]
    fn test_output_paths() {
        let claude = target_for("claude-code").unwrap();
        assert_eq!(
            claude.output_path("team", "review"),
            PathBuf::from(".claude/commands/graft/team-review.md")
        );

        let copilot = target_for("github-copilot").unwrap();
        assert_eq!(
            copilot.output_path("team", "review"),
            PathBuf::from(".github/prompts/graft-team-review.prompt.md")
        );

        let windsurf = target_for("windsurf").unwrap();
        assert_eq!(
            windsurf.output_path("team", "review"),
            PathBuf::from(".windsurf/workflows/graft-team-review.md")
        );
    }

    #[test]
    fn test_output_paths_never_collide() {
        let pairs = [
            ("alpha", "review"),
            ("alpha", "implement"),
            ("beta", "review"),
        ];
        for target in AGENT_TARGETS {
            let mut seen = std::collections::BTreeSet::new();
            for (source, prompt) in pairs {
                assert!(
                    seen.insert(target.output_path(source, prompt)),
                    "collision for {}",
                    target.agent_id
                );
            }
        }
    }

    #[test]
    fn test_generated_files_scan() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = target_for("cursor").unwrap();
        let dir = tmp.path().join(target.output_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("graft-team-review.md"), "x").unwrap();
        fs::write(dir.join("graft-team-implement.md"), "x").unwrap();
        fs::write(dir.join("graft-other-review.md"), "x").unwrap();
        fs::write(dir.join("unrelated.md"), "x").unwrap();

        let files = target.generated_files(tmp.path(), "team");
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("graft-team-")));

        assert!(target.generated_files(tmp.path(), "ghost").is_empty());

        // Missing directory is just an empty list
        let empty = tempfile::TempDir::new().unwrap();
        assert!(target.generated_files(empty.path(), "team").is_empty());
    }
}
