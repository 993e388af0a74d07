//! Generation of agent integration files
//!
//! `AGENTS.md` (and `CLAUDE.md` for Claude Code) carry a managed block
//! pointing agents at the vendored guidelines. Each prompt of each source
//! additionally becomes one file per selected agent target, placed and
//! formatted according to the target table in the parent module.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::copy::write_atomic;
use crate::managed::{
    create_file_with_managed_block, remove_managed_block, replace_managed_block,
    MANAGED_BLOCK_END, MANAGED_BLOCK_START,
};
use crate::project::{vendor_dir, ProjectConfig, ProjectPrompt};

use super::{target_for, AgentTarget, TemplateKind};

/// Counts of generated files, plus any per-file errors
#[derive(Debug, Default)]
pub struct GenerationSummary {
    pub agents_md: bool,
    pub claude_md: bool,
    /// Generated prompt files per agent id
    pub prompt_files: BTreeMap<&'static str, usize>,
    pub errors: Vec<String>,
}

impl GenerationSummary {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Generate all agent integration files for the selected agents.
///
/// Per-file failures are collected into the summary instead of aborting the
/// whole run; the caller decides how to report them.
pub fn generate_agent_files(
    project_root: &Path,
    cfg: &ProjectConfig,
    selected_agents: &[String],
) -> GenerationSummary {
    let mut summary = GenerationSummary::default();
    let content = instructions_content(cfg);

    // AGENTS.md is generated regardless of the agent selection
    match upsert_instructions_file(&project_root.join("AGENTS.md"), &content) {
        Ok(()) => summary.agents_md = true,
        Err(e) => summary.errors.push(format!("failed to generate AGENTS.md: {}", e)),
    }

    let has_claude = selected_agents.iter().any(|a| a == "claude-code");
    if has_claude {
        match upsert_instructions_file(&project_root.join("CLAUDE.md"), &content) {
            Ok(()) => summary.claude_md = true,
            Err(e) => summary.errors.push(format!("failed to generate CLAUDE.md: {}", e)),
        }
    }

    let targets: Vec<&AgentTarget> = selected_agents
        .iter()
        .filter_map(|id| target_for(id))
        .collect();

    for source in &cfg.sources {
        let source_dir = project_root.join(vendor_dir(&source.name));
        for prompt in &source.prompts {
            for target in &targets {
                match generate_prompt_file(project_root, target, &source.name, prompt, &source_dir)
                {
                    Ok(()) => *summary.prompt_files.entry(target.agent_id).or_insert(0) += 1,
                    Err(e) => summary.errors.push(format!(
                        "failed to generate {} file for {}/{}: {}",
                        target.agent_id, source.name, prompt.name, e
                    )),
                }
            }
        }
    }

    summary
}

/// Build the managed-block content for AGENTS.md / CLAUDE.md
pub fn instructions_content(cfg: &ProjectConfig) -> String {
    let mut out = String::new();

    out.push_str("## Graft Guidelines\n\n");
    out.push_str("The project follows shared guidelines stored in the `@/graft` directory. ");
    out.push_str("They contain reusable patterns and best practices applicable across projects.\n\n");
    out.push_str("These instructions are for AI assistants working in this project.\n\n");

    if cfg.sources.is_empty() {
        out.push_str("No guideline sources configured yet. Run 'graft add' to add guidelines.\n\n");
        out.push_str("Keep this managed block so 'graft update-agents' can refresh the instructions.\n");
        return out;
    }

    out.push_str(
        "When working on the codebase, open and refer to the following guidelines as needed:\n",
    );

    for source in &cfg.sources {
        for guideline in &source.guidelines {
            out.push_str(&format!("- `@/graft/{}/{}` for\n", source.name, guideline.file));
            if guideline.applicable_scenarios.is_empty() {
                // Validation requires scenarios; fall back to the description
                // for records that predate that rule
                out.push_str(&format!("   * {}\n", guideline.description));
            } else {
                for scenario in &guideline.applicable_scenarios {
                    out.push_str(&format!("   * {}\n", scenario));
                }
            }
        }
    }

    out.push_str("\nKeep this managed block so 'graft update-agents' can refresh the instructions.\n");
    out
}

/// Merge fresh instructions into an existing file, or create it with a
/// minimal header. User text outside the managed block is untouched.
fn upsert_instructions_file(path: &Path, content: &str) -> Result<(), String> {
    let final_content = match fs::read_to_string(path) {
        Ok(existing) => replace_managed_block(&existing, content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            create_file_with_managed_block(content)
        }
        Err(e) => return Err(format!("failed to read {}: {}", path.display(), e)),
    };

    write_atomic(path, final_content.as_bytes()).map_err(|e| e.to_string())
}

/// Generate one prompt file for one agent target
fn generate_prompt_file(
    project_root: &Path,
    target: &AgentTarget,
    source_name: &str,
    prompt: &ProjectPrompt,
    source_dir: &Path,
) -> Result<(), String> {
    let prompt_path = source_dir.join(&prompt.file);
    let body = fs::read_to_string(&prompt_path)
        .map_err(|e| format!("failed to read prompt file {}: {}", prompt_path.display(), e))?;

    let content = render_prompt_file(target.template, source_name, prompt, &body);
    let output = project_root.join(target.output_path(source_name, &prompt.name));

    write_atomic(&output, content.as_bytes()).map_err(|e| e.to_string())
}

/// Render frontmatter plus managed block for a prompt file
fn render_prompt_file(
    template: TemplateKind,
    source_name: &str,
    prompt: &ProjectPrompt,
    body: &str,
) -> String {
    let mut out = String::new();

    match template {
        TemplateKind::ClaudeCommand => {
            out.push_str("---\n");
            out.push_str(&format!(
                "name: Graft: {} {}\n",
                title_case(source_name),
                title_case(&prompt.name)
            ));
            out.push_str(&format!("description: {}\n", prompt.description));
            out.push_str("category: Graft\n");
            out.push_str(&format!("tags: [graft, \"{}-{}\"]\n", source_name, prompt.name));
            out.push_str("---\n");
        }
        TemplateKind::CopilotPrompt => {
            out.push_str("---\n");
            out.push_str(&format!("description: {}\n", prompt.description));
            out.push_str("---\n\n");
            out.push_str("$ARGUMENTS\n\n");
        }
        TemplateKind::AntigravityWorkflow => {
            out.push_str("---\n");
            out.push_str(&format!("description: {}\n", prompt.description));
            out.push_str("---\n");
        }
        TemplateKind::WindsurfWorkflow => {
            out.push_str("---\n");
            out.push_str(&format!("description: {}\n", prompt.description));
            out.push_str("auto_execution_mode: 3\n");
            out.push_str("---\n");
        }
        TemplateKind::CursorCommand => {
            out.push_str("---\n");
            out.push_str(&format!("name: /graft-{}-{}\n", source_name, prompt.name));
            out.push_str(&format!("id: graft-{}-{}\n", source_name, prompt.name));
            out.push_str("category: Graft\n");
            out.push_str(&format!("description: {}\n", prompt.description));
            out.push_str("---\n");
        }
    }

    out.push_str(MANAGED_BLOCK_START);
    out.push('\n');
    out.push_str(body.trim());
    out.push('\n');
    out.push_str(MANAGED_BLOCK_END);
    out.push('\n');
    out
}

/// Convert a spinal-case name to title case for display
fn title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// What `cleanup_agent_files` removed
#[derive(Debug, Default)]
pub struct CleanupSummary {
    pub agents_md_cleaned: bool,
    pub claude_md_cleaned: bool,
}

/// Strip managed blocks from AGENTS.md and CLAUDE.md. Used when the last
/// source is removed; files without a block (or missing entirely) are left
/// alone.
pub fn cleanup_agent_files(project_root: &Path) -> Result<CleanupSummary, String> {
    let agents_md_cleaned = cleanup_file(&project_root.join("AGENTS.md"))?;
    let claude_md_cleaned = cleanup_file(&project_root.join("CLAUDE.md"))?;
    Ok(CleanupSummary {
        agents_md_cleaned,
        claude_md_cleaned,
    })
}

fn cleanup_file(path: &Path) -> Result<bool, String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(format!("failed to read {}: {}", path.display(), e)),
    };

    let (cleaned, removed) = remove_managed_block(&content);
    if !removed {
        return Ok(false);
    }

    write_atomic(path, cleaned.as_bytes()).map_err(|e| e.to_string())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ProjectGuideline, ProjectSource, SourceKind};
    use tempfile::TempDir;

    fn config_with_source(name: &str) -> ProjectConfig {
        ProjectConfig {
            version: 1,
            agents: Vec::new(),
            sources: vec![ProjectSource {
                name: name.to_string(),
                kind: SourceKind::LocalPath,
                url: String::new(),
                path: "shared".to_string(),
                git_ref: String::new(),
                commit: String::new(),
                guidelines: vec![ProjectGuideline {
                    name: "style".to_string(),
                    file: "guidelines/style.md".to_string(),
                    description: "Style guide".to_string(),
                    applicable_scenarios: vec![
                        "Writing code".to_string(),
                        "Reviewing code".to_string(),
                    ],
                    prompts: vec!["review".to_string()],
                }],
                prompts: vec![ProjectPrompt {
                    name: "review".to_string(),
                    file: "prompts/review.md".to_string(),
                    description: "Review prompt".to_string(),
                }],
            }],
        }
    }

    fn vendor_prompt(root: &Path, source: &str) {
        let dir = root.join(vendor_dir(source)).join("prompts");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("review.md"), "Do a careful review.\n").unwrap();
    }

    #[test]
    fn test_instructions_content_lists_scenarios() {
        let cfg = config_with_source("team");
        let content = instructions_content(&cfg);

        assert!(content.contains("## Graft Guidelines"));
        assert!(content.contains("`@/graft/team/guidelines/style.md`"));
        assert!(content.contains("* Writing code"));
        assert!(content.contains("* Reviewing code"));
    }

    #[test]
    fn test_instructions_content_no_sources() {
        let cfg = ProjectConfig {
            version: 1,
            ..Default::default()
        };
        let content = instructions_content(&cfg);
        assert!(content.contains("No guideline sources configured yet"));
    }

    #[test]
    fn test_generate_creates_files() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_with_source("team");
        vendor_prompt(tmp.path(), "team");

        let summary = generate_agent_files(
            tmp.path(),
            &cfg,
            &["claude-code".to_string(), "cursor".to_string()],
        );

        assert!(summary.is_ok(), "errors: {:?}", summary.errors);
        assert!(summary.agents_md);
        assert!(summary.claude_md);
        assert_eq!(summary.prompt_files.get("claude-code"), Some(&1));
        assert_eq!(summary.prompt_files.get("cursor"), Some(&1));

        assert!(tmp.path().join("AGENTS.md").exists());
        assert!(tmp.path().join("CLAUDE.md").exists());

        let claude_file = tmp.path().join(".claude/commands/graft/team-review.md");
        let content = fs::read_to_string(claude_file).unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.contains("name: Graft: Team Review"));
        assert!(content.contains("Do a careful review."));
        assert!(content.contains(MANAGED_BLOCK_START));

        let cursor_file = tmp.path().join(".cursor/commands/graft-team-review.md");
        let content = fs::read_to_string(cursor_file).unwrap();
        assert!(content.contains("name: /graft-team-review"));
    }

    #[test]
    fn test_claude_md_only_when_selected() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_with_source("team");
        vendor_prompt(tmp.path(), "team");

        let summary = generate_agent_files(tmp.path(), &cfg, &["cursor".to_string()]);
        assert!(summary.agents_md);
        assert!(!summary.claude_md);
        assert!(!tmp.path().join("CLAUDE.md").exists());
    }

    #[test]
    fn test_generate_preserves_user_content() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_with_source("team");
        vendor_prompt(tmp.path(), "team");

        fs::write(
            tmp.path().join("AGENTS.md"),
            "# Hand-written notes\n\nKeep me around.\n",
        )
        .unwrap();

        let summary = generate_agent_files(tmp.path(), &cfg, &[]);
        assert!(summary.is_ok(), "errors: {:?}", summary.errors);

        let content = fs::read_to_string(tmp.path().join("AGENTS.md")).unwrap();
        assert!(content.contains("# Hand-written notes"));
        assert!(content.contains("Keep me around."));
        assert!(content.contains(MANAGED_BLOCK_START));
    }

    #[test]
    fn test_generate_idempotent() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_with_source("team");
        vendor_prompt(tmp.path(), "team");
        let agents = vec!["claude-code".to_string()];

        generate_agent_files(tmp.path(), &cfg, &agents);
        let first = fs::read_to_string(tmp.path().join("AGENTS.md")).unwrap();
        let first_cmd =
            fs::read_to_string(tmp.path().join(".claude/commands/graft/team-review.md")).unwrap();

        generate_agent_files(tmp.path(), &cfg, &agents);
        let second = fs::read_to_string(tmp.path().join("AGENTS.md")).unwrap();
        let second_cmd =
            fs::read_to_string(tmp.path().join(".claude/commands/graft/team-review.md")).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_cmd, second_cmd);
    }

    #[test]
    fn test_missing_prompt_body_collected_as_error() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_with_source("team");
        // Vendored prompt file deliberately absent

        let summary = generate_agent_files(tmp.path(), &cfg, &["cursor".to_string()]);
        assert!(!summary.is_ok());
        assert!(summary.errors[0].contains("team/review"));
        // The instructions files still generated
        assert!(summary.agents_md);
    }

    #[test]
    fn test_cleanup_agent_files() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_with_source("team");
        vendor_prompt(tmp.path(), "team");
        generate_agent_files(tmp.path(), &cfg, &["claude-code".to_string()]);

        let summary = cleanup_agent_files(tmp.path()).unwrap();
        assert!(summary.agents_md_cleaned);
        assert!(summary.claude_md_cleaned);

        let content = fs::read_to_string(tmp.path().join("AGENTS.md")).unwrap();
        assert!(!content.contains(MANAGED_BLOCK_START));

        // Second cleanup finds nothing to remove
        let summary = cleanup_agent_files(tmp.path()).unwrap();
        assert!(!summary.agents_md_cleaned);
        assert!(!summary.claude_md_cleaned);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("team-guidelines"), "Team Guidelines");
        assert_eq!(title_case("review"), "Review");
        assert_eq!(title_case("a-b-c"), "A B C");
    }
}
