//! Source name derivation
//!
//! When `--name` is not given, the source name is derived from the git URL
//! or local directory name and sanitized into spinal-case.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref MULTI_HYPHEN: Regex = Regex::new(r"-+").unwrap();
}

/// Derive a source name from a git URL or local path.
pub fn derive_source_name(git_url: &str, local_path: &str) -> String {
    let raw = if !git_url.is_empty() {
        extract_repo_name(git_url)
    } else {
        Path::new(local_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    };
    sanitize_name(&raw)
}

/// Extract the repository name from a git URL.
///
/// Handles https URLs and scp-style SSH forms:
/// `https://github.com/acme/team-guidelines.git` -> `team-guidelines`,
/// `git@github.com:acme/guidelines.git` -> `guidelines`.
pub fn extract_repo_name(git_url: &str) -> String {
    // For SSH URLs the path part follows the colon
    let path_part = if git_url.starts_with("git@") {
        git_url.split_once(':').map(|(_, p)| p).unwrap_or(git_url)
    } else {
        // Strip scheme and host from http(s) URLs
        match git_url.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or(""),
            None => git_url,
        }
    };

    let name = path_part
        .trim_start_matches('/')
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");
    let name = name.strip_suffix(".git").unwrap_or(name);

    if name.is_empty() {
        "unknown".to_string()
    } else {
        name.to_string()
    }
}

/// Sanitize a raw name into a valid source name: lowercase, non-alphanumeric
/// runs replaced by single hyphens, no leading or trailing hyphen.
pub fn sanitize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let hyphenated = NON_ALNUM.replace_all(&lowered, "-");
    let collapsed = MULTI_HYPHEN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}
