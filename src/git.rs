//! Git CLI integration
//!
//! Wrapper around the `git` client for fetching source repositories.
//! Uses the CLI instead of a library binding so the user's existing
//! credential setup (ssh agent, credential helpers) just works.

use std::fmt;
use std::path::Path;
use std::process::Command;

/// Error type for git operations
#[derive(Debug)]
pub enum GitError {
    EmptyUrl,
    UnsupportedUrl { url: String },
    CloneFailed { url: String, stderr: String },
    RevParseFailed { stderr: String },
    IoError(std::io::Error),
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitError::EmptyUrl => write!(f, "git URL cannot be empty"),
            GitError::UnsupportedUrl { url } => write!(
                f,
                "only HTTPS and SSH URLs are supported (https:// or git@): {}",
                url
            ),
            GitError::CloneFailed { url, stderr } => {
                write!(f, "git clone of {} failed: {}", url, stderr.trim())
            }
            GitError::RevParseFailed { stderr } => {
                write!(f, "failed to resolve HEAD commit: {}", stderr.trim())
            }
            GitError::IoError(e) => write!(f, "failed to run git: {}", e),
        }
    }
}

impl std::error::Error for GitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GitError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GitError {
    fn from(e: std::io::Error) -> Self {
        GitError::IoError(e)
    }
}

pub type Result<T> = std::result::Result<T, GitError>;

/// Validate that a git URL uses a supported, secure transport.
/// Accepts `https://` and `git@` (SSH); the plaintext `git://` protocol is
/// covered by the same rejection.
pub fn validate_git_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(GitError::EmptyUrl);
    }
    if !url.starts_with("https://") && !url.starts_with("git@") {
        return Err(GitError::UnsupportedUrl {
            url: url.to_string(),
        });
    }
    Ok(())
}

/// Shallow-clone a repository into `dest_dir` and return the resolved HEAD
/// commit hash. When `git_ref` is non-empty it is passed as `--branch`
/// (works for branches and tags).
pub fn clone_repo(url: &str, git_ref: &str, dest_dir: &Path) -> Result<String> {
    validate_git_url(url)?;

    let mut cmd = Command::new("git");
    cmd.args(["clone", "--depth=1", "--single-branch", "--quiet"]);
    if !git_ref.is_empty() {
        cmd.args(["--branch", git_ref]);
    }
    cmd.arg(url).arg(dest_dir);

    let output = cmd.output()?;
    if !output.status.success() {
        return Err(GitError::CloneFailed {
            url: url.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    resolve_head(dest_dir)
}

/// Resolve the HEAD commit hash of a local checkout
pub fn resolve_head(repo_dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_dir)
        .args(["rev-parse", "HEAD"])
        .output()?;

    if !output.status.success() {
        return Err(GitError::RevParseFailed {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Create a scratch directory for a clone. The directory and its contents
/// are removed when the returned guard is dropped.
pub fn create_temp_clone_dir() -> Result<tempfile::TempDir> {
    let dir = tempfile::Builder::new().prefix("graft-clone-").tempdir()?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_git_url() {
        assert!(validate_git_url("https://github.com/acme/guidelines.git").is_ok());
        assert!(validate_git_url("git@github.com:acme/guidelines.git").is_ok());

        assert!(matches!(validate_git_url(""), Err(GitError::EmptyUrl)));
        assert!(matches!(
            validate_git_url("git://github.com/acme/guidelines.git"),
            Err(GitError::UnsupportedUrl { .. })
        ));
        assert!(matches!(
            validate_git_url("http://github.com/acme/guidelines.git"),
            Err(GitError::UnsupportedUrl { .. })
        ));
        assert!(matches!(
            validate_git_url("ftp://example.com/repo"),
            Err(GitError::UnsupportedUrl { .. })
        ));
    }

    #[test]
    fn test_temp_clone_dir_removed_on_drop() {
        let dir = create_temp_clone_dir().unwrap();
        let path = dir.path().to_path_buf();
        assert!(path.exists());
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn test_clone_rejects_bad_url_without_running_git() {
        let dir = create_temp_clone_dir().unwrap();
        let err = clone_repo("git://insecure/repo", "", dir.path()).unwrap_err();
        assert!(matches!(err, GitError::UnsupportedUrl { .. }));
    }
}
