//! File copying and atomic writes
//!
//! `copy_guideline_files` vendors a batch of guideline and prompt files into
//! the project with all-or-nothing semantics: the first failure removes
//! everything the call already copied, so a partial set is never left on
//! disk as the outcome of a call. `write_atomic` is the
//! temp-write-then-rename primitive used for the project state document and
//! every generated integration file.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::manifest::{ManifestGuideline, ManifestPrompt};

/// Error type for copy and write operations
#[derive(Debug)]
pub enum CopyError {
    /// A file in the batch could not be copied; the batch was rolled back
    CopyFailed {
        file: String,
        source: std::io::Error,
    },
    /// The destination directory could not be created
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    /// The atomic write could not be completed; the previous file is intact
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyError::CopyFailed { file, source } => {
                write!(f, "failed to copy {}: {}", file, source)
            }
            CopyError::CreateDir { dir, source } => {
                write!(f, "failed to create directory {}: {}", dir.display(), source)
            }
            CopyError::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CopyError::CopyFailed { source, .. }
            | CopyError::CreateDir { source, .. }
            | CopyError::WriteFailed { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, CopyError>;

/// Copy guideline and prompt files from the source content root into the
/// project, preserving the manifest's relative layout.
///
/// Pre-existing destination files are overwritten. On the first failure,
/// every file copied by this call is removed (best effort) and the error is
/// returned, leaving the destination tree as it was before the call.
pub fn copy_guideline_files(
    source_dir: &Path,
    dest_dir: &Path,
    guidelines: &[ManifestGuideline],
    prompts: &[ManifestPrompt],
) -> Result<()> {
    let mut copied: Vec<PathBuf> = Vec::new();

    let files = guidelines
        .iter()
        .map(|g| g.file.as_str())
        .chain(prompts.iter().map(|p| p.file.as_str()));

    for file in files {
        let src = source_dir.join(file);
        let dst = dest_dir.join(file);
        if let Err(source) = copy_file(&src, &dst) {
            rollback(&copied);
            return Err(CopyError::CopyFailed {
                file: file.to_string(),
                source,
            });
        }
        copied.push(dst);
    }

    Ok(())
}

/// Best-effort cleanup of files copied earlier in a failed batch.
fn rollback(copied: &[PathBuf]) {
    for file in copied {
        let _ = fs::remove_file(file);
    }
}

/// Copy a single file, creating parent directories as needed.
fn copy_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(())
}

/// Write `content` to `path` atomically: the bytes go to a temp file in the
/// same directory, which is then renamed over the destination. A reader
/// never observes a half-written file, and on failure the previous file at
/// `path` is untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|source| CopyError::CreateDir {
            dir: dir.clone(),
            source,
        })?;
    }

    let wrap = |source: std::io::Error| CopyError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(wrap)?;
    tmp.write_all(content).map_err(wrap)?;
    tmp.flush().map_err(wrap)?;
    tmp.persist(path).map_err(|e| wrap(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn guideline(file: &str) -> ManifestGuideline {
        ManifestGuideline {
            name: "test".to_string(),
            file: file.to_string(),
            description: "Test guideline".to_string(),
            applicable_scenarios: vec!["Testing".to_string()],
            prompts: Vec::new(),
        }
    }

    fn prompt(file: &str) -> ManifestPrompt {
        ManifestPrompt {
            name: "test".to_string(),
            file: file.to_string(),
            description: "Test prompt".to_string(),
        }
    }

    fn write_source_file(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_copy_batch() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_source_file(src.path(), "guidelines/style.md", "style body");
        write_source_file(src.path(), "prompts/review.md", "review body");

        copy_guideline_files(
            src.path(),
            dst.path(),
            &[guideline("guidelines/style.md")],
            &[prompt("prompts/review.md")],
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(dst.path().join("guidelines/style.md")).unwrap(),
            "style body"
        );
        assert_eq!(
            fs::read_to_string(dst.path().join("prompts/review.md")).unwrap(),
            "review body"
        );
    }

    #[test]
    fn test_copy_overwrites_existing() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_source_file(src.path(), "guidelines/style.md", "new body");
        write_source_file(dst.path(), "guidelines/style.md", "old body");

        copy_guideline_files(src.path(), dst.path(), &[guideline("guidelines/style.md")], &[])
            .unwrap();

        assert_eq!(
            fs::read_to_string(dst.path().join("guidelines/style.md")).unwrap(),
            "new body"
        );
    }

    #[test]
    fn test_copy_rolls_back_on_missing_source() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_source_file(src.path(), "guidelines/first.md", "first");
        // guidelines/missing.md deliberately absent

        let err = copy_guideline_files(
            src.path(),
            dst.path(),
            &[guideline("guidelines/first.md"), guideline("guidelines/missing.md")],
            &[],
        )
        .unwrap_err();

        assert!(err.to_string().contains("missing.md"));
        // The successfully copied file was removed again
        assert!(!dst.path().join("guidelines/first.md").exists());
    }

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.yaml");

        write_atomic(&path, b"version: 1\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version: 1\n");

        write_atomic(&path, b"version: 2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version: 2\n");

        // No stray temp files left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "state.yaml")
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_atomic_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.md");

        write_atomic(&path, b"content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }
}
