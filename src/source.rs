//! Origin adapter: turn an origin descriptor into a validated manifest
//! snapshot plus a readable content root
//!
//! Git origins are cloned into a scratch directory whose lifetime is tied to
//! the returned [`FetchedSource`]; dropping it releases the checkout. Local
//! origins read in place and own nothing.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::git;
use crate::manifest::{Manifest, ManifestError, MANIFEST_FILE_NAME};
use crate::project::SourceKind;
use crate::validate::{self, ValidationErrors};

/// Information about a fetched source
#[derive(Debug)]
pub struct SourceInfo {
    pub manifest: Manifest,
    /// Directory holding the manifest and its referenced files
    pub source_dir: PathBuf,
    pub kind: SourceKind,
    pub url: String,
    pub path: String,
    pub git_ref: String,
    /// Resolved HEAD commit for git sources, empty otherwise
    pub commit: String,
}

/// A fetched source together with the scratch checkout keeping its content
/// root alive. The checkout is removed when this value is dropped.
#[derive(Debug)]
pub struct FetchedSource {
    pub info: SourceInfo,
    _checkout: Option<tempfile::TempDir>,
}

impl FetchedSource {
    pub fn manifest(&self) -> &Manifest {
        &self.info.manifest
    }

    pub fn source_dir(&self) -> &Path {
        &self.info.source_dir
    }
}

/// Error type for source fetching
#[derive(Debug)]
pub enum SourceError {
    Git(git::GitError),
    Manifest(ManifestError),
    Validation(ValidationErrors),
    PathNotFound(PathBuf),
    NotADirectory(PathBuf),
    IoError(std::io::Error),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Git(e) => write!(f, "failed to fetch git source: {}", e),
            SourceError::Manifest(e) => write!(f, "failed to load manifest: {}", e),
            SourceError::Validation(errs) => {
                write!(f, "manifest validation failed: {}", errs)
            }
            SourceError::PathNotFound(path) => {
                write!(f, "path does not exist: {}", path.display())
            }
            SourceError::NotADirectory(path) => {
                write!(f, "path is not a directory: {}", path.display())
            }
            SourceError::IoError(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Git(e) => Some(e),
            SourceError::Manifest(e) => Some(e),
            SourceError::Validation(e) => Some(e),
            SourceError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<git::GitError> for SourceError {
    fn from(e: git::GitError) -> Self {
        SourceError::Git(e)
    }
}

impl From<ManifestError> for SourceError {
    fn from(e: ManifestError) -> Self {
        SourceError::Manifest(e)
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Clone a git repository and parse + validate its manifest.
pub fn fetch_git_source(url: &str, git_ref: &str) -> Result<FetchedSource> {
    let checkout = git::create_temp_clone_dir()?;
    let commit = git::clone_repo(url, git_ref, checkout.path())?;

    let manifest = load_validated_manifest(checkout.path())?;

    Ok(FetchedSource {
        info: SourceInfo {
            manifest,
            source_dir: checkout.path().to_path_buf(),
            kind: SourceKind::GitRepo,
            url: url.to_string(),
            path: String::new(),
            git_ref: git_ref.to_string(),
            commit,
        },
        _checkout: Some(checkout),
    })
}

/// Read a manifest from a local directory. No scratch space is created.
pub fn fetch_local_source(path: &Path) -> Result<FetchedSource> {
    let metadata = fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SourceError::PathNotFound(path.to_path_buf())
        } else {
            SourceError::IoError(e)
        }
    })?;
    if !metadata.is_dir() {
        return Err(SourceError::NotADirectory(path.to_path_buf()));
    }

    let abs_path = fs::canonicalize(path).map_err(SourceError::IoError)?;
    let manifest = load_validated_manifest(&abs_path)?;

    Ok(FetchedSource {
        info: SourceInfo {
            manifest,
            source_dir: abs_path.clone(),
            kind: SourceKind::LocalPath,
            url: String::new(),
            path: abs_path.to_string_lossy().into_owned(),
            git_ref: String::new(),
            commit: String::new(),
        },
        _checkout: None,
    })
}

/// Parse the manifest at `dir` and run full validation against it, so a
/// malformed manifest is rejected before any reconciliation or mutation.
fn load_validated_manifest(dir: &Path) -> Result<Manifest> {
    let manifest = Manifest::load(&dir.join(MANIFEST_FILE_NAME))?;

    let errors = validate::validate_manifest(&manifest, dir);
    if !errors.is_empty() {
        return Err(SourceError::Validation(errors));
    }

    Ok(manifest)
}
