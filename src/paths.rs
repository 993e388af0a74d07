//! Path confinement for project-relative file references
//!
//! Every path graft reads or writes is resolved against the project root.
//! Symlinks are followed before the containment check, so a link living
//! inside the project that points outside of it is rejected even though its
//! unresolved location would pass a naive prefix test.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Error type for path confinement violations
///
/// The variants are deliberately distinct: an absolute path where a relative
/// one was expected is a usage problem a caller may warn about (legacy
/// records), while an escape via `..` or a symlink is always a hard failure.
#[derive(Debug)]
pub enum PathError {
    /// An absolute path was given where a project-relative one was expected
    NotRelative { path: PathBuf },
    /// The path resolves to a location outside the project root
    OutsideRoot { path: PathBuf },
    /// A relative path climbs out of the project root via `..` segments
    EscapesRoot { path: PathBuf },
    /// The path could not be resolved on disk
    Unresolvable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::NotRelative { path } => {
                write!(f, "expected relative path, got absolute: {}", path.display())
            }
            PathError::OutsideRoot { path } => {
                write!(f, "path is outside project root: {}", path.display())
            }
            PathError::EscapesRoot { path } => {
                write!(f, "path escapes project root: {}", path.display())
            }
            PathError::Unresolvable { path, source } => {
                write!(f, "cannot resolve path {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PathError::Unresolvable { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PathError>;

/// Lexically normalize a path: drop `.` segments, fold `..` into the
/// preceding component where possible. Leading `..` segments of a relative
/// path are kept, matching what a shell would resolve.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is still `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.into_iter().collect()
    }
}

/// Resolve symlinks, falling back to the cleaned path when the target does
/// not exist yet. Write targets are validated before the file is created, so
/// a resolution failure is not an error here.
fn resolve_or_clean(path: &Path) -> PathBuf {
    let cleaned = clean(path);
    fs::canonicalize(&cleaned).unwrap_or(cleaned)
}

/// Check whether `child` is `parent` itself or lives underneath it.
///
/// Comparison is component-wise, so `/root` never falsely contains a
/// sibling like `/rootless`. Both paths must already be cleaned/resolved.
fn is_within(parent: &Path, child: &Path) -> bool {
    child == parent || child.starts_with(parent)
}

/// Convert an absolute path to a path relative to the project root.
///
/// The project root itself maps to `"."`. Returns an error if the path is
/// not under the root after symlink resolution.
pub fn make_relative(project_root: &Path, abs_path: &Path) -> Result<String> {
    let real_root = resolve_or_clean(project_root);
    let real_path = resolve_or_clean(abs_path);

    if real_path == real_root {
        return Ok(".".to_string());
    }

    match real_path.strip_prefix(&real_root) {
        Ok(rel) => Ok(rel.to_string_lossy().into_owned()),
        Err(_) => Err(PathError::OutsideRoot {
            path: abs_path.to_path_buf(),
        }),
    }
}

/// Resolve a relative path against the project root, returning the absolute
/// location. Rejects absolute input and anything that resolves outside the
/// root, including lexical `..` escapes on paths that do not exist yet.
pub fn resolve_relative(project_root: &Path, rel_path: &Path) -> Result<PathBuf> {
    if rel_path.is_absolute() {
        return Err(PathError::NotRelative {
            path: rel_path.to_path_buf(),
        });
    }

    let joined = project_root.join(rel_path);
    let real_path = resolve_or_clean(&joined);
    let real_root = resolve_or_clean(project_root);

    if !is_within(&real_root, &real_path) {
        return Err(PathError::EscapesRoot {
            path: rel_path.to_path_buf(),
        });
    }

    Ok(real_path)
}

/// Validate that a path, absolute or relative, stays inside the project
/// root after cleaning and symlink resolution.
pub fn validate_local_path(project_root: &Path, path: &Path) -> Result<()> {
    let abs_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        resolve_relative(project_root, path)?
    };

    let real_path = resolve_or_clean(&abs_path);
    let real_root = resolve_or_clean(project_root);

    if !is_within(&real_root, &real_path) {
        return Err(PathError::OutsideRoot {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Check whether an existing path is inside the project root once symlinks
/// are resolved. Unlike [`validate_local_path`] this requires the path to
/// exist: a containment answer for a missing path would be meaningless.
pub fn is_within_project(project_root: &Path, path: &Path) -> Result<bool> {
    let real_path = fs::canonicalize(clean(path)).map_err(|source| PathError::Unresolvable {
        path: path.to_path_buf(),
        source,
    })?;
    let real_root = resolve_or_clean(project_root);

    Ok(is_within(&real_root, &real_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_make_relative() {
        let cases = [
            ("/home/me/project", "/home/me/project/shared", "shared"),
            (
                "/home/me/project",
                "/home/me/project/shared/style",
                "shared/style",
            ),
            ("/home/me/project", "/home/me/project", "."),
            ("/home/me/project/", "/home/me/project/shared/", "shared"),
            ("/home/me/project", "/home/me/project/./shared", "shared"),
        ];
        for (root, abs, want) in cases {
            let got = make_relative(Path::new(root), Path::new(abs)).unwrap();
            assert_eq!(got, want, "root={root} abs={abs}");
        }
    }

    #[test]
    fn test_make_relative_rejects_outside() {
        let cases = [
            ("/home/me/project", "/home/me/shared"),
            ("/home/me/project", "/home/other/shared"),
            ("/home/me/project", "/home/me"),
        ];
        for (root, abs) in cases {
            let err = make_relative(Path::new(root), Path::new(abs)).unwrap_err();
            assert!(
                err.to_string().contains("outside project"),
                "unexpected error for {abs}: {err}"
            );
        }
    }

    #[test]
    fn test_resolve_relative() {
        let root = Path::new("/home/me/project");

        let got = resolve_relative(root, Path::new("shared")).unwrap();
        assert!(got.is_absolute());
        assert!(got.ends_with("project/shared"));

        let got = resolve_relative(root, Path::new("./shared/style")).unwrap();
        assert!(got.ends_with("project/shared/style"));

        let got = resolve_relative(root, Path::new(".")).unwrap();
        assert!(got.ends_with("project"));
    }

    #[test]
    fn test_resolve_relative_rejects_absolute() {
        let err = resolve_relative(Path::new("/home/me/project"), Path::new("/home/me/other"))
            .unwrap_err();
        assert!(err.to_string().contains("expected relative path"));
    }

    #[test]
    fn test_resolve_relative_rejects_escape() {
        let root = Path::new("/home/me/project");
        for rel in ["../outside", "foo/../../outside", "../../etc/passwd"] {
            let err = resolve_relative(root, Path::new(rel)).unwrap_err();
            assert!(
                err.to_string().contains("escapes project root"),
                "unexpected error for {rel}: {err}"
            );
        }
    }

    #[test]
    fn test_validate_local_path() {
        let root = Path::new("/home/me/project");

        assert!(validate_local_path(root, Path::new("shared")).is_ok());
        assert!(validate_local_path(root, Path::new("shared/style")).is_ok());
        assert!(validate_local_path(root, Path::new("/home/me/project/shared")).is_ok());

        assert!(validate_local_path(root, Path::new("../outside")).is_err());
        assert!(validate_local_path(root, Path::new("/home/other/shared")).is_err());
    }

    #[test]
    fn test_parent_traversal_in_candidate() {
        // /proj/../etc/passwd cleans to /etc/passwd which is outside /proj
        let err = validate_local_path(Path::new("/proj"), Path::new("/proj/../etc/passwd"))
            .unwrap_err();
        assert!(err.to_string().contains("outside project"));
    }

    #[test]
    fn test_is_within_sibling_prefix() {
        // "/home/me/proj" must not contain "/home/me/project"
        assert!(!is_within(
            Path::new("/home/me/proj"),
            Path::new("/home/me/project")
        ));
        assert!(is_within(
            Path::new("/home/me/project"),
            Path::new("/home/me/project")
        ));
        assert!(is_within(
            Path::new("/home/me/project"),
            Path::new("/home/me/project/shared/style")
        ));
        assert!(!is_within(
            Path::new("/home/me/project"),
            Path::new("/home/me")
        ));
    }

    #[test]
    fn test_clean() {
        let cases = [
            ("a/b/../c", "a/c"),
            ("./a/./b", "a/b"),
            ("a/..", "."),
            ("../a", "../a"),
            ("a/../../b", "../b"),
            ("/a/../..", "/"),
            ("/a/b/./../c", "/a/c"),
        ];
        for (input, want) in cases {
            assert_eq!(clean(Path::new(input)), PathBuf::from(want), "input={input}");
        }
    }

    #[test]
    fn test_is_within_project_requires_existing_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let sub = tmp.path().join("subdir");
        fs::create_dir(&sub).unwrap();

        assert!(is_within_project(tmp.path(), &sub).unwrap());
        assert!(is_within_project(tmp.path(), tmp.path()).unwrap());
        assert!(is_within_project(tmp.path(), &tmp.path().join("missing")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_resolution() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::TempDir::new().unwrap();
        let project = tmp.path().join("project");
        let inside = project.join("inside");
        let outside = tmp.path().join("outside");
        fs::create_dir_all(&inside).unwrap();
        fs::create_dir(&outside).unwrap();

        let link_inside = project.join("link-inside");
        let link_outside = project.join("link-outside");
        symlink(&inside, &link_inside).unwrap();
        symlink(&outside, &link_outside).unwrap();

        // Link target stays inside the project: fine
        assert!(validate_local_path(&project, &link_inside).is_ok());
        assert!(is_within_project(&project, &link_inside).unwrap());
        assert!(!make_relative(&project, &link_inside).unwrap().is_empty());

        // Link lives inside but points outside: rejected
        let err = validate_local_path(&project, &link_outside).unwrap_err();
        assert!(err.to_string().contains("outside project"));
        assert!(!is_within_project(&project, &link_outside).unwrap());
    }

    proptest! {
        // resolve + make_relative round-trips for well-formed relative paths
        #[test]
        fn prop_round_trip(segments in proptest::collection::vec("[a-z][a-z0-9]{0,8}", 1..5)) {
            let tmp = tempfile::TempDir::new().unwrap();
            let rel: PathBuf = segments.iter().collect();

            let abs = resolve_relative(tmp.path(), &rel).unwrap();
            let back = make_relative(tmp.path(), &abs).unwrap();
            prop_assert_eq!(PathBuf::from(back), rel);
        }
    }
}
