//! Path sandbox — the single gate every file-touching tool passes through.
//!
//! A [`SandboxContext`] is fixed when the working directory is selected and
//! threaded as an immutable value through every tool handler. Resolution is
//! purely lexical: the candidate is joined against the current directory,
//! `.`/`..` components are folded, and the result must stay at or below the
//! sandbox root. No filesystem access happens here, so nonexistent targets
//! (a file about to be created) validate the same way as existing ones.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Error produced when a path fails sandbox validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SandboxError {
    #[error("Access denied: '{path}' is outside the working directory")]
    AccessDenied { path: String },
}

/// The fixed directory boundary for one session.
///
/// `root` is the boundary no resolved path may escape; `cwd` is the base for
/// relative inputs. Directory changes produce a new context via
/// [`with_cwd`](Self::with_cwd) rather than mutating shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxContext {
    root: PathBuf,
    cwd: PathBuf,
}

impl SandboxContext {
    /// Create a context rooted (and initially based) at `root`.
    ///
    /// `root` is expected to be absolute; callers canonicalize it once when
    /// the working directory is chosen.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            cwd: root.clone(),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Derive a new context with a different current directory.
    ///
    /// The new cwd must itself validate against the root.
    pub fn with_cwd(&self, cwd: impl AsRef<str>) -> Result<Self, SandboxError> {
        let resolved = self.resolve(Some(cwd.as_ref()))?;
        Ok(Self {
            root: self.root.clone(),
            cwd: resolved,
        })
    }

    /// Resolve `path` to an absolute path inside the sandbox.
    ///
    /// A missing path defaults to `"."` (the current directory). Relative
    /// inputs are joined against `cwd`; absolute inputs are accepted only if
    /// they already lie under the root. Fails with
    /// [`SandboxError::AccessDenied`] when the normalized result is neither
    /// the root itself nor a descendant of it.
    pub fn resolve(&self, path: Option<&str>) -> Result<PathBuf, SandboxError> {
        let raw = path.unwrap_or(".");
        let candidate = Path::new(raw);

        let joined = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.cwd.join(candidate)
        };

        let normalized = normalize(&joined);

        if normalized == self.root || normalized.starts_with(&self.root) {
            Ok(normalized)
        } else {
            Err(SandboxError::AccessDenied {
                path: raw.to_string(),
            })
        }
    }

    /// True when `path` resolves to the sandbox root itself.
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.root
    }
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the top of the stack pops the previous component; leading `..`
/// above the filesystem root is dropped, which keeps the later prefix check
/// authoritative.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SandboxContext {
        SandboxContext::new("/work/project")
    }

    #[test]
    fn test_relative_path_resolves_under_root() {
        let resolved = ctx().resolve(Some("notes/a.txt")).unwrap();
        assert_eq!(resolved, PathBuf::from("/work/project/notes/a.txt"));
    }

    #[test]
    fn test_missing_path_defaults_to_cwd() {
        assert_eq!(ctx().resolve(None).unwrap(), PathBuf::from("/work/project"));
    }

    #[test]
    fn test_dot_segments_are_folded() {
        let resolved = ctx().resolve(Some("./a/../b/c.txt")).unwrap();
        assert_eq!(resolved, PathBuf::from("/work/project/b/c.txt"));
    }

    #[test]
    fn test_parent_escape_is_denied() {
        let err = ctx().resolve(Some("../outside.txt")).unwrap_err();
        assert!(matches!(err, SandboxError::AccessDenied { .. }));
    }

    #[test]
    fn test_deep_escape_is_denied() {
        assert!(ctx().resolve(Some("a/b/../../../../etc/passwd")).is_err());
    }

    #[test]
    fn test_absolute_path_inside_root_is_accepted() {
        let resolved = ctx().resolve(Some("/work/project/src/main.rs")).unwrap();
        assert_eq!(resolved, PathBuf::from("/work/project/src/main.rs"));
    }

    #[test]
    fn test_absolute_path_outside_root_is_denied() {
        assert!(ctx().resolve(Some("/etc/passwd")).is_err());
    }

    #[test]
    fn test_sibling_prefix_is_not_a_descendant() {
        // "/work/project-backup" shares a string prefix with the root but is
        // not inside it; the component-wise check must reject it.
        assert!(ctx().resolve(Some("/work/project-backup/x")).is_err());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let a = ctx().resolve(Some("x/y.txt")).unwrap();
        let b = ctx().resolve(Some("x/y.txt")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_with_cwd_rebases_relative_paths() {
        let nested = ctx().with_cwd("sub").unwrap();
        assert_eq!(nested.cwd(), Path::new("/work/project/sub"));
        assert_eq!(nested.root(), Path::new("/work/project"));

        let resolved = nested.resolve(Some("file.txt")).unwrap();
        assert_eq!(resolved, PathBuf::from("/work/project/sub/file.txt"));
    }

    #[test]
    fn test_with_cwd_cannot_escape() {
        assert!(ctx().with_cwd("../elsewhere").is_err());
    }

    #[test]
    fn test_is_root() {
        let c = ctx();
        let resolved = c.resolve(Some(".")).unwrap();
        assert!(c.is_root(&resolved));
        assert!(!c.is_root(Path::new("/work/project/sub")));
    }
}
