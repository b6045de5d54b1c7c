//! PathSet: validated, lazily walked sets of local files.
//!
//! Traversal and glob filtering are separate stages: [`PathSet::walk`]
//! yields every regular file under the root, [`PathSet::enumerate`] applies
//! the optional [`GlobFilter`] on top without reordering.
//!
//! Walk order: top-down, files of a directory before its subdirectories,
//! siblings by file name.

use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::TransferError;

/// Reject relative paths and paths with a `..` segment.
///
/// Pure string inspection; never touches the filesystem.
pub fn validate_local_path(path: &Path) -> Result<(), TransferError> {
    let traverses = path
        .components()
        .any(|component| matches!(component, Component::ParentDir));
    if traverses || !path.is_absolute() {
        return Err(TransferError::InvalidPath {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GlobFilter
// ---------------------------------------------------------------------------

/// Shell-style pattern (`*`, `?`, `[...]`) matched against a path's full
/// string form. `*` also matches `/`.
///
/// Patterns are read the way `fnmatch` reads them: a run of `*` is one
/// wildcard, and a `[` without a closing `]` is a literal character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobFilter {
    pattern: glob::Pattern,
}

impl GlobFilter {
    pub fn new(pattern: &str) -> Result<Self, TransferError> {
        let compiled = glob::Pattern::new(&shell_pattern(pattern)).map_err(|source| {
            TransferError::InvalidGlob {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(GlobFilter { pattern: compiled })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.pattern.matches(&path.to_string_lossy())
    }
}

/// Rewrite `pattern` into the `glob` crate's syntax with `fnmatch` meaning.
fn shell_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                while i < chars.len() && chars[i] == '*' {
                    i += 1;
                }
                out.push('*');
            }
            '[' => match bracket_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end + 1;
                }
                None => {
                    out.push_str("[[]");
                    i += 1;
                }
            },
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Index of the `]` closing the class opened at `start`. A `]` directly
/// after `[` or `[!` is a member, not the close.
fn bracket_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    j += 1;
    chars
        .get(j..)?
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

// ---------------------------------------------------------------------------
// PathSet
// ---------------------------------------------------------------------------

/// A validated traversal root plus an optional filter.
#[derive(Debug, Clone)]
pub struct PathSet {
    root: PathBuf,
    glob: Option<GlobFilter>,
}

impl PathSet {
    /// Validate `root`; fails with [`TransferError::InvalidPath`] before any
    /// filesystem access.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, TransferError> {
        let root = root.into();
        validate_local_path(&root)?;
        Ok(PathSet { root, glob: None })
    }

    /// Attach an optional glob filter.
    pub fn with_glob(mut self, pattern: Option<&str>) -> Result<Self, TransferError> {
        self.glob = pattern.map(GlobFilter::new).transpose()?;
        Ok(self)
    }

    /// Unfiltered traversal. Each call walks the tree again.
    pub fn walk(&self) -> PathWalk {
        if self.root.is_file() {
            return PathWalk {
                inner: WalkInner::Single(Some(self.root.clone())),
            };
        }
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by(files_then_dirs)
            .into_iter();
        PathWalk {
            inner: WalkInner::Tree(walker),
        }
    }

    /// Traversal with the glob filter applied.
    pub fn enumerate(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let glob = self.glob.as_ref();
        self.walk()
            .filter(move |path| glob.map_or(true, |g| g.matches(path)))
    }
}

/// Collect `root`'s files matching `glob`, in walk order.
pub fn enumerate(root: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>, TransferError> {
    let set = PathSet::new(root)?.with_glob(glob)?;
    Ok(set.enumerate().collect())
}

fn files_then_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

// ---------------------------------------------------------------------------
// PathWalk
// ---------------------------------------------------------------------------

/// Lazy, finite, non-restartable sequence of regular files.
pub struct PathWalk {
    inner: WalkInner,
}

enum WalkInner {
    Single(Option<PathBuf>),
    Tree(walkdir::IntoIter),
}

impl Iterator for PathWalk {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        match &mut self.inner {
            WalkInner::Single(path) => path.take(),
            WalkInner::Tree(walker) => loop {
                match walker.next()? {
                    Ok(entry) if is_regular_file(&entry) => return Some(entry.into_path()),
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::warn!("skipping unreadable entry: {err}");
                        continue;
                    }
                }
            },
        }
    }
}

/// Regular files, plus symlinks whose target is a regular file.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn rejects_relative_root() {
        let err = PathSet::new("relative/dir").unwrap_err();
        assert!(matches!(err, TransferError::InvalidPath { .. }));
    }

    #[test]
    fn rejects_parent_segments() {
        let err = PathSet::new("/tmp/../etc").unwrap_err();
        assert!(matches!(err, TransferError::InvalidPath { .. }));
        assert!(validate_local_path(Path::new("/tmp/a..b/c")).is_ok());
    }

    #[test]
    fn single_file_root_yields_itself() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("only.txt");
        touch(&file);
        let got = enumerate(&file, None).unwrap();
        assert_eq!(got, vec![file]);
    }

    #[test]
    fn walk_is_files_first_then_subdirs_sorted() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(&root.join("z.txt"));
        touch(&root.join("a.txt"));
        touch(&root.join("sub/b.txt"));
        touch(&root.join("sub/deeper/c.txt"));
        touch(&root.join("another/d.txt"));

        let got = enumerate(root, None).unwrap();
        assert_eq!(
            names(root, &got),
            vec!["a.txt", "z.txt", "another/d.txt", "sub/b.txt", "sub/deeper/c.txt"]
        );
    }

    #[test]
    fn directories_are_never_yielded() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("empty/nested")).unwrap();
        assert!(enumerate(tmp.path(), None).unwrap().is_empty());
    }

    #[test]
    fn glob_filters_without_reordering() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for name in ["b.conf", "a.txt", "c.conf", "sub/d.conf", "sub/e.txt"] {
            touch(&root.join(name));
        }
        let all = enumerate(root, None).unwrap();
        let confs = enumerate(root, Some("*.conf")).unwrap();

        assert_eq!(names(root, &confs), vec!["b.conf", "c.conf", "sub/d.conf"]);
        let expected: Vec<PathBuf> = all
            .into_iter()
            .filter(|p| p.extension().is_some_and(|e| e == "conf"))
            .collect();
        assert_eq!(confs, expected);
    }

    #[test]
    fn glob_character_classes_and_single_wildcards() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for name in ["log1", "log2", "log10", "logx"] {
            touch(&root.join(name));
        }
        let got = enumerate(root, Some("*/log[0-9]")).unwrap();
        assert_eq!(names(root, &got), vec!["log1", "log2"]);
        let got = enumerate(root, Some("*/log?")).unwrap();
        assert_eq!(names(root, &got), vec!["log1", "log2", "logx"]);
    }

    #[test]
    fn repeated_stars_act_as_one_wildcard() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for name in ["a.conf", "b.txt", "sub/c.conf"] {
            touch(&root.join(name));
        }
        let got = enumerate(root, Some("**.conf")).unwrap();
        assert_eq!(names(root, &got), vec!["a.conf", "sub/c.conf"]);
        assert_eq!(got, enumerate(root, Some("***.conf")).unwrap());
    }

    #[test]
    fn unclosed_bracket_is_literal() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for name in ["x[oops", "xoops", "o"] {
            touch(&root.join(name));
        }
        let got = enumerate(root, Some("*[oops")).unwrap();
        assert_eq!(names(root, &got), vec!["x[oops"]);
    }

    #[test]
    fn bracket_classes_follow_shell_closing_rules() {
        assert_eq!(shell_pattern("*[oops"), "*[[]oops");
        assert_eq!(shell_pattern("[]]x"), "[]]x");
        assert_eq!(shell_pattern("[!]"), "[[]!]");
        assert_eq!(shell_pattern("a/**/b"), "a/*/b");
        assert_eq!(shell_pattern("[*]"), "[*]");

        let filter = GlobFilter::new("*/[!]]").unwrap();
        assert!(filter.matches(Path::new("/d/a")));
        assert!(!filter.matches(Path::new("/d/]")));
    }

    #[test]
    fn each_walk_re_traverses() {
        let tmp = TempDir::new().unwrap();
        let set = PathSet::new(tmp.path()).unwrap();
        touch(&tmp.path().join("first"));
        assert_eq!(set.walk().count(), 1);
        touch(&tmp.path().join("second"));
        assert_eq!(set.walk().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dirs_are_not_descended_but_file_links_are_yielded() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        touch(&outside.path().join("secret.txt"));

        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(&root.join("real.txt"));
        symlink(outside.path(), root.join("linked_dir")).unwrap();
        symlink(outside.path().join("secret.txt"), root.join("link.txt")).unwrap();

        let got = enumerate(root, None).unwrap();
        assert_eq!(names(root, &got), vec!["link.txt", "real.txt"]);
    }
}
