//! File discovery for a transformation run.
//! Walks the target root and keeps the regular files selected by an ordered
//! list of glob patterns, similar to .gitignore negation syntax.

use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Patterns used when the caller supplies none.
///
/// A leading `!` marks an exclusion. Supplying any list replaces this one
/// wholesale; the two are never merged.
pub const DEFAULT_PATTERNS: [&str; 10] = [
    "**/*",
    "!**/.git/**",
    "!**/.vscode/**",
    "!**/.idea/**",
    "!**/node_modules/**",
    "!**/ios/Pods/**",
    "!**/ios/build/**",
    "!**/android/build/**",
    "!**/android/app/build/**",
    "!**/target/**",
];

/// Include and exclude sets compiled from a pattern list.
///
/// Exclusions of the form `dir/**` also prune `dir` itself, so excluded
/// directories are never descended into.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: GlobSet,
    exclude: GlobSet,
    prune: GlobSet,
}

impl FileFilter {
    /// Compiles `patterns`, splitting them on the leading `!`.
    ///
    /// # Errors
    /// * `Error::GlobError` if any pattern is not a valid glob
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut prune = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let compile = |glob: &str| {
                Glob::new(glob).map_err(|source| Error::GlobError {
                    pattern: pattern.to_string(),
                    source,
                })
            };
            match pattern.strip_prefix('!') {
                Some(negated) => {
                    exclude.add(compile(negated)?);
                    // Everything below a directory matching the stem matches `stem/**`.
                    if let Some(stem) = negated.strip_suffix("/**") {
                        if !stem.is_empty() {
                            prune.add(compile(stem)?);
                        }
                    }
                }
                None => {
                    include.add(compile(pattern)?);
                }
            }
        }

        let build = |builder: GlobSetBuilder| {
            builder.build().map_err(|source| Error::GlobError {
                pattern: patterns
                    .iter()
                    .map(|p| p.as_ref())
                    .collect::<Vec<_>>()
                    .join(", "),
                source,
            })
        };

        Ok(Self {
            include: build(include)?,
            exclude: build(exclude)?,
            prune: build(prune)?,
        })
    }

    /// Whether a root-relative path is selected.
    pub fn is_match<P: AsRef<Path>>(&self, relative: P) -> bool {
        let relative = relative.as_ref();
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }

    /// Whether the root-relative directory `relative` and everything below
    /// it is excluded.
    pub fn prunes<P: AsRef<Path>>(&self, relative: P) -> bool {
        self.prune.is_match(relative.as_ref())
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        // The default patterns are constants known to compile.
        Self::new(&DEFAULT_PATTERNS).expect("default patterns are valid")
    }
}

/// Files selected under a root, plus the entries the walk could not read.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Absolute paths of the selected regular files, sorted by file name
    /// within each directory.
    pub files: Vec<PathBuf>,
    /// Paths that could not be read during the walk and why.
    pub failures: Vec<(PathBuf, Error)>,
}

/// Walks `root` and collects every regular file selected by `filter`, in a
/// deterministic order.
///
/// Directories pruned by the filter are not entered. An unreadable entry is
/// logged and recorded in [`Discovery::failures`]; the walk carries on with
/// its siblings.
///
/// # Errors
/// * `Error::InvalidRootError` if the root is missing or not a directory
/// * `Error::FileError` if the root cannot be canonicalized
pub fn discover_files<P: AsRef<Path>>(root: P, filter: &FileFilter) -> Result<Discovery> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::InvalidRootError { root: root.display().to_string() });
    }
    let root = root.canonicalize().map_err(|e| Error::file(root, e))?;

    let walker = WalkDir::new(&root).sort_by_file_name().into_iter().filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        if filter.prunes(relative) {
            debug!("Pruning '{}'.", relative.display());
            return false;
        }
        true
    });

    let mut discovery = Discovery::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let path = source.path().unwrap_or(root.as_path()).to_path_buf();
                let err = Error::WalkError { path: path.clone(), source };
                warn!("{}", err);
                discovery.failures.push((path, err));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(&root).unwrap_or(path);
        if filter.is_match(relative) {
            discovery.files.push(path.to_path_buf());
        } else {
            debug!("Skipping '{}'.", relative.display());
        }
    }

    debug!(
        "Discovered {} file(s) under '{}', {} unreadable.",
        discovery.files.len(),
        root.display(),
        discovery.failures.len()
    );
    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = FileFilter::default();
        assert!(filter.is_match("app/app.tsx"));
        assert!(filter.is_match("README.md"));
        assert!(!filter.is_match(".git/HEAD"));
        assert!(!filter.is_match("node_modules/react/index.js"));
        assert!(!filter.is_match("packages/ui/node_modules/x.js"));
        assert!(!filter.is_match("ios/Pods/Manifest.lock"));
    }

    #[test]
    fn test_empty_patterns_select_nothing() {
        let filter = FileFilter::new::<&str>(&[]).unwrap();
        assert!(!filter.is_match("app.tsx"));
    }

    #[test]
    fn test_default_filter_prunes_excluded_directories() {
        let filter = FileFilter::default();
        assert!(filter.prunes("node_modules"));
        assert!(filter.prunes("packages/ui/node_modules"));
        assert!(filter.prunes("ios/Pods"));
        assert!(filter.prunes(".git"));
        assert!(!filter.prunes("ios"));
        assert!(!filter.prunes("app/models"));
    }

    #[test]
    fn test_only_directory_exclusions_prune() {
        let filter = FileFilter::new(&["**/*", "!**/*.snap", "!build/**"]).unwrap();
        assert!(filter.prunes("build"));
        assert!(!filter.prunes("app/__snapshots__"));
        assert!(!filter.prunes("app/build"));
    }

    #[test]
    fn test_invalid_glob() {
        assert!(matches!(FileFilter::new(&["a/[b"]), Err(Error::GlobError { .. })));
    }
}
