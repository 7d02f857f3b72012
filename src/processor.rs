//! Batch orchestration of a transformation run.
//! Discovers the files under the target root, decides per file what the
//! directives ask for and, unless running dry, writes or deletes the file.
//! Each file is an independent unit of work; failures are recorded in the
//! report next to the successful results instead of aborting the run.

use crate::directive::{DirectiveKind, Markup, DEFAULT_PREFIX};
use crate::discover::{discover_files, FileFilter, DEFAULT_PATTERNS};
use crate::error::{Error, Result};
use crate::rewrite::{remove_block, remove_current_line, remove_next_line, rewrite_observer_blocks};
use crate::sanitize::sanitize;
use indexmap::IndexMap;
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What the run does with the directives it finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Execute each directive: drop lines, blocks and files, unwrap observers
    #[default]
    Remove,
    /// Strip the directive comments and keep all annotated code
    Sanitize,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Remove => f.write_str("remove"),
            Mode::Sanitize => f.write_str("sanitize"),
        }
    }
}

/// Caller supplied settings for one run. Never modified while running.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub patterns: Vec<String>,
    pub prefix: String,
    pub mode: Mode,
    pub dry_run: bool,
}

impl RunConfig {
    /// A remove-mode, apply run over `root` with the default patterns and prefix.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            prefix: DEFAULT_PREFIX.to_string(),
            mode: Mode::Remove,
            dry_run: false,
        }
    }
}

/// What happened, or would happen in a dry run, to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Unchanged,
    Modified,
    Deleted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Unchanged => "unchanged",
            Outcome::Modified => "modified",
            Outcome::Deleted => "deleted",
        };
        f.write_str(text)
    }
}

/// The pure per-file decision, before touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformation {
    Unchanged,
    Rewrite(String),
    Delete,
}

/// Directive kinds found in a file and the resulting outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub kinds: Vec<DirectiveKind>,
    pub outcome: Outcome,
}

impl FileReport {
    fn unchanged() -> Self {
        Self { kinds: Vec::new(), outcome: Outcome::Unchanged }
    }
}

/// Per-file results of a run, in discovery order.
#[derive(Debug, Default)]
pub struct Report {
    files: IndexMap<PathBuf, Result<FileReport>>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&Result<FileReport>> {
        self.files.get(path.as_ref())
    }

    /// Directive kinds recorded for `path`, if it was processed successfully.
    pub fn kinds<P: AsRef<Path>>(&self, path: P) -> Option<&[DirectiveKind]> {
        match self.get(path) {
            Some(Ok(report)) => Some(&report.kinds),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Result<FileReport>)> {
        self.files.iter()
    }

    /// Files that were, or in a dry run would be, modified or deleted.
    pub fn changed(&self) -> impl Iterator<Item = (&PathBuf, &FileReport)> {
        self.files.iter().filter_map(|(path, result)| match result {
            Ok(report) if report.outcome != Outcome::Unchanged => Some((path, report)),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &Error)> {
        self.files.iter().filter_map(|(path, result)| result.as_ref().err().map(|e| (path, e)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// JSON object keyed by path; failed entries carry an `error` message.
    pub fn to_json(&self) -> serde_json::Value {
        let files = self
            .files
            .iter()
            .map(|(path, result)| {
                let value = match result {
                    Ok(report) => serde_json::to_value(report)
                        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() })),
                    Err(e) => serde_json::json!({ "error": e.to_string() }),
                };
                (path.display().to_string(), value)
            })
            .collect();
        serde_json::Value::Object(files)
    }
}

impl FromIterator<(PathBuf, Result<FileReport>)> for Report {
    fn from_iter<I: IntoIterator<Item = (PathBuf, Result<FileReport>)>>(iter: I) -> Self {
        Self { files: iter.into_iter().collect() }
    }
}

impl Extend<(PathBuf, Result<FileReport>)> for Report {
    fn extend<I: IntoIterator<Item = (PathBuf, Result<FileReport>)>>(&mut self, iter: I) {
        self.files.extend(iter);
    }
}

/// Applies one mode to individual files.
pub struct Processor {
    markup: Markup,
    mode: Mode,
    dry_run: bool,
}

impl Processor {
    pub fn new(markup: Markup, mode: Mode, dry_run: bool) -> Self {
        Self { markup, mode, dry_run }
    }

    /// Decides what to do with `content` and returns the directive kinds
    /// found in it.
    ///
    /// A remove-file directive wins over everything else: the file is deleted
    /// in remove mode and only sanitized in sanitize mode. Otherwise remove
    /// mode runs the line, next-line, block and observer passes in that order
    /// and sanitize mode strips the directives.
    pub fn transform(&self, content: &str) -> (Vec<DirectiveKind>, Transformation) {
        let kinds = self.markup.detect(content);
        if kinds.is_empty() {
            return (kinds, Transformation::Unchanged);
        }

        let rewritten = match self.mode {
            Mode::Remove if kinds.contains(&DirectiveKind::RemoveFile) => {
                return (kinds, Transformation::Delete);
            }
            Mode::Remove => {
                let content = remove_current_line(content, &self.markup);
                let content = remove_next_line(&content, &self.markup);
                let content = remove_block(&content, &self.markup);
                rewrite_observer_blocks(&content, &self.markup)
            }
            Mode::Sanitize => sanitize(content, &self.markup),
        };

        if rewritten == content {
            (kinds, Transformation::Unchanged)
        } else {
            (kinds, Transformation::Rewrite(rewritten))
        }
    }

    /// Reads, transforms and, unless dry running, writes or deletes `path`.
    ///
    /// Files that are not valid UTF-8 are reported unchanged.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<FileReport> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::file(path, e))?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => {
                debug!("Skipping binary file '{}'.", path.display());
                return Ok(FileReport::unchanged());
            }
        };

        let (kinds, transformation) = self.transform(&content);
        let outcome = match transformation {
            Transformation::Unchanged => Outcome::Unchanged,
            Transformation::Rewrite(new_content) => {
                if !self.dry_run {
                    fs::write(path, new_content).map_err(|e| Error::file(path, e))?;
                }
                Outcome::Modified
            }
            Transformation::Delete => {
                if !self.dry_run {
                    fs::remove_file(path).map_err(|e| Error::file(path, e))?;
                }
                Outcome::Deleted
            }
        };

        if outcome != Outcome::Unchanged {
            debug!(
                "{}{}: '{}' [{}]",
                if self.dry_run { "(dry run) " } else { "" },
                outcome,
                path.display(),
                kinds.iter().map(|k| k.suffix()).collect::<Vec<_>>().join(", ")
            );
        }

        Ok(FileReport { kinds, outcome })
    }

    /// Processes every path in parallel and waits for all of them.
    ///
    /// A failing file never stops its siblings; its error is stored in the
    /// report under its path.
    pub fn process_all(&self, paths: Vec<PathBuf>) -> Report {
        paths
            .into_par_iter()
            .map(|path| {
                let result = self.process_file(&path);
                if let Err(e) = &result {
                    warn!("{}", e);
                }
                (path, result)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }
}

/// Runs one transformation over `config.root`.
///
/// Entries the walk could not read are added to the report as failures
/// after the processed files.
///
/// # Errors
/// Only configuration problems are returned here: an invalid prefix, an
/// invalid glob, or a root that is not a directory. Per-file failures are in
/// the report.
pub fn run(config: &RunConfig) -> Result<Report> {
    let markup = Markup::new(config.prefix.as_str())?;
    let filter = FileFilter::new(&config.patterns)?;
    let discovery = discover_files(&config.root, &filter)?;
    let files = discovery.files;

    debug!(
        "Processing {} file(s) in {} mode{}.",
        files.len(),
        config.mode,
        if config.dry_run { " (dry run)" } else { "" }
    );

    let processor = Processor::new(markup, config.mode, config.dry_run);
    let mut report = processor.process_all(files);
    report.extend(discovery.failures.into_iter().map(|(path, err)| (path, Err(err))));
    Ok(report)
}
