//! Directive vocabulary and detection.
//! A directive is a single-line comment carrying a marker such as
//! `// @mst remove-current-line`. Only the marker text matters; the comment
//! style (`//`, `#` or the `{/* ... */}` markup-brace form) is not distinguished.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Marker prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "@mst";

/// The closed set of directives understood by the engine.
///
/// Variants are declared in the order the processor applies them, so a
/// sorted list of kinds reads as the order of the passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectiveKind {
    RemoveFile,
    RemoveCurrentLine,
    RemoveNextLine,
    RemoveBlockStart,
    RemoveBlockEnd,
    ObserverBlockStart,
    ObserverBlockEnd,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 7] = [
        DirectiveKind::RemoveFile,
        DirectiveKind::RemoveCurrentLine,
        DirectiveKind::RemoveNextLine,
        DirectiveKind::RemoveBlockStart,
        DirectiveKind::RemoveBlockEnd,
        DirectiveKind::ObserverBlockStart,
        DirectiveKind::ObserverBlockEnd,
    ];

    /// The marker text that follows the prefix.
    pub fn suffix(self) -> &'static str {
        match self {
            DirectiveKind::RemoveFile => "remove-file",
            DirectiveKind::RemoveCurrentLine => "remove-current-line",
            DirectiveKind::RemoveNextLine => "remove-next-line",
            DirectiveKind::RemoveBlockStart => "remove-block-start",
            DirectiveKind::RemoveBlockEnd => "remove-block-end",
            DirectiveKind::ObserverBlockStart => "observer-block-start",
            DirectiveKind::ObserverBlockEnd => "observer-block-end",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.suffix() == suffix)
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Compiled directive vocabulary for one prefix.
///
/// Built once per run and shared read-only between file tasks.
#[derive(Debug, Clone)]
pub struct Markup {
    markers: Vec<String>,
    pattern: Regex,
    observer_start: Regex,
    observer_end: Regex,
}

impl Markup {
    /// Compiles the markers and the combined directive pattern for `prefix`.
    ///
    /// # Errors
    /// * `Error::InvalidPrefixError` if the prefix is blank or contains whitespace
    pub fn new<S: Into<String>>(prefix: S) -> Result<Self> {
        let prefix: String = prefix.into();
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(Error::InvalidPrefixError { prefix });
        }

        let markers = DirectiveKind::ALL
            .iter()
            .map(|kind| format!("{} {}", prefix, kind.suffix()))
            .collect();

        let escaped = regex::escape(&prefix);
        let kinds = DirectiveKind::ALL.map(DirectiveKind::suffix).join("|");
        // Line comments run to the end of the line, the brace form stops at `*/}`.
        let source = format!(
            r"[ \t]*(?:(?://|#)[ \t]*{escaped} ({kinds})\b[^\r\n]*|\{{[ \t]*/\*[ \t]*{escaped} ({kinds})\b[^\r\n]*?\*/[ \t]*\}})"
        );
        let invalid = |_: regex::Error| Error::InvalidPrefixError { prefix: prefix.clone() };
        let pattern = Regex::new(&source).map_err(invalid)?;

        // Marker line, then `export const Name: Type = observer(function Inner(params)`.
        let start_marker = format!("{escaped} {}", DirectiveKind::ObserverBlockStart.suffix());
        let observer_start = Regex::new(&format!(
            r"(?m)^[^\r\n]*{start_marker}[^\r\n]*\r?\n([ \t]*)(export[ \t]+)?const[ \t]+([A-Za-z_$][\w$]*)([ \t]*:[^=\r\n]*?)?[ \t]*=[ \t]*observer\([ \t]*function[ \t]*[A-Za-z_$]?[\w$]*[ \t]*\(([^)]*)\)"
        ))
        .map_err(invalid)?;
        // `})` followed by the end marker comment.
        let end_marker = format!("{escaped} {}", DirectiveKind::ObserverBlockEnd.suffix());
        let observer_end = Regex::new(&format!(
            r"(?m)^([ \t]*)\}}\)[ \t]*(?://|#)?[ \t]*{end_marker}[^\r\n]*"
        ))
        .map_err(invalid)?;

        Ok(Self { markers, pattern, observer_start, observer_end })
    }

    /// Full marker text for `kind`, e.g. `@mst remove-file`.
    pub fn marker(&self, kind: DirectiveKind) -> &str {
        &self.markers[kind as usize]
    }

    /// Whether `line` carries the marker for `kind` anywhere.
    pub fn line_has(&self, kind: DirectiveKind, line: &str) -> bool {
        line.contains(self.marker(kind))
    }

    /// The combined pattern matching any directive comment, including the
    /// horizontal whitespace in front of it.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Start and end patterns of the observer-wrapped component idiom.
    pub fn observer_patterns(&self) -> (&Regex, &Regex) {
        (&self.observer_start, &self.observer_end)
    }

    pub fn has_directives(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }

    /// Sorted, de-duplicated directive kinds present in `content`.
    pub fn detect(&self, content: &str) -> Vec<DirectiveKind> {
        let mut kinds: Vec<DirectiveKind> = self
            .pattern
            .captures_iter(content)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .filter_map(|m| DirectiveKind::from_suffix(m.as_str()))
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

impl Default for Markup {
    fn default() -> Self {
        // The default prefix is a constant known to compile.
        Self::new(DEFAULT_PREFIX).expect("default prefix is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_text() {
        let markup = Markup::default();
        assert_eq!(markup.marker(DirectiveKind::RemoveFile), "@mst remove-file");
        assert_eq!(
            markup.marker(DirectiveKind::ObserverBlockEnd),
            "@mst observer-block-end"
        );
    }

    #[test]
    fn test_kind_order_matches_declaration() {
        for (index, kind) in DirectiveKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
            assert_eq!(DirectiveKind::from_suffix(kind.suffix()), Some(*kind));
        }
    }

    #[test]
    fn test_blank_prefix_rejected() {
        assert!(Markup::new("").is_err());
        assert!(Markup::new("@a b").is_err());
    }
}
