//! Line and block rewriters applied in remove mode.
//! Every function here is a pure `&str -> String` transformation that
//! operates on lines and regular expressions only; nothing is parsed.

use crate::directive::{DirectiveKind, Markup};
use log::{debug, warn};

/// Upper bound for the fixed-point passes in this module.
pub const MAX_PASSES: usize = 10_000;

/// One line of content and the terminator it had in the source.
#[derive(Clone, Copy)]
struct Line<'a> {
    text: &'a str,
    ending: &'static str,
}

/// Content split into lines, each keeping its own `\n` or `\r\n`.
struct Lines<'a> {
    lines: Vec<Line<'a>>,
    trailing: bool,
}

impl<'a> Lines<'a> {
    fn split(content: &'a str) -> Self {
        let lines = content
            .split_inclusive('\n')
            .map(|raw| {
                if let Some(text) = raw.strip_suffix("\r\n") {
                    Line { text, ending: "\r\n" }
                } else if let Some(text) = raw.strip_suffix('\n') {
                    Line { text, ending: "\n" }
                } else {
                    Line { text: raw, ending: "" }
                }
            })
            .collect();
        Self { lines, trailing: content.ends_with('\n') }
    }

    fn has(&self, index: usize, kind: DirectiveKind, markup: &Markup) -> bool {
        markup.line_has(kind, self.lines[index].text)
    }

    fn position(&self, kind: DirectiveKind, markup: &Markup) -> Option<usize> {
        (0..self.lines.len()).find(|index| self.has(*index, kind, markup))
    }

    /// The last kept line ends the content only if the source ended with a
    /// terminator.
    fn join(&self) -> String {
        let last = self.lines.len().saturating_sub(1);
        let mut joined = String::new();
        for (index, line) in self.lines.iter().enumerate() {
            joined.push_str(line.text);
            if index < last || self.trailing {
                joined.push_str(line.ending);
            }
        }
        joined
    }
}

/// Drops every line that carries the remove-current-line marker.
pub fn remove_current_line(content: &str, markup: &Markup) -> String {
    let mut lines = Lines::split(content);
    lines.lines.retain(|line| !markup.line_has(DirectiveKind::RemoveCurrentLine, line.text));
    lines.join()
}

/// Drops every line carrying the remove-next-line marker together with the
/// line right after it.
///
/// Consecutive marker lines each remove their follower, so two markers in a
/// row remove themselves and the single line after the second one.
pub fn remove_next_line(content: &str, markup: &Markup) -> String {
    let mut lines = Lines::split(content);
    let marked: Vec<bool> = (0..lines.lines.len())
        .map(|index| lines.has(index, DirectiveKind::RemoveNextLine, markup))
        .collect();

    lines.lines = lines
        .lines
        .iter()
        .enumerate()
        .filter(|(index, _)| !marked[*index] && !(*index > 0 && marked[index - 1]))
        .map(|(_, line)| *line)
        .collect();
    lines.join()
}

/// Deletes the inclusive line ranges between block start and end markers.
///
/// Each pass searches the current lines from the top for the first start
/// and the first end marker and splices that range out. Markers must not be
/// nested. An end marker found above the first start marker, or a marker
/// without its partner, leaves the remaining content untouched.
pub fn remove_block(content: &str, markup: &Markup) -> String {
    let mut lines = Lines::split(content);

    for pass in 0..MAX_PASSES {
        let start = lines.position(DirectiveKind::RemoveBlockStart, markup);
        let end = lines.position(DirectiveKind::RemoveBlockEnd, markup);

        match (start, end) {
            (Some(start), Some(end)) if start <= end => {
                debug!("Removing block at lines {}..={} (pass {}).", start, end, pass);
                lines.lines.drain(start..=end);
            }
            (Some(start), Some(end)) => {
                debug!("Block end at line {} precedes start at line {}, ignoring.", end, start);
                return lines.join();
            }
            _ => return lines.join(),
        }
    }

    warn!("Block removal stopped after {} passes.", MAX_PASSES);
    lines.join()
}

/// Unwraps `const Name = observer(function Name(props) { ... })` into a
/// plain arrow function assignment.
///
/// The declaration following an observer-block-start marker line is
/// rewritten to `const Name = (props) => {` and the marked `})` closing
/// line becomes `}`. The export keyword, binding name and type annotation
/// are preserved. The wrapped body must not contain another line matching
/// the closing pattern.
pub fn rewrite_observer_blocks(content: &str, markup: &Markup) -> String {
    let (start, end) = markup.observer_patterns();
    let mut current = content.to_string();

    for _ in 0..MAX_PASSES {
        let opened = start.replace_all(&current, "${1}${2}const ${3}${4} = (${5}) =>");
        let closed = end.replace_all(&opened, "${1}}");
        let next = closed.into_owned();
        if next == current {
            return next;
        }
        current = next;
    }

    warn!("Observer rewrite stopped after {} passes.", MAX_PASSES);
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_separator_preserved() {
        let markup = Markup::default();
        let content = "a\nb // @mst remove-current-line\nc\n";
        assert_eq!(remove_current_line(content, &markup), "a\nc\n");
    }

    #[test]
    fn test_trailing_separator_kept_after_last_line_removed() {
        let markup = Markup::default();
        let content = "x\n// @mst remove-next-line\ny\n";
        assert_eq!(remove_next_line(content, &markup), "x\n");
        assert_eq!(remove_current_line("// @mst remove-current-line\n", &markup), "");
    }

    #[test]
    fn test_crlf_preserved() {
        let markup = Markup::default();
        let content = "a\r\n// @mst remove-next-line\r\nb\r\nc\r\n";
        assert_eq!(remove_next_line(content, &markup), "a\r\nc\r\n");
    }

    #[test]
    fn test_each_line_keeps_its_own_ending() {
        let lines = Lines::split("a\r\nb\nc");
        let endings: Vec<&str> = lines.lines.iter().map(|line| line.ending).collect();
        assert_eq!(endings, ["\r\n", "\n", ""]);
        assert_eq!(lines.join(), "a\r\nb\nc");
    }
}
