//! Directive stripping for the sanitize mode.
//! Produces the "carries every variant" baseline: all directive comments
//! disappear, all annotated code stays.

use crate::directive::Markup;

/// Removes every directive comment from `content`.
///
/// The whitespace in front of a directive goes with it. Lines are never
/// added or removed: a line that held nothing but a directive is left empty,
/// and every line terminator stays where it was. Applying this to already
/// sanitized content returns it unchanged.
pub fn sanitize(content: &str, markup: &Markup) -> String {
    if !markup.has_directives(content) {
        return content.to_string();
    }

    // The pattern never matches across a line terminator.
    markup.pattern().replace_all(content, "").into_owned()
}
