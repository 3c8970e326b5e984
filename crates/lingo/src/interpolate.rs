//! Placeholder substitution.
//!
//! Translated strings carry named placeholders written `%{name}`
//! (whitespace inside the braces is allowed: `%{ name }`). The resolver
//! hands every result to an [`Interpolator`], which replaces them with
//! caller-supplied values.
//!
//! # Invariants
//!
//! 1. **Single pass**: substituted values are never scanned again, so a
//!    value containing `%{x}` is inserted literally.
//! 2. **Text outside placeholders is untouched**, including unknown or
//!    unclosed placeholders.
//! 3. **No parameters, no change**: an empty parameter list returns the
//!    text as given.

use std::borrow::Cow;

/// Substitutes named parameters into translated text.
pub trait Interpolator: Send + Sync {
    /// Replace placeholders in `text` with values from `params`.
    ///
    /// When `escape` is true, values are HTML-escaped before insertion.
    fn apply(&self, text: &str, params: &[(&str, &str)], escape: bool) -> String;
}

/// The default `%{name}` interpolator.
///
/// # Example
///
/// ```
/// use lingo::interpolate::{Interpolator, PlaceholderInterpolator};
///
/// let interp = PlaceholderInterpolator;
/// assert_eq!(
///     interp.apply("Hi %{ name }!", &[("name", "<b>Ann</b>")], true),
///     "Hi &lt;b&gt;Ann&lt;/b&gt;!"
/// );
/// assert_eq!(interp.apply("Hi %{name}!", &[("name", "<b>Ann</b>")], false), "Hi <b>Ann</b>!");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderInterpolator;

impl Interpolator for PlaceholderInterpolator {
    fn apply(&self, text: &str, params: &[(&str, &str)], escape: bool) -> String {
        if params.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("%{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(close) = after.find('}') else {
                // Unclosed: keep the remainder verbatim.
                out.push_str(&rest[start..]);
                return out;
            };

            let name = after[..close].trim();
            let token = &rest[start..start + 2 + close + 1];
            match params.iter().find(|(key, _)| *key == name) {
                Some((_, value)) if escape => out.push_str(&escape_html(value)),
                Some((_, value)) => out.push_str(value),
                None => out.push_str(token),
            }
            rest = &after[close + 1..];
        }

        out.push_str(rest);
        out
    }
}

/// Escape `& < > " '` for safe insertion into HTML.
#[must_use]
pub fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interp(text: &str, params: &[(&str, &str)]) -> String {
        PlaceholderInterpolator.apply(text, params, true)
    }

    #[test]
    fn single_and_multiple_params() {
        assert_eq!(interp("Hello %{name}", &[("name", "Ann")]), "Hello Ann");
        assert_eq!(
            interp("%{a} and %{b}, %{a}", &[("a", "1"), ("b", "2")]),
            "1 and 2, 1"
        );
    }

    #[test]
    fn whitespace_inside_braces() {
        assert_eq!(interp("%{  n  } apples", &[("n", "3")]), "3 apples");
    }

    #[test]
    fn no_params_is_identity() {
        let text = "Keep %{this} & <that>";
        assert_eq!(interp(text, &[]), text);
        assert_eq!(PlaceholderInterpolator.apply(text, &[], false), text);
    }

    #[test]
    fn unknown_placeholder_left_verbatim() {
        assert_eq!(interp("Hi %{ who }!", &[("name", "Ann")]), "Hi %{ who }!");
    }

    #[test]
    fn unclosed_and_stray_markers() {
        assert_eq!(interp("50% off %{name", &[("name", "x")]), "50% off %{name");
        assert_eq!(interp("100%", &[("x", "y")]), "100%");
        assert_eq!(interp("{name}", &[("name", "x")]), "{name}");
        assert_eq!(interp("%{}", &[("name", "x")]), "%{}");
    }

    #[test]
    fn values_are_not_rescanned() {
        assert_eq!(
            interp("%{a}%{b}", &[("a", "%{b}"), ("b", "B")]),
            "%{b}B"
        );
    }

    #[test]
    fn escaping_toggle() {
        let params = [("v", "<i>\"Tom\" & 'Jerry'</i>")];
        assert_eq!(
            PlaceholderInterpolator.apply("%{v}", &params, true),
            "&lt;i&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/i&gt;"
        );
        assert_eq!(
            PlaceholderInterpolator.apply("%{v}", &params, false),
            "<i>\"Tom\" & 'Jerry'</i>"
        );
    }

    #[test]
    fn escaping_never_touches_the_template() {
        assert_eq!(interp("<b>%{n}</b>", &[("n", "1")]), "<b>1</b>");
    }

    #[test]
    fn escape_html_borrows_when_clean() {
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_html("a<b"), "a&lt;b");
    }

    #[test]
    fn multibyte_text_around_placeholders() {
        assert_eq!(interp("¡Hola, %{name}! ✓", &[("name", "José")]), "¡Hola, José! ✓");
    }
}
