//! Markup escaping for untrusted text.
//!
//! # Invariants
//! - Output never contains a raw `<`, `>` or `"`, and every `&` starts an
//!   entity produced here.
//! - Escaping is not idempotent: escaping `&amp;` yields `&amp;amp;`.
//!   Callers escape each field once, never a pre-joined blob.

use crate::view::node::Markup;

/// Converts untrusted text into markup-safe text.
pub trait Sanitizer {
    fn escape(&self, text: &str) -> Markup;
}

/// Escapes `&`, `<`, `>` and `"` as HTML entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSanitizer;

impl Sanitizer for HtmlSanitizer {
    fn escape(&self, text: &str) -> Markup {
        Markup::from_escaped(escape_html(text))
    }
}

impl<Z: Sanitizer + ?Sized> Sanitizer for &Z {
    fn escape(&self, text: &str) -> Markup {
        (**self).escape(text)
    }
}

/// Escapes one untrusted string.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_html, HtmlSanitizer, Sanitizer};

    #[test]
    fn escapes_tag_and_attribute_boundaries() {
        assert_eq!(
            escape_html("<b>&\"</b>"),
            "&lt;b&gt;&amp;&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_and_single_quotes_alone() {
        assert_eq!(escape_html("Watched it alone."), "Watched it alone.");
        assert_eq!(escape_html("it's"), "it's");
    }

    #[test]
    fn escaping_twice_double_escapes() {
        let once = HtmlSanitizer.escape("a & b");
        assert_eq!(once.as_str(), "a &amp; b");
        assert_eq!(escape_html(once.as_str()), "a &amp;amp; b");
    }
}
