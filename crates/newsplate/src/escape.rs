//! Escaping of characters that may not appear verbatim in HTML.

use std::borrow::Cow;

/// A set of bytes to replace and their replacements.
pub trait Escapes {
    fn escape(c: u8) -> Option<&'static str>;

    fn byte_needs_escaping(c: u8) -> bool {
        Self::escape(c).is_some()
    }
}

/// Escapes the characters that carry meaning in HTML text and attribute
/// values: `&`, `<`, `>`, `"` and `'`.
pub struct HtmlEscapes;

impl Escapes for HtmlEscapes {
    fn escape(c: u8) -> Option<&'static str> {
        match c {
            b'&' => Some("&amp;"),
            b'<' => Some("&lt;"),
            b'>' => Some("&gt;"),
            b'"' => Some("&quot;"),
            b'\'' => Some("&#039;"),
            _ => None,
        }
    }
}

/// Performs escaping in a single pass, so replacement entities are never
/// themselves re-escaped. Returns the input unchanged when nothing needs
/// escaping.
pub fn escape_str<E: Escapes>(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&c| E::byte_needs_escaping(c)) {
        return Cow::Borrowed(s);
    }

    // All escaped bytes are ASCII, so slicing at their positions is safe.
    let mut escaped = String::with_capacity(s.len() + 8);
    let mut flushed = 0;
    for (pos, &c) in bytes.iter().enumerate() {
        if let Some(replacement) = E::escape(c) {
            escaped.push_str(&s[flushed..pos]);
            escaped.push_str(replacement);
            flushed = pos + 1;
        }
    }
    escaped.push_str(&s[flushed..]);
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_input_is_borrowed() {
        let escaped = escape_str::<HtmlEscapes>("plain headline");
        assert!(matches!(escaped, Cow::Borrowed(_)));
    }

    #[test]
    fn escapes_all_html_specials() {
        assert_eq!(
            escape_str::<HtmlEscapes>(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#039;"
        );
    }

    #[test]
    fn entities_are_not_rescanned() {
        assert_eq!(escape_str::<HtmlEscapes>("&lt;"), "&amp;lt;");
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(escape_str::<HtmlEscapes>("বাংলা & ছবি"), "বাংলা &amp; ছবি");
    }
}
