//! The inline highlight markup typed into the headline field.
//!
//! Raw text is escaped, newlines become `<br>`, and then one rewrite pass per
//! [`Highlight`] turns its delimiters into a classed `span`:
//!
//! - `[[text]]` becomes `<span class="hl-yellow">text</span>`
//! - `{r:text}` becomes `<span class="hl-red">text</span>`
//! - `{b:text}` becomes `<span class="hl-blue">text</span>`

use std::borrow::Cow;

use ecow::EcoString;

use crate::escape::{escape_str, HtmlEscapes};
use crate::template::Highlight;

/// Renders raw user text into the HTML assigned to the headline preview.
///
/// The output is safe to inject verbatim: every markup-significant character
/// of the input is escaped before the highlight passes run, so the only tags
/// it contains are the `<br>` and `span` elements emitted here.
pub fn render_markup(raw: &str) -> EcoString {
    let escaped = escape_str::<HtmlEscapes>(raw);
    let broken = break_lines(&escaped);
    let yellow = apply_highlight(&broken, Highlight::Yellow);
    let red = apply_highlight(&yellow, Highlight::Red);
    let blue = apply_highlight(&red, Highlight::Blue);
    EcoString::from(blue.as_ref())
}

fn break_lines(text: &str) -> Cow<'_, str> {
    if !text.contains('\n') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace('\n', "<br>"))
}

struct SpanBounds {
    open_at: usize,
    content_start: usize,
    content_end: usize,
}

/// Rewrites every occurrence of one highlight's delimiters in a single scan.
///
/// Scanning resumes after each emitted `span`, so content produced by this
/// pass is not examined again by the same pass. Later passes do see it,
/// which lets highlights nest across colors.
fn apply_highlight(text: &str, highlight: Highlight) -> Cow<'_, str> {
    let (open, close) = highlight.tokens();
    let Some(first) = find_span(text, 0, open, close) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 64);
    let mut cursor = 0;
    let mut next = Some(first);
    while let Some(span) = next {
        out.push_str(&text[cursor..span.open_at]);
        out.push_str("<span class=\"");
        out.push_str(highlight.class_name());
        out.push_str("\">");
        out.push_str(&text[span.content_start..span.content_end]);
        out.push_str("</span>");
        cursor = span.content_end + close.len();
        next = find_span(text, cursor, open, close);
    }
    out.push_str(&text[cursor..]);
    Cow::Owned(out)
}

/// Finds the next span at or after `from`: the earliest opening token
/// followed by the nearest closing token with at least one character of
/// content in between. Empty and unpaired delimiters never match.
fn find_span(text: &str, from: usize, open: &str, close: &str) -> Option<SpanBounds> {
    let open_at = from + text[from..].find(open)?;
    let content_start = open_at + open.len();
    let rest = &text[content_start..];
    let close_rel = match rest.find(close) {
        // An immediate close would leave the content empty; the nearest
        // close after one character closes the span instead. Both tokens
        // start with an ASCII byte, so the offset slicing stays on char
        // boundaries.
        Some(0) => rest[1..].find(close)? + 1,
        Some(at) => at,
        None => return None,
    };
    Some(SpanBounds {
        open_at,
        content_start,
        content_end: content_start + close_rel,
    })
}

#[cfg(test)]
mod tests {
    use super::render_markup;

    #[test]
    fn yellow_span_exact_output() {
        assert_eq!(
            render_markup("Hello [[World]]"),
            r#"Hello <span class="hl-yellow">World</span>"#
        );
    }

    #[test]
    fn red_and_blue_are_independent() {
        assert_eq!(
            render_markup("{r:A}{b:B}"),
            r#"<span class="hl-red">A</span><span class="hl-blue">B</span>"#
        );
    }

    #[test]
    fn escapes_every_special_character() {
        assert_eq!(
            render_markup(r#"<b> & "q" 'a'"#),
            "&lt;b&gt; &amp; &quot;q&quot; &#039;a&#039;"
        );
    }

    #[test]
    fn ampersand_is_escaped_exactly_once() {
        assert_eq!(render_markup("&lt;"), "&amp;lt;");
    }

    #[test]
    fn escaping_runs_before_line_breaking() {
        assert_eq!(render_markup("a<\nb"), "a&lt;<br>b");
    }

    #[test]
    fn every_newline_becomes_a_br() {
        assert_eq!(render_markup("x\n\ny"), "x<br><br>y");
    }

    #[test]
    fn highlight_matches_across_lines() {
        assert_eq!(
            render_markup("[[a\nb]]"),
            r#"<span class="hl-yellow">a<br>b</span>"#
        );
    }

    #[test]
    fn nearest_close_wins() {
        assert_eq!(
            render_markup("[[a]]b]]"),
            r#"<span class="hl-yellow">a</span>b]]"#
        );
    }

    #[test]
    fn open_token_reaches_the_nearest_close() {
        assert_eq!(
            render_markup("[[ [[x]]"),
            r#"<span class="hl-yellow"> [[x</span>"#
        );
    }

    #[test]
    fn empty_content_stays_literal() {
        assert_eq!(render_markup("[[]]"), "[[]]");
        assert_eq!(render_markup("{r:}"), "{r:}");
        assert_eq!(render_markup("{b:}"), "{b:}");
    }

    #[test]
    fn unpaired_tokens_stay_literal() {
        assert_eq!(render_markup("[[solo"), "[[solo");
        assert_eq!(render_markup("solo]]"), "solo]]");
        assert_eq!(render_markup("{r:unclosed"), "{r:unclosed");
    }

    #[test]
    fn pass_resumes_after_emitted_span() {
        assert_eq!(
            render_markup("[[a]] [[b]]"),
            r#"<span class="hl-yellow">a</span> <span class="hl-yellow">b</span>"#
        );
    }

    #[test]
    fn later_pass_matches_inside_earlier_span() {
        assert_eq!(
            render_markup("[[{r:x}]]"),
            r#"<span class="hl-yellow"><span class="hl-red">x</span></span>"#
        );
    }

    #[test]
    fn close_tokens_may_overlap_skipped_empty_close() {
        assert_eq!(
            render_markup("[[]]]]"),
            r#"<span class="hl-yellow">]</span>]"#
        );
    }

    #[test]
    fn escaped_text_inside_spans() {
        assert_eq!(
            render_markup("[[a&b]]"),
            r#"<span class="hl-yellow">a&amp;b</span>"#
        );
    }

    #[test]
    fn multibyte_content_in_spans() {
        assert_eq!(
            render_markup("ব্রেকিং [[ঢাকা]]"),
            r#"ব্রেকিং <span class="hl-yellow">ঢাকা</span>"#
        );
    }

    #[test]
    fn nested_braces_take_the_first_close() {
        assert_eq!(
            render_markup("{r:a{b:c}d}"),
            r#"<span class="hl-red">a<span class="hl-blue">c</span>d</span>"#
        );
    }
}
