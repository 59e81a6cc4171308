//! Inline run parser for translator markup.
//!
//! Recognizes `<b>`, `</b>` and `<br/>` (also `<br>` / `<br />`). Everything
//! else, including stray `<`, is literal text. Bold nests by depth and an
//! unmatched `</b>` is ignored, so any string parses.

const BOLD_OPEN: &str = "<b>";
const BOLD_CLOSE: &str = "</b>";
const BREAKS: [&str; 3] = ["<br/>", "<br />", "<br>"];

/// A piece of paragraph content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text { text: String, bold: bool },
    Break,
}

/// Parses markup into text runs and forced breaks. Adjacent runs with the same
/// weight are merged.
pub fn parse_inline(markup: &str) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::new();
    let mut buffer = String::new();
    let mut depth = 0usize;
    let mut rest = markup;

    while let Some(c) = rest.chars().next() {
        if c == '<' {
            if let Some(after) = rest.strip_prefix(BOLD_OPEN) {
                flush(&mut out, &mut buffer, depth > 0);
                depth += 1;
                rest = after;
                continue;
            }
            if let Some(after) = rest.strip_prefix(BOLD_CLOSE) {
                flush(&mut out, &mut buffer, depth > 0);
                depth = depth.saturating_sub(1);
                rest = after;
                continue;
            }
            if let Some(tag) = BREAKS.iter().find(|tag| rest.starts_with(**tag)) {
                flush(&mut out, &mut buffer, depth > 0);
                out.push(Inline::Break);
                rest = &rest[tag.len()..];
                continue;
            }
        }
        buffer.push(c);
        rest = &rest[c.len_utf8()..];
    }
    flush(&mut out, &mut buffer, depth > 0);

    out
}

fn flush(out: &mut Vec<Inline>, buffer: &mut String, bold: bool) {
    if buffer.is_empty() {
        return;
    }
    let text = std::mem::take(buffer);
    if let Some(Inline::Text {
        text: previous,
        bold: previous_bold,
    }) = out.last_mut()
    {
        if *previous_bold == bold {
            previous.push_str(&text);
            return;
        }
    }
    out.push(Inline::Text { text, bold });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(t: &str, bold: bool) -> Inline {
        Inline::Text {
            text: t.to_string(),
            bold,
        }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_inline("hello world"), vec![text("hello world", false)]);
    }

    #[test]
    fn test_bold_and_breaks() {
        assert_eq!(
            parse_inline("<b>Jane Doe</b><br/>phone | email<br/>url"),
            vec![
                text("Jane Doe", true),
                Inline::Break,
                text("phone | email", false),
                Inline::Break,
                text("url", false),
            ]
        );
    }

    #[test]
    fn test_empty_bold_pair_produces_nothing() {
        assert_eq!(parse_inline("x<b></b>y"), vec![text("xy", false)]);
    }

    #[test]
    fn test_unmatched_close_is_ignored() {
        assert_eq!(
            parse_inline("a</b>b<b>c"),
            vec![text("ab", false), text("c", true)]
        );
    }

    #[test]
    fn test_nested_bold_stays_bold_until_outer_close() {
        assert_eq!(
            parse_inline("<b>a<b>b</b>c</b>d"),
            vec![text("abc", true), text("d", false)]
        );
    }

    #[test]
    fn test_literal_angle_brackets() {
        assert_eq!(
            parse_inline("a < b and <i>c</i>"),
            vec![text("a < b and <i>c</i>", false)]
        );
    }

    #[test]
    fn test_break_variants() {
        assert_eq!(
            parse_inline("a<br>b<br />c"),
            vec![
                text("a", false),
                Inline::Break,
                text("b", false),
                Inline::Break,
                text("c", false),
            ]
        );
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(parse_inline("café <b>naïve</b>"), vec![text("café ", false), text("naïve", true)]);
    }
}
