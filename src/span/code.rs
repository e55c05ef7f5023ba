//! Inline code spans.
//!
//! A run of N backticks opens a span that closes on the next run of exactly N
//! backticks on the same line. A run preceded by a backslash does not open a
//! span; the backslash escape pass handles it later.

use std::ops::Range;

use crate::{buffer::TextBuffer, protect::Protector, span::escapes::hide_chars};

/// Markup characters hidden inside code so no later pass rewrites them.
const CODE_SPECIALS: &[char] = &['*', '_', '{', '}', '[', ']', '\\'];

/// HTML-escape `code` and hide its markup characters.
pub(crate) fn encode_code(code: &str, protector: &mut Protector) -> String {
    let escaped = code
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    hide_chars(&escaped, CODE_SPECIALS, protector)
}

fn backtick_run(text: &str, at: usize) -> usize {
    text[at..].bytes().take_while(|b| *b == b'`').count()
}

/// Find the next code span at or after `from`.
///
/// Returns the byte range of the whole span, delimiters included, and the
/// range of its content.
fn next_code_span(text: &str, from: usize) -> Option<(Range<usize>, Range<usize>)> {
    let mut i = from;
    while let Some(offset) = text[i..].find('`') {
        let start = i + offset;
        if start > 0 && text.as_bytes()[start - 1] == b'\\' {
            i = start + 1;
            continue;
        }
        let run = backtick_run(text, start);
        let content_start = start + run;
        let line_end = text[content_start..]
            .find('\n')
            .map_or(text.len(), |n| content_start + n);
        let mut j = content_start;
        while let Some(offset) = text[j..line_end].find('`') {
            let close = j + offset;
            let len = backtick_run(text, close);
            if len == run && close > content_start {
                return Some((start..close + run, content_start..close));
            }
            j = close + len;
        }
        i = content_start;
    }
    None
}

/// Wrap every code span in `<code>` with its content escaped.
pub(crate) fn do_code_spans(text: &mut TextBuffer, protector: &mut Protector) {
    text.splice_with(|s, pos| {
        let (whole, content) = next_code_span(s, pos)?;
        let code = s[content].trim_matches([' ', '\t']);
        Some((whole, format!("<code>{}</code>", encode_code(code, protector))))
    });
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn render_spans(input: &str) -> String {
        let mut p = Protector::new();
        let mut text = TextBuffer::new(input);
        do_code_spans(&mut text, &mut p);
        p.restore(text.as_str())
    }

    #[rstest]
    #[case("`a<b`", "<code>a&lt;b</code>")]
    #[case("x `y` z", "x <code>y</code> z")]
    #[case("`` a`b ``", "<code>a`b</code>")]
    #[case("`*not em*`", "<code>*not em*</code>")]
    #[case("`a` and `b`", "<code>a</code> and <code>b</code>")]
    #[case("`&amp;`", "<code>&amp;amp;</code>")]
    fn renders_code_spans(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render_spans(input), expected);
    }

    #[rstest]
    #[case("no code")]
    #[case("`unclosed")]
    #[case("`across\nlines`")]
    #[case(r"\`escaped\`")]
    #[case("``")]
    fn leaves_non_spans_alone(#[case] input: &str) {
        assert_eq!(render_spans(input), input);
    }

    #[test]
    fn markup_characters_are_hidden() {
        let mut p = Protector::new();
        let mut text = TextBuffer::new("`_x_`");
        do_code_spans(&mut text, &mut p);
        assert!(!text.as_str().contains('_'));
    }
}
