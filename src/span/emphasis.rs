//! Strong and emphasis markers, and hard line breaks.

use std::sync::LazyLock;

use regex::Regex;

use crate::buffer::TextBuffer;

static STRONG_RE: LazyLock<Regex> = lazy_regex!(
    r"\*\*(\S(?:.*?\S)??[*_]*)\*\*|__(\S(?:.*?\S)??[*_]*)__",
    "strong pattern should compile"
);

static EM_RE: LazyLock<Regex> = lazy_regex!(
    r"\*(\S(?:.*?\S)??)\*|_(\S(?:.*?\S)??)_",
    "emphasis pattern should compile"
);

static LINE_BREAK_RE: LazyLock<Regex> = lazy_regex!(r" {2,}\n", "line break pattern should compile");

fn wrap_in(text: &mut TextBuffer, re: &Regex, tag: &str) {
    text.replace_all_with(re, |caps| {
        let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        format!("<{tag}>{inner}</{tag}>")
    });
}

/// Double markers first so `**x**` is never read as nested emphasis.
pub(crate) fn do_italics_and_bold(text: &mut TextBuffer) {
    wrap_in(text, &STRONG_RE, "strong");
    wrap_in(text, &EM_RE, "em");
}

pub(crate) fn do_hard_breaks(text: &mut TextBuffer) {
    text.replace_all(&LINE_BREAK_RE, " <br />\n");
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("*a*", "<em>a</em>")]
    #[case("_a_", "<em>a</em>")]
    #[case("**a**", "<strong>a</strong>")]
    #[case("__a__", "<strong>a</strong>")]
    #[case("***a***", "<strong><em>a</em></strong>")]
    #[case("*a b* c *d*", "<em>a b</em> c <em>d</em>")]
    #[case("**bold** and *em*", "<strong>bold</strong> and <em>em</em>")]
    #[case("a * b * c", "a * b * c")]
    #[case("* a*", "* a*")]
    #[case("2*3", "2*3")]
    fn applies_emphasis(#[case] input: &str, #[case] expected: &str) {
        let mut text = TextBuffer::new(input);
        do_italics_and_bold(&mut text);
        assert_eq!(text.as_str(), expected);
    }

    #[test]
    fn emphasis_does_not_span_lines() {
        let mut text = TextBuffer::new("*a\nb*");
        do_italics_and_bold(&mut text);
        assert_eq!(text.as_str(), "*a\nb*");
    }

    #[rstest]
    #[case("a  \nb", "a <br />\nb")]
    #[case("a   \nb", "a <br />\nb")]
    #[case("a \nb", "a \nb")]
    fn hard_breaks(#[case] input: &str, #[case] expected: &str) {
        let mut text = TextBuffer::new(input);
        do_hard_breaks(&mut text);
        assert_eq!(text.as_str(), expected);
    }
}
