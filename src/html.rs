//! Raw HTML block hiding.
//!
//! Block-level HTML written by the author, and the block HTML produced by the
//! earlier block passes, is swapped for a placeholder surrounded by blank
//! lines. Paragraph formation then sees a chunk that is exactly one token and
//! emits the literal untouched instead of wrapping it in `<p>`.
//!
//! Four shapes are recognised, in this order:
//!
//! 1. a block tag at column 0 closed by the same tag at the start of a later
//!    line (nested blocks whose inner tags are indented);
//! 2. a block tag at column 0 closed by the same tag at the end of a line;
//! 3. a standalone `<hr>` between blank lines;
//! 4. a standalone comment between blank lines.
//!
//! [`decode_char_refs`] undoes numeric character references, such as the ones
//! e-mail autolinks are obfuscated with.

use std::{collections::HashMap, sync::LazyLock};

use regex::{Captures, Regex};
use tracing::trace;

use crate::{buffer::TextBuffer, protect::Protector};

static STRICT_OPEN_RE: LazyLock<Regex> = lazy_regex!(
    r"(?mi)^<(p|div|h[1-6]|blockquote|pre|table|dl|ol|ul|script|noscript|form|fieldset|iframe|math)\b",
    "strict html block pattern should compile"
);

static LIBERAL_OPEN_RE: LazyLock<Regex> = lazy_regex!(
    r"(?mi)^<(p|div|h[1-6]|blockquote|pre|table|dl|ol|ul|script|noscript|form|fieldset|iframe|math|ins|del)\b",
    "liberal html block pattern should compile"
);

static DECIMAL_REF_RE: LazyLock<Regex> =
    lazy_regex!(r"&#(\d+);", "decimal reference pattern should compile");

static HEX_REF_RE: LazyLock<Regex> =
    lazy_regex!(r"&#x([0-9a-fA-F]+);", "hex reference pattern should compile");

static HR_RE: LazyLock<Regex> = lazy_regex!(
    r"(?i)[ ]{0,3}<hr\b[^<>]*?/?>[ ]*",
    "hr block pattern should compile"
);

static COMMENT_RE: LazyLock<Regex> = lazy_regex!(
    r"[ ]{0,3}(?s:<!(?:--.*?--\s*)+>)[ ]*",
    "comment block pattern should compile"
);

/// Length of the run of ASCII spaces at the start of `s`.
fn spaces(s: &str) -> usize { s.bytes().take_while(|b| *b == b' ').count() }

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Where `tag`'s close may follow from `at`: trailing spaces, then a newline
/// or the end of the text. Returns the offset after the spaces.
fn close_at(text: &str, at: usize, close: &str) -> Option<usize> {
    if !starts_with_ignore_case(&text[at..], close) {
        return None;
    }
    let end = at + close.len();
    let end = end + spaces(&text[end..]);
    (end == text.len() || text.as_bytes()[end] == b'\n').then_some(end)
}

/// Start offsets of the lines following the one containing `from`.
fn later_line_starts(text: &str, from: usize) -> impl Iterator<Item = usize> + '_ {
    text[from..]
        .match_indices('\n')
        .map(move |(i, _)| from + i + 1)
}

/// `</tag>` at the start of a later line, or directly after the open tag.
fn strict_end(text: &str, body: usize, close: &str) -> Option<usize> {
    std::iter::once(body)
        .chain(later_line_starts(text, body))
        .find_map(|at| close_at(text, at, close))
}

/// The first line, starting with the remainder of the opening line, that ends
/// with `</tag>` and optional spaces.
fn liberal_end(text: &str, body: usize, close: &str) -> Option<usize> {
    std::iter::once(body)
        .chain(later_line_starts(text, body))
        .find_map(|start| {
            let line_end = text[start..].find('\n').map_or(text.len(), |n| start + n);
            let line = text[start..line_end].trim_end_matches(' ');
            let cut = line.len().checked_sub(close.len())?;
            (line.is_char_boundary(cut) && line[cut..].eq_ignore_ascii_case(close))
                .then_some(line_end)
        })
}

/// Hide tag blocks opened by `open` and closed where `end` says.
///
/// Every close found from a later open is also found from an earlier one,
/// except a close directly after the open tag. Once a scan for `</tag>` has
/// failed, later opens of the same tag are skipped without scanning, which
/// keeps a run of unclosed tags linear.
fn hash_tag_blocks(
    text: &mut TextBuffer,
    protector: &mut Protector,
    open: &Regex,
    end: fn(&str, usize, &str) -> Option<usize>,
) {
    let mut unclosed: HashMap<String, usize> = HashMap::new();
    text.splice_with(|s, pos| {
        let mut at = pos;
        loop {
            let caps = open.captures_at(s, at)?;
            let whole = caps.get(0)?;
            let body = whole.end();
            let close = format!("</{}>", caps[1].to_ascii_lowercase());
            let known_unclosed = unclosed
                .get(&close)
                .is_some_and(|&from| from <= body && !starts_with_ignore_case(&s[body..], &close));
            if !known_unclosed {
                if let Some(stop) = end(s, body, &close) {
                    let literal = &s[whole.start()..stop];
                    trace!(tag = &caps[1], bytes = literal.len(), "hid html block");
                    return Some((whole.start()..stop, hashed(literal, protector)));
                }
                unclosed.entry(close).or_insert(body);
            }
            at = whole.start() + 1;
        }
    });
}

/// Whether a standalone block may begin at `start`: at the top of the text,
/// after a single leading newline, or after a blank line.
fn opens_standalone(text: &str, start: usize) -> bool {
    start == 0 || (start == 1 && text.starts_with('\n')) || text[..start].ends_with("\n\n")
}

/// Whether a standalone block may end at `end`: before a blank line, or at the
/// end of the text with at most one newline left.
fn closes_standalone(text: &str, end: usize) -> bool {
    let rest = &text[end..];
    rest.is_empty() || rest == "\n" || rest.starts_with("\n\n")
}

fn hash_standalone(text: &mut TextBuffer, protector: &mut Protector, re: &Regex) {
    text.splice_with(|s, pos| {
        let mut at = pos;
        loop {
            let m = re.find_at(s, at)?;
            if opens_standalone(s, m.start()) && closes_standalone(s, m.end()) {
                return Some((m.range(), hashed(m.as_str(), protector)));
            }
            at = m.start() + 1;
        }
    });
}

fn hashed(literal: &str, protector: &mut Protector) -> String {
    format!("\n\n{}\n\n", protector.encode(literal))
}

/// Hide every block-level HTML construct in `text` behind a placeholder.
pub fn hash_html_blocks(text: &mut TextBuffer, protector: &mut Protector) {
    hash_tag_blocks(text, protector, &STRICT_OPEN_RE, strict_end);
    hash_tag_blocks(text, protector, &LIBERAL_OPEN_RE, liberal_end);
    hash_standalone(text, protector, &HR_RE);
    hash_standalone(text, protector, &COMMENT_RE);
}

fn char_ref(caps: &Captures<'_>, radix: u32) -> String {
    u32::from_str_radix(&caps[1], radix)
        .ok()
        .and_then(char::from_u32)
        .map_or_else(|| caps[0].to_owned(), String::from)
}

/// Replace decimal `&#NNN;` and hex `&#xHH;` references with the characters
/// they name. A reference that names no character is left as written.
///
/// # Examples
///
/// ```
/// use mdpost::html::decode_char_refs;
///
/// assert_eq!(decode_char_refs("&#109;&#x61;il &amp; co"), "mail &amp; co");
/// ```
#[must_use]
pub fn decode_char_refs(html: &str) -> String {
    let mut buf = TextBuffer::new(html);
    buf.replace_all_with(&DECIMAL_REF_RE, |caps| char_ref(caps, 10))
        .replace_all_with(&HEX_REF_RE, |caps| char_ref(caps, 16));
    buf.into_string()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    /// Hash `input` and return the text with every token replaced by `[literal]`.
    fn hashed_view(input: &str) -> String {
        let mut p = Protector::new();
        let mut text = TextBuffer::new(input);
        hash_html_blocks(&mut text, &mut p);
        let mut out = text.into_string();
        for token in p.tokens().map(str::to_owned).collect::<Vec<_>>() {
            let literal = p.decode(&token).unwrap_or_default();
            out = out.replace(&token, &format!("[{literal}]"));
        }
        out
    }

    #[test]
    fn nested_block_closes_at_column_zero() {
        let input = "<div>\n  <div>\n  inner\n  </div>\n</div>\n";
        assert_eq!(
            hashed_view(input),
            "\n\n[<div>\n  <div>\n  inner\n  </div>\n</div>]\n\n\n"
        );
    }

    #[test]
    fn liberal_block_closes_at_line_end() {
        assert_eq!(
            hashed_view("<p>Hello <b>there</b></p>\n\nafter"),
            "\n\n[<p>Hello <b>there</b></p>]\n\n\n\nafter"
        );
    }

    #[test]
    fn closing_tag_is_case_insensitive() {
        assert_eq!(hashed_view("<DIV>x</div>"), "\n\n[<DIV>x</div>]\n\n");
    }

    #[rstest]
    #[case("<span>inline</span>\n")]
    #[case(" <div>indented</div>\n")]
    #[case("<div>unclosed\n")]
    #[case("<divider>x</divider>\n")]
    fn non_blocks_are_untouched(#[case] input: &str) {
        assert_eq!(hashed_view(input), input);
    }

    #[test]
    fn many_unclosed_tags_are_left_alone() {
        let mut input = "<div>\n".repeat(20_000);
        input.push_str("\n<p>closed</p>\n");
        let expected = format!("{}\n\n\n[<p>closed</p>]\n\n\n", "<div>\n".repeat(20_000));
        assert_eq!(hashed_view(&input), expected);
    }

    #[test]
    fn close_right_after_open_still_counts() {
        assert_eq!(
            hashed_view("<div>\nx\n\n<div</div>\n"),
            "<div>\nx\n\n\n\n[<div</div>]\n\n\n"
        );
    }

    #[rstest]
    #[case("<hr>")]
    #[case("<hr />")]
    #[case("<HR class=\"x\"/>")]
    fn standalone_rule(#[case] rule: &str) {
        let input = format!("a\n\n{rule}\n\nb");
        assert_eq!(hashed_view(&input), format!("a\n\n\n\n[{rule}]\n\n\n\nb"));
    }

    #[test]
    fn rule_inside_paragraph_is_left_alone() {
        assert_eq!(hashed_view("a\n<hr>\nb"), "a\n<hr>\nb");
    }

    #[rstest]
    #[case("&#65;&#x42;&#x63;", "ABc")]
    #[case("&#x1F600;", "\u{1F600}")]
    #[case("&#xD800; &#99999999999;", "&#xD800; &#99999999999;")]
    #[case("&#X41; &#; &amp;", "&#X41; &#; &amp;")]
    #[case("plain", "plain")]
    fn decodes_numeric_references(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode_char_refs(input), expected);
    }

    #[test]
    fn standalone_comment() {
        assert_eq!(
            hashed_view("<!-- note\nmore -->\n\ntext"),
            "\n\n[<!-- note\nmore -->]\n\n\n\ntext"
        );
    }
}
