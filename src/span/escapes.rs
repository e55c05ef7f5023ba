//! Character-level escaping used by the span passes.

use std::sync::LazyLock;

use regex::Regex;

use crate::{buffer::TextBuffer, protect::Protector, tokenize::HtmlToken};

/// Punctuation that loses its markup meaning when preceded by a backslash.
static BACKSLASH_ESCAPE_RE: LazyLock<Regex> = lazy_regex!(
    r"\\([\\`*_{}\[\]()#+\-.!>])",
    "backslash escape pattern should compile"
);

static ENTITY_TAIL_RE: LazyLock<Regex> = lazy_regex!(
    r"^#?[xX]?(?:[0-9a-fA-F]+|\w+);",
    "entity pattern should compile"
);

/// Characters hidden inside tags so attribute values never read as markup.
const TAG_SPECIALS: &[char] = &['\\', '`', '*', '_'];

/// Replace each character of `text` found in `chars` with its placeholder.
pub(crate) fn hide_chars(text: &str, chars: &[char], protector: &mut Protector) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if chars.contains(&ch) {
            out.push_str(&protector.encode(ch.encode_utf8(&mut [0; 4])));
        } else {
            out.push(ch);
        }
    }
    out
}

/// Hide `\`, `` ` ``, `*` and `_` inside every tag of `text`.
pub(crate) fn escape_special_chars_within_tags(text: &mut TextBuffer, protector: &mut Protector) {
    let mut out = String::with_capacity(text.as_str().len());
    for token in text.tokenize_html() {
        match token {
            HtmlToken::Tag(tag) => out.push_str(&hide_chars(tag, TAG_SPECIALS, protector)),
            HtmlToken::Text(t) => out.push_str(t),
        }
    }
    *text = TextBuffer::new(out);
}

/// Replace `\x` for escapable punctuation `x` with the placeholder of `x`.
pub(crate) fn encode_backslash_escapes(text: &mut TextBuffer, protector: &mut Protector) {
    text.replace_all_with(&BACKSLASH_ESCAPE_RE, |caps| protector.encode(&caps[1]));
}

fn needs_encoding(text: &str, at: usize, ch: char) -> bool {
    let rest = &text[at + ch.len_utf8()..];
    match ch {
        '&' => !ENTITY_TAIL_RE.is_match(rest),
        '<' => !rest.starts_with(|c: char| c.is_ascii_alphabetic() || "/?$!".contains(c)),
        _ => false,
    }
}

/// Encode bare `&` and `<` that cannot start an entity or a tag.
pub(crate) fn encode_amps_and_angles_in(text: &mut TextBuffer) {
    text.splice_with(|s, pos| {
        s[pos..]
            .char_indices()
            .map(|(i, ch)| (pos + i, ch))
            .find(|&(at, ch)| needs_encoding(s, at, ch))
            .map(|(at, ch)| {
                let entity = if ch == '&' { "&amp;" } else { "&lt;" };
                (at..at + 1, entity.to_string())
            })
    });
}

/// Owned-string form of [`encode_amps_and_angles_in`].
///
/// # Examples
///
/// ```
/// use mdpost::span::escapes::encode_amps_and_angles;
///
/// assert_eq!(encode_amps_and_angles("AT&T &amp; 1<2 <b>"), "AT&amp;T &amp; 1&lt;2 <b>");
/// ```
#[must_use]
pub fn encode_amps_and_angles(text: &str) -> String {
    let mut buf = TextBuffer::new(text);
    encode_amps_and_angles_in(&mut buf);
    buf.into_string()
}
