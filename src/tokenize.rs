//! Split text into HTML tag runs and plain text runs.
//!
//! A tag is a complete `<...>` construct. Attribute values may themselves
//! contain bracketed tags (`<a href="<%= url %>">`) up to
//! [`NESTED_TAG_DEPTH`] levels. Comments and processing instructions count as
//! tags as well. Everything else is text.

use std::sync::LazyLock;

use regex::Regex;

/// How many levels of tags nested inside tag attributes are recognised.
pub const NESTED_TAG_DEPTH: usize = 6;

static TAG_RE: LazyLock<Regex> = lazy_regex!(
    &format!(
        r"(?is)<!(?:--.*?--\s*)+>|<\?.*?\?>|{}",
        nested_tag_pattern(NESTED_TAG_DEPTH)
    ),
    "HTML tag pattern should compile"
);

/// A contiguous run of the tokenized text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HtmlToken<'a> {
    /// A complete tag, comment or processing instruction.
    Tag(&'a str),
    /// Text between tags.
    Text(&'a str),
}

impl<'a> HtmlToken<'a> {
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Tag(s) | Self::Text(s) => s,
        }
    }

    #[must_use]
    pub fn is_tag(&self) -> bool { matches!(self, Self::Tag(_)) }
}

fn nested_tag_pattern(depth: usize) -> String {
    if depth <= 1 {
        return r"<[a-z/!$][^<>]*>".to_string();
    }
    format!(
        r"<[a-z/!$](?:[^<>]|{})*>",
        nested_tag_pattern(depth - 1)
    )
}

/// Tokenize `text` into ordered tag and text runs.
///
/// Concatenating the returned tokens reproduces `text` exactly.
///
/// # Examples
///
/// ```
/// use mdpost::tokenize::{HtmlToken, tokenize_html};
///
/// let tokens = tokenize_html("a <b>c</b>");
/// assert_eq!(
///     tokens,
///     vec![
///         HtmlToken::Text("a "),
///         HtmlToken::Tag("<b>"),
///         HtmlToken::Text("c"),
///         HtmlToken::Tag("</b>"),
///     ]
/// );
/// ```
#[must_use]
pub fn tokenize_html(text: &str) -> Vec<HtmlToken<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in TAG_RE.find_iter(text) {
        if last < m.start() {
            tokens.push(HtmlToken::Text(&text[last..m.start()]));
        }
        tokens.push(HtmlToken::Tag(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        tokens.push(HtmlToken::Text(&text[last..]));
    }
    tokens
}
