//! `<scheme:...>` and `<user@host>` autolinks.

use std::{fmt::Write as _, sync::LazyLock};

use rand::Rng;
use regex::Regex;

use crate::{buffer::TextBuffer, protect::Protector, span::escapes::hide_chars};

static URL_RE: LazyLock<Regex> = lazy_regex!(
    r#"<((?:https?|ftp):[^'">\s]+)>"#,
    "url autolink pattern should compile"
);

static EMAIL_RE: LazyLock<Regex> = lazy_regex!(
    r"(?i)<([-.\w]+@[-a-z0-9]+(?:\.[-a-z0-9]+)*\.[a-z]+)>",
    "email autolink pattern should compile"
);

const URL_SPECIALS: &[char] = &['*', '_'];

/// Encode every character of `text` as a random decimal or hex reference.
///
/// Alphanumerics are occasionally left as they are. The result differs from
/// call to call.
///
/// # Examples
///
/// ```
/// use mdpost::span::autolinks::obfuscate;
///
/// let encoded = obfuscate("a@b.c");
/// assert!(!encoded.contains('@'));
/// ```
#[must_use]
pub fn obfuscate(text: &str) -> String {
    let mut rng = rand::rng();
    let mut out = String::with_capacity(text.len() * 6);
    for ch in text.chars() {
        let roll: f64 = rng.random();
        if roll > 0.9 && ch.is_alphanumeric() {
            out.push(ch);
        } else if roll < 0.45 || roll > 0.9 {
            let _ = write!(out, "&#{};", u32::from(ch));
        } else {
            let _ = write!(out, "&#x{:x};", u32::from(ch));
        }
    }
    out
}

pub(crate) fn do_autolinks(text: &mut TextBuffer, protector: &mut Protector) {
    text.replace_all_with(&URL_RE, |caps| {
        let url = hide_chars(&caps[1], URL_SPECIALS, protector);
        format!("<a href=\"{url}\">{url}</a>")
    });
    text.replace_all_with(&EMAIL_RE, |caps| {
        let address = protector.restore(&caps[1]);
        format!(
            "<a href=\"{}\">{}</a>",
            obfuscate(&format!("mailto:{address}")),
            obfuscate(&address)
        )
    });
}
