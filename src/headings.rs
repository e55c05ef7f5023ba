//! Setext and ATX headers.
//!
//! Header text is emitted as written: no span formatting or entity encoding
//! applies inside a header. The finished `<hN>` element is hidden behind a
//! placeholder on its own paragraph so paragraph formation emits it verbatim.
//!
//! A setext underline needs at least four `=` or `-`, so a lone `-` under a
//! list item never turns the item into a header.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{buffer::TextBuffer, protect::Protector};

static SETEXT_H1_RE: LazyLock<Regex> = lazy_regex!(
    r"(?m)^(.+?)[ \t]*\n={4,}[ \t]*$",
    "setext h1 pattern should compile"
);

static SETEXT_H2_RE: LazyLock<Regex> = lazy_regex!(
    r"(?m)^(.+?)[ \t]*\n-{4,}[ \t]*$",
    "setext h2 pattern should compile"
);

static ATX_RE: LazyLock<Regex> = lazy_regex!(
    r"(?m)^(#{1,6})[ \t]*(.+?)[ \t]*#*[ \t]*$",
    "atx heading pattern should compile"
);

fn heading(level: usize, text: &str, protector: &mut Protector) -> String {
    let token = protector.encode(&format!("<h{level}>{text}</h{level}>\n"));
    format!("\n\n{token}\n\n")
}

/// Replace every header in `text` with a hidden `<hN>` block.
pub(crate) fn do_headers(text: &mut TextBuffer, protector: &mut Protector) {
    text.replace_all_with(&SETEXT_H1_RE, |caps| heading(1, &caps[1], protector));
    text.replace_all_with(&SETEXT_H2_RE, |caps| heading(2, &caps[1], protector));
    text.replace_all_with(&ATX_RE, |caps: &Captures<'_>| {
        heading(caps[1].len(), &caps[2], protector)
    });
}
