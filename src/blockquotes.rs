//! Blockquotes.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::{
    buffer::TextBuffer,
    process::{MAX_BLOCK_DEPTH, Renderer},
};

/// A `>` line with content, terminated by a newline.
static QUOTE_START_RE: LazyLock<Regex> = lazy_regex!(
    r"(?m)^[ \t]*>[ \t]?.+\n",
    "blockquote start pattern should compile"
);

static QUOTE_MARKER_RE: LazyLock<Regex> =
    lazy_regex!(r"(?m)^[ \t]*>[ \t]?", "quote marker pattern should compile");

static BLANK_LINE_RE: LazyLock<Regex> =
    lazy_regex!(r"(?m)^[ \t]+$", "blank line pattern should compile");

/// Extend a quote whose first line ends at `at`.
///
/// Following non-empty lines are lazy continuations. Blank lines are taken
/// too, and the quote keeps going if another `>` line comes after them.
fn quote_end(text: &str, mut at: usize) -> usize {
    loop {
        while let Some(nl) = text[at..].find('\n') {
            if nl == 0 {
                break;
            }
            at += nl + 1;
        }
        at += text[at..].bytes().take_while(|b| *b == b'\n').count();
        match QUOTE_START_RE.find_at(text, at) {
            Some(m) if m.start() == at => at = m.end(),
            _ => return at,
        }
    }
}

/// Indent every line by two spaces, leaving `<pre>` sections as they are.
fn indent_outside_pre(html: &str) -> String {
    fn flush(plain: &mut TextBuffer, out: &mut String) {
        if !plain.is_empty() {
            out.push_str(plain.indent(2).as_str());
            *plain = TextBuffer::default();
        }
    }

    let mut out = String::with_capacity(html.len() + 32);
    let mut plain = TextBuffer::default();
    let mut in_pre = false;
    for line in html.split_inclusive('\n') {
        if line.contains("<pre") {
            in_pre = true;
        }
        if in_pre {
            flush(&mut plain, &mut out);
            out.push_str(line);
        } else {
            plain.append(line);
        }
        if line.contains("</pre>") {
            in_pre = false;
        }
    }
    flush(&mut plain, &mut out);
    out
}

impl Renderer {
    /// Replace every blockquote in `text` with `<blockquote>` markup.
    pub(crate) fn do_block_quotes(&mut self, text: &mut TextBuffer) {
        if self.depth >= MAX_BLOCK_DEPTH {
            return;
        }
        text.splice_with(|s, pos| {
            let first = QUOTE_START_RE.find_at(s, pos)?;
            let end = quote_end(s, first.end());
            Some((first.start()..end, self.render_block_quote(&s[first.start()..end])))
        });
    }

    fn render_block_quote(&mut self, quote: &str) -> String {
        let mut inner = TextBuffer::new(quote);
        inner.delete_all(&QUOTE_MARKER_RE).delete_all(&BLANK_LINE_RE);
        trace!(depth = self.depth, bytes = quote.len(), "blockquote");
        self.depth += 1;
        let html = self.run_block_gamut(inner.as_str());
        self.depth -= 1;
        let mut quote = TextBuffer::new(indent_outside_pre(&html));
        quote.prepend("<blockquote>\n").append("\n</blockquote>\n\n");
        quote.into_string()
    }
}
