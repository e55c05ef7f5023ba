//! Indented code blocks.
//!
//! A block is a run of lines indented by four spaces, opened at the top of the
//! text or after a blank line. Blank lines inside and after the run belong to
//! it. A first line of the form `lang:<name>` selects a language-tagged block.

use std::ops::Range;

use tracing::trace;

use crate::{
    buffer::{TAB_WIDTH, TextBuffer},
    protect::Protector,
    span::code::encode_code,
};

const INDENT: &str = "    ";
const LANG_PREFIX: &str = "lang:";

/// End of the run of code lines starting at `start`, trailing blank lines
/// included. Only newline-terminated lines count.
fn block_end(text: &str, start: usize) -> usize {
    let mut q = start;
    while text[q..].starts_with(INDENT) {
        let Some(nl) = text[q..].find('\n') else {
            break;
        };
        q += nl;
        q += text[q..].bytes().take_while(|b| *b == b'\n').count();
    }
    q
}

/// The line at `at` may follow a block: at most four spaces, then content.
fn may_follow(text: &str, at: usize) -> bool {
    let rest = &text[at..];
    let pad = rest.bytes().take(5).take_while(|b| *b == b' ').count();
    rest.is_empty() || (pad <= 4 && rest[pad..].starts_with(|c: char| !c.is_whitespace()))
}

/// Next block at or after `from`: the replaced range (with the blank line that
/// opened it) and the range of the code lines.
fn next_code_block(text: &str, from: usize) -> Option<(Range<usize>, Range<usize>)> {
    let candidates = std::iter::once(0)
        .filter(|_| from == 0)
        .chain(
            text[from..]
                .match_indices('\n')
                .map(move |(i, _)| from + i)
                .filter(|&nl| text[nl + 1..].starts_with('\n'))
                .map(|nl| nl + 2),
        );
    for start in candidates {
        if !text[start..].starts_with(INDENT) {
            continue;
        }
        let end = block_end(text, start);
        if end > start && may_follow(text, end) {
            return Some((start.saturating_sub(2)..end, start..end));
        }
    }
    None
}

fn language(first_line: &str) -> Option<&str> {
    first_line
        .strip_prefix(LANG_PREFIX)
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
}

/// Render the raw lines of one block.
fn code_block_html(block: &str, protector: &mut Protector) -> String {
    let mut ed = TextBuffer::new(block);
    ed.outdent(TAB_WIDTH);
    let mut ed = TextBuffer::new(encode_code(ed.as_str(), protector));
    ed.detabify(TAB_WIDTH);
    let code = ed.as_str().trim_start_matches('\n').trim_end();
    let (first, rest) = code.split_once('\n').unwrap_or((code, ""));
    match language(first) {
        Some(lang) => {
            trace!(lang, "language code block");
            format!("\n\n<pre class=\"{lang}\">\n{rest}\n</pre>\n\n")
        }
        None => format!("\n\n<pre><code>{code}\n</code></pre>\n\n"),
    }
}

/// Replace every indented code block in `text` with `<pre>` markup.
pub(crate) fn do_code_blocks(text: &mut TextBuffer, protector: &mut Protector) {
    text.splice_with(|s, pos| {
        let (whole, block) = next_code_block(s, pos)?;
        Some((whole, code_block_html(&s[block], protector)))
    });
}
