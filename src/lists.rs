//! Ordered and unordered lists.
//!
//! Outside a list, a marker only opens a list at the top of the text or after
//! a blank line, so a sentence that happens to wrap onto `8. something` stays a
//! paragraph. Inside a list body any marker line opens a sublist.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::{
    buffer::{TAB_WIDTH, TextBuffer},
    process::{MAX_BLOCK_DEPTH, Renderer},
    span::run_span_gamut,
};

static LIST_MARKER_RE: LazyLock<Regex> = lazy_regex!(
    r"(?m)^[ ]{0,3}([-+*]|\d+\.)[ ]+",
    "list marker pattern should compile"
);

/// A marker at the very start of a slice.
static LEADING_MARKER_RE: LazyLock<Regex> = lazy_regex!(
    r"^(?:[-+*]|\d+\.)[ ]+",
    "leading marker pattern should compile"
);

static ITEM_RE: LazyLock<Regex> = lazy_regex!(
    r"(?m)(\n)?^([ \t]*)([-+*]|\d+\.)[ ]+",
    "list item pattern should compile"
);

static ITEM_MARKER_RE: LazyLock<Regex> = lazy_regex!(
    r"^(?:[-+*]|\d+\.)[ \t]",
    "item marker pattern should compile"
);

static BLANK_RUN_RE: LazyLock<Regex> = lazy_regex!(r"\n{2,}", "blank run pattern should compile");

static TRAILING_BLANKS_RE: LazyLock<Regex> =
    lazy_regex!(r"\n{2,}\z", "trailing blank pattern should compile");

fn newline_run(text: &str, at: usize) -> usize {
    text[at..].bytes().take_while(|b| *b == b'\n').count()
}

/// Offset just past the first character at or after `at`.
fn after_first_char(text: &str, at: usize) -> Option<usize> {
    text[at..].chars().next().map(|c| at + c.len_utf8())
}

/// A top-level list opens at the top of the text or after a blank line.
fn opens_top_level_list(text: &str, start: usize) -> bool {
    start == 0 || (start == 1 && text.starts_with('\n')) || text[..start].ends_with("\n\n")
}

/// End of the list whose first item's content begins at `from`.
///
/// The list runs to the end of the text, or through the first blank-line run
/// that is followed by unindented text which is not another marker.
fn list_end(text: &str, from: usize) -> Option<usize> {
    let mut at = after_first_char(text, from)?;
    while let Some(i) = text[at..].find("\n\n") {
        let run_end = at + i + newline_run(text, at + i);
        let rest = &text[run_end..];
        if rest.starts_with(|c: char| !c.is_whitespace()) && !LEADING_MARKER_RE.is_match(rest) {
            return Some(run_end);
        }
        at = run_end;
    }
    Some(text.len())
}

/// End of an item whose content begins at `from`: the first newline run that
/// is followed by the end of the list or by a sibling marker at `indent`. At
/// most two newlines of that run belong to the item.
fn item_end(text: &str, from: usize, indent: &str) -> Option<usize> {
    let mut at = after_first_char(text, from)?;
    while let Some(i) = text[at..].find('\n') {
        let nl = at + i;
        let run = newline_run(text, nl);
        let rest = &text[nl + run..];
        if rest.is_empty()
            || rest
                .strip_prefix(indent)
                .is_some_and(|r| ITEM_MARKER_RE.is_match(r))
        {
            return Some(nl + run.min(2));
        }
        at = nl + run;
    }
    None
}

impl Renderer {
    /// Replace every list in `text` with `<ul>` or `<ol>` markup.
    pub(crate) fn do_lists(&mut self, text: &mut TextBuffer) {
        if self.depth >= MAX_BLOCK_DEPTH {
            return;
        }
        let nested = self.list_level > 0;
        text.splice_with(|s, pos| {
            let mut at = pos;
            loop {
                let caps = LIST_MARKER_RE.captures_at(s, at)?;
                let whole = caps.get(0)?;
                let start = whole.start();
                if nested || opens_top_level_list(s, start) {
                    if let Some(end) = list_end(s, whole.end()) {
                        let ordered = caps[1].ends_with('.');
                        return Some((start..end, self.render_list(&s[start..end], ordered)));
                    }
                }
                at = start + 1;
            }
        });
    }

    fn render_list(&mut self, list: &str, ordered: bool) -> String {
        let tag = if ordered { "ol" } else { "ul" };
        trace!(tag, level = self.list_level, "list");
        let list = BLANK_RUN_RE.replace_all(list, "\n\n\n");
        let items = self.process_list_items(&list);
        format!("<{tag}>\n{items}</{tag}>\n")
    }

    /// Render each item of one list body as `<li>`.
    ///
    /// An item that follows a blank line, or holds one, is loose and goes
    /// through the full block passes. A tight item only gets sublists and span
    /// formatting.
    fn process_list_items(&mut self, list: &str) -> String {
        self.list_level += 1;
        self.depth += 1;
        let mut buf = TextBuffer::new(TRAILING_BLANKS_RE.replace(list, "\n"));
        buf.splice_with(|s, pos| {
            let mut at = pos;
            loop {
                let caps = ITEM_RE.captures_at(s, at)?;
                let whole = caps.get(0)?;
                if let Some(end) = item_end(s, whole.end(), &caps[2]) {
                    let loose = caps.get(1).is_some();
                    let html = self.render_item(&s[whole.end()..end], loose);
                    return Some((whole.start()..end, html));
                }
                at = whole.start() + 1;
            }
        });
        self.depth -= 1;
        self.list_level -= 1;
        buf.into_string()
    }

    fn render_item(&mut self, content: &str, follows_blank_line: bool) -> String {
        let mut item = TextBuffer::new(content);
        item.outdent(TAB_WIDTH);
        let html = if follows_blank_line || content.contains("\n\n") {
            self.run_block_gamut(item.as_str())
        } else {
            self.do_lists(&mut item);
            run_span_gamut(item.as_str(), &self.links, &mut self.protector)
        };
        let mut html = TextBuffer::new(html);
        html.trim();
        format!("<li>{html}</li>\n")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn lists(input: &str) -> String {
        let mut r = Renderer::new();
        let mut text = TextBuffer::new(input);
        r.do_lists(&mut text);
        r.protector.restore(text.as_str())
    }

    #[test]
    fn tight_unordered_list() {
        assert_eq!(lists("- a\n- b\n\n"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
    }

    #[rstest]
    #[case("1. one\n2. two\n")]
    #[case("3. one\n1. two\n")]
    fn ordered_list(#[case] input: &str) {
        let out = lists(input);
        assert!(out.starts_with("<ol>\n<li>one</li>\n<li>two</li>\n</ol>"), "{out}");
    }

    #[test]
    fn loose_items_get_paragraphs() {
        assert_eq!(
            lists("* a\n\n* b\n\n"),
            "<ul>\n<li><p>a</p></li>\n<li><p>b</p></li>\n</ul>\n"
        );
    }

    #[test]
    fn nested_list() {
        assert_eq!(
            lists("- a\n    - b\n    - c\n- d\n"),
            "<ul>\n<li>a\n<ul>\n<li>b</li>\n<li>c</li>\n</ul></li>\n<li>d</li>\n</ul>\n"
        );
    }

    #[test]
    fn list_ends_at_unindented_paragraph() {
        assert_eq!(
            lists("- a\n\nafter\n"),
            "<ul>\n<li>a</li>\n</ul>\nafter\n"
        );
    }

    #[test]
    fn marker_inside_paragraph_is_not_a_list() {
        let input = "I upgraded to version\n8. Oops\n";
        assert_eq!(lists(input), input);
    }

    #[test]
    fn list_after_blank_line() {
        assert_eq!(
            lists("intro\n\n+ x\n"),
            "intro\n\n<ul>\n<li>x</li>\n</ul>\n"
        );
    }

    #[test]
    fn depth_cap_stops_recognition() {
        let mut r = Renderer::new();
        r.depth = MAX_BLOCK_DEPTH;
        let mut text = TextBuffer::new("- a\n");
        r.do_lists(&mut text);
        assert_eq!(text.as_str(), "- a\n");
    }
}
