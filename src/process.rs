//! Whole-document conversion.
//!
//! [`render`] normalises the input, hides raw HTML blocks, collects link
//! definitions, runs the block passes and finally swaps every placeholder back
//! for its literal. All state lives in a [`Renderer`] built for one call, so
//! documents can be converted on any number of threads at once.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    buffer::{TAB_WIDTH, TextBuffer},
    html::hash_html_blocks,
    links::LinkTable,
    protect::Protector,
};

/// Nesting limit for list items and blockquotes.
///
/// Beyond it lists and blockquotes are no longer recognised; their text is
/// still rendered by the remaining block passes.
pub const MAX_BLOCK_DEPTH: usize = 32;

static WHITESPACE_LINE_RE: LazyLock<Regex> =
    lazy_regex!(r"(?m)^[ \t]+$", "whitespace line pattern should compile");

static SPACE_LINE_RE: LazyLock<Regex> =
    lazy_regex!(r"(?m)^[ ]+$", "space line pattern should compile");

/// Conversion state for exactly one document.
#[derive(Debug, Default)]
pub struct Renderer {
    pub(crate) protector: Protector,
    pub(crate) links: LinkTable,
    /// Number of list bodies currently being processed.
    pub(crate) list_level: usize,
    /// Nested list-item and blockquote passes currently on the stack.
    pub(crate) depth: usize,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Convert `text` to an HTML fragment, consuming the renderer.
    #[must_use]
    pub fn render(mut self, text: &str) -> String {
        let mut buf = TextBuffer::new(text);
        buf.replace_literal("\r\n", "\n")
            .replace_literal("\r", "\n")
            .delete_all(&WHITESPACE_LINE_RE)
            .append("\n\n")
            .detabify(TAB_WIDTH)
            .delete_all(&SPACE_LINE_RE);

        hash_html_blocks(&mut buf, &mut self.protector);
        self.links = LinkTable::extract(&mut buf);

        let html = self.run_block_gamut(buf.as_str());
        debug!(
            placeholders = self.protector.len(),
            bytes = html.len(),
            "restoring placeholders"
        );
        let mut out = self.protector.restore(&html);
        out.push('\n');
        out
    }
}

/// Convert Markdown to an HTML fragment.
///
/// Absent input renders as the empty document. The function never fails.
///
/// # Examples
///
/// ```
/// use mdpost::render;
///
/// assert_eq!(render("# Title"), "<h1>Title</h1>\n\n");
/// assert_eq!(render("*hi*"), "<p><em>hi</em></p>\n");
/// let absent: Option<&str> = None;
/// assert_eq!(render(absent), "\n");
/// ```
#[must_use]
pub fn render<'a>(text: impl Into<Option<&'a str>>) -> String {
    Renderer::new().render(text.into().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "\n")]
    #[case("   \n\t\n", "\n")]
    #[case("a\r\nb", "<p>a\nb</p>\n")]
    #[case("a\rb", "<p>a\nb</p>\n")]
    #[case("one\n\ntwo", "<p>one</p>\n\n<p>two</p>\n")]
    fn normalises_input(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render(input), expected);
    }

    #[test]
    fn tabs_expand_before_code_blocks() {
        assert_eq!(render("\tcode"), "<pre><code>code\n</code></pre>\n");
    }

    #[test]
    fn each_call_starts_fresh() {
        let first = Renderer::new();
        assert!(first.protector.is_empty());
        let _ = first.render("`x` *y*");
        assert!(Renderer::new().protector.is_empty());
    }
}
