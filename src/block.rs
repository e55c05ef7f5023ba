//! The block pass cascade and paragraph formation.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    breaks::do_horizontal_rules,
    buffer::TextBuffer,
    code_blocks::do_code_blocks,
    headings::do_headers,
    html::hash_html_blocks,
    process::Renderer,
    span::run_span_gamut,
};

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    lazy_regex!(r"\n{2,}", "paragraph break pattern should compile");

impl Renderer {
    /// Run every block pass over `text` and join the resulting paragraphs.
    pub(crate) fn run_block_gamut(&mut self, text: &str) -> String {
        let mut buf = TextBuffer::new(text);
        do_headers(&mut buf, &mut self.protector);
        do_horizontal_rules(&mut buf);
        self.do_lists(&mut buf);
        do_code_blocks(&mut buf, &mut self.protector);
        self.do_block_quotes(&mut buf);
        hash_html_blocks(&mut buf, &mut self.protector);
        self.form_paragraphs(buf.as_str())
    }

    /// Split on blank lines. A chunk that is exactly one placeholder is
    /// finished HTML and is emitted as is; anything else becomes a `<p>`.
    fn form_paragraphs(&mut self, text: &str) -> String {
        let text = text.trim_matches('\n');
        if text.is_empty() {
            return String::new();
        }
        PARAGRAPH_BREAK_RE
            .split(text)
            .map(|chunk| {
                if let Some(literal) = self.protector.decode(chunk) {
                    literal.to_owned()
                } else {
                    let inner = run_span_gamut(chunk, &self.links, &mut self.protector);
                    format!("<p>{inner}</p>")
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
