//! Span-level passes applied inside paragraphs, headers and tight list items.
//!
//! The order below is load-bearing. Code spans run before backslash escapes
//! so `` `\*` `` keeps its backslash; links run before emphasis so markers in
//! URLs are already hidden; tag escaping runs twice so attributes written by
//! the link passes are protected as well.

pub mod anchors;
pub mod autolinks;
pub mod code;
pub mod emphasis;
pub mod escapes;

use crate::{buffer::TextBuffer, links::LinkTable, protect::Protector};

/// Run every span pass over `text`.
///
/// Hidden characters stay hidden in the result; the caller restores them once
/// the whole document has been rendered.
#[must_use]
pub fn run_span_gamut(text: &str, links: &LinkTable, protector: &mut Protector) -> String {
    let mut buf = TextBuffer::new(text);
    escapes::escape_special_chars_within_tags(&mut buf, protector);
    code::do_code_spans(&mut buf, protector);
    escapes::encode_backslash_escapes(&mut buf, protector);
    anchors::do_images(&mut buf, links, protector);
    anchors::do_anchors(&mut buf, links, protector);
    autolinks::do_autolinks(&mut buf, protector);
    escapes::escape_special_chars_within_tags(&mut buf, protector);
    escapes::encode_amps_and_angles_in(&mut buf);
    emphasis::do_italics_and_bold(&mut buf);
    emphasis::do_hard_breaks(&mut buf);
    buf.into_string()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn spans(input: &str) -> String {
        let mut p = Protector::new();
        let out = run_span_gamut(input, &LinkTable::new(), &mut p);
        p.restore(&out)
    }

    #[rstest]
    #[case("*a* and `*b*`", "<em>a</em> and <code>*b*</code>")]
    #[case(r"\*not em\*", "*not em*")]
    #[case(r"`\*`", r"<code>\*</code>")]
    #[case("[*a*](/u_v_)", r#"<a href="/u_v_"><em>a</em></a>"#)]
    #[case(r#"<span title="*x*">y</span>"#, r#"<span title="*x*">y</span>"#)]
    #[case("AT&T <3", "AT&amp;T &lt;3")]
    #[case("line  \nnext", "line <br />\nnext")]
    fn span_passes_cooperate(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(spans(input), expected);
    }
}
