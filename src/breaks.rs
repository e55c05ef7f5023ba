//! Horizontal rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::buffer::TextBuffer;

pub const RULE_HTML: &str = "<hr />";

/// One pattern per rule character; the characters may not be mixed.
static RULE_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [r"\*", "-", "_"].map(|marker| {
        Regex::new(&format!(r"(?m)^[ ]{{0,2}}(?:[ ]?{marker}[ ]?){{3,}}[ ]*$"))
            .expect("rule pattern should compile")
    })
});

/// Replace every line of three or more `*`, `-` or `_` with [`RULE_HTML`].
pub(crate) fn do_horizontal_rules(text: &mut TextBuffer) {
    for re in RULE_RES.iter() {
        text.replace_all(re, RULE_HTML);
    }
}
