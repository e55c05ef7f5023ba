//! Reference link definitions.
//!
//! Lines of the form `[id]: url "title"` are cut out of the document before
//! block processing and collected into a [`LinkTable`]. Reference links and
//! images look their targets up by case-folded id.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use tracing::debug;

use crate::{buffer::TextBuffer, span::escapes::encode_amps_and_angles};

static LINK_DEF_RE: LazyLock<Regex> = lazy_regex!(
    r#"(?m)^[ ]{0,3}\[(.+)\]:[ \t]*\n?[ \t]*<?(\S+?)>?[ \t]*\n?[ \t]*(?:["(](.+?)[")][ \t]*)?(?:\n+|\z)"#,
    "link definition pattern should compile"
);

/// Target of a reference link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkDefinition {
    pub url: String,
    pub title: Option<String>,
}

/// Link definitions collected from one document.
#[derive(Clone, Debug, Default)]
pub struct LinkTable {
    entries: HashMap<String, LinkDefinition>,
}

impl LinkTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Remove every definition line from `text` and collect the definitions.
    ///
    /// Ids are case-folded. A later definition of the same id replaces an
    /// earlier one.
    ///
    /// # Examples
    ///
    /// ```
    /// use mdpost::{buffer::TextBuffer, links::LinkTable};
    ///
    /// let mut text = TextBuffer::new("See [x].\n\n[X]: http://x.org \"Ex\"\n");
    /// let links = LinkTable::extract(&mut text);
    /// assert_eq!(text.as_str(), "See [x].\n\n");
    /// assert_eq!(links.get("x").map(|d| d.url.as_str()), Some("http://x.org"));
    /// ```
    pub fn extract(text: &mut TextBuffer) -> Self {
        let mut table = Self::new();
        text.replace_all_with(&LINK_DEF_RE, |caps| {
            let id = caps[1].to_lowercase();
            let url = encode_amps_and_angles(&caps[2]);
            let title = caps
                .get(3)
                .map(|m| m.as_str().replace('"', "&quot;"))
                .filter(|t| !t.is_empty());
            table.insert(id, LinkDefinition { url, title });
            String::new()
        });
        debug!(definitions = table.len(), "collected link definitions");
        table
    }

    pub fn insert(&mut self, id: impl Into<String>, definition: LinkDefinition) {
        self.entries.insert(id.into().to_lowercase(), definition);
    }

    /// Look up `id`, ignoring case.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LinkDefinition> { self.entries.get(&id.to_lowercase()) }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("[a]: http://a.com\n", "http://a.com", None)]
    #[case("[a]: <http://a.com>\n", "http://a.com", None)]
    #[case("[a]: http://a.com \"Title\"\n", "http://a.com", Some("Title"))]
    #[case("[a]: http://a.com (Paren)\n", "http://a.com", Some("Paren"))]
    #[case("[a]: http://a.com\n    \"Next line\"\n", "http://a.com", Some("Next line"))]
    #[case("   [a]: /q?x=1&y=2\n", "/q?x=1&amp;y=2", None)]
    fn extracts_definitions(
        #[case] input: &str,
        #[case] url: &str,
        #[case] title: Option<&str>,
    ) {
        let mut text = TextBuffer::new(input);
        let links = LinkTable::extract(&mut text);
        let def = links.get("A").expect("definition should be collected");
        assert_eq!(def.url, url);
        assert_eq!(def.title.as_deref(), title);
        assert_eq!(text.as_str(), "");
    }

    #[test]
    fn last_definition_wins() {
        let mut text = TextBuffer::new("[id]: /first\n[ID]: /second\n");
        let links = LinkTable::extract(&mut text);
        assert_eq!(links.len(), 1);
        assert_eq!(links.get("id").map(|d| d.url.as_str()), Some("/second"));
    }

    #[test]
    fn four_space_indent_is_not_a_definition() {
        let mut text = TextBuffer::new("    [a]: /code\n");
        let links = LinkTable::extract(&mut text);
        assert!(links.is_empty());
        assert_eq!(text.as_str(), "    [a]: /code\n");
    }

    #[test]
    fn surrounding_text_survives() {
        let mut text = TextBuffer::new("before\n[a]: /x\nafter\n");
        let links = LinkTable::extract(&mut text);
        assert_eq!(links.len(), 1);
        assert_eq!(text.as_str(), "before\nafter\n");
    }
}
