//! Images and links, inline and reference style.

use std::{ops::Range, sync::LazyLock};

use regex::{Captures, Regex};

use crate::{
    buffer::TextBuffer,
    links::{LinkDefinition, LinkTable},
    protect::Protector,
    span::escapes::hide_chars,
};

static IMAGE_INLINE_RE: LazyLock<Regex> = lazy_regex!(
    r#"!\[([^\]]*)\]\([ \t]*<?([^)\s]*?)>?(?:[ \t]+(?:"([^"]*)"|'([^']*)'))?[ \t]*\)"#,
    "inline image pattern should compile"
);

static IMAGE_REF_RE: LazyLock<Regex> = lazy_regex!(
    r"!\[([^\]]*)\][ ]?(?:\n[ ]*)?\[([^\]]*)\]",
    "reference image pattern should compile"
);

static LINK_REF_RE: LazyLock<Regex> = lazy_regex!(
    r"\[([^\]]*)\][ ]?(?:\n[ ]*)?\[([^\]]*)\]",
    "reference link pattern should compile"
);

static LINK_INLINE_RE: LazyLock<Regex> = lazy_regex!(
    r#"(?s)\[([^\]]*)\]\([ \t]*<?(.*?)>?[ \t]*(?:"(.*?)"|'(.*?)')?\)"#,
    "inline link pattern should compile"
);

static LINK_SHORTCUT_RE: LazyLock<Regex> = lazy_regex!(
    r"\[([^\[\]]+)\]",
    "shortcut link pattern should compile"
);

static EMBEDDED_NEWLINE_RE: LazyLock<Regex> = lazy_regex!(r"[ ]?\n", "newline pattern should compile");

/// Emphasis markers hidden inside generated attribute values.
const ATTR_SPECIALS: &[char] = &['*', '_'];

fn title_attr(title: Option<&str>, protector: &mut Protector) -> String {
    match title {
        Some(t) if !t.is_empty() => format!(
            " title=\"{}\"",
            hide_chars(&t.replace('"', "&quot;"), ATTR_SPECIALS, protector)
        ),
        _ => String::new(),
    }
}

fn anchor(url: &str, title: Option<&str>, text: &str, protector: &mut Protector) -> String {
    format!(
        "<a href=\"{}\"{}>{text}</a>",
        hide_chars(url, ATTR_SPECIALS, protector),
        title_attr(title, protector)
    )
}

fn image(url: &str, title: Option<&str>, alt: &str, protector: &mut Protector) -> String {
    format!(
        "<img src=\"{}\" alt=\"{}\"{} />",
        hide_chars(url, ATTR_SPECIALS, protector),
        alt.replace('"', "&quot;"),
        title_attr(title, protector)
    )
}

/// Resolve a `[text][id]` pair, falling back to `text` when `id` is empty.
fn lookup<'t>(links: &'t LinkTable, text: &str, id: &str) -> Option<&'t LinkDefinition> {
    let id = if id.is_empty() { text } else { id };
    links.get(&EMBEDDED_NEWLINE_RE.replace_all(id, " "))
}

/// Replace matches of `re` that `resolve` accepts.
///
/// A rejected match stays in the text and the search resumes one byte after
/// its start, so a later bracket pair inside it can still resolve.
fn splice_resolved<F>(text: &mut TextBuffer, re: &Regex, mut resolve: F)
where
    F: FnMut(&Captures<'_>) -> Option<String>,
{
    text.splice_with(|s, pos| {
        let mut at = pos;
        while at <= s.len() {
            let caps = re.captures_at(s, at)?;
            let whole: Range<usize> = caps.get(0)?.range();
            if let Some(html) = resolve(&caps) {
                return Some((whole, html));
            }
            // every pattern here starts with an ASCII `!` or `[`
            at = whole.start + 1;
        }
        None
    });
}

/// Inline and reference images.
pub(crate) fn do_images(text: &mut TextBuffer, links: &LinkTable, protector: &mut Protector) {
    text.replace_all_with(&IMAGE_INLINE_RE, |caps| {
        let title = caps.get(3).or_else(|| caps.get(4)).map(|m| m.as_str());
        image(&caps[2], title, &caps[1], protector)
    });
    splice_resolved(text, &IMAGE_REF_RE, |caps| {
        let def = lookup(links, &caps[1], &caps[2])?;
        Some(image(&def.url, def.title.as_deref(), &caps[1], protector))
    });
}

/// Reference links, then inline links, then `[text]` shortcuts.
pub(crate) fn do_anchors(text: &mut TextBuffer, links: &LinkTable, protector: &mut Protector) {
    splice_resolved(text, &LINK_REF_RE, |caps| {
        let def = lookup(links, &caps[1], &caps[2])?;
        Some(anchor(&def.url, def.title.as_deref(), &caps[1], protector))
    });
    text.replace_all_with(&LINK_INLINE_RE, |caps| {
        let title = caps.get(3).or_else(|| caps.get(4)).map(|m| m.as_str());
        anchor(&caps[2], title, &caps[1], protector)
    });
    splice_resolved(text, &LINK_SHORTCUT_RE, |caps| {
        let def = lookup(links, &caps[1], "")?;
        Some(anchor(&def.url, def.title.as_deref(), &caps[1], protector))
    });
}
