//! Mutable text buffer used by every rendering pass.
//!
//! The document is never parsed into a tree. Each pass rewrites the buffer in
//! place, either through a regex with a replacement template, through a regex
//! with a replacement callback, or through a hand-written finder when the
//! grammar needs context the `regex` crate cannot express (look-around,
//! back-references). All three share [`TextBuffer::splice_with`].

use std::{fmt, ops::Range};

use regex::{Captures, Regex};

use crate::tokenize::{HtmlToken, tokenize_html};

/// Default tab stop used by [`TextBuffer::detabify`] and [`TextBuffer::outdent`].
pub const TAB_WIDTH: usize = 4;

/// Growable text with regex-driven editing helpers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self { Self { text: text.into() } }

    #[must_use]
    pub fn as_str(&self) -> &str { &self.text }

    #[must_use]
    pub fn into_string(self) -> String { self.text }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    /// Rewrite the buffer by repeatedly asking `next` for the next match.
    ///
    /// `next` receives the untouched source text and the byte offset where the
    /// search resumes. It returns the byte range to replace together with its
    /// replacement, or `None` when there are no further matches. Matches must
    /// start at or after the offset. After an empty match the search resumes one
    /// character later so that zero-width patterns such as `^` terminate.
    pub fn splice_with<F>(&mut self, mut next: F) -> &mut Self
    where
        F: FnMut(&str, usize) -> Option<(Range<usize>, String)>,
    {
        let source = self.text.as_str();
        let mut out = String::with_capacity(source.len());
        let mut copied = 0;
        let mut pos = 0;
        let mut changed = false;
        while pos <= source.len() {
            let Some((range, replacement)) = next(source, pos) else {
                break;
            };
            debug_assert!(range.start >= pos && range.start <= range.end);
            out.push_str(&source[copied..range.start]);
            out.push_str(&replacement);
            copied = range.end;
            changed = true;
            pos = if range.is_empty() {
                step_past(source, range.end)
            } else {
                range.end
            };
        }
        if changed {
            out.push_str(&source[copied..]);
            self.text = out;
        }
        self
    }

    /// Replace every match of `re` with the value computed by `f`.
    pub fn replace_all_with<F>(&mut self, re: &Regex, mut f: F) -> &mut Self
    where
        F: FnMut(&Captures<'_>) -> String,
    {
        self.splice_with(|text, pos| {
            let caps = re.captures_at(text, pos)?;
            let whole = caps.get(0)?;
            Some((whole.range(), f(&caps)))
        })
    }

    /// Replace every match of `re` with `template`, expanding `${n}` references.
    pub fn replace_all(&mut self, re: &Regex, template: &str) -> &mut Self {
        self.replace_all_with(re, |caps| {
            let mut dst = String::new();
            caps.expand(template, &mut dst);
            dst
        })
    }

    /// Remove every match of `re`.
    pub fn delete_all(&mut self, re: &Regex) -> &mut Self {
        self.replace_all_with(re, |_| String::new())
    }

    /// Replace every occurrence of the literal `from` with `to`.
    pub fn replace_literal(&mut self, from: &str, to: &str) -> &mut Self {
        if !from.is_empty() && self.text.contains(from) {
            self.text = self.text.replace(from, to);
        }
        self
    }

    /// Expand tabs to spaces, padding to the next multiple of `width` columns.
    ///
    /// The column count restarts on every line.
    pub fn detabify(&mut self, width: usize) -> &mut Self {
        if !self.text.contains('\t') {
            return self;
        }
        let width = width.max(1);
        let mut out = String::with_capacity(self.text.len());
        let mut column = 0;
        for ch in self.text.chars() {
            match ch {
                '\t' => {
                    let pad = width - column % width;
                    out.extend(std::iter::repeat_n(' ', pad));
                    column += pad;
                }
                '\n' => {
                    out.push(ch);
                    column = 0;
                }
                _ => {
                    out.push(ch);
                    column += 1;
                }
            }
        }
        self.text = out;
        self
    }

    /// Strip one leading tab, or up to `width` leading spaces, from every line.
    pub fn outdent(&mut self, width: usize) -> &mut Self {
        let mut out = String::with_capacity(self.text.len());
        for line in self.text.split_inclusive('\n') {
            let rest = if let Some(stripped) = line.strip_prefix('\t') {
                stripped
            } else {
                let spaces = line.bytes().take(width).take_while(|b| *b == b' ').count();
                &line[spaces..]
            };
            out.push_str(rest);
        }
        self.text = out;
        self
    }

    /// Prefix every line with `width` spaces.
    pub fn indent(&mut self, width: usize) -> &mut Self {
        let pad = " ".repeat(width);
        let mut out = String::with_capacity(self.text.len() + width);
        for line in self.text.split_inclusive('\n') {
            out.push_str(&pad);
            out.push_str(line);
        }
        self.text = out;
        self
    }

    /// Remove leading and trailing whitespace from the whole buffer.
    ///
    /// Interior lines keep their indentation.
    pub fn trim(&mut self) -> &mut Self {
        let trimmed = self.text.trim();
        if trimmed.len() != self.text.len() {
            self.text = trimmed.to_owned();
        }
        self
    }

    pub fn append(&mut self, s: &str) -> &mut Self {
        self.text.push_str(s);
        self
    }

    pub fn prepend(&mut self, s: &str) -> &mut Self {
        self.text.insert_str(0, s);
        self
    }

    /// Split the buffer into tag and text runs.
    ///
    /// The tokens cover the whole buffer in order, without gaps or overlaps.
    #[must_use]
    pub fn tokenize_html(&self) -> Vec<HtmlToken<'_>> { tokenize_html(&self.text) }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.text) }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self { Self::new(text) }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self { Self::new(text) }
}

/// Byte offset just past the character starting at `at`, or one past the end.
fn step_past(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(at + 1, |ch| at + ch.len_utf8())
}
