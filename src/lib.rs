//! Render forum-style Markdown posts to HTML fragments.
//!
//! Conversion is a cascade of regex-driven rewrites over one text buffer:
//! raw HTML blocks and link definitions are set aside first, then the block
//! passes (headers, rules, lists, code blocks, blockquotes, paragraphs) run,
//! calling the span passes (code spans, links, emphasis, ...) on the text they
//! produce. Anything that must survive later passes untouched is swapped for a
//! placeholder and restored at the very end.
//!
//! ```
//! let html = mdpost::render("Hello *world*");
//! assert_eq!(html, "<p>Hello <em>world</em></p>\n");
//! ```

#[macro_use]
mod macros;

mod block;
mod blockquotes;
pub mod breaks;
pub mod buffer;
mod code_blocks;
pub mod headings;
pub mod html;
pub mod io;
pub mod links;
mod lists;
pub mod process;
pub mod protect;
pub mod span;
pub mod tokenize;

pub use process::{MAX_BLOCK_DEPTH, Renderer, render};
