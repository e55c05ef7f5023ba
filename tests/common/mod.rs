//! Utility helpers shared across integration tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Join string slices into one Markdown document, one slice per line.
///
/// Every line, the last one included, is terminated by `\n`.
macro_rules! md_doc {
    ($($line:expr),* $(,)?) => {{
        let mut doc = String::new();
        $(
            doc.push_str($line);
            doc.push('\n');
        )*
        doc
    }};
}

/// Write `content` to `name` inside `dir` and return the file's path.
pub fn write_markdown(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write markdown file");
    path
}
