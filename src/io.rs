//! File helpers for rendering Markdown documents.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::process::render;

/// Read `path` and return its rendered HTML.
///
/// # Errors
/// Returns an error if the file cannot be read or is not UTF-8.
pub fn render_path(path: &Path) -> std::io::Result<String> {
    let text = fs::read_to_string(path)?;
    Ok(render(text.as_str()))
}

/// The file [`render_to_path`] writes for `path`: the same name with `.html`
/// appended, so `post.md` becomes `post.md.html`.
#[must_use]
pub fn html_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".html");
    PathBuf::from(name)
}

/// Render `path` and write the HTML next to it.
///
/// Returns the path that was written.
///
/// # Errors
/// Returns an error if reading the source or writing the output fails.
pub fn render_to_path(path: &Path) -> std::io::Result<PathBuf> {
    let html = render_path(path)?;
    let out = html_path(path);
    fs::write(&out, html)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn render_path_reads_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("post.md");
        fs::write(&file, "# Hi\n").unwrap();
        assert_eq!(render_path(&file).unwrap(), "<h1>Hi</h1>\n\n");
    }

    #[test]
    fn render_to_path_writes_sibling() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("post.md");
        fs::write(&file, "*x*").unwrap();
        let out = render_to_path(&file).unwrap();
        assert_eq!(out, dir.path().join("post.md.html"));
        assert_eq!(fs::read_to_string(out).unwrap(), "<p><em>x</em></p>\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(render_path(&dir.path().join("missing.md")).is_err());
    }
}
