use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use mdpost::{
    io::{html_path, render_path},
    render,
};
use rayon::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Render Markdown posts to HTML fragments")]
struct Cli {
    /// Write `<file>.html` next to each input instead of printing
    #[arg(long = "write", requires = "files")]
    write: bool,
    /// Wrap each fragment in a minimal HTML document
    #[arg(long = "wrap")]
    wrap: bool,
    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
    /// Markdown files to render; standard input is read when none are given
    files: Vec<PathBuf>,
}

fn escape_title(title: &str) -> String {
    title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wrap `fragment` in a complete HTML document.
fn html_document(title: &str, fragment: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{fragment}</body>\n</html>\n",
        escape_title(title)
    )
}

fn title_for(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

/// Render one input file. Returns the HTML to print, or `None` once written.
fn handle_path(path: &Path, cli: &Cli) -> Result<Option<String>> {
    let mut html = render_path(path).with_context(|| format!("failed to read {}", path.display()))?;
    if cli.wrap {
        html = html_document(&title_for(path), &html);
    }
    if cli.write {
        let out = html_path(path);
        fs::write(&out, html).with_context(|| format!("failed to write {}", out.display()))?;
        info!(source = %path.display(), output = %out.display(), "wrote html");
        return Ok(None);
    }
    info!(source = %path.display(), bytes = html.len(), "rendered");
    Ok(Some(html))
}

/// Entry point for the command-line tool that renders Markdown posts to HTML.
///
/// Reads standard input when no files are given. Files are rendered in
/// parallel and printed in the order they were named, or written next to
/// their sources with `--write`. An unreadable input is logged and skipped;
/// the remaining inputs are still rendered.
///
/// # Returns
///
/// Returns `Ok(())` when every input was rendered, or an error naming how many
/// inputs failed.
///
/// # Examples
///
/// ```sh
/// # Render a post and print the fragment
/// mdpost post.md
///
/// # Write post.md.html as a complete document
/// mdpost --write --wrap post.md
///
/// # Render from standard input
/// cat post.md | mdpost
/// ```
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout().lock();

    if cli.files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read standard input")?;
        let mut html = render(input.as_str());
        if cli.wrap {
            html = html_document("stdin", &html);
        }
        stdout.write_all(html.as_bytes())?;
        return Ok(());
    }

    let results: Vec<_> = cli
        .files
        .par_iter()
        .map(|path| handle_path(path, &cli))
        .collect();

    let mut failed = 0;
    for result in results {
        match result {
            Ok(Some(html)) => stdout.write_all(html.as_bytes())?,
            Ok(None) => {}
            Err(err) => {
                error!("{err:#}");
                failed += 1;
            }
        }
    }
    stdout.flush()?;

    if failed > 0 {
        bail!("{failed} of {} inputs failed", cli.files.len());
    }
    Ok(())
}
