//! Destinations for rendered character grids.

use crate::{CharGrid, Result};
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

pub trait AsciiOutput {
    fn out(&mut self, grid: &CharGrid) -> Result<()>;
}

/// Writes rows as text lines, each character followed by a space so the
/// ~1:2 terminal cell reads roughly square.
pub struct ConsoleOutput<W: Write> {
    writer: W,
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> AsciiOutput for ConsoleOutput<W> {
    fn out(&mut self, grid: &CharGrid) -> Result<()> {
        for row in grid {
            let line: String = row.iter().flat_map(|&c| [c, ' ']).collect();
            writeln!(self.writer, "{line}")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Overwrites an HTML file with the grid in a monospace block.
#[derive(Debug, Clone)]
pub struct HtmlOutput {
    path: PathBuf,
    font: String,
}

impl HtmlOutput {
    pub fn new(path: impl Into<PathBuf>, font: impl Into<String>) -> Self {
        Self { path: path.into(), font: font.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn document(&self, grid: &CharGrid) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n</head>\n");
        html.push_str("<body>\n");
        let _ = writeln!(
            html,
            "<pre style=\"font-family: '{}', monospace; font-size: 4px; line-height: 1.0;\">",
            escape(&self.font)
        );
        for row in grid {
            for &c in row {
                push_escaped(&mut html, c);
            }
            html.push('\n');
        }
        html.push_str("</pre>\n</body>\n</html>\n");
        html
    }
}

impl AsciiOutput for HtmlOutput {
    fn out(&mut self, grid: &CharGrid) -> Result<()> {
        std::fs::write(&self.path, self.document(grid))?;
        log::info!(
            "Wrote {}×{} grid to {}",
            grid.first().map_or(0, Vec::len),
            grid.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    text.chars().for_each(|c| push_escaped(&mut out, c));
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn console_spaces_out_characters() {
        let mut buf = Vec::new();
        ConsoleOutput::new(&mut buf).out(&vec![vec!['a', 'b'], vec!['c', 'd']]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a b \nc d \n");
    }

    #[test]
    fn html_escapes_markup() {
        let dir = TempDir::new().unwrap();
        let mut output = HtmlOutput::new(dir.path().join("out.html"), "Courier New");
        output.out(&vec![vec!['<', '&', '>'], vec!['x', ' ', '"']]).unwrap();

        let html = std::fs::read_to_string(output.path()).unwrap();
        assert!(html.contains("&lt;&amp;&gt;\nx &quot;\n</pre>"));
        assert!(html.contains("font-family: 'Courier New', monospace"));
    }

    #[test]
    fn html_overwrites_previous_render() {
        let dir = TempDir::new().unwrap();
        let mut output = HtmlOutput::new(dir.path().join("out.html"), "Courier New");
        output.out(&vec![vec!['1']]).unwrap();
        output.out(&vec![vec!['2']]).unwrap();

        let html = std::fs::read_to_string(output.path()).unwrap();
        assert!(html.contains("2\n</pre>"));
        assert!(!html.contains("1\n</pre>"));
    }

    #[test]
    fn html_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut output = HtmlOutput::new(dir.path().join("nope").join("out.html"), "Courier New");
        assert!(output.out(&vec![vec!['x']]).is_err());
    }
}
