//! Output formatting for summary tables.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::Summary;
use crate::error::{Result, SummaryError};

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Tab-separated header plus one line per sample.
    #[default]
    Tsv,
    Json,
    Yaml,
    Markdown,
}

/// Renders `summary` in the requested format.
///
/// Every format ends with a newline. Structured formats carry the same
/// rounded values as the table.
pub fn render(summary: &Summary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Tsv => Ok(summary_to_tsv(summary)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&summary.rows)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&summary.rows)?),
        OutputFormat::Markdown => Ok(summary_to_markdown(summary)),
    }
}

fn summary_to_tsv(summary: &Summary) -> String {
    let mut out = summary.header.join("\t");
    out.push('\n');
    for row in &summary.rows {
        out.push_str(&row.to_tsv());
        out.push('\n');
    }
    out
}

fn summary_to_markdown(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str(&format!("| {} |\n", summary.header.join(" | ")));
    out.push_str(&format!(
        "|{}\n",
        summary.header.iter().map(|_| "---|").collect::<String>()
    ));
    for row in &summary.rows {
        let cells: Vec<String> = row.cells().iter().map(|cell| cell.to_string()).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    out
}

/// Writes rendered output to `path`, or to stdout when `path` is `None`.
///
/// An existing file is overwritten.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content).map_err(|source| SummaryError::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| SummaryError::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
    }
}
