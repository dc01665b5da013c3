//! Bismark report discovery and QC summary extraction.
//!
//! This crate turns a Bismark run directory into a per-sample QC table. A
//! run directory holds three subdirectories:
//!
//! - `Deduplicated/`: `*.deduplicated.bam` files (one per sample) and their
//!   deduplication reports.
//! - `Aligned/`: paired-end alignment reports.
//! - `Methylation/`: methylation extractor splitting reports.
//!
//! # Main entry points
//!
//! - [`summarize`]: discover samples under a run directory and build one
//!   [`SummaryRow`] per sample.
//! - [`extractor::extract_report`]: pull the tracked fields out of a single
//!   report file.
//! - [`output::render`]: format a [`Summary`] as TSV, JSON, YAML or Markdown.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use bsqc_core::DialectConfig;
//! use bsqc_discovery::output::{OutputFormat, render};
//! use bsqc_discovery::summarize;
//!
//! let summary = summarize(Path::new("SC3"), &DialectConfig::classic()).unwrap();
//! print!("{}", render(&summary, OutputFormat::Tsv).unwrap());
//! ```
//!
//! [`SummaryRow`]: bsqc_core::SummaryRow

pub mod config;
pub mod discover;
pub mod error;
pub mod extractor;
pub mod metrics;
pub mod output;

use std::path::Path;

use bsqc_core::{COLUMN_COUNT, Dialect, DialectConfig, SummaryRow};
use tracing::info;

use discover::{deduplicated_dir, discover_samples, locate_reports};
use error::{Result, SummaryError};
use extractor::extract_report_set;
use metrics::derive_row;

/// The complete table for one run directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub dialect: Dialect,
    pub header: [&'static str; COLUMN_COUNT],
    /// One row per sample, sorted by deduplicated file name.
    pub rows: Vec<SummaryRow>,
}

/// Builds the summary table for the run directory `root`.
///
/// Reports that do not exist contribute zeros. The run stops at the first
/// malformed value.
///
/// # Errors
///
/// Returns [`SummaryError::MissingDirectory`] if `root` or its deduplicated
/// subdirectory is missing, and [`SummaryError::Extract`] if any report
/// cannot be read or holds a malformed value.
pub fn summarize(root: &Path, config: &DialectConfig) -> Result<Summary> {
    if !root.is_dir() {
        return Err(SummaryError::MissingDirectory(root.to_path_buf()));
    }

    let samples = discover_samples(&deduplicated_dir(root, &config.layout), &config.naming)?;

    let mut rows = Vec::with_capacity(samples.len());
    for sample in &samples {
        let reports = locate_reports(sample, root, &config.layout, &config.naming);
        let fields = extract_report_set(&reports, config.dialect)?;
        rows.push(derive_row(sample, &fields, config));
    }

    info!(
        root = %root.display(),
        dialect = %config.dialect,
        rows = rows.len(),
        "Built summary"
    );

    Ok(Summary {
        dialect: config.dialect,
        header: config.header(),
        rows,
    })
}
