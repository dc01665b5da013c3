//! Sample discovery and report location.
//!
//! Samples are found by listing the deduplicated-output directory; their
//! report paths are then rebuilt from the sample id with fixed naming rules.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use bsqc_core::{DEDUPLICATED_SUFFIX, Layout, ReportSet, Sample, SampleNaming};
use tracing::debug;

use crate::error::{Result, SummaryError};

/// Lowercase strand tag that the alignment report spells in uppercase.
const STRAND_TAG: &str = "_pe";

/// Lists `dedup_dir` and derives one [`Sample`] per deduplicated alignment file.
///
/// Only names ending in [`DEDUPLICATED_SUFFIX`] are considered. Under
/// [`SampleNaming::MarkerPrefix`], names without the marker are skipped.
/// Samples come back sorted by file name, independent of listing order.
///
/// # Errors
///
/// Returns [`SummaryError::MissingDirectory`] if `dedup_dir` is not a
/// directory, or [`SummaryError::Io`] if it cannot be listed.
pub fn discover_samples(dedup_dir: &Path, naming: &SampleNaming) -> Result<Vec<Sample>> {
    if !dedup_dir.is_dir() {
        return Err(SummaryError::MissingDirectory(dedup_dir.to_path_buf()));
    }

    let io_error = |source| SummaryError::Io {
        path: dedup_dir.to_path_buf(),
        source,
    };

    let mut file_names = BTreeSet::new();
    for entry in fs::read_dir(dedup_dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
            continue;
        };
        if name.ends_with(DEDUPLICATED_SUFFIX) {
            file_names.insert(name);
        }
    }

    let mut samples = Vec::with_capacity(file_names.len());
    for file_name in file_names {
        match sample_id(&file_name, naming) {
            Some(id) => {
                debug!(sample = %id, file = %file_name, "Discovered sample");
                samples.push(Sample::new(id, file_name));
            }
            None => debug!(file = %file_name, "Skipping file without sample marker"),
        }
    }

    Ok(samples)
}

/// Derives the sample id from a deduplicated file name.
///
/// Returns `None` when a marker rule does not match.
pub fn sample_id(file_name: &str, naming: &SampleNaming) -> Option<String> {
    match naming {
        SampleNaming::MarkerPrefix { marker } => {
            marker_prefix(file_name, marker).map(str::to_string)
        }
        SampleNaming::StripSuffix => Some(file_name.replace(DEDUPLICATED_SUFFIX, "")),
    }
}

/// Shortest non-empty prefix of `file_name` that is followed by `marker`.
/// The prefix never spans a line break.
fn marker_prefix<'a>(file_name: &'a str, marker: &str) -> Option<&'a str> {
    let start = file_name.chars().next()?.len_utf8();
    let end = start + file_name[start..].find(marker)?;
    let prefix = &file_name[..end];
    (!prefix.contains('\n')).then_some(prefix)
}

/// Builds the three candidate report paths for `sample`.
///
/// No filesystem access happens here; the paths may not exist.
pub fn locate_reports(
    sample: &Sample,
    root: &Path,
    layout: &Layout,
    naming: &SampleNaming,
) -> ReportSet {
    let aligned = root.join(&layout.aligned);
    let deduplicated = root.join(&layout.deduplicated);
    let methylation = root.join(&layout.methylation);
    let id = sample.id.as_str();

    let (alignment, deduplication, splitting) = match naming {
        SampleNaming::MarkerPrefix { marker } => (
            format!("{id}{}_report.txt", marker.replace(STRAND_TAG, "_PE")),
            format!("{id}{marker}.deduplication_report.txt"),
            format!("{id}{marker}.deduplicated_splitting_report.txt"),
        ),
        SampleNaming::StripSuffix => (
            format!("{}_report.txt", id.replace(STRAND_TAG, "_PE")),
            format!("{id}.deduplication_report.txt"),
            format!("{id}.deduplicated_splitting_report.txt"),
        ),
    };

    let reports = ReportSet::new(
        aligned.join(alignment),
        deduplicated.join(deduplication),
        methylation.join(splitting),
    );
    debug!(sample = %id, reports = ?reports, "Located reports");
    reports
}

/// Resolves the directory holding deduplicated alignment files.
pub fn deduplicated_dir(root: &Path, layout: &Layout) -> PathBuf {
    root.join(&layout.deduplicated)
}
