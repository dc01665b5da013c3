//! Samples and the report files that belong to them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One sample, derived from a deduplicated alignment file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sample {
    /// Sample identifier written to the `ID` column.
    pub id: String,
    /// Name of the deduplicated alignment file the sample was found through.
    pub file_name: String,
}

impl Sample {
    pub fn new(id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
        }
    }
}

/// The three Bismark reports a summary row draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// `*_PE_report.txt` from the alignment step.
    Alignment,
    /// `*.deduplication_report.txt` from deduplication.
    Deduplication,
    /// `*_splitting_report.txt` from the methylation extractor.
    Splitting,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [Self::Alignment, Self::Deduplication, Self::Splitting];
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alignment => write!(f, "alignment"),
            Self::Deduplication => write!(f, "deduplication"),
            Self::Splitting => write!(f, "splitting"),
        }
    }
}

/// Candidate report paths for one sample.
///
/// The paths are computed from naming conventions only; any of them may be
/// missing on disk.
///
/// # Examples
///
/// ```
/// use bsqc_core::{ReportKind, ReportSet};
///
/// let reports = ReportSet::new("a/x_PE_report.txt", "d/x.dedup.txt", "m/x.split.txt");
/// assert_eq!(reports.path(ReportKind::Deduplication).to_str(), Some("d/x.dedup.txt"));
/// assert_eq!(reports.iter().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSet {
    pub alignment: PathBuf,
    pub deduplication: PathBuf,
    pub splitting: PathBuf,
}

impl ReportSet {
    pub fn new(
        alignment: impl Into<PathBuf>,
        deduplication: impl Into<PathBuf>,
        splitting: impl Into<PathBuf>,
    ) -> Self {
        Self {
            alignment: alignment.into(),
            deduplication: deduplication.into(),
            splitting: splitting.into(),
        }
    }

    pub fn path(&self, kind: ReportKind) -> &Path {
        match kind {
            ReportKind::Alignment => &self.alignment,
            ReportKind::Deduplication => &self.deduplication,
            ReportKind::Splitting => &self.splitting,
        }
    }

    /// Iterates `(kind, path)` pairs in alignment, deduplication, splitting order.
    pub fn iter(&self) -> impl Iterator<Item = (ReportKind, &Path)> {
        ReportKind::ALL.into_iter().map(|kind| (kind, self.path(kind)))
    }
}
