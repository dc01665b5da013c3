//! Output dialects.
//!
//! Two flavours of the summary table are in use. They share the extraction
//! engine and differ only in the rules collected in [`DialectConfig`]:
//!
//! | Rule                  | [`Dialect::Classic`]            | [`Dialect::Extended`]                 |
//! |-----------------------|---------------------------------|---------------------------------------|
//! | sample id             | prefix before `_bismark_bt2_pe` | file name minus `.deduplicated.bam`   |
//! | `Raw Seq.`            | 2 x sequence pairs              | sequence pairs                        |
//! | `% of total CpGs`     | always `-`                      | CpGs / 28,000,000 x 100               |
//! | `% mCHH/mCHG`         | mean of %CHG and %CHH           | mCHH / mCHG                           |
//! | `Nb. CHH/G`           | mCHG + mCHH                     | mCHG + uCHG + mCHH + uCHH             |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Field;

/// Marker separating the sample id from the aligner suffix.
pub const BISMARK_PE_MARKER: &str = "_bismark_bt2_pe";

/// Suffix of deduplicated alignment files.
pub const DEDUPLICATED_SUFFIX: &str = ".deduplicated.bam";

/// Denominator for `% of total CpGs` in the extended dialect.
pub const DEFAULT_CPG_DENOMINATOR: u64 = 28_000_000;

/// Number of columns in every summary row.
pub const COLUMN_COUNT: usize = 13;

/// Which flavour of summary table to produce.
///
/// # Examples
///
/// ```
/// use bsqc_core::Dialect;
///
/// assert_eq!(Dialect::default(), Dialect::Classic);
/// assert_eq!(Dialect::Extended.header()[6], "% Duplication2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Classic,
    Extended,
}

impl Dialect {
    /// Column names, in output order.
    pub const fn header(self) -> [&'static str; COLUMN_COUNT] {
        let (duplication, ratio) = match self {
            Self::Classic => ("% Duplication", "% mCHH/mCHG"),
            Self::Extended => ("% Duplication2", "% mCHH/mCHG2"),
        };
        [
            "ID",
            "Sample",
            "Raw Seq.",
            "Seq. For Mapping1",
            "Seq. Mapped",
            "% Mapped",
            duplication,
            "Nb. CpGs",
            "% of total CpGs",
            "% mCpG",
            "% mCpG chr.MT",
            ratio,
            "Nb. CHH/G",
        ]
    }

    /// Whether this dialect reads `field` from the reports at all.
    ///
    /// Labels a dialect does not track are ignored, including when their
    /// values are malformed.
    pub const fn tracks(self, field: Field) -> bool {
        match self {
            Self::Extended => true,
            Self::Classic => !matches!(
                field,
                Field::TotalCytosines | Field::UnmethylatedChg | Field::UnmethylatedChh
            ),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic => write!(f, "classic"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

/// How a sample id is derived from a deduplicated file name, and how report
/// paths are derived back from the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleNaming {
    /// Shortest non-empty prefix in front of `marker`. Names without the
    /// marker are skipped.
    MarkerPrefix { marker: String },
    /// Every occurrence of [`DEDUPLICATED_SUFFIX`] removed from the name.
    StripSuffix,
}

/// Formula for the `Raw Seq.` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSequenceRule {
    /// Paired-end doubling of the analysed pair count.
    DoublePairs,
    /// Analysed pair count unchanged.
    Pairs,
}

/// Formula for the `Nb. CHH/G` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonCpgCountRule {
    /// mCHG + mCHH.
    MethylatedOnly,
    /// mCHH + uCHH + mCHG + uCHG.
    AllCalls,
}

/// Formula for the `% mCHH/mCHG` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonCpgRatioRule {
    /// Mean of %CHG and %CHH if both are non-zero, else `0.0`. One decimal.
    MeanOfPercents,
    /// mCHH / mCHG if mCHH is positive, else `-`. Two decimals.
    ChhOverChg,
}

/// Formula for the `% of total CpGs` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpgShareRule {
    /// Always `-`.
    Placeholder,
    /// CpG count / denominator x 100, two decimals, written only when the
    /// splitting report has a non-zero "Total number of C's analysed".
    FixedDenominator(u64),
}

/// Names of the three report subdirectories under the run root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub aligned: String,
    pub deduplicated: String,
    pub methylation: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            aligned: "Aligned".to_string(),
            deduplicated: "Deduplicated".to_string(),
            methylation: "Methylation".to_string(),
        }
    }
}

/// Every rule that differs between dialects.
///
/// Start from [`DialectConfig::classic`] or [`DialectConfig::extended`] and
/// override individual fields as needed.
///
/// # Examples
///
/// ```
/// use bsqc_core::{CpgShareRule, DialectConfig, RawSequenceRule};
///
/// let classic = DialectConfig::classic();
/// assert_eq!(classic.raw_sequences, RawSequenceRule::DoublePairs);
/// assert_eq!(classic.sample_label_for("S1"), "S1_oocyte");
///
/// let extended = DialectConfig::extended();
/// assert_eq!(extended.cpg_share, CpgShareRule::FixedDenominator(28_000_000));
/// assert_eq!(extended.sample_label_for("S1"), "K562");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectConfig {
    pub dialect: Dialect,
    pub naming: SampleNaming,
    pub raw_sequences: RawSequenceRule,
    pub non_cpg_count: NonCpgCountRule,
    pub non_cpg_ratio: NonCpgRatioRule,
    pub cpg_share: CpgShareRule,
    /// Template for the `Sample` column; `{id}` expands to the sample id.
    pub sample_label: String,
    pub layout: Layout,
}

impl DialectConfig {
    pub fn classic() -> Self {
        Self {
            dialect: Dialect::Classic,
            naming: SampleNaming::MarkerPrefix {
                marker: BISMARK_PE_MARKER.to_string(),
            },
            raw_sequences: RawSequenceRule::DoublePairs,
            non_cpg_count: NonCpgCountRule::MethylatedOnly,
            non_cpg_ratio: NonCpgRatioRule::MeanOfPercents,
            cpg_share: CpgShareRule::Placeholder,
            sample_label: "{id}_oocyte".to_string(),
            layout: Layout::default(),
        }
    }

    pub fn extended() -> Self {
        Self {
            dialect: Dialect::Extended,
            naming: SampleNaming::StripSuffix,
            raw_sequences: RawSequenceRule::Pairs,
            non_cpg_count: NonCpgCountRule::AllCalls,
            non_cpg_ratio: NonCpgRatioRule::ChhOverChg,
            cpg_share: CpgShareRule::FixedDenominator(DEFAULT_CPG_DENOMINATOR),
            sample_label: "K562".to_string(),
            layout: Layout::default(),
        }
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Classic => Self::classic(),
            Dialect::Extended => Self::extended(),
        }
    }

    pub fn header(&self) -> [&'static str; COLUMN_COUNT] {
        self.dialect.header()
    }

    /// Expands the sample label template for `id`.
    pub fn sample_label_for(&self, id: &str) -> String {
        self.sample_label.replace("{id}", id)
    }
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self::classic()
    }
}
