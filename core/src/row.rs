//! Summary rows.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::COLUMN_COUNT;

/// One rendered table cell.
///
/// # Examples
///
/// ```
/// use bsqc_core::Cell;
///
/// assert_eq!(Cell::Count(2000).to_string(), "2000");
/// assert_eq!(Cell::decimal(44.47, 1).to_string(), "44.5");
/// assert_eq!(Cell::decimal(2.0, 2).to_string(), "2.00");
/// assert_eq!(Cell::Missing.to_string(), "-");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Count(i64),
    /// A float written with a fixed number of decimal places.
    Decimal { value: f64, places: usize },
    /// Rendered as `-`.
    Missing,
}

impl Cell {
    pub fn decimal(value: f64, places: usize) -> Self {
        Self::Decimal { value, places }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Count(count) => write!(f, "{count}"),
            Self::Decimal { value, places } => write!(f, "{:.*}", *places, value),
            Self::Missing => f.write_str("-"),
        }
    }
}

/// Counts serialize as numbers; everything else as its rendered text, so
/// structured output keeps the table's rounding.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(count) => serializer.serialize_i64(*count),
            other => serializer.collect_str(other),
        }
    }
}

/// One output row, columns in header order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub id: Cell,
    pub sample: Cell,
    pub raw_sequences: Cell,
    pub sequences_for_mapping: Cell,
    pub sequences_mapped: Cell,
    pub percent_mapped: Cell,
    pub percent_duplication: Cell,
    pub cpg_count: Cell,
    pub percent_of_total_cpgs: Cell,
    pub percent_methylated_cpg: Cell,
    pub percent_methylated_cpg_chr_mt: Cell,
    pub non_cpg_ratio: Cell,
    pub non_cpg_count: Cell,
}

impl SummaryRow {
    /// Cells in header order.
    pub fn cells(&self) -> [&Cell; COLUMN_COUNT] {
        [
            &self.id,
            &self.sample,
            &self.raw_sequences,
            &self.sequences_for_mapping,
            &self.sequences_mapped,
            &self.percent_mapped,
            &self.percent_duplication,
            &self.cpg_count,
            &self.percent_of_total_cpgs,
            &self.percent_methylated_cpg,
            &self.percent_methylated_cpg_chr_mt,
            &self.non_cpg_ratio,
            &self.non_cpg_count,
        ]
    }

    /// Tab-separated line without a trailing newline.
    pub fn to_tsv(&self) -> String {
        self.cells()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\t")
    }
}
