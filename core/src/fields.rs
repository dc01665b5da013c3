//! Numeric fields extracted from Bismark reports.
//!
//! A [`FieldMap`] holds the values picked out of one or more report files.
//! Absent fields read back as zero, so a missing report simply contributes
//! nothing to a summary row.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named value picked out of a report.
///
/// The serialized form is snake case, which is also what the `fields`
/// command prints.
///
/// # Examples
///
/// ```
/// use bsqc_core::Field;
///
/// assert_eq!(Field::SequencePairs.to_string(), "sequence_pairs");
/// assert!(Field::MappingEfficiency.is_percentage());
/// assert!(!Field::MethylatedCpg.is_percentage());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Sequence pairs analysed in total (alignment report).
    SequencePairs,
    /// Paired-end alignments with a unique best hit (alignment report).
    UniqueBestHits,
    /// Mapping efficiency in percent (alignment report).
    MappingEfficiency,
    /// Percentage of alignments removed as duplicates (deduplication report).
    DuplicationPercent,
    /// Total number of C's analysed (splitting report).
    TotalCytosines,
    /// Methylated C's in CpG context.
    MethylatedCpg,
    /// C to T conversions in CpG context.
    UnmethylatedCpg,
    /// Methylated C's in CHG context.
    MethylatedChg,
    /// C to T conversions in CHG context.
    UnmethylatedChg,
    /// Methylated C's in CHH context.
    MethylatedChh,
    /// C to T conversions in CHH context.
    UnmethylatedChh,
    /// Percentage of C methylated in CpG context.
    PercentMethylatedCpg,
    /// Percentage of C methylated in CHG context.
    PercentMethylatedChg,
    /// Percentage of C methylated in CHH context.
    PercentMethylatedChh,
}

impl Field {
    /// Snake-case name, matching the serialized form.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SequencePairs => "sequence_pairs",
            Self::UniqueBestHits => "unique_best_hits",
            Self::MappingEfficiency => "mapping_efficiency",
            Self::DuplicationPercent => "duplication_percent",
            Self::TotalCytosines => "total_cytosines",
            Self::MethylatedCpg => "methylated_cpg",
            Self::UnmethylatedCpg => "unmethylated_cpg",
            Self::MethylatedChg => "methylated_chg",
            Self::UnmethylatedChg => "unmethylated_chg",
            Self::MethylatedChh => "methylated_chh",
            Self::UnmethylatedChh => "unmethylated_chh",
            Self::PercentMethylatedCpg => "percent_methylated_cpg",
            Self::PercentMethylatedChg => "percent_methylated_chg",
            Self::PercentMethylatedChh => "percent_methylated_chh",
        }
    }

    /// Returns `true` for fields that hold a floating-point percentage.
    pub const fn is_percentage(self) -> bool {
        matches!(
            self,
            Self::MappingEfficiency
                | Self::DuplicationPercent
                | Self::PercentMethylatedCpg
                | Self::PercentMethylatedChg
                | Self::PercentMethylatedChh
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed report value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Integer view; floats are truncated toward zero.
    pub fn as_int(self) -> i64 {
        match self {
            Self::Int(v) => v,
            Self::Float(v) => v as i64,
        }
    }

    /// Floating-point view.
    pub fn as_float(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

/// Field values extracted from reports, keyed by [`Field`].
///
/// Inserting a field that is already present overwrites it, which gives the
/// "last occurrence wins" behaviour of a single linear scan.
///
/// # Examples
///
/// ```
/// use bsqc_core::{Field, FieldMap, Value};
///
/// let mut fields = FieldMap::new();
/// fields.insert(Field::SequencePairs, Value::Int(10));
/// fields.insert(Field::SequencePairs, Value::Int(1000));
///
/// assert_eq!(fields.int(Field::SequencePairs), 1000);
/// assert_eq!(fields.int(Field::MethylatedCpg), 0);
/// assert_eq!(fields.float(Field::MappingEfficiency), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    values: BTreeMap<Field, Value>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `field`, returning the value it replaced.
    pub fn insert(&mut self, field: Field, value: Value) -> Option<Value> {
        self.values.insert(field, value)
    }

    pub fn get(&self, field: Field) -> Option<Value> {
        self.values.get(&field).copied()
    }

    /// Integer value of `field`, or `0` when it was never extracted.
    pub fn int(&self, field: Field) -> i64 {
        self.get(field).map_or(0, Value::as_int)
    }

    /// Float value of `field`, or `0.0` when it was never extracted.
    pub fn float(&self, field: Field) -> f64 {
        self.get(field).map_or(0.0, Value::as_float)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copies every entry of `other` into `self`, overwriting on collision.
    pub fn merge(&mut self, other: FieldMap) {
        self.values.extend(other.values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Value)> + '_ {
        self.values.iter().map(|(field, value)| (*field, *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let fields = FieldMap::new();
        assert!(fields.is_empty());
        assert_eq!(fields.int(Field::MethylatedChh), 0);
        assert_eq!(fields.float(Field::PercentMethylatedChh), 0.0);
    }

    #[test]
    fn test_insert_overwrites_previous_value() {
        let mut fields = FieldMap::new();
        assert_eq!(fields.insert(Field::MappingEfficiency, Value::Float(10.0)), None);
        assert_eq!(
            fields.insert(Field::MappingEfficiency, Value::Float(61.8)),
            Some(Value::Float(10.0))
        );
        assert_eq!(fields.float(Field::MappingEfficiency), 61.8);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_merge_combines_reports() {
        let mut alignment = FieldMap::new();
        alignment.insert(Field::SequencePairs, Value::Int(5));
        let mut splitting = FieldMap::new();
        splitting.insert(Field::MethylatedCpg, Value::Int(7));

        alignment.merge(splitting);
        assert_eq!(alignment.int(Field::SequencePairs), 5);
        assert_eq!(alignment.int(Field::MethylatedCpg), 7);
    }

    #[test]
    fn test_serializes_with_snake_case_keys() {
        let mut fields = FieldMap::new();
        fields.insert(Field::UniqueBestHits, Value::Int(42));
        fields.insert(Field::DuplicationPercent, Value::Float(44.47));

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"unique_best_hits":42,"duplication_percent":44.47}"#);
    }

    #[test]
    fn test_field_name_matches_serde() {
        for field in [
            Field::SequencePairs,
            Field::TotalCytosines,
            Field::UnmethylatedChh,
            Field::PercentMethylatedCpg,
        ] {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.name()));
        }
    }
}
