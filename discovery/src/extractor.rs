//! Field extraction from Bismark report files.
//!
//! Each report is scanned once, line by line. A line whose trimmed text
//! starts with a known label is parsed according to that label's
//! [`ValueKind`]; everything else is ignored. Later matches overwrite earlier
//! ones.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::num::{ParseFloatError, ParseIntError};
use std::path::Path;
use std::sync::LazyLock;

use bsqc_core::{Dialect, Field, FieldMap, ReportKind, ReportSet, Value};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::error::{Result, SummaryError};

static PAREN_PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([\d.]+)%\)").expect("static regex must compile"));

/// How the text after a label is turned into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Whole value parsed as a signed integer.
    Integer,
    /// `%` signs removed, then parsed as a float.
    Percent,
    /// Float inside `(<pct>%)` anywhere on the line; the leading count is
    /// ignored. A line without that pattern leaves the field untouched.
    ParenthesizedPercent,
}

/// One entry of a report's label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelRule {
    pub label: &'static str,
    pub kind: ValueKind,
    pub field: Field,
}

const fn rule(label: &'static str, kind: ValueKind, field: Field) -> LabelRule {
    LabelRule { label, kind, field }
}

const ALIGNMENT_RULES: &[LabelRule] = &[
    rule(
        "Sequence pairs analysed in total:",
        ValueKind::Integer,
        Field::SequencePairs,
    ),
    rule(
        "Number of paired-end alignments with a unique best hit:",
        ValueKind::Integer,
        Field::UniqueBestHits,
    ),
    rule(
        "Mapping efficiency:",
        ValueKind::Percent,
        Field::MappingEfficiency,
    ),
];

const DEDUPLICATION_RULES: &[LabelRule] = &[rule(
    "Total number duplicated alignments removed:",
    ValueKind::ParenthesizedPercent,
    Field::DuplicationPercent,
)];

const SPLITTING_RULES: &[LabelRule] = &[
    rule(
        "Total number of C's analysed:",
        ValueKind::Integer,
        Field::TotalCytosines,
    ),
    rule(
        "Total methylated C's in CpG context:",
        ValueKind::Integer,
        Field::MethylatedCpg,
    ),
    rule(
        "Total C to T conversions in CpG context:",
        ValueKind::Integer,
        Field::UnmethylatedCpg,
    ),
    rule(
        "Total methylated C's in CHG context:",
        ValueKind::Integer,
        Field::MethylatedChg,
    ),
    rule(
        "Total methylated C's in CHH context:",
        ValueKind::Integer,
        Field::MethylatedChh,
    ),
    rule(
        "Total C to T conversions in CHG context:",
        ValueKind::Integer,
        Field::UnmethylatedChg,
    ),
    rule(
        "Total C to T conversions in CHH context:",
        ValueKind::Integer,
        Field::UnmethylatedChh,
    ),
    rule(
        "C methylated in CpG context:",
        ValueKind::Percent,
        Field::PercentMethylatedCpg,
    ),
    rule(
        "C methylated in CHG context:",
        ValueKind::Percent,
        Field::PercentMethylatedChg,
    ),
    rule(
        "C methylated in CHH context:",
        ValueKind::Percent,
        Field::PercentMethylatedChh,
    ),
];

/// Label table for one report kind, restricted to the fields `dialect` tracks.
///
/// # Examples
///
/// ```
/// use bsqc_core::{Dialect, ReportKind};
/// use bsqc_discovery::extractor::rules_for;
///
/// assert_eq!(rules_for(ReportKind::Splitting, Dialect::Extended).len(), 10);
/// assert_eq!(rules_for(ReportKind::Splitting, Dialect::Classic).len(), 7);
/// assert_eq!(rules_for(ReportKind::Alignment, Dialect::Classic).len(), 3);
/// ```
pub fn rules_for(kind: ReportKind, dialect: Dialect) -> Vec<LabelRule> {
    let table = match kind {
        ReportKind::Alignment => ALIGNMENT_RULES,
        ReportKind::Deduplication => DEDUPLICATION_RULES,
        ReportKind::Splitting => SPLITTING_RULES,
    };
    table
        .iter()
        .filter(|rule| dialect.tracks(rule.field))
        .copied()
        .collect()
}

/// Failure while scanning one report.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The report could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A tracked label carried a value of the wrong shape.
    #[error("line {line}: malformed value '{value}' for '{label}': {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        label: &'static str,
        value: String,
        reason: String,
    },
}

/// Scans `reader` once and collects every value matched by `rules`.
///
/// Rules are tried in order and the first matching label handles a line.
///
/// # Examples
///
/// ```
/// use bsqc_core::{Dialect, Field, ReportKind};
/// use bsqc_discovery::extractor::{extract_fields, rules_for};
///
/// let report = "Sequence pairs analysed in total:\t1000\nMapping efficiency:\t61.8%\n";
/// let rules = rules_for(ReportKind::Alignment, Dialect::Classic);
/// let fields = extract_fields(report.as_bytes(), &rules).unwrap();
///
/// assert_eq!(fields.int(Field::SequencePairs), 1000);
/// assert_eq!(fields.float(Field::MappingEfficiency), 61.8);
/// ```
///
/// # Errors
///
/// Returns [`ExtractError::Io`] on read failure and
/// [`ExtractError::Malformed`] when a matched value does not parse.
pub fn extract_fields<R: BufRead>(
    reader: R,
    rules: &[LabelRule],
) -> std::result::Result<FieldMap, ExtractError> {
    let mut fields = FieldMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        let Some(rule) = rules.iter().find(|rule| line.starts_with(rule.label)) else {
            continue;
        };

        let malformed = |value: &str, reason: String| ExtractError::Malformed {
            line: index + 1,
            label: rule.label,
            value: value.to_string(),
            reason,
        };

        match rule.kind {
            ValueKind::Integer => {
                let value = label_value(line);
                let parsed = parse_integer(value).map_err(|e| malformed(value, e.to_string()))?;
                fields.insert(rule.field, Value::Int(parsed));
            }
            ValueKind::Percent => {
                let value = label_value(line);
                let parsed = parse_percent(value).map_err(|e| malformed(value, e.to_string()))?;
                fields.insert(rule.field, Value::Float(parsed));
            }
            ValueKind::ParenthesizedPercent => {
                let Some(captures) = PAREN_PERCENT_RE.captures(line) else {
                    continue;
                };
                let value = &captures[1];
                let parsed = value
                    .parse::<f64>()
                    .map_err(|e| malformed(value, e.to_string()))?;
                fields.insert(rule.field, Value::Float(parsed));
            }
        }
    }

    Ok(fields)
}

/// Text between the first and second `:` of a line, trimmed.
fn label_value(line: &str) -> &str {
    line.split(':').nth(1).unwrap_or_default().trim()
}

fn parse_integer(value: &str) -> std::result::Result<i64, ParseIntError> {
    value.parse::<i64>()
}

fn parse_percent(value: &str) -> std::result::Result<f64, ParseFloatError> {
    value.replace('%', "").trim().parse::<f64>()
}

/// Extracts one report file.
///
/// A path that does not exist yields an empty [`FieldMap`]; the file is
/// closed before this returns, on success and on error.
///
/// # Errors
///
/// Returns [`SummaryError::Extract`] tagged with `path` if the file cannot be
/// read or holds a malformed value.
pub fn extract_report(path: &Path, rules: &[LabelRule]) -> Result<FieldMap> {
    if !path.exists() {
        debug!(path = %path.display(), "Report not found, using defaults");
        return Ok(FieldMap::new());
    }

    let extract = || -> std::result::Result<FieldMap, ExtractError> {
        let file = File::open(path)?;
        extract_fields(BufReader::new(file), rules)
    };

    let fields = extract().map_err(|source| SummaryError::Extract {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), matched = fields.len(), "Extracted report");
    Ok(fields)
}

/// Extracts all three reports of a sample into one mapping.
pub fn extract_report_set(reports: &ReportSet, dialect: Dialect) -> Result<FieldMap> {
    let mut fields = FieldMap::new();
    for (kind, path) in reports.iter() {
        fields.merge(extract_report(path, &rules_for(kind, dialect))?);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(kind: ReportKind, dialect: Dialect, text: &str) -> FieldMap {
        extract_fields(text.as_bytes(), &rules_for(kind, dialect)).unwrap()
    }

    #[test]
    fn test_integer_ignores_whitespace_and_line_order() {
        let text = "\n   Number of paired-end alignments with a unique best hit:   617   \n\
                    some header line\n\
                    \tSequence pairs analysed in total:\t1000\r\n";
        let fields = extract(ReportKind::Alignment, Dialect::Classic, text);

        assert_eq!(fields.get(Field::SequencePairs), Some(Value::Int(1000)));
        assert_eq!(fields.get(Field::UniqueBestHits), Some(Value::Int(617)));
        assert!(!fields.contains(Field::MappingEfficiency));
    }

    #[test]
    fn test_percent_strips_sign() {
        let fields = extract(ReportKind::Alignment, Dialect::Classic, "Mapping efficiency:\t61.8 %\n");
        assert_eq!(fields.float(Field::MappingEfficiency), 61.8);
    }

    #[test]
    fn test_duplication_keeps_inner_percentage() {
        let text = "Total number duplicated alignments removed:\t2746545 (44.47%)\n";
        let fields = extract(ReportKind::Deduplication, Dialect::Classic, text);
        assert_eq!(fields.get(Field::DuplicationPercent), Some(Value::Float(44.47)));
    }

    #[test]
    fn test_duplication_without_parenthesized_percent_is_ignored() {
        let text = "Total number duplicated alignments removed:\t2746545\n";
        let fields = extract(ReportKind::Deduplication, Dialect::Extended, text);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_last_occurrence_wins() {
        let text = "Total methylated C's in CpG context:\t10\n\
                    Total methylated C's in CpG context:\t20\n";
        let fields = extract(ReportKind::Splitting, Dialect::Classic, text);
        assert_eq!(fields.int(Field::MethylatedCpg), 20);
    }

    #[test]
    fn test_malformed_integer_is_fatal_with_line_number() {
        let text = "Sequence pairs analysed in total:\t1000\nNumber of paired-end alignments with a unique best hit:\tabc\n";
        let err = extract_fields(text.as_bytes(), &rules_for(ReportKind::Alignment, Dialect::Classic))
            .unwrap_err();

        match err {
            ExtractError::Malformed { line, label, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(label, "Number of paired-end alignments with a unique best hit:");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_duplication_percent_is_fatal() {
        let text = "Total number duplicated alignments removed:\t5 (1.2.3%)\n";
        let result = extract_fields(
            text.as_bytes(),
            &rules_for(ReportKind::Deduplication, Dialect::Classic),
        );
        assert!(matches!(result, Err(ExtractError::Malformed { line: 1, .. })));
    }

    #[test]
    fn test_classic_ignores_untracked_labels_even_when_malformed() {
        let text = "Total number of C's analysed:\tmany\n\
                    Total C to T conversions in CHH context:\t?\n\
                    Total methylated C's in CHH context:\t3340348\n";
        let fields = extract(ReportKind::Splitting, Dialect::Classic, text);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.int(Field::MethylatedChh), 3340348);

        let err = extract_fields(
            text.as_bytes(),
            &rules_for(ReportKind::Splitting, Dialect::Extended),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_value_stops_at_second_colon() {
        let fields = extract(
            ReportKind::Alignment,
            Dialect::Classic,
            "Sequence pairs analysed in total: 12 : trailing note\n",
        );
        assert_eq!(fields.int(Field::SequencePairs), 12);
    }

    #[test]
    fn test_extract_report_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let fields = extract_report(
            &dir.path().join("absent_PE_report.txt"),
            &rules_for(ReportKind::Alignment, Dialect::Classic),
        )
        .unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_extract_report_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_PE_report.txt");
        std::fs::write(&path, "Mapping efficiency:\tn/a\n").unwrap();

        let err = extract_report(&path, &rules_for(ReportKind::Alignment, Dialect::Classic))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bad_PE_report.txt"), "{message}");
        assert!(matches!(err, SummaryError::Extract { .. }));
    }
}
