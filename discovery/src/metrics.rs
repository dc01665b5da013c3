//! Derived metrics and row assembly.
//!
//! Pure functions from extracted fields to table cells. Each formula follows
//! the rule selected in the active [`DialectConfig`].

use bsqc_core::{
    Cell, CpgShareRule, DialectConfig, Field, FieldMap, NonCpgCountRule, NonCpgRatioRule,
    RawSequenceRule, Sample, SummaryRow,
};
use tracing::warn;

/// `Raw Seq.` from the analysed pair count.
pub fn raw_sequences(pairs: i64, rule: RawSequenceRule) -> i64 {
    match rule {
        RawSequenceRule::DoublePairs => pairs.saturating_mul(2),
        RawSequenceRule::Pairs => pairs,
    }
}

/// `Nb. CpGs`: methylated plus unmethylated calls in CpG context.
pub fn cpg_count(fields: &FieldMap) -> i64 {
    fields
        .int(Field::MethylatedCpg)
        .saturating_add(fields.int(Field::UnmethylatedCpg))
}

/// `Nb. CHH/G` under `rule`.
pub fn non_cpg_count(fields: &FieldMap, rule: NonCpgCountRule) -> i64 {
    let terms: &[Field] = match rule {
        NonCpgCountRule::MethylatedOnly => &[Field::MethylatedChg, Field::MethylatedChh],
        NonCpgCountRule::AllCalls => &[
            Field::MethylatedChh,
            Field::UnmethylatedChh,
            Field::MethylatedChg,
            Field::UnmethylatedChg,
        ],
    };
    terms
        .iter()
        .fold(0i64, |sum, field| sum.saturating_add(fields.int(*field)))
}

/// `% mCHH/mCHG` under `rule`.
///
/// [`NonCpgRatioRule::MeanOfPercents`] is all-or-nothing: a single zero
/// percentage gives `0.0`. [`NonCpgRatioRule::ChhOverChg`] divides the CHH
/// count by the CHG count; with no CHH calls, or no CHG calls to divide by,
/// the cell is `-`.
pub fn non_cpg_ratio(fields: &FieldMap, rule: NonCpgRatioRule) -> Cell {
    match rule {
        NonCpgRatioRule::MeanOfPercents => {
            let chg = fields.float(Field::PercentMethylatedChg);
            let chh = fields.float(Field::PercentMethylatedChh);
            let mean = if chg != 0.0 && chh != 0.0 {
                (chg + chh) / 2.0
            } else {
                0.0
            };
            Cell::decimal(mean, 1)
        }
        NonCpgRatioRule::ChhOverChg => {
            let chh = fields.int(Field::MethylatedChh);
            let chg = fields.int(Field::MethylatedChg);
            if chh <= 0 {
                return Cell::Missing;
            }
            if chg == 0 {
                warn!(methylated_chh = chh, "No methylated CHG calls, CHH/CHG ratio undefined");
                return Cell::Missing;
            }
            Cell::decimal(chh as f64 / chg as f64, 2)
        }
    }
}

/// `% of total CpGs` under `rule`.
///
/// The fixed-denominator form is written only when the splitting report had a
/// non-zero "Total number of C's analysed"; that total gates the cell but does
/// not enter the formula.
pub fn cpg_share(fields: &FieldMap, cpg_count: i64, rule: CpgShareRule) -> Cell {
    match rule {
        CpgShareRule::Placeholder => Cell::Missing,
        CpgShareRule::FixedDenominator(denominator) => {
            if fields.int(Field::TotalCytosines) > 0 {
                Cell::decimal(cpg_count as f64 / denominator as f64 * 100.0, 2)
            } else {
                Cell::Missing
            }
        }
    }
}

/// Assembles the summary row for `sample` from its extracted fields.
///
/// # Examples
///
/// ```
/// use bsqc_core::{DialectConfig, Field, FieldMap, Sample, Value};
/// use bsqc_discovery::metrics::derive_row;
///
/// let mut fields = FieldMap::new();
/// fields.insert(Field::SequencePairs, Value::Int(1000));
/// let sample = Sample::new("S1", "S1_bismark_bt2_pe.deduplicated.bam");
///
/// let classic = derive_row(&sample, &fields, &DialectConfig::classic());
/// assert_eq!(classic.raw_sequences.to_string(), "2000");
///
/// let extended = derive_row(&sample, &fields, &DialectConfig::extended());
/// assert_eq!(extended.raw_sequences.to_string(), "1000");
/// ```
pub fn derive_row(sample: &Sample, fields: &FieldMap, config: &DialectConfig) -> SummaryRow {
    let pairs = fields.int(Field::SequencePairs);
    let cpgs = cpg_count(fields);

    SummaryRow {
        id: Cell::Text(sample.id.clone()),
        sample: Cell::Text(config.sample_label_for(&sample.id)),
        raw_sequences: Cell::Count(raw_sequences(pairs, config.raw_sequences)),
        sequences_for_mapping: Cell::Count(pairs),
        sequences_mapped: Cell::Count(fields.int(Field::UniqueBestHits)),
        percent_mapped: Cell::decimal(fields.float(Field::MappingEfficiency), 1),
        percent_duplication: Cell::decimal(fields.float(Field::DuplicationPercent), 1),
        cpg_count: Cell::Count(cpgs),
        percent_of_total_cpgs: cpg_share(fields, cpgs, config.cpg_share),
        percent_methylated_cpg: Cell::decimal(fields.float(Field::PercentMethylatedCpg), 1),
        percent_methylated_cpg_chr_mt: Cell::Missing,
        non_cpg_ratio: non_cpg_ratio(fields, config.non_cpg_ratio),
        non_cpg_count: Cell::Count(non_cpg_count(fields, config.non_cpg_count)),
    }
}
