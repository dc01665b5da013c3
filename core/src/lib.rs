//! Core types for Bismark QC summary tables.
//!
//! This crate defines the data model shared by the extraction engine and the
//! command-line tool:
//!
//! - [`Field`], [`Value`], [`FieldMap`]: numeric values picked out of
//!   alignment, deduplication and splitting reports.
//! - [`Sample`], [`ReportSet`], [`ReportKind`]: one sample and the candidate
//!   paths of its three reports.
//! - [`Cell`], [`SummaryRow`]: one 13-column output row.
//! - [`Dialect`], [`DialectConfig`]: the two table flavours and every rule
//!   that differs between them.
//!
//! # Example
//!
//! ```
//! use bsqc_core::*;
//!
//! let config = DialectConfig::extended();
//! assert_eq!(config.header().len(), COLUMN_COUNT);
//!
//! let mut fields = FieldMap::new();
//! fields.insert(Field::SequencePairs, Value::Int(1000));
//! assert_eq!(fields.int(Field::SequencePairs), 1000);
//! ```

mod dialect;
mod fields;
mod row;
mod sample;

pub use dialect::*;
pub use fields::{Field, FieldMap, Value};
pub use row::{Cell, SummaryRow};
pub use sample::{ReportKind, ReportSet, Sample};
