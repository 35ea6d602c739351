use std::path::PathBuf;

use thiserror::Error;

use super::schema::ColumnKind;

/// Everything that can go wrong while turning a recording file into columns.
///
/// All variants are terminal for the load or reshape that produced them; no
/// partial table is ever handed back alongside an error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{}'", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("row {row} has {found} fields but the first row has {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}', row {row}: '{value}' is not a valid {kind}")]
    ParseError {
        column: String,
        row: usize,
        value: String,
        kind: ColumnKind,
    },

    #[error("{len} values cannot be split evenly into {channels} channels")]
    NotDivisible { len: usize, channels: usize },

    #[error("channel count must be at least 1")]
    InvalidChannelCount,

    #[error("column schema is empty")]
    EmptySchema,

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("header has {found} fields, schema declares {expected}")]
    HeaderMismatch { expected: usize, found: usize },

    #[error("line {line}: undecodable row")]
    Decode {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("'{left}' has {left_len} samples but '{right}' has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;
