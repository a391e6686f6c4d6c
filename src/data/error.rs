use thiserror::Error;

use super::model::{Metric, Sex};

/// Structural problems with an input file. I/O and parser failures are
/// wrapped in `anyhow` context by the loader instead.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("no subject columns in header")]
    EmptyHeader,

    #[error("row {row} is not a JSON object")]
    NotAnObject { row: usize },

    #[error("column '{column}' has type {data_type}, expected a numeric column")]
    NonNumericColumn { column: String, data_type: String },
}

/// Non-fatal findings while deriving series. Numeric output is unaffected;
/// these only make silent NaN/Infinity propagation visible.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineWarning {
    #[error("{metric}: {count} malformed cell(s) in {sex} data became NaN")]
    MalformedCells {
        metric: Metric,
        sex: Sex,
        count: usize,
    },

    #[error("{metric}: male data has {male} rows but female data has {female}")]
    LengthMismatch {
        metric: Metric,
        male: usize,
        female: usize,
    },

    #[error("{metric}: {mode} values span a zero-width range [{min}, {max}]; normalised output is NaN/inf")]
    DegenerateScale {
        metric: Metric,
        mode: &'static str,
        min: f64,
        max: f64,
    },
}
