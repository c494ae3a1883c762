use std::path::PathBuf;

use thiserror::Error;

use super::model::Species;

/// Everything that can go wrong while turning a file into a [`ParticleTable`].
///
/// [`ParticleTable`]: super::model::ParticleTable
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The file is missing or could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A required column is absent from the header / schema.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A field was present but could not be interpreted.
    #[error("row {row}, column '{column}': '{value}' is not a valid value")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// Structural problem that is not tied to one column (e.g. JSON root not an array).
    #[error("unexpected layout: {0}")]
    Schema(String),
}

/// A non-finite kinematic value produced by the unguarded formulas.
///
/// These are never raised; they are collected from the species buckets and
/// logged so the user knows why entries are missing from a histogram.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{species} #{index}: {quantity} evaluated to {value}")]
pub struct NumericError {
    pub species: Species,
    /// Position inside the species bucket.
    pub index: usize,
    pub quantity: &'static str,
    pub value: f64,
}
