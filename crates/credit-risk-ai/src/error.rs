use std::path::PathBuf;

use credit_risk_core::ConversionError;
use thiserror::Error;

/// Failure to load one model artifact.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact file not found: {0}")]
    NotFound(PathBuf),

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: InvalidArtifact },
}

/// Fitted parameters that cannot describe a working transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidArtifact(pub String);

/// A stage rejected its input or produced unusable output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("{stage} expects {expected} features, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{stage} produced a non-finite value")]
    NonFinite { stage: &'static str },

    #[error("{stage} returned {actual} rows, expected {expected}")]
    RowCount {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{stage} returned {actual} probability columns, need at least 2")]
    MissingProbability { stage: &'static str, actual: usize },
}

/// Why a single prediction failed. Nothing is retried or partially applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("input error: {0}")]
    InputConversion(#[from] ConversionError),

    #[error("scaler not available or invalid, check the scaler artifact")]
    ScalerUnavailable,

    #[error("dimensionality reducer not available or invalid, check the reducer artifact")]
    ReducerUnavailable,

    #[error("classifier not available or invalid, check the classifier artifact")]
    ClassifierUnavailable,

    #[error("prediction error: {0}")]
    Prediction(#[from] TransformError),
}
