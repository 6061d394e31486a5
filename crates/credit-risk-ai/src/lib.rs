//! Inference layer: fitted artifact loading and the scaler → PCA → classifier chain.

pub mod artifacts;
pub mod batch;
pub mod classifier;
mod error;
pub mod pipeline;
pub mod transform;

pub use artifacts::{ArtifactPaths, ArtifactSummary, Artifacts, StageSummary};
pub use batch::{encode_batch, score_batch};
pub use classifier::{Classifier, LogisticRegression};
pub use error::{ArtifactLoadError, InvalidArtifact, PredictError, TransformError};
pub use pipeline::{Prediction, RiskPipeline};
pub use transform::{MinMaxScaler, Pca, StandardScaler, Transformer};
