//! Loading the three fitted model artifacts.
//!
//! Each artifact is a JSON document tagged by `kind`:
//!
//! ```json
//! {"kind": "standard_scaler", "mean": [...], "scale": [...]}
//! {"kind": "pca", "mean": [...], "components": [[...], ...]}
//! {"kind": "logistic_regression", "coef": [[...]], "intercept": [...], "classes": [0, 1]}
//! ```
//!
//! The classifier is required; the scaler and reducer are loaded best-effort
//! and left absent on any failure. The pipeline reports which one is missing
//! when a prediction is attempted.

use std::path::{Path, PathBuf};

use credit_risk_core::FEATURE_COUNT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::classifier::{Classifier, LogisticRegression};
use crate::error::{ArtifactLoadError, InvalidArtifact};
use crate::transform::{MinMaxScaler, Pca, StandardScaler, Transformer};

pub const DEFAULT_CLASSIFIER_FILE: &str = "logistic_regression.json";
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
pub const DEFAULT_REDUCER_FILE: &str = "pca.json";

/// Where each artifact lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub scaler: PathBuf,
    pub reducer: PathBuf,
}

impl ArtifactPaths {
    /// Default filenames inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            classifier: dir.join(DEFAULT_CLASSIFIER_FILE),
            scaler: dir.join(DEFAULT_SCALER_FILE),
            reducer: dir.join(DEFAULT_REDUCER_FILE),
        }
    }
}

/// The fitted model chain, loaded once and read-only afterwards.
pub struct Artifacts {
    classifier: Option<Box<dyn Classifier>>,
    scaler: Option<Box<dyn Transformer>>,
    reducer: Option<Box<dyn Transformer>>,
}

/// Presence and dimensions of one loaded stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub kind: &'static str,
    pub n_in: usize,
    pub n_out: usize,
}

/// Which stages loaded, for status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub scaler: Option<StageSummary>,
    pub reducer: Option<StageSummary>,
    pub classifier: Option<StageSummary>,
}

impl ArtifactSummary {
    /// True when every stage is present.
    pub fn is_complete(&self) -> bool {
        self.scaler.is_some() && self.reducer.is_some() && self.classifier.is_some()
    }
}

impl Artifacts {
    /// Assemble artifacts that were built in memory.
    ///
    /// A classifier with fewer than two classes has no good-class
    /// probability; it is logged and left absent.
    pub fn new(
        classifier: Option<Box<dyn Classifier>>,
        scaler: Option<Box<dyn Transformer>>,
        reducer: Option<Box<dyn Transformer>>,
    ) -> Self {
        let classifier = classifier.filter(|c| {
            let usable = c.classes().len() >= 2;
            if !usable {
                error!(
                    kind = c.name(),
                    classes = ?c.classes(),
                    "classifier needs at least two classes"
                );
            }
            usable
        });
        let artifacts = Self {
            classifier,
            scaler,
            reducer,
        };
        artifacts.warn_on_chain_mismatch();
        artifacts
    }

    /// Load all three artifacts, tolerating failures.
    ///
    /// A missing or invalid classifier is logged as an error, a missing or
    /// invalid scaler or reducer as a warning. The affected stage is left
    /// absent either way.
    pub fn load(paths: &ArtifactPaths) -> Self {
        let classifier = load_classifier(&paths.classifier)
            .inspect_err(|e| error!(error = %e, "classifier not found or invalid"))
            .ok();
        let scaler = load_scaler(&paths.scaler)
            .inspect_err(|e| warn!(error = %e, "scaler not found or invalid"))
            .ok();
        let reducer = load_reducer(&paths.reducer)
            .inspect_err(|e| warn!(error = %e, "reducer not found or invalid"))
            .ok();

        Self::new(classifier, scaler, reducer)
    }

    /// Load all three artifacts, failing on the first one that does not load.
    pub fn load_strict(paths: &ArtifactPaths) -> Result<Self, ArtifactLoadError> {
        let classifier = load_classifier(&paths.classifier)?;
        let scaler = load_scaler(&paths.scaler)?;
        let reducer = load_reducer(&paths.reducer)?;
        Ok(Self::new(Some(classifier), Some(scaler), Some(reducer)))
    }

    pub fn classifier(&self) -> Option<&dyn Classifier> {
        self.classifier.as_deref()
    }

    pub fn scaler(&self) -> Option<&dyn Transformer> {
        self.scaler.as_deref()
    }

    pub fn reducer(&self) -> Option<&dyn Transformer> {
        self.reducer.as_deref()
    }

    pub fn summary(&self) -> ArtifactSummary {
        let stage = |t: &dyn Transformer| StageSummary {
            kind: t.name(),
            n_in: t.n_features_in(),
            n_out: t.n_features_out(),
        };
        ArtifactSummary {
            scaler: self.scaler().map(stage),
            reducer: self.reducer().map(stage),
            classifier: self.classifier().map(|c| StageSummary {
                kind: c.name(),
                n_in: c.n_features(),
                n_out: c.classes().len(),
            }),
        }
    }

    /// Stage widths are also checked per call; this only surfaces a broken
    /// chain at startup.
    fn warn_on_chain_mismatch(&self) {
        if let (Some(s), Some(r)) = (self.scaler(), self.reducer())
            && s.n_features_out() != r.n_features_in()
        {
            warn!(
                scaler_out = s.n_features_out(),
                reducer_in = r.n_features_in(),
                "scaler output width does not match reducer input"
            );
        }
        if let (Some(r), Some(c)) = (self.reducer(), self.classifier())
            && r.n_features_out() != c.n_features()
        {
            warn!(
                reducer_out = r.n_features_out(),
                classifier_in = c.n_features(),
                "reducer output width does not match classifier input"
            );
        }
        if let Some(c) = self.classifier()
            && c.classes() != [0, 1]
        {
            warn!(
                classes = ?c.classes(),
                "classifier classes are not {{0, 1}}; any class other than 0 is reported as good"
            );
        }
    }
}

// ── Artifact documents ──

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerDoc {
    StandardScaler { mean: Vec<f64>, scale: Vec<f64> },
    MinMaxScaler { min: Vec<f64>, scale: Vec<f64> },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReducerDoc {
    Pca {
        mean: Vec<f64>,
        components: Vec<Vec<f64>>,
        #[serde(default)]
        explained_variance: Option<Vec<f64>>,
        #[serde(default)]
        whiten: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierDoc {
    LogisticRegression {
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        classes: Vec<i64>,
    },
}

fn read_doc<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactLoadError> {
    if !path.exists() {
        return Err(ArtifactLoadError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ArtifactLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path) -> impl FnOnce(InvalidArtifact) -> ArtifactLoadError + '_ {
    move |reason| ArtifactLoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}

/// Load a scaler; it must accept the full encoded feature vector.
pub fn load_scaler(path: &Path) -> Result<Box<dyn Transformer>, ArtifactLoadError> {
    let scaler: Box<dyn Transformer> = match read_doc::<ScalerDoc>(path)? {
        ScalerDoc::StandardScaler { mean, scale } => {
            Box::new(StandardScaler::new(mean, scale).map_err(invalid(path))?)
        }
        ScalerDoc::MinMaxScaler { min, scale } => {
            Box::new(MinMaxScaler::new(min, scale).map_err(invalid(path))?)
        }
    };
    if scaler.n_features_in() != FEATURE_COUNT {
        return Err(invalid(path)(InvalidArtifact(format!(
            "scaler expects {} features, the encoded vector has {FEATURE_COUNT}",
            scaler.n_features_in()
        ))));
    }
    info!(path = %path.display(), kind = scaler.name(), "loaded scaler");
    Ok(scaler)
}

pub fn load_reducer(path: &Path) -> Result<Box<dyn Transformer>, ArtifactLoadError> {
    let reducer: Box<dyn Transformer> = match read_doc::<ReducerDoc>(path)? {
        ReducerDoc::Pca {
            mean,
            components,
            explained_variance,
            whiten,
        } => Box::new(
            Pca::new(mean, components, explained_variance, whiten).map_err(invalid(path))?,
        ),
    };
    info!(
        path = %path.display(),
        kind = reducer.name(),
        n_in = reducer.n_features_in(),
        n_out = reducer.n_features_out(),
        "loaded reducer"
    );
    Ok(reducer)
}

pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ArtifactLoadError> {
    let classifier: Box<dyn Classifier> = match read_doc::<ClassifierDoc>(path)? {
        ClassifierDoc::LogisticRegression {
            coef,
            intercept,
            classes,
        } => Box::new(LogisticRegression::new(coef, intercept, classes).map_err(invalid(path))?),
    };
    info!(
        path = %path.display(),
        kind = classifier.name(),
        n_features = classifier.n_features(),
        "loaded classifier"
    );
    Ok(classifier)
}
