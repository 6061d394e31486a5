//! Encode → scale → reduce → classify.

use credit_risk_core::{ApplicantForm, FEATURE_COUNT, FeatureVector, RiskLabel};
use ndarray::Array2;
use tracing::debug;

use crate::artifacts::Artifacts;
use crate::error::{PredictError, TransformError};

/// Outcome of one successful prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Raw class value from the classifier.
    pub class: i64,
    pub label: RiskLabel,
    /// Probability assigned to the good class (probability column 1).
    pub confidence: f64,
}

/// Stateless inference over a loaded [`Artifacts`] set.
///
/// Holds no per-request state, so one pipeline can serve any number of
/// callers, including from several threads.
pub struct RiskPipeline {
    artifacts: Artifacts,
}

impl RiskPipeline {
    pub fn new(artifacts: Artifacts) -> Self {
        Self { artifacts }
    }

    /// Score a raw applicant.
    pub fn predict(&self, form: &ApplicantForm) -> Result<Prediction, PredictError> {
        let features = FeatureVector::from_form(form)?;
        self.predict_features(&features)
    }

    /// Score an already-encoded feature vector.
    ///
    /// Stage availability is checked in chain order before any transform
    /// runs: scaler, then reducer. The classifier is checked after both
    /// transforms have succeeded.
    pub fn predict_features(&self, features: &FeatureVector) -> Result<Prediction, PredictError> {
        debug!(features = ?features.as_slice(), "raw input features");

        let scaler = self
            .artifacts
            .scaler()
            .ok_or(PredictError::ScalerUnavailable)?;
        let reducer = self
            .artifacts
            .reducer()
            .ok_or(PredictError::ReducerUnavailable)?;

        let values = features.as_slice();
        let row = Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| values[j]);

        let scaled = scaler.transform(row.view())?;
        check_single_row(scaler.name(), scaled.nrows())?;
        debug!(scaled = ?scaled.row(0).to_vec(), "scaled features");

        let reduced = reducer.transform(scaled.view())?;
        check_single_row(reducer.name(), reduced.nrows())?;
        debug!(reduced = ?reduced.row(0).to_vec(), "reduced features");

        let classifier = self
            .artifacts
            .classifier()
            .ok_or(PredictError::ClassifierUnavailable)?;
        let classes = classifier.predict(reduced.view())?;
        let proba = classifier.predict_proba(reduced.view())?;

        check_single_row(classifier.name(), classes.len())?;
        check_single_row(classifier.name(), proba.nrows())?;
        let class = classes[0];
        let confidence = proba
            .get((0, 1))
            .copied()
            .ok_or(TransformError::MissingProbability {
                stage: classifier.name(),
                actual: proba.ncols(),
            })?;
        debug!(class, probabilities = ?proba.row(0).to_vec(), confidence, "classifier output");

        Ok(Prediction {
            class,
            label: RiskLabel::from_class(class),
            confidence,
        })
    }
}

/// Every stage must hand back exactly one row for the one applicant.
fn check_single_row(stage: &'static str, rows: usize) -> Result<(), TransformError> {
    if rows == 1 {
        Ok(())
    } else {
        Err(TransformError::RowCount {
            stage,
            expected: 1,
            actual: rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::tests::write_fixture_dir;
    use crate::artifacts::{ArtifactPaths, DEFAULT_CLASSIFIER_FILE};
    use crate::classifier::{Classifier, LogisticRegression};
    use crate::transform::{Pca, StandardScaler, Transformer};
    use ndarray::{Array1, ArrayView2};

    fn reference_applicant() -> ApplicantForm {
        ApplicantForm {
            id: "1".into(),
            age: "35".into(),
            sex: "Male".into(),
            job: "2".into(),
            housing: "own".into(),
            savings: "moderate".into(),
            checking: "moderate".into(),
            credit_amount: "2000".into(),
            duration: "12".into(),
            purpose: "car".into(),
        }
    }

    fn scaler() -> Box<dyn Transformer> {
        Box::new(StandardScaler::new(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]).unwrap())
    }

    /// Projects onto (age, credit_amount).
    fn reducer() -> Box<dyn Transformer> {
        let mut components = vec![vec![0.0; FEATURE_COUNT]; 2];
        components[0][1] = 1.0;
        components[1][7] = 1.0;
        Box::new(Pca::new(vec![0.0; FEATURE_COUNT], components, None, false).unwrap())
    }

    /// z = 0.05 * age - 0.001 * credit_amount
    fn classifier() -> Box<dyn Classifier> {
        Box::new(LogisticRegression::new(vec![vec![0.05, -0.001]], vec![0.0], vec![0, 1]).unwrap())
    }

    fn full_pipeline() -> RiskPipeline {
        RiskPipeline::new(Artifacts::new(
            Some(classifier()),
            Some(scaler()),
            Some(reducer()),
        ))
    }

    #[test]
    fn reference_applicant_end_to_end() {
        let prediction = full_pipeline().predict(&reference_applicant()).unwrap();

        // z = 1.75 - 2.0 = -0.25
        let expected = 1.0 / (1.0 + 0.25f64.exp());
        assert_eq!(prediction.class, 0);
        assert_eq!(prediction.label, RiskLabel::Bad);
        assert!((prediction.confidence - expected).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&prediction.confidence));
    }

    #[test]
    fn good_label_for_positive_decision() {
        let form = ApplicantForm {
            credit_amount: "500".into(),
            ..reference_applicant()
        };
        let prediction = full_pipeline().predict(&form).unwrap();
        assert_eq!(prediction.class, 1);
        assert_eq!(prediction.label, RiskLabel::Good);
        assert!(prediction.confidence > 0.5);
    }

    #[test]
    fn repeated_predictions_are_identical() {
        let pipeline = full_pipeline();
        let form = reference_applicant();
        let first = pipeline.predict(&form).unwrap();
        for _ in 0..10 {
            assert_eq!(pipeline.predict(&form).unwrap(), first);
        }
    }

    #[test]
    fn scaler_unavailable_before_any_transform() {
        let pipeline = RiskPipeline::new(Artifacts::new(Some(classifier()), None, None));
        assert_eq!(
            pipeline.predict(&reference_applicant()),
            Err(PredictError::ScalerUnavailable)
        );
    }

    #[test]
    fn reducer_unavailable() {
        let pipeline = RiskPipeline::new(Artifacts::new(Some(classifier()), Some(scaler()), None));
        assert_eq!(
            pipeline.predict(&reference_applicant()),
            Err(PredictError::ReducerUnavailable)
        );
    }

    #[test]
    fn classifier_unavailable() {
        let pipeline = RiskPipeline::new(Artifacts::new(None, Some(scaler()), Some(reducer())));
        assert_eq!(
            pipeline.predict(&reference_applicant()),
            Err(PredictError::ClassifierUnavailable)
        );
    }

    #[test]
    fn input_error_reported_before_missing_stages() {
        let pipeline = RiskPipeline::new(Artifacts::new(None, None, None));
        let form = ApplicantForm {
            credit_amount: "abc".into(),
            ..reference_applicant()
        };
        match pipeline.predict(&form) {
            Err(PredictError::InputConversion(e)) => assert_eq!(e.field, "credit_amount"),
            other => panic!("expected InputConversion, got {other:?}"),
        }
    }

    #[test]
    fn chain_width_mismatch_is_prediction_error() {
        let wide: Box<dyn Classifier> = Box::new(
            LogisticRegression::new(vec![vec![1.0, 1.0, 1.0]], vec![0.0], vec![0, 1]).unwrap(),
        );
        let pipeline = RiskPipeline::new(Artifacts::new(Some(wide), Some(scaler()), Some(reducer())));
        let err = pipeline.predict(&reference_applicant()).unwrap_err();
        assert_eq!(
            err,
            PredictError::Prediction(TransformError::ShapeMismatch {
                stage: "logistic_regression",
                expected: 3,
                actual: 2
            })
        );
        assert!(err.to_string().starts_with("prediction error"));
    }

    #[test]
    fn loaded_from_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_fixture_dir(tmp.path());
        let pipeline = RiskPipeline::new(Artifacts::load(&ArtifactPaths::in_dir(tmp.path())));

        let from_disk = pipeline.predict(&reference_applicant()).unwrap();
        let in_memory = full_pipeline().predict(&reference_applicant()).unwrap();
        assert_eq!(from_disk, in_memory);
    }

    #[test]
    fn missing_classifier_file_fails_cleanly() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_fixture_dir(tmp.path());
        std::fs::remove_file(tmp.path().join(DEFAULT_CLASSIFIER_FILE)).unwrap();
        let pipeline = RiskPipeline::new(Artifacts::load(&ArtifactPaths::in_dir(tmp.path())));

        assert_eq!(
            pipeline.predict(&reference_applicant()),
            Err(PredictError::ClassifierUnavailable)
        );
    }

    #[test]
    fn pipeline_is_shareable_across_threads() {
        let pipeline = full_pipeline();
        let form = reference_applicant();
        let expected = pipeline.predict(&form).unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert_eq!(pipeline.predict(&form).unwrap(), expected));
            }
        });
    }

    /// Claims two classes but only reports one probability column.
    struct OneColumnClassifier;

    impl Classifier for OneColumnClassifier {
        fn name(&self) -> &'static str {
            "one_column"
        }

        fn n_features(&self) -> usize {
            2
        }

        fn classes(&self) -> &[i64] {
            &[0, 1]
        }

        fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<i64>, TransformError> {
            Ok(Array1::zeros(x.nrows()))
        }

        fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
            Ok(Array2::ones((x.nrows(), 1)))
        }
    }

    #[test]
    fn single_probability_column_is_prediction_error() {
        let stub: Box<dyn Classifier> = Box::new(OneColumnClassifier);
        let pipeline = RiskPipeline::new(Artifacts::new(Some(stub), Some(scaler()), Some(reducer())));
        assert_eq!(
            pipeline.predict(&reference_applicant()),
            Err(PredictError::Prediction(TransformError::MissingProbability {
                stage: "one_column",
                actual: 1
            }))
        );
    }

    /// Drops every row it is given.
    struct EmptyReducer;

    impl Transformer for EmptyReducer {
        fn name(&self) -> &'static str {
            "empty"
        }

        fn n_features_in(&self) -> usize {
            FEATURE_COUNT
        }

        fn n_features_out(&self) -> usize {
            2
        }

        fn transform(&self, _x: ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
            Ok(Array2::zeros((0, 2)))
        }
    }

    #[test]
    fn empty_stage_output_is_prediction_error() {
        let empty: Box<dyn Transformer> = Box::new(EmptyReducer);
        let pipeline = RiskPipeline::new(Artifacts::new(Some(classifier()), Some(scaler()), Some(empty)));
        assert_eq!(
            pipeline.predict(&reference_applicant()),
            Err(PredictError::Prediction(TransformError::RowCount {
                stage: "empty",
                expected: 1,
                actual: 0
            }))
        );
    }
}
