//! Pre-trained linear classifiers.
//!
//! A classifier maps reduced feature rows to a discrete class and to a
//! probability distribution over its classes, in the order of
//! [`Classifier::classes`].

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{InvalidArtifact, TransformError};
use crate::transform::{check_finite, check_same_len, check_vector, check_width, matrix};

/// A fitted, read-only classifier.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn n_features(&self) -> usize;

    /// Class values, in probability-column order.
    fn classes(&self) -> &[i64];

    /// Most probable class per row.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<i64>, TransformError>;

    /// `n × classes` probability matrix; each row sums to 1.
    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError>;
}

/// Logistic regression with fitted `coef` and `intercept`.
///
/// A single coefficient row is the binary model (sigmoid over the decision
/// value, which is the score of the second class). One row per class is the
/// multinomial model (softmax over the decision values).
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// `rows × n_features`
    coef: Array2<f64>,
    intercept: Array1<f64>,
    classes: Vec<i64>,
}

impl LogisticRegression {
    pub fn new(
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        classes: Vec<i64>,
    ) -> Result<Self, InvalidArtifact> {
        let coef = matrix("coef", coef)?;
        check_vector("intercept", &intercept)?;
        check_same_len("intercept", intercept.len(), "coef", coef.nrows())?;

        if classes.len() < 2 {
            return Err(InvalidArtifact(format!(
                "need at least 2 classes, got {}",
                classes.len()
            )));
        }
        let expected_rows = if classes.len() == 2 { 1 } else { classes.len() };
        if coef.nrows() != expected_rows && coef.nrows() != classes.len() {
            return Err(InvalidArtifact(format!(
                "coef has {} rows, expected {expected_rows} for {} classes",
                coef.nrows(),
                classes.len()
            )));
        }

        Ok(Self {
            coef,
            intercept: Array1::from(intercept),
            classes,
        })
    }

    fn decision_function(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        check_width(self.name(), self.n_features(), &x)?;
        Ok(x.dot(&self.coef.t()) + &self.intercept)
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Binary models follow the sign of the decision value, so a positive
    /// score picks the second class even when its probability rounds to 0.5.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<i64>, TransformError> {
        let scores = check_finite(self.name(), self.decision_function(x)?)?;
        if scores.ncols() == 1 {
            return Ok(scores
                .column(0)
                .iter()
                .map(|&z| self.classes[usize::from(z > 0.0)])
                .collect());
        }
        Ok(scores
            .rows()
            .into_iter()
            .map(|row| self.classes[argmax(row.iter().copied())])
            .collect())
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        let scores = self.decision_function(x)?;

        let proba = if scores.ncols() == 1 {
            let p = scores.column(0).mapv(sigmoid);
            Array2::from_shape_fn((p.len(), 2), |(i, j)| if j == 1 { p[i] } else { 1.0 - p[i] })
        } else {
            let mut scores = scores;
            for mut row in scores.axis_iter_mut(Axis(0)) {
                let max = row.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                row.mapv_inplace(|v| (v - max).exp());
                let sum = row.sum();
                row /= sum;
            }
            scores
        };

        check_finite(self.name(), proba)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Index of the largest value; the first one wins ties.
fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_val = f64::NEG_INFINITY;
    for (i, v) in values.enumerate() {
        if v > best_val {
            best = i;
            best_val = v;
        }
    }
    best
}
