//! Fitted feature transforms: scalers and PCA.
//!
//! Each transform holds parameters fitted offline and maps an `n × in` matrix
//! to an `n × out` matrix. Parameters are validated once at construction;
//! `transform` only checks the input width and the finiteness of the output.

use ndarray::{Array1, Array2, ArrayView2};

use crate::error::{InvalidArtifact, TransformError};

/// A fitted, read-only feature transform.
pub trait Transformer: Send + Sync {
    /// Short stage name used in errors and logs.
    fn name(&self) -> &'static str;

    fn n_features_in(&self) -> usize;

    fn n_features_out(&self) -> usize;

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError>;
}

/// Standardization: `(x - mean) / scale`.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, InvalidArtifact> {
        check_vector("mean", &mean)?;
        check_vector("scale", &scale)?;
        check_same_len("mean", mean.len(), "scale", scale.len())?;
        if scale.contains(&0.0) {
            return Err(InvalidArtifact("scale contains a zero entry".into()));
        }
        Ok(Self {
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        })
    }
}

impl Transformer for StandardScaler {
    fn name(&self) -> &'static str {
        "standard_scaler"
    }

    fn n_features_in(&self) -> usize {
        self.mean.len()
    }

    fn n_features_out(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        check_width(self.name(), self.n_features_in(), &x)?;
        let out = (&x - &self.mean) / &self.scale;
        check_finite(self.name(), out)
    }
}

/// Min-max scaling with fitted `min` offset and `scale` factor: `x * scale + min`.
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    min: Array1<f64>,
    scale: Array1<f64>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Result<Self, InvalidArtifact> {
        check_vector("min", &min)?;
        check_vector("scale", &scale)?;
        check_same_len("min", min.len(), "scale", scale.len())?;
        Ok(Self {
            min: Array1::from(min),
            scale: Array1::from(scale),
        })
    }
}

impl Transformer for MinMaxScaler {
    fn name(&self) -> &'static str {
        "min_max_scaler"
    }

    fn n_features_in(&self) -> usize {
        self.min.len()
    }

    fn n_features_out(&self) -> usize {
        self.min.len()
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        check_width(self.name(), self.n_features_in(), &x)?;
        let out = &x * &self.scale + &self.min;
        check_finite(self.name(), out)
    }
}

/// Principal component projection: `(x - mean) · componentsᵀ`.
///
/// With whitening, each component is additionally divided by the square root
/// of its explained variance.
#[derive(Debug, Clone)]
pub struct Pca {
    mean: Array1<f64>,
    /// `k × n`, one principal axis per row.
    components: Array2<f64>,
    whiten: Option<Array1<f64>>,
}

impl Pca {
    pub fn new(
        mean: Vec<f64>,
        components: Vec<Vec<f64>>,
        explained_variance: Option<Vec<f64>>,
        whiten: bool,
    ) -> Result<Self, InvalidArtifact> {
        check_vector("mean", &mean)?;
        let components = matrix("components", components)?;
        check_same_len("mean", mean.len(), "component row", components.ncols())?;

        let whiten = if whiten {
            let variance = explained_variance.ok_or_else(|| {
                InvalidArtifact("whiten is set but explained_variance is missing".into())
            })?;
            check_vector("explained_variance", &variance)?;
            check_same_len(
                "explained_variance",
                variance.len(),
                "components",
                components.nrows(),
            )?;
            if variance.iter().any(|&v| v <= 0.0) {
                return Err(InvalidArtifact(
                    "explained_variance must be positive to whiten".into(),
                ));
            }
            Some(Array1::from(variance).mapv(f64::sqrt))
        } else {
            None
        };

        Ok(Self {
            mean: Array1::from(mean),
            components,
            whiten,
        })
    }
}

impl Transformer for Pca {
    fn name(&self) -> &'static str {
        "pca"
    }

    fn n_features_in(&self) -> usize {
        self.components.ncols()
    }

    fn n_features_out(&self) -> usize {
        self.components.nrows()
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        check_width(self.name(), self.n_features_in(), &x)?;
        let mut out = (&x - &self.mean).dot(&self.components.t());
        if let Some(std) = &self.whiten {
            out /= std;
        }
        check_finite(self.name(), out)
    }
}

// ── Validation helpers ──

pub(crate) fn check_vector(name: &str, v: &[f64]) -> Result<(), InvalidArtifact> {
    if v.is_empty() {
        return Err(InvalidArtifact(format!("{name} is empty")));
    }
    if !v.iter().all(|x| x.is_finite()) {
        return Err(InvalidArtifact(format!("{name} contains a non-finite value")));
    }
    Ok(())
}

pub(crate) fn check_same_len(
    a: &str,
    a_len: usize,
    b: &str,
    b_len: usize,
) -> Result<(), InvalidArtifact> {
    if a_len != b_len {
        return Err(InvalidArtifact(format!(
            "{a} has length {a_len} but {b} has length {b_len}"
        )));
    }
    Ok(())
}

/// Build a dense matrix from rows, rejecting ragged or empty input.
pub(crate) fn matrix(name: &str, rows: Vec<Vec<f64>>) -> Result<Array2<f64>, InvalidArtifact> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if n_rows == 0 || n_cols == 0 {
        return Err(InvalidArtifact(format!("{name} is empty")));
    }
    if let Some(i) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(InvalidArtifact(format!(
            "{name} row {i} has length {}, expected {n_cols}",
            rows[i].len()
        )));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    check_vector(name, &flat)?;
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| InvalidArtifact(format!("{name}: {e}")))
}

pub(crate) fn check_width(
    stage: &'static str,
    expected: usize,
    x: &ArrayView2<'_, f64>,
) -> Result<(), TransformError> {
    if x.ncols() != expected {
        return Err(TransformError::ShapeMismatch {
            stage,
            expected,
            actual: x.ncols(),
        });
    }
    Ok(())
}

pub(crate) fn check_finite(
    stage: &'static str,
    out: Array2<f64>,
) -> Result<Array2<f64>, TransformError> {
    if out.iter().all(|v| v.is_finite()) {
        Ok(out)
    } else {
        Err(TransformError::NonFinite { stage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(actual: &Array2<f64>, expected: &Array2<f64>) {
        assert_eq!(actual.shape(), expected.shape());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-9, "got {actual:?}, expected {expected:?}");
        }
    }

    #[test]
    fn standard_scaler_centres_and_scales() {
        let s = StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]).unwrap();
        let out = s.transform(array![[3.0, 0.0]].view()).unwrap();
        assert_close(&out, &array![[1.0, -2.0]]);
    }

    #[test]
    fn standard_scaler_rejects_zero_scale() {
        let err = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 0.0]).unwrap_err();
        assert!(err.0.contains("zero"));
    }

    #[test]
    fn standard_scaler_rejects_length_mismatch() {
        assert!(StandardScaler::new(vec![0.0, 0.0], vec![1.0]).is_err());
        assert!(StandardScaler::new(vec![], vec![]).is_err());
    }

    #[test]
    fn standard_scaler_checks_width() {
        let s = StandardScaler::new(vec![0.0; 3], vec![1.0; 3]).unwrap();
        let err = s.transform(array![[1.0, 2.0]].view()).unwrap_err();
        assert_eq!(
            err,
            TransformError::ShapeMismatch {
                stage: "standard_scaler",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn min_max_scaler_applies_offset() {
        let s = MinMaxScaler::new(vec![-1.0, 0.0], vec![0.5, 0.1]).unwrap();
        let out = s.transform(array![[4.0, 20.0]].view()).unwrap();
        assert_close(&out, &array![[1.0, 2.0]]);
    }

    #[test]
    fn pca_projects_onto_components() {
        let pca = Pca::new(
            vec![1.0, 1.0, 1.0],
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]],
            None,
            false,
        )
        .unwrap();
        assert_eq!(pca.n_features_in(), 3);
        assert_eq!(pca.n_features_out(), 2);

        let out = pca.transform(array![[3.0, 7.0, -1.0]].view()).unwrap();
        assert_close(&out, &array![[2.0, -2.0]]);
    }

    #[test]
    fn pca_whitening_divides_by_std() {
        let pca = Pca::new(
            vec![0.0, 0.0],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            Some(vec![4.0, 9.0]),
            true,
        )
        .unwrap();
        let out = pca.transform(array![[2.0, 3.0]].view()).unwrap();
        assert_close(&out, &array![[1.0, 1.0]]);
    }

    #[test]
    fn pca_whitening_requires_variance() {
        let err = Pca::new(vec![0.0], vec![vec![1.0]], None, true).unwrap_err();
        assert!(err.0.contains("explained_variance"));
    }

    #[test]
    fn pca_rejects_ragged_components() {
        let err = Pca::new(vec![0.0, 0.0], vec![vec![1.0, 0.0], vec![1.0]], None, false)
            .unwrap_err();
        assert!(err.0.contains("row 1"));
    }

    #[test]
    fn pca_rejects_mean_width_mismatch() {
        assert!(Pca::new(vec![0.0; 3], vec![vec![1.0, 0.0]], None, false).is_err());
    }

    #[test]
    fn non_finite_output_is_reported() {
        let s = StandardScaler::new(vec![0.0], vec![1e-300]).unwrap();
        let err = s.transform(array![[1e300]].view()).unwrap_err();
        assert_eq!(err, TransformError::NonFinite { stage: "standard_scaler" });
    }
}
