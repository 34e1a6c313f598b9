//! Binary classifiers and feature transforms the model adapters delegate to.
//!
//! Every classifier follows the same two-step contract: `fit` on a feature
//! matrix and 0/1 labels, then `predict_proba` returning an `(n_rows, 2)`
//! matrix whose column 1 is the probability of the positive class.
//!
//! Logistic regression, PCA and the bagged trees of the random forest come
//! from linfa; this module adapts them to the contract and validates inputs
//! before they reach the solvers.

pub mod forest;
pub mod logistic;
pub mod pca;
pub mod pipeline;
pub mod tree;

#[cfg(feature = "xgboost")]
pub mod boosting;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{Error, Result};

#[cfg(feature = "xgboost")]
pub use boosting::GradientBoosting;
pub use forest::Forest;
pub use logistic::LogisticRegression;
pub use pca::Pca;
pub use pipeline::Pipeline;
pub use tree::{ExtraTree, TreeParams};

/// Binary probabilistic classifier
pub trait Classifier {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()>;

    /// Per-class probabilities, columns ordered (class 0, class 1)
    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// Unsupervised feature transform
pub trait Transformer {
    fn fit(&mut self, x: ArrayView2<'_, f64>) -> Result<()>;

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// Reject NaN and infinite features
pub(crate) fn check_finite(x: ArrayView2<'_, f64>) -> Result<()> {
    if let Some(((row, col), v)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(Error::Estimator(format!(
            "x contains a non-finite value ({}) at row {}, column {}",
            v, row, col
        )));
    }
    Ok(())
}

/// Check that `x` and `y` line up, `x` is finite and `y` holds both classes
/// as 0.0/1.0. Returns the labels as booleans.
pub(crate) fn binary_labels(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<Vec<bool>> {
    if x.nrows() != y.len() {
        return Err(Error::Estimator(format!(
            "x has {} rows but y has {} labels",
            x.nrows(),
            y.len()
        )));
    }
    if x.nrows() == 0 {
        return Err(Error::Estimator("cannot fit on an empty dataset".to_string()));
    }
    check_finite(x)?;

    let mut labels = Vec::with_capacity(y.len());
    for &v in y.iter() {
        if v == 1.0 {
            labels.push(true);
        } else if v == 0.0 {
            labels.push(false);
        } else {
            return Err(Error::Estimator(format!("labels must be 0 or 1, found {}", v)));
        }
    }

    let positives = labels.iter().filter(|&&l| l).count();
    if positives == 0 || positives == labels.len() {
        return Err(Error::Estimator(
            "fit data must contain both classes".to_string(),
        ));
    }
    Ok(labels)
}

/// Class indices in the form linfa expects; 1 is the positive class
pub(crate) fn class_indices(labels: &[bool]) -> Array1<usize> {
    labels.iter().map(|&l| usize::from(l)).collect()
}

/// Check that prediction features are finite and have the width the
/// estimator was fit on
pub(crate) fn check_width(x: ArrayView2<'_, f64>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(Error::Estimator(format!(
            "x has {} features but the estimator was fit with {}",
            x.ncols(),
            expected
        )));
    }
    check_finite(x)
}

/// Stack positive-class probabilities into a two-column probability matrix
pub(crate) fn two_column(positive: Array1<f64>) -> Array2<f64> {
    let mut proba = Array2::zeros((positive.len(), 2));
    for (i, &p) in positive.iter().enumerate() {
        proba[[i, 0]] = 1.0 - p;
        proba[[i, 1]] = p;
    }
    proba
}

#[cfg(test)]
pub(crate) mod testing {
    use ndarray::{Array1, Array2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Two features; label is 1 when x0 + x1 > 1, with `noise` label flips
    pub fn diagonal(rows: usize, noise: f64, seed: u64) -> (Array2<f64>, Array1<f64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut x = Array2::zeros((rows, 2));
        let mut y = Array1::zeros(rows);
        for i in 0..rows {
            let a: f64 = rng.gen();
            let b: f64 = rng.gen();
            x[[i, 0]] = a;
            x[[i, 1]] = b;
            let mut label = a + b > 1.0;
            if rng.gen::<f64>() < noise {
                label = !label;
            }
            y[i] = if label { 1.0 } else { 0.0 };
        }
        (x, y)
    }
}
