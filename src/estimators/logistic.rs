use linfa::traits::Fit;
use linfa::DatasetBase;
use linfa_logistic::FittedLogisticRegression;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::debug;

use super::{binary_labels, check_width, class_indices, two_column, Classifier};
use crate::error::{Error, Result};

/// L2-regularized logistic regression backed by `linfa-logistic`.
///
/// `c` is the inverse regularization strength: the solver minimizes
/// `sum(logloss) + ||w||^2 / (2 * c)` with an unpenalized intercept.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    c: f64,
    max_iter: u64,
    fitted: Option<FittedLogisticRegression<f64, usize>>,
}

impl LogisticRegression {
    pub fn new(c: f64) -> Self {
        Self {
            c,
            max_iter: 100,
            fitted: None,
        }
    }

    pub fn with_max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn coefficients(&self) -> Option<(&Array1<f64>, f64)> {
        self.fitted.as_ref().map(|m| (m.params(), m.intercept()))
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(Error::Estimator(format!(
                "inverse regularization strength must be positive, got {}",
                self.c
            )));
        }
        let labels = binary_labels(x, y)?;
        let dataset = DatasetBase::new(x.to_owned(), class_indices(&labels));

        let fitted = linfa_logistic::LogisticRegression::default()
            .alpha(1.0 / self.c)
            .max_iterations(self.max_iter)
            .fit(&dataset)
            .map_err(|e| Error::Estimator(e.to_string()))?;
        debug!(
            "Logistic regression fit on {} rows x {} features (alpha={})",
            x.nrows(),
            x.ncols(),
            1.0 / self.c
        );

        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or(Error::NotFitted("LogisticRegression"))?;
        check_width(x, fitted.params().len())?;
        // linfa reports the probability of the larger class label, here 1
        Ok(two_column(fitted.predict_probabilities(&x)))
    }
}
