use serde::{Deserialize, Serialize};

use super::{fit_predict_with, impl_display, Model, Params, Prediction};
use crate::data::Data;
use crate::error::Result;
use crate::estimators::{LogisticRegression, Pca, Pipeline};

/// Logistic regression baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logistic {
    /// Inverse of the L2 regularization strength
    pub inverse_l2: f64,
}

impl Logistic {
    pub const NAME: &'static str = "logistic";

    pub fn new(inverse_l2: f64) -> Self {
        Self { inverse_l2 }
    }
}

impl Default for Logistic {
    fn default() -> Self {
        Self::new(0.0001)
    }
}

impl Model for Logistic {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn params(&self) -> Params {
        Params::new().with("inverse_l2", self.inverse_l2)
    }

    fn fit_predict(&self, dfit: &dyn Data, dpre: &dyn Data) -> Result<Prediction> {
        fit_predict_with(LogisticRegression::new(self.inverse_l2), dfit, dpre)
    }
}

/// PCA projection followed by logistic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticPca {
    /// Number of principal components kept
    pub nfeatures: usize,
    pub inverse_l2: f64,
}

impl LogisticPca {
    pub const NAME: &'static str = "logistic_pca";

    pub fn new(nfeatures: usize, inverse_l2: f64) -> Self {
        Self {
            nfeatures,
            inverse_l2,
        }
    }
}

impl Default for LogisticPca {
    fn default() -> Self {
        Self::new(10, 1e-4)
    }
}

impl Model for LogisticPca {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn params(&self) -> Params {
        Params::new()
            .with("inverse_l2", self.inverse_l2)
            .with("nfeatures", self.nfeatures)
    }

    fn fit_predict(&self, dfit: &dyn Data, dpre: &dyn Data) -> Result<Prediction> {
        let pipe = Pipeline::new(
            Pca::new(self.nfeatures),
            LogisticRegression::new(self.inverse_l2),
        );
        fit_predict_with(pipe, dfit, dpre)
    }
}

impl_display!(Logistic, LogisticPca);
