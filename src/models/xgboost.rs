use serde::Serialize;

use super::{impl_display, Model, Params, Prediction};
use crate::data::Data;
use crate::error::{Error, Result};

/// Gradient boosted trees.
///
/// Only available when the crate is built with the `xgboost` feature;
/// construction fails with [`Error::MissingDependency`] otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XGBoost {
    learning_rate: f64,
    subsample: f64,
    max_depth: usize,
    n_estimators: usize,
    seed: u64,
}

impl XGBoost {
    pub const NAME: &'static str = "xgboost";

    pub fn new(
        learning_rate: f64,
        subsample: f64,
        max_depth: usize,
        n_estimators: usize,
        seed: u64,
    ) -> Result<Self> {
        if !cfg!(feature = "xgboost") {
            return Err(Error::MissingDependency {
                model: Self::NAME,
                feature: "xgboost",
            });
        }
        Ok(Self {
            learning_rate,
            subsample,
            max_depth,
            n_estimators,
            seed,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(0.1, 0.4, 5, 5, 0)
    }
}

impl Model for XGBoost {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn params(&self) -> Params {
        Params::new()
            .with("learning_rate", self.learning_rate)
            .with("subsample", self.subsample)
            .with("max_depth", self.max_depth)
            .with("n_estimators", self.n_estimators)
            .with("seed", self.seed)
    }

    #[cfg(feature = "xgboost")]
    fn fit_predict(&self, dfit: &dyn Data, dpre: &dyn Data) -> Result<Prediction> {
        let booster = crate::estimators::GradientBoosting::new(
            self.learning_rate,
            self.subsample,
            self.max_depth,
            self.n_estimators,
            self.seed,
        );
        super::fit_predict_with(booster, dfit, dpre)
    }

    #[cfg(not(feature = "xgboost"))]
    fn fit_predict(&self, _dfit: &dyn Data, _dpre: &dyn Data) -> Result<Prediction> {
        Err(Error::MissingDependency {
            model: Self::NAME,
            feature: "xgboost",
        })
    }
}

impl_display!(XGBoost);
