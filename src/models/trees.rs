use serde::{Deserialize, Serialize};

use super::{fit_predict_with, impl_display, Model, Params, Prediction};
use crate::data::Data;
use crate::error::Result;
use crate::estimators::Forest;

/// Extremely randomized trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraTrees {
    pub ntrees: usize,
    pub depth: usize,
    /// Features considered per split
    pub nfeatures: usize,
    pub seed: u64,
}

impl ExtraTrees {
    pub const NAME: &'static str = "extratrees";

    pub fn new(ntrees: usize, depth: usize, nfeatures: usize, seed: u64) -> Self {
        Self {
            ntrees,
            depth,
            nfeatures,
            seed,
        }
    }
}

impl Default for ExtraTrees {
    fn default() -> Self {
        Self::new(100, 3, 7, 0)
    }
}

impl Model for ExtraTrees {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn params(&self) -> Params {
        Params::new()
            .with("ntrees", self.ntrees)
            .with("depth", self.depth)
            .with("nfeatures", self.nfeatures)
            .with("seed", self.seed)
    }

    fn fit_predict(&self, dfit: &dyn Data, dpre: &dyn Data) -> Result<Prediction> {
        let forest = Forest::extra_trees(self.ntrees, Some(self.depth), self.nfeatures, self.seed);
        fit_predict_with(forest, dfit, dpre)
    }
}

/// Random forest of bootstrapped gini trees, each on a random feature subspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForest {
    pub ntrees: usize,
    pub depth: usize,
    pub max_features: usize,
    pub seed: u64,
}

impl RandomForest {
    pub const NAME: &'static str = "randomforest";

    pub fn new(ntrees: usize, depth: usize, max_features: usize, seed: u64) -> Self {
        Self {
            ntrees,
            depth,
            max_features,
            seed,
        }
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100, 3, 2, 0)
    }
}

impl Model for RandomForest {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn params(&self) -> Params {
        Params::new()
            .with("ntrees", self.ntrees)
            .with("depth", self.depth)
            .with("max_features", self.max_features)
            .with("seed", self.seed)
    }

    fn fit_predict(&self, dfit: &dyn Data, dpre: &dyn Data) -> Result<Prediction> {
        let forest = Forest::random_forest(self.ntrees, Some(self.depth), self.max_features, self.seed);
        fit_predict_with(forest, dfit, dpre)
    }
}

impl_display!(ExtraTrees, RandomForest);
