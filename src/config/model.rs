use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ExtraTrees, Fifty, Logistic, LogisticPca, ModelKind, RandomForest, XGBoost};

/// Boosting parameters as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XGBoostSettings {
    pub learning_rate: f64,
    pub subsample: f64,
    pub max_depth: usize,
    pub n_estimators: usize,
    pub seed: u64,
}

impl Default for XGBoostSettings {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            subsample: 0.4,
            max_depth: 5,
            n_estimators: 5,
            seed: 0,
        }
    }
}

/// `[model]` table: `kind` picks the adapter, remaining keys are its params
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ModelConfig {
    #[serde(rename = "logistic")]
    Logistic(Logistic),
    #[serde(rename = "extratrees")]
    ExtraTrees(ExtraTrees),
    #[serde(rename = "randomforest")]
    RandomForest(RandomForest),
    #[serde(rename = "xgboost")]
    XGBoost(XGBoostSettings),
    #[serde(rename = "logistic_pca")]
    LogisticPca(LogisticPca),
    #[serde(rename = "fifty")]
    Fifty,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::ExtraTrees(ExtraTrees::default())
    }
}

impl ModelConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelConfig::Logistic(_) => Logistic::NAME,
            ModelConfig::ExtraTrees(_) => ExtraTrees::NAME,
            ModelConfig::RandomForest(_) => RandomForest::NAME,
            ModelConfig::XGBoost(_) => XGBoost::NAME,
            ModelConfig::LogisticPca(_) => LogisticPca::NAME,
            ModelConfig::Fifty => Fifty::NAME,
        }
    }

    /// Build the adapter; fails only for adapters missing from this build
    pub fn build(&self) -> Result<ModelKind> {
        Ok(match self {
            ModelConfig::Logistic(m) => ModelKind::Logistic(m.clone()),
            ModelConfig::ExtraTrees(m) => ModelKind::ExtraTrees(m.clone()),
            ModelConfig::RandomForest(m) => ModelKind::RandomForest(m.clone()),
            ModelConfig::XGBoost(s) => ModelKind::XGBoost(XGBoost::new(
                s.learning_rate,
                s.subsample,
                s.max_depth,
                s.n_estimators,
                s.seed,
            )?),
            ModelConfig::LogisticPca(m) => ModelKind::LogisticPca(m.clone()),
            ModelConfig::Fifty => ModelKind::Fifty(Fifty),
        })
    }

    /// Collect every parameter problem for data with `n_features` columns
    pub fn validate(&self, n_features: usize, errors: &mut Vec<String>) {
        match self {
            ModelConfig::Logistic(m) => {
                if m.inverse_l2 <= 0.0 {
                    errors.push("logistic: inverse_l2 must be > 0".to_string());
                }
            }
            ModelConfig::ExtraTrees(m) => {
                if m.ntrees == 0 {
                    errors.push("extratrees: ntrees must be > 0".to_string());
                }
                if m.nfeatures == 0 || m.nfeatures > n_features {
                    errors.push(format!("extratrees: nfeatures must be between 1 and {}", n_features));
                }
            }
            ModelConfig::RandomForest(m) => {
                if m.ntrees == 0 {
                    errors.push("randomforest: ntrees must be > 0".to_string());
                }
                if m.max_features == 0 || m.max_features > n_features {
                    errors.push(format!(
                        "randomforest: max_features must be between 1 and {}",
                        n_features
                    ));
                }
            }
            ModelConfig::XGBoost(s) => {
                if s.learning_rate <= 0.0 {
                    errors.push("xgboost: learning_rate must be > 0".to_string());
                }
                if s.subsample <= 0.0 || s.subsample > 1.0 {
                    errors.push("xgboost: subsample must be in (0, 1]".to_string());
                }
            }
            ModelConfig::LogisticPca(m) => {
                if m.inverse_l2 <= 0.0 {
                    errors.push("logistic_pca: inverse_l2 must be > 0".to_string());
                }
                if m.nfeatures == 0 || m.nfeatures > n_features {
                    errors.push(format!(
                        "logistic_pca: nfeatures must be between 1 and {}",
                        n_features
                    ));
                }
            }
            ModelConfig::Fifty => {}
        }
    }
}
