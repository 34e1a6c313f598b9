//! Model adapters.
//!
//! An adapter wraps one estimator behind a uniform contract: `fit_predict`
//! trains a fresh estimator on the fit data and returns the predict data's
//! ids alongside one positive-class score per row, in the same order.
//! Adapters hold only their parameters, so one instance can be reused across
//! any number of runs.

pub mod fifty;
pub mod fingerprint;
pub mod linear;
pub mod params;
pub mod trees;
pub mod xgboost;

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use tracing::{debug, info};

use crate::data::Data;
use crate::error::{Error, Result};
use crate::estimators::Classifier;

pub use fifty::Fifty;
pub use fingerprint::Fingerprint;
pub use linear::{Logistic, LogisticPca};
pub use params::{describe, ParamValue, Params};
pub use trees::{ExtraTrees, RandomForest};
pub use xgboost::XGBoost;

/// Ids of the predict data and one score per id
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub ids: Vec<String>,
    pub yhat: Array1<f64>,
}

impl Prediction {
    pub fn new(ids: Vec<String>, yhat: Array1<f64>) -> Result<Self> {
        if ids.len() != yhat.len() {
            return Err(Error::Shape(format!(
                "{} ids but {} predictions",
                ids.len(),
                yhat.len()
            )));
        }
        Ok(Self { ids, yhat })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.ids.iter().map(String::as_str).zip(self.yhat.iter().copied())
    }
}

/// Uniform training/prediction contract over one estimator
pub trait Model: fmt::Display + Send + Sync {
    /// Adapter type name, part of the fingerprint
    fn name(&self) -> &'static str;

    fn params(&self) -> Params;

    /// Train on `dfit`, then score every row of `dpre` in its native order
    fn fit_predict(&self, dfit: &dyn Data, dpre: &dyn Data) -> Result<Prediction>;

    /// Fingerprint of this model run; see [`Fingerprint`] for the layout
    fn hash(&self, dfit: &dyn Data, dpre: &dyn Data) -> Fingerprint {
        Fingerprint::combine(&dfit.hash(), &dpre.hash(), self.name(), &self.params())
    }

    fn describe(&self) -> String {
        describe(self.name(), &self.params())
    }
}

/// Fit `classifier` on `dfit` and return the positive-class column for `dpre`
pub(crate) fn fit_predict_with<C: Classifier>(
    mut classifier: C,
    dfit: &dyn Data,
    dpre: &dyn Data,
) -> Result<Prediction> {
    classifier.fit(dfit.x(), dfit.y())?;
    let proba = classifier.predict_proba(dpre.x())?;
    Prediction::new(dpre.ids().to_vec(), proba.column(1).to_owned())
}

macro_rules! impl_display {
    ($($model:ty),+ $(,)?) => {
        $(
            impl std::fmt::Display for $model {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&$crate::models::Model::describe(self))
                }
            }
        )+
    };
}
pub(crate) use impl_display;

/// Every adapter, selectable by name
#[derive(Debug, Clone)]
pub enum ModelKind {
    Logistic(Logistic),
    ExtraTrees(ExtraTrees),
    RandomForest(RandomForest),
    XGBoost(XGBoost),
    LogisticPca(LogisticPca),
    Fifty(Fifty),
}

impl ModelKind {
    pub const NAMES: [&'static str; 6] = [
        Logistic::NAME,
        ExtraTrees::NAME,
        RandomForest::NAME,
        XGBoost::NAME,
        LogisticPca::NAME,
        Fifty::NAME,
    ];

    fn inner(&self) -> &dyn Model {
        match self {
            ModelKind::Logistic(m) => m,
            ModelKind::ExtraTrees(m) => m,
            ModelKind::RandomForest(m) => m,
            ModelKind::XGBoost(m) => m,
            ModelKind::LogisticPca(m) => m,
            ModelKind::Fifty(m) => m,
        }
    }

    /// Run the adapter and log what ran on which data
    pub fn run(&self, dfit: &dyn Data, dpre: &dyn Data) -> Result<(Prediction, Fingerprint)> {
        let fingerprint = self.hash(dfit, dpre);
        info!("Running {} [{}]", self, &fingerprint.to_hex()[..12]);
        debug!("fit rows={}, predict rows={}", dfit.len(), dpre.len());
        let prediction = self.fit_predict(dfit, dpre)?;
        Ok((prediction, fingerprint))
    }
}

impl Model for ModelKind {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn params(&self) -> Params {
        self.inner().params()
    }

    fn fit_predict(&self, dfit: &dyn Data, dpre: &dyn Data) -> Result<Prediction> {
        self.inner().fit_predict(dfit, dpre)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    /// Adapter with default parameters
    fn from_str(s: &str) -> Result<Self> {
        match s {
            Logistic::NAME => Ok(ModelKind::Logistic(Logistic::default())),
            ExtraTrees::NAME => Ok(ModelKind::ExtraTrees(ExtraTrees::default())),
            RandomForest::NAME => Ok(ModelKind::RandomForest(RandomForest::default())),
            XGBoost::NAME => Ok(ModelKind::XGBoost(XGBoost::with_defaults()?)),
            LogisticPca::NAME => Ok(ModelKind::LogisticPca(LogisticPca::default())),
            Fifty::NAME => Ok(ModelKind::Fifty(Fifty)),
            _ => Err(Error::UnknownModel(s.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::data::{Data, Dataset, SyntheticSpec};

    /// Learnable fit/predict pair with enough features for every adapter default
    pub fn pair() -> (Dataset, Dataset) {
        let spec = SyntheticSpec {
            n_features: 12,
            signal: 8.0,
            seed: 42,
        };
        spec.pair(400, 150).unwrap()
    }

    /// Copy of `data` with `value` written into the given cells
    pub fn with_values(data: &Dataset, cells: &[(usize, usize)], value: f64) -> Dataset {
        let mut x = data.x().to_owned();
        for &cell in cells {
            x[cell] = value;
        }
        Dataset::new(data.ids().to_vec(), x, data.y().to_owned()).unwrap()
    }
}
