use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::{impl_display, Model, Params, Prediction};
use crate::data::Data;
use crate::error::Result;

/// Fast model for testing; always predicts 0.5
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fifty;

impl Fifty {
    pub const NAME: &'static str = "fifty";
}

impl Model for Fifty {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn params(&self) -> Params {
        Params::new()
    }

    fn fit_predict(&self, _dfit: &dyn Data, dpre: &dyn Data) -> Result<Prediction> {
        Prediction::new(dpre.ids().to_vec(), Array1::from_elem(dpre.len(), 0.5))
    }
}

impl_display!(Fifty);
