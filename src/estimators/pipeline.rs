use ndarray::{Array2, ArrayView1, ArrayView2};

use super::{Classifier, Transformer};
use crate::error::Result;

/// Feature transform followed by a classifier, fit and applied as one
#[derive(Debug, Clone)]
pub struct Pipeline<T, C> {
    transform: T,
    classifier: C,
}

impl<T: Transformer, C: Classifier> Pipeline<T, C> {
    pub fn new(transform: T, classifier: C) -> Self {
        Self {
            transform,
            classifier,
        }
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl<T: Transformer, C: Classifier> Classifier for Pipeline<T, C> {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        self.transform.fit(x)?;
        let projected = self.transform.transform(x)?;
        self.classifier.fit(projected.view(), y)
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let projected = self.transform.transform(x)?;
        self.classifier.predict_proba(projected.view())
    }
}
