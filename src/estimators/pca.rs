use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use ndarray::{Array2, ArrayView2};
use tracing::debug;

use super::{check_finite, check_width, Transformer};
use crate::error::{Error, Result};

/// Principal component analysis backed by `linfa-reduction`
#[derive(Debug, Clone)]
pub struct Pca {
    n_components: usize,
    n_features: usize,
    fitted: Option<linfa_reduction::Pca<f64>>,
}

impl Pca {
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            n_features: 0,
            fitted: None,
        }
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }
}

impl Transformer for Pca {
    fn fit(&mut self, x: ArrayView2<'_, f64>) -> Result<()> {
        let (n, d) = x.dim();
        if self.n_components == 0 || self.n_components > d {
            return Err(Error::Estimator(format!(
                "n_components must be in 1..={}, got {}",
                d, self.n_components
            )));
        }
        if n < 2 {
            return Err(Error::Estimator("PCA needs at least two rows".to_string()));
        }
        check_finite(x)?;

        let dataset = DatasetBase::from(x.to_owned());
        let fitted = linfa_reduction::Pca::<f64>::params(self.n_components)
            .fit(&dataset)
            .map_err(|e| Error::Estimator(e.to_string()))?;
        debug!("PCA fit: {} -> {} dimensions", d, self.n_components);

        self.n_features = d;
        self.fitted = Some(fitted);
        Ok(())
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted("Pca"))?;
        check_width(x, self.n_features)?;
        let projected: Array2<f64> = fitted.predict(&x);
        Ok(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};

    #[test]
    fn test_output_shape_and_variance_order() {
        let (x, _) = crate::estimators::testing::diagonal(100, 0.0, 1);
        let mut pca = Pca::new(2);
        pca.fit(x.view()).unwrap();

        let projected = pca.transform(x.view()).unwrap();
        assert_eq!(projected.dim(), (100, 2));
        let var = projected.var_axis(Axis(0), 1.0);
        assert!(var[0] >= var[1]);
    }

    #[test]
    fn test_first_component_follows_spread() {
        // points on the line y = x with tiny noise across it
        let x = array![[0.0, 0.0], [1.0, 1.01], [2.0, 1.99], [3.0, 3.0], [4.0, 4.01]];
        let mut pca = Pca::new(1);
        pca.fit(x.view()).unwrap();

        let projected = pca.transform(x.view()).unwrap();
        assert_eq!(projected.dim(), (5, 1));
        // the sign of a component is arbitrary; the ordering along it is not
        let col = projected.column(0);
        let increasing = col.windows(2).into_iter().all(|w| w[0] < w[1]);
        let decreasing = col.windows(2).into_iter().all(|w| w[0] > w[1]);
        assert!(increasing || decreasing);
        // distance along the line is preserved
        assert!(((col[4] - col[0]).abs() - 32f64.sqrt()).abs() < 0.05);
    }

    #[test]
    fn test_transform_is_centered() {
        let (x, _) = crate::estimators::testing::diagonal(60, 0.0, 2);
        let mut pca = Pca::new(2);
        pca.fit(x.view()).unwrap();
        let projected = pca.transform(x.view()).unwrap();
        for mean in projected.mean_axis(Axis(0)).unwrap().iter() {
            assert!(mean.abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_components() {
        let x = array![[0.0, 1.0], [1.0, 0.0]];
        assert!(Pca::new(3).fit(x.view()).is_err());
        assert!(Pca::new(0).fit(x.view()).is_err());
        assert!(matches!(Pca::new(1).transform(x.view()), Err(Error::NotFitted(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let x = array![[0.0, 1.0], [f64::INFINITY, 0.0], [2.0, 2.0]];
        assert!(matches!(Pca::new(1).fit(x.view()), Err(Error::Estimator(_))));

        let (good, _) = crate::estimators::testing::diagonal(20, 0.0, 3);
        let mut pca = Pca::new(1);
        pca.fit(good.view()).unwrap();
        assert!(pca.transform(array![[f64::NAN, 0.5]].view()).is_err());
    }
}
