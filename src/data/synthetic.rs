use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Dataset;
use crate::error::Result;

/// Seeded generator of binary classification data with features in [0, 1).
///
/// Labels follow a logistic model over centered features, so `signal`
/// controls how learnable the data is (0.0 gives coin flips).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticSpec {
    pub n_features: usize,
    pub signal: f64,
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            n_features: 20,
            signal: 4.0,
            seed: 0,
        }
    }
}

impl SyntheticSpec {
    /// Fit and predict datasets drawn from the same underlying model
    pub fn pair(&self, fit_rows: usize, predict_rows: usize) -> Result<(Dataset, Dataset)> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let weights: Vec<f64> = (0..self.n_features)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();

        let dfit = self.draw(&mut rng, &weights, 0, fit_rows)?;
        let dpre = self.draw(&mut rng, &weights, fit_rows, predict_rows)?;
        debug!(
            "Synthetic data: {} fit rows, {} predict rows, {} features",
            fit_rows, predict_rows, self.n_features
        );
        Ok((dfit, dpre))
    }

    fn draw(&self, rng: &mut StdRng, weights: &[f64], offset: usize, rows: usize) -> Result<Dataset> {
        let mut x = Array2::<f64>::zeros((rows, self.n_features));
        let mut y = Array1::<f64>::zeros(rows);
        let mut ids = Vec::with_capacity(rows);

        for i in 0..rows {
            let mut z = 0.0;
            for j in 0..self.n_features {
                let v: f64 = rng.gen();
                x[[i, j]] = v;
                z += weights[j] * (v - 0.5);
            }
            let p = 1.0 / (1.0 + (-self.signal * z).exp());
            y[i] = if rng.gen::<f64>() < p { 1.0 } else { 0.0 };
            ids.push(format!("n{:07}", offset + i));
        }

        Dataset::new(ids, x, y)
    }
}
