use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{binary_labels, check_width, two_column, Classifier};
use crate::error::{Error, Result};

const HESS_MIN: f64 = 1e-16;

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        weight: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Regression tree fit on gradient statistics
#[derive(Debug, Clone)]
struct BoostedTree {
    nodes: Vec<Node>,
}

impl BoostedTree {
    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { weight } => return *weight,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

struct GrowContext<'x, 'g> {
    x: ArrayView2<'x, f64>,
    grad: &'g [f64],
    hess: &'g [f64],
    max_depth: usize,
    lambda: f64,
    min_child_weight: f64,
}

impl GrowContext<'_, '_> {
    fn leaf_weight(&self, g: f64, h: f64) -> f64 {
        -g / (h + self.lambda)
    }

    fn score(&self, g: f64, h: f64) -> f64 {
        g * g / (h + self.lambda)
    }

    fn grow(&self, nodes: &mut Vec<Node>, rows: Vec<usize>, depth: usize) -> usize {
        let g: f64 = rows.iter().map(|&r| self.grad[r]).sum();
        let h: f64 = rows.iter().map(|&r| self.hess[r]).sum();
        let node_id = nodes.len();
        nodes.push(Node::Leaf {
            weight: self.leaf_weight(g, h),
        });

        if depth >= self.max_depth || rows.len() < 2 {
            return node_id;
        }

        let parent = self.score(g, h);
        let mut best: Option<(usize, f64, f64)> = None;

        for feature in 0..self.x.ncols() {
            let mut sorted: Vec<usize> = rows.clone();
            sorted.sort_by(|&a, &b| self.x[[a, feature]].total_cmp(&self.x[[b, feature]]));

            let (mut gl, mut hl) = (0.0, 0.0);
            for i in 0..sorted.len() - 1 {
                let r = sorted[i];
                gl += self.grad[r];
                hl += self.hess[r];
                let (lo, hi) = (self.x[[r, feature]], self.x[[sorted[i + 1], feature]]);
                if lo == hi {
                    continue;
                }
                let (gr, hr) = (g - gl, h - hl);
                if hl < self.min_child_weight || hr < self.min_child_weight {
                    continue;
                }
                let gain = 0.5 * (self.score(gl, hl) + self.score(gr, hr) - parent);
                if gain > 0.0 && best.map_or(true, |(_, _, b)| gain > b) {
                    let mid = lo / 2.0 + hi / 2.0;
                    let threshold = if mid < hi { mid } else { lo };
                    best = Some((feature, threshold, gain));
                }
            }
        }

        let Some((feature, threshold, _)) = best else {
            return node_id;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.x[[r, feature]] <= threshold);
        let left = self.grow(nodes, left_rows, depth + 1);
        let right = self.grow(nodes, right_rows, depth + 1);
        nodes[node_id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        node_id
    }
}

/// Second-order gradient boosting of regression trees on the logistic loss.
///
/// Each round fits one tree to the gradient/hessian of the current margins
/// on a Bernoulli subsample of rows; split gain and leaf weights use an L2
/// penalty `lambda` on leaf weights.
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    learning_rate: f64,
    subsample: f64,
    max_depth: usize,
    n_estimators: usize,
    seed: u64,
    lambda: f64,
    min_child_weight: f64,
    fitted: Option<(Vec<BoostedTree>, usize)>,
}

impl GradientBoosting {
    pub fn new(learning_rate: f64, subsample: f64, max_depth: usize, n_estimators: usize, seed: u64) -> Self {
        Self {
            learning_rate,
            subsample,
            max_depth,
            n_estimators,
            seed,
            lambda: 1.0,
            min_child_weight: 1.0,
            fitted: None,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.fitted.as_ref().map_or(0, |(trees, _)| trees.len())
    }

    fn margins(&self, trees: &[BoostedTree], x: ArrayView2<'_, f64>) -> Array1<f64> {
        Array1::from_iter(x.rows().into_iter().map(|row| {
            trees
                .iter()
                .map(|tree| self.learning_rate * tree.predict_row(row))
                .sum::<f64>()
        }))
    }
}

impl Classifier for GradientBoosting {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(Error::Estimator(format!(
                "subsample must be in (0, 1], got {}",
                self.subsample
            )));
        }
        let labels = binary_labels(x, y)?;
        let n = x.nrows();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut margin = Array1::<f64>::zeros(n);
        let mut grad = vec![0.0; n];
        let mut hess = vec![0.0; n];
        let mut trees = Vec::with_capacity(self.n_estimators);

        for round in 0..self.n_estimators {
            for i in 0..n {
                let p = sigmoid(margin[i]);
                grad[i] = p - if labels[i] { 1.0 } else { 0.0 };
                hess[i] = (p * (1.0 - p)).max(HESS_MIN);
            }

            let rows: Vec<usize> = if self.subsample < 1.0 {
                (0..n).filter(|_| rng.gen::<f64>() < self.subsample).collect()
            } else {
                (0..n).collect()
            };
            if rows.is_empty() {
                debug!("Boosting round {} drew an empty subsample", round);
                continue;
            }

            let ctx = GrowContext {
                x,
                grad: &grad,
                hess: &hess,
                max_depth: self.max_depth,
                lambda: self.lambda,
                min_child_weight: self.min_child_weight,
            };
            let mut nodes = Vec::new();
            ctx.grow(&mut nodes, rows, 0);
            let tree = BoostedTree { nodes };

            for (i, row) in x.rows().into_iter().enumerate() {
                margin[i] += self.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        debug!(
            "Gradient boosting fit: {} trees on {} rows x {} features",
            trees.len(),
            n,
            x.ncols()
        );
        self.fitted = Some((trees, x.ncols()));
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let (trees, n_features) = self
            .fitted
            .as_ref()
            .ok_or(Error::NotFitted("GradientBoosting"))?;
        check_width(x, *n_features)?;
        Ok(two_column(self.margins(trees, x).mapv(sigmoid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::testing::diagonal;
    use ndarray::array;

    #[test]
    fn test_boosting_learns() {
        let (x, y) = diagonal(300, 0.05, 11);
        let mut model = GradientBoosting::new(0.3, 1.0, 3, 20, 0);
        model.fit(x.view(), y.view()).unwrap();
        assert_eq!(model.n_trees(), 20);

        let proba = model.predict_proba(array![[0.95, 0.9], [0.05, 0.1]].view()).unwrap();
        assert!(proba[[0, 1]] > 0.7);
        assert!(proba[[1, 1]] < 0.3);
    }

    #[test]
    fn test_zero_rounds_predicts_half() {
        let (x, y) = diagonal(50, 0.0, 12);
        let mut model = GradientBoosting::new(0.1, 1.0, 3, 0, 0);
        model.fit(x.view(), y.view()).unwrap();
        let proba = model.predict_proba(x.view()).unwrap();
        assert!(proba.column(1).iter().all(|&p| p == 0.5));
    }

    #[test]
    fn test_subsample_is_seeded() {
        let (x, y) = diagonal(200, 0.1, 13);
        let fit = |seed| {
            let mut model = GradientBoosting::new(0.1, 0.4, 5, 5, seed);
            model.fit(x.view(), y.view()).unwrap();
            model.predict_proba(x.view()).unwrap()
        };
        assert_eq!(fit(1), fit(1));
    }

    #[test]
    fn test_invalid_subsample() {
        let (x, y) = diagonal(50, 0.0, 14);
        let mut model = GradientBoosting::new(0.1, 0.0, 3, 5, 0);
        assert!(model.fit(x.view(), y.view()).is_err());
    }

    #[test]
    fn test_first_round_leaf_weight() {
        // one feature, perfectly separable: leaf weight = -G / (H + lambda)
        let x = array![[0.0], [0.0], [0.0], [0.0], [1.0], [1.0], [1.0], [1.0]];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let mut model = GradientBoosting::new(1.0, 1.0, 1, 1, 0);
        model.fit(x.view(), y.view()).unwrap();

        // each side: g = -+0.5 * 4, h = 0.25 * 4 -> w = +-2 / 2
        let proba = model.predict_proba(array![[0.0], [1.0]].view()).unwrap();
        let expected_hi = sigmoid(1.0);
        assert!((proba[[1, 1]] - expected_hi).abs() < 1e-12);
        assert!((proba[[0, 1]] - (1.0 - expected_hi)).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_rejected() {
        let x = array![[0.0], [f64::NAN], [1.0], [1.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let mut model = GradientBoosting::new(0.1, 1.0, 2, 3, 0);
        assert!(matches!(model.fit(x.view(), y.view()), Err(Error::Estimator(_))));
        assert_eq!(model.n_trees(), 0);
    }

    #[test]
    fn test_extreme_features_split_cleanly() {
        let values = [-f64::MAX, -1e308, 0.0, 0.2, 1e308, f64::MAX];
        let x = Array2::from_shape_fn((24, 1), |(i, _)| values[i % 6]);
        let y = Array1::from_shape_fn(24, |i| if i % 6 >= 3 { 1.0 } else { 0.0 });
        let mut model = GradientBoosting::new(0.3, 1.0, 3, 10, 0);
        model.fit(x.view(), y.view()).unwrap();

        let proba = model.predict_proba(x.view()).unwrap();
        assert!(proba.iter().all(|p| p.is_finite() && (0.0..=1.0).contains(p)));
        assert!(proba[[5, 1]] > 0.5 && proba[[0, 1]] < 0.5);
    }
}
