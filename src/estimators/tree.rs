use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::Rng;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    /// Features examined per split
    pub max_features: usize,
    pub min_samples_split: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        proba: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Extremely randomized classification tree.
///
/// Each node draws `max_features` candidate features, one uniform random
/// threshold per candidate, and keeps the candidate with the lowest gini
/// impurity. Leaves hold the fraction of positive training rows that reached
/// them.
#[derive(Debug, Clone)]
pub struct ExtraTree {
    nodes: Vec<Node>,
    n_features: usize,
}

struct Candidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(pos: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = pos as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

fn weighted_gini(pos_left: usize, n_left: usize, pos_right: usize, n_right: usize) -> f64 {
    let n = (n_left + n_right) as f64;
    (n_left as f64 * gini(pos_left, n_left) + n_right as f64 * gini(pos_right, n_right)) / n
}

impl ExtraTree {
    /// Grow a tree on the given rows of `x`
    pub fn fit(
        x: ArrayView2<'_, f64>,
        labels: &[bool],
        rows: Vec<usize>,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let n_features = x.ncols();
        if params.max_features == 0 || params.max_features > n_features {
            return Err(Error::Estimator(format!(
                "max_features must be in 1..={}, got {}",
                n_features, params.max_features
            )));
        }
        if rows.is_empty() {
            return Err(Error::Estimator("cannot grow a tree on zero rows".to_string()));
        }

        let mut tree = Self {
            nodes: Vec::new(),
            n_features,
        };
        tree.grow(x, labels, rows, 0, params, rng);
        Ok(tree)
    }

    fn grow(
        &mut self,
        x: ArrayView2<'_, f64>,
        labels: &[bool],
        rows: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> usize {
        let n = rows.len();
        let pos = rows.iter().filter(|&&r| labels[r]).count();
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            proba: pos as f64 / n as f64,
        });

        let depth_reached = params.max_depth.map_or(false, |max| depth >= max);
        if depth_reached || n < params.min_samples_split || pos == 0 || pos == n {
            return node_id;
        }

        let parent = gini(pos, n);
        let best = sample(rng, x.ncols(), params.max_features)
            .into_iter()
            .filter_map(|feature| random_threshold(x.column(feature), labels, &rows, feature, rng))
            .min_by(|a, b| a.impurity.total_cmp(&b.impurity));

        let Some(best) = best else {
            return node_id;
        };
        if best.impurity >= parent - 1e-12 {
            return node_id;
        }

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| x[[r, best.feature]] <= best.threshold);
        if left_rows.is_empty() || right_rows.is_empty() {
            return node_id;
        }

        let left = self.grow(x, labels, left_rows, depth + 1, params, rng);
        let right = self.grow(x, labels, right_rows, depth + 1, params, rng);
        self.nodes[node_id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        node_id
    }

    /// Probability of the positive class for one row
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { proba } => return *proba,
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

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Uniform threshold in `[min, max)`. Interpolates instead of sampling the
/// range width so `max - min` may exceed `f64::MAX`.
fn uniform_between(min: f64, max: f64, rng: &mut StdRng) -> f64 {
    let u: f64 = rng.gen();
    let t = (min * (1.0 - u) + max * u).max(min);
    if t < max {
        t
    } else {
        min
    }
}

fn random_threshold(
    column: ArrayView1<'_, f64>,
    labels: &[bool],
    rows: &[usize],
    feature: usize,
    rng: &mut StdRng,
) -> Option<Candidate> {
    let (min, max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
        (lo.min(column[r]), hi.max(column[r]))
    });
    if !(min < max) {
        return None;
    }
    let threshold = uniform_between(min, max, rng);

    let (mut n_left, mut pos_left, mut pos_right) = (0, 0, 0);
    for &r in rows {
        if column[r] <= threshold {
            n_left += 1;
            pos_left += labels[r] as usize;
        } else {
            pos_right += labels[r] as usize;
        }
    }
    let impurity = weighted_gini(pos_left, n_left, pos_right, rows.len() - n_left);
    Some(Candidate {
        feature,
        threshold,
        impurity,
    })
}
