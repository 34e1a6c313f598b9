use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use super::tree::{ExtraTree, TreeParams};
use super::{binary_labels, check_width, two_column, Classifier};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    RandomForest,
    ExtraTrees,
}

/// One fitted member of the ensemble
#[derive(Debug, Clone)]
enum Member {
    /// Gini CART tree on a bootstrap sample, restricted to `features`
    Bagged {
        tree: DecisionTree<f64, usize>,
        features: Vec<usize>,
    },
    Extra(ExtraTree),
}

impl Member {
    /// Positive-class score per row: a 0/1 vote for bagged trees, the leaf
    /// fraction for extra trees
    fn positive(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        match self {
            Member::Bagged { tree, features } => {
                let subset = x.select(Axis(1), features);
                let votes: Array1<usize> = tree.predict(&subset);
                votes.mapv(|v| v as f64)
            }
            Member::Extra(tree) => x.rows().into_iter().map(|row| tree.predict_row(row)).collect(),
        }
    }
}

/// Tree ensemble classifier.
///
/// Random forests grow linfa gini trees on bootstrap samples, each over a
/// random subspace of `max_features` columns, and score rows by the fraction
/// of trees voting positive. Extra trees grow random-split trees on the full
/// fit data and average their leaf probabilities.
#[derive(Debug, Clone)]
pub struct Forest {
    kind: Kind,
    n_trees: usize,
    tree_params: TreeParams,
    seed: u64,
    n_features: usize,
    members: Option<Vec<Member>>,
}

impl Forest {
    pub fn random_forest(n_trees: usize, max_depth: Option<usize>, max_features: usize, seed: u64) -> Self {
        Self::new(Kind::RandomForest, n_trees, max_depth, max_features, seed)
    }

    pub fn extra_trees(n_trees: usize, max_depth: Option<usize>, max_features: usize, seed: u64) -> Self {
        Self::new(Kind::ExtraTrees, n_trees, max_depth, max_features, seed)
    }

    fn new(kind: Kind, n_trees: usize, max_depth: Option<usize>, max_features: usize, seed: u64) -> Self {
        Self {
            kind,
            n_trees,
            tree_params: TreeParams {
                max_depth,
                max_features,
                min_samples_split: 2,
            },
            seed,
            n_features: 0,
            members: None,
        }
    }

    pub fn n_fitted(&self) -> usize {
        self.members.as_ref().map_or(0, Vec::len)
    }

    fn predict_positive(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let members = self.members.as_ref().ok_or(Error::NotFitted("Forest"))?;
        check_width(x, self.n_features)?;

        let n = x.nrows();
        let total = members
            .par_iter()
            .map(|member| member.positive(x))
            .reduce(|| Array1::zeros(n), |a, b| a + b);
        Ok(total / members.len() as f64)
    }
}

fn grow_bagged(
    x: ArrayView2<'_, f64>,
    labels: &[bool],
    params: &TreeParams,
    rng: &mut StdRng,
) -> Result<Member> {
    let n = x.nrows();
    let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
    let mut features = sample(rng, x.ncols(), params.max_features).into_vec();
    features.sort_unstable();

    let records = x.select(Axis(0), &rows).select(Axis(1), &features);
    let targets: Array1<usize> = rows.iter().map(|&r| usize::from(labels[r])).collect();
    let dataset = DatasetBase::new(records, targets);

    let tree = DecisionTree::<f64, usize>::params()
        .split_quality(SplitQuality::Gini)
        .max_depth(params.max_depth)
        .fit(&dataset)
        .map_err(|e| Error::Estimator(e.to_string()))?;
    Ok(Member::Bagged { tree, features })
}

impl Classifier for Forest {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        if self.n_trees == 0 {
            return Err(Error::Estimator("forest needs at least one tree".to_string()));
        }
        let labels = binary_labels(x, y)?;
        let (n, d) = x.dim();
        let params = self.tree_params;
        if params.max_features == 0 || params.max_features > d {
            return Err(Error::Estimator(format!(
                "max_features must be in 1..={}, got {}",
                d, params.max_features
            )));
        }

        // Per-tree seeds are drawn up front so the parallel build is deterministic
        let mut rng = StdRng::seed_from_u64(self.seed);
        let seeds: Vec<u64> = (0..self.n_trees).map(|_| rng.gen()).collect();

        let kind = self.kind;
        let members = seeds
            .into_par_iter()
            .map(|tree_seed| {
                let mut tree_rng = StdRng::seed_from_u64(tree_seed);
                match kind {
                    Kind::RandomForest => grow_bagged(x, &labels, &params, &mut tree_rng),
                    Kind::ExtraTrees => {
                        ExtraTree::fit(x, &labels, (0..n).collect(), &params, &mut tree_rng)
                            .map(Member::Extra)
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Forest fit: {} {:?} trees on {} rows x {} features",
            members.len(),
            kind,
            n,
            d
        );
        self.n_features = d;
        self.members = Some(members);
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(two_column(self.predict_positive(x)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::testing::diagonal;
    use ndarray::array;

    #[test]
    fn test_random_forest_learns() {
        let (x, y) = diagonal(300, 0.05, 1);
        let mut forest = Forest::random_forest(30, Some(4), 1, 0);
        forest.fit(x.view(), y.view()).unwrap();
        assert_eq!(forest.n_fitted(), 30);

        let proba = forest.predict_proba(array![[0.95, 0.9], [0.05, 0.1]].view()).unwrap();
        assert!(proba[[0, 1]] > 0.7);
        assert!(proba[[1, 1]] < 0.3);
    }

    #[test]
    fn test_random_forest_scores_are_vote_fractions() {
        let (x, y) = diagonal(120, 0.2, 8);
        let mut forest = Forest::random_forest(8, Some(3), 2, 0);
        forest.fit(x.view(), y.view()).unwrap();
        let proba = forest.predict_proba(x.view()).unwrap();
        for &p in proba.column(1).iter() {
            let votes = p * 8.0;
            assert!((votes - votes.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_extra_trees_learns() {
        let (x, y) = diagonal(300, 0.05, 2);
        let mut forest = Forest::extra_trees(30, Some(4), 2, 0);
        forest.fit(x.view(), y.view()).unwrap();

        let proba = forest.predict_proba(array![[0.95, 0.9], [0.05, 0.1]].view()).unwrap();
        assert!(proba[[0, 1]] > 0.7);
        assert!(proba[[1, 1]] < 0.3);
    }

    #[test]
    fn test_seed_determinism() {
        let (x, y) = diagonal(150, 0.2, 3);
        let fit = |forest: Forest| {
            let mut forest = forest;
            forest.fit(x.view(), y.view()).unwrap();
            forest.predict_proba(x.view()).unwrap()
        };
        assert_eq!(
            fit(Forest::extra_trees(10, Some(3), 2, 5)),
            fit(Forest::extra_trees(10, Some(3), 2, 5))
        );
        assert_ne!(
            fit(Forest::extra_trees(10, Some(3), 2, 5)),
            fit(Forest::extra_trees(10, Some(3), 2, 6))
        );
        assert_eq!(
            fit(Forest::random_forest(10, Some(3), 1, 5)),
            fit(Forest::random_forest(10, Some(3), 1, 5))
        );
    }

    #[test]
    fn test_probabilities_bounded() {
        let (x, y) = diagonal(100, 0.3, 4);
        let mut forest = Forest::random_forest(10, Some(3), 2, 0);
        forest.fit(x.view(), y.view()).unwrap();
        let proba = forest.predict_proba(x.view()).unwrap();
        assert!(proba.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_too_many_features_propagates() {
        let (x, y) = diagonal(50, 0.0, 5);
        for mut forest in [Forest::extra_trees(5, Some(3), 7, 0), Forest::random_forest(5, Some(3), 7, 0)] {
            assert!(matches!(forest.fit(x.view(), y.view()), Err(Error::Estimator(_))));
        }
    }

    #[test]
    fn test_non_finite_and_extreme_features() {
        let y = array![0.0, 1.0, 0.0, 1.0];
        let nan = array![[0.0, 0.1], [f64::NAN, 0.9], [0.2, 0.2], [0.3, 0.8]];
        let extreme = array![[-1e308, 0.1], [1e308, 0.9], [0.0, 0.2], [0.2, 0.8]];
        for mut forest in [Forest::extra_trees(5, None, 2, 0), Forest::random_forest(5, None, 2, 0)] {
            assert!(matches!(forest.fit(nan.view(), y.view()), Err(Error::Estimator(_))));

            forest.fit(extreme.view(), y.view()).unwrap();
            let proba = forest.predict_proba(extreme.view()).unwrap();
            assert!(proba.iter().all(|&p| (0.0..=1.0).contains(&p)));
            assert!(forest.predict_proba(nan.view()).is_err());
        }
    }

    #[test]
    fn test_predict_before_fit() {
        let forest = Forest::random_forest(5, Some(3), 1, 0);
        assert!(matches!(
            forest.predict_proba(array![[0.0, 0.0]].view()),
            Err(Error::NotFitted(_))
        ));
    }
}
