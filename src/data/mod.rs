pub mod synthetic;

use std::fmt;
use std::sync::OnceLock;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use sha2::{Digest as _, Sha256};

use crate::error::{Error, Result};

pub use synthetic::SyntheticSpec;

/// SHA-256 content digest of a dataset
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..16])
    }
}

/// What a model adapter needs from a dataset.
///
/// Row `i` of `x`, element `i` of `y` and `ids[i]` describe the same
/// observation. Prediction data may carry NaN labels; adapters never read them.
pub trait Data {
    /// Feature matrix, one row per observation
    fn x(&self) -> ArrayView2<'_, f64>;

    /// Binary targets (0.0 or 1.0)
    fn y(&self) -> ArrayView1<'_, f64>;

    /// Stable per-row identifiers
    fn ids(&self) -> &[String];

    /// Deterministic content hash
    fn hash(&self) -> Digest;

    fn len(&self) -> usize {
        self.ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    ids: Vec<String>,
    x: Array2<f64>,
    y: Array1<f64>,
    digest: OnceLock<Digest>,
}

impl Dataset {
    pub fn new(ids: Vec<String>, x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        if x.nrows() != ids.len() || y.len() != ids.len() {
            return Err(Error::Shape(format!(
                "{} ids, {} feature rows and {} labels must be aligned",
                ids.len(),
                x.nrows(),
                y.len()
            )));
        }
        Ok(Self {
            ids,
            x,
            y,
            digest: OnceLock::new(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// New dataset holding the given rows, in the given order
    pub fn select(&self, rows: &[usize]) -> Result<Self> {
        if let Some(&bad) = rows.iter().find(|&&r| r >= self.ids.len()) {
            return Err(Error::Shape(format!(
                "row {} out of bounds for dataset of {} rows",
                bad,
                self.ids.len()
            )));
        }
        let ids = rows.iter().map(|&r| self.ids[r].clone()).collect();
        Self::new(ids, self.x.select(Axis(0), rows), self.y.select(Axis(0), rows))
    }

    fn compute_digest(&self) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update((self.x.nrows() as u64).to_be_bytes());
        hasher.update((self.x.ncols() as u64).to_be_bytes());
        for v in self.x.iter() {
            hasher.update(v.to_le_bytes());
        }
        for v in self.y.iter() {
            hasher.update(v.to_le_bytes());
        }
        for id in &self.ids {
            hasher.update((id.len() as u64).to_be_bytes());
            hasher.update(id.as_bytes());
        }
        Digest(hasher.finalize().into())
    }
}

impl Data for Dataset {
    fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    fn y(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }

    fn ids(&self) -> &[String] {
        &self.ids
    }

    fn hash(&self) -> Digest {
        *self.digest.get_or_init(|| self.compute_digest())
    }
}
