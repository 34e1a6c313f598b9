use std::fmt;

use ndarray::ArrayView1;
use serde::Serialize;

use crate::data::Data;
use crate::error::{Error, Result};
use crate::models::Prediction;

const EPS: f64 = 1e-15;

/// Log loss of always predicting 0.5; a model is consistent below it
pub const LOGLOSS_BENCHMARK: f64 = std::f64::consts::LN_2;

fn check_lengths(y: ArrayView1<'_, f64>, yhat: ArrayView1<'_, f64>) -> Result<()> {
    if y.len() != yhat.len() {
        return Err(Error::Shape(format!(
            "{} labels but {} predictions",
            y.len(),
            yhat.len()
        )));
    }
    if y.is_empty() {
        return Err(Error::Shape("cannot score zero rows".to_string()));
    }
    Ok(())
}

/// Mean binary cross entropy with predictions clipped away from 0 and 1
pub fn logloss(y: ArrayView1<'_, f64>, yhat: ArrayView1<'_, f64>) -> Result<f64> {
    check_lengths(y, yhat)?;
    let total: f64 = y
        .iter()
        .zip(yhat.iter())
        .map(|(&t, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
        .sum();
    Ok(total / y.len() as f64)
}

/// Area under the ROC curve from average ranks; `None` if a class is missing
pub fn auc(y: ArrayView1<'_, f64>, yhat: ArrayView1<'_, f64>) -> Result<Option<f64>> {
    check_lengths(y, yhat)?;

    let mut order: Vec<usize> = (0..yhat.len()).collect();
    order.sort_by(|&a, &b| yhat[a].total_cmp(&yhat[b]));

    // 1-based ranks, ties share their average rank
    let mut ranks = vec![0.0; order.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && yhat[order[j + 1]] == yhat[order[i]] {
            j += 1;
        }
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }

    let n_pos = y.iter().filter(|&&t| t >= 0.5).count();
    let n_neg = y.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Ok(None);
    }
    let pos_rank_sum: f64 = y
        .iter()
        .zip(&ranks)
        .filter(|(&t, _)| t >= 0.5)
        .map(|(_, &r)| r)
        .sum();
    let u = pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Ok(Some(u / (n_pos * n_neg) as f64))
}

/// Fraction of rows where the 0.5-thresholded prediction matches the label
pub fn accuracy(y: ArrayView1<'_, f64>, yhat: ArrayView1<'_, f64>) -> Result<f64> {
    check_lengths(y, yhat)?;
    let correct = y
        .iter()
        .zip(yhat.iter())
        .filter(|(&t, &p)| (p >= 0.5) == (t >= 0.5))
        .count();
    Ok(correct as f64 / y.len() as f64)
}

/// Scores of one model run against labelled predict data
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub model: String,
    pub rows: usize,
    pub logloss: f64,
    pub auc: Option<f64>,
    pub accuracy: f64,
}

impl Report {
    /// Score `prediction` against the labels of `dpre`; ids must match row for row
    pub fn evaluate(model: impl Into<String>, prediction: &Prediction, dpre: &dyn Data) -> Result<Self> {
        if prediction.ids.as_slice() != dpre.ids() {
            return Err(Error::Shape(
                "prediction ids are not aligned with the predict data".to_string(),
            ));
        }
        let y = dpre.y();
        let yhat = prediction.yhat.view();
        Ok(Self {
            model: model.into(),
            rows: prediction.len(),
            logloss: logloss(y, yhat)?,
            auc: auc(y, yhat)?,
            accuracy: accuracy(y, yhat)?,
        })
    }

    pub fn is_consistent(&self) -> bool {
        self.logloss < LOGLOSS_BENCHMARK
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "model     {}", self.model)?;
        writeln!(f, "rows      {}", self.rows)?;
        writeln!(f, "logloss   {:.6}", self.logloss)?;
        match self.auc {
            Some(auc) => writeln!(f, "auc       {:.6}", auc)?,
            None => writeln!(f, "auc       n/a")?,
        }
        writeln!(f, "accuracy  {:.4}", self.accuracy)?;
        write!(f, "consistent {}", self.is_consistent())
    }
}
