// src/algorithms/naive_bayes.rs

use log::warn;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::core::{Result, SpamError};
use crate::traits::Classifier;

/// Naive Bayes over binary presence features, one Bernoulli distribution per
/// (class, feature) pair, with additive smoothing.
#[derive(Debug, Clone, Copy)]
pub struct BernoulliNaiveBayes {
    alpha: f64,
}

/// Per-class log priors and per-feature log likelihoods, index 0 = ham, 1 = spam.
#[derive(Debug, Clone)]
pub struct BernoulliNaiveBayesModel {
    log_priors: [f64; 2],
    /// `ln P(x_j = 1 | c) - ln P(x_j = 0 | c)` per class.
    log_odds: [Array1<f64>; 2],
    /// `sum_j ln P(x_j = 0 | c)` per class.
    log_absent_sum: [f64; 2],
}

impl BernoulliNaiveBayesModel {
    pub fn num_features(&self) -> usize {
        self.log_odds[0].len()
    }

    /// Log joint likelihood of each row under the given class.
    fn scores(&self, x: &ArrayView2<'_, f64>, class: usize) -> Array1<f64> {
        let presence = x.mapv(|v| if v > 0.5 { 1.0 } else { 0.0 });
        presence.dot(&self.log_odds[class]) + self.log_absent_sum[class] + self.log_priors[class]
    }
}

impl Default for BernoulliNaiveBayes {
    fn default() -> Self {
        BernoulliNaiveBayes { alpha: 1.0 }
    }
}

impl BernoulliNaiveBayes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alpha(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0) {
            return Err(SpamError::Configuration(format!(
                "Smoothing alpha must be positive, got {}.",
                alpha
            )));
        }
        Ok(BernoulliNaiveBayes { alpha })
    }
}

pub(crate) fn check_training_input(x: &ArrayView2<'_, f64>, y: &ArrayView1<'_, u8>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(SpamError::IncompatibleDimensions(format!(
            "Training data has {} rows, but {} targets.",
            x.nrows(),
            y.len()
        )));
    }
    if x.nrows() == 0 {
        return Err(SpamError::ModelFit("Training set is empty.".to_string()));
    }
    if let Some(bad) = y.iter().find(|&&t| t > 1) {
        return Err(SpamError::InvalidInput(format!(
            "Targets must be 0 (ham) or 1 (spam), found {}.",
            bad
        )));
    }
    Ok(())
}

impl Classifier for BernoulliNaiveBayes {
    type Model = BernoulliNaiveBayesModel;

    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, u8>) -> Result<Self::Model> {
        check_training_input(&x, &y)?;

        let n_samples = x.nrows() as f64;
        let mut log_priors = [0.0; 2];
        let mut log_odds = [Array1::zeros(x.ncols()), Array1::zeros(x.ncols())];
        let mut log_absent_sum = [0.0; 2];

        for class in 0..2u8 {
            let rows: Vec<usize> = y
                .iter()
                .enumerate()
                .filter(|(_, t)| **t == class)
                .map(|(i, _)| i)
                .collect();
            let c = class as usize;

            if rows.is_empty() {
                warn!("Training set has no samples of class {}; it will never be predicted", class);
                log_priors[c] = f64::NEG_INFINITY;
            } else {
                log_priors[c] = (rows.len() as f64 / n_samples).ln();
            }

            let present = x
                .select(Axis(0), &rows)
                .mapv(|v| if v > 0.5 { 1.0 } else { 0.0 })
                .sum_axis(Axis(0));
            let denominator = rows.len() as f64 + 2.0 * self.alpha;
            let p_present = present.mapv(|count| (count + self.alpha) / denominator);

            log_odds[c] = p_present.mapv(|p| p.ln() - (1.0 - p).ln());
            log_absent_sum[c] = p_present.mapv(|p| (1.0 - p).ln()).sum();
        }

        Ok(BernoulliNaiveBayesModel {
            log_priors,
            log_odds,
            log_absent_sum,
        })
    }

    fn predict(&self, model: &Self::Model, x: ArrayView2<'_, f64>) -> Result<Array1<u8>> {
        if x.ncols() != model.num_features() {
            return Err(SpamError::IncompatibleDimensions(format!(
                "Model expects {} features, got {}.",
                model.num_features(),
                x.ncols()
            )));
        }
        let ham = model.scores(&x, 0);
        let spam = model.scores(&x, 1);
        Ok(ham
            .iter()
            .zip(spam.iter())
            .map(|(h, s)| if s > h { 1 } else { 0 })
            .collect())
    }
}
