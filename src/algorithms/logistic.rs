// src/algorithms/logistic.rs

use log::debug;
use ndarray::{concatenate, s, Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::algorithms::naive_bayes::check_training_input;
use crate::core::config::{DEFAULT_MAX_ITERATIONS, DEFAULT_REGULARIZATION};
use crate::core::{Result, SpamError};
use crate::traits::Classifier;
use crate::utils::solve_linear_system;

const MAX_STEP_HALVINGS: usize = 30;

/// Logistic regression fit by iteratively reweighted least squares (Newton's
/// method on the ridge-penalised log-likelihood) with step halving.
#[derive(Debug, Clone, Copy)]
pub struct LogisticRegressionIrls {
    max_iterations: usize,
    regularization: f64,
    tolerance: f64,
}

#[derive(Debug, Clone)]
pub struct LogisticRegressionModel {
    pub coefficients: Array1<f64>,
    pub intercept: f64,
    /// Newton iterations taken before stopping.
    pub iterations: usize,
    pub converged: bool,
}

impl LogisticRegressionModel {
    pub fn num_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Spam probability of each row.
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.num_features() {
            return Err(SpamError::IncompatibleDimensions(format!(
                "Model expects {} features, got {}.",
                self.num_features(),
                x.ncols()
            )));
        }
        Ok((x.dot(&self.coefficients) + self.intercept).mapv(sigmoid))
    }
}

impl Default for LogisticRegressionIrls {
    fn default() -> Self {
        LogisticRegressionIrls {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            regularization: DEFAULT_REGULARIZATION,
            tolerance: 1e-8,
        }
    }
}

impl LogisticRegressionIrls {
    pub fn new(max_iterations: usize, regularization: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(SpamError::Configuration(
                "Logistic regression needs at least one iteration.".to_string(),
            ));
        }
        if !(regularization >= 0.0) {
            return Err(SpamError::Configuration(format!(
                "Regularization must be non-negative, got {}.",
                regularization
            )));
        }
        Ok(LogisticRegressionIrls {
            max_iterations,
            regularization,
            ..Default::default()
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Penalised log-likelihood of `beta` on the intercept-augmented design.
    fn objective(&self, design: &Array2<f64>, y: &Array1<f64>, beta: &Array1<f64>) -> f64 {
        let eta = design.dot(beta);
        let log_likelihood: f64 = eta
            .iter()
            .zip(y.iter())
            .map(|(&e, &t)| t * e - softplus(e))
            .sum();
        log_likelihood - 0.5 * self.regularization * beta.dot(beta)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

impl Classifier for LogisticRegressionIrls {
    type Model = LogisticRegressionModel;

    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, u8>) -> Result<Self::Model> {
        check_training_input(&x, &y)?;

        let n_coeffs = x.ncols() + 1;
        let intercept_column = Array2::<f64>::ones((x.nrows(), 1));
        let design = concatenate(Axis(1), &[intercept_column.view(), x.view()])?;
        let targets: Array1<f64> = y.mapv(f64::from);

        let mut beta = Array1::<f64>::zeros(n_coeffs);
        let mut current = self.objective(&design, &targets, &beta);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            let mu = design.dot(&beta).mapv(sigmoid);
            let weights = mu.mapv(|p| p * (1.0 - p));

            let gradient = design.t().dot(&(&targets - &mu)) - &beta * self.regularization;
            let weighted = &design * &weights.view().insert_axis(Axis(1));
            let mut hessian = design.t().dot(&weighted);
            for i in 0..n_coeffs {
                hessian[[i, i]] += self.regularization;
            }

            let step = solve_linear_system(hessian, gradient)?;

            let mut scale = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_STEP_HALVINGS {
                let candidate = &beta + &(&step * scale);
                let value = self.objective(&design, &targets, &candidate);
                if value.is_finite() && value >= current {
                    accepted = Some((candidate, value));
                    break;
                }
                scale *= 0.5;
            }

            let Some((candidate, value)) = accepted else {
                debug!("IRLS stopped after {} iterations: no ascent step found", iterations);
                break;
            };

            let change = (&candidate - &beta).fold(0.0_f64, |m, d| m.max(d.abs()));
            beta = candidate;
            let improvement = value - current;
            current = value;

            if change < self.tolerance || improvement.abs() < self.tolerance * (1.0 + current.abs()) {
                converged = true;
                debug!("IRLS converged after {} iterations", iterations);
                break;
            }
        }

        if !beta.iter().all(|b| b.is_finite()) {
            return Err(SpamError::ModelFit(
                "Logistic regression produced non-finite coefficients.".to_string(),
            ));
        }

        Ok(LogisticRegressionModel {
            intercept: beta[0],
            coefficients: beta.slice(s![1..]).to_owned(),
            iterations,
            converged,
        })
    }

    fn predict(&self, model: &Self::Model, x: ArrayView2<'_, f64>) -> Result<Array1<u8>> {
        Ok(model.predict_proba(x)?.mapv(|p| if p >= 0.5 { 1 } else { 0 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn recovers_log_odds_of_a_noisy_feature() -> Result<()> {
        // P(spam | x = 1) = 3/4, P(spam | x = 0) = 1/4
        let x = array![[1.0], [1.0], [1.0], [1.0], [0.0], [0.0], [0.0], [0.0]];
        let y = array![1u8, 1, 1, 0, 0, 0, 0, 1];
        let lr = LogisticRegressionIrls::default();
        let model = lr.fit(x.view(), y.view())?;

        let logit = |p: f64| (p / (1.0 - p)).ln();
        assert!(model.converged);
        assert_abs_diff_eq!(model.intercept, logit(0.25), epsilon = 1e-3);
        assert_abs_diff_eq!(model.coefficients[0], logit(0.75) - logit(0.25), epsilon = 1e-3);

        let proba = model.predict_proba(array![[1.0], [0.0]].view())?;
        assert_abs_diff_eq!(proba[0], 0.75, epsilon = 1e-4);
        assert_eq!(lr.predict(&model, array![[1.0], [0.0]].view())?, array![1u8, 0]);
        Ok(())
    }

    #[test]
    fn separable_data_is_fit_without_diverging() -> Result<()> {
        let x = array![[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];
        let y = array![1u8, 1, 0, 0];
        let lr = LogisticRegressionIrls::default();
        let model = lr.fit(x.view(), y.view())?;

        assert!(model.coefficients.iter().all(|c| c.is_finite()));
        assert_eq!(lr.predict(&model, x.view())?, y);
        Ok(())
    }

    fn fit_leading_rows(
        lr: &LogisticRegressionIrls,
        x: &Array2<f64>,
        y: &Array1<u8>,
        rows: usize,
    ) -> Result<LogisticRegressionModel> {
        lr.fit(x.slice(s![..rows, ..]), y.slice(s![..rows]))
    }

    #[test]
    fn fits_a_borrowed_slice_of_a_larger_table() -> Result<()> {
        let x = array![[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
        let y = array![1u8, 1, 0, 0, 1, 0];
        let lr = LogisticRegressionIrls::default();
        let model = fit_leading_rows(&lr, &x, &y, 4)?;

        assert_eq!(model.num_features(), 2);
        assert!(model.intercept.is_finite());
        assert_eq!(lr.predict(&model, x.slice(s![4.., ..]))?, array![1u8, 0]);
        Ok(())
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(LogisticRegressionIrls::new(0, 1e-6).is_err());
        assert!(LogisticRegressionIrls::new(10, -1.0).is_err());
        assert!(LogisticRegressionIrls::new(10, 0.0).is_ok());
    }

    #[test]
    fn softplus_is_stable_for_large_inputs() {
        assert_abs_diff_eq!(softplus(0.0), 2f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(softplus(800.0), 800.0, epsilon = 1e-9);
        assert!(softplus(-800.0) >= 0.0);
        assert_abs_diff_eq!(sigmoid(-800.0), 0.0, epsilon = 1e-12);
    }
}
