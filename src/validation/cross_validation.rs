// src/validation/cross_validation.rs

use log::{debug, info, warn};
use ndarray::{Array1, ArrayView1, Axis};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{FeatureTable, FoldPolicy, LabelVector, Result, SpamError};
use crate::traits::{Classifier, MaybeSend, MaybeSync};
use crate::validation::folds::{FoldAssignment, FoldPartitioner};
use crate::validation::metrics::ConfusionMatrix;

/// Fraction of predictions that disagree with the actual targets.
pub fn zero_one_loss(predicted: ArrayView1<'_, u8>, actual: ArrayView1<'_, u8>) -> f64 {
    debug_assert_eq!(predicted.len(), actual.len(), "one prediction per target");
    if actual.is_empty() {
        return 0.0;
    }
    let wrong = predicted.iter().zip(actual.iter()).filter(|(p, a)| p != a).count();
    wrong as f64 / actual.len() as f64
}

/// Outcome of fitting and evaluating a single fold.
#[derive(Debug, Clone)]
pub struct FoldResult<M> {
    pub fold: usize,
    pub model: M,
    pub training_loss: f64,
    pub validation_loss: f64,
    pub training_size: usize,
    pub validation_indices: Vec<usize>,
    /// Predictions for `validation_indices`, in the same order.
    pub validation_predictions: Array1<u8>,
}

/// Summary statistics of one loss over all folds.
#[derive(Debug, Clone, PartialEq)]
pub struct LossSummary {
    pub values: Vec<f64>,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl LossSummary {
    pub fn from_values(values: Vec<f64>) -> Self {
        if values.is_empty() {
            return LossSummary {
                values,
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        LossSummary {
            values,
            mean,
            std: variance.sqrt(),
            min,
            max,
        }
    }
}

/// Aggregate of a cross-validation run.
#[derive(Debug, Clone)]
pub struct ClassificationResult<M> {
    pub folds: Vec<FoldResult<M>>,
    pub training: LossSummary,
    pub validation: LossSummary,
    pub number_of_samples: usize,
    pub number_of_inputs: usize,
    pub number_of_outputs: usize,
}

impl<M> ClassificationResult<M> {
    pub fn mean_training_loss(&self) -> f64 {
        self.training.mean
    }

    pub fn mean_validation_loss(&self) -> f64 {
        self.validation.mean
    }

    /// Every sample's prediction from the one model that did not train on it.
    pub fn out_of_fold_predictions(&self) -> Array1<u8> {
        let mut predictions = Array1::zeros(self.number_of_samples);
        for fold in &self.folds {
            for (&index, &prediction) in fold.validation_indices.iter().zip(fold.validation_predictions.iter()) {
                predictions[index] = prediction;
            }
        }
        predictions
    }

    /// Confusion matrix over the whole dataset built from out-of-fold predictions.
    pub fn confusion_matrix(&self, labels: &LabelVector) -> Result<ConfusionMatrix> {
        ConfusionMatrix::from_predictions(self.out_of_fold_predictions().view(), labels.view())
    }
}

/// Runs k-fold cross-validation of a classifier over a feature table.
#[derive(Debug, Clone, Copy)]
pub struct CrossValidationEngine {
    num_folds: usize,
    policy: FoldPolicy,
}

impl CrossValidationEngine {
    pub fn new(num_folds: usize) -> Result<Self> {
        if num_folds < 2 {
            return Err(SpamError::Configuration(format!(
                "Cross-validation needs at least 2 folds, got {}.",
                num_folds
            )));
        }
        Ok(CrossValidationEngine {
            num_folds,
            policy: FoldPolicy::Contiguous,
        })
    }

    pub fn with_policy(mut self, policy: FoldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn num_folds(&self) -> usize {
        self.num_folds
    }

    /// Fits one fresh classifier from `factory` per fold on the fold's
    /// training rows and scores it with `loss` on training and validation rows.
    /// The first failing fold aborts the run.
    pub fn run<C, F, L>(
        &self,
        table: &FeatureTable,
        labels: &LabelVector,
        factory: F,
        loss: L,
    ) -> Result<ClassificationResult<C::Model>>
    where
        C: Classifier,
        C::Model: MaybeSend,
        F: Fn() -> C + MaybeSync,
        L: Fn(ArrayView1<'_, u8>, ArrayView1<'_, u8>) -> f64 + MaybeSync,
    {
        if labels.len() != table.nrows() {
            return Err(SpamError::IncompatibleDimensions(format!(
                "Feature table has {} rows, but {} labels were given.",
                table.nrows(),
                labels.len()
            )));
        }
        if table.ncols() == 0 {
            return Err(SpamError::EmptyVocabulary(
                "The feature table has no columns; lower the minimum occurrence threshold.".to_string(),
            ));
        }

        let targets = labels.to_vec();
        let assignment = FoldPartitioner::partition_with(self.policy, &targets, self.num_folds)?;
        info!(
            "Cross-validating {} samples x {} features over {} folds ({:?})",
            table.nrows(),
            table.ncols(),
            self.num_folds,
            self.policy
        );

        #[cfg(feature = "parallel")]
        let outcomes: Vec<Result<FoldResult<C::Model>>> = (0..self.num_folds)
            .into_par_iter()
            .map(|fold| Self::run_fold(fold, &assignment, table, labels, &factory, &loss))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes = (0..self.num_folds).map(|fold| Self::run_fold(fold, &assignment, table, labels, &factory, &loss));

        // Reduced in fold order, so the reported failure is the lowest failing fold.
        let folds = outcomes.into_iter().collect::<Result<Vec<_>>>()?;

        let training = LossSummary::from_values(folds.iter().map(|f| f.training_loss).collect());
        let validation = LossSummary::from_values(folds.iter().map(|f| f.validation_loss).collect());
        info!(
            "Mean training loss {:.4}, mean validation loss {:.4}",
            training.mean, validation.mean
        );

        Ok(ClassificationResult {
            folds,
            training,
            validation,
            number_of_samples: table.nrows(),
            number_of_inputs: table.ncols(),
            number_of_outputs: 2,
        })
    }

    fn run_fold<C, F, L>(
        fold: usize,
        assignment: &FoldAssignment,
        table: &FeatureTable,
        labels: &LabelVector,
        factory: &F,
        loss: &L,
    ) -> Result<FoldResult<C::Model>>
    where
        C: Classifier,
        F: Fn() -> C,
        L: Fn(ArrayView1<'_, u8>, ArrayView1<'_, u8>) -> f64,
    {
        let fold_failure = |source: SpamError| SpamError::FoldFitFailure {
            fold,
            source: Box::new(source),
        };

        let training_indices = assignment.training_indices(fold);
        let validation_indices = assignment.validation_indices(fold);

        let x_train = table.values().select(Axis(0), &training_indices);
        let y_train = labels.select(Axis(0), &training_indices);
        let x_valid = table.values().select(Axis(0), &validation_indices);
        let y_valid = labels.select(Axis(0), &validation_indices);

        let mut classes = y_train.iter();
        if let Some(first) = classes.next() {
            if classes.all(|t| t == first) {
                warn!("Fold {} trains on a single class", fold);
            }
        }

        let classifier = factory();
        let model = classifier.fit(x_train.view(), y_train.view()).map_err(fold_failure)?;

        let train_predictions = classifier.predict(&model, x_train.view()).map_err(fold_failure)?;
        let validation_predictions = classifier.predict(&model, x_valid.view()).map_err(fold_failure)?;
        check_prediction_count(&train_predictions, training_indices.len()).map_err(fold_failure)?;
        check_prediction_count(&validation_predictions, validation_indices.len()).map_err(fold_failure)?;

        let training_loss = loss(train_predictions.view(), y_train.view());
        let validation_loss = loss(validation_predictions.view(), y_valid.view());
        debug!(
            "Fold {}: {} training / {} validation rows, training loss {:.4}, validation loss {:.4}",
            fold,
            training_indices.len(),
            validation_indices.len(),
            training_loss,
            validation_loss
        );

        Ok(FoldResult {
            fold,
            model,
            training_loss,
            validation_loss,
            training_size: training_indices.len(),
            validation_indices,
            validation_predictions,
        })
    }
}

fn check_prediction_count(predictions: &Array1<u8>, rows: usize) -> Result<()> {
    if predictions.len() != rows {
        return Err(SpamError::IncompatibleDimensions(format!(
            "Classifier returned {} predictions for {} rows.",
            predictions.len(),
            rows
        )));
    }
    Ok(())
}
