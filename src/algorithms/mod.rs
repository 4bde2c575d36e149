// src/algorithms/mod.rs

pub mod logistic;
pub mod naive_bayes;

pub use logistic::{LogisticRegressionIrls, LogisticRegressionModel};
pub use naive_bayes::{BernoulliNaiveBayes, BernoulliNaiveBayesModel};

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::core::{ClassifierKind, Result, SpamError};
use crate::traits::Classifier;

/// A classifier chosen at run time from [`ClassifierKind`].
#[derive(Debug, Clone, Copy)]
pub enum FamilyClassifier {
    NaiveBayesBernoulli(BernoulliNaiveBayes),
    LogisticRegressionIrls(LogisticRegressionIrls),
}

/// A model fit by a [`FamilyClassifier`].
#[derive(Debug, Clone)]
pub enum FittedModel {
    NaiveBayesBernoulli(BernoulliNaiveBayesModel),
    LogisticRegressionIrls(LogisticRegressionModel),
}

impl FamilyClassifier {
    pub fn from_kind(kind: ClassifierKind) -> Result<Self> {
        Ok(match kind {
            ClassifierKind::NaiveBayesBernoulli => FamilyClassifier::NaiveBayesBernoulli(BernoulliNaiveBayes::new()),
            ClassifierKind::LogisticRegressionIrls {
                max_iterations,
                regularization,
            } => FamilyClassifier::LogisticRegressionIrls(LogisticRegressionIrls::new(max_iterations, regularization)?),
        })
    }
}

impl Classifier for FamilyClassifier {
    type Model = FittedModel;

    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, u8>) -> Result<Self::Model> {
        match self {
            FamilyClassifier::NaiveBayesBernoulli(nb) => nb.fit(x, y).map(FittedModel::NaiveBayesBernoulli),
            FamilyClassifier::LogisticRegressionIrls(lr) => lr.fit(x, y).map(FittedModel::LogisticRegressionIrls),
        }
    }

    fn predict(&self, model: &Self::Model, x: ArrayView2<'_, f64>) -> Result<Array1<u8>> {
        match (self, model) {
            (FamilyClassifier::NaiveBayesBernoulli(nb), FittedModel::NaiveBayesBernoulli(m)) => nb.predict(m, x),
            (FamilyClassifier::LogisticRegressionIrls(lr), FittedModel::LogisticRegressionIrls(m)) => lr.predict(m, x),
            _ => Err(SpamError::ModelPrediction(
                "Model was fit by a different classifier family.".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dispatches_on_configured_family() -> Result<()> {
        let x = array![[1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]];
        let y = array![1u8, 1, 0, 0];

        for kind in [ClassifierKind::NaiveBayesBernoulli, ClassifierKind::logistic_regression()] {
            let classifier = FamilyClassifier::from_kind(kind)?;
            let model = classifier.fit(x.view(), y.view())?;
            assert_eq!(classifier.predict(&model, x.view())?, y);
        }
        Ok(())
    }

    #[test]
    fn mismatched_model_is_rejected() -> Result<()> {
        let x = array![[1.0], [0.0]];
        let y = array![1u8, 0];
        let nb = FamilyClassifier::from_kind(ClassifierKind::NaiveBayesBernoulli)?;
        let lr = FamilyClassifier::from_kind(ClassifierKind::logistic_regression())?;
        let model = nb.fit(x.view(), y.view())?;
        assert!(matches!(
            lr.predict(&model, x.view()),
            Err(SpamError::ModelPrediction(_))
        ));
        Ok(())
    }
}
