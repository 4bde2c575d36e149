// src/core/config.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::core::errors::{Result, SpamError};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_REGULARIZATION: f64 = 1e-6;

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_regularization() -> f64 {
    DEFAULT_REGULARIZATION
}

/// Supported classifier families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family")]
pub enum ClassifierKind {
    #[serde(rename = "naive-bayes")]
    NaiveBayesBernoulli,
    #[serde(rename = "logistic-regression")]
    LogisticRegressionIrls {
        #[serde(default = "default_max_iterations")]
        max_iterations: usize,
        #[serde(default = "default_regularization")]
        regularization: f64,
    },
}

impl ClassifierKind {
    pub fn logistic_regression() -> Self {
        ClassifierKind::LogisticRegressionIrls {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            regularization: DEFAULT_REGULARIZATION,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClassifierKind::NaiveBayesBernoulli => "naive-bayes",
            ClassifierKind::LogisticRegressionIrls { .. } => "logistic-regression",
        }
    }
}

impl Default for ClassifierKind {
    fn default() -> Self {
        ClassifierKind::NaiveBayesBernoulli
    }
}

impl FromStr for ClassifierKind {
    type Err = SpamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive-bayes" | "naive-bayes-bernoulli" | "bernoulli" => Ok(ClassifierKind::NaiveBayesBernoulli),
            "logistic-regression" | "logistic-regression-irls" | "irls" => Ok(ClassifierKind::logistic_regression()),
            other => Err(SpamError::Configuration(format!(
                "Unsupported classifier family '{}'.",
                other
            ))),
        }
    }
}

/// How document indices are distributed over validation folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FoldPolicy {
    /// Contiguous blocks in document order.
    Contiguous,
    /// Round-robin per class so every fold sees both classes.
    Stratified,
    /// Contiguous blocks over a seeded permutation.
    Shuffled { seed: u64 },
}

impl Default for FoldPolicy {
    fn default() -> Self {
        FoldPolicy::Contiguous
    }
}

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub number_of_folds: usize,
    pub min_occurrences: usize,
    /// Excluded from the reporting views only, never from the feature table.
    pub stop_words: Option<BTreeSet<String>>,
    pub classifier: ClassifierKind,
    pub fold_policy: FoldPolicy,
    /// How many terms the comparative views return.
    pub top_terms: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            number_of_folds: 3,
            min_occurrences: 1,
            stop_words: None,
            classifier: ClassifierKind::default(),
            fold_policy: FoldPolicy::default(),
            top_terms: 10,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.number_of_folds < 2 {
            return Err(SpamError::Configuration(format!(
                "Number of folds must be at least 2, got {}.",
                self.number_of_folds
            )));
        }
        if self.min_occurrences < 1 {
            return Err(SpamError::Configuration(
                "Minimum occurrences must be at least 1.".to_string(),
            ));
        }
        if let ClassifierKind::LogisticRegressionIrls {
            max_iterations,
            regularization,
        } = self.classifier
        {
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
        }
        Ok(())
    }

    pub fn with_folds(mut self, k: usize) -> Self {
        self.number_of_folds = k;
        self
    }

    pub fn with_min_occurrences(mut self, min_occurrences: usize) -> Self {
        self.min_occurrences = min_occurrences;
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierKind) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_fold_policy(mut self, policy: FoldPolicy) -> Self {
        self.fold_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = AnalysisConfig::default();
        assert_eq!(config.number_of_folds, 3);
        assert_eq!(config.min_occurrences, 1);
        assert!(config.stop_words.is_none());
        assert_eq!(config.classifier, ClassifierKind::NaiveBayesBernoulli);
        assert_eq!(config.fold_policy, FoldPolicy::Contiguous);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_too_few_folds_and_zero_threshold() {
        let config = AnalysisConfig::default().with_folds(1);
        assert!(matches!(config.validate(), Err(SpamError::Configuration(_))));

        let config = AnalysisConfig::default().with_min_occurrences(0);
        assert!(matches!(config.validate(), Err(SpamError::Configuration(_))));
    }

    #[test]
    fn unsupported_family_is_a_configuration_error() {
        assert!(matches!(
            "support-vector-machine".parse::<ClassifierKind>(),
            Err(SpamError::Configuration(_))
        ));
        assert_eq!(
            "Logistic-Regression".parse::<ClassifierKind>().ok(),
            Some(ClassifierKind::logistic_regression())
        );
    }

    #[test]
    fn loads_from_toml() -> Result<()> {
        let config = AnalysisConfig::from_toml_str(
            r#"
            number_of_folds = 5
            min_occurrences = 25
            stop_words = ["the", "a"]
            fold_policy = { kind = "shuffled", seed = 42 }

            [classifier]
            family = "logistic-regression"
            max_iterations = 50
            "#,
        )?;
        assert_eq!(config.number_of_folds, 5);
        assert_eq!(config.min_occurrences, 25);
        assert_eq!(config.stop_words.as_ref().map(|s| s.len()), Some(2));
        assert_eq!(config.fold_policy, FoldPolicy::Shuffled { seed: 42 });
        assert_eq!(
            config.classifier,
            ClassifierKind::LogisticRegressionIrls {
                max_iterations: 50,
                regularization: DEFAULT_REGULARIZATION,
            }
        );
        assert_eq!(config.top_terms, 10);
        Ok(())
    }

    #[test]
    fn invalid_toml_values_are_rejected() {
        assert!(matches!(
            AnalysisConfig::from_toml_str("number_of_folds = 1"),
            Err(SpamError::Configuration(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_toml_str("number_of_folds = \"three\""),
            Err(SpamError::ConfigParse(_))
        ));
    }
}
