// src/core/errors.rs
use thiserror::Error;

use crate::core::data::Label;

#[derive(Debug, Error)]
pub enum SpamError {
    /// Invalid fold count, threshold or classifier family. Fatal to the run.
    #[error("Configuration Error: {0}")]
    Configuration(String),

    /// Feature selection left no columns to train on.
    #[error("Empty Vocabulary: {0}")]
    EmptyVocabulary(String),

    /// Precision or recall with a zero denominator.
    #[error("Undefined Metric: {metric} has a zero denominator")]
    UndefinedMetric { metric: &'static str },

    /// A classifier failed to fit one fold; the whole cross-validation run is aborted.
    #[error("Fold {fold} failed: {source}")]
    FoldFitFailure {
        fold: usize,
        #[source]
        source: Box<SpamError>,
    },

    #[error("Zero Class Count: the corpus contains no {class} documents")]
    ZeroClassCount { class: Label },

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Incompatible Dimensions: {0}")]
    IncompatibleDimensions(String),

    #[error("Model Fit Error: {0}")]
    ModelFit(String),

    #[error("Model Prediction Error: {0}")]
    ModelPrediction(String),

    #[error("Ndarray Error: {0}")]
    Ndarray(#[from] ndarray::ShapeError),

    #[error("Config Parse Error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl SpamError {
    /// Index of the fold that aborted the run, if this is a fold failure.
    pub fn failed_fold(&self) -> Option<usize> {
        match self {
            SpamError::FoldFitFailure { fold, .. } => Some(*fold),
            _ => None,
        }
    }
}

// Convenience type alias for Result
pub type Result<T> = std::result::Result<T, SpamError>;
