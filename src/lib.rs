// src/lib.rs

//! `spam_cv` turns a labeled corpus of email subjects into a binary spam/ham
//! classifier and reports its accuracy through k-fold cross-validation.
//!
//! Subjects are tokenized into lowercased words, encoded as a dense binary
//! presence table, reduced to the terms seen in enough documents, and then
//! handed to a [`Classifier`] once per fold.

// Declare the main modules of the crate
pub mod algorithms;
pub mod core;
pub mod pipeline;
pub mod text;
pub mod traits;
pub mod utils;
pub mod validation;

// Re-export key components for easier use by library consumers
pub use crate::algorithms::{BernoulliNaiveBayes, FamilyClassifier, FittedModel, LogisticRegressionIrls};
pub use crate::core::{
    AnalysisConfig, ClassifierKind, Corpus, Dataset, Document, FeatureTable, FoldPolicy, Label, LabelVector, Result,
    SpamError,
};
pub use crate::pipeline::{AnalysisReport, PreparedCorpus, SpamAnalysis};
pub use crate::text::{FeatureSelector, TermStats, Tokenizer, Vocabulary, VocabularyBuilder};
pub use crate::traits::{Classifier, MaybeSend, MaybeSync};
pub use crate::validation::{
    zero_one_loss, ClassificationResult, ConfusionMatrix, CrossValidationEngine, FoldAssignment, FoldPartitioner,
};
