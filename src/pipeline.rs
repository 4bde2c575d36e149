// src/pipeline.rs

//! End-to-end analysis: corpus -> presence features -> selected features ->
//! cross-validated classifier -> report.

use log::{info, warn};
use std::fmt;

use crate::algorithms::{FamilyClassifier, FittedModel};
use crate::core::{AnalysisConfig, ClassifierKind, Corpus, FeatureTable, Label, LabelVector, Result};
use crate::text::{FeatureSelector, TermComparison, TermFrequencies, TermProportions, Vocabulary, VocabularyBuilder};
use crate::validation::{zero_one_loss, ClassificationMetrics, ClassificationResult, ConfusionMatrix, CrossValidationEngine};

/// The full presence table of a corpus together with its vocabulary and targets.
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    table: FeatureTable,
    vocabulary: Vocabulary,
    labels: LabelVector,
}

impl PreparedCorpus {
    /// Every observed term as a column, one row per document.
    pub fn feature_table(&self) -> &FeatureTable {
        &self.table
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn labels(&self) -> &LabelVector {
        &self.labels
    }

    pub fn ham_count(&self) -> usize {
        self.vocabulary.ham_document_count()
    }

    pub fn spam_count(&self) -> usize {
        self.vocabulary.spam_document_count()
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub classifier: ClassifierKind,
    pub ham_count: usize,
    pub spam_count: usize,
    pub selected_features: Vec<String>,
    pub cross_validation: ClassificationResult<FittedModel>,
    pub confusion_matrix: ConfusionMatrix,
    pub metrics: ClassificationMetrics,
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cv = &self.cross_validation;
        writeln!(f, "{} spams vs. {} hams ({})", self.spam_count, self.ham_count, self.classifier.name())?;
        writeln!(f)?;
        writeln!(f, "---- Confusion Matrix ----")?;
        write!(f, "{}", self.confusion_matrix)?;
        writeln!(f)?;
        writeln!(f, "---- Sample Size ----")?;
        writeln!(
            f,
            "# samples: {}, # inputs: {}, # outputs: {}",
            cv.number_of_samples, cv.number_of_inputs, cv.number_of_outputs
        )?;
        writeln!(f, "Training error: {:.4}", cv.training.mean)?;
        writeln!(f, "Validation error: {:.4}", cv.validation.mean)?;
        writeln!(f)?;
        writeln!(f, "---- Accuracy, Precision, Recall ----")?;
        writeln!(f, "Accuracy: {:.4}", self.metrics.accuracy)?;
        writeln!(f, "Precision: {}", display_metric(self.metrics.precision))?;
        write!(f, "Recall: {}", display_metric(self.metrics.recall))
    }
}

fn display_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "undefined".to_string(),
    }
}

/// Runs the analysis described by an [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct SpamAnalysis {
    config: AnalysisConfig,
    builder: VocabularyBuilder,
}

impl SpamAnalysis {
    pub fn new(config: Option<AnalysisConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();
        config.validate()?;
        Ok(SpamAnalysis {
            config,
            builder: VocabularyBuilder::new(),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Tokenizes the corpus and encodes every document against the full vocabulary.
    pub fn prepare(&self, corpus: &Corpus) -> Result<PreparedCorpus> {
        let (table, vocabulary) = self.builder.build(corpus)?;
        info!(
            "Subject word transformation: {} rows, {} columns",
            table.nrows(),
            table.ncols()
        );
        Ok(PreparedCorpus {
            table,
            vocabulary,
            labels: corpus.labels(),
        })
    }

    /// Per-class document frequencies with the configured stop words left out.
    pub fn term_frequencies(&self, prepared: &PreparedCorpus, label: Label) -> TermFrequencies {
        prepared
            .vocabulary
            .term_frequencies(label, self.config.stop_words.as_ref())
    }

    pub fn term_proportions(&self, prepared: &PreparedCorpus, label: Label) -> Result<TermProportions> {
        prepared
            .vocabulary
            .term_proportions(label, self.config.stop_words.as_ref())
    }

    /// The configured number of top terms of `label`, with the other class's proportions.
    pub fn top_terms(&self, prepared: &PreparedCorpus, label: Label) -> Result<Vec<TermComparison>> {
        prepared
            .vocabulary
            .comparative_top_terms(label, self.config.top_terms, self.config.stop_words.as_ref())
    }

    /// The feature table restricted to terms meeting the occurrence threshold.
    pub fn select_features(&self, prepared: &PreparedCorpus) -> Result<FeatureTable> {
        let terms = FeatureSelector::new(self.config.min_occurrences)?.select(&prepared.vocabulary);
        prepared.table.project(&terms)
    }

    pub fn classify(&self, prepared: &PreparedCorpus) -> Result<AnalysisReport> {
        let table = self.select_features(prepared)?;
        let classifier = FamilyClassifier::from_kind(self.config.classifier)?;
        let engine = CrossValidationEngine::new(self.config.number_of_folds)?.with_policy(self.config.fold_policy);

        let cross_validation = engine.run(&table, &prepared.labels, || classifier, zero_one_loss)?;
        let confusion_matrix = cross_validation.confusion_matrix(&prepared.labels)?;
        let metrics = confusion_matrix.metrics()?;

        if metrics.precision.is_none() {
            warn!("Precision is undefined: no sample was predicted as spam");
        }
        if metrics.recall.is_none() {
            warn!("Recall is undefined: the corpus has no spam samples");
        }
        info!(
            "{} with {} features: accuracy {:.4}",
            self.config.classifier.name(),
            table.ncols(),
            metrics.accuracy
        );

        Ok(AnalysisReport {
            classifier: self.config.classifier,
            ham_count: prepared.ham_count(),
            spam_count: prepared.spam_count(),
            selected_features: table.columns().to_vec(),
            cross_validation,
            confusion_matrix,
            metrics,
        })
    }

    pub fn run(&self, corpus: &Corpus) -> Result<AnalysisReport> {
        let prepared = self.prepare(corpus)?;
        self.classify(&prepared)
    }
}
