// src/core/data.rs
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::errors::{Result, SpamError};

/// Dense feature matrix. Cells of a [`FeatureTable`] are always `0.0` or `1.0`.
pub type Dataset = Array2<f64>;

/// One target per document: `1` for spam, `0` for ham.
pub type LabelVector = Array1<u8>;

/// The two classes of the task. Spam is the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    /// Label files of the raw corpus mark ham with `1` and spam with `0`.
    pub fn from_is_ham(is_ham: bool) -> Self {
        if is_ham {
            Label::Ham
        } else {
            Label::Spam
        }
    }

    pub fn is_spam(self) -> bool {
        self == Label::Spam
    }

    pub fn is_ham(self) -> bool {
        self == Label::Ham
    }

    /// Numeric target used by the classifiers.
    pub fn target(self) -> u8 {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }

    pub fn counterpart(self) -> Self {
        match self {
            Label::Ham => Label::Spam,
            Label::Spam => Label::Ham,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Ham => write!(f, "ham"),
            Label::Spam => write!(f, "spam"),
        }
    }
}

/// A labeled email subject, as handed over by the ingestion step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub text: String,
    pub label: Label,
}

impl Document {
    pub fn new(id: u64, text: impl Into<String>, label: Label) -> Self {
        Document {
            id,
            text: text.into(),
            label,
        }
    }
}

/// Ordered documents with unique ids. Insertion order is kept.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(documents.len());
        for doc in &documents {
            if !seen.insert(doc.id) {
                return Err(SpamError::InvalidInput(format!(
                    "Duplicate document id {} in corpus.",
                    doc.id
                )));
            }
        }
        Ok(Corpus { documents })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn count(&self, label: Label) -> usize {
        self.documents.iter().filter(|d| d.label == label).count()
    }

    /// Targets in document order.
    pub fn labels(&self) -> LabelVector {
        self.documents.iter().map(|d| d.label.target()).collect()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Binary document-term presence matrix: one row per document, one column per term.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    columns: Vec<String>,
    values: Dataset,
}

impl FeatureTable {
    pub fn new(columns: Vec<String>, values: Dataset) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(SpamError::IncompatibleDimensions(format!(
                "Feature table has {} columns, but {} column names were given.",
                values.ncols(),
                columns.len()
            )));
        }
        Ok(FeatureTable { columns, values })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Dataset {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> + '_ {
        self.values.rows().into_iter()
    }

    /// Cell value for `term` in document row `index`, `None` if the term is not a column.
    pub fn get(&self, index: usize, term: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == term)?;
        self.values.get((index, col)).copied()
    }

    /// Keeps only the given terms, in the given order.
    pub fn project(&self, terms: &[String]) -> Result<FeatureTable> {
        let positions: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut indices = Vec::with_capacity(terms.len());
        for term in terms {
            let idx = positions.get(term.as_str()).ok_or_else(|| {
                SpamError::InvalidInput(format!("Term '{}' is not a column of the feature table.", term))
            })?;
            indices.push(*idx);
        }

        let values = if indices.is_empty() {
            Dataset::zeros((self.nrows(), 0))
        } else {
            self.values.select(Axis(1), &indices)
        };
        Ok(FeatureTable {
            columns: terms.to_vec(),
            values,
        })
    }
}
