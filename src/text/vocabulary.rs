// src/text/vocabulary.rs

//! Presence encoding of a corpus and per-class document frequencies.

use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::{Corpus, Dataset, FeatureTable, Label, Result, SpamError};
use crate::text::tokenizer::Tokenizer;

/// Number of ham and spam documents that contain a term at least once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermStats {
    pub ham_count: usize,
    pub spam_count: usize,
}

impl TermStats {
    pub fn count(&self, label: Label) -> usize {
        match label {
            Label::Ham => self.ham_count,
            Label::Spam => self.spam_count,
        }
    }

    /// Documents of either class containing the term.
    pub fn total(&self) -> usize {
        self.ham_count + self.spam_count
    }
}

/// Terms ordered by descending value, ties broken by the term itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTerms<V> {
    entries: Vec<(String, V)>,
}

pub type TermFrequencies = RankedTerms<usize>;
pub type TermProportions = RankedTerms<f64>;

impl<V: Copy> RankedTerms<V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, V)> + '_ {
        self.entries.iter().map(|(t, v)| (t.as_str(), *v))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn get(&self, term: &str) -> Option<V> {
        self.entries.iter().find(|(t, _)| t == term).map(|(_, v)| *v)
    }

    /// The first `n` entries, or all of them if there are fewer.
    pub fn top(&self, n: usize) -> &[(String, V)] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn as_slice(&self) -> &[(String, V)] {
        &self.entries
    }
}

/// One term's share of ham and spam documents, for side by side rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TermComparison {
    pub term: String,
    pub ham_proportion: f64,
    pub spam_proportion: f64,
}

/// Every distinct term of a corpus with its per-class document frequencies.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    stats: BTreeMap<String, TermStats>,
    ham_documents: usize,
    spam_documents: usize,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.stats.contains_key(term)
    }

    pub fn term_stats(&self, term: &str) -> Option<TermStats> {
        self.stats.get(term).copied()
    }

    pub fn stats(&self) -> &BTreeMap<String, TermStats> {
        &self.stats
    }

    pub fn document_count(&self, label: Label) -> usize {
        match label {
            Label::Ham => self.ham_documents,
            Label::Spam => self.spam_documents,
        }
    }

    pub fn ham_document_count(&self) -> usize {
        self.ham_documents
    }

    pub fn spam_document_count(&self) -> usize {
        self.spam_documents
    }

    /// All terms by descending combined document frequency, then alphabetically.
    /// This is the column order of every feature table built from this vocabulary.
    pub fn terms_by_frequency(&self) -> Vec<String> {
        let mut terms: Vec<(&String, usize)> = self.stats.iter().map(|(t, s)| (t, s.total())).collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.into_iter().map(|(t, _)| t.clone()).collect()
    }

    /// Document frequency of every term within one class. Stop words only
    /// filter this view; the underlying counts are unchanged.
    pub fn term_frequencies(&self, label: Label, stop_words: Option<&BTreeSet<String>>) -> TermFrequencies {
        let mut entries: Vec<(String, usize)> = self
            .stats
            .iter()
            .filter(|(term, _)| !stop_words.is_some_and(|sw| sw.contains(term.as_str())))
            .map(|(term, s)| (term.clone(), s.count(label)))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        RankedTerms { entries }
    }

    pub fn ham_term_frequencies(&self, stop_words: Option<&BTreeSet<String>>) -> TermFrequencies {
        self.term_frequencies(Label::Ham, stop_words)
    }

    pub fn spam_term_frequencies(&self, stop_words: Option<&BTreeSet<String>>) -> TermFrequencies {
        self.term_frequencies(Label::Spam, stop_words)
    }

    /// Term frequencies divided by the number of documents of the class.
    pub fn term_proportions(&self, label: Label, stop_words: Option<&BTreeSet<String>>) -> Result<TermProportions> {
        let documents = self.document_count(label);
        if documents == 0 {
            return Err(SpamError::ZeroClassCount { class: label });
        }
        let entries = self
            .term_frequencies(label, stop_words)
            .entries
            .into_iter()
            .map(|(term, count)| (term, count as f64 / documents as f64))
            .collect();
        Ok(RankedTerms { entries })
    }

    pub fn ham_term_proportions(&self, stop_words: Option<&BTreeSet<String>>) -> Result<TermProportions> {
        self.term_proportions(Label::Ham, stop_words)
    }

    pub fn spam_term_proportions(&self, stop_words: Option<&BTreeSet<String>>) -> Result<TermProportions> {
        self.term_proportions(Label::Spam, stop_words)
    }

    /// The `n` terms with the highest proportion in `label`, paired with the
    /// proportion the same terms reach in the other class.
    pub fn comparative_top_terms(
        &self,
        label: Label,
        n: usize,
        stop_words: Option<&BTreeSet<String>>,
    ) -> Result<Vec<TermComparison>> {
        let own = self.term_proportions(label, stop_words)?;
        let other_documents = self.document_count(label.counterpart());
        if other_documents == 0 {
            return Err(SpamError::ZeroClassCount { class: label.counterpart() });
        }

        Ok(own
            .top(n)
            .iter()
            .map(|(term, proportion)| {
                let other = self
                    .stats
                    .get(term)
                    .map_or(0.0, |s| s.count(label.counterpart()) as f64 / other_documents as f64);
                let (ham_proportion, spam_proportion) = match label {
                    Label::Ham => (*proportion, other),
                    Label::Spam => (other, *proportion),
                };
                TermComparison {
                    term: term.clone(),
                    ham_proportion,
                    spam_proportion,
                }
            })
            .collect())
    }
}

/// Turns a corpus into a dense binary feature table plus its [`Vocabulary`].
#[derive(Debug, Clone, Default)]
pub struct VocabularyBuilder {
    tokenizer: Tokenizer,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        VocabularyBuilder {
            tokenizer: Tokenizer::new(),
        }
    }

    pub fn with_tokenizer(tokenizer: Tokenizer) -> Self {
        VocabularyBuilder { tokenizer }
    }

    pub fn build(&self, corpus: &Corpus) -> Result<(FeatureTable, Vocabulary)> {
        let mut vocabulary = Vocabulary::default();
        let mut document_terms = Vec::with_capacity(corpus.len());

        for doc in corpus {
            let terms = self.tokenizer.tokenize(&doc.text);
            match doc.label {
                Label::Ham => vocabulary.ham_documents += 1,
                Label::Spam => vocabulary.spam_documents += 1,
            }
            for term in &terms {
                let stats = vocabulary.stats.entry(term.clone()).or_default();
                match doc.label {
                    Label::Ham => stats.ham_count += 1,
                    Label::Spam => stats.spam_count += 1,
                }
            }
            document_terms.push(terms);
        }

        let columns = vocabulary.terms_by_frequency();
        let column_index: HashMap<&str, usize> =
            columns.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();

        // Absent terms stay materialised as 0.0.
        let mut values = Dataset::zeros((corpus.len(), columns.len()));
        for (row, terms) in document_terms.iter().enumerate() {
            for term in terms {
                if let Some(&col) = column_index.get(term.as_str()) {
                    values[[row, col]] = 1.0;
                }
            }
        }

        debug!(
            "Built vocabulary of {} terms over {} documents ({} ham, {} spam)",
            vocabulary.len(),
            corpus.len(),
            vocabulary.ham_documents,
            vocabulary.spam_documents
        );

        Ok((FeatureTable::new(columns, values)?, vocabulary))
    }
}
