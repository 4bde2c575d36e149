// src/text/selection.rs

use log::debug;

use crate::core::{Result, SpamError};
use crate::text::vocabulary::Vocabulary;

/// Drops terms seen in too few documents, which otherwise let a classifier
/// memorise single examples.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSelector {
    min_occurrences: usize,
}

impl FeatureSelector {
    pub fn new(min_occurrences: usize) -> Result<Self> {
        if min_occurrences < 1 {
            return Err(SpamError::Configuration(
                "Minimum occurrences must be at least 1.".to_string(),
            ));
        }
        Ok(FeatureSelector { min_occurrences })
    }

    pub fn min_occurrences(&self) -> usize {
        self.min_occurrences
    }

    /// Terms present in at least `min_occurrences` documents of either class,
    /// in the vocabulary's column order. May be empty.
    pub fn select(&self, vocabulary: &Vocabulary) -> Vec<String> {
        let selected: Vec<String> = vocabulary
            .terms_by_frequency()
            .into_iter()
            .filter(|term| {
                vocabulary
                    .term_stats(term)
                    .is_some_and(|s| s.total() >= self.min_occurrences)
            })
            .collect();

        debug!(
            "Selected {} of {} terms with min_occurrences = {}",
            selected.len(),
            vocabulary.len(),
            self.min_occurrences
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Corpus, Document, Label};
    use crate::text::vocabulary::VocabularyBuilder;

    fn vocabulary() -> Vocabulary {
        let corpus = Corpus::new(vec![
            Document::new(0, "free money now", Label::Spam),
            Document::new(1, "free lunch today", Label::Ham),
            Document::new(2, "win money now", Label::Spam),
            Document::new(3, "lunch today free", Label::Ham),
        ])
        .expect("unique ids");
        VocabularyBuilder::new().build(&corpus).expect("vocabulary").1
    }

    #[test]
    fn threshold_of_one_keeps_everything() -> Result<()> {
        let vocabulary = vocabulary();
        let selected = FeatureSelector::new(1)?.select(&vocabulary);
        assert_eq!(selected, vocabulary.terms_by_frequency());
        Ok(())
    }

    #[test]
    fn threshold_combines_both_classes() -> Result<()> {
        let selected = FeatureSelector::new(2)?.select(&vocabulary());
        assert_eq!(selected, vec!["free", "lunch", "money", "now", "today"]);
        Ok(())
    }

    #[test]
    fn threshold_above_every_term_selects_nothing() -> Result<()> {
        // "free" is the most common term and appears in three documents.
        assert_eq!(FeatureSelector::new(3)?.select(&vocabulary()), vec!["free"]);
        assert!(FeatureSelector::new(4)?.select(&vocabulary()).is_empty());
        Ok(())
    }

    #[test]
    fn zero_threshold_is_rejected() {
        assert!(matches!(FeatureSelector::new(0), Err(SpamError::Configuration(_))));
    }

    #[test]
    fn raising_the_threshold_never_adds_features() -> Result<()> {
        let vocabulary = vocabulary();
        let mut previous = FeatureSelector::new(1)?.select(&vocabulary);
        for m in 2..=5 {
            let current = FeatureSelector::new(m)?.select(&vocabulary);
            assert!(current.len() <= previous.len());
            assert!(current.iter().all(|t| previous.contains(t)));
            previous = current;
        }
        Ok(())
    }
}
