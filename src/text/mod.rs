pub mod selection;
pub mod tokenizer;
pub mod vocabulary;

pub use selection::FeatureSelector;
pub use tokenizer::Tokenizer;
pub use vocabulary::{
    RankedTerms, TermComparison, TermFrequencies, TermProportions, TermStats, Vocabulary, VocabularyBuilder,
};
