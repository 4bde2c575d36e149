pub mod cross_validation;
pub mod folds;
pub mod metrics;

pub use cross_validation::{zero_one_loss, ClassificationResult, CrossValidationEngine, FoldResult, LossSummary};
pub use folds::{FoldAssignment, FoldPartitioner};
pub use metrics::{ClassificationMetrics, ConfusionMatrix};
