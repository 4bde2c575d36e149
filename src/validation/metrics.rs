// src/validation/metrics.rs

use ndarray::ArrayView1;
use std::fmt;

use crate::core::{Result, SpamError};

/// 2x2 tally indexed `[predicted][actual]`, class 1 = spam (positive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    cells: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_cells(cells: [[usize; 2]; 2]) -> Self {
        ConfusionMatrix { cells }
    }

    pub fn from_predictions(predicted: ArrayView1<'_, u8>, actual: ArrayView1<'_, u8>) -> Result<Self> {
        if predicted.len() != actual.len() {
            return Err(SpamError::IncompatibleDimensions(format!(
                "Got {} predictions for {} samples.",
                predicted.len(),
                actual.len()
            )));
        }
        let mut cells = [[0; 2]; 2];
        for (&p, &a) in predicted.iter().zip(actual.iter()) {
            if p > 1 || a > 1 {
                return Err(SpamError::InvalidInput(format!(
                    "Class labels must be 0 or 1, got prediction {} for actual {}.",
                    p, a
                )));
            }
            cells[p as usize][a as usize] += 1;
        }
        Ok(ConfusionMatrix { cells })
    }

    pub fn cell(&self, predicted: u8, actual: u8) -> usize {
        self.cells[predicted as usize][actual as usize]
    }

    pub fn cells(&self) -> &[[usize; 2]; 2] {
        &self.cells
    }

    pub fn true_positives(&self) -> usize {
        self.cells[1][1]
    }

    pub fn true_negatives(&self) -> usize {
        self.cells[0][0]
    }

    pub fn false_positives(&self) -> usize {
        self.cells[1][0]
    }

    pub fn false_negatives(&self) -> usize {
        self.cells[0][1]
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    /// `(tp + tn) / total`
    pub fn accuracy(&self) -> Result<f64> {
        ratio(self.true_positives() + self.true_negatives(), self.total(), "accuracy")
    }

    /// `tp / (tp + fp)`
    pub fn precision(&self) -> Result<f64> {
        let tp = self.true_positives();
        ratio(tp, tp + self.false_positives(), "precision")
    }

    /// `tp / (tp + fn)`
    pub fn recall(&self) -> Result<f64> {
        let tp = self.true_positives();
        ratio(tp, tp + self.false_negatives(), "recall")
    }

    pub fn metrics(&self) -> Result<ClassificationMetrics> {
        Ok(ClassificationMetrics {
            accuracy: self.accuracy()?,
            precision: self.precision().ok(),
            recall: self.recall().ok(),
        })
    }
}

fn ratio(numerator: usize, denominator: usize, metric: &'static str) -> Result<f64> {
    if denominator == 0 {
        return Err(SpamError::UndefinedMetric { metric });
    }
    Ok(numerator as f64 / denominator as f64)
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\t\t\tActual Class - 0\tActual Class - 1")?;
        for predicted in 0..2 {
            writeln!(
                f,
                "Pred. Class - {} :\t{}\t\t\t{}",
                predicted, self.cells[predicted][0], self.cells[predicted][1]
            )?;
        }
        Ok(())
    }
}

/// Derived metrics. `None` marks a metric whose denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn tallies_predicted_by_actual() -> Result<()> {
        let predicted = array![1u8, 1, 0, 0, 1, 0];
        let actual = array![1u8, 0, 0, 1, 1, 0];
        let matrix = ConfusionMatrix::from_predictions(predicted.view(), actual.view())?;

        assert_eq!(matrix.true_positives(), 2);
        assert_eq!(matrix.false_positives(), 1);
        assert_eq!(matrix.false_negatives(), 1);
        assert_eq!(matrix.true_negatives(), 2);
        assert_eq!(matrix.cell(1, 0), 1);
        assert_eq!(matrix.total(), predicted.len());

        assert_relative_eq!(matrix.accuracy()?, 4.0 / 6.0);
        assert_relative_eq!(matrix.precision()?, 2.0 / 3.0);
        assert_relative_eq!(matrix.recall()?, 2.0 / 3.0);
        Ok(())
    }

    #[test]
    fn no_positive_predictions_leaves_precision_undefined() -> Result<()> {
        let matrix = ConfusionMatrix::from_predictions(array![0u8, 0, 0].view(), array![1u8, 0, 0].view())?;
        assert!(matches!(
            matrix.precision(),
            Err(SpamError::UndefinedMetric { metric: "precision" })
        ));
        assert_relative_eq!(matrix.recall()?, 0.0);

        let metrics = matrix.metrics()?;
        assert_eq!(metrics.precision, None);
        assert_eq!(metrics.recall, Some(0.0));
        Ok(())
    }

    #[test]
    fn no_actual_positives_leaves_recall_undefined() {
        let matrix = ConfusionMatrix::from_cells([[3, 0], [1, 0]]);
        assert!(matches!(matrix.recall(), Err(SpamError::UndefinedMetric { metric: "recall" })));
        assert!(matches!(matrix.precision(), Ok(p) if p == 0.0));
    }

    #[test]
    fn metrics_stay_within_unit_interval() -> Result<()> {
        for cells in [[[5, 0], [0, 5]], [[0, 5], [5, 0]], [[2, 3], [1, 4]], [[7, 1], [2, 9]]] {
            let matrix = ConfusionMatrix::from_cells(cells);
            for metric in [matrix.accuracy()?, matrix.precision()?, matrix.recall()?] {
                assert!((0.0..=1.0).contains(&metric));
            }
        }
        Ok(())
    }

    #[test]
    fn rejects_mismatched_or_non_binary_input() {
        assert!(ConfusionMatrix::from_predictions(array![1u8].view(), array![1u8, 0].view()).is_err());
        assert!(ConfusionMatrix::from_predictions(array![2u8].view(), array![1u8].view()).is_err());
        assert!(matches!(
            ConfusionMatrix::default().accuracy(),
            Err(SpamError::UndefinedMetric { metric: "accuracy" })
        ));
    }
}
