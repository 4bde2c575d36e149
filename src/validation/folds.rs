// src/validation/folds.rs

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::{FoldPolicy, Result, SpamError};

/// Fold id of every sample index. Every index belongs to exactly one fold
/// and fold sizes differ by at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldAssignment {
    folds: Vec<usize>,
    num_folds: usize,
}

impl FoldAssignment {
    pub fn num_folds(&self) -> usize {
        self.num_folds
    }

    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    pub fn fold_of(&self, index: usize) -> Option<usize> {
        self.folds.get(index).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.folds
    }

    /// Indices validated in `fold`, ascending.
    pub fn validation_indices(&self, fold: usize) -> Vec<usize> {
        (0..self.folds.len()).filter(|&i| self.folds[i] == fold).collect()
    }

    /// Indices trained on in `fold`: the complement of its validation indices.
    pub fn training_indices(&self, fold: usize) -> Vec<usize> {
        (0..self.folds.len()).filter(|&i| self.folds[i] != fold).collect()
    }

    pub fn fold_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.num_folds];
        for &f in &self.folds {
            sizes[f] += 1;
        }
        sizes
    }
}

/// Splits `n` samples into `k` validation folds.
pub struct FoldPartitioner;

impl FoldPartitioner {
    fn check(n: usize, k: usize) -> Result<()> {
        if k < 2 {
            return Err(SpamError::Configuration(format!(
                "Cross-validation needs at least 2 folds, got {}.",
                k
            )));
        }
        if k > n {
            return Err(SpamError::Configuration(format!(
                "Cannot split {} samples into {} folds.",
                n, k
            )));
        }
        Ok(())
    }

    /// Contiguous blocks in index order: fold `i` holds `[i*n/k, (i+1)*n/k)`.
    pub fn partition(n: usize, k: usize) -> Result<FoldAssignment> {
        Self::check(n, k)?;
        Ok(Self::blocks(&(0..n).collect::<Vec<_>>(), k))
    }

    /// Contiguous blocks over a permutation drawn from `seed`.
    pub fn partition_shuffled(n: usize, k: usize, seed: u64) -> Result<FoldAssignment> {
        Self::check(n, k)?;
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
        Ok(Self::blocks(&order, k))
    }

    /// Deals spam indices, then ham indices, round-robin over the folds, so
    /// each fold gets its share of both classes.
    pub fn partition_stratified(labels: &[u8], k: usize) -> Result<FoldAssignment> {
        let n = labels.len();
        Self::check(n, k)?;

        let mut folds = vec![0; n];
        let order = (0..n)
            .filter(|&i| labels[i] == 1)
            .chain((0..n).filter(|&i| labels[i] != 1));
        for (position, index) in order.enumerate() {
            folds[index] = position % k;
        }
        Ok(FoldAssignment { folds, num_folds: k })
    }

    pub fn partition_with(policy: FoldPolicy, labels: &[u8], k: usize) -> Result<FoldAssignment> {
        match policy {
            FoldPolicy::Contiguous => Self::partition(labels.len(), k),
            FoldPolicy::Stratified => Self::partition_stratified(labels, k),
            FoldPolicy::Shuffled { seed } => Self::partition_shuffled(labels.len(), k, seed),
        }
    }

    fn blocks(order: &[usize], k: usize) -> FoldAssignment {
        let n = order.len();
        let mut folds = vec![0; n];
        for fold in 0..k {
            for &index in &order[fold * n / k..(fold + 1) * n / k] {
                folds[index] = fold;
            }
        }
        FoldAssignment { folds, num_folds: k }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition_invariants(assignment: &FoldAssignment, n: usize, k: usize) {
        assert_eq!(assignment.len(), n);
        assert_eq!(assignment.num_folds(), k);

        let mut seen = vec![0; n];
        for fold in 0..k {
            for i in assignment.validation_indices(fold) {
                seen[i] += 1;
            }
            let mut union: Vec<usize> = assignment.training_indices(fold);
            let validation = assignment.validation_indices(fold);
            assert!(union.iter().all(|i| !validation.contains(i)));
            union.extend(validation);
            union.sort_unstable();
            assert_eq!(union, (0..n).collect::<Vec<_>>());
        }
        assert!(seen.iter().all(|&c| c == 1));

        let sizes = assignment.fold_sizes();
        let max = sizes.iter().max().copied().unwrap_or(0);
        let min = sizes.iter().min().copied().unwrap_or(0);
        assert!(max - min <= 1, "fold sizes {:?}", sizes);
    }

    #[test]
    fn contiguous_two_folds_of_four() -> Result<()> {
        let assignment = FoldPartitioner::partition(4, 2)?;
        assert_eq!(assignment.validation_indices(0), vec![0, 1]);
        assert_eq!(assignment.validation_indices(1), vec![2, 3]);
        assert_eq!(assignment.training_indices(0), vec![2, 3]);
        Ok(())
    }

    #[test]
    fn contiguous_uneven_split() -> Result<()> {
        let assignment = FoldPartitioner::partition(10, 3)?;
        assert_eq!(assignment.as_slice(), &[0, 0, 0, 1, 1, 1, 2, 2, 2, 2]);
        Ok(())
    }

    #[test]
    fn every_policy_covers_each_index_once() -> Result<()> {
        for n in 2..=23 {
            let labels: Vec<u8> = (0..n).map(|i| u8::from(i % 3 == 0)).collect();
            for k in 2..=n.min(7) {
                assert_partition_invariants(&FoldPartitioner::partition(n, k)?, n, k);
                assert_partition_invariants(&FoldPartitioner::partition_shuffled(n, k, 7)?, n, k);
                assert_partition_invariants(&FoldPartitioner::partition_stratified(&labels, k)?, n, k);
            }
        }
        Ok(())
    }

    #[test]
    fn invalid_fold_counts_are_configuration_errors() {
        assert!(matches!(FoldPartitioner::partition(10, 1), Err(SpamError::Configuration(_))));
        assert!(matches!(FoldPartitioner::partition(3, 4), Err(SpamError::Configuration(_))));
        assert!(matches!(
            FoldPartitioner::partition_stratified(&[1, 0], 3),
            Err(SpamError::Configuration(_))
        ));
    }

    #[test]
    fn shuffled_is_reproducible_per_seed() -> Result<()> {
        let a = FoldPartitioner::partition_shuffled(50, 5, 42)?;
        let b = FoldPartitioner::partition_shuffled(50, 5, 42)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn stratified_spreads_both_classes() -> Result<()> {
        // All spam first: a contiguous split would put every spam in fold 0.
        let labels = [1, 1, 1, 1, 0, 0, 0, 0];
        let assignment = FoldPartitioner::partition_stratified(&labels, 2)?;
        for fold in 0..2 {
            let spam = assignment
                .validation_indices(fold)
                .iter()
                .filter(|&&i| labels[i] == 1)
                .count();
            assert_eq!(spam, 2);
        }
        Ok(())
    }
}
