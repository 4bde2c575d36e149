// src/traits.rs
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::core::Result;

/// A binary classifier over dense feature rows.
///
/// Implementors hold only hyper-parameters. All learned state lives in the
/// returned [`Classifier::Model`], so one classifier value can be fit once per
/// fold without anything leaking from fold to fold.
pub trait Classifier {
    type Model;

    /// Learns a model from rows `x` and targets `y` (`1` = spam, `0` = ham).
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, u8>) -> Result<Self::Model>;

    /// Predicts a target for every row of `x`.
    fn predict(&self, model: &Self::Model, x: ArrayView2<'_, f64>) -> Result<Array1<u8>>;
}

/// `Send` when folds run on the rayon pool, no bound otherwise.
#[cfg(feature = "parallel")]
pub trait MaybeSend: Send {}
#[cfg(feature = "parallel")]
impl<T: Send> MaybeSend for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSend {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSend for T {}

/// `Sync` when folds run on the rayon pool, no bound otherwise.
#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}
#[cfg(feature = "parallel")]
impl<T: Sync> MaybeSync for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSync for T {}
