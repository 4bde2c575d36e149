// src/utils.rs

use ndarray::{Array1, Array2};

use crate::core::{Result, SpamError};

/// Solves `a * x = b` for a square system.
pub fn solve_linear_system(a: Array2<f64>, b: Array1<f64>) -> Result<Array1<f64>> {
    if a.nrows() != a.ncols() || a.nrows() != b.len() {
        return Err(SpamError::IncompatibleDimensions(format!(
            "Cannot solve a {}x{} system against a right-hand side of length {}.",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }

    #[cfg(feature = "linalg")]
    {
        use ndarray_linalg::Solve;
        a.solve_into(b)
            .map_err(|e| SpamError::ModelFit(format!("Linear solve failed: {}", e)))
    }
    #[cfg(not(feature = "linalg"))]
    {
        gaussian_elimination(a, b)
    }
}

/// Gaussian elimination with partial pivoting.
#[cfg_attr(feature = "linalg", allow(dead_code))]
fn gaussian_elimination(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();

    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if a[[row, col]].abs() > a[[pivot, col]].abs() {
                pivot = row;
            }
        }
        if a[[pivot, col]].abs() < 1e-12 {
            return Err(SpamError::ModelFit(format!(
                "Singular system: no usable pivot in column {}.",
                col
            )));
        }
        if pivot != col {
            for j in 0..n {
                a.swap([col, j], [pivot, j]);
            }
            b.swap(col, pivot);
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                a[[row, j]] -= factor * a[[col, j]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let mut sum = b[row];
        for j in (row + 1)..n {
            sum -= a[[row, j]] * x[j];
        }
        x[row] = sum / a[[row, row]];
    }
    Ok(x)
}
