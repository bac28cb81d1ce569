//! Dense linear solves for Newton steps.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinearSolveError {
    #[error("Singular matrix: pivot {pivot:e} in column {column}")]
    Singular { column: usize, pivot: f64 },
    #[error("Non-finite value in linear system")]
    NonFinite,
    #[error("Dimension mismatch: {rows}x{cols} matrix with {rhs} right-hand side entries")]
    DimensionMismatch { rows: usize, cols: usize, rhs: usize },
}

/// Solve the square system `a * x = b` by Gaussian elimination with
/// partial pivoting.
///
/// Pivots with magnitude below `pivot_threshold` report
/// [`LinearSolveError::Singular`].
pub fn gaussian_elimination(
    mut a: DMatrix<f64>,
    mut b: DVector<f64>,
    pivot_threshold: f64,
) -> Result<DVector<f64>, LinearSolveError> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return Err(LinearSolveError::DimensionMismatch {
            rows: a.nrows(),
            cols: a.ncols(),
            rhs: b.len(),
        });
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(LinearSolveError::NonFinite);
    }

    for col in 0..n {
        let mut pivot_row = col;
        for row in col + 1..n {
            if a[(row, col)].abs() > a[(pivot_row, col)].abs() {
                pivot_row = row;
            }
        }

        let pivot = a[(pivot_row, col)];
        if pivot.abs() < pivot_threshold {
            return Err(LinearSolveError::Singular { column: col, pivot });
        }
        if pivot_row != col {
            a.swap_rows(pivot_row, col);
            b.swap_rows(pivot_row, col);
        }

        for row in col + 1..n {
            let factor = a[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in col..n {
                a[(row, c)] -= factor * a[(col, c)];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = DVector::zeros(n);
    for row in (0..n).rev() {
        let mut sum = b[row];
        for c in row + 1..n {
            sum -= a[(row, c)] * x[c];
        }
        x[row] = sum / a[(row, row)];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(LinearSolveError::NonFinite);
    }
    Ok(x)
}

/// Newton step `s` with `jacobian * s ≈ residuals`.
///
/// Square systems are solved directly. With fewer equations than unknowns
/// the minimum-norm step `Jᵀ(JJᵀ)⁻¹r` is taken; with more, the
/// least-squares step `(JᵀJ)⁻¹Jᵀr`.
pub fn newton_step(
    jacobian: &DMatrix<f64>,
    residuals: &DVector<f64>,
    pivot_threshold: f64,
) -> Result<DVector<f64>, LinearSolveError> {
    let (m, n) = jacobian.shape();
    if residuals.len() != m {
        return Err(LinearSolveError::DimensionMismatch {
            rows: m,
            cols: n,
            rhs: residuals.len(),
        });
    }
    if jacobian.iter().chain(residuals.iter()).any(|v| !v.is_finite()) {
        return Err(LinearSolveError::NonFinite);
    }

    if m == n {
        gaussian_elimination(jacobian.clone(), residuals.clone(), pivot_threshold)
    } else if m < n {
        let jt = jacobian.transpose();
        let multipliers = gaussian_elimination(jacobian * &jt, residuals.clone(), pivot_threshold)?;
        Ok(jt * multipliers)
    } else {
        let jt = jacobian.transpose();
        gaussian_elimination(&jt * jacobian, jt * residuals, pivot_threshold)
    }
}
