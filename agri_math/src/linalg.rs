//! Dense linear algebra for small least-squares problems

use crate::{MathError, Result};

const PIVOT_EPSILON: f64 = 1e-12;

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// `a` must be square with the same number of rows as `b`.
pub fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(format!(
            "Expected a {n}x{n} system"
        )));
    }

    for col in 0..n {
        // Largest remaining entry in this column becomes the pivot
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        let pivot = a[pivot_row][col];
        if pivot.abs() < PIVOT_EPSILON {
            return Err(MathError::Singular { column: col, pivot });
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    Ok(x)
}

/// Least-squares coefficients for `design * beta ≈ target`.
///
/// Builds the normal equations `(XᵀX + λI) β = Xᵀy`. The first `unpenalized`
/// columns (typically the intercept) are left out of the ridge term.
pub fn least_squares(
    design: &[Vec<f64>],
    target: &[f64],
    ridge: f64,
    unpenalized: usize,
) -> Result<Vec<f64>> {
    if design.len() != target.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but target has {}",
            design.len(),
            target.len()
        )));
    }
    let p = match design.first() {
        Some(row) => row.len(),
        None => {
            return Err(MathError::InsufficientData(
                "Cannot fit a model on zero rows".to_string(),
            ))
        }
    };
    if design.iter().any(|row| row.len() != p) {
        return Err(MathError::InvalidInput(
            "Design rows have differing widths".to_string(),
        ));
    }
    if ridge < 0.0 || !ridge.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "Ridge penalty must be finite and non-negative, got {ridge}"
        )));
    }

    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for (row, &y) in design.iter().zip(target) {
        for i in 0..p {
            xty[i] += row[i] * y;
            for j in i..p {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            xtx[i][j] = xtx[j][i];
        }
        if i >= unpenalized {
            xtx[i][i] += ridge;
        }
    }

    solve(xtx, xty)
}
