//! Ordinary least squares trend fitting
//!
//! Fits `y = intercept + slope * x` over arbitrary (not necessarily evenly
//! spaced) abscissae, which is what a dated price series needs.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// A fitted straight line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    slope: f64,
    intercept: f64,
    r_squared: f64,
}

impl TrendLine {
    /// Fit a line through the points `(xs[i], ys[i])`
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::InvalidInput(format!(
                "x has {} values but y has {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for a trend line. Need at least 2 points.".to_string(),
            ));
        }

        let n = xs.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = ys.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - (intercept + slope * x)).powi(2);
        }

        // A flat series is explained perfectly by a flat line.
        let r_squared = if ss_total < 1e-10 {
            1.0
        } else {
            1.0 - ss_residual / ss_total
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    /// Evaluate the line at `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Residuals `y - line(x)` for each point
    pub fn residuals(&self, xs: &[f64], ys: &[f64]) -> Vec<f64> {
        xs.iter()
            .zip(ys)
            .map(|(&x, &y)| y - self.value_at(x))
            .collect()
    }

    /// Get the slope (change in y per unit of x)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Get the R-squared value (coefficient of determination)
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }
}
