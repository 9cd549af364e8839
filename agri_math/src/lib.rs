//! # Agri Math
//!
//! Numeric building blocks shared by the price forecaster.
//! This crate provides ordinary least squares fits, a small dense
//! linear solver for normal equations and descriptive statistics.

use thiserror::Error;

pub mod linalg;
pub mod regression;
pub mod stats;

pub use regression::TrendLine;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Singular system: pivot {pivot:e} in column {column}")]
    Singular { column: usize, pivot: f64 },
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
