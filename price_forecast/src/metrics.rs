//! Metrics and hold-out evaluation for forecast models

use crate::data::Series;
use crate::error::{ForecastError, Result};
use crate::models::linear::{LinearModel, TrainingSet};
use crate::models::seasonal_trend::FittedModel;
use crate::models::ForecastQuery;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Default hold-out share and shuffle seed
pub const DEFAULT_TEST_RATIO: f64 = 0.2;
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Calculate accuracy metrics for a forecast vs actual values
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::DimensionMismatch(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = forecast.len() as f64;

    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    // Zero actuals have no percentage error and are left out of the mean
    let percentage_errors: Vec<f64> = actual
        .iter()
        .zip(errors.iter())
        .filter(|(a, _)| **a != 0.0)
        .map(|(&a, &e)| (e.abs() / a.abs()) * 100.0)
        .collect();
    let mape = if percentage_errors.is_empty() {
        0.0
    } else {
        percentage_errors.iter().sum::<f64>() / percentage_errors.len() as f64
    };

    let smape = actual
        .iter()
        .zip(forecast.iter())
        .map(|(&a, &f)| {
            let abs_a = a.abs();
            let abs_f = f.abs();
            if abs_a + abs_f == 0.0 {
                0.0
            } else {
                200.0 * (a - f).abs() / (abs_a + abs_f)
            }
        })
        .sum::<f64>()
        / n;

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        mape,
        smape,
    })
}

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error over the non-zero actuals (0 when
    /// every actual is zero)
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        writeln!(f, "  SMAPE: {:.4}%", self.smape)?;
        Ok(())
    }
}

/// Shuffled train/test index split, reproducible for a given seed.
///
/// The test set holds `ceil(n * test_ratio)` indices; both sides are
/// non-empty.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Test ratio must be between 0 and 1, got {test_ratio}"
        )));
    }
    if n < 2 {
        return Err(ForecastError::InsufficientData {
            required: 2,
            actual: n,
        });
    }

    let test_size = ((n as f64 * test_ratio).ceil() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_size);
    Ok((train, indices))
}

/// Score a fitted linear model on a labelled set
pub fn evaluate_linear(model: &LinearModel, data: &TrainingSet) -> Result<ForecastAccuracy> {
    let predicted = model.predict_batch(data.rows())?;
    forecast_accuracy(&predicted, data.targets())
}

/// Score a fitted trend/seasonal model against observed values
pub fn evaluate_series(model: &FittedModel, actual: &Series) -> Result<ForecastAccuracy> {
    let predicted = actual
        .observations()
        .iter()
        .map(|o| Ok(model.predict(&ForecastQuery::new(o.date))?.point_estimate))
        .collect::<Result<Vec<f64>>>()?;
    forecast_accuracy(&predicted, &actual.values())
}
