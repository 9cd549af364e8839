//! Forecasting models for price data

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod linear;
pub mod seasonal_trend;

/// Common interface for forecasting models
///
/// A model value holds only settings; [`ForecastModel::train`] produces a
/// separate fitted object that answers queries.
pub trait ForecastModel {
    /// Training data accepted by the model
    type Input: ?Sized;
    /// Fitted model produced by training
    type Trained;

    /// Train the model on historical data
    fn train(&self, data: &Self::Input) -> Result<Self::Trained>;

    /// Human readable model name
    fn name(&self) -> &str;
}

/// A request for the price distribution on a single date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastQuery {
    /// Date to forecast
    pub target_date: NaiveDate,
}

impl ForecastQuery {
    /// Create a new query for `target_date`
    pub fn new(target_date: NaiveDate) -> Self {
        Self { target_date }
    }
}

impl From<NaiveDate> for ForecastQuery {
    fn from(target_date: NaiveDate) -> Self {
        Self::new(target_date)
    }
}

/// Point estimate with an uncertainty band for one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Date the estimate is for
    pub date: NaiveDate,
    /// Mean price estimate
    pub point_estimate: f64,
    /// Lower edge of the band
    pub lower_bound: f64,
    /// Upper edge of the band
    pub upper_bound: f64,
}

impl ForecastResult {
    /// Width of the uncertainty band
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// Check whether `value` falls inside the band (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_bound && value <= self.upper_bound
    }

    /// Serialize the result to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
