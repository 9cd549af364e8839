//! Caching front end for the trend/seasonal model
//!
//! Fitting costs grow with series length while prediction is cheap, so a
//! [`Forecaster`] keeps the last fitted model and reuses it for as long as
//! the series it was fitted on is unchanged. The cached model sits behind an
//! `RwLock<Option<Arc<_>>>`: a refit swaps the `Arc` under the write lock,
//! and callers that already hold the previous `Arc` keep predicting from it.

use crate::config::ForecastConfig;
use crate::data::Series;
use crate::error::Result;
use crate::models::seasonal_trend::{FittedModel, SeasonalTrendModel};
use crate::models::{ForecastModel, ForecastQuery, ForecastResult};
use chrono::NaiveDate;
use std::sync::{Arc, PoisonError, RwLock};

/// Fit a trend/seasonal model with the default configuration
pub fn fit(series: &Series) -> Result<FittedModel> {
    SeasonalTrendModel::default().train(series)
}

/// Price distribution on the query date under `model`
pub fn predict(model: &FittedModel, query: &ForecastQuery) -> Result<ForecastResult> {
    model.predict(query)
}

/// Trend/seasonal forecaster with a single-entry model cache
#[derive(Debug)]
pub struct Forecaster {
    model: SeasonalTrendModel,
    cache: RwLock<Option<Arc<FittedModel>>>,
}

impl Forecaster {
    /// Create a forecaster with validated settings
    pub fn new(config: ForecastConfig) -> Result<Self> {
        Ok(Self {
            model: SeasonalTrendModel::new(config)?,
            cache: RwLock::new(None),
        })
    }

    /// Get the forecaster settings
    pub fn config(&self) -> &ForecastConfig {
        self.model.config()
    }

    /// Fitted model for `series`, reusing the cached one when the series
    /// is unchanged
    pub fn fit(&self, series: &Series) -> Result<Arc<FittedModel>> {
        let fingerprint = series.fingerprint();

        if let Some(model) = self.cached() {
            if model.fingerprint() == fingerprint {
                log::debug!("Reusing cached model for series {fingerprint:016x}");
                return Ok(model);
            }
        }

        log::debug!("Fitting model for series {fingerprint:016x}");
        let fitted = Arc::new(self.model.train(series)?);

        let mut slot = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::clone(&fitted));
        Ok(fitted)
    }

    /// Fit (or reuse) the model for `series` and predict `date`
    pub fn predict(&self, series: &Series, date: NaiveDate) -> Result<ForecastResult> {
        self.fit(series)?.predict(&ForecastQuery::new(date))
    }

    /// The currently cached model, if any
    pub fn cached(&self) -> Option<Arc<FittedModel>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop the cached model so the next fit starts fresh
    pub fn invalidate(&self) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self {
            model: SeasonalTrendModel::default(),
            cache: RwLock::new(None),
        }
    }
}
