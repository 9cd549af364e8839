//! # Price Forecast
//!
//! Commodity price forecasting from historical market arrival data.
//!
//! ## Features
//!
//! - Date-ordered price series with strict date parsing
//! - Additive trend + seasonal model with a widening uncertainty band
//! - Linear regression over one-hot categorical and continuous features
//! - A caching [`Forecaster`] that refits only when the series changes
//! - Accuracy metrics and a seeded train/test split
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use price_forecast::{fit, predict, DateConvention, ForecastQuery, Series};
//!
//! let series = Series::from_records(
//!     &[("2021-01-01", 1200.0), ("2021-01-08", 1260.0), ("2021-01-15", 1310.0)],
//!     DateConvention::IsoOnly,
//! )?;
//! let model = fit(&series)?;
//!
//! let target = NaiveDate::from_ymd_opt(2021, 2, 1).unwrap();
//! let result = predict(&model, &ForecastQuery::new(target))?;
//! assert!(result.lower_bound <= result.point_estimate);
//! assert!(result.point_estimate <= result.upper_bound);
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod date;
pub mod error;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod synthetic;

// Re-export commonly used types
pub use crate::config::{ForecastConfig, SeasonalityMode};
pub use crate::data::{DataLoader, MarketRecord, Observation, Series};
pub use crate::date::{parse_date, DateConvention};
pub use crate::error::{ForecastError, Result};
pub use crate::forecaster::{fit, predict, Forecaster};
pub use crate::models::linear::{
    FeatureRow, LinearModel, LinearModelConfig, LinearPriceModel, TrainingSet,
    UnseenCategoryPolicy,
};
pub use crate::models::seasonal_trend::{FittedModel, Seasonality, SeasonalTrendModel};
pub use crate::models::{ForecastModel, ForecastQuery, ForecastResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
