//! # AgriSight
//!
//! `agrisight` bundles the commodity price forecaster and the crop nutrient
//! assessment engine behind one dependency.
//!
//! Each engine sits behind a cargo feature (`forecasting`, `assessment`),
//! both enabled by default. The engines are independent: neither consumes
//! the other's output.
//!
//! ## Example
//!
//! ```
//! # #[cfg(all(feature = "forecasting", feature = "assessment"))]
//! # {
//! use agrisight::prelude::*;
//!
//! let series = SyntheticSeries::default().generate().unwrap();
//! let model = fit(&series).unwrap();
//! let result = predict(&model, &ForecastQuery::new(model.last_date())).unwrap();
//! assert!(result.lower_bound <= result.upper_bound);
//!
//! let engine = AssessmentEngine::default();
//! let verdict = engine.assess(NutrientSample::complete(75.0, 45.0, 125.0), 10).unwrap();
//! assert!(verdict.overall);
//! # }
//! ```

pub use agri_math;

#[cfg(feature = "forecasting")]
pub use price_forecast;

#[cfg(feature = "assessment")]
pub use crop_nutrient;

/// Commonly used types from every enabled engine
pub mod prelude {
    #[cfg(feature = "forecasting")]
    pub use price_forecast::synthetic::SyntheticSeries;
    #[cfg(feature = "forecasting")]
    pub use price_forecast::{
        fit, predict, DataLoader, DateConvention, FeatureRow, FittedModel, ForecastConfig,
        ForecastError, ForecastQuery, ForecastResult, Forecaster, LinearPriceModel, Series,
    };

    #[cfg(feature = "assessment")]
    pub use crop_nutrient::{
        AssessError, AssessmentEngine, AssessmentResult, GrowthStage, NormsTable, Nutrient,
        NutrientReading, NutrientSample, Verdict,
    };
}

/// Engines compiled into this build
pub fn engines() -> Vec<&'static str> {
    let mut engines = Vec::new();
    if cfg!(feature = "forecasting") {
        engines.push("forecasting");
    }
    if cfg!(feature = "assessment") {
        engines.push("assessment");
    }
    engines
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
