//! Forecaster configuration

use crate::date::DateConvention;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Default forecast horizon past the last observation, in days
pub const DEFAULT_HORIZON_DAYS: i64 = 365;

/// Default coverage of the uncertainty band
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Periodic component to fit on top of the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalityMode {
    /// Choose from the span of the data
    #[default]
    Auto,
    /// Twelve calendar-month phases
    MonthOfYear,
    /// Seven weekday phases
    DayOfWeek,
    /// Trend only
    Disabled,
}

/// Settings for the trend/seasonal forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// How far past the last observation queries are answered
    pub horizon_days: i64,
    /// Coverage of the `[lower, upper]` band, strictly between 0 and 1
    pub confidence_level: f64,
    /// Seasonal component selection
    pub seasonality: SeasonalityMode,
    /// How numeric dates in input tables are read
    pub date_convention: DateConvention,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            seasonality: SeasonalityMode::Auto,
            date_convention: DateConvention::IsoOnly,
        }
    }
}

impl ForecastConfig {
    /// Set the forecast horizon in days
    pub fn with_horizon(mut self, days: i64) -> Result<Self> {
        if days < 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Horizon must be non-negative, got {days} days"
            )));
        }
        self.horizon_days = days;
        Ok(self)
    }

    /// Set the band coverage
    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }
        self.confidence_level = level;
        Ok(self)
    }

    /// Set the seasonal component
    pub fn with_seasonality(mut self, mode: SeasonalityMode) -> Self {
        self.seasonality = mode;
        self
    }

    /// Set the numeric date convention
    pub fn with_date_convention(mut self, convention: DateConvention) -> Self {
        self.date_convention = convention;
        self
    }

    /// Check values that may have come from deserialization
    pub fn validate(&self) -> Result<()> {
        self.clone().with_horizon(self.horizon_days)?;
        self.clone().with_confidence_level(self.confidence_level)?;
        Ok(())
    }

    /// Parse a configuration from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
