//! Additive trend + seasonal price model
//!
//! `price(t) = trend(t) + seasonal(phase(t)) + noise`, where the trend is an
//! OLS line over days since the first observation and the seasonal term is
//! the mean detrended residual of each calendar phase (month of year or day
//! of week). The band around the point estimate is
//! `z * sigma * sqrt(1 + days_past_last / cadence)`, so it widens with
//! distance from the data and never shrinks.

use crate::config::{ForecastConfig, SeasonalityMode};
use crate::data::Series;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastQuery, ForecastResult};
use agri_math::TrendLine;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

const MIN_OBSERVATIONS: usize = 2;
const MIN_PHASE_OBSERVATIONS: usize = 2;
const MIN_SPREAD_OBSERVATIONS: usize = 3;
const YEARLY_MIN_SPAN_DAYS: i64 = 730;
const WEEKLY_MIN_SPAN_DAYS: i64 = 14;
const WEEKLY_MAX_SPACING_DAYS: f64 = 7.0;

/// Seasonal phase structure actually used by a fitted model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seasonality {
    MonthOfYear,
    DayOfWeek,
    Disabled,
}

impl Seasonality {
    /// Pick the seasonal structure for a series with the given span and spacing
    pub fn resolve(mode: SeasonalityMode, span_days: i64, spacing_days: f64) -> Self {
        match mode {
            SeasonalityMode::MonthOfYear => Seasonality::MonthOfYear,
            SeasonalityMode::DayOfWeek => Seasonality::DayOfWeek,
            SeasonalityMode::Disabled => Seasonality::Disabled,
            SeasonalityMode::Auto => {
                if span_days >= YEARLY_MIN_SPAN_DAYS {
                    Seasonality::MonthOfYear
                } else if span_days >= WEEKLY_MIN_SPAN_DAYS
                    && spacing_days < WEEKLY_MAX_SPACING_DAYS
                {
                    Seasonality::DayOfWeek
                } else {
                    Seasonality::Disabled
                }
            }
        }
    }

    /// Number of phases in one cycle
    pub fn phases(self) -> usize {
        match self {
            Seasonality::MonthOfYear => 12,
            Seasonality::DayOfWeek => 7,
            Seasonality::Disabled => 0,
        }
    }

    /// Phase index of `date` within the cycle
    pub fn phase(self, date: NaiveDate) -> Option<usize> {
        match self {
            Seasonality::MonthOfYear => Some(date.month0() as usize),
            Seasonality::DayOfWeek => Some(date.weekday().num_days_from_monday() as usize),
            Seasonality::Disabled => None,
        }
    }
}

/// Trend + seasonal model settings
#[derive(Debug, Clone)]
pub struct SeasonalTrendModel {
    /// Name of the model
    name: String,
    /// Fitting and query settings
    config: ForecastConfig,
}

impl SeasonalTrendModel {
    /// Create a new model with validated settings
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: format!(
                "Seasonal Trend ({:?}, {}% band)",
                config.seasonality,
                config.confidence_level * 100.0
            ),
            config,
        })
    }

    /// Get the model settings
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}

impl Default for SeasonalTrendModel {
    fn default() -> Self {
        Self {
            name: "Seasonal Trend".to_string(),
            config: ForecastConfig::default(),
        }
    }
}

impl ForecastModel for SeasonalTrendModel {
    type Input = Series;
    type Trained = FittedModel;

    fn train(&self, series: &Series) -> Result<FittedModel> {
        let observations = series.observations();
        let n = observations.len();
        if n < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: n,
            });
        }

        let origin = observations[0].date;
        let last_date = observations[n - 1].date;
        let xs: Vec<f64> = observations
            .iter()
            .map(|o| (o.date - origin).num_days() as f64)
            .collect();
        let ys = series.values();

        let trend = TrendLine::fit(&xs, &ys)?;
        let detrended = trend.residuals(&xs, &ys);

        let cadence_days = series.median_spacing_days().unwrap_or(1.0).max(1.0);
        let seasonality =
            Seasonality::resolve(self.config.seasonality, series.span_days(), cadence_days);

        // Mean detrended residual per phase
        let phases = seasonality.phases();
        let mut sums = vec![0.0; phases];
        let mut counts = vec![0usize; phases];
        for (obs, r) in observations.iter().zip(&detrended) {
            if let Some(p) = seasonality.phase(obs.date) {
                sums[p] += r;
                counts[p] += 1;
            }
        }
        let seasonal_effects: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(&sum, &count)| {
                if count >= MIN_PHASE_OBSERVATIONS {
                    sum / count as f64
                } else {
                    0.0
                }
            })
            .collect();

        let remainder: Vec<f64> = observations
            .iter()
            .zip(&detrended)
            .map(|(obs, r)| r - effect_for(seasonality, &seasonal_effects, obs.date))
            .collect();
        // A line through two points has no residual spread to estimate
        let residual_std = if n < MIN_SPREAD_OBSERVATIONS {
            0.0
        } else {
            agri_math::stats::sample_std_dev(&remainder)?
        };

        let z_score = z_for(self.config.confidence_level)?;

        log::debug!(
            "Fitted {} on {} observations: slope {:.4}/day, {:?}, residual sd {:.4}",
            self.name,
            n,
            trend.slope(),
            seasonality,
            residual_std
        );

        Ok(FittedModel {
            name: self.name.clone(),
            origin,
            last_date,
            horizon_days: self.config.horizon_days,
            trend,
            seasonality,
            seasonal_effects,
            residual_std,
            cadence_days,
            confidence_level: self.config.confidence_level,
            z_score,
            n_observations: n,
            fingerprint: series.fingerprint(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn effect_for(seasonality: Seasonality, effects: &[f64], date: NaiveDate) -> f64 {
    seasonality
        .phase(date)
        .and_then(|p| effects.get(p).copied())
        .unwrap_or(0.0)
}

/// Two-sided standard normal quantile for a coverage level
fn z_for(confidence_level: f64) -> Result<f64> {
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + confidence_level / 2.0))
}

/// Trend, seasonal and residual components of a series under a fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub dates: Vec<NaiveDate>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

/// A fitted trend + seasonal model
///
/// Immutable once built; share it behind an `Arc` to serve concurrent
/// predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    name: String,
    origin: NaiveDate,
    last_date: NaiveDate,
    horizon_days: i64,
    trend: TrendLine,
    seasonality: Seasonality,
    seasonal_effects: Vec<f64>,
    residual_std: f64,
    cadence_days: f64,
    confidence_level: f64,
    z_score: f64,
    n_observations: usize,
    fingerprint: u64,
}

impl FittedModel {
    /// Price distribution on the query date.
    ///
    /// Fails with [`ForecastError::DateOutOfRange`] before the first
    /// observation or past the horizon; the date is never clamped.
    pub fn predict(&self, query: &ForecastQuery) -> Result<ForecastResult> {
        let date = query.target_date;
        let latest = self.horizon_end();
        if date < self.origin || date > latest {
            return Err(ForecastError::DateOutOfRange {
                date,
                earliest: self.origin,
                latest,
            });
        }

        let point_estimate = self.point_estimate(date);
        let half_width = self.half_width(date);

        Ok(ForecastResult {
            date,
            point_estimate,
            lower_bound: point_estimate - half_width,
            upper_bound: point_estimate + half_width,
        })
    }

    /// Predict each date in turn, failing on the first out-of-range date
    pub fn predict_many(&self, dates: &[NaiveDate]) -> Result<Vec<ForecastResult>> {
        dates
            .iter()
            .map(|&d| self.predict(&ForecastQuery::new(d)))
            .collect()
    }

    /// Daily forecasts for the `days` days after the last observation
    pub fn forecast_days(&self, days: u32) -> Result<Vec<ForecastResult>> {
        (1..=u64::from(days))
            .map(|offset| {
                let date = self
                    .last_date
                    .checked_add_days(Days::new(offset))
                    .ok_or_else(|| {
                        ForecastError::InvalidParameter(format!(
                            "{days} days past {} overflows the calendar",
                            self.last_date
                        ))
                    })?;
                self.predict(&ForecastQuery::new(date))
            })
            .collect()
    }

    /// Split `series` into trend, seasonal and residual parts
    pub fn decompose(&self, series: &Series) -> Result<Decomposition> {
        let mut out = Decomposition {
            dates: Vec::with_capacity(series.len()),
            trend: Vec::with_capacity(series.len()),
            seasonal: Vec::with_capacity(series.len()),
            residual: Vec::with_capacity(series.len()),
        };

        for obs in series.observations() {
            if obs.date < self.origin {
                return Err(ForecastError::DateOutOfRange {
                    date: obs.date,
                    earliest: self.origin,
                    latest: self.horizon_end(),
                });
            }
            let trend = self.trend.value_at(self.days_since_origin(obs.date));
            let seasonal = effect_for(self.seasonality, &self.seasonal_effects, obs.date);
            out.dates.push(obs.date);
            out.trend.push(trend);
            out.seasonal.push(seasonal);
            out.residual.push(obs.value - trend - seasonal);
        }

        Ok(out)
    }

    /// Serialize the model into an opaque blob for caller-owned storage
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Restore a model from [`FittedModel::to_blob`] output
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        let model: Self = serde_json::from_slice(blob)?;
        if model.seasonal_effects.len() != model.seasonality.phases() {
            return Err(ForecastError::InvalidParameter(format!(
                "Blob has {} seasonal effects for {:?}",
                model.seasonal_effects.len(),
                model.seasonality
            )));
        }
        if !(model.residual_std.is_finite() && model.residual_std >= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Blob has an invalid residual standard deviation".to_string(),
            ));
        }
        Ok(model)
    }

    /// Last date queries are answered for
    pub fn horizon_end(&self) -> NaiveDate {
        self.last_date
            .checked_add_days(Days::new(self.horizon_days.max(0) as u64))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_date(&self) -> NaiveDate {
        self.origin
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    /// Trend change per day
    pub fn slope_per_day(&self) -> f64 {
        self.trend.slope()
    }

    /// R-squared of the trend line alone
    pub fn r_squared(&self) -> f64 {
        self.trend.r_squared()
    }

    pub fn seasonality(&self) -> Seasonality {
        self.seasonality
    }

    /// Additive effect per phase, indexed as in [`Seasonality::phase`]
    pub fn seasonal_effects(&self) -> &[f64] {
        &self.seasonal_effects
    }

    /// Sample standard deviation of the in-sample residuals
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    /// Fingerprint of the series the model was fitted on
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    fn days_since_origin(&self, date: NaiveDate) -> f64 {
        (date - self.origin).num_days() as f64
    }

    fn point_estimate(&self, date: NaiveDate) -> f64 {
        self.trend.value_at(self.days_since_origin(date))
            + effect_for(self.seasonality, &self.seasonal_effects, date)
    }

    fn half_width(&self, date: NaiveDate) -> f64 {
        let elapsed = (date - self.last_date).num_days().max(0) as f64;
        self.z_score * self.residual_std * (1.0 + elapsed / self.cadence_days).sqrt()
    }
}
