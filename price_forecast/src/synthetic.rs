//! Seeded synthetic price series for demos and tests
//!
//! Jitter comes only from here, through an explicit seed, so the
//! fitting and prediction paths stay deterministic.

use crate::data::{Observation, Series};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Daily price series with a linear trend, a yearly sine and Gaussian noise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSeries {
    /// First date of the series
    pub start: NaiveDate,
    /// Number of daily observations
    pub days: u32,
    /// Price level on the first day
    pub base: f64,
    /// Trend change per day
    pub slope: f64,
    /// Amplitude of the yearly cycle
    pub amplitude: f64,
    /// Standard deviation of the noise
    pub noise_sd: f64,
    /// Seed for the noise generator
    pub seed: u64,
}

impl Default for SyntheticSeries {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            days: 365,
            base: 1500.0,
            slope: 1.0,
            amplitude: 200.0,
            noise_sd: 25.0,
            seed: 42,
        }
    }
}

impl SyntheticSeries {
    /// Generate the series; prices are floored at zero
    pub fn generate(&self) -> Result<Series> {
        let noise = Normal::new(0.0, self.noise_sd).map_err(|e| {
            ForecastError::InvalidParameter(format!("Noise sd {}: {e}", self.noise_sd))
        })?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut observations = Vec::with_capacity(self.days as usize);
        for t in 0..self.days {
            let date = self
                .start
                .checked_add_days(Days::new(u64::from(t)))
                .ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "{} days from {} overflows the calendar",
                        self.days, self.start
                    ))
                })?;
            let phase = 2.0 * PI * f64::from(date.ordinal0()) / 365.25;
            let value = self.base
                + self.slope * f64::from(t)
                + self.amplitude * phase.sin()
                + rng.sample(noise);
            observations.push(Observation::new(date, value.max(0.0)));
        }

        Series::new(observations)
    }
}
