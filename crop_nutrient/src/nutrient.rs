//! Nutrients, readings and ideal ranges

use crate::error::{AssessError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macronutrients covered by a soil or tissue test
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    /// All nutrients in reporting order
    pub const ALL: [Nutrient; 3] = [
        Nutrient::Nitrogen,
        Nutrient::Phosphorus,
        Nutrient::Potassium,
    ];

    /// Chemical symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "N",
            Nutrient::Phosphorus => "P",
            Nutrient::Potassium => "K",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nutrient::Nitrogen => write!(f, "Nitrogen"),
            Nutrient::Phosphorus => write!(f, "Phosphorus"),
            Nutrient::Potassium => write!(f, "Potassium"),
        }
    }
}

/// Position of a measured value relative to its ideal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Below the ideal range
    Low,
    /// Inside the ideal range, bounds included
    Optimal,
    /// Above the ideal range
    High,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Low => write!(f, "Low"),
            Verdict::Optimal => write!(f, "Optimal"),
            Verdict::High => write!(f, "High"),
        }
    }
}

/// Closed interval `[low, high]` of recommended values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealRange {
    pub low: f64,
    pub high: f64,
}

impl IdealRange {
    /// Create a range, rejecting reversed, negative or non-finite bounds
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let range = Self { low, high };
        range.validate()?;
        Ok(range)
    }

    /// Check bounds that may have come from deserialization
    pub fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(AssessError::InvalidProfile(format!(
                "Range bounds must be finite, got [{}, {}]",
                self.low, self.high
            )));
        }
        if self.low < 0.0 {
            return Err(AssessError::InvalidProfile(format!(
                "Range bounds must be non-negative, got [{}, {}]",
                self.low, self.high
            )));
        }
        if self.low > self.high {
            return Err(AssessError::InvalidProfile(format!(
                "Range low {} exceeds high {}",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /// Classify a value; both bounds count as optimal
    pub fn classify(&self, value: f64) -> Verdict {
        if value < self.low {
            Verdict::Low
        } else if value > self.high {
            Verdict::High
        } else {
            Verdict::Optimal
        }
    }

    /// Signed distance to the nearest bound: negative below, positive above,
    /// zero inside
    pub fn deviation(&self, value: f64) -> f64 {
        if value < self.low {
            value - self.low
        } else if value > self.high {
            value - self.high
        } else {
            0.0
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.classify(value) == Verdict::Optimal
    }
}

/// Validated N/P/K measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientReading {
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
}

impl NutrientReading {
    /// Create a reading; every value must be finite and non-negative
    pub fn new(nitrogen: f64, phosphorus: f64, potassium: f64) -> Result<Self> {
        let reading = Self {
            nitrogen,
            phosphorus,
            potassium,
        };
        for nutrient in Nutrient::ALL {
            let value = reading.get(nutrient);
            if !value.is_finite() || value < 0.0 {
                return Err(AssessError::InvalidReading { nutrient, value });
            }
        }
        Ok(reading)
    }

    /// Value for one nutrient
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Nitrogen => self.nitrogen,
            Nutrient::Phosphorus => self.phosphorus,
            Nutrient::Potassium => self.potassium,
        }
    }

    pub fn nitrogen(&self) -> f64 {
        self.nitrogen
    }

    pub fn phosphorus(&self) -> f64 {
        self.phosphorus
    }

    pub fn potassium(&self) -> f64 {
        self.potassium
    }
}

/// Raw measurement as it arrives from a form or table, with each nutrient
/// possibly absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientSample {
    #[serde(default)]
    pub nitrogen: Option<f64>,
    #[serde(default)]
    pub phosphorus: Option<f64>,
    #[serde(default)]
    pub potassium: Option<f64>,
}

impl NutrientSample {
    /// Sample with all three values present
    pub fn complete(nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self {
            nitrogen: Some(nitrogen),
            phosphorus: Some(phosphorus),
            potassium: Some(potassium),
        }
    }

    fn get(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Nitrogen => self.nitrogen,
            Nutrient::Phosphorus => self.phosphorus,
            Nutrient::Potassium => self.potassium,
        }
    }
}

impl TryFrom<NutrientSample> for NutrientReading {
    type Error = AssessError;

    /// An absent value is an error, never a zero reading
    fn try_from(sample: NutrientSample) -> Result<Self> {
        let require = |nutrient: Nutrient| {
            sample
                .get(nutrient)
                .ok_or(AssessError::MissingNutrient(nutrient))
        };
        NutrientReading::new(
            require(Nutrient::Nitrogen)?,
            require(Nutrient::Phosphorus)?,
            require(Nutrient::Potassium)?,
        )
    }
}
