//! Crop norms: stage boundaries and ideal nutrient ranges per crop
//!
//! A [`NormsTable`] maps crop names to [`CropProfile`]s. Each profile is an
//! ordered list of [`StageBand`]s; a band covers ages from its
//! `starts_at_day` up to, but not including, the next band's start, and the
//! last band is open-ended. Tables are plain data and can be loaded from
//! JSON:
//!
//! ```json
//! {
//!   "tomato": {
//!     "stages": [
//!       {
//!         "stage": "seedling",
//!         "starts_at_day": 0,
//!         "ideal": {
//!           "nitrogen": { "low": 50.0, "high": 100.0 },
//!           "phosphorus": { "low": 30.0, "high": 60.0 },
//!           "potassium": { "low": 100.0, "high": 150.0 }
//!         }
//!       }
//!     ]
//!   }
//! }
//! ```

use crate::error::{AssessError, Result};
use crate::nutrient::{IdealRange, Nutrient};
use crate::stage::GrowthStage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Crop covered by the built-in table
pub const DEFAULT_CROP: &str = "tomato";

/// Ideal range for each nutrient at one stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageIdeal {
    pub nitrogen: IdealRange,
    pub phosphorus: IdealRange,
    pub potassium: IdealRange,
}

impl StageIdeal {
    /// Range for one nutrient
    pub fn get(&self, nutrient: Nutrient) -> IdealRange {
        match nutrient {
            Nutrient::Nitrogen => self.nitrogen,
            Nutrient::Phosphorus => self.phosphorus,
            Nutrient::Potassium => self.potassium,
        }
    }

    fn validate(&self) -> Result<()> {
        for nutrient in Nutrient::ALL {
            self.get(nutrient)
                .validate()
                .map_err(|e| in_context(e, &format!("{nutrient} range")))?;
        }
        Ok(())
    }
}

/// One growth stage with the age it starts at and its ideal ranges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageBand {
    pub stage: GrowthStage,
    pub starts_at_day: u32,
    pub ideal: StageIdeal,
}

impl StageBand {
    pub fn new(stage: GrowthStage, starts_at_day: u32, ideal: StageIdeal) -> Self {
        Self {
            stage,
            starts_at_day,
            ideal,
        }
    }
}

/// Stage partition and ideal ranges for one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    stages: Vec<StageBand>,
}

impl CropProfile {
    /// Create a profile from bands in age order
    pub fn new(stages: Vec<StageBand>) -> Result<Self> {
        let profile = Self { stages };
        profile.validate()?;
        Ok(profile)
    }

    /// Check that the bands partition `[0, inf)` in stage order
    pub fn validate(&self) -> Result<()> {
        let first = self
            .stages
            .first()
            .ok_or_else(|| AssessError::InvalidProfile("Profile has no stages".to_string()))?;
        if first.starts_at_day != 0 {
            return Err(AssessError::InvalidProfile(format!(
                "First stage {} starts at day {}, expected day 0",
                first.stage, first.starts_at_day
            )));
        }

        for pair in self.stages.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.starts_at_day <= prev.starts_at_day {
                return Err(AssessError::InvalidProfile(format!(
                    "Stage {} starts at day {}, not after {} at day {}",
                    next.stage, next.starts_at_day, prev.stage, prev.starts_at_day
                )));
            }
            if next.stage <= prev.stage {
                return Err(AssessError::InvalidProfile(format!(
                    "Stage {} listed after {}",
                    next.stage, prev.stage
                )));
            }
        }

        for band in &self.stages {
            band.ideal
                .validate()
                .map_err(|e| in_context(e, &format!("Stage {}", band.stage)))?;
        }
        Ok(())
    }

    /// Bands in age order
    pub fn stages(&self) -> &[StageBand] {
        &self.stages
    }

    /// Band whose age interval contains `age_days`
    pub fn band_for_age(&self, age_days: u32) -> Result<&StageBand> {
        self.stages
            .iter()
            .rev()
            .find(|band| band.starts_at_day <= age_days)
            .ok_or_else(|| {
                AssessError::InvalidProfile(format!("No stage covers day {age_days}"))
            })
    }

    /// Band for a stage, if the profile includes it
    pub fn band(&self, stage: GrowthStage) -> Option<&StageBand> {
        self.stages.iter().find(|band| band.stage == stage)
    }

    /// Age interval `[start, end)` of a stage; `end` is `None` for the last
    pub fn age_range(&self, stage: GrowthStage) -> Option<(u32, Option<u32>)> {
        let index = self.stages.iter().position(|band| band.stage == stage)?;
        let end = self.stages.get(index + 1).map(|next| next.starts_at_day);
        Some((self.stages[index].starts_at_day, end))
    }

    /// Built-in tomato norms (ppm)
    pub fn tomato() -> Self {
        let ideal = |n: (f64, f64), p: (f64, f64), k: (f64, f64)| StageIdeal {
            nitrogen: IdealRange { low: n.0, high: n.1 },
            phosphorus: IdealRange { low: p.0, high: p.1 },
            potassium: IdealRange { low: k.0, high: k.1 },
        };
        Self {
            stages: vec![
                StageBand::new(
                    GrowthStage::Seedling,
                    0,
                    ideal((50.0, 100.0), (30.0, 60.0), (100.0, 150.0)),
                ),
                StageBand::new(
                    GrowthStage::Vegetative,
                    30,
                    ideal((100.0, 150.0), (40.0, 70.0), (150.0, 200.0)),
                ),
                StageBand::new(
                    GrowthStage::Flowering,
                    60,
                    ideal((80.0, 120.0), (50.0, 80.0), (200.0, 250.0)),
                ),
                StageBand::new(
                    GrowthStage::Fruiting,
                    90,
                    ideal((70.0, 110.0), (40.0, 70.0), (250.0, 300.0)),
                ),
                StageBand::new(
                    GrowthStage::Maturity,
                    120,
                    ideal((50.0, 90.0), (30.0, 60.0), (200.0, 250.0)),
                ),
            ],
        }
    }
}

/// Crop profiles keyed by lowercase crop name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormsTable {
    crops: BTreeMap<String, CropProfile>,
}

impl NormsTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding only the built-in tomato profile
    pub fn builtin() -> Self {
        let mut crops = BTreeMap::new();
        crops.insert(DEFAULT_CROP.to_string(), CropProfile::tomato());
        Self { crops }
    }

    /// Parse and validate a table from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, CropProfile> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (name, profile) in raw {
            table.insert(&name, profile)?;
        }
        log::info!("Loaded norms for {} crops", table.len());
        Ok(table)
    }

    /// Load and validate a table from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the table to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add or replace a crop profile after validating it
    pub fn insert(&mut self, crop: &str, profile: CropProfile) -> Result<()> {
        let key = normalize(crop);
        if key.is_empty() {
            return Err(AssessError::InvalidProfile(
                "Crop name must not be empty".to_string(),
            ));
        }
        profile
            .validate()
            .map_err(|e| in_context(e, &format!("Crop '{key}'")))?;
        if self.crops.insert(key.clone(), profile).is_some() {
            log::debug!("Replaced norms for crop '{key}'");
        }
        Ok(())
    }

    /// Profile for a crop, matched case-insensitively
    pub fn crop(&self, crop: &str) -> Result<&CropProfile> {
        self.crops
            .get(&normalize(crop))
            .ok_or_else(|| AssessError::UnknownCrop(crop.to_string()))
    }

    /// Crop names in alphabetical order
    pub fn crop_names(&self) -> impl Iterator<Item = &str> {
        self.crops.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

/// Prefix a profile error message with where it was found
fn in_context(err: AssessError, context: &str) -> AssessError {
    match err {
        AssessError::InvalidProfile(msg) => {
            AssessError::InvalidProfile(format!("{context}: {msg}"))
        }
        other => other,
    }
}

fn normalize(crop: &str) -> String {
    crop.trim().to_lowercase()
}
