//! Stage resolution and nutrient classification

use crate::error::{AssessError, Result};
use crate::norms::{CropProfile, NormsTable, DEFAULT_CROP};
use crate::nutrient::{IdealRange, Nutrient, NutrientReading, NutrientSample, Verdict};
use crate::stage::GrowthStage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Verdict for one nutrient together with what it was judged against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientFinding {
    pub nutrient: Nutrient,
    pub value: f64,
    pub ideal: IdealRange,
    pub verdict: Verdict,
    /// Signed distance to the nearest bound; 0 when optimal
    pub deviation: f64,
}

/// Outcome of classifying a reading at a growth stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub stage: GrowthStage,
    pub verdicts: BTreeMap<Nutrient, Verdict>,
    /// True only when every nutrient is optimal
    pub overall: bool,
    pub findings: Vec<NutrientFinding>,
}

impl AssessmentResult {
    /// Verdict for one nutrient
    pub fn verdict(&self, nutrient: Nutrient) -> Option<Verdict> {
        self.verdicts.get(&nutrient).copied()
    }

    /// Findings outside their ideal range
    pub fn off_range(&self) -> Vec<&NutrientFinding> {
        self.findings
            .iter()
            .filter(|f| f.verdict != Verdict::Optimal)
            .collect()
    }
}

/// Classifies nutrient readings against one crop's norms
///
/// Immutable after construction, so one engine can serve many threads.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    crop: String,
    profile: CropProfile,
}

impl AssessmentEngine {
    /// Create an engine for a validated crop profile
    pub fn new(crop: &str, profile: CropProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self {
            crop: crop.trim().to_lowercase(),
            profile,
        })
    }

    /// Create an engine for one crop of a norms table
    pub fn from_table(table: &NormsTable, crop: &str) -> Result<Self> {
        let profile = table.crop(crop)?.clone();
        Self::new(crop, profile)
    }

    pub fn crop(&self) -> &str {
        &self.crop
    }

    pub fn profile(&self) -> &CropProfile {
        &self.profile
    }

    /// Growth stage for a crop age in days.
    ///
    /// Each stage covers `[start, next_start)`: with the default tomato
    /// table day 29 is still Seedling and day 30 is Vegetative.
    pub fn resolve_stage(&self, age_days: i64) -> Result<GrowthStage> {
        if age_days < 0 {
            return Err(AssessError::InvalidAge(age_days));
        }
        let age = u32::try_from(age_days).unwrap_or(u32::MAX);
        Ok(self.profile.band_for_age(age)?.stage)
    }

    /// Classify a reading against the ideal ranges of `stage`
    pub fn classify(
        &self,
        reading: &NutrientReading,
        stage: GrowthStage,
    ) -> Result<AssessmentResult> {
        let band = self
            .profile
            .band(stage)
            .ok_or_else(|| AssessError::StageNotConfigured {
                crop: self.crop.clone(),
                stage,
            })?;

        let findings: Vec<NutrientFinding> = Nutrient::ALL
            .iter()
            .map(|&nutrient| {
                let value = reading.get(nutrient);
                let ideal = band.ideal.get(nutrient);
                NutrientFinding {
                    nutrient,
                    value,
                    ideal,
                    verdict: ideal.classify(value),
                    deviation: ideal.deviation(value),
                }
            })
            .collect();

        let verdicts: BTreeMap<Nutrient, Verdict> =
            findings.iter().map(|f| (f.nutrient, f.verdict)).collect();
        let overall = findings.iter().all(|f| f.verdict == Verdict::Optimal);

        log::debug!(
            "Classified {} reading at {}: N {} P {} K {}",
            self.crop,
            stage,
            verdicts[&Nutrient::Nitrogen],
            verdicts[&Nutrient::Phosphorus],
            verdicts[&Nutrient::Potassium]
        );

        Ok(AssessmentResult {
            stage,
            verdicts,
            overall,
            findings,
        })
    }

    /// Classify raw N/P/K values at `stage`
    pub fn classify_values(
        &self,
        nitrogen: f64,
        phosphorus: f64,
        potassium: f64,
        stage: GrowthStage,
    ) -> Result<AssessmentResult> {
        let reading = NutrientReading::new(nitrogen, phosphorus, potassium)?;
        self.classify(&reading, stage)
    }

    /// Validate a raw sample, resolve the stage from age and classify
    pub fn assess(&self, sample: NutrientSample, age_days: i64) -> Result<AssessmentResult> {
        let stage = self.resolve_stage(age_days)?;
        let reading = NutrientReading::try_from(sample)?;
        self.classify(&reading, stage)
    }
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self {
            crop: DEFAULT_CROP.to_string(),
            profile: CropProfile::tomato(),
        }
    }
}
