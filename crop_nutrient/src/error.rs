use crate::nutrient::Nutrient;
use crate::stage::GrowthStage;
use thiserror::Error;

/// Errors raised while resolving stages and classifying readings
#[derive(Debug, Error)]
pub enum AssessError {
    #[error("Invalid crop age: {0} days (must be non-negative)")]
    InvalidAge(i64),

    #[error("Missing nutrient reading: {0}")]
    MissingNutrient(Nutrient),

    #[error("Invalid {nutrient} reading {value}: must be a finite non-negative number")]
    InvalidReading { nutrient: Nutrient, value: f64 },

    #[error("Unknown crop: {0}")]
    UnknownCrop(String),

    #[error("Unknown growth stage: {0}")]
    UnknownStage(String),

    #[error("Stage {stage} is not configured for crop '{crop}'")]
    StageNotConfigured { crop: String, stage: GrowthStage },

    #[error("Invalid crop profile: {0}")]
    InvalidProfile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for assessment operations
pub type Result<T> = std::result::Result<T, AssessError>;
