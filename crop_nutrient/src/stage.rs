use crate::error::AssessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phase of crop development, ordered from planting to harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    Seedling,
    Vegetative,
    Flowering,
    Fruiting,
    Maturity,
}

impl GrowthStage {
    /// All stages in developmental order
    pub const ALL: [GrowthStage; 5] = [
        GrowthStage::Seedling,
        GrowthStage::Vegetative,
        GrowthStage::Flowering,
        GrowthStage::Fruiting,
        GrowthStage::Maturity,
    ];

    /// Lowercase identifier used in norms tables
    pub fn as_str(self) -> &'static str {
        match self {
            GrowthStage::Seedling => "seedling",
            GrowthStage::Vegetative => "vegetative",
            GrowthStage::Flowering => "flowering",
            GrowthStage::Fruiting => "fruiting",
            GrowthStage::Maturity => "maturity",
        }
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthStage::Seedling => write!(f, "Seedling"),
            GrowthStage::Vegetative => write!(f, "Vegetative"),
            GrowthStage::Flowering => write!(f, "Flowering"),
            GrowthStage::Fruiting => write!(f, "Fruiting"),
            GrowthStage::Maturity => write!(f, "Maturity"),
        }
    }
}

impl FromStr for GrowthStage {
    type Err = AssessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seedling" => Ok(GrowthStage::Seedling),
            "vegetative" => Ok(GrowthStage::Vegetative),
            "flowering" => Ok(GrowthStage::Flowering),
            "fruiting" => Ok(GrowthStage::Fruiting),
            "maturity" => Ok(GrowthStage::Maturity),
            _ => Err(AssessError::UnknownStage(s.to_string())),
        }
    }
}
