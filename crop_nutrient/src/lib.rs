//! # Crop Nutrient
//!
//! Growth-stage-aware nutrient assessment for crops.
//!
//! A crop's age picks its growth stage from a table-driven partition, and
//! each stage carries ideal N/P/K ranges. Readings are classified Low,
//! Optimal or High per nutrient, with an overall pass only when all three
//! are optimal.
//!
//! ## Quick Start
//!
//! ```rust
//! use crop_nutrient::{AssessmentEngine, GrowthStage, NutrientReading, Verdict};
//!
//! let engine = AssessmentEngine::default();
//! let stage = engine.resolve_stage(12)?;
//! assert_eq!(stage, GrowthStage::Seedling);
//!
//! let reading = NutrientReading::new(40.0, 45.0, 125.0)?;
//! let result = engine.classify(&reading, stage)?;
//! assert_eq!(result.verdicts[&crop_nutrient::Nutrient::Nitrogen], Verdict::Low);
//! assert!(!result.overall);
//! # Ok::<(), crop_nutrient::AssessError>(())
//! ```

pub mod engine;
pub mod error;
pub mod norms;
pub mod nutrient;
pub mod stage;

// Re-export commonly used types
pub use crate::engine::{AssessmentEngine, AssessmentResult, NutrientFinding};
pub use crate::error::{AssessError, Result};
pub use crate::norms::{CropProfile, NormsTable, StageBand, StageIdeal, DEFAULT_CROP};
pub use crate::nutrient::{IdealRange, Nutrient, NutrientReading, NutrientSample, Verdict};
pub use crate::stage::GrowthStage;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
