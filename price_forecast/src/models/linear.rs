//! Linear price model over categorical and continuous features
//!
//! `price = b0 + sum(b_i * feature_i)`. Categorical columns are one-hot
//! expanded with the alphabetically first level of each column dropped as
//! the reference level. Continuous columns are standardized for the solve
//! and coefficients are reported back in original units.
//!
//! A category never seen during fitting is rejected by default. With
//! [`UnseenCategoryPolicy::TreatAsReference`] it is encoded as all zeros,
//! i.e. it silently predicts like the reference level.

use crate::data::MISSING_CATEGORY;
use crate::error::{ForecastError, Result};
use crate::models::ForecastModel;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const MIN_ROWS: usize = 2;

/// Default ridge penalty; small enough to leave well-posed fits unchanged
pub const DEFAULT_RIDGE: f64 = 1e-8;

/// One observation's features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    categorical: BTreeMap<String, String>,
    continuous: BTreeMap<String, f64>,
}

impl FeatureRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a categorical feature; blank values become [`MISSING_CATEGORY`]
    pub fn with_category(mut self, name: &str, value: &str) -> Self {
        let value = value.trim();
        let value = if value.is_empty() {
            MISSING_CATEGORY
        } else {
            value
        };
        self.categorical.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a continuous feature
    pub fn with_value(mut self, name: &str, value: f64) -> Self {
        self.continuous.insert(name.to_string(), value);
        self
    }

    /// Add a date as a continuous day ordinal
    pub fn with_date(self, name: &str, date: NaiveDate) -> Self {
        self.with_value(name, f64::from(date.num_days_from_ce()))
    }

    /// Get the categorical features
    pub fn categorical(&self) -> &BTreeMap<String, String> {
        &self.categorical
    }

    /// Get the continuous features
    pub fn continuous(&self) -> &BTreeMap<String, f64> {
        &self.continuous
    }
}

/// What to do with a category level that was not present at fit time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseenCategoryPolicy {
    /// Fail with a dimension mismatch
    #[default]
    Reject,
    /// Encode as the reference level (all zeros)
    TreatAsReference,
}

/// Settings for the linear price model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearModelConfig {
    /// Ridge penalty on non-intercept coefficients
    pub ridge: f64,
    /// Handling of unseen category levels at prediction time
    pub unseen_category: UnseenCategoryPolicy,
}

impl Default for LinearModelConfig {
    fn default() -> Self {
        Self {
            ridge: DEFAULT_RIDGE,
            unseen_category: UnseenCategoryPolicy::Reject,
        }
    }
}

/// Rows and targets for fitting, checked for equal length
#[derive(Debug, Clone)]
pub struct TrainingSet {
    rows: Vec<FeatureRow>,
    targets: Vec<f64>,
}

impl TrainingSet {
    pub fn new(rows: Vec<FeatureRow>, targets: Vec<f64>) -> Result<Self> {
        if rows.len() != targets.len() {
            return Err(ForecastError::DimensionMismatch(format!(
                "{} feature rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }
        Ok(Self { rows, targets })
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Subset by row indices, e.g. from a train/test split
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let mut rows = Vec::with_capacity(indices.len());
        let mut targets = Vec::with_capacity(indices.len());
        for &i in indices {
            match (self.rows.get(i), self.targets.get(i)) {
                (Some(row), Some(&target)) => {
                    rows.push(row.clone());
                    targets.push(target);
                }
                _ => {
                    return Err(ForecastError::DimensionMismatch(format!(
                        "Row index {i} out of bounds for {} rows",
                        self.rows.len()
                    )))
                }
            }
        }
        Ok(Self { rows, targets })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ContinuousColumn {
    name: String,
    mean: f64,
    scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CategoricalColumn {
    name: String,
    reference: String,
    /// Non-reference levels, each with its own indicator column
    levels: Vec<String>,
}

/// Column layout learned at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FeatureSchema {
    continuous: Vec<ContinuousColumn>,
    categorical: Vec<CategoricalColumn>,
}

impl FeatureSchema {
    fn learn(rows: &[FeatureRow]) -> Result<Self> {
        let first = rows.first().ok_or(ForecastError::InsufficientData {
            required: MIN_ROWS,
            actual: 0,
        })?;
        let continuous_names: Vec<&String> = first.continuous.keys().collect();
        let categorical_names: Vec<&String> = first.categorical.keys().collect();

        for (i, row) in rows.iter().enumerate() {
            if !row.continuous.keys().eq(continuous_names.iter().copied())
                || !row.categorical.keys().eq(categorical_names.iter().copied())
            {
                return Err(ForecastError::DimensionMismatch(format!(
                    "Row {i} has a different set of feature columns than row 0"
                )));
            }
        }

        let mut continuous = Vec::with_capacity(continuous_names.len());
        for name in continuous_names {
            let values: Vec<f64> = rows.iter().map(|r| r.continuous[name]).collect();
            if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(ForecastError::InvalidObservation(format!(
                    "Feature '{name}' has non-finite value {bad}"
                )));
            }
            let mean = agri_math::stats::mean(&values)?;
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
            let sd = variance.sqrt();
            continuous.push(ContinuousColumn {
                name: name.clone(),
                mean,
                scale: if sd > 1e-12 { sd } else { 1.0 },
            });
        }

        let categorical = categorical_names
            .into_iter()
            .map(|name| {
                let levels: BTreeSet<&str> =
                    rows.iter().map(|r| r.categorical[name].as_str()).collect();
                let mut levels = levels.into_iter().map(str::to_string);
                let reference = levels.next().unwrap_or_else(|| MISSING_CATEGORY.to_string());
                CategoricalColumn {
                    name: name.clone(),
                    reference,
                    levels: levels.collect(),
                }
            })
            .collect();

        Ok(Self {
            continuous,
            categorical,
        })
    }

    /// Intercept plus one column per feature
    fn width(&self) -> usize {
        1 + self.continuous.len() + self.categorical.iter().map(|c| c.levels.len()).sum::<usize>()
    }

    fn feature_names(&self) -> Vec<String> {
        self.continuous
            .iter()
            .map(|c| c.name.clone())
            .chain(self.categorical.iter().flat_map(|c| {
                c.levels
                    .iter()
                    .map(move |level| format!("{}_{}", c.name, level))
            }))
            .collect()
    }

    fn encode(&self, row: &FeatureRow, policy: UnseenCategoryPolicy) -> Result<Vec<f64>> {
        let continuous_match = row.continuous.len() == self.continuous.len()
            && self
                .continuous
                .iter()
                .all(|c| row.continuous.contains_key(&c.name));
        let categorical_match = row.categorical.len() == self.categorical.len()
            && self
                .categorical
                .iter()
                .all(|c| row.categorical.contains_key(&c.name));
        if !continuous_match || !categorical_match {
            return Err(ForecastError::DimensionMismatch(format!(
                "Expected features {:?}, got {:?} and {:?}",
                self.column_names(),
                row.continuous.keys().collect::<Vec<_>>(),
                row.categorical.keys().collect::<Vec<_>>()
            )));
        }

        let mut encoded = Vec::with_capacity(self.width());
        encoded.push(1.0);

        for column in &self.continuous {
            let value = row.continuous[&column.name];
            if !value.is_finite() {
                return Err(ForecastError::InvalidObservation(format!(
                    "Feature '{}' has non-finite value {value}",
                    column.name
                )));
            }
            encoded.push((value - column.mean) / column.scale);
        }

        for column in &self.categorical {
            let value = &row.categorical[&column.name];
            let position = column.levels.iter().position(|l| l == value);
            if position.is_none() && *value != column.reference {
                match policy {
                    UnseenCategoryPolicy::Reject => {
                        return Err(ForecastError::DimensionMismatch(format!(
                            "Category '{value}' in column '{}' was not seen during fitting",
                            column.name
                        )))
                    }
                    UnseenCategoryPolicy::TreatAsReference => log::warn!(
                        "Category '{value}' in column '{}' was not seen during fitting; \
                         predicting as reference level '{}'",
                        column.name,
                        column.reference
                    ),
                }
            }
            for i in 0..column.levels.len() {
                encoded.push(if position == Some(i) { 1.0 } else { 0.0 });
            }
        }

        Ok(encoded)
    }

    fn column_names(&self) -> Vec<&str> {
        self.continuous
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.categorical.iter().map(|c| c.name.as_str()))
            .collect()
    }
}

/// Linear regression price model settings
#[derive(Debug, Clone)]
pub struct LinearPriceModel {
    /// Name of the model
    name: String,
    /// Solver and encoding settings
    config: LinearModelConfig,
}

impl LinearPriceModel {
    /// Create a new linear model
    pub fn new(config: LinearModelConfig) -> Result<Self> {
        if !config.ridge.is_finite() || config.ridge < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Ridge penalty must be finite and non-negative, got {}",
                config.ridge
            )));
        }
        Ok(Self {
            name: format!("Linear Regression (ridge={})", config.ridge),
            config,
        })
    }

    /// Fit on feature rows and their target prices
    pub fn fit(&self, rows: &[FeatureRow], targets: &[f64]) -> Result<LinearModel> {
        if rows.len() != targets.len() {
            return Err(ForecastError::DimensionMismatch(format!(
                "{} feature rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }
        if rows.len() < MIN_ROWS {
            return Err(ForecastError::InsufficientData {
                required: MIN_ROWS,
                actual: rows.len(),
            });
        }
        if let Some(bad) = targets.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(ForecastError::InvalidObservation(format!(
                "Target price {bad} must be a finite non-negative number"
            )));
        }

        let schema = FeatureSchema::learn(rows)?;
        let design = rows
            .iter()
            .map(|row| schema.encode(row, UnseenCategoryPolicy::Reject))
            .collect::<Result<Vec<_>>>()?;

        let coefficients =
            agri_math::linalg::least_squares(&design, targets, self.config.ridge, 1)?;

        log::debug!(
            "Fitted {} on {} rows with {} features",
            self.name,
            rows.len(),
            schema.width() - 1
        );

        Ok(LinearModel {
            name: self.name.clone(),
            schema,
            coefficients,
            unseen_category: self.config.unseen_category,
        })
    }
}

impl Default for LinearPriceModel {
    fn default() -> Self {
        Self {
            name: "Linear Regression".to_string(),
            config: LinearModelConfig::default(),
        }
    }
}

impl ForecastModel for LinearPriceModel {
    type Input = TrainingSet;
    type Trained = LinearModel;

    fn train(&self, data: &TrainingSet) -> Result<LinearModel> {
        self.fit(data.rows(), data.targets())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A fitted linear price model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    name: String,
    schema: FeatureSchema,
    /// Intercept first, in standardized feature space
    coefficients: Vec<f64>,
    unseen_category: UnseenCategoryPolicy,
}

impl LinearModel {
    /// Predict the price for one row
    pub fn predict(&self, row: &FeatureRow) -> Result<f64> {
        let encoded = self.schema.encode(row, self.unseen_category)?;
        Ok(encoded
            .iter()
            .zip(&self.coefficients)
            .map(|(x, b)| x * b)
            .sum())
    }

    /// Predict prices for many rows
    pub fn predict_batch(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Intercept in original feature units
    pub fn intercept(&self) -> f64 {
        let shift: f64 = self
            .schema
            .continuous
            .iter()
            .zip(&self.coefficients[1..])
            .map(|(c, b)| b * c.mean / c.scale)
            .sum();
        self.coefficients[0] - shift
    }

    /// Named coefficients in original feature units, intercept excluded
    pub fn coefficients(&self) -> Vec<(String, f64)> {
        let n_continuous = self.schema.continuous.len();
        self.schema
            .feature_names()
            .into_iter()
            .zip(&self.coefficients[1..])
            .enumerate()
            .map(|(i, (name, &b))| {
                let b = if i < n_continuous {
                    b / self.schema.continuous[i].scale
                } else {
                    b
                };
                (name, b)
            })
            .collect()
    }

    /// Names of the encoded features, in coefficient order
    pub fn feature_names(&self) -> Vec<String> {
        self.schema.feature_names()
    }

    /// Reference level dropped for each categorical column
    pub fn reference_levels(&self) -> Vec<(String, String)> {
        self.schema
            .categorical
            .iter()
            .map(|c| (c.name.clone(), c.reference.clone()))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serialize the model into an opaque blob for caller-owned storage
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Restore a model from [`LinearModel::to_blob`] output
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        let model: Self = serde_json::from_slice(blob)?;
        if model.coefficients.len() != model.schema.width() {
            return Err(ForecastError::DimensionMismatch(format!(
                "Blob has {} coefficients for {} columns",
                model.coefficients.len(),
                model.schema.width()
            )));
        }
        Ok(model)
    }
}
