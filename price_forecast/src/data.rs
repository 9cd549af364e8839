//! Historical price observations and tabular market data loading

use crate::date::{parse_date, DateConvention};
use crate::error::{ForecastError, Result};
use crate::models::linear::FeatureRow;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::io::Read;
use std::path::Path;

/// Placeholder used for blank market or variety cells
pub const MISSING_CATEGORY: &str = "Unknown";

/// A single dated price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Observed price (non-negative)
    pub value: f64,
}

impl Observation {
    /// Create a new observation
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Date-ordered price observations with at most one value per date
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    /// Build a series, sorting by date.
    ///
    /// When two observations share a date the later one in `observations`
    /// wins. Negative or non-finite values are rejected.
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        let input_len = observations.len();
        let mut by_date = BTreeMap::new();

        for obs in observations {
            if !obs.value.is_finite() || obs.value < 0.0 {
                return Err(ForecastError::InvalidObservation(format!(
                    "Value {} on {} must be a finite non-negative number",
                    obs.value, obs.date
                )));
            }
            by_date.insert(obs.date, obs.value);
        }

        if by_date.len() < input_len {
            log::warn!(
                "Collapsed {} duplicate date(s), keeping the last value for each",
                input_len - by_date.len()
            );
        }

        Ok(Self {
            observations: by_date
                .into_iter()
                .map(|(date, value)| Observation { date, value })
                .collect(),
        })
    }

    /// Build a series from `(date text, value)` pairs
    pub fn from_records<S: AsRef<str>>(
        records: &[(S, f64)],
        convention: DateConvention,
    ) -> Result<Self> {
        let observations = records
            .iter()
            .map(|(text, value)| Ok(Observation::new(parse_date(text.as_ref(), convention)?, *value)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(observations)
    }

    /// Get the observations in date order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Get the observation dates
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    /// Get the observed values
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Date of the earliest observation
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    /// Date of the latest observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Value observed on `date`, if any
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|i| self.observations[i].value)
    }

    /// Days between the first and last observation
    pub fn span_days(&self) -> i64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days(),
            _ => 0,
        }
    }

    /// Median gap in days between consecutive observations
    pub fn median_spacing_days(&self) -> Option<f64> {
        let gaps: Vec<f64> = self
            .observations
            .windows(2)
            .map(|w| (w[1].date - w[0].date).num_days() as f64)
            .collect();
        agri_math::stats::median(&gaps).ok()
    }

    /// Hash of dates and exact value bits, used to detect a changed series
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.observations.len().hash(&mut hasher);
        for obs in &self.observations {
            obs.date.num_days_from_ce().hash(&mut hasher);
            obs.value.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// One row of a market arrivals table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    #[serde(rename = "Market", default)]
    pub market: Option<String>,
    #[serde(rename = "Market Arrival Date")]
    pub arrival_date: String,
    #[serde(rename = "Variety", default)]
    pub variety: Option<String>,
    #[serde(rename = "Minimum Price(Rs./Quintal)")]
    pub min_price: f64,
    #[serde(rename = "Maximum Price(Rs./Quintal)")]
    pub max_price: f64,
    #[serde(rename = "Modal Price(Rs./Quintal)")]
    pub modal_price: f64,
    #[serde(rename = "Arrivals (Tonnes)", default)]
    pub arrivals: Option<f64>,
}

impl MarketRecord {
    /// Market name, with blanks filled as [`MISSING_CATEGORY`]
    pub fn market(&self) -> &str {
        non_blank(self.market.as_deref())
    }

    /// Variety name, with blanks filled as [`MISSING_CATEGORY`]
    pub fn variety(&self) -> &str {
        non_blank(self.variety.as_deref())
    }

    /// Parsed arrival date
    pub fn date(&self, convention: DateConvention) -> Result<NaiveDate> {
        parse_date(&self.arrival_date, convention)
    }

    /// Feature row for the linear price model.
    ///
    /// Market and variety are categorical; minimum/maximum price, the
    /// arrival volume (when present) and the arrival date are continuous.
    pub fn to_feature_row(&self, convention: DateConvention) -> Result<FeatureRow> {
        let mut row = FeatureRow::new()
            .with_category("Market", self.market())
            .with_category("Variety", self.variety())
            .with_value("Minimum Price", self.min_price)
            .with_value("Maximum Price", self.max_price)
            .with_date("Market Arrival Date", self.date(convention)?);
        if let Some(arrivals) = self.arrivals {
            row = row.with_value("Arrivals", arrivals);
        }
        Ok(row)
    }
}

fn non_blank(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => MISSING_CATEGORY,
    }
}

/// Data loader for tabular price data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a series from a CSV file with a date column and a value column
    pub fn series_from_csv<P: AsRef<Path>>(
        path: P,
        date_column: &str,
        value_column: &str,
        convention: DateConvention,
    ) -> Result<Series> {
        let file = std::fs::File::open(path)?;
        Self::series_from_reader(file, date_column, value_column, convention)
    }

    /// Load a series from any CSV source
    pub fn series_from_reader<R: Read>(
        reader: R,
        date_column: &str,
        value_column: &str,
        convention: DateConvention,
    ) -> Result<Series> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let date_idx = Self::column_index(&headers, date_column)?;
        let value_idx = Self::column_index(&headers, value_column)?;

        let mut observations = Vec::new();
        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            let row = line + 2; // header is row 1
            let date_text = record.get(date_idx).unwrap_or_default();
            let value_text = record.get(value_idx).unwrap_or_default();

            let date = parse_date(date_text, convention).map_err(|e| {
                ForecastError::InvalidObservation(format!("row {row}: {e}"))
            })?;
            let value: f64 = value_text.parse().map_err(|_| {
                ForecastError::InvalidObservation(format!(
                    "row {row}: '{value_text}' is not a number"
                ))
            })?;
            observations.push(Observation::new(date, value));
        }

        log::debug!("Loaded {} observations", observations.len());
        Series::new(observations)
    }

    /// Load market arrival records from a CSV file
    pub fn market_records_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<MarketRecord>> {
        let file = std::fs::File::open(path)?;
        Self::market_records_from_reader(file)
    }

    /// Load market arrival records from any CSV source
    pub fn market_records_from_reader<R: Read>(reader: R) -> Result<Vec<MarketRecord>> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = rdr
            .deserialize::<MarketRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        log::debug!("Loaded {} market records", records.len());
        Ok(records)
    }

    /// Modal price series across all records (last record wins per date)
    pub fn modal_price_series(
        records: &[MarketRecord],
        convention: DateConvention,
    ) -> Result<Series> {
        let observations = records
            .iter()
            .map(|r| Ok(Observation::new(r.date(convention)?, r.modal_price)))
            .collect::<Result<Vec<_>>>()?;
        Series::new(observations)
    }

    fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!("Column '{name}' not found in data"))
            })
    }
}
