//! Calendar date parsing for market records
//!
//! ISO dates (`2021-03-14`) and dates with a textual month (`14 Mar 2021`,
//! `14-Mar-2021`) are unambiguous and always accepted. Purely numeric
//! day/month forms (`14/03/2021`) are only read when the caller opts into
//! [`DateConvention::DayFirst`]; otherwise they are rejected instead of
//! guessed.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const ISO_FORMAT: &str = "%Y-%m-%d";
const TEXT_MONTH_FORMATS: [&str; 2] = ["%d %b %Y", "%d-%b-%Y"];
const DAY_FIRST_FORMATS: [&str; 2] = ["%d/%m/%Y", "%d-%m-%Y"];

/// How to read numeric dates that are not ISO formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateConvention {
    /// Only ISO and textual-month dates are accepted
    #[default]
    IsoOnly,
    /// Numeric `DD/MM/YYYY` and `DD-MM-YYYY` are read day first
    DayFirst,
}

/// Parse a calendar date under the given convention
pub fn parse_date(text: &str, convention: DateConvention) -> Result<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ForecastError::InvalidObservation(
            "Empty date string".to_string(),
        ));
    }

    let parse = |format: &str| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .filter(|date| has_full_year(trimmed, *date))
    };

    if let Some(date) = parse(ISO_FORMAT) {
        return Ok(date);
    }

    if let Some(date) = TEXT_MONTH_FORMATS.into_iter().find_map(parse) {
        return Ok(date);
    }

    let numeric = DAY_FIRST_FORMATS.into_iter().find_map(parse);

    match (numeric, convention) {
        (Some(date), DateConvention::DayFirst) => Ok(date),
        (Some(_), DateConvention::IsoOnly) => Err(ForecastError::InvalidObservation(format!(
            "Ambiguous date '{trimmed}': numeric day/month order requires the day-first convention"
        ))),
        (None, _) => Err(ForecastError::InvalidObservation(format!(
            "Unrecognised date '{trimmed}': expected YYYY-MM-DD or DD Mon YYYY"
        ))),
    }
}

/// `%Y` takes any digit count, so `21` would otherwise read as year 0021
fn has_full_year(text: &str, date: NaiveDate) -> bool {
    let year = format!("{:04}", date.year());
    text.split([' ', '-', '/']).any(|field| field == year)
}
