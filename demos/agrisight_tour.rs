// A walk through both AgriSight engines.
//
// Run with `RUST_LOG=debug` to see fit summaries and cache hits.
use agrisight::prelude::*;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("AgriSight tour\n");
    println!("Engines enabled: {}", agrisight::engines().join(", "));

    println!("\n=== Price Forecasting ===");
    show_forecasting()?;

    println!("\n=== Nutrient Assessment ===");
    show_assessment()?;

    println!("\nDone");
    Ok(())
}

fn show_forecasting() -> Result<(), Box<dyn std::error::Error>> {
    // Use a market arrivals CSV when given, otherwise seeded synthetic prices
    let series = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let records = DataLoader::market_records_from_csv(&path)?;
            println!("Loaded {} records from {}", records.len(), path.display());
            DataLoader::modal_price_series(&records, DateConvention::DayFirst)?
        }
        None => SyntheticSeries {
            days: 900,
            ..SyntheticSeries::default()
        }
        .generate()?,
    };

    let forecaster = Forecaster::new(ForecastConfig::default())?;
    let model = forecaster.fit(&series)?;
    println!(
        "{} observations, trend {:+.3}/day, {:?} seasonality, residual sd {:.2}",
        model.n_observations(),
        model.slope_per_day(),
        model.seasonality(),
        model.residual_std()
    );

    for days in [7u32, 30, 90, 180, 365] {
        let forecast = model.forecast_days(days)?;
        if let Some(result) = forecast.last() {
            println!(
                "  +{days:>3} days ({}): {:.2} [{:.2}, {:.2}]",
                result.date, result.point_estimate, result.lower_bound, result.upper_bound
            );
        }
    }

    let beyond = model
        .horizon_end()
        .checked_add_days(chrono::Days::new(1))
        .ok_or("horizon end overflows the calendar")?;
    match forecaster.predict(&series, beyond) {
        Err(ForecastError::DateOutOfRange { latest, .. }) => {
            println!("  {beyond}: out of range (forecasts end {latest})")
        }
        other => println!("  {beyond}: unexpected {other:?}"),
    }

    Ok(())
}

fn show_assessment() -> Result<(), Box<dyn std::error::Error>> {
    let engine = AssessmentEngine::from_table(&NormsTable::builtin(), "tomato")?;

    let samples = [
        (12, NutrientSample::complete(75.0, 45.0, 125.0)),
        (12, NutrientSample::complete(40.0, 45.0, 125.0)),
        (30, NutrientSample::complete(120.0, 55.0, 210.0)),
        (
            95,
            NutrientSample {
                phosphorus: None,
                ..NutrientSample::complete(90.0, 50.0, 260.0)
            },
        ),
    ];

    for (age, sample) in samples {
        match engine.assess(sample, age) {
            Ok(result) => {
                let verdicts: Vec<String> = result
                    .findings
                    .iter()
                    .map(|f| format!("{} {}", f.nutrient.symbol(), f.verdict))
                    .collect();
                println!(
                    "  day {age:>3} {:<10} {} -> {}",
                    result.stage.to_string(),
                    verdicts.join(", "),
                    if result.overall { "pass" } else { "fail" }
                );
            }
            Err(e) => println!("  day {age:>3} error: {e}"),
        }
    }

    Ok(())
}
