use price_forecast::metrics::evaluate_series;
use price_forecast::synthetic::SyntheticSeries;
use price_forecast::{ForecastConfig, Forecaster, SeasonalityMode};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Price Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Two years of daily prices with a yearly cycle
    println!("Creating sample data...");
    let series = SyntheticSeries {
        days: 800,
        ..SyntheticSeries::default()
    }
    .generate()?;
    println!(
        "Sample data created: {} daily prices from {:?} to {:?}\n",
        series.len(),
        series.first_date(),
        series.last_date()
    );

    println!("Training model...");
    let forecaster = Forecaster::new(
        ForecastConfig::default()
            .with_seasonality(SeasonalityMode::Auto)
            .with_confidence_level(0.95)?,
    )?;
    let model = forecaster.fit(&series)?;
    println!(
        "Trend: {:.3}/day (R² {:.3}), seasonality {:?}, residual sd {:.2}\n",
        model.slope_per_day(),
        model.r_squared(),
        model.seasonality(),
        model.residual_std()
    );

    println!("Monthly effects:");
    for (month, effect) in model.seasonal_effects().iter().enumerate() {
        println!("  Month {:>2}: {:+.2}", month + 1, effect);
    }

    println!("\nIn-sample accuracy:");
    println!("{}", evaluate_series(&model, &series)?);

    println!("95% forecast bands (every 30th day):");
    for result in model.forecast_days(365)?.iter().step_by(30) {
        println!(
            "  {}: {:.2} ({:.2}, {:.2})",
            result.date, result.point_estimate, result.lower_bound, result.upper_bound
        );
    }

    // Refitting the same series comes straight from the cache
    let again = forecaster.fit(&series)?;
    println!(
        "\nSecond fit reused cached model: {}",
        std::sync::Arc::ptr_eq(&model, &again)
    );

    Ok(())
}
