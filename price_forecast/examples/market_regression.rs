use price_forecast::metrics::{
    evaluate_linear, train_test_split, DEFAULT_SPLIT_SEED, DEFAULT_TEST_RATIO,
};
use price_forecast::{DataLoader, DateConvention, LinearPriceModel, TrainingSet};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: market_regression <market_arrivals.csv> [--day-first]");
            std::process::exit(1);
        }
    };
    let convention = if env::args().any(|a| a == "--day-first") {
        DateConvention::DayFirst
    } else {
        DateConvention::IsoOnly
    };

    println!("Price Forecast: Market Regression Example");
    println!("=========================================\n");

    let records = DataLoader::market_records_from_csv(&path)?;
    println!("Loaded {} market records from {}", records.len(), path);

    let rows = records
        .iter()
        .map(|r| r.to_feature_row(convention))
        .collect::<price_forecast::Result<Vec<_>>>()?;
    let targets = records.iter().map(|r| r.modal_price).collect();
    let data = TrainingSet::new(rows, targets)?;

    let (train_idx, test_idx) =
        train_test_split(data.len(), DEFAULT_TEST_RATIO, DEFAULT_SPLIT_SEED)?;
    let train = data.select(&train_idx)?;
    let test = data.select(&test_idx)?;
    println!(
        "Training on {} rows, holding out {}\n",
        train.len(),
        test.len()
    );

    let model = LinearPriceModel::default().fit(train.rows(), train.targets())?;

    println!("Intercept: {:.4}", model.intercept());
    println!("Coefficients:");
    for (name, value) in model.coefficients() {
        println!("  {name}: {value:.4}");
    }
    for (column, level) in model.reference_levels() {
        println!("  ({column} reference level: {level})");
    }

    let accuracy = evaluate_linear(&model, &test)?;
    println!("\nHold-out accuracy:");
    println!("{accuracy}");

    Ok(())
}
