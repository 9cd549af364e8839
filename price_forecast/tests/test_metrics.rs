use assert_approx_eq::assert_approx_eq;
use price_forecast::metrics::{
    evaluate_linear, evaluate_series, forecast_accuracy, train_test_split, DEFAULT_SPLIT_SEED,
    DEFAULT_TEST_RATIO,
};
use price_forecast::models::linear::{FeatureRow, LinearPriceModel, TrainingSet};
use price_forecast::synthetic::SyntheticSeries;
use price_forecast::{fit, ForecastError};
use rstest::rstest;
use std::collections::HashSet;

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    let accuracy = forecast_accuracy(&predicted, &actual).unwrap();
    // Absolute errors are 2, 2, 3, 3, 2
    assert_approx_eq!(accuracy.mae, 2.4);
    assert_approx_eq!(accuracy.mse, 6.0);
    assert_approx_eq!(accuracy.rmse, 6.0f64.sqrt());
    // (20 + 10 + 10 + 7.5 + 4) / 5
    assert_approx_eq!(accuracy.mape, 10.3);
    let smape = 200.0 * (2.0 / 22.0 + 2.0 / 38.0 + 3.0 / 63.0 + 3.0 / 77.0 + 2.0 / 102.0) / 5.0;
    assert_approx_eq!(accuracy.smape, smape);

    let report = accuracy.to_string();
    assert!(report.contains("RMSE"));
}

#[test]
fn test_perfect_forecast() {
    let values = vec![5.0, 0.0, 7.5];
    let accuracy = forecast_accuracy(&values, &values).unwrap();
    assert_approx_eq!(accuracy.mae, 0.0);
    assert_approx_eq!(accuracy.rmse, 0.0);
    assert_approx_eq!(accuracy.smape, 0.0);
}

#[test]
fn test_mape_averages_over_nonzero_actuals() {
    let accuracy = forecast_accuracy(&[1.0, 12.0], &[0.0, 10.0]).unwrap();
    assert_approx_eq!(accuracy.mape, 20.0);
    assert_approx_eq!(accuracy.mae, 1.5);

    let accuracy = forecast_accuracy(&[1.0, 2.0], &[0.0, 0.0]).unwrap();
    assert_approx_eq!(accuracy.mape, 0.0);
    assert_approx_eq!(accuracy.smape, 200.0);
}

#[test]
fn test_metric_length_mismatch() {
    assert!(matches!(
        forecast_accuracy(&[1.0, 2.0], &[1.0]),
        Err(ForecastError::DimensionMismatch(_))
    ));
    assert!(forecast_accuracy(&[], &[]).is_err());
}

#[rstest]
#[case(10, 2, 8)]
#[case(100, 20, 80)]
#[case(7, 2, 5)]
#[case(2, 1, 1)]
fn test_split_sizes(#[case] n: usize, #[case] test_len: usize, #[case] train_len: usize) {
    let (train, test) = train_test_split(n, DEFAULT_TEST_RATIO, DEFAULT_SPLIT_SEED).unwrap();
    assert_eq!(test.len(), test_len);
    assert_eq!(train.len(), train_len);

    let all: HashSet<usize> = train.iter().chain(&test).copied().collect();
    assert_eq!(all.len(), n);
    assert!(all.iter().all(|&i| i < n));
}

#[test]
fn test_split_is_reproducible() {
    let first = train_test_split(50, 0.2, 42).unwrap();
    let second = train_test_split(50, 0.2, 42).unwrap();
    assert_eq!(first, second);

    let other = train_test_split(50, 0.2, 7).unwrap();
    assert_ne!(first.1, other.1);
}

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(-0.5)]
#[case(f64::NAN)]
fn test_split_rejects_bad_ratio(#[case] ratio: f64) {
    assert!(matches!(
        train_test_split(10, ratio, 42),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_split_needs_two_rows() {
    assert!(matches!(
        train_test_split(1, 0.2, 42),
        Err(ForecastError::InsufficientData { .. })
    ));
}

#[test]
fn test_evaluate_linear_on_holdout() {
    let rows: Vec<FeatureRow> = (0..20)
        .map(|i| {
            FeatureRow::new()
                .with_category("Market", if i % 2 == 0 { "Pune" } else { "Nashik" })
                .with_value("Minimum Price", 800.0 + 25.0 * f64::from(i))
        })
        .collect();
    let targets: Vec<f64> = (0..20)
        .map(|i| 1000.0 + 25.0 * f64::from(i) + if i % 2 == 0 { 60.0 } else { 0.0 })
        .collect();
    let data = TrainingSet::new(rows, targets).unwrap();

    let (train_idx, test_idx) = train_test_split(data.len(), 0.2, 42).unwrap();
    let train = data.select(&train_idx).unwrap();
    let test = data.select(&test_idx).unwrap();

    let model = LinearPriceModel::default()
        .fit(train.rows(), train.targets())
        .unwrap();
    let accuracy = evaluate_linear(&model, &test).unwrap();
    assert!(accuracy.rmse < 1e-3, "rmse {}", accuracy.rmse);
}

#[test]
fn test_evaluate_series_in_sample() {
    let series = SyntheticSeries::default().generate().unwrap();
    let model = fit(&series).unwrap();
    let accuracy = evaluate_series(&model, &series).unwrap();

    assert!(accuracy.rmse > 0.0);
    // In-sample RMSE sits just under the residual sd (n vs n - 1 divisor)
    assert!(accuracy.rmse <= model.residual_std() + 1e-9);
}
