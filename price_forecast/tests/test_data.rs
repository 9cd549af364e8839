use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use price_forecast::data::{DataLoader, Observation, Series, MISSING_CATEGORY};
use price_forecast::{DateConvention, ForecastError};
use std::io::Write;
use tempfile::NamedTempFile;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_series_sorts_and_dedups_last_write_wins() {
    let series = Series::new(vec![
        Observation::new(ymd(2021, 1, 3), 130.0),
        Observation::new(ymd(2021, 1, 1), 100.0),
        Observation::new(ymd(2021, 1, 3), 135.0),
        Observation::new(ymd(2021, 1, 2), 120.0),
    ])
    .unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(
        series.dates(),
        vec![ymd(2021, 1, 1), ymd(2021, 1, 2), ymd(2021, 1, 3)]
    );
    assert_eq!(series.values(), vec![100.0, 120.0, 135.0]);
    assert_eq!(series.value_on(ymd(2021, 1, 3)), Some(135.0));
    assert_eq!(series.value_on(ymd(2021, 1, 4)), None);
}

#[test]
fn test_series_rejects_bad_values() {
    for bad in [-1.0, f64::NAN, f64::INFINITY] {
        let result = Series::new(vec![
            Observation::new(ymd(2021, 1, 1), 100.0),
            Observation::new(ymd(2021, 1, 2), bad),
        ]);
        assert!(matches!(result, Err(ForecastError::InvalidObservation(_))));
    }

    // Zero is a valid price
    assert!(Series::new(vec![Observation::new(ymd(2021, 1, 1), 0.0)]).is_ok());
}

#[test]
fn test_series_summary_statistics() {
    let series = Series::from_records(
        &[
            ("2021-01-01", 10.0),
            ("2021-01-02", 11.0),
            ("2021-01-04", 12.0),
            ("2021-01-11", 13.0),
        ],
        DateConvention::IsoOnly,
    )
    .unwrap();

    assert_eq!(series.first_date(), Some(ymd(2021, 1, 1)));
    assert_eq!(series.last_date(), Some(ymd(2021, 1, 11)));
    assert_eq!(series.span_days(), 10);
    // Gaps are 1, 2 and 7 days
    assert_eq!(series.median_spacing_days(), Some(2.0));

    assert!(Series::default().is_empty());
    assert_eq!(Series::default().median_spacing_days(), None);
}

#[test]
fn test_fingerprint_tracks_content() {
    let a = Series::from_records(&[("2021-01-01", 10.0), ("2021-01-02", 11.0)], DateConvention::IsoOnly).unwrap();
    let b = Series::from_records(&[("2021-01-02", 11.0), ("2021-01-01", 10.0)], DateConvention::IsoOnly).unwrap();
    let c = Series::from_records(&[("2021-01-01", 10.0), ("2021-01-02", 11.5)], DateConvention::IsoOnly).unwrap();

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn test_series_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Price").unwrap();
    writeln!(file, "01/01/2021, 1200").unwrap();
    writeln!(file, "02/01/2021,1250.5").unwrap();
    writeln!(file, "03/01/2021,1190").unwrap();

    let series =
        DataLoader::series_from_csv(file.path(), "date", "price", DateConvention::DayFirst)
            .unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.last_date(), Some(ymd(2021, 1, 3)));
    assert_eq!(series.values(), vec![1200.0, 1250.5, 1190.0]);

    // Same file without the day-first convention is ambiguous
    let result =
        DataLoader::series_from_csv(file.path(), "Date", "Price", DateConvention::IsoOnly);
    assert!(matches!(result, Err(ForecastError::InvalidObservation(_))));
}

#[test]
fn test_series_from_csv_errors() {
    let result = DataLoader::series_from_csv(
        "nonexistent_file.csv",
        "date",
        "price",
        DateConvention::IsoOnly,
    );
    assert!(matches!(result, Err(ForecastError::Io(_))));

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,price").unwrap();
    writeln!(file, "2021-01-01,abc").unwrap();
    let err = DataLoader::series_from_csv(file.path(), "date", "price", DateConvention::IsoOnly)
        .unwrap_err();
    assert!(err.to_string().contains("row 2"));

    let result = DataLoader::series_from_csv(file.path(), "date", "modal", DateConvention::IsoOnly);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_market_records() {
    let csv = "\
Market,Market Arrival Date,Variety,Minimum Price(Rs./Quintal),Maximum Price(Rs./Quintal),Modal Price(Rs./Quintal)
Kolar,2021-01-01,Hybrid,800,1200,1000
,2021-01-02,Local,700,1100,900
Kolar,2021-01-02,,750,1150,950
";
    let records = DataLoader::market_records_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].market(), "Kolar");
    assert_eq!(records[1].market(), MISSING_CATEGORY);
    assert_eq!(records[2].variety(), MISSING_CATEGORY);
    assert_eq!(records[0].arrivals, None);

    // Two records share 2021-01-02; the later one wins
    let series = DataLoader::modal_price_series(&records, DateConvention::IsoOnly).unwrap();
    assert_eq!(series.values(), vec![1000.0, 950.0]);

    let row = records[1].to_feature_row(DateConvention::IsoOnly).unwrap();
    assert_eq!(row.categorical()["Market"], MISSING_CATEGORY);
    assert_eq!(row.continuous()["Minimum Price"], 700.0);
    assert!(row.continuous().contains_key("Market Arrival Date"));
    assert!(!row.continuous().contains_key("Arrivals"));
}

#[test]
fn test_market_records_with_arrivals() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Market,Market Arrival Date,Variety,Minimum Price(Rs./Quintal),Maximum Price(Rs./Quintal),Modal Price(Rs./Quintal),Arrivals (Tonnes)").unwrap();
    writeln!(file, "Kolar,05 Jan 2021,Hybrid,800,1200,1000,35.5").unwrap();

    let records = DataLoader::market_records_from_csv(file.path()).unwrap();
    assert_eq!(records[0].arrivals, Some(35.5));
    assert_eq!(
        records[0].date(DateConvention::IsoOnly).unwrap(),
        ymd(2021, 1, 5)
    );

    let row = records[0].to_feature_row(DateConvention::IsoOnly).unwrap();
    assert_eq!(row.continuous()["Arrivals"], 35.5);
}
