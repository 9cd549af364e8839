use crop_nutrient::{
    AssessError, AssessmentEngine, CropProfile, GrowthStage, IdealRange, NormsTable, Nutrient,
    StageBand, StageIdeal, Verdict, DEFAULT_CROP,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const PEPPER_JSON: &str = r#"{
  "Pepper": {
    "stages": [
      {
        "stage": "seedling",
        "starts_at_day": 0,
        "ideal": {
          "nitrogen": { "low": 40.0, "high": 80.0 },
          "phosphorus": { "low": 20.0, "high": 40.0 },
          "potassium": { "low": 90.0, "high": 140.0 }
        }
      },
      {
        "stage": "flowering",
        "starts_at_day": 40,
        "ideal": {
          "nitrogen": { "low": 90.0, "high": 130.0 },
          "phosphorus": { "low": 40.0, "high": 60.0 },
          "potassium": { "low": 180.0, "high": 240.0 }
        }
      }
    ]
  }
}"#;

fn ideal(low: f64, high: f64) -> StageIdeal {
    let range = IdealRange { low, high };
    StageIdeal {
        nitrogen: range,
        phosphorus: range,
        potassium: range,
    }
}

#[test]
fn test_builtin_table() {
    let table = NormsTable::builtin();
    assert_eq!(table.crop_names().collect::<Vec<_>>(), vec![DEFAULT_CROP]);

    let profile = table.crop(DEFAULT_CROP).unwrap();
    assert!(profile.validate().is_ok());
    let starts: Vec<u32> = profile.stages().iter().map(|b| b.starts_at_day).collect();
    assert_eq!(starts, vec![0, 30, 60, 90, 120]);

    let seedling = profile.band(GrowthStage::Seedling).unwrap();
    assert_eq!(seedling.ideal.get(Nutrient::Nitrogen), IdealRange { low: 50.0, high: 100.0 });
    assert_eq!(seedling.ideal.get(Nutrient::Phosphorus), IdealRange { low: 30.0, high: 60.0 });
    assert_eq!(seedling.ideal.get(Nutrient::Potassium), IdealRange { low: 100.0, high: 150.0 });

    assert_eq!(profile.age_range(GrowthStage::Vegetative), Some((30, Some(60))));
    assert_eq!(profile.age_range(GrowthStage::Maturity), Some((120, None)));
}

#[test]
fn test_load_from_json() {
    let table = NormsTable::from_json(PEPPER_JSON).unwrap();
    assert_eq!(table.len(), 1);

    // Crop names are matched case-insensitively
    let engine = AssessmentEngine::from_table(&table, "PEPPER").unwrap();
    assert_eq!(engine.resolve_stage(39).unwrap(), GrowthStage::Seedling);
    assert_eq!(engine.resolve_stage(40).unwrap(), GrowthStage::Flowering);

    let result = engine
        .classify_values(100.0, 50.0, 200.0, GrowthStage::Flowering)
        .unwrap();
    assert!(result.overall);
    let result = engine
        .classify_values(100.0, 50.0, 200.0, GrowthStage::Seedling)
        .unwrap();
    assert_eq!(result.verdict(Nutrient::Nitrogen), Some(Verdict::High));
}

#[test]
fn test_load_from_file_and_round_trip() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", NormsTable::builtin().to_json().unwrap()).unwrap();

    let table = NormsTable::from_path(file.path()).unwrap();
    assert_eq!(table, NormsTable::builtin());

    assert!(matches!(
        NormsTable::from_path("/nonexistent/norms.json"),
        Err(AssessError::Io(_))
    ));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        NormsTable::from_json("{ not json"),
        Err(AssessError::Json(_))
    ));
    assert!(matches!(
        NormsTable::from_json(r#"{"tomato": {"stages": [{"stage": "budding"}]}}"#),
        Err(AssessError::Json(_))
    ));
}

#[test]
fn test_profile_must_start_at_day_zero() {
    let result = CropProfile::new(vec![StageBand::new(GrowthStage::Seedling, 5, ideal(1.0, 2.0))]);
    match result {
        Err(AssessError::InvalidProfile(msg)) => assert!(msg.contains("day 0")),
        other => panic!("Expected InvalidProfile, got {:?}", other),
    }

    assert!(matches!(
        CropProfile::new(Vec::new()),
        Err(AssessError::InvalidProfile(_))
    ));
}

#[test]
fn test_profile_ordering_rules() {
    // Start days must strictly increase
    assert!(CropProfile::new(vec![
        StageBand::new(GrowthStage::Seedling, 0, ideal(1.0, 2.0)),
        StageBand::new(GrowthStage::Vegetative, 0, ideal(1.0, 2.0)),
    ])
    .is_err());

    // Stages must follow developmental order
    assert!(CropProfile::new(vec![
        StageBand::new(GrowthStage::Vegetative, 0, ideal(1.0, 2.0)),
        StageBand::new(GrowthStage::Seedling, 30, ideal(1.0, 2.0)),
    ])
    .is_err());

    assert!(CropProfile::new(vec![
        StageBand::new(GrowthStage::Seedling, 0, ideal(1.0, 2.0)),
        StageBand::new(GrowthStage::Seedling, 30, ideal(1.0, 2.0)),
    ])
    .is_err());
}

#[test]
fn test_profile_range_rules() {
    let reversed = CropProfile::new(vec![StageBand::new(
        GrowthStage::Seedling,
        0,
        ideal(10.0, 5.0),
    )]);
    match reversed {
        Err(AssessError::InvalidProfile(msg)) => {
            assert!(msg.contains("Stage Seedling"));
            assert!(msg.contains("exceeds"));
        }
        other => panic!("Expected InvalidProfile, got {:?}", other),
    }

    assert!(IdealRange::new(-1.0, 5.0).is_err());
    assert!(IdealRange::new(1.0, f64::INFINITY).is_err());
    assert!(IdealRange::new(5.0, 5.0).is_ok());
}

#[test]
fn test_invalid_table_rejected_on_load() {
    let json = PEPPER_JSON.replace("\"starts_at_day\": 40", "\"starts_at_day\": 0");
    match NormsTable::from_json(&json) {
        Err(AssessError::InvalidProfile(msg)) => assert!(msg.contains("pepper")),
        other => panic!("Expected InvalidProfile, got {:?}", other),
    }
}

#[test]
fn test_insert_replaces_and_rejects_blank_name() {
    let mut table = NormsTable::builtin();
    let profile = CropProfile::new(vec![StageBand::new(GrowthStage::Seedling, 0, ideal(1.0, 2.0))])
        .unwrap();

    table.insert("TOMATO", profile.clone()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.crop("tomato").unwrap(), &profile);

    assert!(table.insert("   ", profile).is_err());
    assert!(NormsTable::new().is_empty());
}
