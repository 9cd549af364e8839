use assert_approx_eq::assert_approx_eq;
use crop_nutrient::{
    AssessError, AssessmentEngine, CropProfile, GrowthStage, IdealRange, NormsTable, Nutrient,
    NutrientReading, NutrientSample, StageBand, StageIdeal, Verdict,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn engine() -> AssessmentEngine {
    AssessmentEngine::default()
}

fn reading(n: f64, p: f64, k: f64) -> NutrientReading {
    NutrientReading::new(n, p, k).unwrap()
}

#[rstest]
#[case(0, GrowthStage::Seedling)]
#[case(29, GrowthStage::Seedling)]
#[case(30, GrowthStage::Vegetative)]
#[case(59, GrowthStage::Vegetative)]
#[case(60, GrowthStage::Flowering)]
#[case(89, GrowthStage::Flowering)]
#[case(90, GrowthStage::Fruiting)]
#[case(119, GrowthStage::Fruiting)]
#[case(120, GrowthStage::Maturity)]
#[case(365, GrowthStage::Maturity)]
#[case(i64::MAX, GrowthStage::Maturity)]
fn test_resolve_stage_boundaries(#[case] age: i64, #[case] expected: GrowthStage) {
    assert_eq!(engine().resolve_stage(age).unwrap(), expected);
}

#[test]
fn test_negative_age_rejected() {
    match engine().resolve_stage(-1) {
        Err(AssessError::InvalidAge(age)) => assert_eq!(age, -1),
        other => panic!("Expected InvalidAge, got {:?}", other),
    }
}

#[test]
fn test_all_optimal_seedling() {
    let result = engine()
        .classify(&reading(75.0, 45.0, 125.0), GrowthStage::Seedling)
        .unwrap();

    assert_eq!(result.stage, GrowthStage::Seedling);
    for nutrient in Nutrient::ALL {
        assert_eq!(result.verdict(nutrient), Some(Verdict::Optimal));
    }
    assert!(result.overall);
    assert!(result.off_range().is_empty());
}

#[test]
fn test_single_low_nutrient_fails_overall() {
    let result = engine()
        .classify(&reading(40.0, 45.0, 125.0), GrowthStage::Seedling)
        .unwrap();

    assert_eq!(result.verdict(Nutrient::Nitrogen), Some(Verdict::Low));
    assert_eq!(result.verdict(Nutrient::Phosphorus), Some(Verdict::Optimal));
    assert_eq!(result.verdict(Nutrient::Potassium), Some(Verdict::Optimal));
    assert!(!result.overall);

    let off = result.off_range();
    assert_eq!(off.len(), 1);
    assert_eq!(off[0].nutrient, Nutrient::Nitrogen);
    assert_approx_eq!(off[0].deviation, -10.0);
    assert_approx_eq!(off[0].ideal.low, 50.0);
}

#[rstest]
#[case(50.0, 30.0, 100.0)]
#[case(100.0, 60.0, 150.0)]
#[case(50.0, 60.0, 100.0)]
fn test_bounds_are_optimal(#[case] n: f64, #[case] p: f64, #[case] k: f64) {
    let result = engine()
        .classify(&reading(n, p, k), GrowthStage::Seedling)
        .unwrap();
    assert!(result.overall);
    assert!(result.findings.iter().all(|f| f.deviation == 0.0));
}

#[test]
fn test_high_and_zero_readings() {
    let result = engine()
        .classify(&reading(0.0, 61.0, 125.0), GrowthStage::Seedling)
        .unwrap();
    assert_eq!(result.verdict(Nutrient::Nitrogen), Some(Verdict::Low));
    assert_eq!(result.verdict(Nutrient::Phosphorus), Some(Verdict::High));
    assert_approx_eq!(result.findings[1].deviation, 1.0);
    assert!(!result.overall);
}

#[test]
fn test_classify_uses_stage_ranges() {
    // Seedling-optimal nitrogen is low for the vegetative stage
    let result = engine()
        .classify(&reading(75.0, 45.0, 125.0), GrowthStage::Vegetative)
        .unwrap();
    assert_eq!(result.verdict(Nutrient::Nitrogen), Some(Verdict::Low));
    assert_eq!(result.verdict(Nutrient::Potassium), Some(Verdict::Low));
    assert!(!result.overall);
}

#[test]
fn test_assess_from_sample() {
    let result = engine()
        .assess(NutrientSample::complete(120.0, 50.0, 170.0), 45)
        .unwrap();
    assert_eq!(result.stage, GrowthStage::Vegetative);
    assert!(result.overall);

    let missing = NutrientSample {
        potassium: None,
        ..NutrientSample::complete(120.0, 50.0, 170.0)
    };
    assert!(matches!(
        engine().assess(missing, 45),
        Err(AssessError::MissingNutrient(Nutrient::Potassium))
    ));

    assert!(matches!(
        engine().assess(NutrientSample::complete(1.0, 1.0, 1.0), -5),
        Err(AssessError::InvalidAge(-5))
    ));
}

#[test]
fn test_classify_values() {
    let result = engine()
        .classify_values(75.0, 45.0, 125.0, GrowthStage::Seedling)
        .unwrap();
    assert!(result.overall);

    assert!(matches!(
        engine().classify_values(-1.0, 45.0, 125.0, GrowthStage::Seedling),
        Err(AssessError::InvalidReading {
            nutrient: Nutrient::Nitrogen,
            ..
        })
    ));
}

#[test]
fn test_custom_profile_and_missing_stage() {
    let ideal = StageIdeal {
        nitrogen: IdealRange::new(10.0, 20.0).unwrap(),
        phosphorus: IdealRange::new(5.0, 8.0).unwrap(),
        potassium: IdealRange::new(30.0, 40.0).unwrap(),
    };
    let profile = CropProfile::new(vec![
        StageBand::new(GrowthStage::Seedling, 0, ideal),
        StageBand::new(GrowthStage::Maturity, 45, ideal),
    ])
    .unwrap();

    let mut table = NormsTable::builtin();
    table.insert("Lettuce", profile).unwrap();
    let engine = AssessmentEngine::from_table(&table, "lettuce").unwrap();
    assert_eq!(engine.crop(), "lettuce");

    assert_eq!(engine.resolve_stage(44).unwrap(), GrowthStage::Seedling);
    assert_eq!(engine.resolve_stage(45).unwrap(), GrowthStage::Maturity);

    match engine.classify(&reading(15.0, 6.0, 35.0), GrowthStage::Flowering) {
        Err(AssessError::StageNotConfigured { crop, stage }) => {
            assert_eq!(crop, "lettuce");
            assert_eq!(stage, GrowthStage::Flowering);
        }
        other => panic!("Expected StageNotConfigured, got {:?}", other),
    }
}

#[test]
fn test_unknown_crop() {
    let table = NormsTable::builtin();
    assert!(matches!(
        AssessmentEngine::from_table(&table, "wheat"),
        Err(AssessError::UnknownCrop(_))
    ));
    assert!(AssessmentEngine::from_table(&table, " Tomato ").is_ok());
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = engine();
    std::thread::scope(|scope| {
        for age in [5i64, 35, 65, 95, 125] {
            let engine = &engine;
            scope.spawn(move || {
                let stage = engine.resolve_stage(age).unwrap();
                engine
                    .classify(&reading(75.0, 45.0, 125.0), stage)
                    .unwrap();
            });
        }
    });
}

#[test]
fn test_result_serializes() {
    let result = engine()
        .classify(&reading(75.0, 45.0, 125.0), GrowthStage::Seedling)
        .unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"seedling\""));
    assert!(json.contains("\"nitrogen\":\"Optimal\""));
}
