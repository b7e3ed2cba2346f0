use co2_predictor::services::{
    emission_model::{EmissionModel, Regressor},
    prediction_service::build_feature_vector,
};

fn bundled_model() -> EmissionModel {
    EmissionModel::from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/model/co2_model.json"))
        .expect("bundled model loads")
}

#[test]
fn test_bundled_model_loads() {
    let model = bundled_model();
    assert_eq!(model.feature_names()[0], "Engine Size(L)");
    assert!(model.tree_count() >= 1);
    assert!(model.vehicle_classes().contains(&"SUV - SMALL".to_string()));
}

#[test]
fn test_bundled_model_predicts_for_every_class() {
    let model = bundled_model();

    for class in model.vehicle_classes() {
        let row = build_feature_vector(model.feature_names(), 2.0, &class).unwrap();
        let prediction = model.predict(&row).unwrap();
        assert!(
            prediction.is_finite() && prediction > 0.0,
            "{} predicted {}",
            class,
            prediction
        );
    }
}

#[test]
fn test_bigger_engine_emits_more() {
    let model = bundled_model();

    let small = build_feature_vector(model.feature_names(), 1.4, "COMPACT").unwrap();
    let large = build_feature_vector(model.feature_names(), 5.0, "COMPACT").unwrap();
    assert!(model.predict(&large).unwrap() > model.predict(&small).unwrap());
}
