mod support;

use support::dataset::{HEADER, learnable_rows, write_csv};
use support::tutorscore_env::TutorscoreEnvGuard;

use tutorscore::artifact::ScoreModel;
use tutorscore::config;
use tutorscore::dataset::{DatasetError, load_dataset};
use tutorscore::ml::forest::{ForestOptions, RandomForestRegressor};
use tutorscore::ml::scaler::StandardScaler;
use tutorscore::preprocess::Preprocessor;
use tutorscore::training::{TrainingError, TrainingParams, train_from_csv};

fn quick_params() -> TrainingParams {
    TrainingParams {
        n_estimators: 40,
        ..TrainingParams::default()
    }
}

#[test]
fn learnable_dataset_scores_between_zero_and_one() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(temp.path(), "students.csv", &learnable_rows(120));
    let outcome = train_from_csv(&csv, &quick_params()).expect("train");
    assert_eq!(outcome.test_rows, 24);
    assert_eq!(outcome.train_rows, 96);
    assert!(
        (0.0..=1.0).contains(&outcome.report.r2),
        "r2 = {}",
        outcome.report.r2
    );
    assert!(outcome.report.mae < 10.0, "mae = {}", outcome.report.mae);
}

#[test]
fn fixed_seed_reproduces_metrics() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(temp.path(), "students.csv", &learnable_rows(80));
    let first = train_from_csv(&csv, &quick_params()).expect("first run");
    let second = train_from_csv(&csv, &quick_params()).expect("second run");
    assert_eq!(first.report.mae, second.report.mae);
    assert_eq!(first.report.r2, second.report.r2);
    assert_eq!(first.model, second.model);
}

#[test]
fn single_row_forest_returns_its_score() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut rows = learnable_rows(1);
    rows[0].score = 78.5;
    let csv = write_csv(temp.path(), "one.csv", &rows);

    let dataset = load_dataset(&csv).expect("load");
    let preprocessor = Preprocessor::fit(&dataset);
    let encoded = preprocessor.encode_dataset(&dataset).expect("encode");
    let scaler = StandardScaler::fit(&encoded.x).expect("scaler");
    let x = scaler.transform(&encoded.x).expect("transform");
    let params = TrainingParams::default();
    let forest =
        RandomForestRegressor::fit(&x, &encoded.y, &params.forest_options()).expect("fit");
    let predicted = forest.predict_row(&x[0]).expect("predict");
    assert!((predicted - 78.5).abs() <= 0.5, "predicted {predicted}");
}

#[test]
fn saved_model_round_trips_and_detects_changed_dataset() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(temp.path(), "students.csv", &learnable_rows(60));
    let outcome = train_from_csv(&csv, &quick_params()).expect("train");
    let model_path = temp.path().join("out").join("trained_model.json");
    outcome.model.save_json(&model_path).expect("save");

    let loaded = ScoreModel::load_json(&model_path).expect("load");
    assert_eq!(loaded, outcome.model);
    let dataset = load_dataset(&csv).expect("dataset");
    assert_eq!(loaded.check_dataset(&dataset).expect("compatible"), None);

    write_csv(temp.path(), "students.csv", &learnable_rows(61));
    let changed = load_dataset(&csv).expect("changed dataset");
    assert!(loaded.check_dataset(&changed).expect("same columns").is_some());
}

#[test]
fn malformed_rows_abort_training() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("bad.csv");
    let good = support::dataset::to_csv(&learnable_rows(3));
    std::fs::write(&path, format!("{good}Student 9,Male,India\n")).expect("write");
    let err = train_from_csv(&path, &quick_params()).unwrap_err();
    assert!(matches!(
        err,
        TrainingError::Dataset(DatasetError::Csv { .. })
    ));

    let text = format!("{HEADER}\n{}", learnable_rows(1)[0].to_csv(0).replace("Algebra,", "Algebra,x"));
    std::fs::write(&path, text).expect("write");
    let err = train_from_csv(&path, &quick_params()).unwrap_err();
    match err {
        TrainingError::Dataset(DatasetError::InvalidNumber { line, column, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(column, "Material Level");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn settings_file_in_config_home_is_used() {
    let temp = tempfile::tempdir().expect("tempdir");
    let _env = TutorscoreEnvGuard::set_config_home(temp.path().to_path_buf());
    let path = config::settings_path().expect("settings path");
    std::fs::write(&path, "dataset_path = \"elsewhere.csv\"\n[training]\nmax_depth = 4\n")
        .expect("write settings");
    let settings = config::load_or_default(None).expect("settings");
    assert_eq!(settings.dataset_path, std::path::PathBuf::from("elsewhere.csv"));
    assert_eq!(settings.training.max_depth, 4);
    assert_eq!(settings.training.n_estimators, 200);
    assert_eq!(
        settings.training.forest_options(),
        ForestOptions::new(200).with_max_depth(4).with_seed(42)
    );
}
