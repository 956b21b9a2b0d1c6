//! Focused unit tests covering recommend CLI configuration and request parsing.

use super::helpers::{CENTRE, Workspace, write_utf8};
use super::*;
use crate::recommend::{
    RecommendArgs, RecommendConfig, config_from_layers_for_test, execute_recommend, load_request,
};
use rstest::{fixture, rstest};
use sitewise_scorer::RankingMethod;

#[fixture]
fn town() -> Workspace {
    Workspace::new().with_town()
}

#[rstest]
fn converting_recommend_without_request_errors() {
    let err = RecommendConfig::try_from(RecommendArgs::default())
        .expect_err("missing request should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(env, ENV_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn recommend_config_defaults_dataset_and_method() {
    let args = RecommendArgs {
        request_path: Some("request.json".into()),
        ..RecommendArgs::default()
    };
    let config = RecommendConfig::try_from(args).expect("config should build");
    assert_eq!(config.dataset.as_str(), DEFAULT_DATASET);
    assert_eq!(config.method, RankingMethod::WeightedSum);
}

#[rstest]
fn validate_sources_reports_missing_dataset(town: Workspace) {
    town.write_request(r#"{"alternatives": {}}"#);
    let config = RecommendConfig {
        request_path: town.request_path.clone(),
        dataset: town.root.join("absent.geojson"),
        method: RankingMethod::WeightedSum,
    };
    match config.validate_sources().expect_err("dataset is missing") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_DATASET),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_not_file(town: Workspace) {
    std::fs::create_dir(town.request_path.as_std_path()).expect("request directory");
    let config = RecommendConfig {
        request_path: town.request_path.clone(),
        dataset: town.dataset.clone(),
        method: RankingMethod::WeightedSum,
    };
    match config.validate_sources().expect_err("request is a directory") {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(path, town.request_path);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn load_request_accepts_legacy_rent_field(town: Workspace) {
    town.write_request(
        r#"{"business_type": "minimarket",
            "alternatives": {"A": {"lat": -6.732, "lon": 108.552, "sewa_cost": 90000000}}}"#,
    );
    let request = load_request(&town.request_path).expect("request should decode");
    assert_eq!(request.business_type.as_deref(), Some("minimarket"));
    let alternative = request.alternatives.get("A").expect("alternative A");
    assert_eq!(alternative.rent_cost, Some(90_000_000.0));
    assert!(alternative.reviews.is_empty());
}

#[rstest]
fn load_request_rejects_invalid_json(town: Workspace) {
    write_utf8(&town.request_path, b"{ not valid json");
    match load_request(&town.request_path).expect_err("invalid json should error") {
        CliError::ParseRequest { path, .. } => assert_eq!(path, town.request_path),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn load_request_io_error_returns_open_error(town: Workspace) {
    match load_request(&town.request_path).expect_err("missing request should error") {
        CliError::OpenRequest { path, .. } => assert_eq!(path, town.request_path),
        other => panic!("expected OpenRequest, found {other:?}"),
    }
}

#[rstest]
#[case(RankingMethod::WeightedSum)]
#[case(RankingMethod::Topsis)]
#[case(RankingMethod::Saw)]
fn execute_recommend_writes_success_envelope(town: Workspace, #[case] method: RankingMethod) {
    town.write_request(&format!(
        r#"{{"alternatives": {{
            "centre": {{"lat": {}, "lon": {}, "reviews": ["very good food", "enak"]}},
            "north": {{"lat": -6.632, "lon": 108.552, "rent_cost": 300000000}}
        }}}}"#,
        CENTRE.0, CENTRE.1
    ));
    let config = RecommendConfig {
        request_path: town.request_path.clone(),
        dataset: town.dataset.clone(),
        method,
    };
    let mut stdout = Vec::new();
    execute_recommend(&config, &mut stdout).expect("recommend succeeds");

    let output: serde_json::Value = serde_json::from_slice(&stdout).expect("JSON output");
    assert_eq!(output["code"], 200);
    assert_eq!(output["status"], "success");
    let data = output["data"].as_array().expect("data array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], "centre");
    assert_eq!(data[0]["rank"], 1);
    assert_eq!(data[0]["business_type"], "restaurant");
    assert_eq!(data[0]["field_data"]["support_count"], 3);
    assert_eq!(data[1]["field_data"]["competitor_distance"], 1.0);
}

#[rstest]
fn execute_recommend_surfaces_unknown_business_type(town: Workspace) {
    town.write_request(r#"{"business_type": "bakery", "alternatives": {}}"#);
    let config = RecommendConfig {
        request_path: town.request_path.clone(),
        dataset: town.dataset.clone(),
        method: RankingMethod::WeightedSum,
    };
    let mut stdout = Vec::new();
    match execute_recommend(&config, &mut stdout).expect_err("unknown type") {
        CliError::Recommend(sitewise_scorer::RecommendError::UnknownBusinessType {
            business_type,
        }) => assert_eq!(business_type, "bakery"),
        other => panic!("expected UnknownBusinessType, found {other:?}"),
    }
    assert!(stdout.is_empty());
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "request_path": 42 }));

    match config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration")
    {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "dataset": "from-file.geojson", "method": "saw" }),
        None,
    );
    composer.push_environment(json!({
        "request_path": "from-env.json",
        "dataset": "from-env.geojson",
    }));
    composer.push_cli(json!({ "method": "topsis" }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path.as_str(), "from-env.json");
    assert_eq!(config.dataset.as_str(), "from-env.geojson");
    assert_eq!(config.method, RankingMethod::Topsis);
}
