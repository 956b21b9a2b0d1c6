//! Behaviour-driven step definitions driving the recommend CLI scenarios.

use super::helpers::{CENTRE, Workspace};
use super::*;
use crate::recommend::run_recommend_with;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

struct RecommendWorld {
    workspace: Workspace,
    include_request: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl RecommendWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            include_request: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["sitewise".to_owned(), "recommend".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.workspace.request_path.as_str().to_owned());
        }
        argv.extend([
            format!("--{ARG_DATASET}"),
            self.workspace.dataset.as_str().to_owned(),
        ]);
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            match result.as_ref().expect("result recorded") {
                Ok(()) => panic!("expected the command to fail"),
                Err(error) => error,
            }
        })
    }
}

#[fixture]
fn world() -> RecommendWorld {
    RecommendWorld::new()
}

#[given("a POI dataset exists on disk")]
fn dataset_exists(#[from(world)] world: &RecommendWorld) {
    world.workspace.write_town();
}

#[given("a valid recommendation request exists on disk")]
fn valid_request_exists(#[from(world)] world: &RecommendWorld) {
    world.workspace.write_request(&format!(
        r#"{{"business_type": "restaurant", "alternatives": {{
            "north": {{"lat": -6.632, "lon": 108.552}},
            "centre": {{"lat": {}, "lon": {}, "sewa_cost": 40000000}}
        }}}}"#,
        CENTRE.0, CENTRE.1
    ));
}

#[given("the recommendation request contains invalid JSON")]
fn request_contains_invalid_json(#[from(world)] world: &RecommendWorld) {
    world.workspace.write_request("{ not valid json");
}

#[given("I omit the recommendation request path")]
fn omit_request_path(#[from(world)] world: &RecommendWorld) {
    *world.include_request.borrow_mut() = false;
}

#[given("I select the topsis ranking method")]
fn select_topsis(#[from(world)] world: &RecommendWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_METHOD}"), "topsis".to_owned()]);
}

#[given("I select the electre ranking method")]
fn select_electre(#[from(world)] world: &RecommendWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_METHOD}"), "electre".to_owned()]);
}

#[when("I run the recommend command")]
fn run_recommend_command(#[from(world)] world: &RecommendWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Recommend(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_recommend_with(args, &mut *buffer)
        }
        Command::Score(_) => panic!("expected recommend command"),
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints ranked JSON output")]
fn command_succeeds(#[from(world)] world: &RecommendWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(error) = result {
        panic!("expected success, found {error}");
    }

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let output: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    assert_eq!(output["status"], "success");
    let data = output["data"].as_array().expect("data array");
    let ids: Vec<&str> = data
        .iter()
        .filter_map(|entry| entry["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["centre", "north"]);
    let tags = data[0]["tags"].as_array().expect("tags array");
    assert!(!tags.is_empty());
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &RecommendWorld) {
    match &*world.error() {
        CliError::ParseRequest { .. } => {}
        other => panic!("expected ParseRequest, found {other:?}"),
    }
}

#[then("the command fails because the request path is missing")]
fn command_fails_missing_request_path(#[from(world)] world: &RecommendWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_REQUEST),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the arguments are invalid")]
fn command_fails_invalid_arguments(#[from(world)] world: &RecommendWorld) {
    match &*world.error() {
        CliError::ArgumentParsing(_) => {}
        other => panic!("expected ArgumentParsing, found {other:?}"),
    }
}

macro_rules! register_recommend_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/recommend_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: RecommendWorld) {
            let _ = world;
        }
    };
}

register_recommend_scenario!(recommend_happy_path, "ranking a request from JSON");
register_recommend_scenario!(recommend_topsis, "ranking with TOPSIS");
register_recommend_scenario!(recommend_invalid_json, "rejecting invalid JSON input");
register_recommend_scenario!(recommend_missing_request, "rejecting missing request paths");
register_recommend_scenario!(recommend_unknown_method, "rejecting an unknown ranking method");
