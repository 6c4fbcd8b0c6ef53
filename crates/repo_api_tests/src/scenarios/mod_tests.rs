use super::*;
use std::collections::HashSet;

use api_harness::ApiResponse;
use serde_json::{Value, json};

fn response(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(
        status.try_into().expect("valid status"),
        Default::default(),
        body.to_string(),
    )
}

#[test]
fn test_repository_body_with_name_and_description() {
    let body = repository_body(Some("my-repo"), Some("This is a test repository"));

    let parsed: Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(
        parsed,
        json!({ "name": "my-repo", "description": "This is a test repository" })
    );
}

#[test]
fn test_repository_body_omits_missing_fields() {
    let parsed: Value =
        serde_json::from_str(&repository_body(None, Some("only"))).expect("valid JSON");
    assert_eq!(parsed, json!({ "description": "only" }));

    assert_eq!(repository_body(None, None), "{  }");
}

#[test]
fn test_repository_body_escapes_special_characters() {
    let body = repository_body(None, Some("!#$%^&*()_+| \"quoted\" \\"));

    let parsed: Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(parsed["description"], "!#$%^&*()_+| \"quoted\" \\");
}

#[test]
fn test_github_error_accepts_documented_error() {
    let resp = response(
        401,
        json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        }),
    );

    assert!(github_error(401, BAD_CREDENTIALS).verify(&resp).is_ok());
}

#[test]
fn test_github_error_requires_documentation_url() {
    let resp = response(404, json!({ "message": "Not Found" }));

    assert!(github_error(404, NOT_FOUND).verify(&resp).is_err());
}

#[test]
fn test_github_error_rejects_wrong_message() {
    let resp = response(
        401,
        json!({
            "message": "Requires authentication",
            "documentation_url": "https://docs.github.com/rest"
        }),
    );

    assert!(github_error(401, BAD_CREDENTIALS).verify(&resp).is_err());
}

#[test]
fn test_all_scenarios_have_unique_names() {
    let scenarios = Scenario::all();
    let names: HashSet<String> = scenarios.iter().map(Scenario::name).collect();

    assert_eq!(names.len(), scenarios.len());
}

#[test]
fn test_edit_scenario_runs_once_per_description() {
    let edits: Vec<Scenario> = Scenario::all()
        .into_iter()
        .filter(|s| matches!(s, Scenario::EditRepo(_)))
        .collect();

    assert_eq!(edits.len(), edit::NEW_DESCRIPTIONS.len());
    assert_eq!(
        edits[1].name(),
        "edit_repo[12345]",
        "parameterized scenarios carry their description in the name"
    );
}

#[test]
fn test_groups_are_contiguous_in_execution_order() {
    let groups: Vec<ScenarioGroup> = Scenario::all().iter().map(Scenario::group).collect();

    let mut seen = Vec::new();
    for group in groups {
        if seen.last() != Some(&group) {
            assert!(!seen.contains(&group), "{group:?} is split in execution order");
            seen.push(group);
        }
    }
    assert_eq!(
        seen,
        vec![
            ScenarioGroup::Create,
            ScenarioGroup::Get,
            ScenarioGroup::Edit,
            ScenarioGroup::Delete
        ]
    );
}

#[test]
fn test_only_delete_group_shares_context() {
    assert!(ScenarioGroup::Delete.shares_context());
    assert!(!ScenarioGroup::Create.shares_context());
    assert!(!ScenarioGroup::Get.shares_context());
    assert!(!ScenarioGroup::Edit.shares_context());
}

#[test]
fn test_display_matches_name() {
    assert_eq!(Scenario::DeleteRepo.to_string(), "delete_repo");
    assert_eq!(
        Scenario::EditRepo("12345").to_string(),
        Scenario::EditRepo("12345").name()
    );
}
