use super::*;
use serde_json::json;

fn repository() -> Value {
    json!({
        "id": 1296269,
        "node_id": "MDEwOlJlcG9zaXRvcnkxMjk2MjY5",
        "name": "hello-world",
        "full_name": "octocat/hello-world",
        "private": false,
        "description": null,
        "owner": { "login": "octocat", "id": 1 },
        "topics": ["api", "tests"]
    })
}

fn resolve(path: &str, value: &Value) -> Option<Value> {
    JsonPath::parse(path).expect("valid path").resolve(value)
}

#[test]
fn test_top_level_field() {
    assert_eq!(resolve("name", &repository()), Some(json!("hello-world")));
}

#[test]
fn test_nested_field() {
    assert_eq!(resolve("owner.login", &repository()), Some(json!("octocat")));
}

#[test]
fn test_null_field_is_present() {
    assert_eq!(resolve("description", &repository()), Some(Value::Null));
}

#[test]
fn test_absent_field() {
    assert_eq!(resolve("license.key", &repository()), None);
}

#[test]
fn test_array_index_then_field() {
    let body = json!({
        "message": "Repository creation failed.",
        "errors": [{ "resource": "Repository", "code": "missing_field", "field": "name" }]
    });

    assert_eq!(resolve("errors[0].code", &body), Some(json!("missing_field")));
    assert_eq!(resolve("errors[0].field", &body), Some(json!("name")));
    assert_eq!(resolve("errors[1].code", &body), None);
}

#[test]
fn test_root_index() {
    let body = json!([{ "name": "first" }, { "name": "second" }]);

    assert_eq!(resolve("[1].name", &body), Some(json!("second")));
}

#[test]
fn test_nested_indexes() {
    let body = json!({ "matrix": [[1, 2], [3, 4]] });

    assert_eq!(resolve("matrix[1][0]", &body), Some(json!(3)));
}

#[test]
fn test_size_of_root_array() {
    let body = json!([{ "name": "a" }, { "name": "b" }, { "name": "c" }]);

    assert_eq!(resolve("size()", &body), Some(json!(3)));
}

#[test]
fn test_size_of_nested_values() {
    let body = repository();

    assert_eq!(resolve("topics.size()", &body), Some(json!(2)));
    assert_eq!(resolve("owner.size()", &body), Some(json!(2)));
    assert_eq!(resolve("name.size()", &body), Some(json!(11)));
    assert_eq!(resolve("id.size()", &body), None);
}

#[test]
fn test_field_on_array_is_absent() {
    let body = json!([{ "name": "a" }]);

    assert_eq!(resolve("name", &body), None);
}

#[test]
fn test_malformed_paths() {
    for path in [
        "",
        "owner..login",
        "owner.",
        "errors[0",
        "errors[x]",
        "errors[-1]",
        "errors[0]code",
        "size().name",
        "owner.[0]",
        "size(",
    ] {
        assert!(
            matches!(
                JsonPath::parse(path),
                Err(HarnessError::MalformedJsonPath { .. })
            ),
            "path {path:?} should be rejected"
        );
    }
}

#[test]
fn test_display_round_trips_source() {
    let path = JsonPath::parse("errors[0].code").unwrap();

    assert_eq!(path.to_string(), "errors[0].code");
    assert_eq!(path.as_str(), "errors[0].code");
}
