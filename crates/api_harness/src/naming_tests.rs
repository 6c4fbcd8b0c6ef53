use super::*;
use serial_test::serial;

fn with_github_ref<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
    unsafe {
        match value {
            Some(v) => std::env::set_var("GITHUB_REF", v),
            None => std::env::remove_var("GITHUB_REF"),
        }
    }
    let result = f();
    unsafe {
        std::env::remove_var("GITHUB_REF");
    }
    result
}

#[test]
#[serial]
fn test_generate_test_repo_name() {
    let name = with_github_ref(None, || generate_test_repo_name("create"));

    assert!(name.starts_with("test-repo-api-local-"));
    assert!(name.contains("-create-"));
    assert!(is_test_repository(&name));
    assert!(name.len() <= 100, "GitHub limits repository names to 100 characters");
}

#[test]
#[serial]
fn test_generated_names_are_unique() {
    let first = generate_test_repo_name("delete");
    let second = generate_test_repo_name("delete");

    assert_ne!(first, second);
}

#[test]
#[serial]
fn test_get_workflow_context_pr() {
    let context = with_github_ref(Some("refs/pull/456/merge"), get_workflow_context);
    assert_eq!(context, "pr456");
}

#[test]
#[serial]
fn test_get_workflow_context_main_branch() {
    assert_eq!(
        with_github_ref(Some("refs/heads/main"), get_workflow_context),
        "main"
    );
    assert_eq!(
        with_github_ref(Some("refs/heads/master"), get_workflow_context),
        "main"
    );
}

#[test]
#[serial]
fn test_get_workflow_context_feature_branch() {
    let context = with_github_ref(Some("refs/heads/feature/new-feature"), get_workflow_context);
    assert_eq!(context, "feature-new-feature");
}

#[test]
#[serial]
fn test_get_workflow_context_local() {
    assert_eq!(with_github_ref(None, get_workflow_context), "local");
}

#[test]
fn test_is_test_repository() {
    assert!(is_test_repository("test-repo-api-pr12-20240108-120000-create-a1b2c3"));
    assert!(!is_test_repository("hello-world"));
    assert!(!is_test_repository("my-repo"));
    assert!(!is_test_repository("Test-repo-api-main"));
}
