//! In-process stand-in for the GitHub repository endpoints.
//!
//! [`FakeGitHub`] is a stateful wiremock responder that keeps repositories in
//! memory and answers the four repository operations with the status codes
//! and messages GitHub uses, including the authentication asymmetries: an
//! anonymous edit gets `404` and an anonymous delete gets `403`. It lets the
//! whole suite, teardown included, run without network access or
//! credentials.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::Result;
use api_harness::HarnessConfig;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate, matchers::any};

#[cfg(test)]
#[path = "mock_github_tests.rs"]
mod tests;

const CREATE_DOCS: &str =
    "https://docs.github.com/rest/repos/repos#create-a-repository-for-the-authenticated-user";
const LIST_DOCS: &str =
    "https://docs.github.com/rest/repos/repos#list-repositories-for-the-authenticated-user";
const GET_DOCS: &str = "https://docs.github.com/rest/repos/repos#get-a-repository";
const UPDATE_DOCS: &str = "https://docs.github.com/rest/repos/repos#update-a-repository";
const DELETE_DOCS: &str = "https://docs.github.com/rest/repos/repos#delete-a-repository";
const AUTH_DOCS: &str = "https://docs.github.com/rest";

const DEFAULT_PER_PAGE: usize = 30;
const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Caller {
    Anonymous,
    Authenticated,
    InvalidToken,
}

#[derive(Debug)]
struct StoredRepository {
    id: u64,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    repositories: BTreeMap<String, StoredRepository>,
    next_id: u64,
}

/// Fake GitHub API holding one account's repositories.
///
/// Clones share state, so a test can keep a handle after mounting the fake
/// and inspect which repositories are left.
#[derive(Debug, Clone)]
pub struct FakeGitHub {
    owner: String,
    token: String,
    state: Arc<Mutex<State>>,
}

impl FakeGitHub {
    pub fn new(owner: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            token: token.into(),
            state: Arc::new(Mutex::new(State {
                repositories: BTreeMap::new(),
                next_id: 1_000,
            })),
        }
    }

    /// Seeds a repository created now.
    pub fn with_repository(self, name: &str, description: Option<&str>) -> Self {
        self.insert(name, description.map(str::to_string), Utc::now());
        self
    }

    /// Seeds a repository with an explicit creation time.
    pub fn with_repository_created_at(self, name: &str, created_at: DateTime<Utc>) -> Self {
        self.insert(name, None, created_at);
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Names of the repositories currently stored, sorted.
    pub fn repository_names(&self) -> Vec<String> {
        self.lock_state().repositories.keys().cloned().collect()
    }

    /// The API representation of a stored repository.
    pub fn repository(&self, name: &str) -> Option<Value> {
        let state = self.lock_state();
        state
            .repositories
            .get(name)
            .map(|stored| self.repository_json(name, stored))
    }

    /// Starts a mock server answering every request with this fake.
    pub async fn start(&self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(self.clone())
            .mount(&server)
            .await;
        server
    }

    /// Suite configuration pointing at `server`, authenticated as the owner.
    pub fn harness_config(&self, server: &MockServer, repo_name: &str) -> Result<HarnessConfig> {
        Ok(HarnessConfig {
            base_url: server.uri().parse()?,
            owner: self.owner.clone(),
            auth_token: self.token.clone().into(),
            repo_name: repo_name.to_string(),
        })
    }

    fn insert(&self, name: &str, description: Option<String>, created_at: DateTime<Utc>) -> Value {
        let mut state = self.lock_state();
        state.next_id += 1;
        let stored = StoredRepository {
            id: state.next_id,
            description,
            created_at,
        };
        let json = self.repository_json(name, &stored);
        state.repositories.insert(name.to_string(), stored);
        json
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn repository_json(&self, name: &str, stored: &StoredRepository) -> Value {
        json!({
            "id": stored.id,
            "node_id": format!("R_fake{}", stored.id),
            "name": name,
            "full_name": format!("{}/{}", self.owner, name),
            "private": false,
            "owner": {
                "login": self.owner,
                "id": 1,
                "type": "User"
            },
            "html_url": format!("https://github.com/{}/{}", self.owner, name),
            "description": stored.description,
            "created_at": stored.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    fn caller(&self, request: &Request) -> Caller {
        let Some(value) = request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
        else {
            return Caller::Anonymous;
        };

        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("token "))
            .unwrap_or(value);
        if token == self.token {
            Caller::Authenticated
        } else {
            Caller::InvalidToken
        }
    }

    fn create_repository(&self, caller: &Caller, request: &Request) -> ResponseTemplate {
        if *caller == Caller::Anonymous {
            return error(401, "Requires authentication", AUTH_DOCS);
        }

        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return error(400, "Problems parsing JSON", CREATE_DOCS);
        };
        let Some(name) = body.get("name").and_then(Value::as_str) else {
            return validation_failed("missing_field", None);
        };
        if self.lock_state().repositories.contains_key(name) {
            return validation_failed("custom", Some("name already exists on this account"));
        }

        let description = body
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);
        let created = self.insert(name, description, Utc::now());
        ResponseTemplate::new(201).set_body_json(created)
    }

    fn list_repositories(&self, caller: &Caller, request: &Request) -> ResponseTemplate {
        if *caller == Caller::Anonymous {
            return error(401, "Requires authentication", LIST_DOCS);
        }

        let mut per_page = DEFAULT_PER_PAGE;
        let mut page = 1;
        for (key, value) in request.url.query_pairs() {
            match key.as_ref() {
                "per_page" => per_page = value.parse().unwrap_or(DEFAULT_PER_PAGE),
                "page" => page = value.parse().unwrap_or(1),
                _ => {}
            }
        }
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let page = page.max(1);

        let state = self.lock_state();
        let repositories: Vec<Value> = state
            .repositories
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(|(name, stored)| self.repository_json(name, stored))
            .collect();
        ResponseTemplate::new(200).set_body_json(repositories)
    }

    fn get_repository(&self, owner: &str, name: &str) -> ResponseTemplate {
        match (owner == self.owner).then(|| self.repository(name)).flatten() {
            Some(repository) => ResponseTemplate::new(200).set_body_json(repository),
            None => error(404, "Not Found", GET_DOCS),
        }
    }

    fn update_repository(
        &self,
        caller: &Caller,
        owner: &str,
        name: &str,
        request: &Request,
    ) -> ResponseTemplate {
        if *caller == Caller::Anonymous || owner != self.owner {
            return error(404, "Not Found", UPDATE_DOCS);
        }
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return error(400, "Problems parsing JSON", UPDATE_DOCS);
        };

        let mut state = self.lock_state();
        let Some(stored) = state.repositories.get_mut(name) else {
            return error(404, "Not Found", UPDATE_DOCS);
        };
        if let Some(description) = body.get("description") {
            stored.description = description.as_str().map(str::to_string);
        }
        let updated = self.repository_json(name, stored);
        ResponseTemplate::new(200).set_body_json(updated)
    }

    fn delete_repository(&self, caller: &Caller, owner: &str, name: &str) -> ResponseTemplate {
        if *caller == Caller::Anonymous {
            return error(403, "Must have admin rights to Repository.", DELETE_DOCS);
        }
        if owner != self.owner {
            return error(404, "Not Found", DELETE_DOCS);
        }

        match self.lock_state().repositories.remove(name) {
            Some(_) => ResponseTemplate::new(204),
            None => error(404, "Not Found", DELETE_DOCS),
        }
    }
}

impl Respond for FakeGitHub {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let caller = self.caller(request);
        if caller == Caller::InvalidToken {
            return error(401, "Bad credentials", AUTH_DOCS);
        }

        let segments: Vec<&str> = request
            .url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["user", "repos"]) => self.create_repository(&caller, request),
            ("GET", ["user", "repos"]) => self.list_repositories(&caller, request),
            ("GET", ["repos", owner, name]) => self.get_repository(owner, name),
            ("PATCH", ["repos", owner, name]) => {
                self.update_repository(&caller, owner, name, request)
            }
            ("DELETE", ["repos", owner, name]) => self.delete_repository(&caller, owner, name),
            _ => error(404, "Not Found", AUTH_DOCS),
        }
    }
}

fn error(status: u16, message: &str, documentation_url: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "message": message,
        "documentation_url": documentation_url,
    }))
}

fn validation_failed(code: &str, message: Option<&str>) -> ResponseTemplate {
    let mut detail = json!({
        "resource": "Repository",
        "code": code,
        "field": "name",
    });
    if let Some(message) = message {
        detail["message"] = json!(message);
    }
    ResponseTemplate::new(422).set_body_json(json!({
        "message": "Repository creation failed.",
        "errors": [detail],
        "documentation_url": CREATE_DOCS,
    }))
}
