// SPDX-License-Identifier: MIT

//! Shared test fixtures: an in-process stub backend plus context builders.
//!
//! The stub speaks just enough of the backend's REST surface for the client
//! to run real HTTP against it, with per-test knobs (scripted profile bodies,
//! forced failure statuses) behind shared mutable state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::Router;
use serde_json::{json, Value};

use fittrack_client::services::{ApiClient, AuthService};
use fittrack_client::session::{SessionState, SessionStore};
use fittrack_client::storage::LocalStore;

/// A user account known to the stub backend.
#[derive(Clone)]
pub struct StubUser {
    pub password: String,
    /// Raw profile body served by `/auth/users/me/` — raw JSON so tests can
    /// hand back malformed metrics like `"height": "abc"`.
    pub profile: Value,
}

/// Shared, scriptable stub state.
#[derive(Default)]
pub struct StubState {
    users: Mutex<HashMap<String, StubUser>>,
    /// When set, `/auth/users/me/` answers with this status instead.
    pub force_me_status: Mutex<Option<u16>>,
    /// Google credentials the stub accepts, mapped to a username.
    google_credentials: Mutex<HashMap<String, String>>,
}

impl StubState {
    #[allow(dead_code)]
    pub fn add_user(&self, username: &str, password: &str, profile: Value) {
        self.users.lock().unwrap().insert(
            username.to_string(),
            StubUser {
                password: password.to_string(),
                profile,
            },
        );
    }

    #[allow(dead_code)]
    pub fn set_profile(&self, username: &str, profile: Value) {
        if let Some(user) = self.users.lock().unwrap().get_mut(username) {
            user.profile = profile;
        }
    }

    #[allow(dead_code)]
    pub fn add_google_credential(&self, credential: &str, username: &str) {
        self.google_credentials
            .lock()
            .unwrap()
            .insert(credential.to_string(), username.to_string());
    }

    fn username_for_token(&self, headers: &HeaderMap) -> Option<String> {
        let auth = headers.get("authorization")?.to_str().ok()?;
        let token = auth.strip_prefix("Bearer ")?;
        let username = token.strip_prefix("access-")?;
        self.users
            .lock()
            .unwrap()
            .contains_key(username)
            .then(|| username.to_string())
    }
}

/// Start the stub backend on an ephemeral port; returns its base URL.
pub async fn spawn_stub_backend(state: Arc<StubState>) -> String {
    let router = Router::new()
        .route("/api/auth/jwt/create/", post(jwt_create))
        .route("/api/auth/users/", post(register))
        .route("/api/auth/users/me/", get(current_user))
        .route("/api/users/google-login/", post(google_login))
        .route("/api/users/validate-credentials/", post(validate_credentials))
        .route("/api/users/validate-email/", post(validate_email))
        .route("/api/users/profile/", patch(update_profile))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub backend");
    });

    format!("http://{}/api", addr)
}

/// Build a client context wired to the stub, with in-memory storage.
#[allow(dead_code)]
pub fn test_context(base_url: &str) -> (AuthService, Arc<SessionStore>, Arc<LocalStore>) {
    fittrack_client::logging::init();
    let api = ApiClient::new(base_url, Duration::from_secs(5)).expect("api client");
    let storage = Arc::new(LocalStore::new_mock());
    let store = Arc::new(SessionStore::new(SessionState::default()));
    let auth = AuthService::new(api, storage.clone(), store.clone());
    (auth, store, storage)
}

/// A valid profile body for the default test user.
#[allow(dead_code)]
pub fn valid_profile(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "height": 180.0,
        "weight": 82.5,
        "initial_weight": 90.0,
        "fitness_goal": 75.0,
        "date_of_birth": "1990-04-01"
    })
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn jwt_create(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    let authorized = state
        .users
        .lock()
        .unwrap()
        .get(&username)
        .is_some_and(|u| u.password == password);

    if authorized {
        (
            StatusCode::OK,
            Json(json!({
                "access": format!("access-{}", username),
                "refresh": format!("refresh-{}", username)
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
    }
}

async fn register(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    if state.users.lock().unwrap().contains_key(&username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["A user with that username already exists."]})),
        );
    }

    let password = body["password"].as_str().unwrap_or_default().to_string();
    let profile = json!({
        "username": username,
        "email": body["email"],
        "height": body.get("height").cloned().unwrap_or(Value::Null),
        "weight": body.get("weight").cloned().unwrap_or(Value::Null),
        "initial_weight": body.get("weight").cloned().unwrap_or(Value::Null),
        "fitness_goal": body.get("fitness_goal").cloned().unwrap_or(Value::Null),
        "date_of_birth": body.get("date_of_birth").cloned().unwrap_or(Value::Null)
    });
    state.add_user(&username, &password, profile);

    (StatusCode::CREATED, Json(json!({"username": username})))
}

async fn current_user(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(status) = *state.force_me_status.lock().unwrap() {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({"detail": "forced failure"})));
    }

    match state.username_for_token(&headers) {
        Some(username) => {
            let profile = state.users.lock().unwrap()[&username].profile.clone();
            (StatusCode::OK, Json(profile))
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        ),
    }
}

async fn google_login(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let credential = body["credential"].as_str().unwrap_or_default();
    let username = state
        .google_credentials
        .lock()
        .unwrap()
        .get(credential)
        .cloned();

    match username {
        Some(username) => (
            StatusCode::OK,
            Json(json!({
                "access": format!("access-{}", username),
                "refresh": format!("refresh-{}", username),
                "user": {
                    "id": 1,
                    "username": username,
                    "email": format!("{}@example.com", username)
                }
            })),
        ),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid credential"})),
        ),
    }
}

async fn validate_credentials(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let username = body["username"].as_str().unwrap_or_default();
    let mut errors = serde_json::Map::new();
    if state.users.lock().unwrap().contains_key(username) {
        errors.insert(
            "username".to_string(),
            json!("This username is already taken"),
        );
    }

    if errors.is_empty() {
        (StatusCode::OK, Json(json!({"valid": true})))
    } else {
        (StatusCode::BAD_REQUEST, Json(Value::Object(errors)))
    }
}

async fn validate_email(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let exists = state
        .users
        .lock()
        .unwrap()
        .values()
        .any(|u| u.profile["email"].as_str() == Some(email.as_str()));

    Json(json!({"email": email, "exists": exists}))
}

async fn update_profile(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let Some(username) = state.username_for_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        );
    };

    let mut users = state.users.lock().unwrap();
    let user = users.get_mut(&username).expect("user exists");
    if let (Some(profile), Some(patch)) = (user.profile.as_object_mut(), body.as_object()) {
        for (key, value) in patch {
            profile.insert(key.clone(), value.clone());
        }
    }

    (StatusCode::OK, Json(user.profile.clone()))
}
