// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process stub of the BPRS backend for integration tests.
//!
//! Runs an axum router on an ephemeral localhost port and counts the calls
//! each endpoint receives.

#![allow(dead_code)]

use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use bprs_client::{
    storage::GuestSearchGate, ApiGateway, BprsApi, Session, SharedStorage, TokenStore,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct StubUser {
    pub password: String,
    pub profile: Value,
}

/// Shared state of the stub backend.
#[derive(Default)]
pub struct StubState {
    /// email → user
    pub users: Mutex<HashMap<String, StubUser>>,
    /// access token → email
    pub access_tokens: Mutex<HashMap<String, String>>,
    /// refresh token → email
    pub refresh_tokens: Mutex<HashMap<String, String>>,

    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub me_calls: AtomicUsize,
    pub interests_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    /// Searches that carried an `Authorization` header.
    pub authorized_searches: AtomicUsize,

    /// Reject every bearer token, even freshly issued ones.
    pub reject_all_access: AtomicBool,
    /// Answer refresh without a new refresh token.
    pub refresh_without_rotation: AtomicBool,
    pub logout_fails: AtomicBool,
    pub interests_fail: AtomicBool,
    /// Forced response for `/search/`.
    pub search_failure: Mutex<Option<(StatusCode, Value)>>,

    next_token: AtomicUsize,
}

impl StubState {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn issue(&self, email: &str) -> (String, String) {
        let n = self.next_token.fetch_add(1, Ordering::SeqCst);
        let access = format!("access-{}", n);
        let refresh = format!("refresh-{}", n);
        self.access_tokens
            .lock()
            .unwrap()
            .insert(access.clone(), email.to_string());
        self.refresh_tokens
            .lock()
            .unwrap()
            .insert(refresh.clone(), email.to_string());
        (access, refresh)
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<String, Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        let email = token.and_then(|t| self.access_tokens.lock().unwrap().get(t).cloned());

        match email {
            Some(email) if !self.reject_all_access.load(Ordering::SeqCst) => Ok(email),
            _ => Err(detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")),
        }
    }

    fn profile(&self, email: &str) -> Value {
        self.users.lock().unwrap()[email].profile.clone()
    }
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RefreshBody {
    refresh_token: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    full_name: String,
    password: String,
}

#[derive(Deserialize)]
struct InterestsBody {
    interests: Vec<String>,
}

#[derive(Deserialize)]
struct SearchBody {
    query: String,
    top_k: Option<usize>,
}

async fn login(State(state): State<Arc<StubState>>, Form(form): Form<LoginForm>) -> Response {
    state.login_calls.fetch_add(1, Ordering::SeqCst);

    let ok = state
        .users
        .lock()
        .unwrap()
        .get(&form.username)
        .is_some_and(|u| u.password == form.password);
    if !ok {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }

    let (access, refresh) = state.issue(&form.username);
    Json(json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer"
    }))
    .into_response()
}

async fn refresh(State(state): State<Arc<StubState>>, Json(body): Json<RefreshBody>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let email = state
        .refresh_tokens
        .lock()
        .unwrap()
        .get(&body.refresh_token)
        .cloned();
    let Some(email) = email else {
        return detail(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    };

    let (access, refresh) = state.issue(&email);
    if state.refresh_without_rotation.load(Ordering::SeqCst) {
        Json(json!({ "access_token": access })).into_response()
    } else {
        Json(json!({ "access_token": access, "refresh_token": refresh })).into_response()
    }
}

async fn logout(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);

    if state.logout_fails.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Logout unavailable");
    }
    if let Err(resp) = state.authenticate(&headers) {
        return resp;
    }
    Json(json!({ "message": "Successfully logged out" })).into_response()
}

async fn register(
    State(state): State<Arc<StubState>>,
    Json(body): Json<RegisterBody>,
) -> Response {
    state.register_calls.fetch_add(1, Ordering::SeqCst);

    if state.users.lock().unwrap().contains_key(&body.email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }

    let profile = profile_json(&body.email, Some(&body.full_name), &[]);
    state.users.lock().unwrap().insert(
        body.email.clone(),
        StubUser {
            password: body.password,
            profile: profile.clone(),
        },
    );
    (StatusCode::CREATED, Json(profile)).into_response()
}

async fn me(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);

    match state.authenticate(&headers) {
        Ok(email) => Json(state.profile(&email)).into_response(),
        Err(resp) => resp,
    }
}

async fn update_interests(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<InterestsBody>,
) -> Response {
    state.interests_calls.fetch_add(1, Ordering::SeqCst);

    let email = match state.authenticate(&headers) {
        Ok(email) => email,
        Err(resp) => return resp,
    };
    if state.interests_fail.load(Ordering::SeqCst) {
        return detail(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
    }

    let mut users = state.users.lock().unwrap();
    let user = users.get_mut(&email).unwrap();
    user.profile["interests"] = json!(body.interests);
    Json(user.profile.clone()).into_response()
}

async fn search(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<SearchBody>,
) -> Response {
    state.search_calls.fetch_add(1, Ordering::SeqCst);

    // Guests may search; a bearer token, if sent, must be valid.
    if headers.contains_key(header::AUTHORIZATION) {
        state.authorized_searches.fetch_add(1, Ordering::SeqCst);
        if let Err(resp) = state.authenticate(&headers) {
            return resp;
        }
    }
    if let Some((status, body)) = state.search_failure.lock().unwrap().clone() {
        return (status, Json(body)).into_response();
    }

    let mut results = vec![
        json!({ "title": "The Rust Programming Language", "authors": ["Steve Klabnik", "Carol Nichols"], "rerank_score": 0.93 }),
        json!({ "title": "Programming Rust", "authors": "Jim Blandy, Jason Orendorff", "similarity": 0.81 }),
    ];
    results.truncate(body.top_k.unwrap_or(results.len()));

    Json(json!({
        "success": true,
        "query": body.query,
        "total_results": results.len(),
        "results": results
    }))
    .into_response()
}

/// Authenticated endpoint answering 204 with no body.
async fn no_content(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    match state.authenticate(&headers) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(resp) => resp,
    }
}

fn profile_json(email: &str, full_name: Option<&str>, interests: &[&str]) -> Value {
    json!({
        "id": format!("user-{}", email),
        "email": email,
        "full_name": full_name,
        "role": "user",
        "is_active": true,
        "created_at": "2026-01-15T10:00:00+00:00",
        "interests": interests
    })
}

/// Running stub backend.
pub struct StubBackend {
    pub base_url: String,
    pub state: Arc<StubState>,
}

impl StubBackend {
    /// Seed a registered user.
    pub fn add_user(&self, email: &str, password: &str, interests: &[&str]) {
        self.state.users.lock().unwrap().insert(
            email.to_string(),
            StubUser {
                password: password.to_string(),
                profile: profile_json(email, Some("Ada Lovelace"), interests),
            },
        );
    }

    /// Issue a valid token pair for a seeded user, as a previous login would have.
    pub fn issue_tokens(&self, email: &str) -> (String, String) {
        self.state.issue(email)
    }

    /// Make an access token unknown to the backend, as if it had expired.
    pub fn expire_access_token(&self, token: &str) {
        self.state.access_tokens.lock().unwrap().remove(token);
    }

    pub fn revoke_refresh_token(&self, token: &str) {
        self.state.refresh_tokens.lock().unwrap().remove(token);
    }

    pub fn gateway(&self, storage: SharedStorage) -> ApiGateway {
        ApiGateway::with_client(reqwest::Client::new(), &self.base_url, TokenStore::new(storage))
    }

    pub fn session(&self, storage: SharedStorage) -> Session {
        let api = BprsApi::new(self.gateway(storage.clone()));
        Session::with_api(api, storage, GuestSearchGate::default())
    }
}

/// Start the stub backend on an ephemeral port.
pub async fn start_stub() -> StubBackend {
    let state = Arc::new(StubState::default());

    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/users/register", post(register))
        .route("/users/me", get(me))
        .route("/users/me/interests", patch(update_interests))
        .route("/search/", post(search))
        .route("/no-content", post(no_content))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub backend");
    let addr = listener.local_addr().expect("Stub backend has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    StubBackend {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No address");
    drop(listener);
    format!("http://{}", addr)
}
