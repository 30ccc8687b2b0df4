#![allow(dead_code)]

//! Shared test helpers: an in-process mock of the hospital API

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Form, Json, Router};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use medilink_client::decode_claims;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared, mutable behavior knobs for the mock server
pub struct MockState {
    pub verify_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub fail_verify: AtomicBool,
    pub fail_refresh: AtomicBool,
    /// Lifetime of tokens minted by the mock, in seconds
    pub token_ttl: AtomicI64,
    /// Delay applied to verify/refresh responses, in milliseconds
    pub response_delay_ms: AtomicU64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            verify_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            fail_verify: AtomicBool::new(false),
            fail_refresh: AtomicBool::new(false),
            token_ttl: AtomicI64::new(600),
            response_delay_ms: AtomicU64::new(0),
        }
    }
}

impl MockState {
    pub fn ttl(&self) -> i64 {
        self.token_ttl.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        let millis = self.response_delay_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
        }
    }
}

pub struct MockHospital {
    pub state: Arc<MockState>,
    pub base_url: String,
}

/// Mint an unsigned three-segment token the way the test server does
pub fn mint_token(user_id: i64, name: &str, role: &str, expires_in: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = json!({
        "id": user_id,
        "sub": name,
        "role": role,
        "exp": chrono::Utc::now().timestamp() + expires_in,
    });
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{}.{}.signature", header, payload)
}

/// Start the mock hospital API on an ephemeral port
pub async fn spawn_mock() -> MockHospital {
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route("/token", post(login))
        .route("/verify-token/{token}", get(verify_token))
        .route("/refresh-token", post(refresh_token))
        .route("/doctors", get(list_doctors))
        .route("/patient_requests", get(patient_requests))
        .route("/patients/{patient_id}/appointments/{doctor_id}", post(request_appointment))
        .route("/meetings/{id}", delete(delete_meeting))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockHospital { state, base_url }
}

fn unauthorized(detail: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": detail }))).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    #[allow(unused)]
    password: String,
}

async fn login(State(state): State<Arc<MockState>>, Form(form): Form<LoginForm>) -> Response {
    if form.password != "secret" {
        return unauthorized("Incorrect username or password");
    }
    let token = mint_token(7, &form.username, "patient", state.ttl());
    Json(json!({ "access_token": token })).into_response()
}

async fn verify_token(
    State(state): State<Arc<MockState>>,
    Path(token): Path<String>,
) -> Response {
    state.verify_calls.fetch_add(1, Ordering::SeqCst);
    state.delay().await;
    if state.fail_verify.load(Ordering::SeqCst) {
        return unauthorized("Token is invalid");
    }
    match decode_claims(&token) {
        Ok(claims) => {
            let renewed =
                mint_token(claims.id, &claims.sub, &claims.role.to_string(), state.ttl());
            Json(json!({ "access_token": renewed })).into_response()
        }
        Err(_) => unauthorized("Token is invalid"),
    }
}

async fn refresh_token(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    state.delay().await;
    if state.fail_refresh.load(Ordering::SeqCst) {
        return unauthorized("Token is invalid");
    }
    let Some(token) = bearer_token(&headers) else {
        return unauthorized("Not authenticated");
    };
    match decode_claims(&token) {
        Ok(claims) => {
            let renewed =
                mint_token(claims.id, &claims.sub, &claims.role.to_string(), state.ttl());
            Json(json!({ "access_token": renewed })).into_response()
        }
        Err(_) => unauthorized("Token is invalid"),
    }
}

async fn list_doctors(headers: HeaderMap) -> Response {
    if bearer_token(&headers).is_none() {
        return unauthorized("Not authenticated");
    }
    Json(json!([
        {
            "id": 3,
            "specialty": "cardiology",
            "phone_number": "555-0100",
            "address": "1 Hospital Way",
            "is_confirmed": true,
            "user_id": 13,
            "name": "Greta",
            "surname": "House"
        },
        {
            "id": 4,
            "specialty": "dermatology",
            "phone_number": "555-0101",
            "address": "1 Hospital Way",
            "is_confirmed": false,
            "user_id": 14
        }
    ]))
    .into_response()
}

async fn patient_requests(headers: HeaderMap) -> Response {
    if bearer_token(&headers).is_none() {
        return unauthorized("Not authenticated");
    }
    Json(json!([
        {
            "id": 1,
            "patient_id": 7,
            "doctor_id": 3,
            "scheduled_date": "2026-09-01T10:30:00",
            "status": "pending",
            "medical_records": []
        }
    ]))
    .into_response()
}

#[derive(Deserialize)]
struct AppointmentBody {
    scheduled_date: String,
}

async fn request_appointment(
    Path((patient_id, doctor_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(body): Json<AppointmentBody>,
) -> Response {
    if bearer_token(&headers).is_none() {
        return unauthorized("Not authenticated");
    }
    Json(json!({
        "id": 42,
        "patient_id": patient_id,
        "doctor_id": doctor_id,
        "scheduled_date": body.scheduled_date,
        "status": "pending",
        "medical_records": []
    }))
    .into_response()
}

async fn delete_meeting(Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if bearer_token(&headers).is_none() {
        return unauthorized("Not authenticated");
    }
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Appointment not found" })),
        )
            .into_response();
    }
    Json(json!({ "message": "Appointment deleted successfully" })).into_response()
}
