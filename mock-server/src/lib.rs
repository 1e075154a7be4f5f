use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SECRET_HEADER: &str = "x-secret";
const ISSUER: &str = "MockOtp";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    pub verified: bool,
    pub enabled: bool,
    pub secret: String,
    pub auth_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedOtp {
    pub secret: String,
    pub auth_url: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub user_id: i64,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Problem {
    pub problem: String,
}

/// Shared secret the server expects and the single token it accepts.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub secret: String,
    pub valid_token: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            secret: "test-secret".to_string(),
            valid_token: "123456".to_string(),
        }
    }
}

pub type Db = Arc<RwLock<HashMap<i64, OtpRecord>>>;

#[derive(Clone)]
struct AppState {
    config: Arc<MockConfig>,
    db: Db,
}

type ApiError = (StatusCode, Json<Problem>);

fn problem(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(Problem {
            problem: message.to_string(),
        }),
    )
}

fn not_found() -> ApiError {
    problem(StatusCode::NOT_FOUND, "otp not found")
}

pub fn app(config: MockConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route("/users/{id}/otp", get(get_otp).post(create_otp).delete(delete_otp))
        .route("/users/{id}/otp/disable", post(disable_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/otp/validate", post(validate_otp))
        .layer(middleware::from_fn_with_state(state.clone(), require_secret))
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

async fn require_secret(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if provided != Some(state.config.secret.as_str()) {
        tracing::warn!(path = %request.uri().path(), "rejected request with invalid secret");
        return problem(StatusCode::UNAUTHORIZED, "invalid secret").into_response();
    }
    next.run(request).await
}

fn new_record(user_id: i64) -> OtpRecord {
    let secret = Uuid::new_v4().simple().to_string().to_uppercase();
    let auth_url = format!("otpauth://totp/{ISSUER}:{user_id}?secret={secret}&issuer={ISSUER}");
    OtpRecord {
        verified: false,
        enabled: false,
        secret,
        auth_url,
    }
}

async fn get_otp(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OtpRecord>, ApiError> {
    let db = state.db.read().await;
    db.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn create_otp(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CreatedOtp>, ApiError> {
    let mut db = state.db.write().await;
    if db.get(&id).is_some_and(|record| record.enabled) {
        return Err(problem(StatusCode::CONFLICT, "otp already enabled"));
    }
    let record = new_record(id);
    let created = CreatedOtp {
        secret: record.secret.clone(),
        auth_url: record.auth_url.clone(),
    };
    db.insert(id, record);
    tracing::info!(user_id = id, "created otp");
    Ok(Json(created))
}

async fn disable_otp(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut db = state.db.write().await;
    let record = db.get_mut(&id).ok_or_else(not_found)?;
    record.enabled = false;
    tracing::info!(user_id = id, "disabled otp");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_otp(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut db = state.db.write().await;
    db.remove(&id).ok_or_else(not_found)?;
    tracing::info!(user_id = id, "deleted otp");
    Ok(StatusCode::NO_CONTENT)
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> Result<StatusCode, ApiError> {
    let mut db = state.db.write().await;
    let record = db.get_mut(&input.user_id).ok_or_else(not_found)?;
    if input.token != state.config.valid_token {
        tracing::debug!(user_id = input.user_id, "verify rejected token");
        return Err(problem(StatusCode::BAD_REQUEST, "invalid token"));
    }
    record.verified = true;
    record.enabled = true;
    tracing::info!(user_id = input.user_id, "verified otp");
    Ok(StatusCode::NO_CONTENT)
}

async fn validate_otp(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> Result<StatusCode, ApiError> {
    let db = state.db.read().await;
    let record = db.get(&input.user_id).ok_or_else(not_found)?;
    if !record.enabled {
        return Err(problem(StatusCode::CONFLICT, "otp not enabled"));
    }
    if input.token != state.config.valid_token {
        tracing::debug!(user_id = input.user_id, "validate rejected token");
        return Err(problem(StatusCode::BAD_REQUEST, "invalid token"));
    }
    Ok(StatusCode::NO_CONTENT)
}
