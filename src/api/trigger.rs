//! 求解触发入口
//!
//! `POST /` 接收 `{secret, email, url}`，校验通过后同步求解整条测验链，
//! 把结果 JSON 原样返回。同一时间只运行一条链。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value as JsonValue};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::orchestrator::ChainRunner;

/// 入口拒绝或求解失败
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("Server misconfigured: no secret")]
    Misconfigured,
    #[error("Forbidden")]
    Forbidden,
    #[error("Missing fields (email/url)")]
    MissingFields,
    #[error("Internal server error")]
    Engine(#[source] AppError),
}

impl From<AppError> for TriggerError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::MisconfiguredSecret => TriggerError::Misconfigured,
            other => TriggerError::Engine(other),
        }
    }
}

impl TriggerError {
    fn status(&self) -> StatusCode {
        match self {
            TriggerError::InvalidJson | TriggerError::MissingFields => StatusCode::BAD_REQUEST,
            TriggerError::Forbidden => StatusCode::FORBIDDEN,
            TriggerError::Misconfigured | TriggerError::Engine(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TriggerError {
    fn into_response(self) -> Response {
        let body = match &self {
            TriggerError::Engine(e) => json!({
                "error": self.to_string(),
                "kind": e.kind(),
                "detail": e.to_string(),
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// 入口共享状态
pub struct TriggerState {
    secret: Option<String>,
    runner: ChainRunner,
    run_lock: Mutex<()>,
}

impl TriggerState {
    pub fn new(secret: Option<String>, runner: ChainRunner) -> Self {
        Self {
            secret,
            runner,
            run_lock: Mutex::new(()),
        }
    }

    /// 服务端配置的密钥
    fn expected_secret(&self) -> AppResult<&str> {
        self.secret.as_deref().ok_or_else(|| {
            warn!("收到求解请求，但服务端未配置密钥");
            AppError::MisconfiguredSecret
        })
    }
}

/// 构建路由
pub fn router(state: Arc<TriggerState>) -> Router {
    Router::new()
        .route("/", post(trigger))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<JsonValue> {
    Json(json!({ "status": "ok" }))
}

async fn trigger(
    State(state): State<Arc<TriggerState>>,
    body: Bytes,
) -> Result<Json<JsonValue>, TriggerError> {
    let request: JsonValue = serde_json::from_slice(&body).map_err(|_| TriggerError::InvalidJson)?;
    let fields = request.as_object().ok_or(TriggerError::InvalidJson)?;

    let expected = state.expected_secret()?;
    if fields.get("secret").and_then(JsonValue::as_str) != Some(expected) {
        return Err(TriggerError::Forbidden);
    }

    let non_empty = |key: &str| {
        fields
            .get(key)
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    let (email, url) = match (non_empty("email"), non_empty("url")) {
        (Some(email), Some(url)) => (email, url),
        _ => return Err(TriggerError::MissingFields),
    };

    let _guard = state.run_lock.lock().await;
    info!("📥 收到求解请求: {} {}", email, url);
    let outcome = state.runner.solve(email, expected, url).await?;

    Ok(Json(outcome.result))
}
