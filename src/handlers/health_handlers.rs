//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks the storage directory is readable

use crate::services::storage_service::StorageService;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;

/// `GET /healthz`
///
/// Liveness probe. Always returns 200 OK and never performs I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// Readiness probe that enumerates the storage directory. Nothing is written,
/// so the probe never shows up in `GET /files`.
///
/// HTTP 200 when the directory is readable, HTTP 503 otherwise.
pub async fn readyz(State(service): State<StorageService>) -> impl IntoResponse {
    let storage_check = match service.check_readable().await {
        Ok(()) => CheckStatus {
            ok: true,
            error: None,
        },
        Err(e) => CheckStatus {
            ok: false,
            error: Some(format!("could not read storage directory: {}", e)),
        },
    };

    let ok = storage_check.ok;
    let mut checks = HashMap::new();
    checks.insert("storage", storage_check);

    let body = ReadyResponse {
        status: if ok { "ok".into() } else { "error".into() },
        checks,
    };

    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}
