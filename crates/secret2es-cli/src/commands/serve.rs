//! serve command - HTTP front end for the converter
//!
//! Endpoints:
//! - `POST /api/convert` - convert the YAML in a JSON request
//! - `GET /api/health` - liveness and version
//!
//! Each request converts with its own environment map; the process
//! environment is never read.

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secret2es_convert::{
    ConvertOptions, CreationPolicy, SecretStoreRef, StoreKind, convert_with_env,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::{CliError, Result};

/// Body of `POST /api/convert`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertRequest {
    pub content: String,
    pub store_type: String,
    pub store_name: String,
    pub creation_policy: String,
    pub resolve: bool,
    pub env_vars: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the router with all routes
pub fn build_router() -> Router {
    Router::new()
        .route("/api/convert", post(convert_handler))
        .route("/api/health", get(health_handler))
}

pub async fn run(bind: &str, port: u16) -> Result<()> {
    let addr = format!("{bind}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| CliError::io_at(&addr, e))?;

    info!("secret2es v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, build_router())
        .await
        .map_err(|e| CliError::internal(e.to_string()))
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

async fn convert_handler(payload: std::result::Result<Json<ConvertRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON input: {}", rejection.body_text()),
            );
        }
    };

    let missing: Vec<&str> = [
        ("content", &request.content),
        ("storeType", &request.store_type),
        ("storeName", &request.store_name),
        ("creationPolicy", &request.creation_policy),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Missing required fields: {}", missing.join(", ")),
        );
    }

    if request.resolve && request.env_vars.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Resolve is set to true but no environment variables provided",
        );
    }

    let options = match request_options(&request) {
        Ok(options) => options,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    match convert_with_env(&request.content, options, &request.env_vars) {
        Ok(result) => {
            info!(
                converted = result.converted.len(),
                skipped = result.warnings.len(),
                "conversion request handled"
            );
            let warnings = (!result.warnings.is_empty()).then(|| result.warnings_text());
            Json(ConvertResponse {
                result: result.output,
                warnings,
            })
            .into_response()
        }
        Err(err) => {
            warn!(error = %err, "conversion request failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Conversion error: {err}"),
            )
        }
    }
}

fn request_options(
    request: &ConvertRequest,
) -> std::result::Result<ConvertOptions, secret2es_convert::ConvertError> {
    Ok(ConvertOptions {
        store: SecretStoreRef {
            name: request.store_name.clone(),
            kind: request.store_type.parse::<StoreKind>()?,
        },
        creation_policy: request.creation_policy.parse::<CreationPolicy>()?,
        resolve_env: request.resolve,
        ..ConvertOptions::default()
    })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
