use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin::AdminState;
use crate::routing::{normalize, RuleRecord, RuleSet};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub rules: usize,
}

#[derive(Serialize)]
pub struct ReplaceSummary {
    pub accepted: usize,
    pub dropped: usize,
    pub rules: Vec<RuleRecord>,
}

#[derive(Deserialize)]
pub struct LookupRequest {
    pub path: String,
}

#[derive(Serialize)]
pub struct LookupResult {
    pub key: String,
    pub destination: Option<String>,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        rules: state.redirector.snapshot().len(),
    })
}

/// Rules in their editing form.
pub async fn get_rules(State(state): State<AdminState>) -> Json<Vec<RuleRecord>> {
    Json(state.redirector.snapshot().to_records())
}

/// Rules in their matcher form.
pub async fn get_compiled_rules(State(state): State<AdminState>) -> Json<RuleSet> {
    Json(RuleSet::clone(&state.redirector.snapshot()))
}

/// Replace the whole rule set with the sanitized request body.
///
/// Any JSON is accepted; records that fail validation are dropped and
/// counted.
pub async fn put_rules(State(state): State<AdminState>, body: Bytes) -> Response {
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected rule upload with invalid JSON");
            return (StatusCode::BAD_REQUEST, "Invalid JSON body").into_response();
        }
    };
    let received = raw.as_array().map_or(0, Vec::len);

    match state.redirector.replace(&raw).await {
        Ok(rules) => {
            tracing::info!(received, accepted = rules.len(), "Redirect rules replaced");
            Json(ReplaceSummary {
                accepted: rules.len(),
                dropped: received - rules.len(),
                rules: rules.to_records(),
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to replace rules");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to persist rules").into_response()
        }
    }
}

/// Report which destination a path would redirect to.
pub async fn lookup(
    State(state): State<AdminState>,
    Json(request): Json<LookupRequest>,
) -> Json<LookupResult> {
    Json(LookupResult {
        key: normalize(&request.path),
        destination: state.redirector.resolve(&request.path),
    })
}
