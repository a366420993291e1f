use std::sync::Arc;

use aicomplyr_core::overrides::OverrideLedger;
use aicomplyr_core::overrides::model::{Actor, OverrideRequest, OverrideStatus, ReviewRequest};
use aicomplyr_core::{OverrideError, ReportGenerator, ReportRequest, ReportRequestParams};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::HeaderMap,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

const USER_HEADER: &str = "x-user-id";
const PERMISSIONS_HEADER: &str = "x-user-permissions";

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ReportGenerator>,
    pub overrides: Arc<OverrideLedger>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/functions/v1/generate_compliance_report",
            get(generate_report_query).post(generate_report_body),
        )
        .route(
            "/api/compliance-reports/{project_id}/latest",
            get(latest_report),
        )
        .route("/api/overrides/reasons", get(override_reasons))
        .route("/api/overrides/request", post(request_override))
        .route("/api/overrides/pending", get(list_overrides))
        .route("/api/overrides/dashboard", get(override_dashboard))
        .route("/api/overrides/{decision_id}/review", post(review_override))
        .route("/api/overrides/{decision_id}/cancel", post(cancel_override))
        .route("/api/overrides/{decision_id}/history", get(override_history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn generate_report_body(
    State(state): State<AppState>,
    body: Result<Json<ReportRequestParams>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(params) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    generate(state, params).await
}

async fn generate_report_query(
    State(state): State<AppState>,
    query: Result<Query<ReportRequestParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    generate(state, params).await
}

async fn generate(state: AppState, params: ReportRequestParams) -> ApiResult<Json<Value>> {
    let request = ReportRequest::try_from(params)?;
    let generator = state.generator.clone();

    let generated = tokio::task::spawn_blocking(move || generator.generate(&request))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(json!({
        "success": true,
        "data": generated.report,
        "persistence": generated.persistence,
    })))
}

async fn latest_report(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(project_id) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let report = state
        .generator
        .store()
        .latest_report(project_id, Utc::now())
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("No current report for project {project_id}"))
        })?;

    Ok(Json(json!({ "success": true, "data": report })))
}

fn actor(headers: &HeaderMap) -> ApiResult<Actor> {
    let user_id = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let granted = headers
        .get(PERMISSIONS_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    Ok(granted
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .fold(Actor::new(user_id), |actor, p| actor.with_permission(p)))
}

fn decision_id(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::Override(OverrideError::DecisionNotFound))
}

async fn override_reasons(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    actor(&headers)?;
    let reasons = state.overrides.reasons()?;
    Ok(Json(json!({ "success": true, "reasons": reasons })))
}

async fn request_override(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<OverrideRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let actor = actor(&headers)?;
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let override_id = state.overrides.request_override(&actor, &req, Utc::now())?;
    Ok(Json(json!({
        "success": true,
        "message": "Override request submitted successfully",
        "overrideId": override_id,
    })))
}

#[derive(Debug, Deserialize)]
struct PendingQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
}

async fn list_overrides(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PendingQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    actor(&headers)?;
    let Query(q) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let status = match q.status.as_deref() {
        Some(raw) => raw.parse::<OverrideStatus>()?,
        None => OverrideStatus::Pending,
    };

    let page = state.overrides.list_overrides(
        status,
        q.page.unwrap_or(1),
        q.limit.unwrap_or(20),
        Utc::now(),
    )?;
    Ok(Json(json!({
        "success": true,
        "overrides": page.overrides,
        "pagination": page.pagination,
    })))
}

async fn review_override(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let actor = actor(&headers)?;
    let decision_id = decision_id(path)?;
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    state
        .overrides
        .review_override(&actor, decision_id, &req, Utc::now())?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Override {} successfully", req.action),
        "decisionId": decision_id,
    })))
}

#[derive(Debug, Default, Deserialize)]
struct CancelRequest {
    #[serde(default)]
    reason: Option<String>,
}

async fn cancel_override(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let actor = actor(&headers)?;
    let decision_id = decision_id(path)?;
    let req: CancelRequest = if body.is_empty() {
        CancelRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    state
        .overrides
        .cancel_override(&actor, decision_id, req.reason, Utc::now())?;
    Ok(Json(json!({
        "success": true,
        "message": "Override cancelled successfully",
        "decisionId": decision_id,
    })))
}

async fn override_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Value>> {
    actor(&headers)?;
    let decision_id = decision_id(path)?;
    let history = state.overrides.history(decision_id)?;
    Ok(Json(json!({ "success": true, "history": history })))
}

async fn override_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    actor(&headers)?;
    let dashboard = state.overrides.dashboard(Utc::now())?;
    Ok(Json(json!({
        "success": true,
        "dashboard": {
            "statistics": dashboard.statistics,
            "recentOverrides": dashboard.recent_overrides,
            "reasonsBreakdown": dashboard.reasons_breakdown,
        },
    })))
}
