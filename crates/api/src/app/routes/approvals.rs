use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use pricegate_approvals::ApprovalStatus;
use pricegate_core::RequestId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_requests))
        .route("/:id", get(get_request))
        .route("/:id/approve", post(approve_request))
        .route("/:id/reject", post(reject_request))
}

/// All requests, oldest first; `?status=` narrows to one status.
pub async fn list_requests(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListApprovalsQuery>,
) -> axum::response::Response {
    let status: Option<ApprovalStatus> = match query.status.as_deref() {
        None => None,
        Some(raw) => match raw.parse() {
            Ok(s) => Some(s),
            Err(e) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_status",
                    format!("{e}"),
                );
            }
        },
    };

    let mut requests = match services.workflow.list_queue() {
        Ok(r) => r,
        Err(e) => return errors::workflow_error_to_response(e),
    };
    requests.retain(|r| status.is_none_or(|s| r.status() == s));
    requests.sort_by_key(|r| (r.requested_at(), r.id()));

    let items = requests.iter().map(dto::request_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_request(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RequestId = match errors::parse_id(&id, "approval request") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.workflow.get_queue_item(id) {
        Ok(r) => (StatusCode::OK, Json(dto::request_to_json(&r))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn approve_request(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RequestId = match errors::parse_id(&id, "approval request") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.workflow.approve(id) {
        Ok(r) => (StatusCode::OK, Json(dto::request_to_json(&r))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn reject_request(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RequestId = match errors::parse_id(&id, "approval request") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.workflow.reject(id) {
        Ok(r) => (StatusCode::OK, Json(dto::request_to_json(&r))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}
