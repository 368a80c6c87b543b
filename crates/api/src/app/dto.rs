use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use pricegate_approvals::ApprovalRequest;
use pricegate_infra::Outcome;
use pricegate_products::Product;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /products` and `PUT /products/:id`.
pub type ProductRequest = pricegate_products::ProductDetails;

#[derive(Debug, Default, Deserialize)]
pub struct ListApprovalsQuery {
    /// Optional status filter (`pending`, `approved`, `rejected`).
    pub status: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(p: &Product) -> JsonValue {
    serde_json::to_value(p).unwrap_or(JsonValue::Null)
}

pub fn request_to_json(r: &ApprovalRequest) -> JsonValue {
    let operation = r.operation();
    json!({
        "id": r.id(),
        "operation": operation.kind(),
        "target_id": operation.target_id(),
        "product": product_to_json(r.product()),
        "reason": r.reason(),
        "requested_at": r.requested_at().to_rfc3339(),
        "status": r.status(),
        "resolved_at": r.resolved_at().map(|t| t.to_rfc3339()),
    })
}

pub fn outcome_to_json(outcome: &Outcome) -> JsonValue {
    match outcome {
        Outcome::Applied(p) => json!({
            "outcome": "applied",
            "product": product_to_json(p),
        }),
        Outcome::Queued(r) => json!({
            "outcome": "queued",
            "request": request_to_json(r),
        }),
    }
}
