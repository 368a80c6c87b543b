//! Approval request record and its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pricegate_core::{DomainError, DomainResult, ProductId, RequestId};
use pricegate_products::Product;

/// Kind of catalog mutation held by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

/// The catalog mutation to perform if the request is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RequestedOperation {
    /// Insert the request's product.
    Create,
    /// Replace `target_id` with the request's product.
    Update { target_id: ProductId },
    /// Remove `target_id`.
    Delete { target_id: ProductId },
}

impl RequestedOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            RequestedOperation::Create => OperationKind::Create,
            RequestedOperation::Update { .. } => OperationKind::Update,
            RequestedOperation::Delete { .. } => OperationKind::Delete,
        }
    }

    /// Product being modified; `None` for creations.
    pub fn target_id(&self) -> Option<ProductId> {
        match self {
            RequestedOperation::Create => None,
            RequestedOperation::Update { target_id } | RequestedOperation::Delete { target_id } => {
                Some(*target_id)
            }
        }
    }
}

/// Request status lifecycle: PENDING is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl core::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ApprovalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "unknown approval status: {other}"
            ))),
        }
    }
}

/// Operator decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target_status(self) -> ApprovalStatus {
        match self {
            Decision::Approve => ApprovalStatus::Approved,
            Decision::Reject => ApprovalStatus::Rejected,
        }
    }
}

/// A deferred catalog mutation awaiting (or having received) review.
///
/// Requests are never deleted; resolved ones remain as an audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    id: RequestId,
    operation: RequestedOperation,
    product: Product,
    reason: String,
    requested_at: DateTime<Utc>,
    status: ApprovalStatus,
    resolved_at: Option<DateTime<Utc>>,
}

impl ApprovalRequest {
    /// A fresh PENDING request.
    pub fn new(
        id: RequestId,
        operation: RequestedOperation,
        product: Product,
        reason: impl Into<String>,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            operation,
            product,
            reason: reason.into(),
            requested_at,
            status: ApprovalStatus::Pending,
            resolved_at: None,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn operation(&self) -> RequestedOperation {
        self.operation
    }

    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }

    pub fn target_id(&self) -> Option<ProductId> {
        self.operation.target_id()
    }

    /// Proposed product (for deletes: snapshot of the product to remove).
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    pub fn status(&self) -> ApprovalStatus {
        self.status
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }

    /// Check that a decision may still be taken, without changing anything.
    pub fn ensure_pending(&self) -> DomainResult<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(DomainError::invalid_state(format!(
                "approval request {} is already {}",
                self.id, self.status
            )))
        }
    }

    /// Apply an operator decision. Succeeds at most once per request.
    pub fn resolve(&mut self, decision: Decision, at: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending()?;
        self.status = decision.target_status();
        self.resolved_at = Some(at);
        Ok(())
    }

    pub fn approve(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        self.resolve(Decision::Approve, at)
    }

    pub fn reject(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        self.resolve(Decision::Reject, at)
    }
}
