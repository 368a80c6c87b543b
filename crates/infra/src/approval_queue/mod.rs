//! Approval queue storage.
//!
//! Holds every approval request ever raised (pending and resolved) and owns the
//! PENDING → terminal transition. Resolution is a single claim-and-transition
//! step: the queue serializes deciders per request, runs the caller's side
//! effect while the request is claimed, and writes the terminal status only if
//! that side effect succeeded.

pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use pricegate_approvals::{ApprovalRequest, ApprovalStatus, Decision, RequestedOperation};
use pricegate_core::RequestId;
use pricegate_products::Product;

pub use in_memory::InMemoryApprovalQueue;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("approval request not found: {0}")]
    NotFound(RequestId),

    #[error("approval request {id} is already {status}")]
    InvalidState { id: RequestId, status: ApprovalStatus },

    #[error("approval queue storage error: {0}")]
    Storage(String),
}

pub trait ApprovalQueue: Send + Sync {
    /// Record a new PENDING request with a freshly assigned id and the current time.
    ///
    /// Identical submissions are not merged; each call creates a distinct entry.
    fn push(
        &self,
        operation: RequestedOperation,
        product: Product,
        reason: String,
    ) -> Result<ApprovalRequest, QueueError>;

    /// Snapshot of all requests regardless of status, ordered by id.
    fn list(&self) -> Result<Vec<ApprovalRequest>, QueueError>;

    fn get(&self, id: RequestId) -> Result<Option<ApprovalRequest>, QueueError>;

    /// Atomically resolve a PENDING request.
    ///
    /// `apply` runs while the request is claimed; if it fails the request stays
    /// PENDING and its error is returned. Fails with `NotFound` for unknown ids
    /// and `InvalidState` if another decision already won.
    fn resolve<E, F>(&self, id: RequestId, decision: Decision, apply: F) -> Result<ApprovalRequest, E>
    where
        E: From<QueueError>,
        F: FnOnce(&ApprovalRequest) -> Result<(), E>;
}

impl<Q> ApprovalQueue for Arc<Q>
where
    Q: ApprovalQueue,
{
    fn push(
        &self,
        operation: RequestedOperation,
        product: Product,
        reason: String,
    ) -> Result<ApprovalRequest, QueueError> {
        (**self).push(operation, product, reason)
    }

    fn list(&self) -> Result<Vec<ApprovalRequest>, QueueError> {
        (**self).list()
    }

    fn get(&self, id: RequestId) -> Result<Option<ApprovalRequest>, QueueError> {
        (**self).get(id)
    }

    fn resolve<E, F>(&self, id: RequestId, decision: Decision, apply: F) -> Result<ApprovalRequest, E>
    where
        E: From<QueueError>,
        F: FnOnce(&ApprovalRequest) -> Result<(), E>,
    {
        (**self).resolve(id, decision, apply)
    }
}
