//! Approval workflow orchestration.
//!
//! Entry point for catalog mutations. Every proposal flows through the same
//! pipeline:
//!
//! ```text
//! proposal
//!   ↓
//! 1. Validate details, resolve the target product (update/delete)
//!   ↓
//! 2. Evaluate the price policy (pure)
//!   ↓
//! 3a. Apply   → write to the catalog directly
//! 3b. Defer   → push a PENDING approval request, catalog untouched
//! 3c. Reject  → policy violation, nothing written anywhere
//! ```
//!
//! Operators later approve or reject queued requests. Approval performs the
//! deferred catalog write inside the queue's claim, so a request is APPROVED
//! only if its write landed, and it can be resolved at most once.

use thiserror::Error;

use pricegate_approvals::{
    ApprovalRequest, ApprovalStatus, DELETE_REASON, Decision, GatingDecision, PricePolicy,
    ProposedMutation, RequestedOperation,
};
use pricegate_core::{DomainError, ProductId, RequestId};
use pricegate_products::{Product, ProductDetails};

use crate::approval_queue::{ApprovalQueue, QueueError};
use crate::catalog::{CatalogError, CatalogStore};

/// Result of a proposed mutation that was not refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Written to the catalog immediately.
    Applied(Product),
    /// Held for review; the catalog is unchanged.
    Queued(ApprovalRequest),
}

impl Outcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, Outcome::Queued(_))
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("approval request not found: {0}")]
    RequestNotFound(RequestId),

    /// Refused outright by the price policy (e.g. creation above the cap).
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    #[error("approval request {id} is already {status}")]
    InvalidState { id: RequestId, status: ApprovalStatus },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Catalog(CatalogError),

    #[error(transparent)]
    Queue(QueueError),
}

impl From<CatalogError> for WorkflowError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::NotFound(id) => WorkflowError::ProductNotFound(id),
            other => WorkflowError::Catalog(other),
        }
    }
}

impl From<QueueError> for WorkflowError {
    fn from(value: QueueError) -> Self {
        match value {
            QueueError::NotFound(id) => WorkflowError::RequestNotFound(id),
            QueueError::InvalidState { id, status } => WorkflowError::InvalidState { id, status },
            other => WorkflowError::Queue(other),
        }
    }
}

impl From<DomainError> for WorkflowError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                WorkflowError::Validation(msg)
            }
            // Request transitions go through the queue, which reports them as
            // `QueueError::InvalidState` with the id and status attached.
            DomainError::InvalidState(msg) => WorkflowError::Validation(msg),
        }
    }
}

/// Review-gated catalog mutations over a catalog store `C` and an approval queue `Q`.
///
/// Both collaborators are injected so tests (and dev servers) can run against
/// the in-memory implementations.
#[derive(Debug)]
pub struct ApprovalWorkflow<C, Q> {
    catalog: C,
    queue: Q,
    policy: PricePolicy,
}

impl<C, Q> ApprovalWorkflow<C, Q> {
    pub fn new(catalog: C, queue: Q) -> Self {
        Self::with_policy(catalog, queue, PricePolicy::default())
    }

    pub fn with_policy(catalog: C, queue: Q, policy: PricePolicy) -> Self {
        Self {
            catalog,
            queue,
            policy,
        }
    }

    pub fn policy(&self) -> &PricePolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }
}

impl<C, Q> ApprovalWorkflow<C, Q>
where
    C: CatalogStore,
    Q: ApprovalQueue,
{
    pub fn list_products(&self) -> Result<Vec<Product>, WorkflowError> {
        Ok(self.catalog.list()?)
    }

    pub fn get_product(&self, id: ProductId) -> Result<Product, WorkflowError> {
        self.catalog
            .get(id)?
            .ok_or(WorkflowError::ProductNotFound(id))
    }

    /// Propose a new product.
    ///
    /// The product id is reserved up front, so a queued creation already names
    /// the id the product will have once approved.
    pub fn propose_create(&self, details: ProductDetails) -> Result<Outcome, WorkflowError> {
        details.validate()?;

        match self.policy.evaluate(ProposedMutation::Create { proposed: &details }) {
            GatingDecision::Reject { reason } => {
                tracing::warn!(price = %details.price, %reason, "product creation refused by policy");
                Err(WorkflowError::PolicyViolation(reason))
            }
            GatingDecision::Defer { reason } => {
                let product = Product::new(self.catalog.allocate_id()?, details);
                self.enqueue(RequestedOperation::Create, product, reason)
            }
            GatingDecision::Apply => {
                let product = Product::new(self.catalog.allocate_id()?, details);
                self.catalog.insert(product.clone())?;
                tracing::info!(product_id = %product.id, price = %product.price(), "product created");
                Ok(Outcome::Applied(product))
            }
        }
    }

    /// Propose new details for an existing product.
    pub fn propose_update(
        &self,
        id: ProductId,
        details: ProductDetails,
    ) -> Result<Outcome, WorkflowError> {
        details.validate()?;
        let current = self.get_product(id)?;

        let decision = self.policy.evaluate(ProposedMutation::Update {
            current: &current.details,
            proposed: &details,
        });
        tracing::debug!(
            product_id = %id,
            current_price = %current.price(),
            proposed_price = %details.price,
            ?decision,
            "update evaluated"
        );

        let proposed = Product::new(id, details);
        match decision {
            // The creation cap does not apply to updates, so `PricePolicy`
            // never takes this arm.
            GatingDecision::Reject { reason } => Err(WorkflowError::PolicyViolation(reason)),
            GatingDecision::Defer { reason } => {
                self.enqueue(RequestedOperation::Update { target_id: id }, proposed, reason)
            }
            GatingDecision::Apply => {
                self.catalog.replace(id, proposed.clone())?;
                tracing::info!(product_id = %id, price = %proposed.price(), "product updated");
                Ok(Outcome::Applied(proposed))
            }
        }
    }

    /// Propose removing a product. Deletions always go through review.
    pub fn propose_delete(&self, id: ProductId) -> Result<Outcome, WorkflowError> {
        let current = self.get_product(id)?;

        // `PricePolicy` defers every delete. Any other decision still queues
        // the delete, under the standard reason.
        let reason = match self.policy.evaluate(ProposedMutation::Delete {
            current: &current.details,
        }) {
            GatingDecision::Defer { reason } => reason,
            GatingDecision::Apply | GatingDecision::Reject { .. } => DELETE_REASON.to_string(),
        };

        self.enqueue(RequestedOperation::Delete { target_id: id }, current, reason)
    }

    /// All approval requests, any status, ordered by id.
    pub fn list_queue(&self) -> Result<Vec<ApprovalRequest>, WorkflowError> {
        Ok(self.queue.list()?)
    }

    pub fn get_queue_item(&self, id: RequestId) -> Result<ApprovalRequest, WorkflowError> {
        self.queue.get(id)?.ok_or(WorkflowError::RequestNotFound(id))
    }

    /// Approve a pending request and perform its deferred catalog write.
    ///
    /// If the write fails the request stays PENDING and the error is returned.
    pub fn approve(&self, id: RequestId) -> Result<ApprovalRequest, WorkflowError> {
        let result = self
            .queue
            .resolve(id, Decision::Approve, |request| self.apply_to_catalog(request));

        match &result {
            Ok(request) => tracing::info!(
                request_id = %id,
                kind = ?request.kind(),
                product_id = %request.product().id,
                "approval request approved"
            ),
            Err(e) => tracing::warn!(request_id = %id, error = %e, "approval failed"),
        }
        result
    }

    /// Reject a pending request. The catalog is not touched.
    pub fn reject(&self, id: RequestId) -> Result<ApprovalRequest, WorkflowError> {
        let request = self
            .queue
            .resolve(id, Decision::Reject, |_| Ok::<(), WorkflowError>(()))?;

        tracing::info!(
            request_id = %id,
            kind = ?request.kind(),
            product_id = %request.product().id,
            "approval request rejected"
        );
        Ok(request)
    }

    fn enqueue(
        &self,
        operation: RequestedOperation,
        product: Product,
        reason: String,
    ) -> Result<Outcome, WorkflowError> {
        let request = self.queue.push(operation, product, reason)?;
        tracing::info!(
            request_id = %request.id(),
            kind = ?request.kind(),
            product_id = %request.product().id,
            reason = request.reason(),
            "mutation queued for approval"
        );
        Ok(Outcome::Queued(request))
    }

    fn apply_to_catalog(&self, request: &ApprovalRequest) -> Result<(), WorkflowError> {
        match request.operation() {
            RequestedOperation::Create => self.catalog.insert(request.product().clone())?,
            RequestedOperation::Update { target_id } => {
                self.catalog.replace(target_id, request.product().clone())?
            }
            RequestedOperation::Delete { target_id } => self.catalog.delete(target_id)?,
        }
        Ok(())
    }
}
