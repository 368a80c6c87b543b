//! In-memory approval queue for tests/dev.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::Utc;

use pricegate_approvals::{ApprovalRequest, Decision, RequestedOperation};
use pricegate_core::RequestId;
use pricegate_products::Product;

use super::{ApprovalQueue, QueueError};

/// In-memory approval queue.
///
/// - Each request sits behind its own mutex: deciders on the same request
///   serialize, deciders on different requests do not contend.
/// - The outer map lock is only held to insert or look up entries, never while
///   a resolution side effect runs.
#[derive(Debug)]
pub struct InMemoryApprovalQueue {
    requests: RwLock<BTreeMap<RequestId, Arc<Mutex<ApprovalRequest>>>>,
    next_id: AtomicU64,
}

impl InMemoryApprovalQueue {
    pub fn new() -> Self {
        Self {
            requests: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn entry(&self, id: RequestId) -> Result<Arc<Mutex<ApprovalRequest>>, QueueError> {
        let map = self.requests.read().map_err(|_| poisoned())?;
        map.get(&id).cloned().ok_or(QueueError::NotFound(id))
    }
}

impl Default for InMemoryApprovalQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> QueueError {
    QueueError::Storage("approval queue lock poisoned".to_string())
}

/// Lock one request.
///
/// A request lock is only poisoned by a side effect panicking inside
/// `resolve`, which happens before the status is written, so the record is
/// still a valid PENDING request and the guard is recovered.
fn lock(entry: &Mutex<ApprovalRequest>) -> MutexGuard<'_, ApprovalRequest> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ApprovalQueue for InMemoryApprovalQueue {
    fn push(
        &self,
        operation: RequestedOperation,
        product: Product,
        reason: String,
    ) -> Result<ApprovalRequest, QueueError> {
        let mut map = self.requests.write().map_err(|_| poisoned())?;
        let id = RequestId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let request = ApprovalRequest::new(id, operation, product, reason, Utc::now());
        map.insert(id, Arc::new(Mutex::new(request.clone())));
        Ok(request)
    }

    fn list(&self) -> Result<Vec<ApprovalRequest>, QueueError> {
        let map = self.requests.read().map_err(|_| poisoned())?;
        Ok(map.values().map(|entry| lock(entry).clone()).collect())
    }

    fn get(&self, id: RequestId) -> Result<Option<ApprovalRequest>, QueueError> {
        match self.entry(id) {
            Ok(entry) => {
                let request = lock(&entry).clone();
                Ok(Some(request))
            }
            Err(QueueError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn resolve<E, F>(&self, id: RequestId, decision: Decision, apply: F) -> Result<ApprovalRequest, E>
    where
        E: From<QueueError>,
        F: FnOnce(&ApprovalRequest) -> Result<(), E>,
    {
        let entry = self.entry(id)?;
        let mut request = lock(&entry);

        if !request.is_pending() {
            return Err(QueueError::InvalidState {
                id,
                status: request.status(),
            }
            .into());
        }

        // Side effect first; the status only moves once it has succeeded.
        apply(&request)?;

        let status = request.status();
        request
            .resolve(decision, Utc::now())
            .map_err(|_| E::from(QueueError::InvalidState { id, status }))?;

        Ok(request.clone())
    }
}
