use std::sync::Arc;

use pricegate_infra::{ApprovalWorkflow, AppConfig, InMemoryApprovalQueue, InMemoryCatalogStore};

/// Workflow over the in-memory catalog and approval queue.
pub type InMemoryWorkflow =
    ApprovalWorkflow<Arc<InMemoryCatalogStore>, Arc<InMemoryApprovalQueue>>;

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppServices {
    pub workflow: InMemoryWorkflow,
}

pub fn build_services(config: &AppConfig) -> AppServices {
    // In-memory wiring (dev/test): catalog + approval queue behind the workflow.
    let catalog = Arc::new(InMemoryCatalogStore::new());
    let queue = InMemoryApprovalQueue::arc();

    AppServices {
        workflow: ApprovalWorkflow::with_policy(catalog, queue, config.policy),
    }
}
