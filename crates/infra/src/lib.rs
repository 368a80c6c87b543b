//! Infrastructure layer: storage boundaries, workflow orchestration, config.

pub mod approval_queue;
pub mod catalog;
pub mod config;
pub mod workflow;


pub use approval_queue::{ApprovalQueue, InMemoryApprovalQueue, QueueError};
pub use catalog::{CatalogError, CatalogStore, InMemoryCatalogStore};
pub use config::{AppConfig, ConfigError};
pub use workflow::{ApprovalWorkflow, Outcome, WorkflowError};
