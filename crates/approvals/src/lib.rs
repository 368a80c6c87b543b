//! Approval gate domain module.
//!
//! Decides which catalog mutations need human review ([`policy`]) and models the
//! review record itself ([`request`]): a single-stage PENDING → APPROVED/REJECTED
//! state machine. Pure domain logic; storage and orchestration live in
//! `pricegate-infra`.

pub mod policy;
pub mod request;

pub use policy::{
    CREATE_REASON_PREFIX, DELETE_REASON, GatingDecision, PricePolicy, ProposedMutation,
    UPDATE_REASON,
};
pub use request::{ApprovalRequest, ApprovalStatus, Decision, OperationKind, RequestedOperation};
