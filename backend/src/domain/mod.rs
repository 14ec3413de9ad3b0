//! # Domain Module
//!
//! Business logic of the points tracker: the ledger entry model, request
//! validation, the request and approval workflows, and the summary rollup.
//!
//! ## Module Organization
//!
//! - **models**: ledger entries and their read-side projections
//! - **validation**: pure shape checks for incoming commands
//! - **point_request_service**: children asking for points
//! - **approval_service**: parents settling requests
//! - **summary** / **summary_service**: the windowed rollup and points listing
//! - **family_service**: family reads for members
//!
//! ## Business Rules
//!
//! - An entry starts WAITING and is settled exactly once
//! - Only approved entries carry a balance, derived from the latest approved balance
//! - SUBTRACT and CASHOUT lower the balance, ADD raises it
//! - Parents act on a child's records only through family membership
//! - Nobody settles their own entries

pub mod approval_service;
pub mod commands;
pub mod errors;
pub mod family_service;
pub mod models;
pub mod point_request_service;
pub mod summary;
pub mod summary_service;
pub mod validation;

pub use approval_service::ApprovalService;
pub use errors::{PointsError, PointsResult};
pub use family_service::FamilyService;
pub use point_request_service::PointRequestService;
pub use summary_service::SummaryService;
