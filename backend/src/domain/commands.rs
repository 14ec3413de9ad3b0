//! Domain-level command and result types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs defined in the
//! `shared` crate to these internal types.

pub mod points {
    use crate::domain::models::{PointEntry, PointSummary};

    /// Input for submitting a new point request.
    #[derive(Debug, Clone)]
    pub struct SubmitPointRequestCommand {
        /// Authenticated caller; the entry is owned by this user
        pub user_id: String,
        pub points: i32,
        pub reason: String,
    }

    /// Input for settling a pending point request.
    #[derive(Debug, Clone)]
    pub struct ApprovePointRequestCommand {
        pub parent_id: String,
        pub child_id: String,
        pub point_id: String,
        /// Raw decision value; validated against APPROVE/DENY
        pub decision: String,
        pub parent_notes: Option<String>,
    }

    /// A persisted entry together with its summary projection.
    #[derive(Debug, Clone)]
    pub struct PointEntryResult {
        pub point: PointEntry,
        pub summary: PointSummary,
    }

    impl From<PointEntry> for PointEntryResult {
        fn from(point: PointEntry) -> Self {
            let summary = PointSummary::from(&point);
            Self { point, summary }
        }
    }
}
