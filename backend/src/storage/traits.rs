//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{PointEntry, PointRequestType, PointStatus};

pub use crate::domain::models::{FamilyMember, FamilyRole};

/// Inclusive time range; an unset bound is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from: Some(from), to: Some(to) }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| instant >= from) && self.to.map_or(true, |to| instant <= to)
    }
}

/// Filter for listing a user's points. Empty sets match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointQuery {
    pub statuses: Vec<PointStatus>,
    pub types: Vec<PointRequestType>,
    pub updated_on: DateRange,
    pub limit: Option<u32>,
}

/// Current balance of a user together with the optimistic version it was read at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub balance: i32,
    /// Number of approved settlements recorded for the user
    pub version: i64,
}

/// Trait defining the interface for ledger storage operations
#[async_trait]
pub trait PointStorage: Send + Sync {
    /// Retrieve a specific point entry owned by `user_id`
    async fn get_point(&self, user_id: &str, point_id: &str) -> Result<Option<PointEntry>>;

    /// Store a point entry, overwriting any entry with the same id
    async fn save_point(&self, point: &PointEntry) -> Result<()>;

    /// Write a settled entry over its WAITING predecessor.
    ///
    /// The write only happens while the stored entry is still WAITING and, when
    /// `expected_version` is set, while the user's balance version is unchanged.
    /// Returns false when either condition no longer holds.
    async fn settle_point(&self, point: &PointEntry, expected_version: Option<i64>) -> Result<bool>;

    /// List a user's points matching the query.
    /// Returns entries ordered by `updated_on` descending (most recent first),
    /// ties in reverse insertion order.
    async fn query_points(&self, user_id: &str, query: &PointQuery) -> Result<Vec<PointEntry>>;

    /// Balance of the most recent approved settlement at or before `until`
    /// (0 when there is none), plus the user's current balance version.
    /// Read-side view for summaries.
    async fn latest_balance(&self, user_id: &str, until: DateTime<Utc>) -> Result<BalanceSnapshot>;

    /// Balance of the approved settlement holding the highest version, whatever
    /// its timestamp (0 when there is none), together with that version.
    /// Approvals build on this.
    async fn current_balance(&self, user_id: &str) -> Result<BalanceSnapshot>;
}

/// Trait defining the interface for guardian (family membership) lookups
#[async_trait]
pub trait GuardianStorage: Send + Sync {
    /// True when some family has `parent_id` as a PARENT and `child_id` as a CHILD
    async fn parent_has_access_to_child(&self, parent_id: &str, child_id: &str) -> Result<bool>;

    /// True when `requesting_user_id` may read `user_id`'s records: the user
    /// themselves or one of their parents
    async fn user_has_access(&self, requesting_user_id: &str, user_id: &str) -> Result<bool> {
        if !user_id.is_empty() && requesting_user_id == user_id {
            return Ok(true);
        }
        self.parent_has_access_to_child(requesting_user_id, user_id).await
    }

    /// Members of a family, parents first; empty when the family is unknown
    async fn family_members(&self, family_id: &str) -> Result<Vec<FamilyMember>>;

    /// Register a member of a family; registering twice is a no-op
    async fn add_family_member(&self, family_id: &str, user_id: &str, role: FamilyRole) -> Result<()>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides factory
/// methods for creating repositories. This allows the domain layer to work with
/// any storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    /// The type of PointStorage this connection creates
    type PointRepository: PointStorage + Clone;

    /// The type of GuardianStorage this connection creates
    type FamilyRepository: GuardianStorage + Clone;

    fn create_point_repository(&self) -> Self::PointRepository;

    fn create_family_repository(&self) -> Self::FamilyRepository;
}
