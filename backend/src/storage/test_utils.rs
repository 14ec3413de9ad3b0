//! Test doubles for the storage layer.
//!
//! [`FaultyConnection`] wraps a real in-memory [`DbConnection`] and can be told
//! to fail individual operations, or to lose the settlement race, while
//! counting every write that reaches the database.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::models::PointEntry;
use crate::storage::sqlite::{DbConnection, FamilyRepository, PointRepository};
use crate::storage::traits::{
    BalanceSnapshot, Connection, FamilyMember, FamilyRole, GuardianStorage, PointQuery,
    PointStorage,
};

#[derive(Default)]
pub struct Faults {
    pub fail_get: AtomicBool,
    pub fail_save: AtomicBool,
    pub fail_settle: AtomicBool,
    pub fail_query: AtomicBool,
    pub fail_balance: AtomicBool,
    pub fail_guardian: AtomicBool,
    /// Makes `settle_point` report that the entry changed underneath it
    pub lose_settle_race: AtomicBool,
    /// Makes `get_point` look the entry up under this owner instead of the requested one
    pub stored_owner: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl Faults {
    pub fn set(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    pub fn store_under_owner(&self, user_id: &str) {
        if let Ok(mut owner) = self.stored_owner.lock() {
            *owner = Some(user_id.to_string());
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(flag: &AtomicBool, operation: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(anyhow!("injected {} failure", operation))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone)]
pub struct FaultyConnection {
    pub inner: DbConnection,
    pub faults: Arc<Faults>,
}

impl FaultyConnection {
    pub async fn init_test() -> Result<Self> {
        Ok(Self {
            inner: DbConnection::init_test().await?,
            faults: Arc::new(Faults::default()),
        })
    }
}

impl Connection for FaultyConnection {
    type PointRepository = FaultyPointRepository;
    type FamilyRepository = FaultyFamilyRepository;

    fn create_point_repository(&self) -> Self::PointRepository {
        FaultyPointRepository {
            inner: PointRepository::new(self.inner.clone()),
            faults: self.faults.clone(),
        }
    }

    fn create_family_repository(&self) -> Self::FamilyRepository {
        FaultyFamilyRepository {
            inner: FamilyRepository::new(self.inner.clone()),
            faults: self.faults.clone(),
        }
    }
}

#[derive(Clone)]
pub struct FaultyPointRepository {
    inner: PointRepository,
    faults: Arc<Faults>,
}

#[async_trait]
impl PointStorage for FaultyPointRepository {
    async fn get_point(&self, user_id: &str, point_id: &str) -> Result<Option<PointEntry>> {
        Faults::check(&self.faults.fail_get, "get")?;
        let owner = self
            .faults
            .stored_owner
            .lock()
            .map_err(|_| anyhow!("poisoned owner override"))?
            .clone()
            .unwrap_or_else(|| user_id.to_string());
        self.inner.get_point(&owner, point_id).await
    }

    async fn save_point(&self, point: &PointEntry) -> Result<()> {
        Faults::check(&self.faults.fail_save, "save")?;
        self.faults.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save_point(point).await
    }

    async fn settle_point(&self, point: &PointEntry, expected_version: Option<i64>) -> Result<bool> {
        Faults::check(&self.faults.fail_settle, "settle")?;
        if self.faults.lose_settle_race.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.faults.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.settle_point(point, expected_version).await
    }

    async fn query_points(&self, user_id: &str, query: &PointQuery) -> Result<Vec<PointEntry>> {
        Faults::check(&self.faults.fail_query, "query")?;
        self.inner.query_points(user_id, query).await
    }

    async fn latest_balance(&self, user_id: &str, until: DateTime<Utc>) -> Result<BalanceSnapshot> {
        Faults::check(&self.faults.fail_balance, "balance")?;
        self.inner.latest_balance(user_id, until).await
    }

    async fn current_balance(&self, user_id: &str) -> Result<BalanceSnapshot> {
        Faults::check(&self.faults.fail_balance, "balance")?;
        self.inner.current_balance(user_id).await
    }
}

#[derive(Clone)]
pub struct FaultyFamilyRepository {
    inner: FamilyRepository,
    faults: Arc<Faults>,
}

#[async_trait]
impl GuardianStorage for FaultyFamilyRepository {
    async fn parent_has_access_to_child(&self, parent_id: &str, child_id: &str) -> Result<bool> {
        Faults::check(&self.faults.fail_guardian, "guardian")?;
        self.inner.parent_has_access_to_child(parent_id, child_id).await
    }

    async fn family_members(&self, family_id: &str) -> Result<Vec<FamilyMember>> {
        Faults::check(&self.faults.fail_guardian, "family")?;
        self.inner.family_members(family_id).await
    }

    async fn add_family_member(&self, family_id: &str, user_id: &str, role: FamilyRole) -> Result<()> {
        self.inner.add_family_member(family_id, user_id, role).await
    }
}
