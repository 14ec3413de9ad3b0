//! Domain model for a points ledger entry.
//!
//! An entry starts out [`EntryState::Waiting`] and is settled exactly once.
//! The running balance lives inside [`SettlementOutcome::Approved`], so an
//! entry can only carry a balance when it is settled *and* approved, and the
//! only domain path that produces a settlement is [`PointEntry::settle`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::{PointsError, PointsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStatus {
    Waiting,
    Settled,
}

impl PointStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointStatus::Waiting => "WAITING",
            PointStatus::Settled => "SETTLED",
        }
    }

    /// Parse from the stored representation
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s {
            "WAITING" => Ok(PointStatus::Waiting),
            "SETTLED" => Ok(PointStatus::Settled),
            _ => Err(format!("Invalid point status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRequestType {
    Add,
    Subtract,
    Cashout,
}

impl PointRequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointRequestType::Add => "ADD",
            PointRequestType::Subtract => "SUBTRACT",
            PointRequestType::Cashout => "CASHOUT",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s {
            "ADD" => Ok(PointRequestType::Add),
            "SUBTRACT" => Ok(PointRequestType::Subtract),
            "CASHOUT" => Ok(PointRequestType::Cashout),
            _ => Err(format!("Invalid point request type: {}", s)),
        }
    }

    /// SUBTRACT and CASHOUT both lower the balance
    pub fn is_subtract_type(&self) -> bool {
        matches!(self, PointRequestType::Subtract | PointRequestType::Cashout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRequestDecision {
    Approve,
    Deny,
}

impl PointRequestDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointRequestDecision::Approve => "APPROVE",
            PointRequestDecision::Deny => "DENY",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s {
            "APPROVE" => Ok(PointRequestDecision::Approve),
            "DENY" => Ok(PointRequestDecision::Deny),
            _ => Err(format!("invalid decision {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    Approved { balance: i32 },
    Denied,
}

impl SettlementOutcome {
    pub fn decision(&self) -> PointRequestDecision {
        match self {
            SettlementOutcome::Approved { .. } => PointRequestDecision::Approve,
            SettlementOutcome::Denied => PointRequestDecision::Deny,
        }
    }
}

/// Fields written atomically when a parent decides a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub decided_by_user_id: String,
    pub decided_on: DateTime<Utc>,
    pub parent_notes: Option<String>,
    pub outcome: SettlementOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    Waiting,
    Settled(Settlement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointEntry {
    pub id: String,
    pub user_id: String,
    pub points: i32,
    pub request_type: PointRequestType,
    pub reason: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    state: EntryState,
}

impl PointEntry {
    /// A fresh ADD request waiting for a parent's decision
    pub fn new_request(user_id: &str, points: i32, reason: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::generate_id(),
            user_id: user_id.to_string(),
            points,
            request_type: PointRequestType::Add,
            reason: reason.to_string(),
            created_on: now,
            updated_on: now,
            state: EntryState::Waiting,
        }
    }

    /// Rebuild an entry from persisted fields. Storage only.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: String,
        user_id: String,
        points: i32,
        request_type: PointRequestType,
        reason: String,
        created_on: DateTime<Utc>,
        updated_on: DateTime<Utc>,
        state: EntryState,
    ) -> Self {
        Self {
            id,
            user_id,
            points,
            request_type,
            reason,
            created_on,
            updated_on,
            state,
        }
    }

    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn state(&self) -> &EntryState {
        &self.state
    }

    pub fn status(&self) -> PointStatus {
        match self.state {
            EntryState::Waiting => PointStatus::Waiting,
            EntryState::Settled(_) => PointStatus::Settled,
        }
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.state {
            EntryState::Waiting => None,
            EntryState::Settled(settlement) => Some(settlement),
        }
    }

    pub fn decision(&self) -> Option<PointRequestDecision> {
        self.settlement().map(|s| s.outcome.decision())
    }

    /// Running balance recorded on this entry, if it was approved
    pub fn balance(&self) -> Option<i32> {
        match self.settlement().map(|s| &s.outcome) {
            Some(SettlementOutcome::Approved { balance }) => Some(*balance),
            _ => None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.balance().is_some()
    }

    /// Signed effect of this entry on the balance. Stored rows are not
    /// revalidated, so negation saturates.
    pub fn effective_delta(&self) -> i32 {
        if self.request_type.is_subtract_type() {
            self.points.saturating_neg()
        } else {
            self.points
        }
    }

    /// Settle a waiting entry. Approvals derive the new balance from `latest_balance`.
    pub fn settle(
        &mut self,
        decision: PointRequestDecision,
        decided_by_user_id: &str,
        parent_notes: Option<String>,
        latest_balance: i32,
        now: DateTime<Utc>,
    ) -> PointsResult<()> {
        if let EntryState::Settled(_) = self.state {
            return Err(PointsError::BadRequest(format!(
                "invalid point status {}",
                self.status().as_str()
            )));
        }

        let outcome = match decision {
            PointRequestDecision::Approve => {
                let balance = if self.request_type.is_subtract_type() {
                    latest_balance.checked_sub(self.points)
                } else {
                    latest_balance.checked_add(self.points)
                }
                .ok_or_else(|| {
                    PointsError::BadRequest(format!(
                        "balance overflow applying {} points to {}",
                        self.points, latest_balance
                    ))
                })?;
                SettlementOutcome::Approved { balance }
            }
            PointRequestDecision::Deny => SettlementOutcome::Denied,
        };

        self.state = EntryState::Settled(Settlement {
            decided_by_user_id: decided_by_user_id.to_string(),
            decided_on: now,
            parent_notes,
            outcome,
        });
        self.updated_on = now;
        Ok(())
    }
}
