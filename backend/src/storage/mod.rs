//! # Storage Module
//!
//! Handles all data persistence for the points tracker.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite backend in
//! [`sqlite`] is the one implementation shipped with the server.
//!
//! ## Key Responsibilities
//!
//! - **Ledger Persistence**: Saving point entries and their settlements
//! - **Balance Reads**: The latest approved balance together with its version
//! - **Conditional Writes**: Settling an entry only while it is still waiting
//! - **Guardian Lookups**: Parent to child access through family membership
//! - **Family Reads**: Listing the members of a family

pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use sqlite::{DbConnection, FamilyRepository, PointRepository};
pub use traits::{
    BalanceSnapshot, Connection, DateRange, FamilyMember, FamilyRole, GuardianStorage, PointQuery,
    PointStorage,
};
