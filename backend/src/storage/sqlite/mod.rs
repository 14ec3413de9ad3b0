//! # SQLite Storage Module
//!
//! SQLite implementations of the storage traits.
//!
//! ## Components
//!
//! - **connection.rs** - pool setup, schema and the repository factory
//! - **point_repository.rs** - the points ledger
//! - **family_repository.rs** - family membership used for guardian checks

pub mod connection;
pub mod family_repository;
pub mod point_repository;

pub use connection::DbConnection;
pub use family_repository::FamilyRepository;
pub use point_repository::PointRepository;
