//! Domain models for the points ledger.

pub mod family;
pub mod point;
pub mod summary;

pub use family::*;
pub use point::*;
pub use summary::*;
