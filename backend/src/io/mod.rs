//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: JSON endpoints for requesting, approving and summarising points,
//!   and for reading a family
//! - **Identity**: Reading the upstream-verified caller identity from request headers
//! - **Error Translation**: Converting domain errors to HTTP status codes and JSON bodies
//! - **Data Mapping**: Converting between domain models and the `shared` DTOs

pub mod rest;

pub use rest::*;
