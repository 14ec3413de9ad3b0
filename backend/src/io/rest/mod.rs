//! # REST API Interface Layer
//!
//! HTTP endpoints for the points tracker. Handlers stay thin: they read the
//! caller identity, map DTOs to domain commands, call a service and map the
//! result back. Every failure is rendered by [`error`].

pub mod auth;
pub mod error;
pub mod family_apis;
pub mod mappers;
pub mod point_apis;

pub use family_apis::*;
pub use point_apis::*;
