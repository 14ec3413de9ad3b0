//! # Points Backend
//!
//! Backend of a household points tracker: children request points for
//! chores, parents approve or deny the requests, and a running balance is
//! kept per child.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (workflows, validation, summary)
//!     ↓
//! Storage Layer (SQLite ledger and family membership)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize the storage connection and the domain services
//! - Register the configured families
//! - Set up the REST API router with CORS from configuration

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AppConfig, FamilyConfig};
use crate::domain::{ApprovalService, FamilyService, PointRequestService, SummaryService};
use crate::io::rest::auth::{USER_ID_HEADER, USER_ROLES_HEADER};
use crate::storage::{Connection, DbConnection, FamilyRole, GuardianStorage};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub point_request_service: PointRequestService<DbConnection>,
    pub approval_service: ApprovalService<DbConnection>,
    pub summary_service: SummaryService<DbConnection>,
    pub family_service: FamilyService<DbConnection>,
}

impl AppState {
    pub fn new(db_conn: Arc<DbConnection>) -> Self {
        Self {
            point_request_service: PointRequestService::new(db_conn.clone()),
            approval_service: ApprovalService::new(db_conn.clone()),
            summary_service: SummaryService::new(db_conn.clone()),
            family_service: FamilyService::new(db_conn),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = Arc::new(DbConnection::new(&config.storage.database_url).await?);

    info!("Registering {} configured families", config.families.len());
    seed_families(&*db_conn, &config.families).await?;

    info!("Setting up application state");
    Ok(AppState::new(db_conn))
}

/// Register every configured family member
pub async fn seed_families<C: Connection>(connection: &C, families: &[FamilyConfig]) -> Result<()> {
    let repository = connection.create_family_repository();
    for family in families {
        let members = family
            .parents
            .iter()
            .map(|id| (id, FamilyRole::Parent))
            .chain(family.children.iter().map(|id| (id, FamilyRole::Child)));
        for (user_id, role) in members {
            repository
                .add_family_member(&family.family_id, user_id, role)
                .await
                .with_context(|| format!("failed to register {} in family {}", user_id, family.family_id))?;
        }
    }
    Ok(())
}

/// Create the router with all API routes
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origins = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLES_HEADER),
        ]);

    let api_routes = Router::new()
        .route("/points", post(io::request_points))
        .route("/points/:point_id/approve", post(io::approve_points))
        .route("/users/:user_id/points", get(io::list_user_points))
        .route("/users/:user_id/points/summary", get(io::get_points_summary))
        .route("/families/:family_id", get(io::get_family));

    Ok(Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
