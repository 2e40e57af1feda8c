//! HTTP API Layer
//!
//! This crate exposes the household ledger over REST using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for expenses and health
//! - **Middleware**: Bearer authentication and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Notifications**: Per-room activity broadcast
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, broadcaster, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod demo;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_ledger::LedgerService;

use crate::config::ApiConfig;
use crate::handlers::{expenses, health};
use crate::middleware::{audit_middleware, auth_middleware};
use crate::notifications::RoomBroadcaster;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LedgerService>,
    pub broadcaster: Arc<RoomBroadcaster>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        service: Arc<LedgerService>,
        broadcaster: Arc<RoomBroadcaster>,
        config: ApiConfig,
    ) -> Self {
        Self {
            service,
            broadcaster,
            config,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Ledger service, broadcaster and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let expense_routes = Router::new()
        .route("/", get(expenses::list_expenses).post(expenses::add_expense))
        .route("/chart-data", get(expenses::chart_data))
        .route("/split", get(expenses::split))
        .route("/settle", post(expenses::settle))
        .route("/clear", delete(expenses::clear_expenses))
        .route("/:id", delete(expenses::delete_expense));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/expenses", expense_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
