//! HTTP API Layer
//!
//! This crate provides the REST API for the clinic billing system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for patients and bills
//! - **DTOs**: Request/Response data transfer objects
//! - **Export**: Flat-row projections, column configs, and CSV rendering
//! - **Receipts**: Standard and thermal plain-text layouts
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(pool, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod export;
pub mod handlers;
pub mod receipt;

use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{bills, health, patients};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(pool: PgPool, config: ApiConfig) -> Router {
    let state = AppState { pool, config };

    // Public routes (no state-dependent checks)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Patient routes
    let patient_routes = Router::new()
        .route(
            "/",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route("/bulk", delete(patients::bulk_delete_patients))
        .route("/export", post(patients::export_patients))
        .route(
            "/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        );

    // Bill routes
    let bill_routes = Router::new()
        .route("/", get(bills::list_bills).post(bills::create_bill))
        .route("/stats", get(bills::billing_stats))
        .route("/export", post(bills::export_bills))
        .route(
            "/bulk",
            delete(bills::bulk_delete_bills).put(bills::bulk_update_bills),
        )
        .route(
            "/:id",
            get(bills::get_bill)
                .put(bills::update_bill)
                .delete(bills::delete_bill),
        )
        .route("/:id/payments", post(bills::record_payment))
        .route("/:id/receipt", get(bills::bill_receipt));

    // API routes
    let api_routes = Router::new()
        .nest("/patients", patient_routes)
        .nest("/bills", bill_routes);

    // Combine all routes
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
