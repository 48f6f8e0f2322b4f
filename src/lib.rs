//! Orderdesk API Library
//!
//! This crate provides the core functionality for the sales order recording service
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;

use services::orders::OrderStore;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub store: Arc<dyn OrderStore>,
}

impl AppState {
    /// Wires the default sea-orm backed store over the given pool
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let store: Arc<dyn OrderStore> =
            Arc::new(services::orders::OrderService::new(db.clone()));
        Self { db, config, store }
    }
}

/// Builds the application router
pub fn routes() -> Router<AppState> {
    // The create route answers with and without the trailing slash.
    Router::new()
        .route("/", get(|| async { "orderdesk-api up" }))
        .route("/health", get(handlers::health::health_check))
        .route("/status", get(handlers::health::api_status))
        .route(
            "/sales_orders",
            post(handlers::sales_orders::create_sales_order),
        )
        .route(
            "/sales_orders/",
            post(handlers::sales_orders::create_sales_order),
        )
        .route(
            "/sales_orders/{order_id}",
            get(handlers::sales_orders::get_sales_order),
        )
        .merge(openapi::routes())
}
