pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod services;
pub mod startup;
pub mod use_cases;
pub mod utils;
pub mod validation;

use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::gateway::PaymentApiClient;
use crate::health::PaymentApiChecker;
use crate::services::PreorderController;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<PreorderController>,
    pub payment_api: PaymentApiChecker,
    pub start_time: Instant,
    pub log_request_body: bool,
}

impl AppState {
    /// Wires a fresh pre-order session against the configured payment API.
    pub fn from_config(config: &Config) -> Self {
        let client =
            PaymentApiClient::with_timeout(config.payment_api_url.clone(), config.request_timeout);
        let controller = PreorderController::new(Arc::new(client.clone()), config.campaign.clone());

        AppState {
            controller: Arc::new(controller),
            payment_api: PaymentApiChecker::new(client),
            start_time: Instant::now(),
            log_request_body: config.log_request_body,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let log_body = state.log_request_body;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/campaign", get(handlers::campaign))
        .route("/api/orders", get(handlers::preorder::list_orders))
        .route(
            "/api/preorder",
            get(handlers::preorder::get_preorder).post(handlers::preorder::submit_preorder),
        )
        .route(
            "/api/preorder/draft",
            patch(handlers::preorder::update_draft),
        )
        .layer(axum::middleware::from_fn_with_state(
            log_body,
            middleware::request_logger::request_logger_middleware,
        ))
        .with_state(state)
}
