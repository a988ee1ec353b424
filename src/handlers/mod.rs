pub mod preorder;

use crate::health::check_health;
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(check_health(&state.payment_api, state.start_time).await)
}

pub async fn campaign(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.stats().await)
}
