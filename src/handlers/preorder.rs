use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::domain::order::to_cents;
use crate::domain::{ConfirmedOrder, DraftPatch};
use crate::error::AppError;
use crate::AppState;

/// An order as the order list renders it.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: String,
    pub email: String,
    pub amount: String,
    pub bonus: String,
    pub date: String,
    pub display_date: String,
    pub card_last4: String,
}

impl From<&ConfirmedOrder> for OrderView {
    fn from(order: &ConfirmedOrder) -> Self {
        Self {
            id: order.id().to_string(),
            email: order.email().to_string(),
            amount: to_cents(order.amount()).to_string(),
            bonus: order.bonus().to_string(),
            date: order.date().to_string(),
            display_date: order.display_date(),
            card_last4: order.card_last4().to_string(),
        }
    }
}

fn parse_patch(body: &[u8]) -> Result<DraftPatch, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

pub async fn get_preorder(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.view().await)
}

pub async fn update_draft(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let patch = parse_patch(&body)?;
    Ok(Json(state.controller.apply_patch(&patch).await))
}

/// Submits the current draft. A JSON body, when present, is applied to the
/// draft first unless a submission is already in flight.
pub async fn submit_preorder(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let patch = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(parse_patch(&body)?)
    };

    let order = state.controller.submit_with(patch.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(OrderView::from(&order))))
}

pub async fn list_orders(State(state): State<AppState>) -> impl IntoResponse {
    let orders: Vec<OrderView> = state
        .controller
        .orders_newest_first()
        .await
        .iter()
        .map(OrderView::from)
        .collect();
    Json(orders)
}
