// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, handlers::validate_not_negative};

// ---
// Payload: CreateOrder
// ---
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub shop_id: Uuid,
    pub order_date: NaiveDate,

    #[validate(nested, length(min = 1, message = "O pedido precisa de pelo menos um item."))]
    pub items: Vec<OrderItemPayload>,
}

pub async fn create_order(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let items: Vec<(Uuid, Decimal)> = payload
        .items
        .iter()
        .map(|i| (i.product_id, i.quantity))
        .collect();

    let order = app_state
        .orders_service
        .create_order(payload.shop_id, payload.order_date, &items)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(app_state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.orders_service.get_order_detail(order_id).await?;
    Ok((StatusCode::OK, Json(order)))
}

// ---
// Payload: ConfirmDelivery
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryItemPayload {
    pub item_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub delivered_quantity: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDeliveryPayload {
    #[validate(nested)]
    pub items: Vec<DeliveryItemPayload>,

    // Acumulado recebido até agora por este pedido, não a parcela do dia.
    #[validate(custom(function = "validate_not_negative"))]
    pub received_amount: Decimal,
}

pub async fn confirm_delivery(
    State(app_state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<ConfirmDeliveryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let deliveries: Vec<(Uuid, Decimal)> = payload
        .items
        .iter()
        .map(|i| (i.item_id, i.delivered_quantity))
        .collect();

    let order = app_state
        .orders_service
        .confirm_delivery(
            app_state.pool(),
            order_id,
            &deliveries,
            payload.received_amount,
        )
        .await?;
    Ok((StatusCode::OK, Json(order)))
}

pub async fn mark_fully_delivered(
    State(app_state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .orders_service
        .mark_fully_delivered(order_id)
        .await?;
    Ok((StatusCode::OK, Json(order)))
}
