// src/handlers/shops.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

// ---
// Payload: CreateRegion
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegionPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

pub async fn create_region(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateRegionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let region = app_state.shops_service.create_region(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(region)))
}

// ---
// Payload: CreateShop
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShopPayload {
    pub region_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub owner_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn create_shop(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateShopPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let shop = app_state
        .shops_service
        .create_shop(
            payload.region_id,
            &payload.name,
            payload.owner_name.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(shop)))
}

pub async fn get_all_shops(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let shops = app_state.shops_service.list_shops().await?;
    Ok((StatusCode::OK, Json(shops)))
}
