// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, handlers::validate_not_negative,
    models::inventory::RevisionTarget,
};

// ---
// Catálogo (seed)
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,
}

pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .create_product(&payload.name, payload.unit_price)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLinePayload {
    pub ingredient_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount_per_meshok: Decimal,
}

pub async fn add_recipe_line(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<RecipeLinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let line = app_state
        .inventory_service
        .add_recipe_line(product_id, payload.ingredient_id, payload.amount_per_meshok)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

// ---
// Ingredientes
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngredientPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    pub unit: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub quantity: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub low_stock_threshold: Decimal,
}

pub async fn create_ingredient(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateIngredientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ingredient = app_state
        .inventory_service
        .create_ingredient(
            &payload.name,
            &payload.unit,
            payload.quantity,
            payload.low_stock_threshold,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn get_all_ingredients(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let ingredients = app_state.inventory_service.list_ingredients().await?;
    Ok((StatusCode::OK, Json(ingredients)))
}

// ---
// Compras
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchasePayload {
    pub ingredient_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Decimal,

    // Sem preço: entrada de estoque que não mexe no caixa (doação, acerto).
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,

    pub note: Option<String>,
}

pub async fn create_purchase(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePurchasePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let purchase = app_state
        .inventory_service
        .record_purchase(
            payload.ingredient_id,
            payload.quantity,
            payload.price,
            payload.note.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn get_all_purchases(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let purchases = app_state.inventory_service.list_purchases().await?;
    Ok((StatusCode::OK, Json(purchases)))
}

pub async fn delete_purchase(
    State(app_state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.delete_purchase(purchase_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Produção por receita
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductionPayload {
    pub product_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub meshok: Decimal,

    pub note: Option<String>,
}

pub async fn create_production(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let production = app_state
        .inventory_service
        .record_production(payload.product_id, payload.meshok, payload.note.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(production)))
}

pub async fn delete_production(
    State(app_state): State<AppState>,
    Path(production_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .inventory_service
        .delete_production(production_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Produção diária
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailyProductionPayload {
    pub product_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Decimal,

    pub production_date: NaiveDate,
}

pub async fn create_daily_production(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateDailyProductionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = app_state
        .inventory_service
        .record_daily_production(payload.product_id, payload.quantity, payload.production_date)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditDailyProductionPayload {
    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Decimal,
}

pub async fn edit_daily_production(
    State(app_state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(payload): Json<EditDailyProductionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = app_state
        .inventory_service
        .edit_daily_production(record_id, payload.quantity)
        .await?;
    Ok((StatusCode::OK, Json(record)))
}

pub async fn confirm_daily_production(
    State(app_state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let record = app_state
        .inventory_service
        .confirm_daily_production(record_id)
        .await?;
    Ok((StatusCode::OK, Json(record)))
}

pub async fn delete_daily_production(
    State(app_state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .inventory_service
        .delete_daily_production(record_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Revisão manual
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRevisionPayload {
    pub target: RevisionTarget,
    pub target_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub new_quantity: Decimal,

    #[validate(length(min = 1, message = "O responsável é obrigatório."))]
    pub actor: String,

    pub note: Option<String>,
}

pub async fn create_revision(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateRevisionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let report = app_state
        .inventory_service
        .apply_manual_revision(
            payload.target,
            payload.target_id,
            payload.new_quantity,
            &payload.actor,
            payload.note.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn get_all_revisions(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let reports = app_state.inventory_service.list_revision_reports().await?;
    Ok((StatusCode::OK, Json(reports)))
}
