// src/handlers/finance.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, handlers::validate_not_negative};

// ---
// Payload: LoanRepayment
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRepaymentPayload {
    pub shop_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,
}

pub async fn create_loan_repayment(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLoanRepaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let repayment = app_state
        .finance_service
        .record_loan_repayment(app_state.pool(), payload.shop_id, payload.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(repayment)))
}

pub async fn get_all_loan_repayments(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let repayments = app_state.finance_service.list_loan_repayments().await?;
    Ok((StatusCode::OK, Json(repayments)))
}

// ---
// Administração do caixa
// ---

pub async fn delete_payment(
    State(app_state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state
        .finance_service
        .reverse_payment(app_state.pool(), payment_id)
        .await?;
    Ok((StatusCode::OK, Json(payment)))
}

pub async fn reset_balance(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let balance = app_state
        .finance_service
        .reset_balance(app_state.pool())
        .await?;
    Ok((StatusCode::OK, Json(balance)))
}

pub async fn resync_balance(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let balance = app_state
        .finance_service
        .resync_balance(app_state.pool())
        .await?;
    Ok((StatusCode::OK, Json(balance)))
}

pub async fn audit_balance(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let audit = app_state
        .finance_service
        .audit_balance(app_state.pool())
        .await?;
    Ok((StatusCode::OK, Json(audit)))
}
