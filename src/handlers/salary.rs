// src/handlers/salary.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, handlers::validate_not_negative};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

pub async fn create_employee(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee = app_state
        .salary_service
        .create_employee(&payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalaryPaymentPayload {
    pub employee_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,

    pub note: Option<String>,
}

pub async fn create_salary_payment(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateSalaryPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let payment = app_state
        .salary_service
        .record_salary_payment(payload.employee_id, payload.amount, payload.note.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn get_all_salary_payments(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.salary_service.list_salary_payments().await?;
    Ok((StatusCode::OK, Json(payments)))
}
