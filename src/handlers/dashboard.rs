// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState};

pub async fn get_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state.dashboard_service.balance_snapshot().await?;
    Ok((StatusCode::OK, Json(snapshot)))
}
