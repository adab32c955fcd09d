// src/handlers/credit.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::credit::{CreateCreditPayload, CreditListQuery, CreditPaymentPayload},
};

// Registrar venda a crédito (mesmo núcleo de estoque da venda à vista).
pub async fn add_credit_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateCreditPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let credit = app_state
        .credit_service
        .record_credit_sale(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(credit)))
}

pub async fn get_credit_sales(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<CreditListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let credits = app_state
        .credit_service
        .list_credit_sales(&user, query)
        .await?;
    Ok(Json(credits))
}

pub async fn get_overdue_credit_sales(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let credits = app_state.credit_service.overdue_credit_sales(&user).await?;
    Ok(Json(credits))
}

// Acumular pagamento e recalcular a situação (Pending/Partial/Paid).
pub async fn update_credit_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<CreditPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let credit = app_state
        .credit_service
        .update_payment(&user, &id, payload)
        .await?;

    Ok(Json(credit))
}
