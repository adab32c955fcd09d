// src/handlers/sales.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Directors, RequireRole},
    },
    models::sales::{CreateSalePayload, SaleListQuery},
};

// Registrar venda à vista (qualquer papel autenticado da filial do produto).
pub async fn add_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let sale = app_state.sales_service.record_sale(&user, payload).await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn get_sales(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<SaleListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sales_service.list_sales(&user, query).await?;
    Ok(Json(sales))
}

pub async fn get_recent_sales(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sales_service.recent_sales(&user).await?;
    Ok(Json(sales))
}

// Totais consolidados das duas filiais, visão do diretor.
pub async fn get_sales_summary(
    State(app_state): State<AppState>,
    _guard: RequireRole<Directors>,
) -> Result<impl IntoResponse, AppError> {
    let totals = app_state.sales_service.sales_totals().await?;
    Ok(Json(totals))
}
