// src/handlers/reports.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Directors, Managers, RequireRole},
    },
    models::reports::SalesReportQuery,
};

// GET /api/reports/dashboard
#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    tag = "Reports",
    responses(
        (status = 200, description = "Agregados das duas filiais para o diretor", body = crate::models::reports::DashboardReport),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Papel insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    _guard: RequireRole<Directors>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.report_service.dashboard().await?;
    Ok(Json(report))
}

// GET /api/reports/branch
#[utoipa::path(
    get,
    path = "/api/reports/branch",
    tag = "Reports",
    responses(
        (status = 200, description = "Painel operacional da filial do gerente", body = crate::models::reports::BranchReport),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Papel insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_branch_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<Managers>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.report_service.branch_report(&user).await?;
    Ok(Json(report))
}

// GET /api/reports/sales
#[utoipa::path(
    get,
    path = "/api/reports/sales",
    tag = "Reports",
    responses(
        (status = 200, description = "Vendas do período com resumo", body = crate::models::reports::SalesReport),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sales_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<SalesReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.report_service.sales_report(&user, query).await?;
    Ok(Json(report))
}
