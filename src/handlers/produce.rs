// src/handlers/produce.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Directors, Managers, RequireRole},
    },
    models::produce::{
        CreateProducePayload, ProduceListQuery, UpdatePricePayload, UpdateStockPayload,
    },
};

// ---
// Handler: create_produce (gerentes e diretores)
// ---
#[utoipa::path(
    post,
    path = "/api/produce",
    tag = "Produce",
    request_body = CreateProducePayload,
    responses(
        (status = 201, description = "Produto registrado no estoque", body = crate::models::produce::Produce),
        (status = 400, description = "Payload inválido"),
        (status = 403, description = "Papel insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_produce(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<Managers>,
    Json(payload): Json<CreateProducePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let produce = app_state.produce_service.create(&user, payload).await?;

    Ok((StatusCode::CREATED, Json(produce)))
}

// ---
// Handler: get_all_produce
// ---
#[utoipa::path(
    get,
    path = "/api/produce",
    tag = "Produce",
    responses(
        (status = 200, description = "Estoque visível ao usuário", body = [crate::models::produce::ProduceWithManager])
    ),
    security(("api_jwt" = []))
)]
pub async fn get_all_produce(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ProduceListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let produce = app_state.produce_service.list(&user, query.branch).await?;
    Ok(Json(produce))
}

// ---
// Handler: get_produce_by_id
// ---
#[utoipa::path(
    get,
    path = "/api/produce/{id}",
    tag = "Produce",
    params(("id" = String, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = crate::models::produce::ProduceWithManager),
        (status = 403, description = "Produto de outra filial"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_produce_by_id(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let produce = app_state.produce_service.get(&user, &id).await?;
    Ok(Json(produce))
}

// ---
// Handler: update_produce_stock (reposição)
// ---
#[utoipa::path(
    put,
    path = "/api/produce/{id}/stock",
    tag = "Produce",
    params(("id" = String, Path, description = "ID do produto")),
    request_body = UpdateStockPayload,
    responses(
        (status = 200, description = "Produto com estoque atualizado", body = crate::models::produce::Produce),
        (status = 403, description = "Produto de outra filial"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_produce_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<Managers>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let produce = app_state
        .produce_service
        .add_stock(&user, &id, payload)
        .await?;

    Ok(Json(produce))
}

// ---
// Handler: update_produce_price
// ---
#[utoipa::path(
    put,
    path = "/api/produce/{id}/price",
    tag = "Produce",
    params(("id" = String, Path, description = "ID do produto")),
    request_body = UpdatePricePayload,
    responses(
        (status = 200, description = "Produto com preço atualizado", body = crate::models::produce::Produce),
        (status = 403, description = "Produto de outra filial"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_produce_price(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<Managers>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePricePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let produce = app_state
        .produce_service
        .update_price(&user, &id, payload)
        .await?;

    Ok(Json(produce))
}

// ---
// Handler: get_low_stock_alerts (menos de 20% do acumulado)
// ---
#[utoipa::path(
    get,
    path = "/api/produce/alerts/low-stock",
    tag = "Produce",
    responses(
        (status = 200, description = "Produtos abaixo de 20% do estoque", body = [crate::models::produce::ProduceWithManager])
    ),
    security(("api_jwt" = []))
)]
pub async fn get_low_stock_alerts(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<Managers>,
) -> Result<impl IntoResponse, AppError> {
    let produce = app_state.produce_service.low_stock(&user).await?;
    Ok(Json(produce))
}

// ---
// Handler: delete_produce (diretor, mesma filial)
// ---
#[utoipa::path(
    delete,
    path = "/api/produce/{id}",
    tag = "Produce",
    params(("id" = String, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto removido"),
        (status = 403, description = "Produto de outra filial ou papel insuficiente"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_produce(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<Directors>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.produce_service.delete(&user, &id).await?;
    Ok(Json(json!({ "message": "Produce removed" })))
}
