// src/lib.rs

use axum::{
    Json, Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use utoipa::OpenApi;

// Declaração dos nossos módulos
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

// O documento OpenAPI servido como JSON puro (sem UI embutida).
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(docs::ApiDoc::openapi())
}

/// Monta o router completo da aplicação. Exposto na lib para os testes de
/// integração exercitarem a mesma árvore de rotas que o binário serve.
pub fn app(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de perfil/usuários (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/profile", get(handlers::auth::get_profile))
        .route("/users", get(handlers::auth::list_users))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let produce_routes = Router::new()
        .route(
            "/",
            post(handlers::produce::create_produce).get(handlers::produce::get_all_produce),
        )
        .route(
            "/alerts/low-stock",
            get(handlers::produce::get_low_stock_alerts),
        )
        .route(
            "/{id}",
            get(handlers::produce::get_produce_by_id).delete(handlers::produce::delete_produce),
        )
        .route("/{id}/stock", put(handlers::produce::update_produce_stock))
        .route("/{id}/price", put(handlers::produce::update_produce_price))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let sales_routes = Router::new()
        .route(
            "/",
            post(handlers::sales::add_sale).get(handlers::sales::get_sales),
        )
        .route("/summary", get(handlers::sales::get_sales_summary))
        .route("/recent", get(handlers::sales::get_recent_sales))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let credit_routes = Router::new()
        .route(
            "/",
            post(handlers::credit::add_credit_sale).get(handlers::credit::get_credit_sales),
        )
        .route("/overdue", get(handlers::credit::get_overdue_credit_sales))
        .route(
            "/{id}/payment",
            put(handlers::credit::update_credit_payment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let report_routes = Router::new()
        .route("/dashboard", get(handlers::reports::get_dashboard))
        .route("/branch", get(handlers::reports::get_branch_report))
        .route("/sales", get(handlers::reports::get_sales_report))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/docs/openapi.json", get(openapi_json))
        .nest("/api/auth", auth_routes.merge(user_routes))
        .nest("/api/produce", produce_routes)
        .nest("/api/sales", sales_routes)
        .nest("/api/credit", credit_routes)
        .nest("/api/reports", report_routes)
        .with_state(app_state)
}
