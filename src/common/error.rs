// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As mensagens visíveis na API ficam em inglês (o cliente é de Uganda);
// a variante diz QUAL regra falhou, o `IntoResponse` diz COMO responder.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("e-mail already registered")]
    EmailAlreadyExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("user not found")]
    UserNotFound,

    #[error("produce not found")]
    ProduceNotFound,

    #[error("credit sale not found")]
    CreditNotFound,

    // Papel (role) fora da allow-list do endpoint.
    #[error("requires role: {0}")]
    RoleForbidden(&'static str),

    // Isolamento de filial: o usuário tentou agir sobre recurso de outra filial.
    // O &str é a ação, para compor a mensagem ("sell produce", "update produce"...).
    #[error("branch mismatch while trying to {0}")]
    ForeignBranch(&'static str),

    // Recusa do decremento condicional de estoque. Guarda o saldo lido
    // para reportar ao cliente quanto ainda há disponível.
    #[error("insufficient stock, {available}kg available")]
    InsufficientStock { available: i64 },

    // Variante para erros de banco de dados (sqlx)
    #[error("database error")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("jwt error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ForeignBranch(action) => {
                let body = Json(json!({
                    "error": format!("Not authorized to {action} from other branches"),
                }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }
            AppError::RoleForbidden(roles) => {
                let body = Json(json!({
                    "error": format!("Access restricted to: {roles}"),
                }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }
            AppError::InsufficientStock { available } => {
                let body = Json(json!({
                    "error": format!("Insufficient stock. Available: {available}kg"),
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "This e-mail is already in use.")
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid e-mail or password.")
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid or missing authentication token.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AppError::ProduceNotFound => (StatusCode::NOT_FOUND, "Produce not found"),
            AppError::CreditNotFound => (StatusCode::NOT_FOUND, "Credit sale not found"),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
