// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::{
        auth::{Role, User},
        produce::Branch,
    },
};

/// 1. O trait que define um conjunto de papéis aceitos por um endpoint
pub trait RoleSet: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    fn label() -> &'static str;
}

/// 2. O extrator (guardião): recusa a requisição com 403 quando o papel do
/// usuário autenticado não está na allow-list do endpoint.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // O auth_guard já rodou e deixou o usuário nos extensions.
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        if T::allows(user.role) {
            Ok(RequireRole(PhantomData))
        } else {
            Err(AppError::RoleForbidden(T::label()))
        }
    }
}

// ---
// Conjuntos de papéis usados nas rotas
// ---

/// Gerentes (e diretores, que herdam as permissões de gestão de estoque).
pub struct Managers;
impl RoleSet for Managers {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Manager | Role::Director)
    }
    fn label() -> &'static str {
        "manager, director"
    }
}

/// Apenas diretores.
pub struct Directors;
impl RoleSet for Directors {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Director)
    }
    fn label() -> &'static str {
        "director"
    }
}

// ---
// Política de filial
// ---

/// Ponto único da regra de isolamento de filial: escritas sobre um recurso
/// exigem que o usuário seja da mesma filial. Vale para TODOS os papéis —
/// diretores não têm isenção em operações de escrita.
pub fn ensure_same_branch(user: &User, branch: Branch, action: &'static str) -> Result<(), AppError> {
    if user.branch == branch {
        Ok(())
    } else {
        Err(AppError::ForeignBranch(action))
    }
}

/// Escopo de leitura: todo papel enxerga só a própria filial, exceto o
/// diretor (None = sem filtro).
pub fn branch_scope(user: &User) -> Option<Branch> {
    match user.role {
        Role::Director => None,
        _ => Some(user.branch),
    }
}
