// src/services/stock.rs

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::{
    common::error::AppError,
    db::ProduceRepository,
    middleware::rbac::ensure_same_branch,
    models::{auth::User, produce::Produce},
};

/// Núcleo compartilhado das vendas à vista e a crédito: localizar o produto,
/// validar filial e baixar o estoque — tudo dentro da transação aberta pelo
/// serviço chamador, junto com o INSERT do registro de venda. Ou a transação
/// inteira commita, ou o estoque fica como estava.
///
/// A baixa em si é um decremento condicional verificado pelo banco
/// (`current_stock >= tonnage` na cláusula WHERE), então duas requisições
/// concorrentes nunca vendem o mesmo quilo duas vezes: a segunda encontra a
/// condição falsa e recebe `InsufficientStock`.
pub(crate) async fn claim_stock(
    conn: &mut SqliteConnection,
    produce_repo: &ProduceRepository,
    user: &User,
    produce_id: &str,
    tonnage: i64,
    now: DateTime<Utc>,
) -> Result<Produce, AppError> {
    // 1. Localiza o produto
    let produce = produce_repo
        .find_by_id(&mut *conn, produce_id)
        .await?
        .ok_or(AppError::ProduceNotFound)?;

    // 2. Isolamento de filial — sem isenção para diretores em escrita
    ensure_same_branch(user, produce.branch, "sell produce")?;

    // 3. Decremento condicional; nenhuma linha afetada = saldo insuficiente
    let decremented = produce_repo
        .decrement_stock(&mut *conn, produce_id, tonnage, now)
        .await?;

    if !decremented {
        return Err(AppError::InsufficientStock {
            available: produce.current_stock,
        });
    }

    Ok(produce)
}
