// src/db/produce_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::produce::{Branch, Produce, ProduceWithManager},
};

const SELECT_WITH_MANAGER: &str = r#"
    SELECT p.id, p.name, p.produce_type, p.branch, p.tonnage, p.current_stock,
           p.cost, p.selling_price, p.dealer, p.dealer_contact, p.source,
           p.manager_id, u.name AS manager_name, u.email AS manager_email,
           p.created_at, p.updated_at
    FROM produce p
    JOIN users u ON u.id = p.manager_id
"#;

#[derive(Clone)]
pub struct ProduceRepository {
    pool: SqlitePool,
}

impl ProduceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    // Busca por ID. Genérica sobre o executor para poder rodar dentro da
    // transação de venda (a leitura e o decremento precisam ver o mesmo estado).
    pub async fn find_by_id<'e, E>(&self, executor: E, id: &str) -> Result<Option<Produce>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe_produce = sqlx::query_as::<_, Produce>(
            r#"
            SELECT id, name, produce_type, branch, tonnage, current_stock, cost,
                   selling_price, dealer, dealer_contact, source, manager_id,
                   created_at, updated_at
            FROM produce
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_produce)
    }

    pub async fn find_with_manager(&self, id: &str) -> Result<Option<ProduceWithManager>, AppError> {
        let sql = format!("{SELECT_WITH_MANAGER} WHERE p.id = ?1");
        let maybe_produce = sqlx::query_as::<_, ProduceWithManager>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_produce)
    }

    // Lista, opcionalmente filtrada por filial (diretores passam None
    // para enxergar todas).
    pub async fn list(&self, branch: Option<Branch>) -> Result<Vec<ProduceWithManager>, AppError> {
        let sql = format!(
            "{SELECT_WITH_MANAGER} WHERE (?1 IS NULL OR p.branch = ?1) ORDER BY p.created_at DESC"
        );
        let produce = sqlx::query_as::<_, ProduceWithManager>(&sql)
            .bind(branch)
            .fetch_all(&self.pool)
            .await?;
        Ok(produce)
    }

    // Alerta de estoque baixo: menos de 20% do tonnage acumulado.
    // Comparação inteira (current_stock * 5 < tonnage) para não sair do i64.
    pub async fn low_stock(&self, branch: Branch) -> Result<Vec<ProduceWithManager>, AppError> {
        let sql = format!(
            "{SELECT_WITH_MANAGER} WHERE p.branch = ?1 AND p.current_stock * 5 < p.tonnage \
             ORDER BY p.current_stock ASC"
        );
        let produce = sqlx::query_as::<_, ProduceWithManager>(&sql)
            .bind(branch)
            .fetch_all(&self.pool)
            .await?;
        Ok(produce)
    }

    // ---
    // Escritas
    // ---

    pub async fn insert(&self, produce: &Produce) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO produce (id, name, produce_type, branch, tonnage, current_stock,
                                 cost, selling_price, dealer, dealer_contact, source,
                                 manager_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&produce.id)
        .bind(&produce.name)
        .bind(&produce.produce_type)
        .bind(produce.branch)
        .bind(produce.tonnage)
        .bind(produce.current_stock)
        .bind(produce.cost)
        .bind(produce.selling_price)
        .bind(&produce.dealer)
        .bind(&produce.dealer_contact)
        .bind(produce.source)
        .bind(&produce.manager_id)
        .bind(produce.created_at)
        .bind(produce.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // Entrada de estoque: o teto (tonnage) acompanha o saldo.
    pub async fn add_stock(
        &self,
        id: &str,
        additional: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE produce
            SET tonnage = tonnage + ?2,
                current_stock = current_stock + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(additional)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_price(
        &self,
        id: &str,
        selling_price: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE produce
            SET selling_price = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(selling_price)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM produce WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Decremento condicional, verificado pelo próprio banco: só baixa o
    /// estoque se houver saldo suficiente. Retorna `false` quando a condição
    /// falhou (nenhuma linha afetada) — nesse caso nada foi alterado.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        id: &str,
        tonnage: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE produce
            SET current_stock = current_stock - ?2,
                updated_at = ?3
            WHERE id = ?1 AND current_stock >= ?2
            "#,
        )
        .bind(id)
        .bind(tonnage)
        .bind(now)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
