// src/db/sales_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::{
        produce::Branch,
        reports::{BranchTotalsEntry, OverallTotals, ProduceTotalsEntry},
        sales::{Sale, SaleWithDetails},
    },
};

// Projeção padrão: venda + campos de exibição do produto e do agente.
const SELECT_WITH_DETAILS: &str = r#"
    SELECT s.id, s.produce_id, s.tonnage, s.amount_paid, s.buyer_name,
           s.sales_agent_id, s.branch, s.created_at, s.updated_at,
           p.name AS produce_name, p.produce_type, p.selling_price,
           u.name AS agent_name, u.role AS agent_role
    FROM sales s
    JOIN produce p ON p.id = s.produce_id
    JOIN users u ON u.id = s.sales_agent_id
"#;

#[derive(Clone)]
pub struct SalesRepository {
    pool: SqlitePool,
}

impl SalesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Insere dentro da transação da venda (mesma unidade atômica que o
    // decremento de estoque).
    pub async fn insert<'e, E>(&self, executor: E, sale: &Sale) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO sales (id, produce_id, tonnage, amount_paid, buyer_name,
                               sales_agent_id, branch, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.produce_id)
        .bind(sale.tonnage)
        .bind(sale.amount_paid)
        .bind(&sale.buyer_name)
        .bind(&sale.sales_agent_id)
        .bind(sale.branch)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_with_details(&self, id: &str) -> Result<Option<SaleWithDetails>, AppError> {
        let sql = format!("{SELECT_WITH_DETAILS} WHERE s.id = ?1");
        let maybe_sale = sqlx::query_as::<_, SaleWithDetails>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_sale)
    }

    // Listagem com filtros opcionais. Parâmetros nulos desligam o filtro
    // correspondente (?N IS NULL), o que mantém o SQL estático.
    pub async fn list_with_details(
        &self,
        branch: Option<Branch>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        agent: Option<&str>,
    ) -> Result<Vec<SaleWithDetails>, AppError> {
        let sql = format!(
            r#"{SELECT_WITH_DETAILS}
            WHERE (?1 IS NULL OR s.branch = ?1)
              AND (?2 IS NULL OR s.created_at >= ?2)
              AND (?3 IS NULL OR s.created_at < ?3)
              AND (?4 IS NULL OR s.sales_agent_id = ?4)
            ORDER BY s.created_at DESC
            "#
        );
        let sales = sqlx::query_as::<_, SaleWithDetails>(&sql)
            .bind(branch)
            .bind(start)
            .bind(end)
            .bind(agent)
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    pub async fn recent(
        &self,
        branch: Option<Branch>,
        limit: i64,
    ) -> Result<Vec<SaleWithDetails>, AppError> {
        let sql = format!(
            r#"{SELECT_WITH_DETAILS}
            WHERE (?1 IS NULL OR s.branch = ?1)
            ORDER BY s.created_at DESC
            LIMIT ?2
            "#
        );
        let sales = sqlx::query_as::<_, SaleWithDetails>(&sql)
            .bind(branch)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    // ---
    // Totais consolidados (visão do diretor)
    // ---

    pub async fn branch_totals(&self) -> Result<Vec<BranchTotalsEntry>, AppError> {
        let entries = sqlx::query_as::<_, BranchTotalsEntry>(
            r#"
            SELECT branch,
                   COUNT(*) AS total_sales,
                   COALESCE(SUM(amount_paid), 0) AS total_amount,
                   COALESCE(SUM(tonnage), 0) AS total_tonnage
            FROM sales
            GROUP BY branch
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn produce_totals(&self) -> Result<Vec<ProduceTotalsEntry>, AppError> {
        let entries = sqlx::query_as::<_, ProduceTotalsEntry>(
            r#"
            SELECT p.name AS name,
                   COUNT(*) AS total_sales,
                   COALESCE(SUM(s.amount_paid), 0) AS total_amount,
                   COALESCE(SUM(s.tonnage), 0) AS total_tonnage
            FROM sales s
            JOIN produce p ON p.id = s.produce_id
            GROUP BY p.id, p.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn overall_totals(&self) -> Result<OverallTotals, AppError> {
        let totals = sqlx::query_as::<_, OverallTotals>(
            r#"
            SELECT COUNT(*) AS total_sales,
                   COALESCE(SUM(amount_paid), 0) AS total_amount,
                   COALESCE(SUM(tonnage), 0) AS total_tonnage
            FROM sales
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }
}
