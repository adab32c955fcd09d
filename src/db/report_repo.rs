// src/db/report_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    models::{
        produce::Branch,
        reports::{
            AgentPerformanceEntry, BranchSalesEntry, DailySalesEntry, MonthlySalesEntry,
            OutstandingCreditEntry, ProduceSalesEntry, StockByBranchEntry, StockLevelEntry,
            UpcomingCreditEntry,
        },
    },
};

// Agregações de leitura sobre vendas, créditos e estoque. Nenhuma escrita
// acontece aqui; cada consulta é independente.
#[derive(Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Painel do diretor
    // ---

    pub async fn sales_by_branch(&self) -> Result<Vec<BranchSalesEntry>, AppError> {
        let entries = sqlx::query_as::<_, BranchSalesEntry>(
            r#"
            SELECT branch,
                   COALESCE(SUM(amount_paid), 0) AS total_sales,
                   COUNT(*) AS count
            FROM sales
            GROUP BY branch
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // Top 5 produtos por valor vendido. `branch = None` agrega as duas filiais.
    pub async fn top_produce_sales(
        &self,
        branch: Option<Branch>,
    ) -> Result<Vec<ProduceSalesEntry>, AppError> {
        let entries = sqlx::query_as::<_, ProduceSalesEntry>(
            r#"
            SELECT p.name AS name,
                   COALESCE(SUM(s.amount_paid), 0) AS total_sales,
                   COALESCE(SUM(s.tonnage), 0) AS total_tonnage
            FROM sales s
            JOIN produce p ON p.id = s.produce_id
            WHERE (?1 IS NULL OR s.branch = ?1)
            GROUP BY p.id, p.name
            ORDER BY total_sales DESC
            LIMIT 5
            "#,
        )
        .bind(branch)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn outstanding_credit(&self) -> Result<Vec<OutstandingCreditEntry>, AppError> {
        let entries = sqlx::query_as::<_, OutstandingCreditEntry>(
            r#"
            SELECT branch,
                   COALESCE(SUM(amount_due - amount_paid), 0) AS total_outstanding,
                   COUNT(*) AS count
            FROM credits
            WHERE status <> 'Paid'
            GROUP BY branch
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn stock_by_branch(&self) -> Result<Vec<StockByBranchEntry>, AppError> {
        let entries = sqlx::query_as::<_, StockByBranchEntry>(
            r#"
            SELECT branch,
                   COALESCE(SUM(current_stock), 0) AS total_stock,
                   COUNT(*) AS produce_count
            FROM produce
            GROUP BY branch
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn monthly_sales_trend(&self) -> Result<Vec<MonthlySalesEntry>, AppError> {
        let entries = sqlx::query_as::<_, MonthlySalesEntry>(
            r#"
            SELECT CAST(strftime('%Y', created_at) AS INTEGER) AS year,
                   CAST(strftime('%m', created_at) AS INTEGER) AS month,
                   COALESCE(SUM(amount_paid), 0) AS total_sales
            FROM sales
            GROUP BY year, month
            ORDER BY year ASC, month ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // ---
    // Painel do gerente de filial
    // ---

    // Vendas da semana corrente agrupadas por dia (%w: 0 = domingo).
    pub async fn daily_sales_since(
        &self,
        branch: Branch,
        start_of_week: DateTime<Utc>,
    ) -> Result<Vec<DailySalesEntry>, AppError> {
        let entries = sqlx::query_as::<_, DailySalesEntry>(
            r#"
            SELECT CAST(strftime('%w', created_at) AS INTEGER) AS day,
                   COALESCE(SUM(amount_paid), 0) AS total_sales
            FROM sales
            WHERE branch = ?1 AND created_at >= ?2
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(branch)
        .bind(start_of_week)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn stock_levels(&self, branch: Branch) -> Result<Vec<StockLevelEntry>, AppError> {
        let entries = sqlx::query_as::<_, StockLevelEntry>(
            r#"
            SELECT name, produce_type, current_stock, tonnage
            FROM produce
            WHERE branch = ?1
            ORDER BY current_stock ASC
            "#,
        )
        .bind(branch)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn upcoming_due_dates(
        &self,
        branch: Branch,
        today: NaiveDate,
    ) -> Result<Vec<UpcomingCreditEntry>, AppError> {
        let entries = sqlx::query_as::<_, UpcomingCreditEntry>(
            r#"
            SELECT buyer_name, amount_due, amount_paid, due_date
            FROM credits
            WHERE branch = ?1 AND status <> 'Paid' AND due_date >= ?2
            ORDER BY due_date ASC
            LIMIT 5
            "#,
        )
        .bind(branch)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn agent_performance(
        &self,
        branch: Branch,
    ) -> Result<Vec<AgentPerformanceEntry>, AppError> {
        let entries = sqlx::query_as::<_, AgentPerformanceEntry>(
            r#"
            SELECT s.sales_agent_id AS agent_id,
                   u.name AS name,
                   COALESCE(SUM(s.amount_paid), 0) AS total_sales,
                   COUNT(*) AS sale_count
            FROM sales s
            JOIN users u ON u.id = s.sales_agent_id
            WHERE s.branch = ?1
            GROUP BY s.sales_agent_id, u.name
            ORDER BY total_sales DESC
            "#,
        )
        .bind(branch)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
