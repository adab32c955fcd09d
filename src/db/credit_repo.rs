// src/db/credit_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::{
        credit::{Credit, CreditStatus, CreditWithDetails},
        produce::Branch,
    },
};

const SELECT_WITH_DETAILS: &str = r#"
    SELECT c.id, c.produce_id, c.tonnage, c.amount_due, c.amount_paid,
           c.buyer_name, c.national_id, c.location, c.contact, c.due_date,
           c.sales_agent_id, c.branch, c.status, c.created_at, c.updated_at,
           p.name AS produce_name, p.produce_type, p.selling_price,
           u.name AS agent_name, u.role AS agent_role
    FROM credits c
    JOIN produce p ON p.id = c.produce_id
    JOIN users u ON u.id = c.sales_agent_id
"#;

#[derive(Clone)]
pub struct CreditRepository {
    pool: SqlitePool,
}

impl CreditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(&self, executor: E, credit: &Credit) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO credits (id, produce_id, tonnage, amount_due, amount_paid,
                                 buyer_name, national_id, location, contact, due_date,
                                 sales_agent_id, branch, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&credit.id)
        .bind(&credit.produce_id)
        .bind(credit.tonnage)
        .bind(credit.amount_due)
        .bind(credit.amount_paid)
        .bind(&credit.buyer_name)
        .bind(&credit.national_id)
        .bind(&credit.location)
        .bind(&credit.contact)
        .bind(credit.due_date)
        .bind(&credit.sales_agent_id)
        .bind(credit.branch)
        .bind(credit.status)
        .bind(credit.created_at)
        .bind(credit.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Credit>, AppError> {
        let maybe_credit = sqlx::query_as::<_, Credit>(
            r#"
            SELECT id, produce_id, tonnage, amount_due, amount_paid, buyer_name,
                   national_id, location, contact, due_date, sales_agent_id,
                   branch, status, created_at, updated_at
            FROM credits
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_credit)
    }

    pub async fn find_with_details(&self, id: &str) -> Result<Option<CreditWithDetails>, AppError> {
        let sql = format!("{SELECT_WITH_DETAILS} WHERE c.id = ?1");
        let maybe_credit = sqlx::query_as::<_, CreditWithDetails>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_credit)
    }

    // Listagem ordenada por vencimento (cobranças mais urgentes primeiro).
    pub async fn list_with_details(
        &self,
        branch: Option<Branch>,
        status: Option<CreditStatus>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<CreditWithDetails>, AppError> {
        let sql = format!(
            r#"{SELECT_WITH_DETAILS}
            WHERE (?1 IS NULL OR c.branch = ?1)
              AND (?2 IS NULL OR c.status = ?2)
              AND (?3 IS NULL OR c.created_at >= ?3)
              AND (?4 IS NULL OR c.created_at < ?4)
            ORDER BY c.due_date ASC
            "#
        );
        let credits = sqlx::query_as::<_, CreditWithDetails>(&sql)
            .bind(branch)
            .bind(status)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(credits)
    }

    // Vencidos e não quitados.
    pub async fn overdue(
        &self,
        branch: Option<Branch>,
        today: NaiveDate,
    ) -> Result<Vec<CreditWithDetails>, AppError> {
        let sql = format!(
            r#"{SELECT_WITH_DETAILS}
            WHERE c.due_date < ?1
              AND c.status <> 'Paid'
              AND (?2 IS NULL OR c.branch = ?2)
            ORDER BY c.due_date ASC
            "#
        );
        let credits = sqlx::query_as::<_, CreditWithDetails>(&sql)
            .bind(today)
            .bind(branch)
            .fetch_all(&self.pool)
            .await?;
        Ok(credits)
    }

    // Grava o acúmulo de pagamento já recalculado pelo serviço.
    pub async fn update_payment(
        &self,
        id: &str,
        amount_paid: i64,
        status: CreditStatus,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE credits
            SET amount_paid = ?2, status = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(amount_paid)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
