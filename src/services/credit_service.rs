// src/services/credit_service.rs

use chrono::{NaiveTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CreditRepository, ProduceRepository},
    middleware::rbac::{branch_scope, ensure_same_branch},
    models::{
        auth::User,
        credit::{
            CreateCreditPayload, Credit, CreditListQuery, CreditPaymentPayload, CreditStatus,
            CreditWithDetails,
        },
    },
    services::stock,
};

#[derive(Clone)]
pub struct CreditService {
    credit_repo: CreditRepository,
    produce_repo: ProduceRepository,
    pool: SqlitePool,
}

impl CreditService {
    pub fn new(
        credit_repo: CreditRepository,
        produce_repo: ProduceRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            credit_repo,
            produce_repo,
            pool,
        }
    }

    // --- REGISTRAR VENDA A CRÉDITO ---
    // Mesmo núcleo transacional da venda à vista: baixa de estoque + INSERT
    // do crédito commitam juntos ou nada acontece.
    pub async fn record_credit_sale(
        &self,
        user: &User,
        payload: CreateCreditPayload,
    ) -> Result<CreditWithDetails, AppError> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let produce = stock::claim_stock(
            &mut tx,
            &self.produce_repo,
            user,
            &payload.produce_id,
            payload.tonnage,
            now,
        )
        .await?;

        let credit = Credit {
            id: Uuid::new_v4().to_string(),
            produce_id: produce.id.clone(),
            tonnage: payload.tonnage,
            amount_due: payload.amount_due,
            amount_paid: 0,
            buyer_name: payload.buyer_name,
            national_id: payload.national_id,
            location: payload.location,
            contact: payload.contact,
            due_date: payload.due_date,
            sales_agent_id: user.id.clone(),
            branch: produce.branch,
            status: CreditStatus::for_amounts(0, payload.amount_due),
            created_at: now,
            updated_at: now,
        };

        self.credit_repo.insert(&mut *tx, &credit).await?;

        tx.commit().await?;

        tracing::info!(
            "🧾 Crédito registrado: {}kg de {} na filial {}, vencimento {}",
            credit.tonnage,
            produce.name,
            produce.branch,
            credit.due_date
        );

        self.credit_repo
            .find_with_details(&credit.id)
            .await?
            .ok_or_else(|| {
                AppError::InternalServerError(anyhow::anyhow!(
                    "crédito {} sumiu logo após o commit",
                    credit.id
                ))
            })
    }

    // --- PAGAMENTO ---
    // Acúmulo monótono: soma o valor recebido e recalcula a situação.
    // Um crédito Paid continua aceitando pagamentos (regra herdada do negócio).
    pub async fn update_payment(
        &self,
        user: &User,
        id: &str,
        payload: CreditPaymentPayload,
    ) -> Result<CreditWithDetails, AppError> {
        let credit = self
            .credit_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CreditNotFound)?;

        ensure_same_branch(user, credit.branch, "update credit sales")?;

        let amount_paid = credit.amount_paid + payload.amount_paid;
        let status = CreditStatus::for_amounts(amount_paid, credit.amount_due);

        self.credit_repo
            .update_payment(id, amount_paid, status, Utc::now())
            .await?;

        self.credit_repo
            .find_with_details(id)
            .await?
            .ok_or(AppError::CreditNotFound)
    }

    // --- LISTAGENS ---

    pub async fn list_credit_sales(
        &self,
        user: &User,
        query: CreditListQuery,
    ) -> Result<Vec<CreditWithDetails>, AppError> {
        let start = query
            .start_date
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let end = query
            .end_date
            .map(|d| (d + chrono::Days::new(1)).and_time(NaiveTime::MIN).and_utc());

        self.credit_repo
            .list_with_details(branch_scope(user), query.status, start, end)
            .await
    }

    pub async fn overdue_credit_sales(&self, user: &User) -> Result<Vec<CreditWithDetails>, AppError> {
        let today = Utc::now().date_naive();
        self.credit_repo.overdue(branch_scope(user), today).await
    }
}
