// src/services/sales_service.rs

use chrono::{NaiveTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProduceRepository, SalesRepository},
    middleware::rbac::branch_scope,
    models::{
        auth::User,
        reports::SalesTotals,
        sales::{CreateSalePayload, Sale, SaleListQuery, SaleWithDetails},
    },
    services::stock,
};

#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesRepository,
    produce_repo: ProduceRepository,
    pool: SqlitePool,
}

impl SalesService {
    pub fn new(sales_repo: SalesRepository, produce_repo: ProduceRepository, pool: SqlitePool) -> Self {
        Self {
            sales_repo,
            produce_repo,
            pool,
        }
    }

    // --- REGISTRAR VENDA ---
    // Baixa de estoque + INSERT da venda em uma única transação.
    pub async fn record_sale(
        &self,
        user: &User,
        payload: CreateSalePayload,
    ) -> Result<SaleWithDetails, AppError> {
        let now = Utc::now();

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        let produce = stock::claim_stock(
            &mut tx,
            &self.produce_repo,
            user,
            &payload.produce_id,
            payload.tonnage,
            now,
        )
        .await?; // Se falhar aqui, o tx sofre rollback automático ao sair do escopo (drop)

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            produce_id: produce.id.clone(),
            tonnage: payload.tonnage,
            amount_paid: payload.amount_paid,
            buyer_name: payload.buyer_name,
            sales_agent_id: user.id.clone(),
            // A filial é a do produto no momento da venda, não re-derivada depois.
            branch: produce.branch,
            created_at: now,
            updated_at: now,
        };

        self.sales_repo.insert(&mut *tx, &sale).await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(
            "🧾 Venda registrada: {}kg de {} na filial {}",
            sale.tonnage,
            produce.name,
            produce.branch
        );

        // Devolve a venda enriquecida com os campos de exibição.
        self.sales_repo
            .find_with_details(&sale.id)
            .await?
            .ok_or_else(|| {
                AppError::InternalServerError(anyhow::anyhow!(
                    "venda {} sumiu logo após o commit",
                    sale.id
                ))
            })
    }

    // --- LISTAGENS ---

    pub async fn list_sales(
        &self,
        user: &User,
        query: SaleListQuery,
    ) -> Result<Vec<SaleWithDetails>, AppError> {
        let start = query
            .start_date
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());
        // Limite superior exclusivo: o dia final entra inteiro no filtro.
        let end = query
            .end_date
            .map(|d| (d + chrono::Days::new(1)).and_time(NaiveTime::MIN).and_utc());

        self.sales_repo
            .list_with_details(branch_scope(user), start, end, query.agent.as_deref())
            .await
    }

    pub async fn recent_sales(&self, user: &User) -> Result<Vec<SaleWithDetails>, AppError> {
        self.sales_repo.recent(branch_scope(user), 10).await
    }

    // Totais consolidados (rota restrita a diretores).
    pub async fn sales_totals(&self) -> Result<SalesTotals, AppError> {
        let branch_summary = self.sales_repo.branch_totals().await?;
        let produce_summary = self.sales_repo.produce_totals().await?;
        let overall_summary = self.sales_repo.overall_totals().await?;

        Ok(SalesTotals {
            branch_summary,
            produce_summary,
            overall_summary,
        })
    }
}
