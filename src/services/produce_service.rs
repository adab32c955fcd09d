// src/services/produce_service.rs

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProduceRepository,
    middleware::rbac::{branch_scope, ensure_same_branch},
    models::{
        auth::User,
        produce::{
            Branch, CreateProducePayload, Produce, ProduceWithManager, UpdatePricePayload,
            UpdateStockPayload,
        },
    },
};

#[derive(Clone)]
pub struct ProduceService {
    produce_repo: ProduceRepository,
    pool: SqlitePool,
}

impl ProduceService {
    pub fn new(produce_repo: ProduceRepository, pool: SqlitePool) -> Self {
        Self { produce_repo, pool }
    }

    // --- CREATE ---
    // O estoque corrente nasce igual ao tonnage recebido.
    pub async fn create(&self, user: &User, payload: CreateProducePayload) -> Result<Produce, AppError> {
        let now = Utc::now();
        let produce = Produce {
            id: Uuid::new_v4().to_string(),
            name: payload.name,
            produce_type: payload.produce_type,
            branch: payload.branch,
            tonnage: payload.tonnage,
            current_stock: payload.tonnage,
            cost: payload.cost,
            selling_price: payload.selling_price,
            dealer: payload.dealer,
            dealer_contact: payload.dealer_contact,
            source: payload.source,
            manager_id: user.id.clone(),
            created_at: now,
            updated_at: now,
        };

        self.produce_repo.insert(&produce).await?;
        Ok(produce)
    }

    // --- READS ---

    // Não-diretores enxergam só a própria filial; diretores podem filtrar
    // por `?branch=` ou ver tudo.
    pub async fn list(
        &self,
        user: &User,
        branch_param: Option<Branch>,
    ) -> Result<Vec<ProduceWithManager>, AppError> {
        let branch = match branch_scope(user) {
            Some(own) => Some(own),
            None => branch_param,
        };
        self.produce_repo.list(branch).await
    }

    pub async fn get(&self, user: &User, id: &str) -> Result<ProduceWithManager, AppError> {
        let produce = self
            .produce_repo
            .find_with_manager(id)
            .await?
            .ok_or(AppError::ProduceNotFound)?;

        // Leitura de um recurso específico ainda respeita a filial,
        // exceto para diretores.
        if branch_scope(user).is_some() {
            ensure_same_branch(user, produce.branch, "access produce")?;
        }

        Ok(produce)
    }

    pub async fn low_stock(&self, user: &User) -> Result<Vec<ProduceWithManager>, AppError> {
        self.produce_repo.low_stock(user.branch).await
    }

    // --- MUTATIONS (sempre na própria filial) ---

    pub async fn add_stock(
        &self,
        user: &User,
        id: &str,
        payload: UpdateStockPayload,
    ) -> Result<Produce, AppError> {
        let produce = self
            .produce_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ProduceNotFound)?;

        ensure_same_branch(user, produce.branch, "update produce")?;

        let now = Utc::now();
        self.produce_repo
            .add_stock(id, payload.additional_stock, now)
            .await?;

        self.produce_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ProduceNotFound)
    }

    pub async fn update_price(
        &self,
        user: &User,
        id: &str,
        payload: UpdatePricePayload,
    ) -> Result<Produce, AppError> {
        let produce = self
            .produce_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ProduceNotFound)?;

        ensure_same_branch(user, produce.branch, "update produce")?;

        self.produce_repo
            .set_price(id, payload.selling_price, Utc::now())
            .await?;

        self.produce_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ProduceNotFound)
    }

    // A rota já restringe a diretores; a filial ainda precisa bater.
    pub async fn delete(&self, user: &User, id: &str) -> Result<(), AppError> {
        let produce = self
            .produce_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ProduceNotFound)?;

        ensure_same_branch(user, produce.branch, "delete produce")?;

        self.produce_repo.delete(id).await
    }
}
