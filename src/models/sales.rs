// src/models/sales.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{auth::Role, produce::Branch};

// --- Venda à vista ---
// Imutável depois de criada. A filial é copiada do produto no momento da
// venda (não re-derivada depois), para o histórico sobreviver a mudanças.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub produce_id: String,
    pub tonnage: i64,
    pub amount_paid: i64,
    pub buyer_name: String,
    pub sales_agent_id: String,
    pub branch: Branch,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Venda enriquecida com os campos de exibição do produto e do agente.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithDetails {
    pub id: String,
    pub produce_id: String,
    pub tonnage: i64,
    pub amount_paid: i64,
    pub buyer_name: String,
    pub sales_agent_id: String,
    pub branch: Branch,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Denormalizados do produto
    pub produce_name: String,
    pub produce_type: String,
    pub selling_price: i64,

    // Denormalizados do agente
    pub agent_name: String,
    pub agent_role: Role,
}

// ---
// Payload: registrar venda
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub produce_id: String,

    #[validate(range(min = 1, message = "Tonnage must be at least 1 kg"))]
    pub tonnage: i64,

    #[validate(range(min = 10000, message = "Amount must be at least 10,000 UGX"))]
    pub amount_paid: i64,

    #[validate(length(min = 2, message = "Buyer name must be at least 2 characters"))]
    pub buyer_name: String,
}

// ---
// Filtros opcionais de listagem (?startDate=...&endDate=...&agent=...)
// ---
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub agent: Option<String>,
}
