// src/models/produce.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::{validate_alpha_spaces, validate_ugandan_phone};

// --- 1. Filial ---
// Conjunto fechado: o negócio opera em exatamente duas filiais.
// Gravado no banco com o nome literal ("Maganjo" / "Matugga").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum Branch {
    Maganjo,
    Matugga,
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Branch::Maganjo => write!(f, "Maganjo"),
            Branch::Matugga => write!(f, "Matugga"),
        }
    }
}

// --- 2. Procedência do produto ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum ProduceSource {
    Individual,
    Company,
    #[serde(rename = "Own Farm")]
    #[sqlx(rename = "Own Farm")]
    OwnFarm,
}

impl Default for ProduceSource {
    fn default() -> Self {
        ProduceSource::Individual
    }
}

// --- 3. Produto (estoque por filial) ---
// `tonnage` é a quantidade acumulada já recebida (em kg, apesar do nome);
// `current_stock` é o que resta para vender. Invariante: 0 <= current_stock.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Produce {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub produce_type: String,
    pub branch: Branch,
    pub tonnage: i64,
    pub current_stock: i64,
    pub cost: i64,
    pub selling_price: i64,
    pub dealer: String,
    pub dealer_contact: String,
    pub source: ProduceSource,
    pub manager_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Produto enriquecido com os campos de exibição do gerente responsável.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProduceWithManager {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub produce_type: String,
    pub branch: Branch,
    pub tonnage: i64,
    pub current_stock: i64,
    pub cost: i64,
    pub selling_price: i64,
    pub dealer: String,
    pub dealer_contact: String,
    pub source: ProduceSource,
    pub manager_id: String,
    pub manager_name: String,
    pub manager_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Filtro opcional de listagem (?branch=...), honrado apenas para diretores.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProduceListQuery {
    pub branch: Option<Branch>,
}

// ---
// Payload: criação de produto
// ---
// Os mínimos vêm das regras do negócio: lotes abaixo de 3 kg ou de
// 10.000 UGX não entram no estoque.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProducePayload {
    #[validate(length(min = 2, message = "Produce name must be at least 2 characters"))]
    pub name: String,

    #[validate(
        length(min = 2, message = "Produce type must be at least 2 characters"),
        custom(function = "validate_alpha_spaces")
    )]
    #[serde(rename = "type")]
    pub produce_type: String,

    #[validate(range(min = 3, message = "Tonnage must be at least 3 kg"))]
    pub tonnage: i64,

    #[validate(range(min = 10000, message = "Cost must be at least 10,000 UGX"))]
    pub cost: i64,

    #[validate(range(min = 10000, message = "Selling price must be at least 10,000 UGX"))]
    pub selling_price: i64,

    #[validate(length(min = 2, message = "Dealer name must be at least 2 characters"))]
    pub dealer: String,

    #[validate(custom(function = "validate_ugandan_phone"))]
    pub dealer_contact: String,

    pub branch: Branch,

    #[serde(default)]
    pub source: ProduceSource,
}

// ---
// Payload: reposição de estoque
// ---
// Soma no `tonnage` e no `current_stock` ao mesmo tempo, para o teto
// acompanhar as entradas.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockPayload {
    #[validate(range(min = 1, message = "Additional stock must be at least 1 kg"))]
    pub additional_stock: i64,
}

// ---
// Payload: ajuste de preço
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePricePayload {
    #[validate(range(min = 10000, message = "Selling price must be at least 10,000 UGX"))]
    pub selling_price: i64,
}
