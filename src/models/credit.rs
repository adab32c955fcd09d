// src/models/credit.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::{validate_national_id, validate_ugandan_phone};
use crate::models::{auth::Role, produce::Branch};

// --- Situação da venda a crédito ---
// Sempre derivada da comparação amount_paid vs amount_due; a progressão é
// monótona porque pagamentos só acumulam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum CreditStatus {
    Pending,
    Partial,
    Paid,
}

impl CreditStatus {
    /// Recalcula a situação a partir dos valores acumulados.
    pub fn for_amounts(amount_paid: i64, amount_due: i64) -> Self {
        if amount_paid >= amount_due {
            CreditStatus::Paid
        } else if amount_paid > 0 {
            CreditStatus::Partial
        } else {
            CreditStatus::Pending
        }
    }
}

// --- Venda a crédito ---
// Só `amount_paid` e `status` mudam depois da criação (via pagamento).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    pub id: String,
    pub produce_id: String,
    pub tonnage: i64,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub buyer_name: String,
    pub national_id: String,
    pub location: String,
    pub contact: String,
    pub due_date: NaiveDate,
    pub sales_agent_id: String,
    pub branch: Branch,
    pub status: CreditStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Crédito enriquecido com os campos de exibição do produto e do agente.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditWithDetails {
    pub id: String,
    pub produce_id: String,
    pub tonnage: i64,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub buyer_name: String,
    pub national_id: String,
    pub location: String,
    pub contact: String,
    pub due_date: NaiveDate,
    pub sales_agent_id: String,
    pub branch: Branch,
    pub status: CreditStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub produce_name: String,
    pub produce_type: String,
    pub selling_price: i64,

    pub agent_name: String,
    pub agent_role: Role,
}

// ---
// Payload: registrar venda a crédito
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditPayload {
    pub produce_id: String,

    #[validate(range(min = 1, message = "Tonnage must be at least 1 kg"))]
    pub tonnage: i64,

    #[validate(range(min = 10000, message = "Amount must be at least 10,000 UGX"))]
    pub amount_due: i64,

    #[validate(length(min = 2, message = "Buyer name must be at least 2 characters"))]
    pub buyer_name: String,

    #[validate(custom(function = "validate_national_id"))]
    pub national_id: String,

    #[validate(length(min = 2, message = "Location must be at least 2 characters"))]
    pub location: String,

    #[validate(custom(function = "validate_ugandan_phone"))]
    pub contact: String,

    pub due_date: NaiveDate,
}

// ---
// Payload: pagamento parcial/total de um crédito
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditPaymentPayload {
    #[validate(range(min = 1, message = "Payment must be a positive amount"))]
    pub amount_paid: i64,
}

// ---
// Filtros opcionais de listagem (?status=...&startDate=...&endDate=...)
// ---
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditListQuery {
    pub status: Option<CreditStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_amounts() {
        assert_eq!(CreditStatus::for_amounts(0, 50_000), CreditStatus::Pending);
        assert_eq!(
            CreditStatus::for_amounts(20_000, 50_000),
            CreditStatus::Partial
        );
        assert_eq!(CreditStatus::for_amounts(50_000, 50_000), CreditStatus::Paid);
        // Sem estado terminal: pagar além do devido continua Paid.
        assert_eq!(CreditStatus::for_amounts(60_000, 50_000), CreditStatus::Paid);
    }

    #[test]
    fn accrual_scenario_reaches_paid() {
        let due = 50_000;
        let mut paid = 0;

        paid += 20_000;
        assert_eq!(CreditStatus::for_amounts(paid, due), CreditStatus::Partial);
        assert_eq!(paid, 20_000);

        paid += 30_000;
        assert_eq!(CreditStatus::for_amounts(paid, due), CreditStatus::Paid);
        assert_eq!(paid, 50_000);
    }
}
