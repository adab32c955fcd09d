// src/models/reports.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::{produce::Branch, sales::SaleWithDetails};

// ---
// Painel do diretor (GET /api/reports/dashboard)
// ---

// 1. Vendas por filial (valor somado + quantidade de vendas)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchSalesEntry {
    pub branch: Branch,
    pub total_sales: i64,
    pub count: i64,
}

// 2. Vendas por produto (top 5 em valor)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProduceSalesEntry {
    pub name: String,
    pub total_sales: i64,
    pub total_tonnage: i64,
}

// 3. Crédito em aberto por filial (amount_due - amount_paid dos não quitados)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingCreditEntry {
    pub branch: Branch,
    pub total_outstanding: i64,
    pub count: i64,
}

// 4. Estoque restante por filial
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockByBranchEntry {
    pub branch: Branch,
    pub total_stock: i64,
    pub produce_count: i64,
}

// 5. Tendência mensal de vendas
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesEntry {
    pub year: i64,
    pub month: i64,
    pub total_sales: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub sales_by_branch: Vec<BranchSalesEntry>,
    pub sales_by_produce: Vec<ProduceSalesEntry>,
    pub outstanding_credit: Vec<OutstandingCreditEntry>,
    pub stock_by_branch: Vec<StockByBranchEntry>,
    pub monthly_sales_trend: Vec<MonthlySalesEntry>,
}

// ---
// Painel do gerente de filial (GET /api/reports/branch)
// ---

// Vendas por dia da semana corrente. `day` segue o strftime('%w') do
// SQLite: 0 = domingo ... 6 = sábado.
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesEntry {
    pub day: i64,
    pub total_sales: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevelEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub produce_type: String,
    pub current_stock: i64,
    pub tonnage: i64,
}

// Créditos não quitados com vencimento mais próximo (5 primeiros).
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingCreditEntry {
    pub buyer_name: String,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub due_date: NaiveDate,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformanceEntry {
    pub agent_id: String,
    pub name: String,
    pub total_sales: i64,
    pub sale_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchReport {
    pub daily_sales: Vec<DailySalesEntry>,
    pub top_products: Vec<ProduceSalesEntry>,
    pub stock_levels: Vec<StockLevelEntry>,
    pub upcoming_due_dates: Vec<UpcomingCreditEntry>,
    pub agent_performance: Vec<AgentPerformanceEntry>,
}

// ---
// Relatório de vendas por período (GET /api/reports/sales)
// ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportSummary {
    pub total_sales: i64,
    pub total_tonnage: i64,
    pub sale_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub sales: Vec<SaleWithDetails>,
    pub summary: SalesReportSummary,
}

// Filtros do relatório (?startDate=...&endDate=...&branch=...).
// `branch` só tem efeito para diretores; os demais ficam presos à própria.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub branch: Option<Branch>,
}

// ---
// Totais consolidados para o diretor (GET /api/sales/summary)
// ---
// Aqui `total_sales` é a CONTAGEM de vendas (forma herdada do painel
// histórico), diferente do dashboard onde é o valor somado.

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchTotalsEntry {
    pub branch: Branch,
    pub total_sales: i64,
    pub total_amount: i64,
    pub total_tonnage: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProduceTotalsEntry {
    pub name: String,
    pub total_sales: i64,
    pub total_amount: i64,
    pub total_tonnage: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverallTotals {
    pub total_sales: i64,
    pub total_amount: i64,
    pub total_tonnage: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub branch_summary: Vec<BranchTotalsEntry>,
    pub produce_summary: Vec<ProduceTotalsEntry>,
    pub overall_summary: OverallTotals,
}
