// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_profile,
        handlers::auth::list_users,

        // --- Produce ---
        handlers::produce::create_produce,
        handlers::produce::get_all_produce,
        handlers::produce::get_produce_by_id,
        handlers::produce::update_produce_stock,
        handlers::produce::update_produce_price,
        handlers::produce::get_low_stock_alerts,
        handlers::produce::delete_produce,

        // --- Reports ---
        handlers::reports::get_dashboard,
        handlers::reports::get_branch_report,
        handlers::reports::get_sales_report,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Produce ---
            models::produce::Branch,
            models::produce::ProduceSource,
            models::produce::Produce,
            models::produce::ProduceWithManager,
            models::produce::CreateProducePayload,
            models::produce::UpdateStockPayload,
            models::produce::UpdatePricePayload,

            // --- Sales / Credit ---
            models::sales::Sale,
            models::sales::SaleWithDetails,
            models::sales::CreateSalePayload,
            models::credit::CreditStatus,
            models::credit::Credit,
            models::credit::CreditWithDetails,
            models::credit::CreateCreditPayload,
            models::credit::CreditPaymentPayload,

            // --- Reports ---
            models::reports::BranchSalesEntry,
            models::reports::ProduceSalesEntry,
            models::reports::OutstandingCreditEntry,
            models::reports::StockByBranchEntry,
            models::reports::MonthlySalesEntry,
            models::reports::DashboardReport,
            models::reports::DailySalesEntry,
            models::reports::StockLevelEntry,
            models::reports::UpcomingCreditEntry,
            models::reports::AgentPerformanceEntry,
            models::reports::BranchReport,
            models::reports::SalesReportSummary,
            models::reports::SalesReport,
            models::reports::BranchTotalsEntry,
            models::reports::ProduceTotalsEntry,
            models::reports::OverallTotals,
            models::reports::SalesTotals,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registro, login e perfil"),
        (name = "Produce", description = "Estoque de produtos por filial"),
        (name = "Reports", description = "Agregações e painéis")
    )
)]
pub struct ApiDoc;

// Registra o esquema bearer usado pelas rotas protegidas.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
