// src/services/report_service.rs

use chrono::{Datelike, NaiveTime, Utc};

use crate::{
    common::error::AppError,
    db::{ReportRepository, SalesRepository},
    middleware::rbac::branch_scope,
    models::{
        auth::User,
        reports::{BranchReport, DashboardReport, SalesReport, SalesReportQuery, SalesReportSummary},
    },
};

#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    sales_repo: SalesRepository,
}

impl ReportService {
    pub fn new(report_repo: ReportRepository, sales_repo: SalesRepository) -> Self {
        Self {
            report_repo,
            sales_repo,
        }
    }

    // --- PAINEL DO DIRETOR ---
    pub async fn dashboard(&self) -> Result<DashboardReport, AppError> {
        let sales_by_branch = self.report_repo.sales_by_branch().await?;
        let sales_by_produce = self.report_repo.top_produce_sales(None).await?;
        let outstanding_credit = self.report_repo.outstanding_credit().await?;
        let stock_by_branch = self.report_repo.stock_by_branch().await?;
        let monthly_sales_trend = self.report_repo.monthly_sales_trend().await?;

        Ok(DashboardReport {
            sales_by_branch,
            sales_by_produce,
            outstanding_credit,
            stock_by_branch,
            monthly_sales_trend,
        })
    }

    // --- PAINEL DO GERENTE ---
    pub async fn branch_report(&self, user: &User) -> Result<BranchReport, AppError> {
        let branch = user.branch;

        // Semana corrente começa no domingo, meia-noite UTC.
        let today = Utc::now().date_naive();
        let sunday = today - chrono::Days::new(today.weekday().num_days_from_sunday() as u64);
        let start_of_week = sunday.and_time(NaiveTime::MIN).and_utc();

        let daily_sales = self.report_repo.daily_sales_since(branch, start_of_week).await?;
        let top_products = self.report_repo.top_produce_sales(Some(branch)).await?;
        let stock_levels = self.report_repo.stock_levels(branch).await?;
        let upcoming_due_dates = self.report_repo.upcoming_due_dates(branch, today).await?;
        let agent_performance = self.report_repo.agent_performance(branch).await?;

        Ok(BranchReport {
            daily_sales,
            top_products,
            stock_levels,
            upcoming_due_dates,
            agent_performance,
        })
    }

    // --- RELATÓRIO DE VENDAS POR PERÍODO ---
    // O resumo é calculado sobre as mesmas linhas devolvidas, então os dois
    // sempre batem.
    pub async fn sales_report(
        &self,
        user: &User,
        query: SalesReportQuery,
    ) -> Result<SalesReport, AppError> {
        let branch = match branch_scope(user) {
            Some(own) => Some(own),
            None => query.branch,
        };

        let start = query
            .start_date
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let end = query
            .end_date
            .map(|d| (d + chrono::Days::new(1)).and_time(NaiveTime::MIN).and_utc());

        let sales = self
            .sales_repo
            .list_with_details(branch, start, end, None)
            .await?;

        let summary = SalesReportSummary {
            total_sales: sales.iter().map(|s| s.amount_paid).sum(),
            total_tonnage: sales.iter().map(|s| s.tonnage).sum(),
            sale_count: sales.len() as i64,
        };

        Ok(SalesReport { sales, summary })
    }
}
