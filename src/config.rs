// src/config.rs

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use std::{env, str::FromStr, time::Duration};

use crate::{
    db::{CreditRepository, ProduceRepository, ReportRepository, SalesRepository, UserRepository},
    services::{
        auth::AuthService, credit_service::CreditService, produce_service::ProduceService,
        report_service::ReportService, sales_service::SalesService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub auth_service: AuthService,
    pub produce_service: ProduceService,
    pub sales_service: SalesService,
    pub credit_service: CreditService,
    pub report_service: ReportService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, quem decide
    // o que fazer é o main.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // WAL + busy_timeout: leituras concorrentes com escritores e espera
        // educada quando dois escritores colidem.
        let options = SqliteConnectOptions::from_str(&database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, jwt_secret))
    }

    // --- Monta o gráfico de dependências ---
    // Separado de `new` para os testes de integração montarem o mesmo grafo
    // sobre um banco em memória.
    pub fn with_pool(db_pool: SqlitePool, jwt_secret: String) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let produce_repo = ProduceRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let credit_repo = CreditRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let produce_service = ProduceService::new(produce_repo.clone(), db_pool.clone());
        let sales_service =
            SalesService::new(sales_repo.clone(), produce_repo.clone(), db_pool.clone());
        let credit_service = CreditService::new(credit_repo, produce_repo, db_pool.clone());
        let report_service = ReportService::new(report_repo, sales_repo);

        Self {
            db_pool,
            auth_service,
            produce_service,
            sales_service,
            credit_service,
            report_service,
        }
    }
}
