pub mod credit_repo;
pub use credit_repo::CreditRepository;
pub mod produce_repo;
pub use produce_repo::ProduceRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod user_repo;
pub use user_repo::UserRepository;

// Migrações embutidas no binário (diretório `migrations/` na raiz).
// Expostas aqui para o `main` e para os testes de integração rodarem o
// mesmo esquema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
