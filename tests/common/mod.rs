// tests/common/mod.rs

// Nem todo alvo de teste usa todos os helpers.
#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;

use kgl_backend::{
    config::AppState,
    db::MIGRATOR,
    models::{
        auth::{RegisterUserPayload, Role, User},
        produce::{Branch, CreateProducePayload, Produce, ProduceSource},
        sales::CreateSalePayload,
    },
};

// Banco em memória com conexão única: todas as operações enxergam o mesmo
// banco e escritas concorrentes serializam na pool.
pub async fn test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("falha ao abrir o sqlite em memória");

    MIGRATOR
        .run(&pool)
        .await
        .expect("falha ao rodar as migrações");

    AppState::with_pool(pool, "segredo-de-teste".to_string())
}

// Registra via serviço e resolve o usuário pelo próprio token emitido.
pub async fn register_user(
    state: &AppState,
    name: &str,
    email: &str,
    role: Role,
    branch: Branch,
) -> User {
    let payload = RegisterUserPayload {
        name: name.to_string(),
        email: email.to_string(),
        password: "segredo123".to_string(),
        role,
        branch,
        contact: "0700123456".to_string(),
    };

    let token = state
        .auth_service
        .register_user(payload)
        .await
        .expect("falha ao registrar usuário de teste");

    state
        .auth_service
        .validate_token(&token)
        .await
        .expect("token recém-emitido deveria validar")
}

pub async fn seed_produce(
    state: &AppState,
    manager: &User,
    name: &str,
    branch: Branch,
    tonnage: i64,
) -> Produce {
    let payload = CreateProducePayload {
        name: name.to_string(),
        produce_type: "Cereal".to_string(),
        tonnage,
        cost: 200_000,
        selling_price: 250_000,
        dealer: "Okot Farms".to_string(),
        dealer_contact: "+256701234567".to_string(),
        branch,
        source: ProduceSource::Individual,
    };

    state
        .produce_service
        .create(manager, payload)
        .await
        .expect("falha ao criar produto de teste")
}

pub fn sale_payload(produce_id: &str, tonnage: i64) -> CreateSalePayload {
    CreateSalePayload {
        produce_id: produce_id.to_string(),
        tonnage,
        amount_paid: 150_000,
        buyer_name: "Mukasa John".to_string(),
    }
}
