// tests/api.rs
//
// Exercita a árvore de rotas completa (middleware de auth incluído) com
// requisições reais via `tower::ServiceExt::oneshot`.

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::test_state;
use kgl_backend::{app, config::AppState};

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// Registro via HTTP; devolve o token emitido.
async fn register(app: &Router, name: &str, email: &str, role: &str, branch: &str) -> String {
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "segredo123",
            "role": role,
            "branch": branch,
            "contact": "0700123456",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registro falhou: {body}");
    body["token"].as_str().expect("resposta sem token").to_string()
}

async fn create_produce(app: &Router, token: &str, name: &str, branch: &str, tonnage: i64) -> String {
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/produce",
        Some(token),
        Some(json!({
            "name": name,
            "type": "Cereal",
            "tonnage": tonnage,
            "cost": 200000,
            "sellingPrice": 250000,
            "dealer": "Okot Farms",
            "dealerContact": "+256701234567",
            "branch": branch,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "criação de produto falhou: {body}");
    body["id"].as_str().expect("resposta sem id").to_string()
}

fn test_app(state: &AppState) -> Router {
    app(state.clone())
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let state = test_state().await;
    let app = test_app(&state);

    let (status, _) = send(app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let state = test_state().await;
    let app = test_app(&state);

    let (status, body) = send(app, "GET", "/api/docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/produce"].is_object());
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let state = test_state().await;
    let app = test_app(&state);

    let (status, body) = send(app.clone(), "GET", "/api/produce", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or missing authentication token.");

    let (status, _) = send(
        app,
        "GET",
        "/api/produce",
        Some("um-token-qualquer"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_and_profile_roundtrip() {
    let state = test_state().await;
    let app = test_app(&state);

    let _ = register(&app, "Akello Mary", "akello@kgl.test", "manager", "Maganjo").await;

    // Login com as mesmas credenciais
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "akello@kgl.test", "password": "segredo123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(app.clone(), "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Akello Mary");
    assert_eq!(body["role"], "manager");
    assert_eq!(body["branch"], "Maganjo");
    // O hash nunca sai na resposta
    assert!(body.get("passwordHash").is_none());

    // Senha errada
    let (status, _) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "akello@kgl.test", "password": "senha-errada" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let state = test_state().await;
    let app = test_app(&state);

    let _ = register(&app, "Akello Mary", "akello@kgl.test", "manager", "Maganjo").await;

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Outra Akello",
            "email": "akello@kgl.test",
            "password": "segredo123",
            "role": "manager",
            "branch": "Maganjo",
            "contact": "0700123456",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "This e-mail is already in use.");
}

#[tokio::test]
async fn validation_failures_report_field_details() {
    let state = test_state().await;
    let app = test_app(&state);

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "A",
            "email": "nao-e-email",
            "password": "123",
            "role": "manager",
            "branch": "Maganjo",
            "contact": "12345",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "One or more fields are invalid.");
    let details = body["details"].as_object().expect("sem mapa de detalhes");
    assert!(details.contains_key("name"));
    assert!(details.contains_key("email"));
    assert!(details.contains_key("password"));
    assert!(details.contains_key("contact"));
}

#[tokio::test]
async fn full_sale_flow_over_http() {
    let state = test_state().await;
    let app = test_app(&state);

    let manager = register(&app, "Akello", "akello@kgl.test", "manager", "Maganjo").await;
    let agent = register(&app, "Odong", "odong@kgl.test", "sales_agent", "Maganjo").await;
    let outsider = register(&app, "Apio", "apio@kgl.test", "sales_agent", "Matugga").await;

    let produce_id = create_produce(&app, &manager, "Maize", "Maganjo", 100).await;

    // Venda válida
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/sales",
        Some(&agent),
        Some(json!({
            "produceId": produce_id,
            "tonnage": 60,
            "amountPaid": 150000,
            "buyerName": "Mukasa John",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "venda falhou: {body}");
    assert_eq!(body["tonnage"], 60);
    assert_eq!(body["produceName"], "Maize");
    assert_eq!(body["agentName"], "Odong");
    assert_eq!(body["branch"], "Maganjo");

    // Estoque baixou para 40
    let (status, body) = send(
        app.clone(),
        "GET",
        &format!("/api/produce/{produce_id}"),
        Some(&agent),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentStock"], 40);
    assert_eq!(body["tonnage"], 100);

    // Segunda venda de 60 não cabe mais
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/sales",
        Some(&agent),
        Some(json!({
            "produceId": produce_id,
            "tonnage": 60,
            "amountPaid": 150000,
            "buyerName": "Mukasa John",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient stock. Available: 40kg");

    // Agente da outra filial é barrado
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/sales",
        Some(&outsider),
        Some(json!({
            "produceId": produce_id,
            "tonnage": 10,
            "amountPaid": 150000,
            "buyerName": "Mukasa John",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to sell produce from other branches");

    // Listagem do agente traz a venda da filial dele
    let (status, body) = send(app, "GET", "/api/sales", Some(&agent), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));
}

#[tokio::test]
async fn role_gates_are_enforced_over_http() {
    let state = test_state().await;
    let app = test_app(&state);

    let agent = register(&app, "Odong", "odong@kgl.test", "sales_agent", "Maganjo").await;
    let director = register(&app, "Okot", "okot@kgl.test", "director", "Maganjo").await;

    // Agente não cria produto
    let (status, _) = send(
        app.clone(),
        "POST",
        "/api/produce",
        Some(&agent),
        Some(json!({
            "name": "Maize",
            "type": "Cereal",
            "tonnage": 10,
            "cost": 200000,
            "sellingPrice": 250000,
            "dealer": "Okot Farms",
            "dealerContact": "+256701234567",
            "branch": "Maganjo",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Resumo de vendas é só do diretor
    let (status, _) = send(app.clone(), "GET", "/api/sales/summary", Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(app.clone(), "GET", "/api/sales/summary", Some(&director), None).await;
    assert_eq!(status, StatusCode::OK);

    // Painel do diretor idem
    let (status, _) = send(app.clone(), "GET", "/api/reports/dashboard", Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(app.clone(), "GET", "/api/reports/dashboard", Some(&director), None).await;
    assert_eq!(status, StatusCode::OK);

    // Lista de usuários idem
    let (status, _) = send(app.clone(), "GET", "/api/auth/users", Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(app, "GET", "/api/auth/users", Some(&director), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn director_deletes_produce_in_own_branch_only() {
    let state = test_state().await;
    let app = test_app(&state);

    let manager = register(&app, "Akello", "akello@kgl.test", "manager", "Maganjo").await;
    let manager_b = register(&app, "Nakato", "nakato@kgl.test", "manager", "Matugga").await;
    let director = register(&app, "Okot", "okot@kgl.test", "director", "Maganjo").await;

    let maganjo_id = create_produce(&app, &manager, "Maize", "Maganjo", 10).await;
    let matugga_id = create_produce(&app, &manager_b, "Beans", "Matugga", 10).await;

    // Gerente não deleta (papel insuficiente)
    let (status, _) = send(
        app.clone(),
        "DELETE",
        &format!("/api/produce/{maganjo_id}"),
        Some(&manager),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Diretor deleta na própria filial
    let (status, body) = send(
        app.clone(),
        "DELETE",
        &format!("/api/produce/{maganjo_id}"),
        Some(&director),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Produce removed");

    let (status, _) = send(
        app.clone(),
        "GET",
        &format!("/api/produce/{maganjo_id}"),
        Some(&director),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Fora da filial dele, nem diretor deleta
    let (status, _) = send(
        app,
        "DELETE",
        &format!("/api/produce/{matugga_id}"),
        Some(&director),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
