// tests/stock_flow.rs
//
// Exercita o núcleo de baixa de estoque compartilhado pelas vendas à vista
// e a crédito, direto na camada de serviços, sobre um banco em memória.

mod common;

use chrono::{Days, Utc};

use common::{register_user, sale_payload, seed_produce, test_state};
use kgl_backend::{
    common::error::AppError,
    models::{
        auth::Role,
        credit::{CreateCreditPayload, CreditListQuery, CreditPaymentPayload, CreditStatus},
        produce::{Branch, UpdatePricePayload, UpdateStockPayload},
        sales::SaleListQuery,
    },
};

fn credit_payload(produce_id: &str, tonnage: i64, amount_due: i64) -> CreateCreditPayload {
    CreateCreditPayload {
        produce_id: produce_id.to_string(),
        tonnage,
        amount_due,
        buyer_name: "Nambi Grace".to_string(),
        national_id: "CM90103AB2C3D4".to_string(),
        location: "Kawempe".to_string(),
        contact: "0772345678".to_string(),
        due_date: Utc::now().date_naive() + Days::new(30),
    }
}

#[tokio::test]
async fn sale_decrements_stock_by_exactly_the_tonnage_sold() {
    let state = test_state().await;
    let manager = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let agent = register_user(&state, "Odong", "odong@kgl.test", Role::SalesAgent, Branch::Maganjo).await;
    let produce = seed_produce(&state, &manager, "Maize", Branch::Maganjo, 100).await;

    let sale = state
        .sales_service
        .record_sale(&agent, sale_payload(&produce.id, 30))
        .await
        .expect("venda dentro do saldo deveria passar");

    // Registro enriquecido com os campos de exibição
    assert_eq!(sale.tonnage, 30);
    assert_eq!(sale.branch, Branch::Maganjo);
    assert_eq!(sale.produce_name, "Maize");
    assert_eq!(sale.produce_type, "Cereal");
    assert_eq!(sale.selling_price, 250_000);
    assert_eq!(sale.agent_name, "Odong");
    assert_eq!(sale.agent_role, Role::SalesAgent);

    // Baixa exata, teto intacto
    let after = state.produce_service.get(&agent, &produce.id).await.unwrap();
    assert_eq!(after.current_stock, 70);
    assert_eq!(after.tonnage, 100);

    // Exatamente um registro de venda referenciando o produto
    let sales = state
        .sales_service
        .list_sales(&agent, SaleListQuery::default())
        .await
        .unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].produce_id, produce.id);
}

#[tokio::test]
async fn oversold_sale_is_rejected_and_leaves_stock_untouched() {
    let state = test_state().await;
    let manager = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let agent = register_user(&state, "Odong", "odong@kgl.test", Role::SalesAgent, Branch::Maganjo).await;
    let produce = seed_produce(&state, &manager, "Beans", Branch::Maganjo, 50).await;

    let err = state
        .sales_service
        .record_sale(&agent, sale_payload(&produce.id, 60))
        .await
        .expect_err("venda acima do saldo deveria falhar");

    assert!(matches!(err, AppError::InsufficientStock { available: 50 }));

    // Nenhum efeito colateral: saldo intacto, nenhuma venda criada
    let after = state.produce_service.get(&agent, &produce.id).await.unwrap();
    assert_eq!(after.current_stock, 50);

    let sales = state
        .sales_service
        .list_sales(&agent, SaleListQuery::default())
        .await
        .unwrap();
    assert!(sales.is_empty());
}

#[tokio::test]
async fn selling_produce_from_another_branch_is_forbidden() {
    let state = test_state().await;
    let manager = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let outsider = register_user(&state, "Apio", "apio@kgl.test", Role::SalesAgent, Branch::Matugga).await;
    let produce = seed_produce(&state, &manager, "Maize", Branch::Maganjo, 100).await;

    let err = state
        .sales_service
        .record_sale(&outsider, sale_payload(&produce.id, 10))
        .await
        .expect_err("agente de outra filial não pode vender");
    assert!(matches!(err, AppError::ForeignBranch(_)));

    // Diretor também não tem isenção em escrita
    let director = register_user(&state, "Okot", "okot@kgl.test", Role::Director, Branch::Matugga).await;
    let err = state
        .sales_service
        .record_sale(&director, sale_payload(&produce.id, 10))
        .await
        .expect_err("diretor de outra filial também é barrado na venda");
    assert!(matches!(err, AppError::ForeignBranch(_)));

    let after = state.produce_service.get(&manager, &produce.id).await.unwrap();
    assert_eq!(after.current_stock, 100);
}

#[tokio::test]
async fn selling_unknown_produce_is_not_found() {
    let state = test_state().await;
    let agent = register_user(&state, "Odong", "odong@kgl.test", Role::SalesAgent, Branch::Maganjo).await;

    let err = state
        .sales_service
        .record_sale(&agent, sale_payload("nao-existe", 10))
        .await
        .expect_err("produto inexistente");
    assert!(matches!(err, AppError::ProduceNotFound));
}

// Cenário da concorrência: estoque 100, duas vendas simultâneas de 60 kg.
// Exatamente uma passa; a outra recebe InsufficientStock e o saldo termina em 40.
#[tokio::test]
async fn concurrent_sales_cannot_oversubscribe_stock() {
    let state = test_state().await;
    let manager = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let agent = register_user(&state, "Odong", "odong@kgl.test", Role::SalesAgent, Branch::Maganjo).await;
    let produce = seed_produce(&state, &manager, "Maize", Branch::Maganjo, 100).await;

    let task_a = tokio::spawn({
        let state = state.clone();
        let agent = agent.clone();
        let id = produce.id.clone();
        async move { state.sales_service.record_sale(&agent, sale_payload(&id, 60)).await }
    });
    let task_b = tokio::spawn({
        let state = state.clone();
        let agent = agent.clone();
        let id = produce.id.clone();
        async move { state.sales_service.record_sale(&agent, sale_payload(&id, 60)).await }
    });

    let results = [task_a.await.unwrap(), task_b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "apenas uma das vendas concorrentes pode passar");

    let failure = results
        .iter()
        .find_map(|r| r.as_ref().err())
        .expect("a outra venda deveria ter falhado");
    assert!(matches!(failure, AppError::InsufficientStock { available: 40 }));

    let after = state.produce_service.get(&agent, &produce.id).await.unwrap();
    assert_eq!(after.current_stock, 40);

    let sales = state
        .sales_service
        .list_sales(&agent, SaleListQuery::default())
        .await
        .unwrap();
    assert_eq!(sales.len(), 1);
}

#[tokio::test]
async fn credit_sale_shares_the_stock_core() {
    let state = test_state().await;
    let manager = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let agent = register_user(&state, "Odong", "odong@kgl.test", Role::SalesAgent, Branch::Maganjo).await;
    let produce = seed_produce(&state, &manager, "Rice", Branch::Maganjo, 80).await;

    let credit = state
        .credit_service
        .record_credit_sale(&agent, credit_payload(&produce.id, 30, 90_000))
        .await
        .expect("crédito dentro do saldo deveria passar");

    assert_eq!(credit.status, CreditStatus::Pending);
    assert_eq!(credit.amount_paid, 0);
    assert_eq!(credit.produce_name, "Rice");
    assert_eq!(credit.agent_name, "Odong");

    let after = state.produce_service.get(&agent, &produce.id).await.unwrap();
    assert_eq!(after.current_stock, 50);

    // A mesma checagem de saldo vale para o caminho do crédito
    let err = state
        .credit_service
        .record_credit_sale(&agent, credit_payload(&produce.id, 60, 90_000))
        .await
        .expect_err("crédito acima do saldo deveria falhar");
    assert!(matches!(err, AppError::InsufficientStock { available: 50 }));
}

// Cenário do acúmulo de pagamentos: 50.000 devidos, 20.000 + 30.000 pagos.
#[tokio::test]
async fn credit_payment_accrual_walks_pending_partial_paid() {
    let state = test_state().await;
    let manager = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let agent = register_user(&state, "Odong", "odong@kgl.test", Role::SalesAgent, Branch::Maganjo).await;
    let produce = seed_produce(&state, &manager, "Millet", Branch::Maganjo, 40).await;

    let credit = state
        .credit_service
        .record_credit_sale(&agent, credit_payload(&produce.id, 10, 50_000))
        .await
        .unwrap();
    assert_eq!(credit.status, CreditStatus::Pending);

    let credit = state
        .credit_service
        .update_payment(&agent, &credit.id, CreditPaymentPayload { amount_paid: 20_000 })
        .await
        .unwrap();
    assert_eq!(credit.status, CreditStatus::Partial);
    assert_eq!(credit.amount_paid, 20_000);

    let credit = state
        .credit_service
        .update_payment(&agent, &credit.id, CreditPaymentPayload { amount_paid: 30_000 })
        .await
        .unwrap();
    assert_eq!(credit.status, CreditStatus::Paid);
    assert_eq!(credit.amount_paid, 50_000);

    // Sem estado terminal: um crédito quitado ainda aceita pagamento
    let credit = state
        .credit_service
        .update_payment(&agent, &credit.id, CreditPaymentPayload { amount_paid: 5_000 })
        .await
        .unwrap();
    assert_eq!(credit.status, CreditStatus::Paid);
    assert_eq!(credit.amount_paid, 55_000);
}

#[tokio::test]
async fn credit_payment_respects_branch_isolation() {
    let state = test_state().await;
    let manager = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let agent = register_user(&state, "Odong", "odong@kgl.test", Role::SalesAgent, Branch::Maganjo).await;
    let outsider = register_user(&state, "Apio", "apio@kgl.test", Role::SalesAgent, Branch::Matugga).await;
    let produce = seed_produce(&state, &manager, "Millet", Branch::Maganjo, 40).await;

    let credit = state
        .credit_service
        .record_credit_sale(&agent, credit_payload(&produce.id, 10, 50_000))
        .await
        .unwrap();

    let err = state
        .credit_service
        .update_payment(&outsider, &credit.id, CreditPaymentPayload { amount_paid: 10_000 })
        .await
        .expect_err("pagamento de outra filial deveria ser barrado");
    assert!(matches!(err, AppError::ForeignBranch(_)));
}

#[tokio::test]
async fn managers_mutate_only_their_own_branch() {
    let state = test_state().await;
    let manager = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let other_manager =
        register_user(&state, "Nakato", "nakato@kgl.test", Role::Manager, Branch::Matugga).await;
    let produce = seed_produce(&state, &manager, "Maize", Branch::Maganjo, 100).await;

    // Reposição soma no teto e no saldo
    let updated = state
        .produce_service
        .add_stock(&manager, &produce.id, UpdateStockPayload { additional_stock: 20 })
        .await
        .unwrap();
    assert_eq!(updated.tonnage, 120);
    assert_eq!(updated.current_stock, 120);

    let updated = state
        .produce_service
        .update_price(&manager, &produce.id, UpdatePricePayload { selling_price: 300_000 })
        .await
        .unwrap();
    assert_eq!(updated.selling_price, 300_000);

    // Gerente da outra filial é barrado
    let err = state
        .produce_service
        .add_stock(&other_manager, &produce.id, UpdateStockPayload { additional_stock: 5 })
        .await
        .expect_err("gerente de outra filial não atualiza estoque");
    assert!(matches!(err, AppError::ForeignBranch(_)));
}

#[tokio::test]
async fn directors_read_everything_but_others_stay_branch_bound() {
    let state = test_state().await;
    let manager_a = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let manager_b = register_user(&state, "Nakato", "nakato@kgl.test", Role::Manager, Branch::Matugga).await;
    let director = register_user(&state, "Okot", "okot@kgl.test", Role::Director, Branch::Maganjo).await;

    let maganjo = seed_produce(&state, &manager_a, "Maize", Branch::Maganjo, 100).await;
    let matugga = seed_produce(&state, &manager_b, "Beans", Branch::Matugga, 60).await;

    // Diretor lê as duas filiais (inclusive detalhe fora da própria)
    let all = state.produce_service.list(&director, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(state.produce_service.get(&director, &matugga.id).await.is_ok());

    // Diretor pode filtrar explicitamente
    let only_matugga = state
        .produce_service
        .list(&director, Some(Branch::Matugga))
        .await
        .unwrap();
    assert_eq!(only_matugga.len(), 1);
    assert_eq!(only_matugga[0].id, matugga.id);

    // Gerente fica preso à própria filial, mesmo pedindo outra
    let scoped = state
        .produce_service
        .list(&manager_a, Some(Branch::Matugga))
        .await
        .unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].id, maganjo.id);

    let err = state
        .produce_service
        .get(&manager_a, &matugga.id)
        .await
        .expect_err("leitura de detalhe fora da filial é barrada para não-diretores");
    assert!(matches!(err, AppError::ForeignBranch(_)));
}

#[tokio::test]
async fn reports_aggregate_sales_credit_and_stock() {
    let state = test_state().await;
    let manager = register_user(&state, "Akello", "akello@kgl.test", Role::Manager, Branch::Maganjo).await;
    let agent = register_user(&state, "Odong", "odong@kgl.test", Role::SalesAgent, Branch::Maganjo).await;
    let director = register_user(&state, "Okot", "okot@kgl.test", Role::Director, Branch::Maganjo).await;
    let produce = seed_produce(&state, &manager, "Maize", Branch::Maganjo, 100).await;

    state
        .sales_service
        .record_sale(&agent, sale_payload(&produce.id, 20))
        .await
        .unwrap();
    state
        .sales_service
        .record_sale(&agent, sale_payload(&produce.id, 10))
        .await
        .unwrap();
    state
        .credit_service
        .record_credit_sale(&agent, credit_payload(&produce.id, 15, 90_000))
        .await
        .unwrap();

    let dashboard = state.report_service.dashboard().await.unwrap();

    assert_eq!(dashboard.sales_by_branch.len(), 1);
    assert_eq!(dashboard.sales_by_branch[0].branch, Branch::Maganjo);
    assert_eq!(dashboard.sales_by_branch[0].count, 2);
    assert_eq!(dashboard.sales_by_branch[0].total_sales, 300_000);

    assert_eq!(dashboard.outstanding_credit.len(), 1);
    assert_eq!(dashboard.outstanding_credit[0].total_outstanding, 90_000);

    // 100 - 20 - 10 - 15
    assert_eq!(dashboard.stock_by_branch[0].total_stock, 55);
    assert_eq!(dashboard.monthly_sales_trend.len(), 1);
    assert_eq!(dashboard.monthly_sales_trend[0].total_sales, 300_000);

    // Painel do gerente
    let branch_report = state.report_service.branch_report(&manager).await.unwrap();
    assert_eq!(branch_report.stock_levels.len(), 1);
    assert_eq!(branch_report.stock_levels[0].current_stock, 55);
    assert_eq!(branch_report.upcoming_due_dates.len(), 1);
    assert_eq!(branch_report.agent_performance.len(), 1);
    assert_eq!(branch_report.agent_performance[0].sale_count, 2);

    // Relatório de vendas: resumo bate com as linhas
    let report = state
        .report_service
        .sales_report(&director, Default::default())
        .await
        .unwrap();
    assert_eq!(report.summary.sale_count, 2);
    assert_eq!(report.summary.total_tonnage, 30);
    assert_eq!(report.summary.total_sales, 300_000);

    // Totais consolidados do diretor
    let totals = state.sales_service.sales_totals().await.unwrap();
    assert_eq!(totals.overall_summary.total_sales, 2);
    assert_eq!(totals.overall_summary.total_amount, 300_000);
    assert_eq!(totals.overall_summary.total_tonnage, 30);

    // Vencidos: ainda nada (vencimento em 30 dias)
    let overdue = state.credit_service.overdue_credit_sales(&agent).await.unwrap();
    assert!(overdue.is_empty());

    let credits = state
        .credit_service
        .list_credit_sales(&agent, CreditListQuery::default())
        .await
        .unwrap();
    assert_eq!(credits.len(), 1);
}
