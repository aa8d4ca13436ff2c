//src/main.rs

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;

use bakery_backend::config::AppState;
use bakery_backend::handlers;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização.
    sqlx::migrate!()
        .run(app_state.pool())
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let order_routes = Router::new()
        .route("/", post(handlers::orders::create_order))
        .route("/{id}", get(handlers::orders::get_order))
        .route("/{id}/confirm-delivery", post(handlers::orders::confirm_delivery))
        .route("/{id}/mark-delivered", post(handlers::orders::mark_fully_delivered));

    let inventory_routes = Router::new()
        .route(
            "/ingredients",
            post(handlers::inventory::create_ingredient)
                .get(handlers::inventory::get_all_ingredients),
        )
        .route(
            "/purchases",
            post(handlers::inventory::create_purchase)
                .get(handlers::inventory::get_all_purchases),
        )
        .route("/purchases/{id}", delete(handlers::inventory::delete_purchase))
        .route("/productions", post(handlers::inventory::create_production))
        .route("/productions/{id}", delete(handlers::inventory::delete_production))
        .route(
            "/daily-productions",
            post(handlers::inventory::create_daily_production),
        )
        .route(
            "/daily-productions/{id}",
            put(handlers::inventory::edit_daily_production)
                .delete(handlers::inventory::delete_daily_production),
        )
        .route(
            "/daily-productions/{id}/confirm",
            post(handlers::inventory::confirm_daily_production),
        )
        .route(
            "/revisions",
            post(handlers::inventory::create_revision)
                .get(handlers::inventory::get_all_revisions),
        );

    let finance_routes = Router::new()
        .route(
            "/loan-repayments",
            post(handlers::finance::create_loan_repayment)
                .get(handlers::finance::get_all_loan_repayments),
        )
        .route("/payments/{id}", delete(handlers::finance::delete_payment))
        .route("/balance/reset", post(handlers::finance::reset_balance))
        .route("/balance/resync", post(handlers::finance::resync_balance))
        .route("/audit", get(handlers::finance::audit_balance));

    let salary_routes = Router::new()
        .route(
            "/payments",
            post(handlers::salary::create_salary_payment)
                .get(handlers::salary::get_all_salary_payments),
        );

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/regions", post(handlers::shops::create_region))
        .route(
            "/api/shops",
            post(handlers::shops::create_shop).get(handlers::shops::get_all_shops),
        )
        .route("/api/products", post(handlers::inventory::create_product))
        .route(
            "/api/products/{id}/recipe",
            post(handlers::inventory::add_recipe_line),
        )
        .route("/api/employees", post(handlers::salary::create_employee))
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .nest("/api/orders", order_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/finance", finance_routes)
        .nest("/api/salary", salary_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
