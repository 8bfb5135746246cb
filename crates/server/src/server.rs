use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{invoices, ledger, parties, payments, products};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Builds the `/api` router.
pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route(
            "/products",
            get(products::list).post(products::create),
        )
        .route("/products/categories", get(products::categories))
        .route(
            "/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/products/{id}/stock", post(products::adjust_stock))
        .route(
            "/customers",
            get(parties::list_customers).post(parties::create_customer),
        )
        .route(
            "/customers/{id}",
            get(parties::get_customer)
                .put(parties::update_customer)
                .delete(parties::delete_customer),
        )
        .route(
            "/suppliers",
            get(parties::list_suppliers).post(parties::create_supplier),
        )
        .route(
            "/suppliers/{id}",
            get(parties::get_supplier)
                .put(parties::update_supplier)
                .delete(parties::delete_supplier),
        )
        .route(
            "/invoices",
            get(invoices::list).post(invoices::create),
        )
        .route("/invoices/dashboard", get(invoices::dashboard))
        .route("/invoices/generate-number", post(invoices::generate_number))
        .route(
            "/invoices/{id}",
            get(invoices::get)
                .put(invoices::update)
                .delete(invoices::cancel),
        )
        .route("/invoices/{id}/payment", post(invoices::record_payment))
        .route(
            "/payments",
            get(payments::list).post(payments::create),
        )
        .route(
            "/payments/{id}",
            get(payments::get)
                .put(payments::update)
                .delete(payments::delete),
        )
        .route("/ledger", get(ledger::list))
        .route("/balances", get(ledger::balances));

    Router::new().nest("/api", api).with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
