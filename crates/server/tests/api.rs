use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_customer(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/customers",
        Some(json!({ "name": "Asha Traders" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_product(app: &Router, stock: i64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Widget",
            "sku": "W-1",
            "retail_price_minor": 5000,
            "tax_rate_hundredths": 1800,
            "stock_quantity": stock,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_sale(app: &Router, customer_id: &str, product_id: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/invoices",
        Some(json!({
            "invoice_type": "sales",
            "customer_id": customer_id,
            "invoice_date": "2026-10-01",
            "line_items": [{ "product_id": product_id, "quantity": 2 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn sale_invoice_computes_totals_and_moves_stock() {
    let app = app().await;
    let customer_id = create_customer(&app).await;
    let product_id = create_product(&app, 10).await;

    let invoice = create_sale(&app, &customer_id, &product_id).await;
    assert_eq!(invoice["subtotal_minor"], 10000);
    assert_eq!(invoice["tax_minor"], 1800);
    assert_eq!(invoice["total_minor"], 11800);
    assert_eq!(invoice["payment_status"], "unpaid");
    assert_eq!(invoice["counterparty_name"], "Asha Traders");
    assert!(
        invoice["invoice_number"]
            .as_str()
            .unwrap()
            .starts_with("INV-S-")
    );

    let (status, product) = send(&app, Method::GET, &format!("/api/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["stock_quantity"], 8);
}

#[tokio::test]
async fn invoice_payment_settles_and_rejects_overpayment() {
    let app = app().await;
    let customer_id = create_customer(&app).await;
    let product_id = create_product(&app, 10).await;
    let invoice = create_sale(&app, &customer_id, &product_id).await;
    let id = invoice["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/invoices/{id}/payment"),
        Some(json!({ "amount_minor": 6000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paid_minor"], 6000);
    assert_eq!(body["outstanding_minor"], 5800);
    assert_eq!(body["payment_status"], "partial");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/invoices/{id}/payment"),
        Some(json!({ "amount_minor": 6000 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn cancelling_twice_conflicts() {
    let app = app().await;
    let customer_id = create_customer(&app).await;
    let product_id = create_product(&app, 10).await;
    let invoice = create_sale(&app, &customer_id, &product_id).await;
    let uri = format!("/api/invoices/{}", invoice["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "consistency_error");
}

#[tokio::test]
async fn unknown_invoice_is_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/invoices/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/customers")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/customers/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn payment_and_ledger_endpoints() {
    let app = app().await;
    let customer_id = create_customer(&app).await;

    let (status, payment) = send(
        &app,
        Method::POST,
        "/api/payments",
        Some(json!({
            "payment_type": "received",
            "customer_id": customer_id,
            "amount_minor": 2500,
            "payment_date": "2026-10-02",
            "payment_method": "upi",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["counterparty_name"], "Asha Traders");
    assert_eq!(payment["status"], "completed");

    let (status, customer) =
        send(&app, Method::GET, &format!("/api/customers/{customer_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(customer["outstanding_balance_minor"], -2500);

    let (status, ledger) = send(
        &app,
        Method::GET,
        &format!("/api/ledger?customer_id={customer_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = ledger["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["entry_type"] == "payment_received"));

    let (status, pending) = send(&app, Method::GET, "/api/payments?status=pending", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(pending.as_array().unwrap().is_empty());
    let (_, completed) = send(&app, Method::GET, "/api/payments?status=completed", None).await;
    assert_eq!(completed.as_array().unwrap().len(), 1);

    let (status, balances) = send(&app, Method::GET, "/api/balances", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balances["total_receivable_minor"], -2500);

    let uri = format!("/api/payments/{}", payment["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, customer) =
        send(&app, Method::GET, &format!("/api/customers/{customer_id}"), None).await;
    assert_eq!(customer["outstanding_balance_minor"], 0);
}

#[tokio::test]
async fn stock_adjustment_reports_clamping() {
    let app = app().await;
    let product_id = create_product(&app, 3).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/products/{product_id}/stock"),
        Some(json!({ "delta": -5, "reason": "damaged" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["old_quantity"], 3);
    assert_eq!(body["new_quantity"], 0);
    assert_eq!(body["clamped"], true);
}
