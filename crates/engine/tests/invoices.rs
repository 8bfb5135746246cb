mod common;

use engine::{
    CreateInvoiceCmd, EngineError, ErrorKind, InvoiceListFilter, InvoiceStatus, InvoiceType,
    LineItemInput, SettlementStatus, TaxRate, UpdateInvoiceCmd,
};

use common::{cents, date, engine_with_db, retail_customer, supplier, wholesale_customer, widget};

#[tokio::test]
async fn sales_invoice_totals_and_settlement() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;
    let product = widget(&engine, 10).await;

    let detail = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 2)),
        )
        .await
        .unwrap();

    let invoice = &detail.invoice;
    assert_eq!(invoice.subtotal, cents(10000));
    assert_eq!(invoice.tax_amount, cents(1800));
    assert_eq!(invoice.total_amount, cents(11800));
    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert_eq!(detail.payment_status, SettlementStatus::Unpaid);
    assert_eq!(detail.counterparty_name.as_deref(), Some("Asha Traders"));
    assert_eq!(detail.line_items.len(), 1);
    assert_eq!(detail.line_items[0].line.item_name, "Widget");
    assert_eq!(detail.line_items[0].line.position, 1);
    assert!(invoice.invoice_number.starts_with("INV-S-"));

    let partial = engine
        .record_invoice_payment(invoice.id, cents(6000))
        .await
        .unwrap();
    assert_eq!(partial.invoice.status, InvoiceStatus::Partial);
    assert_eq!(partial.outstanding_amount, cents(5800));
    assert_eq!(partial.payment_status, SettlementStatus::Partial);

    let paid = engine
        .record_invoice_payment(invoice.id, cents(5800))
        .await
        .unwrap();
    assert_eq!(paid.invoice.status, InvoiceStatus::Paid);
    assert_eq!(paid.outstanding_amount, cents(0));
    assert_eq!(paid.payment_status, SettlementStatus::Paid);
}

#[tokio::test]
async fn discount_is_subtracted_after_tax() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let detail = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .discount(cents(500))
                .line(
                    LineItemInput::free_text("Delivery", 1, cents(1000))
                        .tax_rate(TaxRate::from_hundredths(1250)),
                )
                .line(LineItemInput::free_text("Packing", 3, cents(333))),
        )
        .await
        .unwrap();

    let invoice = &detail.invoice;
    assert_eq!(invoice.subtotal, cents(1999));
    assert_eq!(invoice.tax_amount, cents(125));
    assert_eq!(invoice.discount_amount, cents(500));
    assert_eq!(
        invoice.total_amount,
        invoice.subtotal + invoice.tax_amount - invoice.discount_amount
    );

    let updated = engine
        .update_invoice(UpdateInvoiceCmd::new(invoice.id).discount(cents(0)))
        .await
        .unwrap();
    assert_eq!(updated.invoice.total_amount, cents(2124));
    assert_eq!(updated.line_items.len(), 2);
}

#[tokio::test]
async fn wholesale_customers_get_wholesale_prices() {
    let (engine, _db) = engine_with_db().await;
    let retail = retail_customer(&engine).await;
    let wholesale = wholesale_customer(&engine).await;
    let vendor = supplier(&engine).await;
    let product = widget(&engine, 10).await;

    let retail_price = engine
        .create_invoice(
            CreateInvoiceCmd::sales(retail.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 1)),
        )
        .await
        .unwrap()
        .line_items[0]
        .line
        .unit_price;
    let wholesale_price = engine
        .create_invoice(
            CreateInvoiceCmd::sales(wholesale.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 1)),
        )
        .await
        .unwrap()
        .line_items[0]
        .line
        .unit_price;
    let purchase_price = engine
        .create_invoice(
            CreateInvoiceCmd::purchase(vendor.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 1)),
        )
        .await
        .unwrap()
        .line_items[0]
        .line
        .unit_price;
    let explicit_price = engine
        .create_invoice(
            CreateInvoiceCmd::sales(wholesale.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 1).unit_price(cents(4500))),
        )
        .await
        .unwrap()
        .line_items[0]
        .line
        .unit_price;

    assert_eq!(retail_price, cents(5000));
    assert_eq!(wholesale_price, cents(4000));
    assert_eq!(purchase_price, cents(3000));
    assert_eq!(explicit_price, cents(4500));
}

#[tokio::test]
async fn sales_then_cancel_restores_stock() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;
    let first = widget(&engine, 10).await;
    let second = widget(&engine, 4).await;

    let detail = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::product(first.id, 3))
                .line(LineItemInput::product(second.id, 4)),
        )
        .await
        .unwrap();
    assert_eq!(engine.product(first.id).await.unwrap().stock_quantity, 7);
    assert_eq!(engine.product(second.id).await.unwrap().stock_quantity, 0);

    let cancelled = engine.cancel_invoice(detail.invoice.id).await.unwrap();
    assert_eq!(cancelled.invoice.status, InvoiceStatus::Cancelled);
    assert_eq!(cancelled.line_items.len(), 2);
    assert_eq!(engine.product(first.id).await.unwrap().stock_quantity, 10);
    assert_eq!(engine.product(second.id).await.unwrap().stock_quantity, 4);

    let movements = engine.stock_movements(first.id).await.unwrap();
    let reasons: Vec<&str> = movements.iter().map(|m| m.reason.as_str()).collect();
    assert_eq!(
        reasons,
        vec!["opening_stock", "sales_invoice", "sales_invoice_cancelled"]
    );

    let err = engine.cancel_invoice(detail.invoice.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);
    assert_eq!(engine.product(first.id).await.unwrap().stock_quantity, 10);
}

#[tokio::test]
async fn purchase_invoice_brings_stock_in() {
    let (engine, _db) = engine_with_db().await;
    let vendor = supplier(&engine).await;
    let product = widget(&engine, 2).await;

    let detail = engine
        .create_invoice(
            CreateInvoiceCmd::purchase(vendor.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 5)),
        )
        .await
        .unwrap();
    assert!(detail.invoice.invoice_number.starts_with("INV-P-"));
    assert_eq!(engine.product(product.id).await.unwrap().stock_quantity, 7);

    engine.cancel_invoice(detail.invoice.id).await.unwrap();
    let movements = engine.stock_movements(product.id).await.unwrap();
    let last = movements.last().unwrap();
    assert_eq!(last.reason, "purchase_invoice_cancelled");
    assert_eq!(last.delta, -5);
    assert_eq!(last.new_quantity, 2);
}

#[tokio::test]
async fn replacing_lines_reverses_then_reapplies() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;
    let product = widget(&engine, 10).await;

    let detail = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 3)),
        )
        .await
        .unwrap();
    assert_eq!(engine.product(product.id).await.unwrap().stock_quantity, 7);

    let updated = engine
        .update_invoice(
            UpdateInvoiceCmd::new(detail.invoice.id)
                .line_items(vec![LineItemInput::product(product.id, 1)]),
        )
        .await
        .unwrap();
    assert_eq!(updated.line_items.len(), 1);
    assert_eq!(updated.line_items[0].line.quantity, 1);
    assert_eq!(updated.invoice.total_amount, cents(5900));
    assert_eq!(engine.product(product.id).await.unwrap().stock_quantity, 9);

    let movements = engine.stock_movements(product.id).await.unwrap();
    let trail: Vec<(i64, i64, &str)> = movements
        .iter()
        .map(|m| (m.delta, m.new_quantity, m.reason.as_str()))
        .collect();
    assert_eq!(
        trail,
        vec![
            (10, 10, "opening_stock"),
            (-3, 7, "sales_invoice"),
            (3, 10, "sales_invoice_reversal"),
            (-1, 9, "sales_invoice"),
        ]
    );
    assert!(
        movements[1..]
            .iter()
            .all(|m| m.invoice_id == Some(detail.invoice.id))
    );
}

#[tokio::test]
async fn overpayment_is_rejected_and_state_unchanged() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let detail = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::free_text("Service", 1, cents(10000))),
        )
        .await
        .unwrap();
    engine
        .record_invoice_payment(detail.invoice.id, cents(4000))
        .await
        .unwrap();

    let err = engine
        .record_invoice_payment(detail.invoice.id, cents(6001))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExceedsOutstanding(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = engine
        .record_invoice_payment(detail.invoice.id, cents(0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let current = engine.invoice(detail.invoice.id).await.unwrap();
    assert_eq!(current.invoice.paid_amount, cents(4000));
    assert_eq!(current.invoice.status, InvoiceStatus::Partial);
}

#[tokio::test]
async fn cancelled_invoices_are_frozen() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let detail = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::free_text("Service", 1, cents(10000))),
        )
        .await
        .unwrap();
    engine.cancel_invoice(detail.invoice.id).await.unwrap();

    let err = engine
        .update_invoice(UpdateInvoiceCmd::new(detail.invoice.id).notes("late"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);

    let err = engine
        .record_invoice_payment(detail.invoice.id, cents(100))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);
}

#[tokio::test]
async fn status_follows_payments_once_paid() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let detail = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::free_text("Service", 1, cents(10000))),
        )
        .await
        .unwrap();
    let sent = engine
        .update_invoice(UpdateInvoiceCmd::new(detail.invoice.id).status(InvoiceStatus::Sent))
        .await
        .unwrap();
    assert_eq!(sent.invoice.status, InvoiceStatus::Sent);

    let err = engine
        .update_invoice(UpdateInvoiceCmd::new(detail.invoice.id).status(InvoiceStatus::Paid))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    engine
        .record_invoice_payment(detail.invoice.id, cents(10000))
        .await
        .unwrap();
    let err = engine
        .update_invoice(UpdateInvoiceCmd::new(detail.invoice.id).status(InvoiceStatus::Draft))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);

    // Raising the total of a paid invoice reopens it as partial.
    let reopened = engine
        .update_invoice(UpdateInvoiceCmd::new(detail.invoice.id).line_items(vec![
            LineItemInput::free_text("Service", 1, cents(10000)),
            LineItemInput::free_text("Extra", 1, cents(2000)),
        ]))
        .await
        .unwrap();
    assert_eq!(reopened.invoice.status, InvoiceStatus::Partial);
    assert_eq!(reopened.outstanding_amount, cents(2000));
}

#[tokio::test]
async fn failed_update_leaves_no_partial_state() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;
    let product = widget(&engine, 10).await;

    let detail = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 3)),
        )
        .await
        .unwrap();
    engine
        .record_invoice_payment(detail.invoice.id, detail.invoice.total_amount)
        .await
        .unwrap();
    let movements_before = engine.stock_movements(product.id).await.unwrap().len();

    // The smaller total would fall below the amount already paid.
    let err = engine
        .update_invoice(
            UpdateInvoiceCmd::new(detail.invoice.id)
                .line_items(vec![LineItemInput::product(product.id, 1)]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);

    let current = engine.invoice(detail.invoice.id).await.unwrap();
    assert_eq!(current.line_items.len(), 1);
    assert_eq!(current.line_items[0].line.quantity, 3);
    assert_eq!(current.invoice.status, InvoiceStatus::Paid);
    assert_eq!(engine.product(product.id).await.unwrap().stock_quantity, 7);
    assert_eq!(
        engine.stock_movements(product.id).await.unwrap().len(),
        movements_before
    );
}

#[tokio::test]
async fn failed_create_persists_nothing() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;
    let product = widget(&engine, 10).await;

    let err = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 2))
                .line(LineItemInput::product(uuid::Uuid::new_v4(), 1)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::product(product.id, 2))
                .line(LineItemInput::product(product.id, 0)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let list = engine
        .list_invoices(&InvoiceListFilter::default())
        .await
        .unwrap();
    assert!(list.invoices.is_empty());
    assert_eq!(engine.product(product.id).await.unwrap().stock_quantity, 10);
    assert_eq!(engine.stock_movements(product.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn counterparty_must_match_invoice_type() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;
    let vendor = supplier(&engine).await;

    let err = engine
        .create_invoice(CreateInvoiceCmd::new(InvoiceType::Sales, date(2024, 3, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = engine
        .create_invoice(CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1)).supplier_id(vendor.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = engine
        .create_invoice(CreateInvoiceCmd::sales(uuid::Uuid::new_v4(), date(2024, 3, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn invoice_numbers_are_unique() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let number = engine
        .generate_invoice_number(InvoiceType::Sales)
        .await
        .unwrap();
    assert!(number.starts_with("INV-S-"));

    engine
        .create_invoice(CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1)).invoice_number(&number))
        .await
        .unwrap();

    let next = engine
        .generate_invoice_number(InvoiceType::Sales)
        .await
        .unwrap();
    assert_ne!(next, number);

    let err = engine
        .create_invoice(CreateInvoiceCmd::sales(customer.id, date(2024, 3, 2)).invoice_number(&number))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey(number));
}

#[tokio::test]
async fn sales_invoice_leaves_customer_balance_alone() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::free_text("Service", 1, cents(10000))),
        )
        .await
        .unwrap();

    let customer = engine.customer(customer.id).await.unwrap();
    assert_eq!(customer.outstanding_balance, cents(0));
}

#[tokio::test]
async fn list_and_dashboard_summaries() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;
    let vendor = supplier(&engine).await;

    let overdue = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 1, 1))
                .due_date(date(2024, 1, 15))
                .notes("first order")
                .line(LineItemInput::free_text("Service", 1, cents(10000))),
        )
        .await
        .unwrap();
    engine
        .record_invoice_payment(overdue.invoice.id, cents(2500))
        .await
        .unwrap();
    let paid = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 2, 1))
                .due_date(date(2024, 2, 15))
                .line(LineItemInput::free_text("Service", 1, cents(3000))),
        )
        .await
        .unwrap();
    engine
        .record_invoice_payment(paid.invoice.id, cents(3000))
        .await
        .unwrap();
    engine
        .create_invoice(
            CreateInvoiceCmd::purchase(vendor.id, date(2024, 3, 1))
                .line(LineItemInput::free_text("Stock", 1, cents(7000))),
        )
        .await
        .unwrap();
    let cancelled = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 5))
                .due_date(date(2024, 1, 1))
                .line(LineItemInput::free_text("Service", 1, cents(99900))),
        )
        .await
        .unwrap();
    engine.cancel_invoice(cancelled.invoice.id).await.unwrap();

    let sales = engine
        .list_invoices(&InvoiceListFilter {
            invoice_type: Some(InvoiceType::Sales),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(sales.summary.total_invoices, 3);
    assert_eq!(sales.invoices[0].invoice.id, cancelled.invoice.id);
    assert_eq!(sales.summary.paid_invoices, 1);

    let found = engine
        .list_invoices(&InvoiceListFilter {
            search: Some("first".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.invoices.len(), 1);
    assert_eq!(found.invoices[0].invoice.id, overdue.invoice.id);

    let dashboard = engine.invoice_dashboard(date(2024, 3, 10)).await.unwrap();
    assert_eq!(dashboard.recent_invoices.len(), 4);
    assert_eq!(dashboard.overdue_count, 1);
    assert_eq!(dashboard.overdue_invoices[0].invoice.id, overdue.invoice.id);
    assert_eq!(dashboard.total_sales, cents(13000));
    assert_eq!(dashboard.total_purchases, cents(7000));
    assert_eq!(dashboard.total_outstanding, cents(7500 + 7000));
}
