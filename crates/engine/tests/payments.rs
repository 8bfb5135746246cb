mod common;

use engine::{
    CreateInvoiceCmd, CreatePaymentCmd, EngineError, ErrorKind, LedgerEntryType, LedgerFilter,
    LineItemInput, MoneyCents, NewCustomer, PaymentListFilter, PaymentMethod, PaymentStatus,
    PaymentType, UpdatePaymentCmd,
};

use common::{cents, date, engine_with_db, retail_customer, supplier};

#[tokio::test]
async fn received_payment_moves_balance_and_delete_restores_it() {
    let (engine, _db) = engine_with_db().await;
    let customer = engine
        .create_customer(NewCustomer::new("Asha Traders").outstanding_balance(cents(50000)))
        .await
        .unwrap();

    let detail = engine
        .create_payment(
            CreatePaymentCmd::received(customer.id, cents(12000), date(2024, 3, 1))
                .payment_method(PaymentMethod::Upi)
                .reference_number("UPI-778"),
        )
        .await
        .unwrap();
    assert!(detail.payment.payment_number.starts_with("PAY-"));
    assert_eq!(detail.counterparty_name.as_deref(), Some("Asha Traders"));
    assert_eq!(
        engine.customer(customer.id).await.unwrap().outstanding_balance,
        cents(38000)
    );

    engine.delete_payment(detail.payment.id).await.unwrap();
    assert_eq!(
        engine.customer(customer.id).await.unwrap().outstanding_balance,
        cents(50000)
    );
    let report = engine.list_ledger(&LedgerFilter::default()).await.unwrap();
    assert!(report.entries.is_empty());

    let err = engine.payment(detail.payment.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn every_payment_posts_a_balanced_pair() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;
    let vendor = supplier(&engine).await;

    let received = engine
        .create_payment(CreatePaymentCmd::received(customer.id, cents(2500), date(2024, 3, 1)))
        .await
        .unwrap();
    let made = engine
        .create_payment(CreatePaymentCmd::made(vendor.id, cents(4000), date(2024, 3, 2)))
        .await
        .unwrap();

    let report = engine.list_ledger(&LedgerFilter::default()).await.unwrap();
    assert_eq!(report.entries.len(), 4);

    for (payment, entry_type) in [
        (&received.payment, LedgerEntryType::PaymentReceived),
        (&made.payment, LedgerEntryType::PaymentMade),
    ] {
        let rows: Vec<_> = report
            .entries
            .iter()
            .filter(|row| row.entry.payment_id == Some(payment.id))
            .collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.entry.entry_type == entry_type));
        assert!(
            rows.iter()
                .all(|row| row.payment_number.as_deref() == Some(payment.payment_number.as_str()))
        );
        let debit: MoneyCents = rows.iter().map(|row| row.entry.debit_amount).sum();
        let credit: MoneyCents = rows.iter().map(|row| row.entry.credit_amount).sum();
        assert_eq!(debit, payment.amount);
        assert_eq!(credit, payment.amount);
        let net: MoneyCents = rows.iter().map(|row| row.entry.net()).sum();
        assert_eq!(net, cents(0));
    }

    assert_eq!(report.final_balance, cents(0));
    assert_eq!(
        engine.supplier(vendor.id).await.unwrap().outstanding_balance,
        cents(-4000)
    );
}

#[tokio::test]
async fn payment_side_must_match_counterparty() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let err = engine
        .create_payment(
            CreatePaymentCmd::new(PaymentType::Made, cents(100), date(2024, 3, 1))
                .customer_id(customer.id),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = engine
        .create_payment(CreatePaymentCmd::received(customer.id, cents(0), date(2024, 3, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = engine
        .create_payment(CreatePaymentCmd::received(
            uuid::Uuid::new_v4(),
            cents(100),
            date(2024, 3, 1),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = engine
        .create_payment(
            CreatePaymentCmd::received(customer.id, cents(100), date(2024, 3, 1))
                .invoice_id(uuid::Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let report = engine.list_ledger(&LedgerFilter::default()).await.unwrap();
    assert!(report.entries.is_empty());
    assert_eq!(
        engine.customer(customer.id).await.unwrap().outstanding_balance,
        cents(0)
    );
}

#[tokio::test]
async fn duplicate_payment_number_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    engine
        .create_payment(
            CreatePaymentCmd::received(customer.id, cents(100), date(2024, 3, 1))
                .payment_number("PAY-MANUAL"),
        )
        .await
        .unwrap();
    let err = engine
        .create_payment(
            CreatePaymentCmd::received(customer.id, cents(100), date(2024, 3, 1))
                .payment_number("PAY-MANUAL"),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("PAY-MANUAL".to_string()));

    // Two generated numbers never collide, even within the same second.
    let first = engine
        .create_payment(CreatePaymentCmd::received(customer.id, cents(100), date(2024, 3, 1)))
        .await
        .unwrap();
    let second = engine
        .create_payment(CreatePaymentCmd::received(customer.id, cents(100), date(2024, 3, 1)))
        .await
        .unwrap();
    assert_ne!(first.payment.payment_number, second.payment.payment_number);
}

#[tokio::test]
async fn amount_change_reposts_payment() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let detail = engine
        .create_payment(CreatePaymentCmd::received(customer.id, cents(3000), date(2024, 3, 1)))
        .await
        .unwrap();
    let updated = engine
        .update_payment(
            UpdatePaymentCmd::new(detail.payment.id)
                .amount(cents(4500))
                .payment_date(date(2024, 3, 4)),
        )
        .await
        .unwrap();
    assert_eq!(updated.payment.amount, cents(4500));
    assert_eq!(
        engine.customer(customer.id).await.unwrap().outstanding_balance,
        cents(-4500)
    );

    let report = engine.list_ledger(&LedgerFilter::default()).await.unwrap();
    assert_eq!(report.entries.len(), 2);
    assert!(
        report
            .entries
            .iter()
            .all(|row| row.entry.entry_date == date(2024, 3, 4))
    );
    assert!(
        report
            .entries
            .iter()
            .any(|row| row.entry.debit_amount == cents(4500))
    );
}

#[tokio::test]
async fn failed_repost_keeps_the_original_posting() {
    let (engine, _db) = engine_with_db().await;
    let customer = engine
        .create_customer(
            NewCustomer::new("Deep Credit").outstanding_balance(MoneyCents::new(i64::MIN + 100)),
        )
        .await
        .unwrap();
    let detail = engine
        .create_payment(CreatePaymentCmd::received(customer.id, cents(50), date(2024, 3, 1)))
        .await
        .unwrap();
    let balance = engine.customer(customer.id).await.unwrap().outstanding_balance;
    assert_eq!(balance, MoneyCents::new(i64::MIN + 50));

    // The old posting is reversed before the new amount overflows the balance.
    let err = engine
        .update_payment(UpdatePaymentCmd::new(detail.payment.id).amount(cents(200)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert_eq!(
        engine.customer(customer.id).await.unwrap().outstanding_balance,
        balance
    );
    assert_eq!(
        engine.payment(detail.payment.id).await.unwrap().payment.amount,
        cents(50)
    );
    let report = engine.list_ledger(&LedgerFilter::default()).await.unwrap();
    assert_eq!(report.entries.len(), 2);
    assert!(
        report
            .entries
            .iter()
            .all(|row| row.entry.debit_amount == cents(50) || row.entry.credit_amount == cents(50))
    );
}

#[tokio::test]
async fn counterparty_change_moves_balance_between_customers() {
    let (engine, _db) = engine_with_db().await;
    let first = retail_customer(&engine).await;
    let second = engine
        .create_customer(NewCustomer::new("Lakshmi Stores"))
        .await
        .unwrap();

    let detail = engine
        .create_payment(CreatePaymentCmd::received(first.id, cents(1000), date(2024, 3, 1)))
        .await
        .unwrap();
    let updated = engine
        .update_payment(UpdatePaymentCmd::new(detail.payment.id).customer_id(second.id))
        .await
        .unwrap();
    assert_eq!(updated.counterparty_name.as_deref(), Some("Lakshmi Stores"));

    assert_eq!(
        engine.customer(first.id).await.unwrap().outstanding_balance,
        cents(0)
    );
    assert_eq!(
        engine.customer(second.id).await.unwrap().outstanding_balance,
        cents(-1000)
    );

    let report = engine
        .list_ledger(&LedgerFilter {
            customer_id: Some(second.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(report.entries.len(), 2);

    let vendor = supplier(&engine).await;
    let err = engine
        .update_payment(UpdatePaymentCmd::new(detail.payment.id).supplier_id(vendor.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn metadata_change_does_not_repost() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let detail = engine
        .create_payment(CreatePaymentCmd::received(customer.id, cents(1000), date(2024, 3, 1)))
        .await
        .unwrap();
    let before = engine.list_ledger(&LedgerFilter::default()).await.unwrap();

    let updated = engine
        .update_payment(
            UpdatePaymentCmd::new(detail.payment.id)
                .payment_method(PaymentMethod::Cheque)
                .notes("cleared"),
        )
        .await
        .unwrap();
    assert_eq!(updated.payment.payment_method, PaymentMethod::Cheque);
    assert_eq!(updated.payment.notes.as_deref(), Some("cleared"));

    let after = engine.list_ledger(&LedgerFilter::default()).await.unwrap();
    let ids = |report: &engine::LedgerReport| {
        report
            .entries
            .iter()
            .map(|row| row.entry.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&before), ids(&after));
    assert_eq!(
        engine.customer(customer.id).await.unwrap().outstanding_balance,
        cents(-1000)
    );
}

#[tokio::test]
async fn invoice_link_is_informational() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let invoice = engine
        .create_invoice(
            CreateInvoiceCmd::sales(customer.id, date(2024, 3, 1))
                .line(LineItemInput::free_text("Service", 1, cents(10000))),
        )
        .await
        .unwrap();
    let detail = engine
        .create_payment(
            CreatePaymentCmd::received(customer.id, cents(4000), date(2024, 3, 2))
                .invoice_id(invoice.invoice.id),
        )
        .await
        .unwrap();
    assert_eq!(
        detail.invoice_number.as_deref(),
        Some(invoice.invoice.invoice_number.as_str())
    );

    let current = engine.invoice(invoice.invoice.id).await.unwrap();
    assert_eq!(current.invoice.paid_amount, cents(0));

    let linked = engine
        .list_payments(&PaymentListFilter {
            invoice_id: Some(invoice.invoice.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(linked.len(), 1);

    let report = engine.list_ledger(&LedgerFilter::default()).await.unwrap();
    assert!(
        report
            .entries
            .iter()
            .all(|row| row.entry.invoice_id == Some(invoice.invoice.id))
    );
}

#[tokio::test]
async fn deleted_counterparty_is_tolerated() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;

    let detail = engine
        .create_payment(CreatePaymentCmd::received(customer.id, cents(1000), date(2024, 3, 1)))
        .await
        .unwrap();
    engine.delete_customer(customer.id).await.unwrap();

    let current = engine.payment(detail.payment.id).await.unwrap();
    assert_eq!(current.counterparty_name, None);

    let report = engine.list_ledger(&LedgerFilter::default()).await.unwrap();
    assert!(report.entries.iter().all(|row| row.customer_name.is_none()));

    engine.delete_payment(detail.payment.id).await.unwrap();
    let report = engine.list_ledger(&LedgerFilter::default()).await.unwrap();
    assert!(report.entries.is_empty());
}

#[tokio::test]
async fn payments_are_listed_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let customer = retail_customer(&engine).await;
    let vendor = supplier(&engine).await;

    for day in [3, 1, 2] {
        engine
            .create_payment(CreatePaymentCmd::received(customer.id, cents(100), date(2024, 3, day)))
            .await
            .unwrap();
    }
    engine
        .create_payment(CreatePaymentCmd::made(vendor.id, cents(100), date(2024, 3, 5)))
        .await
        .unwrap();

    let received = engine
        .list_payments(&PaymentListFilter {
            payment_type: Some(PaymentType::Received),
            ..Default::default()
        })
        .await
        .unwrap();
    let dates: Vec<_> = received.iter().map(|p| p.payment.payment_date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 3, 3), date(2024, 3, 2), date(2024, 3, 1)]
    );

    let window = engine
        .list_payments(&PaymentListFilter {
            from: Some(date(2024, 3, 2)),
            to: Some(date(2024, 3, 3)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(window.len(), 2);

    engine
        .create_payment(
            CreatePaymentCmd::received(customer.id, cents(100), date(2024, 3, 4))
                .status(PaymentStatus::Pending),
        )
        .await
        .unwrap();
    let pending = engine
        .list_payments(&PaymentListFilter {
            status: Some(PaymentStatus::Pending),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].payment.payment_date, date(2024, 3, 4));
    let completed = engine
        .list_payments(&PaymentListFilter {
            status: Some(PaymentStatus::Completed),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(completed.len(), 4);

    let err = engine
        .list_payments(&PaymentListFilter {
            from: Some(date(2024, 3, 3)),
            to: Some(date(2024, 3, 2)),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
