use chrono::Utc;
use uuid::Uuid;

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{
    Counterparty, CreateInvoiceCmd, CustomerType, EngineError, Invoice, InvoiceStatus,
    InvoiceType, LineAmounts, LineItem, LineItemInput, MoneyCents, ResultEngine, TaxRate,
    UpdateInvoiceCmd, calculate_totals, invoices, line_items,
    util::{apply_optional_text_patch, ensure_not_negative, ensure_positive, normalize_optional_text},
};

use super::super::{
    Engine,
    numbering::{invoice_number_taken, next_invoice_number},
    parties::{require_customer, require_supplier},
    products::require_product,
};
use super::{InvoiceDetail, invoice_detail, invoice_lines, require_invoice};

fn resolve_counterparty(
    invoice_type: InvoiceType,
    customer_id: Option<Uuid>,
    supplier_id: Option<Uuid>,
) -> ResultEngine<Counterparty> {
    match (invoice_type, customer_id, supplier_id) {
        (InvoiceType::Sales, Some(id), None) => Ok(Counterparty::Customer(id)),
        (InvoiceType::Purchase, None, Some(id)) => Ok(Counterparty::Supplier(id)),
        (InvoiceType::Sales, _, Some(_)) => Err(EngineError::Validation(
            "sales invoice must not reference a supplier".to_string(),
        )),
        (InvoiceType::Purchase, Some(_), _) => Err(EngineError::Validation(
            "purchase invoice must not reference a customer".to_string(),
        )),
        (InvoiceType::Sales, None, None) => Err(EngineError::Validation(
            "customer_id is required for sales invoices".to_string(),
        )),
        (InvoiceType::Purchase, None, None) => Err(EngineError::Validation(
            "supplier_id is required for purchase invoices".to_string(),
        )),
    }
}

fn validate_manual_status(status: Option<InvoiceStatus>) -> ResultEngine<()> {
    match status {
        Some(status) if !status.is_manual() => Err(EngineError::Validation(format!(
            "status {} cannot be set directly",
            status.as_str()
        ))),
        _ => Ok(()),
    }
}

fn validate_line_inputs(lines: &[LineItemInput]) -> ResultEngine<()> {
    for (idx, line) in lines.iter().enumerate() {
        let position = idx + 1;
        if line.quantity <= 0 {
            return Err(EngineError::Validation(format!(
                "line {position}: quantity must be > 0"
            )));
        }
        if let Some(price) = line.unit_price {
            ensure_not_negative(price, &format!("line {position}: unit_price"))?;
        }
        if line.tax_rate.is_some_and(|rate| rate.is_negative()) {
            return Err(EngineError::InvalidAmount(format!(
                "line {position}: tax_rate must be >= 0"
            )));
        }
        if line.product_id.is_none() && normalize_optional_text(line.item_name.as_deref()).is_none()
        {
            return Err(EngineError::Validation(format!(
                "line {position}: item_name is required without a product"
            )));
        }
    }
    Ok(())
}

/// Checks that the counterparty exists and returns the customer's pricing tier.
async fn require_counterparty(
    db_tx: &DatabaseTransaction,
    counterparty: Counterparty,
) -> ResultEngine<Option<CustomerType>> {
    match counterparty {
        Counterparty::Customer(id) => Ok(Some(require_customer(db_tx, id).await?.customer_type)),
        Counterparty::Supplier(id) => {
            require_supplier(db_tx, id).await?;
            Ok(None)
        }
    }
}

/// Pricing tier of the invoice's current customer. A customer that no longer
/// exists prices at the retail tier.
async fn current_customer_type(
    db_tx: &DatabaseTransaction,
    counterparty: Counterparty,
) -> ResultEngine<Option<CustomerType>> {
    match counterparty {
        Counterparty::Customer(id) => match require_customer(db_tx, id).await {
            Ok(customer) => Ok(Some(customer.customer_type)),
            Err(EngineError::KeyNotFound(_)) => {
                tracing::debug!(customer_id = %id, "invoice customer no longer exists");
                Ok(None)
            }
            Err(err) => Err(err),
        },
        Counterparty::Supplier(_) => Ok(None),
    }
}

/// Turns requested lines into stored lines, defaulting names, prices and
/// tax rates from the referenced products.
async fn build_lines(
    db_tx: &DatabaseTransaction,
    invoice_id: Uuid,
    invoice_type: InvoiceType,
    customer_type: Option<CustomerType>,
    inputs: &[LineItemInput],
) -> ResultEngine<Vec<LineItem>> {
    let mut lines = Vec::with_capacity(inputs.len());
    for (idx, input) in inputs.iter().enumerate() {
        let (item_name, item_description, default_price, default_tax) = match input.product_id {
            Some(product_id) => {
                let product = require_product(db_tx, product_id).await?;
                let price = match (invoice_type, customer_type) {
                    (InvoiceType::Purchase, _) => product.cost_price,
                    (InvoiceType::Sales, Some(CustomerType::Wholesale)) => product.wholesale_price,
                    (InvoiceType::Sales, _) => product.retail_price,
                };
                let description = normalize_optional_text(input.item_description.as_deref())
                    .or(product.description);
                (product.name, description, price, product.tax_rate)
            }
            None => (
                normalize_optional_text(input.item_name.as_deref()).unwrap_or_default(),
                normalize_optional_text(input.item_description.as_deref()),
                MoneyCents::ZERO,
                TaxRate::ZERO,
            ),
        };

        let unit_price = input.unit_price.unwrap_or(default_price);
        let tax_rate = input.tax_rate.unwrap_or(default_tax);
        let amounts = LineAmounts::compute(input.quantity, unit_price, tax_rate)?;
        let position = i32::try_from(idx + 1)
            .map_err(|_| EngineError::Validation("too many line items".to_string()))?;

        lines.push(LineItem {
            id: Uuid::new_v4(),
            invoice_id,
            position,
            product_id: input.product_id,
            item_name,
            item_description,
            quantity: input.quantity,
            unit_price,
            tax_rate,
            amounts,
        });
    }
    Ok(lines)
}

async fn insert_lines(db_tx: &DatabaseTransaction, lines: &[LineItem]) -> ResultEngine<()> {
    for line in lines {
        let model: line_items::ActiveModel = line.into();
        model.insert(db_tx).await?;
    }
    Ok(())
}

fn stock_effects(lines: &[LineItem]) -> Vec<(Uuid, i64)> {
    lines.iter().filter_map(LineItem::stock_effect).collect()
}

impl Engine {
    /// Creates an invoice with its lines and applies its stock effect
    /// (sales take stock out, purchases bring it in).
    pub async fn create_invoice(&self, cmd: CreateInvoiceCmd) -> ResultEngine<InvoiceDetail> {
        let counterparty = resolve_counterparty(cmd.invoice_type, cmd.customer_id, cmd.supplier_id)?;
        ensure_not_negative(cmd.discount_amount, "discount_amount")?;
        validate_manual_status(cmd.status)?;
        validate_line_inputs(&cmd.line_items)?;
        let invoice_number = normalize_optional_text(cmd.invoice_number.as_deref());

        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let now = Utc::now();
                let customer_type = require_counterparty(db_tx, counterparty).await?;

                let invoice_number = match invoice_number {
                    Some(number) => {
                        if invoice_number_taken(db_tx, number.clone()).await? {
                            return Err(EngineError::ExistingKey(number));
                        }
                        number
                    }
                    None => next_invoice_number(db_tx, cmd.invoice_type, now).await?,
                };

                let invoice_id = Uuid::new_v4();
                let lines = build_lines(
                    db_tx,
                    invoice_id,
                    cmd.invoice_type,
                    customer_type,
                    &cmd.line_items,
                )
                .await?;
                let totals =
                    calculate_totals(lines.iter().map(|l| &l.amounts), cmd.discount_amount)?;

                let mut invoice = Invoice {
                    id: invoice_id,
                    invoice_number,
                    invoice_type: cmd.invoice_type,
                    counterparty,
                    invoice_date: cmd.invoice_date,
                    due_date: cmd.due_date,
                    subtotal: MoneyCents::ZERO,
                    tax_amount: MoneyCents::ZERO,
                    discount_amount: MoneyCents::ZERO,
                    total_amount: MoneyCents::ZERO,
                    paid_amount: MoneyCents::ZERO,
                    status: cmd.status.unwrap_or(InvoiceStatus::Draft),
                    notes: normalize_optional_text(cmd.notes.as_deref()),
                    terms_conditions: normalize_optional_text(cmd.terms_conditions.as_deref()),
                    created_at: now,
                    updated_at: now,
                };
                invoice.set_totals(totals);

                let model: invoices::ActiveModel = (&invoice).into();
                model.insert(db_tx).await?;
                insert_lines(db_tx, &lines).await?;

                engine
                    .apply_stock_effects(
                        db_tx,
                        &stock_effects(&lines),
                        cmd.invoice_type.stock_direction(),
                        cmd.invoice_type.apply_reason(),
                        invoice_id,
                    )
                    .await?;

                tracing::debug!(
                    invoice_number = %invoice.invoice_number,
                    total = %invoice.total_amount,
                    "invoice created"
                );
                invoice_detail(db_tx, invoice_id).await
            })
        })
        .await
    }

    /// Updates an invoice header and, when lines are supplied, replaces them.
    ///
    /// Replacing lines reverses the stock effect of the old set in full and
    /// applies the new set in full.
    pub async fn update_invoice(&self, cmd: UpdateInvoiceCmd) -> ResultEngine<InvoiceDetail> {
        if let Some(discount) = cmd.discount_amount {
            ensure_not_negative(discount, "discount_amount")?;
        }
        validate_manual_status(cmd.status)?;
        if let Some(lines) = &cmd.line_items {
            validate_line_inputs(lines)?;
        }

        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let mut invoice = require_invoice(db_tx, cmd.invoice_id).await?;
                if invoice.status == InvoiceStatus::Cancelled {
                    return Err(EngineError::Consistency(format!(
                        "invoice {} is cancelled",
                        invoice.invoice_number
                    )));
                }

                if let Some(status) = cmd.status {
                    if invoice.paid_amount.is_positive() {
                        return Err(EngineError::Consistency(format!(
                            "invoice {} has payments; its status follows them",
                            invoice.invoice_number
                        )));
                    }
                    invoice.status = status;
                }

                match (invoice.invoice_type, cmd.customer_id, cmd.supplier_id) {
                    (_, None, None) => {}
                    (InvoiceType::Sales, Some(customer_id), None) => {
                        invoice.counterparty = Counterparty::Customer(customer_id);
                    }
                    (InvoiceType::Purchase, None, Some(supplier_id)) => {
                        invoice.counterparty = Counterparty::Supplier(supplier_id);
                    }
                    (invoice_type, _, _) => {
                        return Err(EngineError::Validation(format!(
                            "counterparty does not match a {} invoice",
                            invoice_type.as_str()
                        )));
                    }
                }
                let customer_type = if cmd.customer_id.is_some() || cmd.supplier_id.is_some() {
                    require_counterparty(db_tx, invoice.counterparty).await?
                } else {
                    current_customer_type(db_tx, invoice.counterparty).await?
                };

                if let Some(date) = cmd.invoice_date {
                    invoice.invoice_date = date;
                }
                if let Some(date) = cmd.due_date {
                    invoice.due_date = Some(date);
                }
                invoice.notes = apply_optional_text_patch(invoice.notes, cmd.notes.as_deref());
                invoice.terms_conditions = apply_optional_text_patch(
                    invoice.terms_conditions,
                    cmd.terms_conditions.as_deref(),
                );
                let discount = cmd.discount_amount.unwrap_or(invoice.discount_amount);

                let old_lines = invoice_lines(db_tx, invoice.id).await?;
                let totals = match &cmd.line_items {
                    Some(inputs) => {
                        let new_lines = build_lines(
                            db_tx,
                            invoice.id,
                            invoice.invoice_type,
                            customer_type,
                            inputs,
                        )
                        .await?;
                        let totals =
                            calculate_totals(new_lines.iter().map(|l| &l.amounts), discount)?;

                        line_items::Entity::delete_many()
                            .filter(line_items::Column::InvoiceId.eq(invoice.id.to_string()))
                            .exec(db_tx)
                            .await?;
                        insert_lines(db_tx, &new_lines).await?;

                        let direction = invoice.invoice_type.stock_direction();
                        engine
                            .apply_stock_effects(
                                db_tx,
                                &stock_effects(&old_lines),
                                -direction,
                                invoice.invoice_type.reversal_reason(),
                                invoice.id,
                            )
                            .await?;
                        engine
                            .apply_stock_effects(
                                db_tx,
                                &stock_effects(&new_lines),
                                direction,
                                invoice.invoice_type.apply_reason(),
                                invoice.id,
                            )
                            .await?;
                        totals
                    }
                    None => calculate_totals(old_lines.iter().map(|l| &l.amounts), discount)?,
                };
                invoice.set_totals(totals);

                if invoice.paid_amount > invoice.total_amount {
                    return Err(EngineError::Consistency(format!(
                        "invoice total {} would fall below the paid amount {}",
                        invoice.total_amount, invoice.paid_amount
                    )));
                }
                if let Some(status) =
                    InvoiceStatus::from_payments(invoice.paid_amount, invoice.total_amount)
                {
                    invoice.status = status;
                }
                invoice.updated_at = Utc::now();

                let model: invoices::ActiveModel = (&invoice).into();
                model.update(db_tx).await?;
                invoice_detail(db_tx, invoice.id).await
            })
        })
        .await
    }

    /// Cancels an invoice: reverses the stock effect of its lines and keeps
    /// the rows.
    pub async fn cancel_invoice(&self, invoice_id: Uuid) -> ResultEngine<InvoiceDetail> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let mut invoice = require_invoice(db_tx, invoice_id).await?;
                if invoice.status == InvoiceStatus::Cancelled {
                    return Err(EngineError::Consistency(format!(
                        "invoice {} is already cancelled",
                        invoice.invoice_number
                    )));
                }

                let lines = invoice_lines(db_tx, invoice_id).await?;
                engine
                    .apply_stock_effects(
                        db_tx,
                        &stock_effects(&lines),
                        -invoice.invoice_type.stock_direction(),
                        invoice.invoice_type.cancel_reason(),
                        invoice_id,
                    )
                    .await?;

                invoice.status = InvoiceStatus::Cancelled;
                invoice.updated_at = Utc::now();
                let model: invoices::ActiveModel = (&invoice).into();
                model.update(db_tx).await?;

                tracing::debug!(invoice_number = %invoice.invoice_number, "invoice cancelled");
                invoice_detail(db_tx, invoice_id).await
            })
        })
        .await
    }

    /// Records `amount` against an invoice's paid amount.
    ///
    /// This does not create a payment or touch the ledger; see
    /// [`Engine::create_payment`].
    pub async fn record_invoice_payment(
        &self,
        invoice_id: Uuid,
        amount: MoneyCents,
    ) -> ResultEngine<InvoiceDetail> {
        ensure_positive(amount, "payment amount")?;

        self.with_tx(|_engine, db_tx| {
            Box::pin(async move {
                let mut invoice = require_invoice(db_tx, invoice_id).await?;
                if invoice.status == InvoiceStatus::Cancelled {
                    return Err(EngineError::Consistency(format!(
                        "invoice {} is cancelled",
                        invoice.invoice_number
                    )));
                }

                let paid = invoice
                    .paid_amount
                    .checked_add(amount)
                    .ok_or_else(|| EngineError::InvalidAmount("payment too large".to_string()))?;
                if paid > invoice.total_amount {
                    return Err(EngineError::ExceedsOutstanding(format!(
                        "payment {amount} exceeds outstanding {}",
                        invoice.outstanding_amount()
                    )));
                }

                invoice.paid_amount = paid;
                if let Some(status) = InvoiceStatus::from_payments(paid, invoice.total_amount) {
                    invoice.status = status;
                }
                invoice.updated_at = Utc::now();
                let model: invoices::ActiveModel = (&invoice).into();
                model.update(db_tx).await?;
                invoice_detail(db_tx, invoice_id).await
            })
        })
        .await
    }
}
