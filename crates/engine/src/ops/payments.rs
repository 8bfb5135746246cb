use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{ActiveValue, ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Counterparty, CreatePaymentCmd, EngineError, MoneyCents, Payment, PaymentListFilter,
    PaymentType, ResultEngine, UpdatePaymentCmd, customers, invoices,
    ledger::{self, NewLedgerEntry},
    payments, suppliers,
    util::{apply_optional_text_patch, ensure_positive, normalize_optional_text},
};

use super::{
    Engine,
    invoices::require_invoice,
    numbering::{next_payment_number, payment_number_taken},
    parties::{PartyNames, require_customer, require_supplier},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub payment: Payment,
    /// Absent when the counterparty row is gone.
    pub counterparty_name: Option<String>,
    pub invoice_number: Option<String>,
}

fn resolve_counterparty(
    payment_type: PaymentType,
    customer_id: Option<Uuid>,
    supplier_id: Option<Uuid>,
) -> ResultEngine<Counterparty> {
    match (payment_type, customer_id, supplier_id) {
        (PaymentType::Received, Some(id), None) => Ok(Counterparty::Customer(id)),
        (PaymentType::Made, None, Some(id)) => Ok(Counterparty::Supplier(id)),
        (PaymentType::Received, _, _) => Err(EngineError::Validation(
            "received payments need a customer_id and no supplier_id".to_string(),
        )),
        (PaymentType::Made, _, _) => Err(EngineError::Validation(
            "made payments need a supplier_id and no customer_id".to_string(),
        )),
    }
}

/// Returns the counterparty's display name, or `KeyNotFound` if it is gone.
async fn require_party_name(
    db_tx: &DatabaseTransaction,
    counterparty: Counterparty,
) -> ResultEngine<String> {
    Ok(match counterparty {
        Counterparty::Customer(id) => require_customer(db_tx, id).await?.name,
        Counterparty::Supplier(id) => require_supplier(db_tx, id).await?.name,
    })
}

/// The two entries posted for a payment: one debit and one equal credit.
fn ledger_postings(payment: &Payment, party_name: Option<&str>) -> [NewLedgerEntry; 2] {
    let description = match (payment.payment_type, party_name) {
        (PaymentType::Received, Some(name)) => {
            format!("Payment {} received from {name}", payment.payment_number)
        }
        (PaymentType::Made, Some(name)) => {
            format!("Payment {} made to {name}", payment.payment_number)
        }
        (payment_type, None) => format!(
            "Payment {} {}",
            payment.payment_number,
            payment_type.as_str()
        ),
    };
    let entry = |debit: MoneyCents, credit: MoneyCents| NewLedgerEntry {
        entry_date: payment.payment_date,
        description: description.clone(),
        debit_amount: debit,
        credit_amount: credit,
        customer_id: payment.counterparty.customer_id(),
        supplier_id: payment.counterparty.supplier_id(),
        invoice_id: payment.invoice_id,
        payment_id: Some(payment.id),
        entry_type: payment.payment_type.ledger_entry_type(),
    };
    [
        entry(payment.amount, MoneyCents::ZERO),
        entry(MoneyCents::ZERO, payment.amount),
    ]
}

async fn post_payment(
    db_tx: &DatabaseTransaction,
    payment: &Payment,
    party_name: Option<&str>,
) -> ResultEngine<()> {
    let now = Utc::now();
    for posting in ledger_postings(payment, party_name) {
        posting.into_active_model(now).insert(db_tx).await?;
    }
    tracing::debug!(
        payment_number = %payment.payment_number,
        amount = %payment.amount,
        "payment posted to ledger"
    );
    Ok(())
}

async fn unpost_payment(db_tx: &DatabaseTransaction, payment_id: Uuid) -> ResultEngine<()> {
    ledger::Entity::delete_many()
        .filter(ledger::Column::PaymentId.eq(payment_id.to_string()))
        .exec(db_tx)
        .await?;
    Ok(())
}

/// Moves a counterparty's outstanding balance by `delta`.
///
/// Returns `false` when the counterparty row no longer exists.
async fn shift_outstanding(
    db_tx: &DatabaseTransaction,
    counterparty: Counterparty,
    delta: MoneyCents,
) -> ResultEngine<bool> {
    let overflow = || EngineError::InvalidAmount("outstanding balance too large".to_string());
    let now = Utc::now();
    match counterparty {
        Counterparty::Customer(id) => {
            let Some(model) = customers::Entity::find_by_id(id.to_string()).one(db_tx).await?
            else {
                return Ok(false);
            };
            let balance = model
                .outstanding_balance_minor
                .checked_add(delta.cents())
                .ok_or_else(overflow)?;
            customers::ActiveModel {
                id: ActiveValue::Set(model.id),
                outstanding_balance_minor: ActiveValue::Set(balance),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .update(db_tx)
            .await?;
        }
        Counterparty::Supplier(id) => {
            let Some(model) = suppliers::Entity::find_by_id(id.to_string()).one(db_tx).await?
            else {
                return Ok(false);
            };
            let balance = model
                .outstanding_balance_minor
                .checked_add(delta.cents())
                .ok_or_else(overflow)?;
            suppliers::ActiveModel {
                id: ActiveValue::Set(model.id),
                outstanding_balance_minor: ActiveValue::Set(balance),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .update(db_tx)
            .await?;
        }
    }
    Ok(true)
}

/// Undoes a payment's ledger entries and balance effect.
async fn reverse_payment(db_tx: &DatabaseTransaction, payment: &Payment) -> ResultEngine<()> {
    unpost_payment(db_tx, payment.id).await?;
    if !shift_outstanding(db_tx, payment.counterparty, payment.amount).await? {
        tracing::debug!(
            payment_number = %payment.payment_number,
            "{} of payment is gone, balance not restored",
            payment.counterparty.label()
        );
    }
    Ok(())
}

async fn require_payment<C: ConnectionTrait>(db: &C, payment_id: Uuid) -> ResultEngine<Payment> {
    let model = payments::Entity::find_by_id(payment_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("payment not exists".to_string()))?;
    Payment::try_from(model)
}

async fn hydrate_payments<C: ConnectionTrait>(
    db: &C,
    payments: Vec<Payment>,
) -> ResultEngine<Vec<PaymentDetail>> {
    let names = PartyNames::load(db, payments.iter().map(|p| p.counterparty)).await?;
    let invoice_ids: Vec<String> = payments
        .iter()
        .filter_map(|p| p.invoice_id)
        .map(|id| id.to_string())
        .collect();
    let invoice_numbers: std::collections::HashMap<String, String> = if invoice_ids.is_empty() {
        Default::default()
    } else {
        invoices::Entity::find()
            .filter(invoices::Column::Id.is_in(invoice_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.invoice_number))
            .collect()
    };

    Ok(payments
        .into_iter()
        .map(|payment| PaymentDetail {
            counterparty_name: names.name_of(payment.counterparty),
            invoice_number: payment
                .invoice_id
                .and_then(|id| invoice_numbers.get(&id.to_string()).cloned()),
            payment,
        })
        .collect())
}

async fn payment_detail<C: ConnectionTrait>(db: &C, payment_id: Uuid) -> ResultEngine<PaymentDetail> {
    let payment = require_payment(db, payment_id).await?;
    hydrate_payments(db, vec![payment])
        .await?
        .pop()
        .ok_or_else(|| EngineError::KeyNotFound("payment not exists".to_string()))
}

impl Engine {
    /// Records a payment, posts its two ledger entries and decreases the
    /// counterparty's outstanding balance, as one unit.
    ///
    /// A linked invoice is informational: its paid amount does not change.
    pub async fn create_payment(&self, cmd: CreatePaymentCmd) -> ResultEngine<PaymentDetail> {
        ensure_positive(cmd.amount, "payment amount")?;
        let counterparty = resolve_counterparty(cmd.payment_type, cmd.customer_id, cmd.supplier_id)?;
        let payment_number = normalize_optional_text(cmd.payment_number.as_deref());

        self.with_tx(|_engine, db_tx| {
            Box::pin(async move {
                let now = Utc::now();
                let party_name = require_party_name(db_tx, counterparty).await?;
                if let Some(invoice_id) = cmd.invoice_id {
                    require_invoice(db_tx, invoice_id).await?;
                }

                let payment_number = match payment_number {
                    Some(number) => {
                        if payment_number_taken(db_tx, number.clone()).await? {
                            return Err(EngineError::ExistingKey(number));
                        }
                        number
                    }
                    None => next_payment_number(db_tx, now).await?,
                };

                let payment = Payment {
                    id: Uuid::new_v4(),
                    payment_number,
                    payment_date: cmd.payment_date,
                    amount: cmd.amount,
                    payment_method: cmd.payment_method,
                    reference_number: normalize_optional_text(cmd.reference_number.as_deref()),
                    notes: normalize_optional_text(cmd.notes.as_deref()),
                    payment_type: cmd.payment_type,
                    counterparty,
                    invoice_id: cmd.invoice_id,
                    status: cmd.status,
                    created_at: now,
                    updated_at: now,
                };
                let model: payments::ActiveModel = (&payment).into();
                model.insert(db_tx).await?;

                post_payment(db_tx, &payment, Some(&party_name)).await?;
                shift_outstanding(db_tx, counterparty, -payment.amount).await?;

                payment_detail(db_tx, payment.id).await
            })
        })
        .await
    }

    /// Patches a payment. When the amount, counterparty or date changes, the
    /// old ledger entries and balance effect are reversed and re-posted with
    /// the new values.
    pub async fn update_payment(&self, cmd: UpdatePaymentCmd) -> ResultEngine<PaymentDetail> {
        if let Some(amount) = cmd.amount {
            ensure_positive(amount, "payment amount")?;
        }

        self.with_tx(|_engine, db_tx| {
            Box::pin(async move {
                let old = require_payment(db_tx, cmd.payment_id).await?;
                let mut payment = old.clone();

                match (payment.payment_type, cmd.customer_id, cmd.supplier_id) {
                    (_, None, None) => {}
                    (PaymentType::Received, Some(customer_id), None) => {
                        payment.counterparty = Counterparty::Customer(customer_id);
                    }
                    (PaymentType::Made, None, Some(supplier_id)) => {
                        payment.counterparty = Counterparty::Supplier(supplier_id);
                    }
                    (payment_type, _, _) => {
                        return Err(EngineError::Validation(format!(
                            "counterparty does not match a {} payment",
                            payment_type.as_str()
                        )));
                    }
                }
                if let Some(amount) = cmd.amount {
                    payment.amount = amount;
                }
                if let Some(date) = cmd.payment_date {
                    payment.payment_date = date;
                }
                if let Some(method) = cmd.payment_method {
                    payment.payment_method = method;
                }
                if let Some(status) = cmd.status {
                    payment.status = status;
                }
                payment.reference_number = apply_optional_text_patch(
                    payment.reference_number,
                    cmd.reference_number.as_deref(),
                );
                payment.notes = apply_optional_text_patch(payment.notes, cmd.notes.as_deref());
                payment.updated_at = Utc::now();

                let repost = payment.amount != old.amount
                    || payment.counterparty != old.counterparty
                    || payment.payment_date != old.payment_date;
                if repost {
                    let party_name = if payment.counterparty == old.counterparty {
                        PartyNames::load(db_tx, [payment.counterparty])
                            .await?
                            .name_of(payment.counterparty)
                    } else {
                        Some(require_party_name(db_tx, payment.counterparty).await?)
                    };

                    reverse_payment(db_tx, &old).await?;
                    post_payment(db_tx, &payment, party_name.as_deref()).await?;
                    if !shift_outstanding(db_tx, payment.counterparty, -payment.amount).await? {
                        tracing::debug!(
                            payment_number = %payment.payment_number,
                            "{} of payment is gone, balance not moved",
                            payment.counterparty.label()
                        );
                    }
                }

                let model: payments::ActiveModel = (&payment).into();
                model.update(db_tx).await?;
                payment_detail(db_tx, payment.id).await
            })
        })
        .await
    }

    /// Deletes a payment after reversing its ledger entries and balance
    /// effect.
    pub async fn delete_payment(&self, payment_id: Uuid) -> ResultEngine<()> {
        self.with_tx(|_engine, db_tx| {
            Box::pin(async move {
                let payment = require_payment(db_tx, payment_id).await?;
                reverse_payment(db_tx, &payment).await?;
                payments::Entity::delete_by_id(payment.id.to_string())
                    .exec(db_tx)
                    .await?;
                tracing::debug!(payment_number = %payment.payment_number, "payment deleted");
                Ok(())
            })
        })
        .await
    }

    pub async fn payment(&self, payment_id: Uuid) -> ResultEngine<PaymentDetail> {
        payment_detail(&self.database, payment_id).await
    }

    /// Lists payments, newest payment date first.
    pub async fn list_payments(&self, filter: &PaymentListFilter) -> ResultEngine<Vec<PaymentDetail>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to)
            && from > to
        {
            return Err(EngineError::Validation(
                "invalid range: from must be <= to".to_string(),
            ));
        }

        let mut query = payments::Entity::find();
        if let Some(payment_type) = filter.payment_type {
            query = query.filter(payments::Column::PaymentType.eq(payment_type.as_str()));
        }
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(payments::Column::CustomerId.eq(customer_id.to_string()));
        }
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(payments::Column::SupplierId.eq(supplier_id.to_string()));
        }
        if let Some(invoice_id) = filter.invoice_id {
            query = query.filter(payments::Column::InvoiceId.eq(invoice_id.to_string()));
        }
        if let Some(status) = filter.status {
            query = query.filter(payments::Column::Status.eq(status.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(payments::Column::PaymentDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(payments::Column::PaymentDate.lte(to));
        }

        let payments = query
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Payment::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        hydrate_payments(&self.database, payments).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{LedgerEntryType, PaymentMethod, PaymentStatus};

    use super::*;

    fn payment(payment_type: PaymentType, counterparty: Counterparty) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            payment_number: "PAY-1".to_string(),
            payment_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            amount: MoneyCents::new(25_00),
            payment_method: PaymentMethod::Upi,
            reference_number: None,
            notes: None,
            payment_type,
            counterparty,
            invoice_id: Some(Uuid::new_v4()),
            status: PaymentStatus::Completed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn postings_are_one_debit_and_one_equal_credit() {
        let customer = Uuid::new_v4();
        let payment = payment(PaymentType::Received, Counterparty::Customer(customer));
        let [debit, credit] = ledger_postings(&payment, Some("Asha"));

        assert_eq!(debit.debit_amount, payment.amount);
        assert_eq!(debit.credit_amount, MoneyCents::ZERO);
        assert_eq!(credit.debit_amount, MoneyCents::ZERO);
        assert_eq!(credit.credit_amount, payment.amount);
        for entry in [&debit, &credit] {
            assert_eq!(entry.entry_type, LedgerEntryType::PaymentReceived);
            assert_eq!(entry.payment_id, Some(payment.id));
            assert_eq!(entry.invoice_id, payment.invoice_id);
            assert_eq!(entry.customer_id, Some(customer));
            assert_eq!(entry.supplier_id, None);
        }
        assert_eq!(debit.description, "Payment PAY-1 received from Asha");
    }

    #[test]
    fn made_payments_post_against_the_supplier() {
        let supplier = Uuid::new_v4();
        let payment = payment(PaymentType::Made, Counterparty::Supplier(supplier));
        let [debit, _] = ledger_postings(&payment, None);
        assert_eq!(debit.entry_type, LedgerEntryType::PaymentMade);
        assert_eq!(debit.supplier_id, Some(supplier));
        assert_eq!(debit.description, "Payment PAY-1 made");
    }

    #[test]
    fn payment_side_must_match_counterparty() {
        let id = Uuid::new_v4();
        assert!(resolve_counterparty(PaymentType::Received, None, Some(id)).is_err());
        assert!(resolve_counterparty(PaymentType::Made, Some(id), Some(id)).is_err());
        assert_eq!(
            resolve_counterparty(PaymentType::Made, None, Some(id)).unwrap(),
            Counterparty::Supplier(id)
        );
    }
}
