use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    Counterparty, EngineError, LedgerEntry, LedgerFilter, MoneyCents, ResultEngine, customers,
    invoices, ledger, payments, running_balances, suppliers, util::parse_uuid,
};

use super::{Engine, parties::PartyNames};

/// A ledger entry with its running balance and resolved references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub entry: LedgerEntry,
    pub running_balance: MoneyCents,
    pub customer_name: Option<String>,
    pub supplier_name: Option<String>,
    pub invoice_number: Option<String>,
    pub payment_number: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReport {
    /// Newest first.
    pub entries: Vec<LedgerRow>,
    /// Running balance after the most recent entry.
    pub final_balance: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyBalance {
    pub id: Uuid,
    pub name: String,
    pub outstanding_balance: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub customers: Vec<CounterpartyBalance>,
    pub suppliers: Vec<CounterpartyBalance>,
    /// Sum of customer balances.
    pub total_receivable: MoneyCents,
    /// Sum of supplier balances.
    pub total_payable: MoneyCents,
}

fn validate_ledger_filter(filter: &LedgerFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::Validation(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Lists ledger entries newest first, each with the running balance
    /// accumulated oldest first over the filtered set.
    pub async fn list_ledger(&self, filter: &LedgerFilter) -> ResultEngine<LedgerReport> {
        validate_ledger_filter(filter)?;

        let mut query = ledger::Entity::find();
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(ledger::Column::CustomerId.eq(customer_id.to_string()));
        }
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(ledger::Column::SupplierId.eq(supplier_id.to_string()));
        }
        if let Some(entry_type) = filter.entry_type {
            query = query.filter(ledger::Column::EntryType.eq(entry_type.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(ledger::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(ledger::Column::EntryDate.lte(to));
        }

        let entries = query
            .order_by_desc(ledger::Column::EntryDate)
            .order_by_desc(ledger::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(LedgerEntry::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let balances = running_balances(&entries);
        let final_balance = balances.first().copied().unwrap_or(MoneyCents::ZERO);

        let parties = entries.iter().flat_map(|entry| {
            entry
                .customer_id
                .map(Counterparty::Customer)
                .into_iter()
                .chain(entry.supplier_id.map(Counterparty::Supplier))
        });
        let names = PartyNames::load(&self.database, parties).await?;

        let invoice_ids: BTreeSet<String> = entries
            .iter()
            .filter_map(|e| e.invoice_id)
            .map(|id| id.to_string())
            .collect();
        let invoice_numbers: HashMap<String, String> = if invoice_ids.is_empty() {
            HashMap::new()
        } else {
            invoices::Entity::find()
                .filter(invoices::Column::Id.is_in(invoice_ids))
                .all(&self.database)
                .await?
                .into_iter()
                .map(|m| (m.id, m.invoice_number))
                .collect()
        };

        let payment_ids: BTreeSet<String> = entries
            .iter()
            .filter_map(|e| e.payment_id)
            .map(|id| id.to_string())
            .collect();
        let payment_numbers: HashMap<String, String> = if payment_ids.is_empty() {
            HashMap::new()
        } else {
            payments::Entity::find()
                .filter(payments::Column::Id.is_in(payment_ids))
                .all(&self.database)
                .await?
                .into_iter()
                .map(|m| (m.id, m.payment_number))
                .collect()
        };

        let entries = entries
            .into_iter()
            .zip(balances)
            .map(|(entry, running_balance)| LedgerRow {
                customer_name: entry
                    .customer_id
                    .and_then(|id| names.name_of(Counterparty::Customer(id))),
                supplier_name: entry
                    .supplier_id
                    .and_then(|id| names.name_of(Counterparty::Supplier(id))),
                invoice_number: entry
                    .invoice_id
                    .and_then(|id| invoice_numbers.get(&id.to_string()).cloned()),
                payment_number: entry
                    .payment_id
                    .and_then(|id| payment_numbers.get(&id.to_string()).cloned()),
                running_balance,
                entry,
            })
            .collect();

        Ok(LedgerReport {
            entries,
            final_balance,
        })
    }

    /// Every customer and supplier with its outstanding balance, by name.
    pub async fn balances(&self) -> ResultEngine<Balances> {
        let customers: Vec<CounterpartyBalance> = customers::Entity::find()
            .order_by_asc(customers::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|m| {
                parse_uuid(&m.id, "customer").map(|id| CounterpartyBalance {
                    id,
                    name: m.name,
                    outstanding_balance: MoneyCents::new(m.outstanding_balance_minor),
                })
            })
            .collect::<ResultEngine<_>>()?;
        let suppliers: Vec<CounterpartyBalance> = suppliers::Entity::find()
            .order_by_asc(suppliers::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|m| {
                parse_uuid(&m.id, "supplier").map(|id| CounterpartyBalance {
                    id,
                    name: m.name,
                    outstanding_balance: MoneyCents::new(m.outstanding_balance_minor),
                })
            })
            .collect::<ResultEngine<_>>()?;

        Ok(Balances {
            total_receivable: customers.iter().map(|c| c.outstanding_balance).sum(),
            total_payable: suppliers.iter().map(|s| s.outstanding_balance).sum(),
            customers,
            suppliers,
        })
    }
}
