//! Ledger entries and running balances.
//!
//! Entries are append-only. The only removal path is reversal of a payment,
//! which deletes every entry carrying that `payment_id` as one set.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents,
    util::{parse_soft_ref, soft_ref_string},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryType {
    Sale,
    Purchase,
    PaymentReceived,
    PaymentMade,
    Adjustment,
}

impl LedgerEntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::PaymentReceived => "payment_received",
            Self::PaymentMade => "payment_made",
            Self::Adjustment => "adjustment",
        }
    }
}

impl TryFrom<&str> for LedgerEntryType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "sale" => Ok(Self::Sale),
            "purchase" => Ok(Self::Purchase),
            "payment_received" => Ok(Self::PaymentReceived),
            "payment_made" => Ok(Self::PaymentMade),
            "adjustment" => Ok(Self::Adjustment),
            other => Err(EngineError::Validation(format!(
                "invalid ledger entry type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub entry_date: NaiveDate,
    pub description: String,
    pub debit_amount: MoneyCents,
    pub credit_amount: MoneyCents,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub entry_type: LedgerEntryType,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// `debit - credit`.
    #[must_use]
    pub fn net(&self) -> MoneyCents {
        self.debit_amount - self.credit_amount
    }
}

/// An entry not yet persisted; the id is assigned by the database.
#[derive(Clone, Debug)]
pub(crate) struct NewLedgerEntry {
    pub entry_date: NaiveDate,
    pub description: String,
    pub debit_amount: MoneyCents,
    pub credit_amount: MoneyCents,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub entry_type: LedgerEntryType,
}

/// Running balance of each entry, for entries given newest first.
///
/// The balance accumulates oldest first (`running += debit - credit`); the
/// returned vector is aligned with the input, so its first element is the
/// final balance.
#[must_use]
pub fn running_balances(newest_first: &[LedgerEntry]) -> Vec<MoneyCents> {
    let mut running = MoneyCents::ZERO;
    let mut balances: Vec<MoneyCents> = newest_first
        .iter()
        .rev()
        .map(|entry| {
            running += entry.net();
            running
        })
        .collect();
    balances.reverse();
    balances
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub entry_date: Date,
    pub description: String,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    pub invoice_id: Option<String>,
    pub payment_id: Option<String>,
    pub entry_type: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl NewLedgerEntry {
    pub(crate) fn into_active_model(self, created_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            entry_date: ActiveValue::Set(self.entry_date),
            description: ActiveValue::Set(self.description),
            debit_minor: ActiveValue::Set(self.debit_amount.cents()),
            credit_minor: ActiveValue::Set(self.credit_amount.cents()),
            customer_id: ActiveValue::Set(soft_ref_string(self.customer_id)),
            supplier_id: ActiveValue::Set(soft_ref_string(self.supplier_id)),
            invoice_id: ActiveValue::Set(soft_ref_string(self.invoice_id)),
            payment_id: ActiveValue::Set(soft_ref_string(self.payment_id)),
            entry_type: ActiveValue::Set(self.entry_type.as_str().to_string()),
            created_at: ActiveValue::Set(created_at),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            entry_date: model.entry_date,
            description: model.description,
            debit_amount: MoneyCents::new(model.debit_minor),
            credit_amount: MoneyCents::new(model.credit_minor),
            customer_id: parse_soft_ref(model.customer_id.as_deref()),
            supplier_id: parse_soft_ref(model.supplier_id.as_deref()),
            invoice_id: parse_soft_ref(model.invoice_id.as_deref()),
            payment_id: parse_soft_ref(model.payment_id.as_deref()),
            entry_type: LedgerEntryType::try_from(model.entry_type.as_str())?,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, debit: i64, credit: i64) -> LedgerEntry {
        LedgerEntry {
            id,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: format!("entry {id}"),
            debit_amount: MoneyCents::new(debit),
            credit_amount: MoneyCents::new(credit),
            customer_id: None,
            supplier_id: None,
            invoice_id: None,
            payment_id: None,
            entry_type: LedgerEntryType::Adjustment,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn running_balance_accumulates_oldest_first() {
        // newest first: 3, 2, 1
        let entries = vec![entry(3, 0, 40), entry(2, 0, 100), entry(1, 100, 0)];
        let balances = running_balances(&entries);
        assert_eq!(
            balances,
            vec![MoneyCents::new(-40), MoneyCents::ZERO, MoneyCents::new(100)]
        );
    }

    #[test]
    fn empty_ledger_has_no_balances() {
        assert!(running_balances(&[]).is_empty());
    }
}
