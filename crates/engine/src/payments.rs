//! Payments received from customers and made to suppliers.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Counterparty, EngineError, LedgerEntryType, MoneyCents,
    util::{parse_soft_ref, parse_uuid, soft_ref_string},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Received,
    Made,
}

impl PaymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Made => "made",
        }
    }

    pub(crate) fn ledger_entry_type(self) -> LedgerEntryType {
        match self {
            Self::Received => LedgerEntryType::PaymentReceived,
            Self::Made => LedgerEntryType::PaymentMade,
        }
    }

    /// Whether `counterparty` is on the right side for this payment type.
    pub(crate) fn accepts(self, counterparty: Counterparty) -> bool {
        matches!(
            (self, counterparty),
            (Self::Received, Counterparty::Customer(_)) | (Self::Made, Counterparty::Supplier(_))
        )
    }
}

impl TryFrom<&str> for PaymentType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "received" => Ok(Self::Received),
            "made" => Ok(Self::Made),
            other => Err(EngineError::Validation(format!(
                "invalid payment type: {other} (expected received or made)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    BankTransfer,
    Upi,
    Cheque,
    Card,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Upi => "upi",
            Self::Cheque => "cheque",
            Self::Card => "card",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "bank_transfer" => Ok(Self::BankTransfer),
            "upi" => Ok(Self::Upi),
            "cheque" => Ok(Self::Cheque),
            "card" => Ok(Self::Card),
            other => Err(EngineError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Completed,
    Pending,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::Validation(format!(
                "invalid payment status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub payment_number: String,
    pub payment_date: NaiveDate,
    pub amount: MoneyCents,
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub payment_type: PaymentType,
    pub counterparty: Counterparty,
    /// Informational link; does not move the invoice's paid amount.
    pub invoice_id: Option<Uuid>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub payment_number: String,
    pub payment_date: Date,
    pub amount_minor: i64,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub payment_type: String,
    pub invoice_id: Option<String>,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            payment_number: ActiveValue::Set(payment.payment_number.clone()),
            payment_date: ActiveValue::Set(payment.payment_date),
            amount_minor: ActiveValue::Set(payment.amount.cents()),
            payment_method: ActiveValue::Set(payment.payment_method.as_str().to_string()),
            reference_number: ActiveValue::Set(payment.reference_number.clone()),
            notes: ActiveValue::Set(payment.notes.clone()),
            payment_type: ActiveValue::Set(payment.payment_type.as_str().to_string()),
            invoice_id: ActiveValue::Set(soft_ref_string(payment.invoice_id)),
            customer_id: ActiveValue::Set(soft_ref_string(payment.counterparty.customer_id())),
            supplier_id: ActiveValue::Set(soft_ref_string(payment.counterparty.supplier_id())),
            status: ActiveValue::Set(payment.status.as_str().to_string()),
            created_at: ActiveValue::Set(payment.created_at),
            updated_at: ActiveValue::Set(payment.updated_at),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let payment_type = PaymentType::try_from(model.payment_type.as_str())?;
        let counterparty = match (payment_type, &model.customer_id, &model.supplier_id) {
            (PaymentType::Received, Some(customer_id), _) => {
                Counterparty::Customer(parse_uuid(customer_id, "customer")?)
            }
            (PaymentType::Made, _, Some(supplier_id)) => {
                Counterparty::Supplier(parse_uuid(supplier_id, "supplier")?)
            }
            _ => {
                return Err(EngineError::Consistency(format!(
                    "payment {} has no counterparty",
                    model.payment_number
                )));
            }
        };

        Ok(Self {
            id: parse_uuid(&model.id, "payment")?,
            payment_number: model.payment_number,
            payment_date: model.payment_date,
            amount: MoneyCents::new(model.amount_minor),
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            reference_number: model.reference_number,
            notes: model.notes,
            payment_type,
            counterparty,
            invoice_id: parse_soft_ref(model.invoice_id.as_deref()),
            status: PaymentStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_type_matches_counterparty_side() {
        let id = Uuid::new_v4();
        assert!(PaymentType::Received.accepts(Counterparty::Customer(id)));
        assert!(!PaymentType::Received.accepts(Counterparty::Supplier(id)));
        assert!(PaymentType::Made.accepts(Counterparty::Supplier(id)));
    }

    #[test]
    fn method_names_round_trip() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::BankTransfer,
            PaymentMethod::Upi,
            PaymentMethod::Cheque,
            PaymentMethod::Card,
        ] {
            assert_eq!(PaymentMethod::try_from(method.as_str()).unwrap(), method);
        }
        assert!(PaymentMethod::try_from("bitcoin").is_err());
    }
}
