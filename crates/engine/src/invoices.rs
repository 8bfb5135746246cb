//! Invoice primitives.
//!
//! An [`Invoice`] is either a sales invoice (customer side, takes stock out)
//! or a purchase invoice (supplier side, brings stock in). Its header totals
//! are always derived from its line items via [`crate::totals`].

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Counterparty, EngineError, InvoiceTotals, MoneyCents,
    util::{parse_uuid, soft_ref_string},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    Sales,
    Purchase,
}

impl InvoiceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Purchase => "purchase",
        }
    }

    /// Prefix of generated invoice numbers.
    pub fn number_prefix(self) -> &'static str {
        match self {
            Self::Sales => "INV-S",
            Self::Purchase => "INV-P",
        }
    }

    /// Sign applied to a line quantity when the invoice takes effect on stock.
    pub(crate) fn stock_direction(self) -> i64 {
        match self {
            Self::Sales => -1,
            Self::Purchase => 1,
        }
    }

    pub(crate) fn apply_reason(self) -> &'static str {
        match self {
            Self::Sales => "sales_invoice",
            Self::Purchase => "purchase_invoice",
        }
    }

    pub(crate) fn reversal_reason(self) -> &'static str {
        match self {
            Self::Sales => "sales_invoice_reversal",
            Self::Purchase => "purchase_invoice_reversal",
        }
    }

    pub(crate) fn cancel_reason(self) -> &'static str {
        match self {
            Self::Sales => "sales_invoice_cancelled",
            Self::Purchase => "purchase_invoice_cancelled",
        }
    }
}

impl TryFrom<&str> for InvoiceType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "sales" => Ok(Self::Sales),
            "purchase" => Ok(Self::Purchase),
            other => Err(EngineError::Validation(format!(
                "invalid invoice type: {other} (expected sales or purchase)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Partial,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Partial => "partial",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses that can be set by hand; the others are derived from payments
    /// or reached through cancellation.
    pub fn is_manual(self) -> bool {
        matches!(self, Self::Draft | Self::Sent | Self::Overdue)
    }

    /// Statuses that still expect money (used by overdue/outstanding reports).
    pub fn is_open(self) -> bool {
        matches!(self, Self::Draft | Self::Sent | Self::Partial)
    }

    /// Status implied by the amount paid so far, if any was paid.
    #[must_use]
    pub fn from_payments(paid: MoneyCents, total: MoneyCents) -> Option<Self> {
        if !paid.is_positive() {
            None
        } else if paid >= total {
            Some(Self::Paid)
        } else {
            Some(Self::Partial)
        }
    }
}

impl TryFrom<&str> for InvoiceStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "paid" => Ok(Self::Paid),
            "partial" => Ok(Self::Partial),
            "overdue" => Ok(Self::Overdue),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::Validation(format!(
                "invalid invoice status: {other}"
            ))),
        }
    }
}

/// How much of an invoice has been settled, independent of its workflow status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Unpaid,
    Partial,
    Paid,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub invoice_type: InvoiceType,
    pub counterparty: Counterparty,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: MoneyCents,
    pub tax_amount: MoneyCents,
    pub discount_amount: MoneyCents,
    pub total_amount: MoneyCents,
    pub paid_amount: MoneyCents,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub terms_conditions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    #[must_use]
    pub fn outstanding_amount(&self) -> MoneyCents {
        self.total_amount - self.paid_amount
    }

    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.paid_amount >= self.total_amount
    }

    #[must_use]
    pub fn settlement_status(&self) -> SettlementStatus {
        if self.paid_amount.is_zero() {
            SettlementStatus::Unpaid
        } else if self.is_paid() {
            SettlementStatus::Paid
        } else {
            SettlementStatus::Partial
        }
    }

    pub(crate) fn set_totals(&mut self, totals: InvoiceTotals) {
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.discount_amount = totals.discount_amount;
        self.total_amount = totals.total_amount;
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub invoice_type: String,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    pub invoice_date: Date,
    pub due_date: Option<Date>,
    pub subtotal_minor: i64,
    pub tax_minor: i64,
    pub discount_minor: i64,
    pub total_minor: i64,
    pub paid_minor: i64,
    pub status: String,
    pub notes: Option<String>,
    pub terms_conditions: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::line_items::Entity")]
    LineItems,
}

impl Related<super::line_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Invoice> for ActiveModel {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: ActiveValue::Set(invoice.id.to_string()),
            invoice_number: ActiveValue::Set(invoice.invoice_number.clone()),
            invoice_type: ActiveValue::Set(invoice.invoice_type.as_str().to_string()),
            customer_id: ActiveValue::Set(soft_ref_string(invoice.counterparty.customer_id())),
            supplier_id: ActiveValue::Set(soft_ref_string(invoice.counterparty.supplier_id())),
            invoice_date: ActiveValue::Set(invoice.invoice_date),
            due_date: ActiveValue::Set(invoice.due_date),
            subtotal_minor: ActiveValue::Set(invoice.subtotal.cents()),
            tax_minor: ActiveValue::Set(invoice.tax_amount.cents()),
            discount_minor: ActiveValue::Set(invoice.discount_amount.cents()),
            total_minor: ActiveValue::Set(invoice.total_amount.cents()),
            paid_minor: ActiveValue::Set(invoice.paid_amount.cents()),
            status: ActiveValue::Set(invoice.status.as_str().to_string()),
            notes: ActiveValue::Set(invoice.notes.clone()),
            terms_conditions: ActiveValue::Set(invoice.terms_conditions.clone()),
            created_at: ActiveValue::Set(invoice.created_at),
            updated_at: ActiveValue::Set(invoice.updated_at),
        }
    }
}

impl TryFrom<Model> for Invoice {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let invoice_type = InvoiceType::try_from(model.invoice_type.as_str())?;
        let counterparty = match (invoice_type, &model.customer_id, &model.supplier_id) {
            (InvoiceType::Sales, Some(customer_id), _) => {
                Counterparty::Customer(parse_uuid(customer_id, "customer")?)
            }
            (InvoiceType::Purchase, _, Some(supplier_id)) => {
                Counterparty::Supplier(parse_uuid(supplier_id, "supplier")?)
            }
            _ => {
                return Err(EngineError::Consistency(format!(
                    "invoice {} has no {} reference",
                    model.invoice_number,
                    match invoice_type {
                        InvoiceType::Sales => "customer",
                        InvoiceType::Purchase => "supplier",
                    }
                )));
            }
        };

        Ok(Self {
            id: parse_uuid(&model.id, "invoice")?,
            invoice_number: model.invoice_number,
            invoice_type,
            counterparty,
            invoice_date: model.invoice_date,
            due_date: model.due_date,
            subtotal: MoneyCents::new(model.subtotal_minor),
            tax_amount: MoneyCents::new(model.tax_minor),
            discount_amount: MoneyCents::new(model.discount_minor),
            total_amount: MoneyCents::new(model.total_minor),
            paid_amount: MoneyCents::new(model.paid_minor),
            status: InvoiceStatus::try_from(model.status.as_str())?,
            notes: model.notes,
            terms_conditions: model.terms_conditions,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
