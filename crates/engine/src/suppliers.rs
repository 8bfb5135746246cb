//! Suppliers (counterparties of purchase invoices and payments made).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_ifsc_code: Option<String>,
    pub notes: Option<String>,
    /// Amount the shop owes the supplier; decreased by payments made.
    pub outstanding_balance: MoneyCents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_ifsc_code: Option<String>,
    pub notes: Option<String>,
    pub outstanding_balance_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Supplier> for ActiveModel {
    fn from(supplier: &Supplier) -> Self {
        Self {
            id: ActiveValue::Set(supplier.id.to_string()),
            name: ActiveValue::Set(supplier.name.clone()),
            contact_person: ActiveValue::Set(supplier.contact_person.clone()),
            phone_number: ActiveValue::Set(supplier.phone_number.clone()),
            address: ActiveValue::Set(supplier.address.clone()),
            gstin: ActiveValue::Set(supplier.gstin.clone()),
            bank_name: ActiveValue::Set(supplier.bank_name.clone()),
            bank_account_number: ActiveValue::Set(supplier.bank_account_number.clone()),
            bank_ifsc_code: ActiveValue::Set(supplier.bank_ifsc_code.clone()),
            notes: ActiveValue::Set(supplier.notes.clone()),
            outstanding_balance_minor: ActiveValue::Set(supplier.outstanding_balance.cents()),
            created_at: ActiveValue::Set(supplier.created_at),
            updated_at: ActiveValue::Set(supplier.updated_at),
        }
    }
}

impl TryFrom<Model> for Supplier {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "supplier")?,
            name: model.name,
            contact_person: model.contact_person,
            phone_number: model.phone_number,
            address: model.address,
            gstin: model.gstin,
            bank_name: model.bank_name,
            bank_account_number: model.bank_account_number,
            bank_ifsc_code: model.bank_ifsc_code,
            notes: model.notes,
            outstanding_balance: MoneyCents::new(model.outstanding_balance_minor),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
