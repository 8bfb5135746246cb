//! Customers (counterparties of sales invoices and received payments).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, util::parse_uuid};

/// Pricing tier of a customer; picks the default unit price on sales lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    #[default]
    Retail,
    Wholesale,
}

impl CustomerType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Wholesale => "wholesale",
        }
    }
}

impl TryFrom<&str> for CustomerType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "retail" => Ok(Self::Retail),
            "wholesale" => Ok(Self::Wholesale),
            other => Err(EngineError::Validation(format!(
                "invalid customer type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub customer_type: CustomerType,
    pub notes: Option<String>,
    /// Amount the customer owes the shop; decreased by received payments.
    pub outstanding_balance: MoneyCents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub customer_type: String,
    pub notes: Option<String>,
    pub outstanding_balance_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Customer> for ActiveModel {
    fn from(customer: &Customer) -> Self {
        Self {
            id: ActiveValue::Set(customer.id.to_string()),
            name: ActiveValue::Set(customer.name.clone()),
            phone_number: ActiveValue::Set(customer.phone_number.clone()),
            address: ActiveValue::Set(customer.address.clone()),
            gstin: ActiveValue::Set(customer.gstin.clone()),
            customer_type: ActiveValue::Set(customer.customer_type.as_str().to_string()),
            notes: ActiveValue::Set(customer.notes.clone()),
            outstanding_balance_minor: ActiveValue::Set(customer.outstanding_balance.cents()),
            created_at: ActiveValue::Set(customer.created_at),
            updated_at: ActiveValue::Set(customer.updated_at),
        }
    }
}

impl TryFrom<Model> for Customer {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "customer")?,
            name: model.name,
            phone_number: model.phone_number,
            address: model.address,
            gstin: model.gstin,
            customer_type: CustomerType::try_from(model.customer_type.as_str())
                .unwrap_or_default(),
            notes: model.notes,
            outstanding_balance: MoneyCents::new(model.outstanding_balance_minor),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
