//! Catalog products and their on-hand stock.
//!
//! `stock_quantity` is never written directly by callers: it only moves
//! through the stock ledger (`Engine::adjust_stock` and invoice effects),
//! which floors it at zero.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, TaxRate, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub retail_price: MoneyCents,
    pub wholesale_price: MoneyCents,
    pub cost_price: MoneyCents,
    pub stock_quantity: i64,
    pub min_stock_level: i64,
    pub max_stock_level: i64,
    pub unit_of_measurement: String,
    pub barcode: Option<String>,
    pub tax_rate: TaxRate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Reorder signal: on-hand quantity at or below the minimum level.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.min_stock_level
    }

    /// On-hand quantity valued at retail price.
    #[must_use]
    pub fn retail_stock_value(&self) -> MoneyCents {
        self.retail_price
            .checked_mul(self.stock_quantity)
            .unwrap_or(MoneyCents::new(i64::MAX))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(unique)]
    pub sku: Option<String>,
    pub category: Option<String>,
    pub retail_price_minor: i64,
    pub wholesale_price_minor: i64,
    pub cost_price_minor: i64,
    pub stock_quantity: i64,
    pub min_stock_level: i64,
    pub max_stock_level: i64,
    pub unit_of_measurement: String,
    pub barcode: Option<String>,
    pub tax_rate_hundredths: i64,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        Self {
            id: ActiveValue::Set(product.id.to_string()),
            name: ActiveValue::Set(product.name.clone()),
            description: ActiveValue::Set(product.description.clone()),
            sku: ActiveValue::Set(product.sku.clone()),
            category: ActiveValue::Set(product.category.clone()),
            retail_price_minor: ActiveValue::Set(product.retail_price.cents()),
            wholesale_price_minor: ActiveValue::Set(product.wholesale_price.cents()),
            cost_price_minor: ActiveValue::Set(product.cost_price.cents()),
            stock_quantity: ActiveValue::Set(product.stock_quantity),
            min_stock_level: ActiveValue::Set(product.min_stock_level),
            max_stock_level: ActiveValue::Set(product.max_stock_level),
            unit_of_measurement: ActiveValue::Set(product.unit_of_measurement.clone()),
            barcode: ActiveValue::Set(product.barcode.clone()),
            tax_rate_hundredths: ActiveValue::Set(product.tax_rate.hundredths()),
            is_active: ActiveValue::Set(product.is_active),
            created_at: ActiveValue::Set(product.created_at),
            updated_at: ActiveValue::Set(product.updated_at),
        }
    }
}

impl TryFrom<Model> for Product {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "product")?,
            name: model.name,
            description: model.description,
            sku: model.sku,
            category: model.category,
            retail_price: MoneyCents::new(model.retail_price_minor),
            wholesale_price: MoneyCents::new(model.wholesale_price_minor),
            cost_price: MoneyCents::new(model.cost_price_minor),
            stock_quantity: model.stock_quantity,
            min_stock_level: model.min_stock_level,
            max_stock_level: model.max_stock_level,
            unit_of_measurement: model.unit_of_measurement,
            barcode: model.barcode,
            tax_rate: TaxRate::from_hundredths(model.tax_rate_hundredths),
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
