//! Invoice line items.
//!
//! Amounts are always recomputed from quantity, unit price and tax rate; the
//! stored `*_minor` columns are a cache of [`LineAmounts::compute`].

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, LineAmounts, MoneyCents, TaxRate,
    util::{parse_soft_ref, parse_uuid, soft_ref_string},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub position: i32,
    /// Soft reference; the product row may be gone.
    pub product_id: Option<Uuid>,
    pub item_name: String,
    pub item_description: Option<String>,
    pub quantity: i64,
    pub unit_price: MoneyCents,
    pub tax_rate: TaxRate,
    pub amounts: LineAmounts,
}

impl LineItem {
    /// `(product_id, quantity)` if the line moves stock.
    pub(crate) fn stock_effect(&self) -> Option<(Uuid, i64)> {
        self.product_id.map(|product_id| (product_id, self.quantity))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoice_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub invoice_id: String,
    pub position: i32,
    pub product_id: Option<String>,
    pub item_name: String,
    pub item_description: Option<String>,
    pub quantity: i64,
    pub unit_price_minor: i64,
    pub tax_rate_hundredths: i64,
    pub line_subtotal_minor: i64,
    pub tax_minor: i64,
    pub line_total_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id",
        on_delete = "Cascade"
    )]
    Invoice,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LineItem> for ActiveModel {
    fn from(line: &LineItem) -> Self {
        Self {
            id: ActiveValue::Set(line.id.to_string()),
            invoice_id: ActiveValue::Set(line.invoice_id.to_string()),
            position: ActiveValue::Set(line.position),
            product_id: ActiveValue::Set(soft_ref_string(line.product_id)),
            item_name: ActiveValue::Set(line.item_name.clone()),
            item_description: ActiveValue::Set(line.item_description.clone()),
            quantity: ActiveValue::Set(line.quantity),
            unit_price_minor: ActiveValue::Set(line.unit_price.cents()),
            tax_rate_hundredths: ActiveValue::Set(line.tax_rate.hundredths()),
            line_subtotal_minor: ActiveValue::Set(line.amounts.line_subtotal.cents()),
            tax_minor: ActiveValue::Set(line.amounts.tax_amount.cents()),
            line_total_minor: ActiveValue::Set(line.amounts.line_total.cents()),
        }
    }
}

impl TryFrom<Model> for LineItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "line item")?,
            invoice_id: parse_uuid(&model.invoice_id, "invoice")?,
            position: model.position,
            product_id: parse_soft_ref(model.product_id.as_deref()),
            item_name: model.item_name,
            item_description: model.item_description,
            quantity: model.quantity,
            unit_price: MoneyCents::new(model.unit_price_minor),
            tax_rate: TaxRate::from_hundredths(model.tax_rate_hundredths),
            amounts: LineAmounts {
                line_subtotal: MoneyCents::new(model.line_subtotal_minor),
                tax_amount: MoneyCents::new(model.tax_minor),
                line_total: MoneyCents::new(model.line_total_minor),
            },
        })
    }
}
