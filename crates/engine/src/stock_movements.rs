//! Stock adjustments and their audit trail.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{parse_soft_ref, parse_uuid, soft_ref_string},
};

/// Reason recorded for adjustments made by hand.
pub const MANUAL_ADJUSTMENT: &str = "manual_adjustment";

/// Outcome of one stock ledger call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub product_id: Uuid,
    pub old_quantity: i64,
    pub new_quantity: i64,
    /// Requested delta, before clamping.
    pub delta: i64,
    pub reason: String,
    /// True when the result was floored at zero.
    pub clamped: bool,
}

impl StockAdjustment {
    /// Computes the new on-hand quantity, floored at zero.
    #[must_use]
    pub fn compute(product_id: Uuid, old_quantity: i64, delta: i64, reason: &str) -> Self {
        let target = old_quantity.saturating_add(delta);
        Self {
            product_id,
            old_quantity,
            new_quantity: target.max(0),
            delta,
            reason: reason.to_string(),
            clamped: target < 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: Uuid,
    pub old_quantity: i64,
    pub new_quantity: i64,
    pub delta: i64,
    pub reason: String,
    pub invoice_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: String,
    pub old_quantity: i64,
    pub new_quantity: i64,
    pub delta: i64,
    pub reason: String,
    pub invoice_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl StockAdjustment {
    pub(crate) fn movement_model(
        &self,
        invoice_id: Option<Uuid>,
        created_at: DateTime<Utc>,
    ) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            product_id: ActiveValue::Set(self.product_id.to_string()),
            old_quantity: ActiveValue::Set(self.old_quantity),
            new_quantity: ActiveValue::Set(self.new_quantity),
            delta: ActiveValue::Set(self.delta),
            reason: ActiveValue::Set(self.reason.clone()),
            invoice_id: ActiveValue::Set(soft_ref_string(invoice_id)),
            created_at: ActiveValue::Set(created_at),
        }
    }
}

impl TryFrom<Model> for StockMovement {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            product_id: parse_uuid(&model.product_id, "product")?,
            old_quantity: model.old_quantity,
            new_quantity: model.new_quantity,
            delta: model.delta,
            reason: model.reason,
            invoice_id: parse_soft_ref(model.invoice_id.as_deref()),
            created_at: model.created_at,
        })
    }
}
