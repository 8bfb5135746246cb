use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, MANUAL_ADJUSTMENT, ResultEngine, StockAdjustment, StockMovement, products,
    stock_movements, util::normalize_optional_text,
};

use super::Engine;

impl Engine {
    /// Moves a product's on-hand quantity by `delta`, flooring it at zero.
    ///
    /// `reason` defaults to `manual_adjustment`. A floored result is not an
    /// error: it is reported through `clamped`.
    pub async fn adjust_stock(
        &self,
        product_id: Uuid,
        delta: i64,
        reason: Option<&str>,
    ) -> ResultEngine<StockAdjustment> {
        let reason = normalize_optional_text(reason).unwrap_or_else(|| MANUAL_ADJUSTMENT.to_string());
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                engine
                    .apply_stock_delta(db_tx, product_id, delta, &reason, None)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))
            })
        })
        .await
    }

    /// Stock movements of a product, oldest first.
    pub async fn stock_movements(&self, product_id: Uuid) -> ResultEngine<Vec<StockMovement>> {
        stock_movements::Entity::find()
            .filter(stock_movements::Column::ProductId.eq(product_id.to_string()))
            .order_by_asc(stock_movements::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(StockMovement::try_from)
            .collect()
    }

    /// Applies one stock ledger call and records the movement.
    ///
    /// Returns `None` when the product row no longer exists.
    pub(crate) async fn apply_stock_delta(
        &self,
        db_tx: &DatabaseTransaction,
        product_id: Uuid,
        delta: i64,
        reason: &str,
        invoice_id: Option<Uuid>,
    ) -> ResultEngine<Option<StockAdjustment>> {
        let Some(model) = products::Entity::find_by_id(product_id.to_string())
            .one(db_tx)
            .await?
        else {
            return Ok(None);
        };

        let adjustment = StockAdjustment::compute(product_id, model.stock_quantity, delta, reason);
        if adjustment.clamped {
            tracing::warn!(
                product_id = %product_id,
                old_quantity = adjustment.old_quantity,
                delta,
                reason,
                "stock floored at zero"
            );
        }

        let now = Utc::now();
        products::ActiveModel {
            id: ActiveValue::Set(model.id),
            stock_quantity: ActiveValue::Set(adjustment.new_quantity),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .update(db_tx)
        .await?;

        adjustment
            .movement_model(invoice_id, now)
            .insert(db_tx)
            .await?;

        Ok(Some(adjustment))
    }

    /// Applies `direction * quantity` for each `(product, quantity)` pair.
    /// Lines whose product is gone are skipped.
    pub(crate) async fn apply_stock_effects(
        &self,
        db_tx: &DatabaseTransaction,
        effects: &[(Uuid, i64)],
        direction: i64,
        reason: &str,
        invoice_id: Uuid,
    ) -> ResultEngine<()> {
        for &(product_id, quantity) in effects {
            let applied = self
                .apply_stock_delta(db_tx, product_id, direction * quantity, reason, Some(invoice_id))
                .await?;
            if applied.is_none() {
                tracing::debug!(product_id = %product_id, reason, "skipping stock effect of missing product");
            }
        }
        Ok(())
    }
}
