use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{Condition, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, MoneyCents, NewProduct, Product, ProductListFilter, ProductPatch, ResultEngine,
    products,
    util::{
        apply_optional_text_patch, ensure_not_negative, normalize_optional_text,
        normalize_required_name,
    },
};

use super::Engine;

const OPENING_STOCK: &str = "opening_stock";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListSummary {
    pub total_products: usize,
    /// On-hand quantities valued at retail price.
    pub total_stock_value: MoneyCents,
    pub low_stock_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub summary: ProductListSummary,
}

fn validate_product(product: &Product) -> ResultEngine<()> {
    ensure_not_negative(product.retail_price, "retail_price")?;
    ensure_not_negative(product.wholesale_price, "wholesale_price")?;
    ensure_not_negative(product.cost_price, "cost_price")?;
    if product.tax_rate.is_negative() {
        return Err(EngineError::InvalidAmount("tax_rate must be >= 0".to_string()));
    }
    if product.min_stock_level < 0 || product.max_stock_level < 0 {
        return Err(EngineError::Validation(
            "stock levels must be >= 0".to_string(),
        ));
    }
    if product.min_stock_level > product.max_stock_level {
        return Err(EngineError::Validation(
            "min_stock_level must not exceed max_stock_level".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Adds a product to the catalog. A positive opening quantity goes through
    /// the stock ledger.
    pub async fn create_product(&self, cmd: NewProduct) -> ResultEngine<Product> {
        let name = normalize_required_name(&cmd.name, "product")?;
        if cmd.stock_quantity < 0 {
            return Err(EngineError::Validation(
                "stock_quantity must be >= 0".to_string(),
            ));
        }
        let unit_of_measurement = normalize_optional_text(Some(&cmd.unit_of_measurement))
            .unwrap_or_else(|| "pcs".to_string());

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name,
            description: normalize_optional_text(cmd.description.as_deref()),
            sku: normalize_optional_text(cmd.sku.as_deref()),
            category: normalize_optional_text(cmd.category.as_deref()),
            retail_price: cmd.retail_price,
            wholesale_price: cmd.wholesale_price,
            cost_price: cmd.cost_price,
            stock_quantity: 0,
            min_stock_level: cmd.min_stock_level,
            max_stock_level: cmd.max_stock_level,
            unit_of_measurement,
            barcode: normalize_optional_text(cmd.barcode.as_deref()),
            tax_rate: cmd.tax_rate,
            is_active: cmd.is_active,
            created_at: now,
            updated_at: now,
        };
        validate_product(&product)?;
        let opening_stock = cmd.stock_quantity;

        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                if let Some(sku) = product.sku.as_deref() {
                    ensure_sku_free(db_tx, sku, None).await?;
                }
                let model: products::ActiveModel = (&product).into();
                model.insert(db_tx).await?;

                if opening_stock > 0 {
                    engine
                        .apply_stock_delta(db_tx, product.id, opening_stock, OPENING_STOCK, None)
                        .await?;
                }

                require_product(db_tx, product.id).await
            })
        })
        .await
    }

    /// Return a product snapshot from DB.
    pub async fn product(&self, product_id: Uuid) -> ResultEngine<Product> {
        let model = products::Entity::find_by_id(product_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))?;
        Product::try_from(model)
    }

    /// Lists products ordered by name, with stock summary figures.
    pub async fn list_products(&self, filter: &ProductListFilter) -> ResultEngine<ProductList> {
        let mut query = products::Entity::find();
        if filter.active_only {
            query = query.filter(products::Column::IsActive.eq(true));
        }
        if let Some(search) = normalize_optional_text(filter.search.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(products::Column::Name.contains(&search))
                    .add(products::Column::Description.contains(&search))
                    .add(products::Column::Sku.contains(&search))
                    .add(products::Column::Barcode.contains(&search)),
            );
        }
        if let Some(category) = normalize_optional_text(filter.category.as_deref()) {
            query = query.filter(products::Column::Category.contains(&category));
        }

        let mut products = query
            .order_by_asc(products::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Product::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        if filter.low_stock {
            products.retain(Product::is_low_stock);
        }

        let summary = ProductListSummary {
            total_products: products.len(),
            total_stock_value: products.iter().map(Product::retail_stock_value).sum(),
            low_stock_count: products.iter().filter(|p| p.is_low_stock()).count(),
        };
        Ok(ProductList { products, summary })
    }

    /// Distinct categories of active products, sorted.
    pub async fn product_categories(&self) -> ResultEngine<Vec<String>> {
        let models = products::Entity::find()
            .filter(products::Column::IsActive.eq(true))
            .filter(products::Column::Category.is_not_null())
            .all(&self.database)
            .await?;
        let categories: BTreeSet<String> = models
            .into_iter()
            .filter_map(|m| normalize_optional_text(m.category.as_deref()))
            .collect();
        Ok(categories.into_iter().collect())
    }

    /// Patches catalog fields. Stock quantity is not patchable.
    pub async fn update_product(
        &self,
        product_id: Uuid,
        patch: ProductPatch,
    ) -> ResultEngine<Product> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "product"))
            .transpose()?;

        self.with_tx(|_engine, db_tx| {
            Box::pin(async move {
                let mut product = require_product(db_tx, product_id).await?;

                if let Some(name) = name {
                    product.name = name;
                }
                product.description =
                    apply_optional_text_patch(product.description, patch.description.as_deref());
                let sku = apply_optional_text_patch(product.sku.clone(), patch.sku.as_deref());
                if sku != product.sku
                    && let Some(sku) = sku.as_deref()
                {
                    ensure_sku_free(db_tx, sku, Some(product_id)).await?;
                }
                product.sku = sku;
                product.category =
                    apply_optional_text_patch(product.category, patch.category.as_deref());
                product.barcode =
                    apply_optional_text_patch(product.barcode, patch.barcode.as_deref());
                if let Some(unit) = normalize_optional_text(patch.unit_of_measurement.as_deref()) {
                    product.unit_of_measurement = unit;
                }
                if let Some(price) = patch.retail_price {
                    product.retail_price = price;
                }
                if let Some(price) = patch.wholesale_price {
                    product.wholesale_price = price;
                }
                if let Some(price) = patch.cost_price {
                    product.cost_price = price;
                }
                if let Some(level) = patch.min_stock_level {
                    product.min_stock_level = level;
                }
                if let Some(level) = patch.max_stock_level {
                    product.max_stock_level = level;
                }
                if let Some(tax_rate) = patch.tax_rate {
                    product.tax_rate = tax_rate;
                }
                if let Some(is_active) = patch.is_active {
                    product.is_active = is_active;
                }
                validate_product(&product)?;
                product.updated_at = Utc::now();

                let model: products::ActiveModel = (&product).into();
                model.update(db_tx).await?;
                Ok(product)
            })
        })
        .await
    }

    /// Removes a product. Invoice lines keep their (now dangling) reference.
    pub async fn delete_product(&self, product_id: Uuid) -> ResultEngine<()> {
        let result = products::Entity::delete_by_id(product_id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("product not exists".to_string()));
        }
        Ok(())
    }
}

pub(crate) async fn require_product(
    db_tx: &DatabaseTransaction,
    product_id: Uuid,
) -> ResultEngine<Product> {
    let model = products::Entity::find_by_id(product_id.to_string())
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))?;
    Product::try_from(model)
}

async fn ensure_sku_free(
    db_tx: &DatabaseTransaction,
    sku: &str,
    except: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query = products::Entity::find().filter(products::Column::Sku.eq(sku));
    if let Some(id) = except {
        query = query.filter(products::Column::Id.ne(id.to_string()));
    }
    if query.one(db_tx).await?.is_some() {
        return Err(EngineError::ExistingKey(sku.to_string()));
    }
    Ok(())
}
