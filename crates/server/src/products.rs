//! Product catalog and stock endpoints

use api_types::product::{
    ProductListQuery, ProductListResponse, ProductNew, ProductUpdate, ProductView, StockAdjust,
    StockAdjustmentView,
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{MoneyCents, NewProduct, ProductListFilter, ProductPatch, TaxRate};
use uuid::Uuid;

use crate::{ApiJson, ApiPath, ApiQuery, ServerError, server::ServerState};

fn product_view(product: engine::Product) -> ProductView {
    ProductView {
        is_low_stock: product.is_low_stock(),
        id: product.id,
        name: product.name,
        description: product.description,
        sku: product.sku,
        category: product.category,
        retail_price_minor: product.retail_price.cents(),
        wholesale_price_minor: product.wholesale_price.cents(),
        cost_price_minor: product.cost_price.cents(),
        stock_quantity: product.stock_quantity,
        min_stock_level: product.min_stock_level,
        max_stock_level: product.max_stock_level,
        unit_of_measurement: product.unit_of_measurement,
        barcode: product.barcode,
        tax_rate_hundredths: product.tax_rate.hundredths(),
        is_active: product.is_active,
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

fn new_product(payload: ProductNew) -> NewProduct {
    let retail_price = MoneyCents::new(payload.retail_price_minor);
    NewProduct {
        name: payload.name,
        description: payload.description,
        sku: payload.sku,
        category: payload.category,
        retail_price,
        wholesale_price: payload
            .wholesale_price_minor
            .map_or(retail_price, MoneyCents::new),
        cost_price: MoneyCents::new(payload.cost_price_minor.unwrap_or(0)),
        stock_quantity: payload.stock_quantity.unwrap_or(0),
        min_stock_level: payload.min_stock_level.unwrap_or(0),
        max_stock_level: payload.max_stock_level.unwrap_or(1000),
        unit_of_measurement: payload
            .unit_of_measurement
            .unwrap_or_else(|| "pcs".to_string()),
        barcode: payload.barcode,
        tax_rate: TaxRate::from_hundredths(payload.tax_rate_hundredths.unwrap_or(0)),
        is_active: payload.is_active.unwrap_or(true),
    }
}

fn product_patch(payload: ProductUpdate) -> ProductPatch {
    ProductPatch {
        name: payload.name,
        description: payload.description,
        sku: payload.sku,
        category: payload.category,
        retail_price: payload.retail_price_minor.map(MoneyCents::new),
        wholesale_price: payload.wholesale_price_minor.map(MoneyCents::new),
        cost_price: payload.cost_price_minor.map(MoneyCents::new),
        min_stock_level: payload.min_stock_level,
        max_stock_level: payload.max_stock_level,
        unit_of_measurement: payload.unit_of_measurement,
        barcode: payload.barcode,
        tax_rate: payload.tax_rate_hundredths.map(TaxRate::from_hundredths),
        is_active: payload.is_active,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> Result<Json<ProductListResponse>, ServerError> {
    let filter = ProductListFilter {
        search: query.search,
        category: query.category,
        low_stock: query.low_stock.unwrap_or(false),
        active_only: query.active_only.unwrap_or(true),
    };
    let list = state.engine.list_products(&filter).await?;

    Ok(Json(ProductListResponse {
        total_products: list.summary.total_products,
        total_stock_value_minor: list.summary.total_stock_value.cents(),
        low_stock_count: list.summary.low_stock_count,
        products: list.products.into_iter().map(product_view).collect(),
    }))
}

pub async fn categories(
    State(state): State<ServerState>,
) -> Result<Json<Vec<String>>, ServerError> {
    Ok(Json(state.engine.product_categories().await?))
}

pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ProductNew>,
) -> Result<(StatusCode, Json<ProductView>), ServerError> {
    let product = state.engine.create_product(new_product(payload)).await?;
    Ok((StatusCode::CREATED, Json(product_view(product))))
}

pub async fn get(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ProductView>, ServerError> {
    let product = state.engine.product(id).await?;
    Ok(Json(product_view(product)))
}

pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ProductUpdate>,
) -> Result<Json<ProductView>, ServerError> {
    let product = state
        .engine
        .update_product(id, product_patch(payload))
        .await?;
    Ok(Json(product_view(product)))
}

pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle a manual stock adjustment. Floored results are reported through
/// `clamped`, not as an error.
pub async fn adjust_stock(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<StockAdjust>,
) -> Result<Json<StockAdjustmentView>, ServerError> {
    let adjustment = state
        .engine
        .adjust_stock(id, payload.delta, payload.reason.as_deref())
        .await?;

    Ok(Json(StockAdjustmentView {
        product_id: adjustment.product_id,
        old_quantity: adjustment.old_quantity,
        new_quantity: adjustment.new_quantity,
        delta: adjustment.delta,
        reason: adjustment.reason,
        clamped: adjustment.clamped,
    }))
}
