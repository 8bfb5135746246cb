//! Invoice endpoints

use api_types::invoice::{
    DashboardQuery, DashboardResponse, InvoiceListQuery, InvoiceListResponse, InvoiceNew,
    InvoiceNumber, InvoiceNumberRequest, InvoicePayment, InvoiceStatus as ApiStatus,
    InvoiceType as ApiType, InvoiceUpdate, InvoiceView, LineItemNew, LineItemView,
    SettlementStatus as ApiSettlement,
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::{
    CreateInvoiceCmd, InvoiceDetail, InvoiceListFilter, InvoiceStatus, InvoiceType,
    LineItemInput, MoneyCents, SettlementStatus, TaxRate, UpdateInvoiceCmd,
};
use uuid::Uuid;

use crate::{ApiJson, ApiPath, ApiQuery, ServerError, server::ServerState};

fn map_type(invoice_type: InvoiceType) -> ApiType {
    match invoice_type {
        InvoiceType::Sales => ApiType::Sales,
        InvoiceType::Purchase => ApiType::Purchase,
    }
}

fn engine_type(invoice_type: ApiType) -> InvoiceType {
    match invoice_type {
        ApiType::Sales => InvoiceType::Sales,
        ApiType::Purchase => InvoiceType::Purchase,
    }
}

fn map_status(status: InvoiceStatus) -> ApiStatus {
    match status {
        InvoiceStatus::Draft => ApiStatus::Draft,
        InvoiceStatus::Sent => ApiStatus::Sent,
        InvoiceStatus::Paid => ApiStatus::Paid,
        InvoiceStatus::Partial => ApiStatus::Partial,
        InvoiceStatus::Overdue => ApiStatus::Overdue,
        InvoiceStatus::Cancelled => ApiStatus::Cancelled,
    }
}

fn engine_status(status: ApiStatus) -> InvoiceStatus {
    match status {
        ApiStatus::Draft => InvoiceStatus::Draft,
        ApiStatus::Sent => InvoiceStatus::Sent,
        ApiStatus::Paid => InvoiceStatus::Paid,
        ApiStatus::Partial => InvoiceStatus::Partial,
        ApiStatus::Overdue => InvoiceStatus::Overdue,
        ApiStatus::Cancelled => InvoiceStatus::Cancelled,
    }
}

fn map_settlement(status: SettlementStatus) -> ApiSettlement {
    match status {
        SettlementStatus::Unpaid => ApiSettlement::Unpaid,
        SettlementStatus::Partial => ApiSettlement::Partial,
        SettlementStatus::Paid => ApiSettlement::Paid,
    }
}

fn line_input(line: LineItemNew) -> LineItemInput {
    LineItemInput {
        product_id: line.product_id,
        item_name: line.item_name,
        item_description: line.item_description,
        quantity: line.quantity,
        unit_price: line.unit_price_minor.map(MoneyCents::new),
        tax_rate: line.tax_rate_hundredths.map(TaxRate::from_hundredths),
    }
}

fn invoice_view(detail: InvoiceDetail) -> InvoiceView {
    let invoice = detail.invoice;
    let line_items = detail
        .line_items
        .into_iter()
        .map(|item| LineItemView {
            id: item.line.id,
            position: item.line.position,
            product_id: item.line.product_id,
            product_name: item.product_name,
            product_sku: item.product_sku,
            item_name: item.line.item_name,
            item_description: item.line.item_description,
            quantity: item.line.quantity,
            unit_price_minor: item.line.unit_price.cents(),
            tax_rate_hundredths: item.line.tax_rate.hundredths(),
            line_subtotal_minor: item.line.amounts.line_subtotal.cents(),
            tax_minor: item.line.amounts.tax_amount.cents(),
            line_total_minor: item.line.amounts.line_total.cents(),
        })
        .collect();

    InvoiceView {
        id: invoice.id,
        invoice_number: invoice.invoice_number,
        invoice_type: map_type(invoice.invoice_type),
        customer_id: invoice.counterparty.customer_id(),
        supplier_id: invoice.counterparty.supplier_id(),
        counterparty_name: detail.counterparty_name,
        invoice_date: invoice.invoice_date,
        due_date: invoice.due_date,
        subtotal_minor: invoice.subtotal.cents(),
        tax_minor: invoice.tax_amount.cents(),
        discount_minor: invoice.discount_amount.cents(),
        total_minor: invoice.total_amount.cents(),
        paid_minor: invoice.paid_amount.cents(),
        outstanding_minor: detail.outstanding_amount.cents(),
        status: map_status(invoice.status),
        payment_status: map_settlement(detail.payment_status),
        notes: invoice.notes,
        terms_conditions: invoice.terms_conditions,
        line_items,
        created_at: invoice.created_at,
        updated_at: invoice.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<InvoiceListQuery>,
) -> Result<Json<InvoiceListResponse>, ServerError> {
    let filter = InvoiceListFilter {
        invoice_type: query.invoice_type.map(engine_type),
        customer_id: query.customer_id,
        supplier_id: query.supplier_id,
        status: query.status.map(engine_status),
        search: query.search,
    };
    let list = state.engine.list_invoices(&filter).await?;

    Ok(Json(InvoiceListResponse {
        total_invoices: list.summary.total_invoices,
        total_amount_minor: list.summary.total_amount.cents(),
        total_outstanding_minor: list.summary.total_outstanding.cents(),
        paid_invoices: list.summary.paid_invoices,
        unpaid_invoices: list.summary.unpaid_invoices,
        invoices: list.invoices.into_iter().map(invoice_view).collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<InvoiceNew>,
) -> Result<(StatusCode, Json<InvoiceView>), ServerError> {
    let cmd = CreateInvoiceCmd {
        invoice_type: engine_type(payload.invoice_type),
        customer_id: payload.customer_id,
        supplier_id: payload.supplier_id,
        invoice_number: payload.invoice_number,
        invoice_date: payload.invoice_date,
        due_date: payload.due_date,
        discount_amount: MoneyCents::new(payload.discount_minor.unwrap_or(0)),
        status: payload.status.map(engine_status),
        notes: payload.notes,
        terms_conditions: payload.terms_conditions,
        line_items: payload.line_items.into_iter().map(line_input).collect(),
    };
    let detail = state.engine.create_invoice(cmd).await?;
    Ok((StatusCode::CREATED, Json(invoice_view(detail))))
}

pub async fn get(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<InvoiceView>, ServerError> {
    Ok(Json(invoice_view(state.engine.invoice(id).await?)))
}

pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<InvoiceUpdate>,
) -> Result<Json<InvoiceView>, ServerError> {
    let cmd = UpdateInvoiceCmd {
        invoice_id: id,
        invoice_date: payload.invoice_date,
        due_date: payload.due_date,
        discount_amount: payload.discount_minor.map(MoneyCents::new),
        status: payload.status.map(engine_status),
        notes: payload.notes,
        terms_conditions: payload.terms_conditions,
        customer_id: payload.customer_id,
        supplier_id: payload.supplier_id,
        line_items: payload
            .line_items
            .map(|lines| lines.into_iter().map(line_input).collect()),
    };
    let detail = state.engine.update_invoice(cmd).await?;
    Ok(Json(invoice_view(detail)))
}

/// `DELETE` cancels: the invoice is kept with status `cancelled`.
pub async fn cancel(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<InvoiceView>, ServerError> {
    Ok(Json(invoice_view(state.engine.cancel_invoice(id).await?)))
}

pub async fn record_payment(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<InvoicePayment>,
) -> Result<Json<InvoiceView>, ServerError> {
    let detail = state
        .engine
        .record_invoice_payment(id, MoneyCents::new(payload.amount_minor))
        .await?;
    Ok(Json(invoice_view(detail)))
}

pub async fn generate_number(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<InvoiceNumberRequest>,
) -> Result<Json<InvoiceNumber>, ServerError> {
    let invoice_number = state
        .engine
        .generate_invoice_number(engine_type(payload.invoice_type))
        .await?;
    Ok(Json(InvoiceNumber { invoice_number }))
}

pub async fn dashboard(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ServerError> {
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let dashboard = state.engine.invoice_dashboard(today).await?;

    Ok(Json(DashboardResponse {
        recent_invoices: dashboard
            .recent_invoices
            .into_iter()
            .map(invoice_view)
            .collect(),
        overdue_count: dashboard.overdue_count,
        overdue_invoices: dashboard
            .overdue_invoices
            .into_iter()
            .map(invoice_view)
            .collect(),
        total_sales_minor: dashboard.total_sales.cents(),
        total_purchases_minor: dashboard.total_purchases.cents(),
        total_outstanding_minor: dashboard.total_outstanding.cents(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_defaults_stay_unset() {
        let input = line_input(LineItemNew {
            product_id: None,
            item_name: Some("Delivery".to_string()),
            item_description: None,
            quantity: 2,
            unit_price_minor: Some(1500),
            tax_rate_hundredths: None,
        });
        assert_eq!(input.unit_price, Some(MoneyCents::new(1500)));
        assert_eq!(input.tax_rate, None);
        assert_eq!(input.quantity, 2);
    }

    #[test]
    fn statuses_round_trip() {
        for status in [
            ApiStatus::Draft,
            ApiStatus::Sent,
            ApiStatus::Paid,
            ApiStatus::Partial,
            ApiStatus::Overdue,
            ApiStatus::Cancelled,
        ] {
            assert_eq!(map_status(engine_status(status)), status);
        }
    }
}
