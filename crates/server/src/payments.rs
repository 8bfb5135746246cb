//! Payment endpoints

use api_types::payment::{
    PaymentListQuery, PaymentMethod as ApiMethod, PaymentNew, PaymentStatus as ApiStatus,
    PaymentType as ApiType, PaymentUpdate, PaymentView,
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{
    CreatePaymentCmd, MoneyCents, PaymentDetail, PaymentListFilter, PaymentMethod, PaymentStatus,
    PaymentType, UpdatePaymentCmd,
};
use uuid::Uuid;

use crate::{ApiJson, ApiPath, ApiQuery, ServerError, server::ServerState};

fn map_type(payment_type: PaymentType) -> ApiType {
    match payment_type {
        PaymentType::Received => ApiType::Received,
        PaymentType::Made => ApiType::Made,
    }
}

fn engine_type(payment_type: ApiType) -> PaymentType {
    match payment_type {
        ApiType::Received => PaymentType::Received,
        ApiType::Made => PaymentType::Made,
    }
}

fn map_method(method: PaymentMethod) -> ApiMethod {
    match method {
        PaymentMethod::Cash => ApiMethod::Cash,
        PaymentMethod::BankTransfer => ApiMethod::BankTransfer,
        PaymentMethod::Upi => ApiMethod::Upi,
        PaymentMethod::Cheque => ApiMethod::Cheque,
        PaymentMethod::Card => ApiMethod::Card,
    }
}

fn engine_method(method: ApiMethod) -> PaymentMethod {
    match method {
        ApiMethod::Cash => PaymentMethod::Cash,
        ApiMethod::BankTransfer => PaymentMethod::BankTransfer,
        ApiMethod::Upi => PaymentMethod::Upi,
        ApiMethod::Cheque => PaymentMethod::Cheque,
        ApiMethod::Card => PaymentMethod::Card,
    }
}

fn map_status(status: PaymentStatus) -> ApiStatus {
    match status {
        PaymentStatus::Completed => ApiStatus::Completed,
        PaymentStatus::Pending => ApiStatus::Pending,
        PaymentStatus::Cancelled => ApiStatus::Cancelled,
    }
}

fn engine_status(status: ApiStatus) -> PaymentStatus {
    match status {
        ApiStatus::Completed => PaymentStatus::Completed,
        ApiStatus::Pending => PaymentStatus::Pending,
        ApiStatus::Cancelled => PaymentStatus::Cancelled,
    }
}

fn payment_view(detail: PaymentDetail) -> PaymentView {
    let payment = detail.payment;
    PaymentView {
        id: payment.id,
        payment_number: payment.payment_number,
        payment_date: payment.payment_date,
        amount_minor: payment.amount.cents(),
        payment_method: map_method(payment.payment_method),
        reference_number: payment.reference_number,
        notes: payment.notes,
        payment_type: map_type(payment.payment_type),
        customer_id: payment.counterparty.customer_id(),
        supplier_id: payment.counterparty.supplier_id(),
        counterparty_name: detail.counterparty_name,
        invoice_id: payment.invoice_id,
        invoice_number: detail.invoice_number,
        status: map_status(payment.status),
        created_at: payment.created_at,
        updated_at: payment.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<PaymentListQuery>,
) -> Result<Json<Vec<PaymentView>>, ServerError> {
    let filter = PaymentListFilter {
        payment_type: query.payment_type.map(engine_type),
        customer_id: query.customer_id,
        supplier_id: query.supplier_id,
        invoice_id: query.invoice_id,
        status: query.status.map(engine_status),
        from: query.from,
        to: query.to,
    };
    let payments = state.engine.list_payments(&filter).await?;
    Ok(Json(payments.into_iter().map(payment_view).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<PaymentNew>,
) -> Result<(StatusCode, Json<PaymentView>), ServerError> {
    let cmd = CreatePaymentCmd {
        payment_type: engine_type(payload.payment_type),
        customer_id: payload.customer_id,
        supplier_id: payload.supplier_id,
        amount: MoneyCents::new(payload.amount_minor),
        payment_date: payload.payment_date,
        payment_number: payload.payment_number,
        payment_method: payload
            .payment_method
            .map_or(PaymentMethod::Cash, engine_method),
        reference_number: payload.reference_number,
        notes: payload.notes,
        invoice_id: payload.invoice_id,
        status: payload
            .status
            .map_or(PaymentStatus::Completed, engine_status),
    };
    let detail = state.engine.create_payment(cmd).await?;
    Ok((StatusCode::CREATED, Json(payment_view(detail))))
}

pub async fn get(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PaymentView>, ServerError> {
    Ok(Json(payment_view(state.engine.payment(id).await?)))
}

/// Amount, date or counterparty changes repost the payment's ledger pair.
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PaymentUpdate>,
) -> Result<Json<PaymentView>, ServerError> {
    let cmd = UpdatePaymentCmd {
        payment_id: id,
        payment_date: payload.payment_date,
        amount: payload.amount_minor.map(MoneyCents::new),
        payment_method: payload.payment_method.map(engine_method),
        reference_number: payload.reference_number,
        notes: payload.notes,
        status: payload.status.map(engine_status),
        customer_id: payload.customer_id,
        supplier_id: payload.supplier_id,
    };
    let detail = state.engine.update_payment(cmd).await?;
    Ok(Json(payment_view(detail)))
}

pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_payment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
