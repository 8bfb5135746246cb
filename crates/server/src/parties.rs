//! Customer and supplier endpoints

use api_types::party::{
    CustomerListQuery, CustomerNew, CustomerType as ApiCustomerType, CustomerUpdate,
    CustomerView, SupplierListQuery, SupplierNew, SupplierUpdate, SupplierView,
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{
    CustomerListFilter, CustomerPatch, CustomerType, MoneyCents, NewCustomer, NewSupplier,
    SupplierListFilter, SupplierPatch,
};
use uuid::Uuid;

use crate::{ApiJson, ApiPath, ApiQuery, ServerError, server::ServerState};

fn map_customer_type(customer_type: CustomerType) -> ApiCustomerType {
    match customer_type {
        CustomerType::Retail => ApiCustomerType::Retail,
        CustomerType::Wholesale => ApiCustomerType::Wholesale,
    }
}

fn engine_customer_type(customer_type: ApiCustomerType) -> CustomerType {
    match customer_type {
        ApiCustomerType::Retail => CustomerType::Retail,
        ApiCustomerType::Wholesale => CustomerType::Wholesale,
    }
}

fn customer_view(customer: engine::Customer) -> CustomerView {
    CustomerView {
        id: customer.id,
        name: customer.name,
        phone_number: customer.phone_number,
        address: customer.address,
        gstin: customer.gstin,
        customer_type: map_customer_type(customer.customer_type),
        notes: customer.notes,
        outstanding_balance_minor: customer.outstanding_balance.cents(),
        created_at: customer.created_at,
        updated_at: customer.updated_at,
    }
}

fn supplier_view(supplier: engine::Supplier) -> SupplierView {
    SupplierView {
        id: supplier.id,
        name: supplier.name,
        contact_person: supplier.contact_person,
        phone_number: supplier.phone_number,
        address: supplier.address,
        gstin: supplier.gstin,
        bank_name: supplier.bank_name,
        bank_account_number: supplier.bank_account_number,
        bank_ifsc_code: supplier.bank_ifsc_code,
        notes: supplier.notes,
        outstanding_balance_minor: supplier.outstanding_balance.cents(),
        created_at: supplier.created_at,
        updated_at: supplier.updated_at,
    }
}

pub async fn list_customers(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<CustomerListQuery>,
) -> Result<Json<Vec<CustomerView>>, ServerError> {
    let filter = CustomerListFilter {
        search: query.search,
        customer_type: query.customer_type.map(engine_customer_type),
    };
    let customers = state.engine.list_customers(&filter).await?;
    Ok(Json(customers.into_iter().map(customer_view).collect()))
}

pub async fn create_customer(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<CustomerNew>,
) -> Result<(StatusCode, Json<CustomerView>), ServerError> {
    let cmd = NewCustomer {
        name: payload.name,
        phone_number: payload.phone_number,
        address: payload.address,
        gstin: payload.gstin,
        customer_type: payload
            .customer_type
            .map(engine_customer_type)
            .unwrap_or_default(),
        notes: payload.notes,
        outstanding_balance: MoneyCents::new(payload.outstanding_balance_minor.unwrap_or(0)),
    };
    let customer = state.engine.create_customer(cmd).await?;
    Ok((StatusCode::CREATED, Json(customer_view(customer))))
}

pub async fn get_customer(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CustomerView>, ServerError> {
    Ok(Json(customer_view(state.engine.customer(id).await?)))
}

pub async fn update_customer(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CustomerUpdate>,
) -> Result<Json<CustomerView>, ServerError> {
    let patch = CustomerPatch {
        name: payload.name,
        phone_number: payload.phone_number,
        address: payload.address,
        gstin: payload.gstin,
        customer_type: payload.customer_type.map(engine_customer_type),
        notes: payload.notes,
    };
    let customer = state.engine.update_customer(id, patch).await?;
    Ok(Json(customer_view(customer)))
}

pub async fn delete_customer(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_suppliers(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<SupplierListQuery>,
) -> Result<Json<Vec<SupplierView>>, ServerError> {
    let filter = SupplierListFilter {
        search: query.search,
    };
    let suppliers = state.engine.list_suppliers(&filter).await?;
    Ok(Json(suppliers.into_iter().map(supplier_view).collect()))
}

pub async fn create_supplier(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<SupplierNew>,
) -> Result<(StatusCode, Json<SupplierView>), ServerError> {
    let cmd = NewSupplier {
        name: payload.name,
        contact_person: payload.contact_person,
        phone_number: payload.phone_number,
        address: payload.address,
        gstin: payload.gstin,
        bank_name: payload.bank_name,
        bank_account_number: payload.bank_account_number,
        bank_ifsc_code: payload.bank_ifsc_code,
        notes: payload.notes,
        outstanding_balance: MoneyCents::new(payload.outstanding_balance_minor.unwrap_or(0)),
    };
    let supplier = state.engine.create_supplier(cmd).await?;
    Ok((StatusCode::CREATED, Json(supplier_view(supplier))))
}

pub async fn get_supplier(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SupplierView>, ServerError> {
    Ok(Json(supplier_view(state.engine.supplier(id).await?)))
}

pub async fn update_supplier(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<SupplierUpdate>,
) -> Result<Json<SupplierView>, ServerError> {
    let patch = SupplierPatch {
        name: payload.name,
        contact_person: payload.contact_person,
        phone_number: payload.phone_number,
        address: payload.address,
        gstin: payload.gstin,
        bank_name: payload.bank_name,
        bank_account_number: payload.bank_account_number,
        bank_ifsc_code: payload.bank_ifsc_code,
        notes: payload.notes,
    };
    let supplier = state.engine.update_supplier(id, patch).await?;
    Ok(Json(supplier_view(supplier)))
}

pub async fn delete_supplier(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_supplier(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
