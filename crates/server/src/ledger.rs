use api_types::ledger::{
    BalancesResponse, CounterpartyBalanceView, LedgerEntryType as ApiEntryType,
    LedgerEntryView, LedgerQuery, LedgerResponse,
};
use axum::{Json, extract::State};
use engine::{CounterpartyBalance, LedgerEntryType, LedgerFilter, LedgerRow};

use crate::{ApiQuery, ServerError, server::ServerState};

fn map_entry_type(entry_type: LedgerEntryType) -> ApiEntryType {
    match entry_type {
        LedgerEntryType::Sale => ApiEntryType::Sale,
        LedgerEntryType::Purchase => ApiEntryType::Purchase,
        LedgerEntryType::PaymentReceived => ApiEntryType::PaymentReceived,
        LedgerEntryType::PaymentMade => ApiEntryType::PaymentMade,
        LedgerEntryType::Adjustment => ApiEntryType::Adjustment,
    }
}

fn engine_entry_type(entry_type: ApiEntryType) -> LedgerEntryType {
    match entry_type {
        ApiEntryType::Sale => LedgerEntryType::Sale,
        ApiEntryType::Purchase => LedgerEntryType::Purchase,
        ApiEntryType::PaymentReceived => LedgerEntryType::PaymentReceived,
        ApiEntryType::PaymentMade => LedgerEntryType::PaymentMade,
        ApiEntryType::Adjustment => LedgerEntryType::Adjustment,
    }
}

fn entry_view(row: LedgerRow) -> LedgerEntryView {
    let entry = row.entry;
    LedgerEntryView {
        id: entry.id,
        entry_date: entry.entry_date,
        description: entry.description,
        debit_minor: entry.debit_amount.cents(),
        credit_minor: entry.credit_amount.cents(),
        running_balance_minor: row.running_balance.cents(),
        entry_type: map_entry_type(entry.entry_type),
        customer_id: entry.customer_id,
        customer_name: row.customer_name,
        supplier_id: entry.supplier_id,
        supplier_name: row.supplier_name,
        invoice_id: entry.invoice_id,
        invoice_number: row.invoice_number,
        payment_id: entry.payment_id,
        payment_number: row.payment_number,
        created_at: entry.created_at,
    }
}

fn balance_view(balance: CounterpartyBalance) -> CounterpartyBalanceView {
    CounterpartyBalanceView {
        id: balance.id,
        name: balance.name,
        outstanding_balance_minor: balance.outstanding_balance.cents(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<LedgerQuery>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let filter = LedgerFilter {
        customer_id: query.customer_id,
        supplier_id: query.supplier_id,
        entry_type: query.entry_type.map(engine_entry_type),
        from: query.from,
        to: query.to,
    };
    let report = state.engine.list_ledger(&filter).await?;

    Ok(Json(LedgerResponse {
        final_balance_minor: report.final_balance.cents(),
        entries: report.entries.into_iter().map(entry_view).collect(),
    }))
}

pub async fn balances(
    State(state): State<ServerState>,
) -> Result<Json<BalancesResponse>, ServerError> {
    let balances = state.engine.balances().await?;

    Ok(Json(BalancesResponse {
        customers: balances.customers.into_iter().map(balance_view).collect(),
        suppliers: balances.suppliers.into_iter().map(balance_view).collect(),
        total_receivable_minor: balances.total_receivable.cents(),
        total_payable_minor: balances.total_payable.cents(),
    }))
}
