//! Request and response bodies of the HTTP API.
//!
//! Amounts are integer minor units (`*_minor`); tax rates are hundredths of
//! a percent (`1800` = 18%). Business dates are `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// One of `validation_error`, `not_found`, `consistency_error`,
    /// `internal_error`, `bad_request`.
    pub error: String,
    pub message: String,
}

pub mod product {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductNew {
        pub name: String,
        pub description: Option<String>,
        pub sku: Option<String>,
        pub category: Option<String>,
        pub retail_price_minor: i64,
        /// Defaults to the retail price.
        pub wholesale_price_minor: Option<i64>,
        pub cost_price_minor: Option<i64>,
        /// Opening stock.
        pub stock_quantity: Option<i64>,
        pub min_stock_level: Option<i64>,
        pub max_stock_level: Option<i64>,
        pub unit_of_measurement: Option<String>,
        pub barcode: Option<String>,
        pub tax_rate_hundredths: Option<i64>,
        pub is_active: Option<bool>,
    }

    /// Absent fields are left unchanged; an empty string clears a text field.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProductUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub sku: Option<String>,
        pub category: Option<String>,
        pub retail_price_minor: Option<i64>,
        pub wholesale_price_minor: Option<i64>,
        pub cost_price_minor: Option<i64>,
        pub min_stock_level: Option<i64>,
        pub max_stock_level: Option<i64>,
        pub unit_of_measurement: Option<String>,
        pub barcode: Option<String>,
        pub tax_rate_hundredths: Option<i64>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProductListQuery {
        pub search: Option<String>,
        pub category: Option<String>,
        pub low_stock: Option<bool>,
        /// Defaults to true.
        pub active_only: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
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
        pub is_low_stock: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductListResponse {
        pub products: Vec<ProductView>,
        pub total_products: usize,
        /// Retail value of the listed stock.
        pub total_stock_value_minor: i64,
        pub low_stock_count: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockAdjust {
        /// Relative change; the result is floored at zero.
        pub delta: i64,
        pub reason: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockAdjustmentView {
        pub product_id: Uuid,
        pub old_quantity: i64,
        pub new_quantity: i64,
        pub delta: i64,
        pub reason: String,
        pub clamped: bool,
    }
}

pub mod party {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CustomerType {
        Retail,
        Wholesale,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        pub phone_number: Option<String>,
        pub address: Option<String>,
        pub gstin: Option<String>,
        /// Defaults to retail.
        pub customer_type: Option<CustomerType>,
        pub notes: Option<String>,
        pub outstanding_balance_minor: Option<i64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CustomerUpdate {
        pub name: Option<String>,
        pub phone_number: Option<String>,
        pub address: Option<String>,
        pub gstin: Option<String>,
        pub customer_type: Option<CustomerType>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CustomerListQuery {
        pub search: Option<String>,
        pub customer_type: Option<CustomerType>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: Uuid,
        pub name: String,
        pub phone_number: Option<String>,
        pub address: Option<String>,
        pub gstin: Option<String>,
        pub customer_type: CustomerType,
        pub notes: Option<String>,
        pub outstanding_balance_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupplierNew {
        pub name: String,
        pub contact_person: Option<String>,
        pub phone_number: Option<String>,
        pub address: Option<String>,
        pub gstin: Option<String>,
        pub bank_name: Option<String>,
        pub bank_account_number: Option<String>,
        pub bank_ifsc_code: Option<String>,
        pub notes: Option<String>,
        pub outstanding_balance_minor: Option<i64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SupplierUpdate {
        pub name: Option<String>,
        pub contact_person: Option<String>,
        pub phone_number: Option<String>,
        pub address: Option<String>,
        pub gstin: Option<String>,
        pub bank_name: Option<String>,
        pub bank_account_number: Option<String>,
        pub bank_ifsc_code: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SupplierListQuery {
        pub search: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupplierView {
        pub id: Uuid,
        pub name: String,
        pub contact_person: Option<String>,
        pub phone_number: Option<String>,
        pub address: Option<String>,
        pub gstin: Option<String>,
        pub bank_name: Option<String>,
        pub bank_account_number: Option<String>,
        pub bank_ifsc_code: Option<String>,
        pub notes: Option<String>,
        pub outstanding_balance_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod invoice {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InvoiceType {
        Sales,
        Purchase,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InvoiceStatus {
        Draft,
        Sent,
        Paid,
        Partial,
        Overdue,
        Cancelled,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SettlementStatus {
        Unpaid,
        Partial,
        Paid,
    }

    /// A requested line. With a `product_id`, name, price and tax rate
    /// default from the product.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LineItemNew {
        pub product_id: Option<Uuid>,
        pub item_name: Option<String>,
        pub item_description: Option<String>,
        pub quantity: i64,
        pub unit_price_minor: Option<i64>,
        pub tax_rate_hundredths: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceNew {
        pub invoice_type: InvoiceType,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub invoice_number: Option<String>,
        pub invoice_date: NaiveDate,
        pub due_date: Option<NaiveDate>,
        pub discount_minor: Option<i64>,
        pub status: Option<InvoiceStatus>,
        pub notes: Option<String>,
        pub terms_conditions: Option<String>,
        #[serde(default)]
        pub line_items: Vec<LineItemNew>,
    }

    /// Absent fields are left unchanged. `line_items`, when present, replaces
    /// every line.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InvoiceUpdate {
        pub invoice_date: Option<NaiveDate>,
        pub due_date: Option<NaiveDate>,
        pub discount_minor: Option<i64>,
        pub status: Option<InvoiceStatus>,
        pub notes: Option<String>,
        pub terms_conditions: Option<String>,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub line_items: Option<Vec<LineItemNew>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InvoiceListQuery {
        pub invoice_type: Option<InvoiceType>,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub status: Option<InvoiceStatus>,
        pub search: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoicePayment {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceNumberRequest {
        pub invoice_type: InvoiceType,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceNumber {
        pub invoice_number: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DashboardQuery {
        /// Defaults to the current UTC date.
        pub today: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LineItemView {
        pub id: Uuid,
        pub position: i32,
        pub product_id: Option<Uuid>,
        /// Absent when the product was deleted.
        pub product_name: Option<String>,
        pub product_sku: Option<String>,
        pub item_name: String,
        pub item_description: Option<String>,
        pub quantity: i64,
        pub unit_price_minor: i64,
        pub tax_rate_hundredths: i64,
        pub line_subtotal_minor: i64,
        pub tax_minor: i64,
        pub line_total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceView {
        pub id: Uuid,
        pub invoice_number: String,
        pub invoice_type: InvoiceType,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub counterparty_name: Option<String>,
        pub invoice_date: NaiveDate,
        pub due_date: Option<NaiveDate>,
        pub subtotal_minor: i64,
        pub tax_minor: i64,
        pub discount_minor: i64,
        pub total_minor: i64,
        pub paid_minor: i64,
        pub outstanding_minor: i64,
        pub status: InvoiceStatus,
        pub payment_status: SettlementStatus,
        pub notes: Option<String>,
        pub terms_conditions: Option<String>,
        pub line_items: Vec<LineItemView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceListResponse {
        pub invoices: Vec<InvoiceView>,
        pub total_invoices: usize,
        pub total_amount_minor: i64,
        pub total_outstanding_minor: i64,
        pub paid_invoices: usize,
        pub unpaid_invoices: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardResponse {
        pub recent_invoices: Vec<InvoiceView>,
        pub overdue_invoices: Vec<InvoiceView>,
        pub overdue_count: usize,
        pub total_sales_minor: i64,
        pub total_purchases_minor: i64,
        pub total_outstanding_minor: i64,
    }
}

pub mod payment {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentType {
        Received,
        Made,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        Cash,
        BankTransfer,
        Upi,
        Cheque,
        Card,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentStatus {
        Completed,
        Pending,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub payment_type: PaymentType,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub amount_minor: i64,
        pub payment_date: NaiveDate,
        pub payment_number: Option<String>,
        /// Defaults to cash.
        pub payment_method: Option<PaymentMethod>,
        pub reference_number: Option<String>,
        pub notes: Option<String>,
        pub invoice_id: Option<Uuid>,
        /// Defaults to completed.
        pub status: Option<PaymentStatus>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentUpdate {
        pub payment_date: Option<NaiveDate>,
        pub amount_minor: Option<i64>,
        pub payment_method: Option<PaymentMethod>,
        pub reference_number: Option<String>,
        pub notes: Option<String>,
        pub status: Option<PaymentStatus>,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentListQuery {
        pub payment_type: Option<PaymentType>,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub invoice_id: Option<Uuid>,
        pub status: Option<PaymentStatus>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: Uuid,
        pub payment_number: String,
        pub payment_date: NaiveDate,
        pub amount_minor: i64,
        pub payment_method: PaymentMethod,
        pub reference_number: Option<String>,
        pub notes: Option<String>,
        pub payment_type: PaymentType,
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub counterparty_name: Option<String>,
        pub invoice_id: Option<Uuid>,
        pub invoice_number: Option<String>,
        pub status: PaymentStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod ledger {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LedgerEntryType {
        Sale,
        Purchase,
        PaymentReceived,
        PaymentMade,
        Adjustment,
    }

    /// Both date bounds are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerQuery {
        pub customer_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub entry_type: Option<LedgerEntryType>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerEntryView {
        pub id: i64,
        pub entry_date: NaiveDate,
        pub description: String,
        pub debit_minor: i64,
        pub credit_minor: i64,
        pub running_balance_minor: i64,
        pub entry_type: LedgerEntryType,
        pub customer_id: Option<Uuid>,
        pub customer_name: Option<String>,
        pub supplier_id: Option<Uuid>,
        pub supplier_name: Option<String>,
        pub invoice_id: Option<Uuid>,
        pub invoice_number: Option<String>,
        pub payment_id: Option<Uuid>,
        pub payment_number: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerResponse {
        /// Newest first.
        pub entries: Vec<LedgerEntryView>,
        pub final_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CounterpartyBalanceView {
        pub id: Uuid,
        pub name: String,
        pub outstanding_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalancesResponse {
        pub customers: Vec<CounterpartyBalanceView>,
        pub suppliers: Vec<CounterpartyBalanceView>,
        pub total_receivable_minor: i64,
        pub total_payable_minor: i64,
    }
}
