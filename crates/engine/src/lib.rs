//! Back-office ledger engine.
//!
//! Keeps invoice totals, product stock, counterparty balances and ledger
//! entries consistent as invoices and payments are created, edited, reversed
//! or deleted. Every mutating operation runs in one database transaction.

pub use commands::{
    CreateInvoiceCmd, CreatePaymentCmd, CustomerListFilter, CustomerPatch, InvoiceListFilter,
    LedgerFilter, LineItemInput, NewCustomer, NewProduct, NewSupplier, PaymentListFilter,
    ProductListFilter, ProductPatch, SupplierListFilter, SupplierPatch, UpdateInvoiceCmd,
    UpdatePaymentCmd,
};
pub use counterparty::Counterparty;
pub use customers::{Customer, CustomerType};
pub use error::{EngineError, ErrorKind};
pub use invoices::{Invoice, InvoiceStatus, InvoiceType, SettlementStatus};
pub use ledger::{LedgerEntry, LedgerEntryType, running_balances};
pub use line_items::LineItem;
pub use money::MoneyCents;
pub use ops::{
    Balances, CounterpartyBalance, Engine, EngineBuilder, InvoiceDashboard, InvoiceDetail,
    InvoiceLineDetail, InvoiceList, InvoiceListSummary, LedgerReport, LedgerRow, PaymentDetail,
    ProductList, ProductListSummary,
};
pub use payments::{Payment, PaymentMethod, PaymentStatus, PaymentType};
pub use products::Product;
pub use stock_movements::{MANUAL_ADJUSTMENT, StockAdjustment, StockMovement};
pub use suppliers::Supplier;
pub use tax_rate::TaxRate;
pub use totals::{InvoiceTotals, LineAmounts, calculate_totals};

mod commands;
mod counterparty;
mod customers;
mod error;
mod invoices;
mod ledger;
mod line_items;
mod money;
mod ops;
mod payments;
mod products;
mod stock_movements;
mod suppliers;
mod tax_rate;
mod totals;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
