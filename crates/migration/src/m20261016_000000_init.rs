//! Initial schema migration - creates all tables from scratch.
//!
//! - `products`: catalog with on-hand stock
//! - `customers` / `suppliers`: counterparties with outstanding balances
//! - `invoices` + `invoice_line_items`: sales and purchase invoices
//! - `payments`: money received and paid
//! - `ledger_entries`: paired debit/credit postings per payment
//! - `stock_movements`: audit trail of every stock adjustment
//!
//! Amounts are integer minor units (`*_minor`). Apart from line items to
//! invoices, references between tables are soft: no foreign keys.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    Description,
    Sku,
    Category,
    RetailPriceMinor,
    WholesalePriceMinor,
    CostPriceMinor,
    StockQuantity,
    MinStockLevel,
    MaxStockLevel,
    UnitOfMeasurement,
    Barcode,
    TaxRateHundredths,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    PhoneNumber,
    Address,
    Gstin,
    CustomerType,
    Notes,
    OutstandingBalanceMinor,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Suppliers {
    Table,
    Id,
    Name,
    ContactPerson,
    PhoneNumber,
    Address,
    Gstin,
    BankName,
    BankAccountNumber,
    BankIfscCode,
    Notes,
    OutstandingBalanceMinor,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Invoices {
    Table,
    Id,
    InvoiceNumber,
    InvoiceType,
    CustomerId,
    SupplierId,
    InvoiceDate,
    DueDate,
    SubtotalMinor,
    TaxMinor,
    DiscountMinor,
    TotalMinor,
    PaidMinor,
    Status,
    Notes,
    TermsConditions,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum InvoiceLineItems {
    Table,
    Id,
    InvoiceId,
    Position,
    ProductId,
    ItemName,
    ItemDescription,
    Quantity,
    UnitPriceMinor,
    TaxRateHundredths,
    LineSubtotalMinor,
    TaxMinor,
    LineTotalMinor,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    PaymentNumber,
    PaymentDate,
    AmountMinor,
    PaymentMethod,
    ReferenceNumber,
    Notes,
    PaymentType,
    InvoiceId,
    CustomerId,
    SupplierId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    EntryDate,
    Description,
    DebitMinor,
    CreditMinor,
    CustomerId,
    SupplierId,
    InvoiceId,
    PaymentId,
    EntryType,
    CreatedAt,
}

#[derive(Iden)]
enum StockMovements {
    Table,
    Id,
    ProductId,
    OldQuantity,
    NewQuantity,
    Delta,
    Reason,
    InvoiceId,
    CreatedAt,
}

fn money(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .default(0)
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Products
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Description).string())
                    .col(ColumnDef::new(Products::Sku).string().unique_key())
                    .col(ColumnDef::new(Products::Category).string())
                    .col(money(Products::RetailPriceMinor))
                    .col(money(Products::WholesalePriceMinor))
                    .col(money(Products::CostPriceMinor))
                    .col(
                        ColumnDef::new(Products::StockQuantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Products::MinStockLevel)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Products::MaxStockLevel)
                            .big_integer()
                            .not_null()
                            .default(1000),
                    )
                    .col(
                        ColumnDef::new(Products::UnitOfMeasurement)
                            .string()
                            .not_null()
                            .default("pcs"),
                    )
                    .col(ColumnDef::new(Products::Barcode).string())
                    .col(
                        ColumnDef::new(Products::TaxRateHundredths)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Products::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Products::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-products-name")
                    .table(Products::Table)
                    .col(Products::Name)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Customers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::PhoneNumber).string())
                    .col(ColumnDef::new(Customers::Address).string())
                    .col(ColumnDef::new(Customers::Gstin).string())
                    .col(
                        ColumnDef::new(Customers::CustomerType)
                            .string()
                            .not_null()
                            .default("retail"),
                    )
                    .col(ColumnDef::new(Customers::Notes).string())
                    .col(money(Customers::OutstandingBalanceMinor))
                    .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Customers::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Suppliers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suppliers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Suppliers::Name).string().not_null())
                    .col(ColumnDef::new(Suppliers::ContactPerson).string())
                    .col(ColumnDef::new(Suppliers::PhoneNumber).string())
                    .col(ColumnDef::new(Suppliers::Address).string())
                    .col(ColumnDef::new(Suppliers::Gstin).string())
                    .col(ColumnDef::new(Suppliers::BankName).string())
                    .col(ColumnDef::new(Suppliers::BankAccountNumber).string())
                    .col(ColumnDef::new(Suppliers::BankIfscCode).string())
                    .col(ColumnDef::new(Suppliers::Notes).string())
                    .col(money(Suppliers::OutstandingBalanceMinor))
                    .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Invoices
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Invoices::InvoiceNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Invoices::InvoiceType).string().not_null())
                    .col(ColumnDef::new(Invoices::CustomerId).string())
                    .col(ColumnDef::new(Invoices::SupplierId).string())
                    .col(ColumnDef::new(Invoices::InvoiceDate).date().not_null())
                    .col(ColumnDef::new(Invoices::DueDate).date())
                    .col(money(Invoices::SubtotalMinor))
                    .col(money(Invoices::TaxMinor))
                    .col(money(Invoices::DiscountMinor))
                    .col(money(Invoices::TotalMinor))
                    .col(money(Invoices::PaidMinor))
                    .col(
                        ColumnDef::new(Invoices::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Invoices::Notes).string())
                    .col(ColumnDef::new(Invoices::TermsConditions).string())
                    .col(ColumnDef::new(Invoices::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Invoices::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoices-customer_id")
                    .table(Invoices::Table)
                    .col(Invoices::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoices-supplier_id")
                    .table(Invoices::Table)
                    .col(Invoices::SupplierId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoices-invoice_date")
                    .table(Invoices::Table)
                    .col(Invoices::InvoiceDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Invoice line items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(InvoiceLineItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvoiceLineItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvoiceLineItems::InvoiceId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceLineItems::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvoiceLineItems::ProductId).string())
                    .col(
                        ColumnDef::new(InvoiceLineItems::ItemName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvoiceLineItems::ItemDescription).string())
                    .col(
                        ColumnDef::new(InvoiceLineItems::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(money(InvoiceLineItems::UnitPriceMinor))
                    .col(
                        ColumnDef::new(InvoiceLineItems::TaxRateHundredths)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(money(InvoiceLineItems::LineSubtotalMinor))
                    .col(money(InvoiceLineItems::TaxMinor))
                    .col(money(InvoiceLineItems::LineTotalMinor))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-invoice_line_items-invoice_id")
                            .from(InvoiceLineItems::Table, InvoiceLineItems::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoice_line_items-invoice_id-position")
                    .table(InvoiceLineItems::Table)
                    .col(InvoiceLineItems::InvoiceId)
                    .col(InvoiceLineItems::Position)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::PaymentNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::PaymentDate).date().not_null())
                    .col(
                        ColumnDef::new(Payments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::PaymentMethod)
                            .string()
                            .not_null()
                            .default("cash"),
                    )
                    .col(ColumnDef::new(Payments::ReferenceNumber).string())
                    .col(ColumnDef::new(Payments::Notes).string())
                    .col(ColumnDef::new(Payments::PaymentType).string().not_null())
                    .col(ColumnDef::new(Payments::InvoiceId).string())
                    .col(ColumnDef::new(Payments::CustomerId).string())
                    .col(ColumnDef::new(Payments::SupplierId).string())
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string()
                            .not_null()
                            .default("completed"),
                    )
                    .col(ColumnDef::new(Payments::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Payments::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-payment_date")
                    .table(Payments::Table)
                    .col(Payments::PaymentDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Ledger entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerEntries::EntryDate).date().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::Description)
                            .string()
                            .not_null(),
                    )
                    .col(money(LedgerEntries::DebitMinor))
                    .col(money(LedgerEntries::CreditMinor))
                    .col(ColumnDef::new(LedgerEntries::CustomerId).string())
                    .col(ColumnDef::new(LedgerEntries::SupplierId).string())
                    .col(ColumnDef::new(LedgerEntries::InvoiceId).string())
                    .col(ColumnDef::new(LedgerEntries::PaymentId).string())
                    .col(ColumnDef::new(LedgerEntries::EntryType).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-entry_date-id")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::EntryDate)
                    .col(LedgerEntries::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-payment_id")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::PaymentId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Stock movements
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(StockMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockMovements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockMovements::ProductId).string().not_null())
                    .col(
                        ColumnDef::new(StockMovements::OldQuantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockMovements::NewQuantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockMovements::Delta).big_integer().not_null())
                    .col(ColumnDef::new(StockMovements::Reason).string().not_null())
                    .col(ColumnDef::new(StockMovements::InvoiceId).string())
                    .col(
                        ColumnDef::new(StockMovements::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stock_movements-product_id")
                    .table(StockMovements::Table)
                    .col(StockMovements::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Line items reference invoices; drop them first.
        manager
            .drop_table(Table::drop().table(StockMovements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvoiceLineItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        Ok(())
    }
}
