//! Command structs for engine operations.
//!
//! These types group parameters for write operations (catalog, parties,
//! invoices, payments), keeping call sites readable and avoiding long
//! argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    CustomerType, InvoiceStatus, InvoiceType, LedgerEntryType, MoneyCents, PaymentMethod,
    PaymentStatus, PaymentType, TaxRate,
};

/// Create a catalog product.
#[derive(Clone, Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub retail_price: MoneyCents,
    pub wholesale_price: MoneyCents,
    pub cost_price: MoneyCents,
    /// Opening on-hand quantity, recorded as a stock movement.
    pub stock_quantity: i64,
    pub min_stock_level: i64,
    pub max_stock_level: i64,
    pub unit_of_measurement: String,
    pub barcode: Option<String>,
    pub tax_rate: TaxRate,
    pub is_active: bool,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, retail_price: MoneyCents) -> Self {
        Self {
            name: name.into(),
            description: None,
            sku: None,
            category: None,
            retail_price,
            wholesale_price: retail_price,
            cost_price: MoneyCents::ZERO,
            stock_quantity: 0,
            min_stock_level: 0,
            max_stock_level: 1000,
            unit_of_measurement: "pcs".to_string(),
            barcode: None,
            tax_rate: TaxRate::ZERO,
            is_active: true,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn wholesale_price(mut self, price: MoneyCents) -> Self {
        self.wholesale_price = price;
        self
    }

    #[must_use]
    pub fn cost_price(mut self, price: MoneyCents) -> Self {
        self.cost_price = price;
        self
    }

    #[must_use]
    pub fn stock_quantity(mut self, quantity: i64) -> Self {
        self.stock_quantity = quantity;
        self
    }

    #[must_use]
    pub fn stock_levels(mut self, min: i64, max: i64) -> Self {
        self.min_stock_level = min;
        self.max_stock_level = max;
        self
    }

    #[must_use]
    pub fn unit_of_measurement(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measurement = unit.into();
        self
    }

    #[must_use]
    pub fn barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    #[must_use]
    pub fn tax_rate(mut self, tax_rate: TaxRate) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Partial update of a product. `None` keeps the current value; for optional
/// text fields an empty string clears it.
///
/// Stock is not patchable here: use `Engine::adjust_stock`.
#[derive(Clone, Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub retail_price: Option<MoneyCents>,
    pub wholesale_price: Option<MoneyCents>,
    pub cost_price: Option<MoneyCents>,
    pub min_stock_level: Option<i64>,
    pub max_stock_level: Option<i64>,
    pub unit_of_measurement: Option<String>,
    pub barcode: Option<String>,
    pub tax_rate: Option<TaxRate>,
    pub is_active: Option<bool>,
}

impl ProductPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    #[must_use]
    pub fn retail_price(mut self, price: MoneyCents) -> Self {
        self.retail_price = Some(price);
        self
    }

    #[must_use]
    pub fn tax_rate(mut self, tax_rate: TaxRate) -> Self {
        self.tax_rate = Some(tax_rate);
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

#[derive(Clone, Debug)]
pub struct ProductListFilter {
    /// Matched against name, description, sku and barcode.
    pub search: Option<String>,
    pub category: Option<String>,
    pub low_stock: bool,
    /// Default: true.
    pub active_only: bool,
}

impl Default for ProductListFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            low_stock: false,
            active_only: true,
        }
    }
}

/// Create a customer.
#[derive(Clone, Debug)]
pub struct NewCustomer {
    pub name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub customer_type: CustomerType,
    pub notes: Option<String>,
    /// Opening balance owed by the customer.
    pub outstanding_balance: MoneyCents,
}

impl NewCustomer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone_number: None,
            address: None,
            gstin: None,
            customer_type: CustomerType::Retail,
            notes: None,
            outstanding_balance: MoneyCents::ZERO,
        }
    }

    #[must_use]
    pub fn phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn gstin(mut self, gstin: impl Into<String>) -> Self {
        self.gstin = Some(gstin.into());
        self
    }

    #[must_use]
    pub fn customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = customer_type;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn outstanding_balance(mut self, balance: MoneyCents) -> Self {
        self.outstanding_balance = balance;
        self
    }
}

/// Partial update of a customer. The outstanding balance is not patchable:
/// it only moves through payments.
#[derive(Clone, Debug, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub notes: Option<String>,
}

impl CustomerPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    #[must_use]
    pub fn customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = Some(customer_type);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct CustomerListFilter {
    /// Matched against name and phone number.
    pub search: Option<String>,
    pub customer_type: Option<CustomerType>,
}

/// Create a supplier.
#[derive(Clone, Debug)]
pub struct NewSupplier {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_ifsc_code: Option<String>,
    pub notes: Option<String>,
    /// Opening balance the shop owes the supplier.
    pub outstanding_balance: MoneyCents,
}

impl NewSupplier {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact_person: None,
            phone_number: None,
            address: None,
            gstin: None,
            bank_name: None,
            bank_account_number: None,
            bank_ifsc_code: None,
            notes: None,
            outstanding_balance: MoneyCents::ZERO,
        }
    }

    #[must_use]
    pub fn contact_person(mut self, contact: impl Into<String>) -> Self {
        self.contact_person = Some(contact.into());
        self
    }

    #[must_use]
    pub fn phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    #[must_use]
    pub fn bank_details(
        mut self,
        bank_name: impl Into<String>,
        account_number: impl Into<String>,
        ifsc_code: impl Into<String>,
    ) -> Self {
        self.bank_name = Some(bank_name.into());
        self.bank_account_number = Some(account_number.into());
        self.bank_ifsc_code = Some(ifsc_code.into());
        self
    }

    #[must_use]
    pub fn outstanding_balance(mut self, balance: MoneyCents) -> Self {
        self.outstanding_balance = balance;
        self
    }
}

/// Partial update of a supplier.
#[derive(Clone, Debug, Default)]
pub struct SupplierPatch {
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

impl SupplierPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn contact_person(mut self, contact: impl Into<String>) -> Self {
        self.contact_person = Some(contact.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct SupplierListFilter {
    /// Matched against name, contact person and phone number.
    pub search: Option<String>,
}

/// One line of an invoice as requested by the caller.
///
/// Product-bearing lines take their name from the product; price and tax rate
/// default from it unless given. Free-text lines need an `item_name`.
#[derive(Clone, Debug)]
pub struct LineItemInput {
    pub product_id: Option<Uuid>,
    pub item_name: Option<String>,
    pub item_description: Option<String>,
    pub quantity: i64,
    pub unit_price: Option<MoneyCents>,
    pub tax_rate: Option<TaxRate>,
}

impl LineItemInput {
    #[must_use]
    pub fn product(product_id: Uuid, quantity: i64) -> Self {
        Self {
            product_id: Some(product_id),
            item_name: None,
            item_description: None,
            quantity,
            unit_price: None,
            tax_rate: None,
        }
    }

    #[must_use]
    pub fn free_text(item_name: impl Into<String>, quantity: i64, unit_price: MoneyCents) -> Self {
        Self {
            product_id: None,
            item_name: Some(item_name.into()),
            item_description: None,
            quantity,
            unit_price: Some(unit_price),
            tax_rate: None,
        }
    }

    #[must_use]
    pub fn unit_price(mut self, unit_price: MoneyCents) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    #[must_use]
    pub fn tax_rate(mut self, tax_rate: TaxRate) -> Self {
        self.tax_rate = Some(tax_rate);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.item_description = Some(description.into());
        self
    }
}

/// Create an invoice with its lines.
#[derive(Clone, Debug)]
pub struct CreateInvoiceCmd {
    pub invoice_type: InvoiceType,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    /// Generated when absent.
    pub invoice_number: Option<String>,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub discount_amount: MoneyCents,
    /// Only manual statuses are accepted; defaults to draft.
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,
    pub terms_conditions: Option<String>,
    pub line_items: Vec<LineItemInput>,
}

impl CreateInvoiceCmd {
    #[must_use]
    pub fn new(invoice_type: InvoiceType, invoice_date: NaiveDate) -> Self {
        Self {
            invoice_type,
            customer_id: None,
            supplier_id: None,
            invoice_number: None,
            invoice_date,
            due_date: None,
            discount_amount: MoneyCents::ZERO,
            status: None,
            notes: None,
            terms_conditions: None,
            line_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn sales(customer_id: Uuid, invoice_date: NaiveDate) -> Self {
        Self::new(InvoiceType::Sales, invoice_date).customer_id(customer_id)
    }

    #[must_use]
    pub fn purchase(supplier_id: Uuid, invoice_date: NaiveDate) -> Self {
        Self::new(InvoiceType::Purchase, invoice_date).supplier_id(supplier_id)
    }

    #[must_use]
    pub fn customer_id(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    #[must_use]
    pub fn supplier_id(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    #[must_use]
    pub fn invoice_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = Some(number.into());
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn discount(mut self, discount: MoneyCents) -> Self {
        self.discount_amount = discount;
        self
    }

    #[must_use]
    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn terms_conditions(mut self, terms: impl Into<String>) -> Self {
        self.terms_conditions = Some(terms.into());
        self
    }

    #[must_use]
    pub fn line(mut self, line: LineItemInput) -> Self {
        self.line_items.push(line);
        self
    }
}

/// Update an invoice header and, optionally, replace all of its lines.
#[derive(Clone, Debug)]
pub struct UpdateInvoiceCmd {
    pub invoice_id: Uuid,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub discount_amount: Option<MoneyCents>,
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,
    pub terms_conditions: Option<String>,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    /// When present, replaces every existing line.
    pub line_items: Option<Vec<LineItemInput>>,
}

impl UpdateInvoiceCmd {
    #[must_use]
    pub fn new(invoice_id: Uuid) -> Self {
        Self {
            invoice_id,
            invoice_date: None,
            due_date: None,
            discount_amount: None,
            status: None,
            notes: None,
            terms_conditions: None,
            customer_id: None,
            supplier_id: None,
            line_items: None,
        }
    }

    #[must_use]
    pub fn invoice_date(mut self, date: NaiveDate) -> Self {
        self.invoice_date = Some(date);
        self
    }

    #[must_use]
    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    #[must_use]
    pub fn discount(mut self, discount: MoneyCents) -> Self {
        self.discount_amount = Some(discount);
        self
    }

    #[must_use]
    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn terms_conditions(mut self, terms: impl Into<String>) -> Self {
        self.terms_conditions = Some(terms.into());
        self
    }

    #[must_use]
    pub fn customer_id(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    #[must_use]
    pub fn supplier_id(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    #[must_use]
    pub fn line_items(mut self, lines: Vec<LineItemInput>) -> Self {
        self.line_items = Some(lines);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct InvoiceListFilter {
    pub invoice_type: Option<InvoiceType>,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
    /// Matched against invoice number and notes.
    pub search: Option<String>,
}

/// Record a payment and post it to the ledger.
#[derive(Clone, Debug)]
pub struct CreatePaymentCmd {
    pub payment_type: PaymentType,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub amount: MoneyCents,
    pub payment_date: NaiveDate,
    /// Generated when absent.
    pub payment_number: Option<String>,
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub invoice_id: Option<Uuid>,
    pub status: PaymentStatus,
}

impl CreatePaymentCmd {
    #[must_use]
    pub fn new(payment_type: PaymentType, amount: MoneyCents, payment_date: NaiveDate) -> Self {
        Self {
            payment_type,
            customer_id: None,
            supplier_id: None,
            amount,
            payment_date,
            payment_number: None,
            payment_method: PaymentMethod::Cash,
            reference_number: None,
            notes: None,
            invoice_id: None,
            status: PaymentStatus::Completed,
        }
    }

    #[must_use]
    pub fn received(customer_id: Uuid, amount: MoneyCents, payment_date: NaiveDate) -> Self {
        Self::new(PaymentType::Received, amount, payment_date).customer_id(customer_id)
    }

    #[must_use]
    pub fn made(supplier_id: Uuid, amount: MoneyCents, payment_date: NaiveDate) -> Self {
        Self::new(PaymentType::Made, amount, payment_date).supplier_id(supplier_id)
    }

    #[must_use]
    pub fn customer_id(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    #[must_use]
    pub fn supplier_id(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    #[must_use]
    pub fn payment_number(mut self, number: impl Into<String>) -> Self {
        self.payment_number = Some(number.into());
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    #[must_use]
    pub fn reference_number(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn invoice_id(mut self, invoice_id: Uuid) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }

    #[must_use]
    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }
}

/// Patch a payment. Changing the amount, counterparty or date reposts its
/// ledger entries and balance effect.
#[derive(Clone, Debug)]
pub struct UpdatePaymentCmd {
    pub payment_id: Uuid,
    pub payment_date: Option<NaiveDate>,
    pub amount: Option<MoneyCents>,
    pub payment_method: Option<PaymentMethod>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub status: Option<PaymentStatus>,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
}

impl UpdatePaymentCmd {
    #[must_use]
    pub fn new(payment_id: Uuid) -> Self {
        Self {
            payment_id,
            payment_date: None,
            amount: None,
            payment_method: None,
            reference_number: None,
            notes: None,
            status: None,
            customer_id: None,
            supplier_id: None,
        }
    }

    #[must_use]
    pub fn payment_date(mut self, date: NaiveDate) -> Self {
        self.payment_date = Some(date);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    #[must_use]
    pub fn reference_number(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn customer_id(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    #[must_use]
    pub fn supplier_id(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct PaymentListFilter {
    pub payment_type: Option<PaymentType>,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Ledger query filters. Both date bounds are inclusive.
#[derive(Clone, Debug, Default)]
pub struct LedgerFilter {
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub entry_type: Option<LedgerEntryType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
