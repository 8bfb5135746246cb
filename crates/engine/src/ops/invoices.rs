use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, Invoice, LineItem, MoneyCents, ResultEngine, SettlementStatus, invoices,
    line_items, products,
};

use super::parties::PartyNames;

mod read;
mod write;

/// A line item with its product resolved (absent when the product is gone).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineDetail {
    pub line: LineItem,
    pub product_name: Option<String>,
    pub product_sku: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub invoice: Invoice,
    pub outstanding_amount: MoneyCents,
    pub payment_status: SettlementStatus,
    /// Absent when the counterparty row is gone.
    pub counterparty_name: Option<String>,
    /// Ordered by position.
    pub line_items: Vec<InvoiceLineDetail>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceListSummary {
    pub total_invoices: usize,
    pub total_amount: MoneyCents,
    pub total_outstanding: MoneyCents,
    pub paid_invoices: usize,
    pub unpaid_invoices: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceList {
    pub invoices: Vec<InvoiceDetail>,
    pub summary: InvoiceListSummary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDashboard {
    /// The 10 most recently created invoices.
    pub recent_invoices: Vec<InvoiceDetail>,
    pub overdue_invoices: Vec<InvoiceDetail>,
    pub total_sales: MoneyCents,
    pub total_purchases: MoneyCents,
    pub total_outstanding: MoneyCents,
    pub overdue_count: usize,
}

impl InvoiceListSummary {
    fn from_invoices(invoices: &[InvoiceDetail]) -> Self {
        let paid_invoices = invoices.iter().filter(|d| d.invoice.is_paid()).count();
        Self {
            total_invoices: invoices.len(),
            total_amount: invoices.iter().map(|d| d.invoice.total_amount).sum(),
            total_outstanding: invoices.iter().map(|d| d.outstanding_amount).sum(),
            paid_invoices,
            unpaid_invoices: invoices.len() - paid_invoices,
        }
    }
}

pub(crate) async fn require_invoice<C: ConnectionTrait>(
    db: &C,
    invoice_id: Uuid,
) -> ResultEngine<Invoice> {
    let model = invoices::Entity::find_by_id(invoice_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("invoice not exists".to_string()))?;
    Invoice::try_from(model)
}

pub(crate) async fn invoice_lines<C: ConnectionTrait>(
    db: &C,
    invoice_id: Uuid,
) -> ResultEngine<Vec<LineItem>> {
    line_items::Entity::find()
        .filter(line_items::Column::InvoiceId.eq(invoice_id.to_string()))
        .order_by_asc(line_items::Column::Position)
        .all(db)
        .await?
        .into_iter()
        .map(LineItem::try_from)
        .collect()
}

/// Attaches lines, product and counterparty names to invoices, in batch.
pub(crate) async fn hydrate_invoices<C: ConnectionTrait>(
    db: &C,
    invoices: Vec<Invoice>,
) -> ResultEngine<Vec<InvoiceDetail>> {
    if invoices.is_empty() {
        return Ok(Vec::new());
    }

    let invoice_ids: Vec<String> = invoices.iter().map(|i| i.id.to_string()).collect();
    let mut lines_by_invoice: HashMap<Uuid, Vec<LineItem>> = HashMap::new();
    for model in line_items::Entity::find()
        .filter(line_items::Column::InvoiceId.is_in(invoice_ids))
        .order_by_asc(line_items::Column::Position)
        .all(db)
        .await?
    {
        let line = LineItem::try_from(model)?;
        lines_by_invoice.entry(line.invoice_id).or_default().push(line);
    }

    let product_ids: BTreeSet<String> = lines_by_invoice
        .values()
        .flatten()
        .filter_map(|line| line.product_id)
        .map(|id| id.to_string())
        .collect();
    let products_by_id: HashMap<String, products::Model> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id.clone(), model))
            .collect()
    };

    let names = PartyNames::load(db, invoices.iter().map(|i| i.counterparty)).await?;

    Ok(invoices
        .into_iter()
        .map(|invoice| {
            let line_items = lines_by_invoice
                .remove(&invoice.id)
                .unwrap_or_default()
                .into_iter()
                .map(|line| {
                    let product = line
                        .product_id
                        .and_then(|id| products_by_id.get(&id.to_string()));
                    InvoiceLineDetail {
                        product_name: product.map(|p| p.name.clone()),
                        product_sku: product.and_then(|p| p.sku.clone()),
                        line,
                    }
                })
                .collect();
            InvoiceDetail {
                outstanding_amount: invoice.outstanding_amount(),
                payment_status: invoice.settlement_status(),
                counterparty_name: names.name_of(invoice.counterparty),
                line_items,
                invoice,
            }
        })
        .collect())
}

pub(crate) async fn invoice_detail<C: ConnectionTrait>(
    db: &C,
    invoice_id: Uuid,
) -> ResultEngine<InvoiceDetail> {
    let invoice = require_invoice(db, invoice_id).await?;
    hydrate_invoices(db, vec![invoice])
        .await?
        .pop()
        .ok_or_else(|| EngineError::KeyNotFound("invoice not exists".to_string()))
}
