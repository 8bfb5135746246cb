use chrono::NaiveDate;
use uuid::Uuid;

use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    Invoice, InvoiceListFilter, InvoiceStatus, InvoiceType, MoneyCents, ResultEngine, invoices,
    util::normalize_optional_text,
};

use super::super::Engine;
use super::{
    InvoiceDashboard, InvoiceDetail, InvoiceList, InvoiceListSummary, hydrate_invoices,
    invoice_detail,
};

const RECENT_INVOICES: u64 = 10;

fn open_statuses() -> Vec<&'static str> {
    [InvoiceStatus::Draft, InvoiceStatus::Sent, InvoiceStatus::Partial]
        .into_iter()
        .map(InvoiceStatus::as_str)
        .collect()
}

impl Engine {
    /// Return an invoice with its lines and resolved names.
    pub async fn invoice(&self, invoice_id: Uuid) -> ResultEngine<InvoiceDetail> {
        invoice_detail(&self.database, invoice_id).await
    }

    /// Lists invoices, newest invoice date first, with summary figures.
    pub async fn list_invoices(&self, filter: &InvoiceListFilter) -> ResultEngine<InvoiceList> {
        let mut query = invoices::Entity::find();
        if let Some(invoice_type) = filter.invoice_type {
            query = query.filter(invoices::Column::InvoiceType.eq(invoice_type.as_str()));
        }
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(invoices::Column::CustomerId.eq(customer_id.to_string()));
        }
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(invoices::Column::SupplierId.eq(supplier_id.to_string()));
        }
        if let Some(status) = filter.status {
            query = query.filter(invoices::Column::Status.eq(status.as_str()));
        }
        if let Some(search) = normalize_optional_text(filter.search.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(invoices::Column::InvoiceNumber.contains(&search))
                    .add(invoices::Column::Notes.contains(&search)),
            );
        }

        let invoices = query
            .order_by_desc(invoices::Column::InvoiceDate)
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Invoice::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let invoices = hydrate_invoices(&self.database, invoices).await?;
        let summary = InvoiceListSummary::from_invoices(&invoices);
        Ok(InvoiceList { invoices, summary })
    }

    /// Recent and overdue invoices plus sales, purchase and outstanding
    /// totals as of `today`.
    ///
    /// Overdue means due before `today` and still open (draft, sent or
    /// partial). Cancelled invoices count in neither total.
    pub async fn invoice_dashboard(&self, today: NaiveDate) -> ResultEngine<InvoiceDashboard> {
        let recent = invoices::Entity::find()
            .order_by_desc(invoices::Column::CreatedAt)
            .limit(RECENT_INVOICES)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Invoice::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let overdue = invoices::Entity::find()
            .filter(invoices::Column::DueDate.lt(today))
            .filter(invoices::Column::Status.is_in(open_statuses()))
            .order_by_asc(invoices::Column::DueDate)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Invoice::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let live = invoices::Entity::find()
            .filter(invoices::Column::Status.ne(InvoiceStatus::Cancelled.as_str()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(Invoice::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let mut total_sales = MoneyCents::ZERO;
        let mut total_purchases = MoneyCents::ZERO;
        let mut total_outstanding = MoneyCents::ZERO;
        for invoice in &live {
            match invoice.invoice_type {
                InvoiceType::Sales => total_sales += invoice.total_amount,
                InvoiceType::Purchase => total_purchases += invoice.total_amount,
            }
            if invoice.status.is_open() {
                total_outstanding += invoice.outstanding_amount();
            }
        }

        let overdue_invoices = hydrate_invoices(&self.database, overdue).await?;
        Ok(InvoiceDashboard {
            recent_invoices: hydrate_invoices(&self.database, recent).await?,
            overdue_count: overdue_invoices.len(),
            overdue_invoices,
            total_sales,
            total_purchases,
            total_outstanding,
        })
    }
}
