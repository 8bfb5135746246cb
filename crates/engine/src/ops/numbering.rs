//! Human-readable document numbers.
//!
//! Numbers are `<prefix>-<%Y%m%d%H%M%S>`; when that is taken, `-1`, `-2`, …
//! are appended until a free one is found.

use std::future::Future;

use chrono::{DateTime, Utc};

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};

use crate::{InvoiceType, ResultEngine, invoices, payments};

use super::Engine;

pub(crate) const PAYMENT_PREFIX: &str = "PAY";

pub(crate) fn timestamp_number(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}-{}", at.format("%Y%m%d%H%M%S"))
}

fn candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

async fn first_free<F, Fut>(base: &str, mut is_taken: F) -> ResultEngine<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ResultEngine<bool>>,
{
    let mut attempt = 0;
    loop {
        let number = candidate(base, attempt);
        if !is_taken(number.clone()).await? {
            return Ok(number);
        }
        attempt += 1;
    }
}

pub(crate) async fn invoice_number_taken<C: ConnectionTrait>(
    db: &C,
    number: String,
) -> ResultEngine<bool> {
    Ok(invoices::Entity::find()
        .filter(invoices::Column::InvoiceNumber.eq(number))
        .one(db)
        .await?
        .is_some())
}

pub(crate) async fn payment_number_taken<C: ConnectionTrait>(
    db: &C,
    number: String,
) -> ResultEngine<bool> {
    Ok(payments::Entity::find()
        .filter(payments::Column::PaymentNumber.eq(number))
        .one(db)
        .await?
        .is_some())
}

pub(crate) async fn next_invoice_number<C: ConnectionTrait>(
    db: &C,
    invoice_type: InvoiceType,
    at: DateTime<Utc>,
) -> ResultEngine<String> {
    let base = timestamp_number(invoice_type.number_prefix(), at);
    first_free(&base, |number| invoice_number_taken(db, number)).await
}

pub(crate) async fn next_payment_number<C: ConnectionTrait>(
    db: &C,
    at: DateTime<Utc>,
) -> ResultEngine<String> {
    let base = timestamp_number(PAYMENT_PREFIX, at);
    first_free(&base, |number| payment_number_taken(db, number)).await
}

impl Engine {
    /// Returns an invoice number not used by any stored invoice.
    pub async fn generate_invoice_number(&self, invoice_type: InvoiceType) -> ResultEngine<String> {
        next_invoice_number(&self.database, invoice_type, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn numbers_carry_prefix_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            timestamp_number(InvoiceType::Sales.number_prefix(), at),
            "INV-S-20240309140507"
        );
        assert_eq!(timestamp_number(PAYMENT_PREFIX, at), "PAY-20240309140507");
    }

    #[test]
    fn collisions_get_numeric_suffix() {
        assert_eq!(candidate("INV-P-1", 0), "INV-P-1");
        assert_eq!(candidate("INV-P-1", 2), "INV-P-1-2");
    }
}
