//! Invoice totals.
//!
//! Pure functions deriving line amounts and invoice totals from quantities,
//! prices and tax rates. They hold no state: callers re-run them after every
//! line-item mutation and persist the result.

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, TaxRate};

/// Derived amounts of a single line item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    /// `quantity × unit_price`, before tax.
    pub line_subtotal: MoneyCents,
    pub tax_amount: MoneyCents,
    /// `line_subtotal + tax_amount`.
    pub line_total: MoneyCents,
}

impl LineAmounts {
    pub fn compute(quantity: i64, unit_price: MoneyCents, tax_rate: TaxRate) -> ResultEngine<Self> {
        let overflow = || EngineError::InvalidAmount("line amount too large".to_string());

        let line_subtotal = unit_price.checked_mul(quantity).ok_or_else(overflow)?;
        let tax_amount = tax_rate.apply(line_subtotal).ok_or_else(overflow)?;
        let line_total = line_subtotal.checked_add(tax_amount).ok_or_else(overflow)?;

        Ok(Self {
            line_subtotal,
            tax_amount,
            line_total,
        })
    }
}

/// Header totals of an invoice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: MoneyCents,
    pub tax_amount: MoneyCents,
    pub discount_amount: MoneyCents,
    pub total_amount: MoneyCents,
}

/// Sums line amounts and applies the invoice-level discount.
///
/// `total_amount = subtotal + tax_amount - discount_amount`; a discount larger
/// than the taxed subtotal is rejected.
pub fn calculate_totals<'a, I>(lines: I, discount_amount: MoneyCents) -> ResultEngine<InvoiceTotals>
where
    I: IntoIterator<Item = &'a LineAmounts>,
{
    let overflow = || EngineError::InvalidAmount("invoice total too large".to_string());

    if discount_amount.is_negative() {
        return Err(EngineError::InvalidAmount(
            "discount_amount must be >= 0".to_string(),
        ));
    }

    let mut subtotal = MoneyCents::ZERO;
    let mut tax_amount = MoneyCents::ZERO;
    for line in lines {
        subtotal = subtotal
            .checked_add(line.line_subtotal)
            .ok_or_else(overflow)?;
        tax_amount = tax_amount
            .checked_add(line.tax_amount)
            .ok_or_else(overflow)?;
    }

    let total_amount = subtotal
        .checked_add(tax_amount)
        .and_then(|gross| gross.checked_sub(discount_amount))
        .ok_or_else(overflow)?;
    if total_amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "discount {discount_amount} exceeds invoice amount {}",
            subtotal + tax_amount
        )));
    }

    Ok(InvoiceTotals {
        subtotal,
        tax_amount,
        discount_amount,
        total_amount,
    })
}
