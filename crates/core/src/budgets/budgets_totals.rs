//! Budget arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::utils::{
    money_add, money_mul, money_sub, round_money, validate_non_negative, validate_positive,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub initial_payment: Decimal,
}

pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Result<Decimal> {
    Ok(round_money(money_mul(quantity, unit_price)?))
}

/// Computes budget totals from `(quantity, unit_price)` pairs.
///
/// The total never goes below zero when the discount exceeds the subtotal.
pub fn compute_totals<I>(lines: I, discount: Decimal, percentage: Decimal) -> Result<BudgetTotals>
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    validate_non_negative("discountAmount", discount)?;
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(Error::invalid(
            "initialPaymentPercentage must be between 0 and 100",
        ));
    }

    let mut subtotal = Decimal::ZERO;
    for (quantity, unit_price) in lines {
        validate_positive("quantity", quantity)?;
        validate_non_negative("unitPrice", unit_price)?;
        subtotal = money_add(subtotal, line_total(quantity, unit_price)?)?;
    }

    let discount_amount = round_money(discount);
    let total = money_sub(subtotal, discount_amount)?.max(Decimal::ZERO);
    let initial_payment = round_money(money_mul(total, percentage)? / Decimal::ONE_HUNDRED);

    Ok(BudgetTotals {
        subtotal,
        discount_amount,
        total,
        initial_payment,
    })
}
