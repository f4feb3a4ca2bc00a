use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `numerator / denominator`, 0 when the denominator is 0. A quotient too
/// large for `Decimal` clamps to `Decimal::MAX` or `Decimal::MIN`.
pub fn saturating_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or_else(|| {
        if numerator.is_sign_negative() != denominator.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// `part` as a percentage of `whole`; 0 when `whole` is 0.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    saturating_div(part, whole).saturating_mul(HUNDRED)
}

pub fn growth(current_value: Decimal, purchase_price: Decimal) -> Decimal {
    current_value.saturating_sub(purchase_price)
}

/// Capital growth as a percentage of the purchase price; 0 when the
/// purchase price is 0.
pub fn growth_percentage(current_value: Decimal, purchase_price: Decimal) -> Decimal {
    percentage_of(growth(current_value, purchase_price), purchase_price)
}

pub fn equity(current_value: Decimal, current_loan: Decimal) -> Decimal {
    current_value.saturating_sub(current_loan)
}

/// Loan-to-value ratio as a percentage; 0 when the value is 0, whatever the loan.
pub fn lvr(current_loan: Decimal, current_value: Decimal) -> Decimal {
    percentage_of(current_loan, current_value)
}

/// Growth, equity and leverage for one property at its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyMetrics {
    pub current_value: Decimal,
    pub purchase_price: Decimal,
    pub current_loan: Decimal,
    pub growth: Decimal,
    pub growth_percentage: Decimal,
    pub equity: Decimal,
    pub lvr: Decimal,
}

impl PropertyMetrics {
    pub fn calculate(
        current_value: Decimal,
        purchase_price: Decimal,
        current_loan: Decimal,
    ) -> Self {
        Self {
            current_value,
            purchase_price,
            current_loan,
            growth: growth(current_value, purchase_price),
            growth_percentage: growth_percentage(current_value, purchase_price),
            equity: equity(current_value, current_loan),
            lvr: lvr(current_loan, current_value),
        }
    }
}
