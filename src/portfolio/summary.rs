//! Portfolio-level totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cashflow::{CashflowSummary, MonthlyCashflow};
use super::metrics::{equity, lvr, percentage_of, saturating_div};
use super::models::{PortfolioHolding, PropertyValuation};

const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub property_count: usize,
    pub properties_with_cashflow: usize,

    pub total_value: Decimal,
    pub total_debt: Decimal,
    pub total_equity: Decimal,
    pub average_lvr: Decimal,

    pub total_invested: Decimal,
    pub total_equity_growth: Decimal,
    pub total_return_percentage: Decimal,
    /// Unweighted mean of each property's growth percentage.
    pub average_growth_percentage: Decimal,
    pub average_holding_years: Decimal,
    pub annualized_growth_rate: Decimal,

    pub total_monthly_income: Decimal,
    pub total_monthly_expenses: Decimal,
    pub net_monthly_cashflow: Decimal,
    pub cashflow: CashflowSummary,
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum / Decimal::from(count)
}

/// Years between purchase and `today`, at 365 days per year. Negative for
/// purchases dated after `today`.
pub fn holding_years(purchase_date: NaiveDate, today: NaiveDate) -> Decimal {
    let days = (today - purchase_date).num_days();
    Decimal::from(days) / DAYS_PER_YEAR
}

impl PortfolioSummary {
    /// Sum per-property metrics and cashflow into portfolio totals.
    pub fn calculate(rows: &[PropertyValuation], today: NaiveDate) -> Self {
        let property_count = rows.len();

        let mut total_value = Decimal::ZERO;
        let mut total_debt = Decimal::ZERO;
        let mut total_invested = Decimal::ZERO;
        let mut total_equity_growth = Decimal::ZERO;
        let mut growth_percentage_sum = Decimal::ZERO;
        let mut holding_years_sum = Decimal::ZERO;
        let mut monthly = MonthlyCashflow::ZERO;
        let mut properties_with_cashflow = 0;

        for row in rows {
            total_value = total_value.saturating_add(row.metrics.current_value);
            total_debt = total_debt.saturating_add(row.metrics.current_loan);
            total_invested = total_invested.saturating_add(row.metrics.purchase_price);
            total_equity_growth = total_equity_growth.saturating_add(row.metrics.growth);
            growth_percentage_sum =
                growth_percentage_sum.saturating_add(row.metrics.growth_percentage);
            holding_years_sum += holding_years(row.property.purchase_date, today);
            monthly = monthly + row.cashflow;
            if row.has_cashflow {
                properties_with_cashflow += 1;
            }
        }

        let average_growth_percentage = mean(growth_percentage_sum, property_count);
        let average_holding_years = mean(holding_years_sum, property_count);
        let annualized_growth_rate = if average_holding_years > Decimal::ZERO {
            saturating_div(average_growth_percentage, average_holding_years)
        } else {
            Decimal::ZERO
        };
        let total_return_percentage = percentage_of(total_equity_growth, total_invested);

        debug!(
            properties = property_count,
            %total_value,
            %total_debt,
            "calculated portfolio summary"
        );

        Self {
            property_count,
            properties_with_cashflow,
            total_value,
            total_debt,
            total_equity: equity(total_value, total_debt),
            average_lvr: lvr(total_debt, total_value),
            total_invested,
            total_equity_growth,
            total_return_percentage,
            average_growth_percentage,
            average_holding_years,
            annualized_growth_rate,
            total_monthly_income: monthly.income,
            total_monthly_expenses: monthly.expenses,
            net_monthly_cashflow: monthly.net(),
            cashflow: monthly.summary(),
        }
    }
}

/// Per-property rows for `holdings`, valued as of `today`.
pub fn property_valuations(holdings: &[PortfolioHolding], today: NaiveDate) -> Vec<PropertyValuation> {
    holdings.iter().map(|h| h.valuation(today)).collect()
}

pub fn summarize(holdings: &[PortfolioHolding], today: NaiveDate) -> PortfolioSummary {
    PortfolioSummary::calculate(&property_valuations(holdings, today), today)
}
