//! Monthly income and expenses from a property's cashflow configurations.

use std::ops::Add;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::CashflowConfig;

use super::normalize::{
    annual_from_monthly, monthly_from_annual, monthly_from_quarterly, normalize_rent_to_monthly,
    weekly_from_monthly,
};

/// A monthly amount with its weekly and annual equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CashflowProjection {
    pub weekly: Decimal,
    pub monthly: Decimal,
    pub annual: Decimal,
}

impl CashflowProjection {
    pub fn from_monthly(monthly: Decimal) -> Self {
        Self {
            weekly: weekly_from_monthly(monthly),
            monthly,
            annual: annual_from_monthly(monthly),
        }
    }
}

/// Monthly expenses split by line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub mortgage: Decimal,
    pub insurance: Decimal,
    pub rates_strata: Decimal,
    pub other: Decimal,
}

impl ExpenseBreakdown {
    pub fn from_config(config: &CashflowConfig) -> Self {
        Self {
            mortgage: config.mortgage_payment.unwrap_or(Decimal::ZERO),
            insurance: monthly_from_annual(config.insurance_annual.unwrap_or(Decimal::ZERO)),
            rates_strata: monthly_from_quarterly(
                config.rates_strata_quarterly.unwrap_or(Decimal::ZERO),
            ),
            other: config.other_expenses.unwrap_or(Decimal::ZERO),
        }
    }

    pub fn total(&self) -> Decimal {
        self.mortgage
            .saturating_add(self.insurance)
            .saturating_add(self.rates_strata)
            .saturating_add(self.other)
    }
}

/// Normalized monthly income and expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyCashflow {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl MonthlyCashflow {
    pub const ZERO: MonthlyCashflow = MonthlyCashflow {
        income: Decimal::ZERO,
        expenses: Decimal::ZERO,
    };

    pub fn from_config(config: &CashflowConfig) -> Self {
        let income = match (config.rent_income, config.rent_frequency) {
            (Some(rent), Some(frequency)) => normalize_rent_to_monthly(rent, frequency),
            _ => Decimal::ZERO,
        };
        Self {
            income,
            expenses: ExpenseBreakdown::from_config(config).total(),
        }
    }

    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expenses)
    }

    pub fn summary(&self) -> CashflowSummary {
        CashflowSummary {
            income: CashflowProjection::from_monthly(self.income),
            expenses: CashflowProjection::from_monthly(self.expenses),
            net: CashflowProjection::from_monthly(self.net()),
        }
    }
}

impl Add for MonthlyCashflow {
    type Output = MonthlyCashflow;

    fn add(self, rhs: Self) -> Self::Output {
        MonthlyCashflow {
            income: self.income.saturating_add(rhs.income),
            expenses: self.expenses.saturating_add(rhs.expenses),
        }
    }
}

/// Income, expenses and net cashflow, each projected to week, month and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CashflowSummary {
    pub income: CashflowProjection,
    pub expenses: CashflowProjection,
    pub net: CashflowProjection,
}

impl CashflowSummary {
    pub fn is_positive(&self) -> bool {
        !self.net.monthly.is_sign_negative()
    }
}

/// One configuration's monthly figures, for charting rate changes over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashflowPoint {
    pub effective_from: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

/// A property's cashflow configurations, kept sorted newest first.
#[derive(Debug, Clone, Default)]
pub struct CashflowHistory {
    configs: Vec<CashflowConfig>,
}

impl CashflowHistory {
    /// Sorts descending by `effective_from`; configurations sharing a date
    /// keep their relative input order.
    pub fn new(mut configs: Vec<CashflowConfig>) -> Self {
        configs.sort_by(|a, b| b.effective_from.cmp(&a.effective_from));
        Self { configs }
    }

    pub fn configs(&self) -> &[CashflowConfig] {
        &self.configs
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// The configuration with the latest `effective_from`.
    ///
    /// This is not a dated lookup: a configuration that takes effect in the
    /// future is already the active one.
    pub fn active(&self) -> Option<&CashflowConfig> {
        self.configs.first()
    }

    pub fn monthly(&self) -> MonthlyCashflow {
        active_monthly_cashflow(&self.configs)
    }

    pub fn summary(&self) -> CashflowSummary {
        self.monthly().summary()
    }

    /// Monthly figures for every configuration, oldest first.
    pub fn series(&self) -> Vec<CashflowPoint> {
        self.configs
            .iter()
            .rev()
            .map(|config| {
                let monthly = MonthlyCashflow::from_config(config);
                CashflowPoint {
                    effective_from: config.effective_from,
                    income: monthly.income,
                    expenses: monthly.expenses,
                    net: monthly.net(),
                }
            })
            .collect()
    }
}

impl From<Vec<CashflowConfig>> for CashflowHistory {
    fn from(configs: Vec<CashflowConfig>) -> Self {
        Self::new(configs)
    }
}

/// Monthly cashflow of the active configuration.
///
/// `configs` must be sorted descending by `effective_from`; element 0 is
/// treated as active. An empty slice yields zero income and expenses.
pub fn active_monthly_cashflow(configs: &[CashflowConfig]) -> MonthlyCashflow {
    configs
        .first()
        .map(MonthlyCashflow::from_config)
        .unwrap_or(MonthlyCashflow::ZERO)
}
