use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CashflowConfig, ParseEnumError, Property, ValuationEntry};

use super::cashflow::{CashflowHistory, MonthlyCashflow};
use super::metrics::PropertyMetrics;
use super::valuation::ValuationHistory;

/// Everything the aggregation core needs to know about one property.
#[derive(Debug, Clone)]
pub struct PortfolioHolding {
    pub property: Property,
    pub valuations: ValuationHistory,
    pub cashflows: CashflowHistory,
}

impl PortfolioHolding {
    pub fn new(
        property: Property,
        valuations: Vec<ValuationEntry>,
        cashflows: Vec<CashflowConfig>,
    ) -> Self {
        Self {
            property,
            valuations: ValuationHistory::new(valuations),
            cashflows: CashflowHistory::new(cashflows),
        }
    }

    pub fn current_value(&self, today: NaiveDate) -> Decimal {
        self.valuations
            .current_value(self.property.purchase_price, today)
    }

    pub fn metrics(&self, today: NaiveDate) -> PropertyMetrics {
        PropertyMetrics::calculate(
            self.current_value(today),
            self.property.purchase_price,
            self.property.current_loan(),
        )
    }

    pub fn monthly_cashflow(&self) -> MonthlyCashflow {
        self.cashflows.monthly()
    }

    pub fn valuation(&self, today: NaiveDate) -> PropertyValuation {
        PropertyValuation {
            property: self.property.clone(),
            metrics: self.metrics(today),
            cashflow: self.monthly_cashflow(),
            has_cashflow: !self.cashflows.is_empty(),
            latest_valuation_date: self.valuations.latest().map(|v| v.date_recorded),
        }
    }
}

/// A property with its derived metrics; one row of the comparison table
/// and of the portfolio CSV export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyValuation {
    pub property: Property,
    pub metrics: PropertyMetrics,
    pub cashflow: MonthlyCashflow,
    pub has_cashflow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_valuation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Address,
    Value,
    Growth,
    GrowthPercent,
    Lvr,
    Equity,
}

impl FromStr for SortField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "address" => Ok(SortField::Address),
            "value" => Ok(SortField::Value),
            "growth" => Ok(SortField::Growth),
            "growth_percent" => Ok(SortField::GrowthPercent),
            "lvr" => Ok(SortField::Lvr),
            "equity" => Ok(SortField::Equity),
            _ => Err(ParseEnumError::new("sort field", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(ParseEnumError::new("sort direction", s)),
        }
    }
}

fn compare(a: &PropertyValuation, b: &PropertyValuation, field: SortField) -> Ordering {
    match field {
        SortField::Address => a.property.short_address().cmp(&b.property.short_address()),
        SortField::Value => a.metrics.current_value.cmp(&b.metrics.current_value),
        SortField::Growth => a.metrics.growth.cmp(&b.metrics.growth),
        SortField::GrowthPercent => a
            .metrics
            .growth_percentage
            .cmp(&b.metrics.growth_percentage),
        SortField::Lvr => a.metrics.lvr.cmp(&b.metrics.lvr),
        SortField::Equity => a.metrics.equity.cmp(&b.metrics.equity),
    }
}

/// Stable sort of comparison rows.
pub fn sort_properties(rows: &mut [PropertyValuation], field: SortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
