use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{CashflowConfig, Id, ValuationEntry};
use crate::portfolio::{
    CashflowPoint, CashflowSummary, ExpenseBreakdown, Granularity, PortfolioSummary,
    PropertyValuation, ValuePoint,
};

/// JSON output for `summary`.
#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub as_of_date: NaiveDate,
    #[serde(flatten)]
    pub summary: PortfolioSummary,
    pub total_value_display: String,
    pub total_equity_display: String,
    pub total_debt_display: String,
    pub net_monthly_cashflow_display: String,
    pub average_lvr_display: String,
    pub average_growth_display: String,
}

/// JSON output for `property list`.
#[derive(Debug, Serialize)]
pub struct PropertyListOutput {
    pub as_of_date: NaiveDate,
    pub properties: Vec<PropertyValuation>,
}

/// JSON output for `property show`.
#[derive(Debug, Serialize)]
pub struct PropertyDetailOutput {
    pub as_of_date: NaiveDate,
    #[serde(flatten)]
    pub valuation: PropertyValuation,
    /// Every recorded valuation, newest first.
    pub valuations: Vec<ValuationEntry>,
}

/// JSON output for `history`.
#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub granularity: Granularity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub points: Vec<ValuePoint>,
}

/// JSON output for `cashflow show`.
#[derive(Debug, Serialize)]
pub struct CashflowOutput {
    pub property_id: Id,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<CashflowConfig>,
    pub expenses: ExpenseBreakdown,
    pub summary: CashflowSummary,
    pub series: Vec<CashflowPoint>,
}

/// Result of writing a CSV export.
#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub path: String,
    pub rows: usize,
}
