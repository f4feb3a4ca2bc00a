//! CSV exports of the portfolio comparison table and a property's cashflow
//! configurations.
//!
//! Column names and order are what spreadsheets built on earlier exports
//! expect; append new columns at the end.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::format::{format_date_au, format_decimal, format_fixed};
use crate::portfolio::{CashflowHistory, ExpenseBreakdown, MonthlyCashflow, PropertyValuation};

pub const PORTFOLIO_CSV_HEADER: [&str; 13] = [
    "Address",
    "Property Type",
    "Bedrooms",
    "Purchase Date",
    "Purchase Price",
    "Current Value",
    "Capital Growth ($)",
    "Capital Growth (%)",
    "Equity",
    "Current Loan",
    "LVR (%)",
    "Interest Rate (%)",
    "Lender",
];

pub const CASHFLOW_CSV_HEADER: [&str; 10] = [
    "Effective From",
    "Rent Income",
    "Rent Frequency",
    "Mortgage Payment",
    "Insurance (Annual)",
    "Rates/Strata (Quarterly)",
    "Other Expenses",
    "Total Expenses",
    "Net Cashflow",
    "Notes",
];

fn amount(value: Decimal) -> String {
    format_decimal(value, None)
}

fn optional_amount(value: Option<Decimal>) -> String {
    amount(value.unwrap_or(Decimal::ZERO))
}

fn writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out)
}

/// One row per property, in the order given.
pub fn write_portfolio_csv(rows: &[PropertyValuation], out: impl Write) -> Result<()> {
    let mut csv = writer(out);
    csv.write_record(PORTFOLIO_CSV_HEADER)?;

    for row in rows {
        let property = &row.property;
        let metrics = &row.metrics;
        csv.write_record([
            property.address(),
            property.property_type.to_string(),
            property.bedrooms.map(|b| b.to_string()).unwrap_or_default(),
            format_date_au(property.purchase_date),
            amount(property.purchase_price),
            amount(metrics.current_value),
            amount(metrics.growth),
            format_fixed(metrics.growth_percentage, 2),
            amount(metrics.equity),
            amount(metrics.current_loan),
            format_fixed(metrics.lvr, 2),
            property.interest_rate.map(amount).unwrap_or_default(),
            property.lender_name.clone().unwrap_or_default(),
        ])?;
    }

    csv.flush().context("Failed to flush portfolio CSV")?;
    Ok(())
}

/// One row per configuration, newest first. Totals are monthly, with rent
/// normalized by its frequency.
pub fn write_cashflow_csv(history: &CashflowHistory, out: impl Write) -> Result<()> {
    let mut csv = writer(out);
    csv.write_record(CASHFLOW_CSV_HEADER)?;

    for config in history.configs() {
        let monthly = MonthlyCashflow::from_config(config);
        csv.write_record([
            format_date_au(config.effective_from),
            optional_amount(config.rent_income),
            config
                .rent_frequency
                .map(|f| f.to_string())
                .unwrap_or_default(),
            optional_amount(config.mortgage_payment),
            optional_amount(config.insurance_annual),
            optional_amount(config.rates_strata_quarterly),
            optional_amount(config.other_expenses),
            format_fixed(ExpenseBreakdown::from_config(config).total(), 2),
            format_fixed(monthly.net(), 2),
            config.notes.clone().unwrap_or_default(),
        ])?;
    }

    csv.flush().context("Failed to flush cashflow CSV")?;
    Ok(())
}

pub fn portfolio_csv(rows: &[PropertyValuation]) -> Result<String> {
    let mut buf = Vec::new();
    write_portfolio_csv(rows, &mut buf)?;
    String::from_utf8(buf).context("Portfolio CSV is not valid UTF-8")
}

pub fn cashflow_csv(history: &CashflowHistory) -> Result<String> {
    let mut buf = Vec::new();
    write_cashflow_csv(history, &mut buf)?;
    String::from_utf8(buf).context("Cashflow CSV is not valid UTF-8")
}

/// Lowercase ASCII alphanumerics, with every other character replaced by `-`.
fn slug(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

pub fn portfolio_export_filename(today: NaiveDate) -> String {
    format!("property-portfolio-{}.csv", today.format("%Y-%m-%d"))
}

pub fn cashflow_export_filename(address: &str, today: NaiveDate) -> String {
    format!("cashflow-{}-{}.csv", slug(address), today.format("%Y-%m-%d"))
}
