use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::ResolvedConfig;
use crate::export::{
    cashflow_export_filename, portfolio_export_filename, write_cashflow_csv, write_portfolio_csv,
};
use crate::format::{format_currency, format_percentage};
use crate::models::Id;
use crate::portfolio::{
    filter_by_date_range, filter_by_granularity, portfolio_value_series, property_valuations,
    sort_properties, CoalesceStrategy, ExpenseBreakdown, Granularity, PortfolioHolding,
    PortfolioSummary, SortDirection, SortField,
};
use crate::storage::Storage;

use super::{
    require_pro, CashflowOutput, ExportOutput, HistoryOutput, PropertyDetailOutput,
    PropertyListOutput, SummaryOutput,
};

/// Load every property the configured user owns, together with its
/// valuation and cashflow histories.
pub async fn load_holdings(
    storage: &dyn Storage,
    config: &ResolvedConfig,
) -> Result<Vec<PortfolioHolding>> {
    let properties = storage.list_properties(&config.user_id).await?;
    let ids: Vec<Id> = properties.iter().map(|p| p.id.clone()).collect();

    let mut valuations = storage.get_valuations_for(&ids).await?;
    let mut cashflows = storage.get_cashflows_for(&ids).await?;

    let holdings: Vec<PortfolioHolding> = properties
        .into_iter()
        .map(|property| {
            let entries = valuations.remove(&property.id).unwrap_or_default();
            let configs = cashflows.remove(&property.id).unwrap_or_default();
            PortfolioHolding::new(property, entries, configs)
        })
        .collect();

    debug!(
        user_id = %config.user_id,
        properties = holdings.len(),
        "loaded portfolio holdings"
    );
    Ok(holdings)
}

async fn load_holding(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    property_id: &str,
) -> Result<PortfolioHolding> {
    let id = Id::from_string_checked(property_id)
        .with_context(|| format!("Invalid property id: {property_id}"))?;
    let property = match storage.get_property(&id).await? {
        Some(property) if property.user_id == config.user_id => property,
        _ => anyhow::bail!("Property not found: {property_id}"),
    };
    let valuations = storage.get_valuations(&id).await?;
    let cashflows = storage.get_cashflows(&id).await?;
    Ok(PortfolioHolding::new(property, valuations, cashflows))
}

pub async fn portfolio_summary(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    clock: &dyn Clock,
) -> Result<SummaryOutput> {
    let today = clock.today();
    let holdings = load_holdings(storage, config).await?;
    let summary = PortfolioSummary::calculate(&property_valuations(&holdings, today), today);

    let display = &config.display;
    Ok(SummaryOutput {
        as_of_date: today,
        total_value_display: format_currency(summary.total_value, display),
        total_equity_display: format_currency(summary.total_equity, display),
        total_debt_display: format_currency(summary.total_debt, display),
        net_monthly_cashflow_display: format_currency(summary.net_monthly_cashflow, display),
        average_lvr_display: format_percentage(summary.average_lvr, 2),
        average_growth_display: format_percentage(summary.average_growth_percentage, 2),
        summary,
    })
}

pub async fn list_properties(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    clock: &dyn Clock,
    sort: SortField,
    direction: SortDirection,
) -> Result<PropertyListOutput> {
    let today = clock.today();
    let holdings = load_holdings(storage, config).await?;
    let mut properties = property_valuations(&holdings, today);
    sort_properties(&mut properties, sort, direction);

    Ok(PropertyListOutput {
        as_of_date: today,
        properties,
    })
}

/// One property's metrics as of today with its full valuation history.
pub async fn property_show(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    clock: &dyn Clock,
    property_id: &str,
) -> Result<PropertyDetailOutput> {
    let today = clock.today();
    let holding = load_holding(storage, config, property_id).await?;

    Ok(PropertyDetailOutput {
        as_of_date: today,
        valuation: holding.valuation(today),
        valuations: holding.valuations.entries().to_vec(),
    })
}

/// Options for [`portfolio_history`].
#[derive(Debug, Clone, Default)]
pub struct HistoryRequest {
    pub granularity: Granularity,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Portfolio value at every purchase and valuation date. Pro only.
pub async fn portfolio_history(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    request: HistoryRequest,
) -> Result<HistoryOutput> {
    require_pro(storage, &config.user_id, "Portfolio history").await?;

    if let (Some(start), Some(end)) = (request.start, request.end) {
        if start > end {
            anyhow::bail!("Start date {start} is after end date {end}");
        }
    }

    let holdings = load_holdings(storage, config).await?;
    let series = portfolio_value_series(&holdings);
    let series = filter_by_date_range(series, request.start, request.end);
    let points = filter_by_granularity(series, request.granularity, CoalesceStrategy::Last);

    Ok(HistoryOutput {
        granularity: request.granularity,
        start_date: request.start,
        end_date: request.end,
        points,
    })
}

pub async fn cashflow_show(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    property_id: &str,
) -> Result<CashflowOutput> {
    let holding = load_holding(storage, config, property_id).await?;
    let history = &holding.cashflows;
    let active = history.active().cloned();
    let expenses = active
        .as_ref()
        .map(ExpenseBreakdown::from_config)
        .unwrap_or_default();

    Ok(CashflowOutput {
        property_id: holding.property.id.clone(),
        address: holding.property.address(),
        expenses,
        summary: history.summary(),
        series: history.series(),
        active,
    })
}

fn create_export_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))
}

/// Write the comparison table as CSV. Pro only. Defaults to a dated file
/// name in the current directory.
pub async fn export_portfolio(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    clock: &dyn Clock,
    output: Option<PathBuf>,
) -> Result<ExportOutput> {
    require_pro(storage, &config.user_id, "CSV export").await?;

    let today = clock.today();
    let holdings = load_holdings(storage, config).await?;
    if holdings.is_empty() {
        anyhow::bail!("No data to export");
    }

    let mut rows = property_valuations(&holdings, today);
    sort_properties(&mut rows, SortField::Address, SortDirection::Asc);

    let path = output.unwrap_or_else(|| PathBuf::from(portfolio_export_filename(today)));
    write_portfolio_csv(&rows, create_export_file(&path)?)?;
    info!(path = %path.display(), rows = rows.len(), "exported portfolio");

    Ok(ExportOutput {
        path: path.display().to_string(),
        rows: rows.len(),
    })
}

/// Write one property's cashflow configurations as CSV. Pro only.
pub async fn export_cashflow(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    clock: &dyn Clock,
    property_id: &str,
    output: Option<PathBuf>,
) -> Result<ExportOutput> {
    require_pro(storage, &config.user_id, "CSV export").await?;

    let holding = load_holding(storage, config, property_id).await?;
    if holding.cashflows.is_empty() {
        anyhow::bail!("No data to export");
    }

    let path = output.unwrap_or_else(|| {
        PathBuf::from(cashflow_export_filename(
            &holding.property.short_address(),
            clock.today(),
        ))
    });
    write_cashflow_csv(&holding.cashflows, create_export_file(&path)?)?;
    let rows = holding.cashflows.configs().len();
    info!(path = %path.display(), rows, "exported cashflow");

    Ok(ExportOutput {
        path: path.display().to_string(),
        rows,
    })
}
