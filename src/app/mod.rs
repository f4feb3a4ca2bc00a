mod config;
mod mutations;
mod portfolio;
mod types;

use anyhow::Result;

use crate::models::{Id, UserProfile};
use crate::storage::Storage;

pub use config::config_output;
pub use mutations::{
    add_cashflow, add_cashflow_with, add_property, add_property_with, add_valuation,
    add_valuation_with, ensure_user, set_subscription_tier, NewCashflow, NewProperty,
};
pub use portfolio::{
    cashflow_show, export_cashflow, export_portfolio, list_properties, load_holdings,
    portfolio_history, portfolio_summary, property_show, HistoryRequest,
};
pub use types::{
    CashflowOutput, ExportOutput, HistoryOutput, PropertyDetailOutput, PropertyListOutput,
    SummaryOutput,
};

/// Returned when a free-tier user tries to add a property past the limit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("You have reached the limit of {limit} properties on the free tier. Upgrade to Pro for unlimited properties.")]
pub struct PropertyLimitError {
    pub limit: usize,
}

/// Returned when a free-tier user calls a Pro-only operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{feature} is a Pro feature. Upgrade to Pro to use it.")]
pub struct FeatureError {
    pub feature: &'static str,
}

/// The stored profile, or an unsaved free-tier profile if there is none.
async fn load_user(storage: &dyn Storage, user_id: &Id) -> Result<UserProfile> {
    Ok(storage
        .get_user(user_id)
        .await?
        .unwrap_or_else(|| UserProfile::new(user_id.clone(), "")))
}

async fn require_pro(storage: &dyn Storage, user_id: &Id, feature: &'static str) -> Result<()> {
    if load_user(storage, user_id).await?.is_pro() {
        Ok(())
    } else {
        Err(FeatureError { feature }.into())
    }
}
