use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ResolvedConfig;
use crate::models::{
    AustralianState, CashflowConfig, Id, IdGenerator, Property, PropertyType, RentFrequency,
    SubscriptionTier, UserProfile, UuidIdGenerator, ValuationEntry, PURCHASE_SOURCE,
};
use crate::storage::Storage;

use super::PropertyLimitError;

/// Fields supplied when registering a property.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub street: String,
    pub suburb: String,
    pub state: AustralianState,
    pub postcode: String,
    pub property_type: PropertyType,
    pub bedrooms: Option<u32>,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
    pub initial_loan_amount: Option<Decimal>,
    pub current_loan_amount: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub lender_name: Option<String>,
}

/// Fields supplied when recording a cashflow configuration.
#[derive(Debug, Clone, Default)]
pub struct NewCashflow {
    pub effective_from: Option<NaiveDate>,
    pub rent_income: Option<Decimal>,
    pub rent_frequency: Option<RentFrequency>,
    pub mortgage_payment: Option<Decimal>,
    pub insurance_annual: Option<Decimal>,
    pub rates_strata_quarterly: Option<Decimal>,
    pub other_expenses: Option<Decimal>,
    pub notes: Option<String>,
}

/// Largest amount accepted for any money or rate field (one quadrillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

fn ensure_amount(label: &str, value: Option<Decimal>) -> Result<()> {
    if let Some(value) = value {
        if value.is_sign_negative() && !value.is_zero() {
            anyhow::bail!("{label} must not be negative: {value}");
        }
        if value > MAX_AMOUNT {
            anyhow::bail!("{label} must not exceed {MAX_AMOUNT}: {value}");
        }
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

async fn owned_property(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    id_str: &str,
) -> Result<Property> {
    let id = Id::from_string_checked(id_str)
        .with_context(|| format!("Invalid property id: {id_str}"))?;
    match storage.get_property(&id).await? {
        Some(property) if property.user_id == config.user_id => Ok(property),
        _ => anyhow::bail!("Property not found: {id_str}"),
    }
}

pub async fn set_subscription_tier(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    tier: SubscriptionTier,
) -> Result<serde_json::Value> {
    let mut user = ensure_user(storage, &config.user_id).await?;
    user.subscription_tier = tier;
    storage.save_user(&user).await?;
    info!(user_id = %user.id, %tier, "updated subscription tier");

    Ok(serde_json::json!({
        "success": true,
        "user_id": user.id.to_string(),
        "subscription_tier": tier.as_str()
    }))
}

pub async fn add_property(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    new: NewProperty,
) -> Result<serde_json::Value> {
    add_property_with(storage, config, new, &UuidIdGenerator, &SystemClock).await
}

/// Register a property and record its purchase price as the first valuation.
///
/// Fails with [`PropertyLimitError`] when the user is on the free tier and
/// already at the property limit.
pub async fn add_property_with(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    new: NewProperty,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> Result<serde_json::Value> {
    ensure_amount("Purchase price", Some(new.purchase_price))?;
    ensure_amount("Initial loan amount", new.initial_loan_amount)?;
    ensure_amount("Current loan amount", new.current_loan_amount)?;
    ensure_amount("Interest rate", new.interest_rate)?;

    let user = ensure_user(storage, &config.user_id).await?;
    let count = storage.list_properties(&user.id).await?.len();
    let limit = config.limits.free_tier_max_properties;
    if !user.can_add_property(count, limit) {
        return Err(PropertyLimitError { limit }.into());
    }

    let now = clock.now();
    let property = Property {
        id: ids.new_id(),
        user_id: user.id.clone(),
        street: new.street.trim().to_string(),
        suburb: new.suburb.trim().to_string(),
        state: new.state,
        postcode: new.postcode.trim().to_string(),
        property_type: new.property_type,
        bedrooms: new.bedrooms,
        purchase_price: new.purchase_price,
        purchase_date: new.purchase_date,
        initial_loan_amount: new.initial_loan_amount,
        // A new property's outstanding loan starts at the amount borrowed.
        current_loan_amount: new.current_loan_amount.or(new.initial_loan_amount),
        interest_rate: new.interest_rate,
        lender_name: non_empty(new.lender_name),
        created_at: now,
        updated_at: now,
    };
    storage.save_property(&property).await?;

    let initial = ValuationEntry {
        id: ids.new_id(),
        property_id: property.id.clone(),
        value: property.purchase_price,
        date_recorded: property.purchase_date,
        source: Some(PURCHASE_SOURCE.to_string()),
        created_at: now,
    };
    if let Err(err) = storage.append_valuation(&initial).await {
        // The property is saved; its value still falls back to the purchase price.
        warn!(property_id = %property.id, error = %err, "failed to record purchase valuation");
    }

    info!(property_id = %property.id, address = %property.address(), "added property");

    Ok(serde_json::json!({
        "success": true,
        "property": property,
        "property_count": count + 1
    }))
}

pub async fn add_valuation(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    property_id: &str,
    value: Decimal,
    date_recorded: NaiveDate,
    source: Option<String>,
) -> Result<serde_json::Value> {
    add_valuation_with(
        storage,
        config,
        property_id,
        value,
        date_recorded,
        source,
        &UuidIdGenerator,
        &SystemClock,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn add_valuation_with(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    property_id: &str,
    value: Decimal,
    date_recorded: NaiveDate,
    source: Option<String>,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> Result<serde_json::Value> {
    ensure_amount("Valuation", Some(value))?;
    let property = owned_property(storage, config, property_id).await?;

    if date_recorded < property.purchase_date {
        warn!(
            property_id = %property.id,
            %date_recorded,
            purchase_date = %property.purchase_date,
            "valuation predates purchase; it applies from the purchase date until a later valuation"
        );
    }

    let entry = ValuationEntry {
        id: ids.new_id(),
        property_id: property.id.clone(),
        value,
        date_recorded,
        source: non_empty(source),
        created_at: clock.now(),
    };
    storage.append_valuation(&entry).await?;
    info!(property_id = %property.id, %value, %date_recorded, "recorded valuation");

    Ok(serde_json::json!({
        "success": true,
        "valuation": entry
    }))
}

pub async fn add_cashflow(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    property_id: &str,
    new: NewCashflow,
) -> Result<serde_json::Value> {
    add_cashflow_with(storage, config, property_id, new, &UuidIdGenerator, &SystemClock).await
}

/// Record a cashflow configuration. `effective_from` defaults to today.
pub async fn add_cashflow_with(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    property_id: &str,
    new: NewCashflow,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> Result<serde_json::Value> {
    ensure_amount("Rent income", new.rent_income)?;
    ensure_amount("Mortgage payment", new.mortgage_payment)?;
    ensure_amount("Insurance", new.insurance_annual)?;
    ensure_amount("Rates/strata", new.rates_strata_quarterly)?;
    ensure_amount("Other expenses", new.other_expenses)?;
    if new.rent_income.is_some() && new.rent_frequency.is_none() {
        warn!("rent income recorded without a frequency; it will not count as income");
    }

    let property = owned_property(storage, config, property_id).await?;
    let effective_from = new.effective_from.unwrap_or_else(|| clock.today());
    if effective_from > clock.today() {
        warn!(
            property_id = %property.id,
            %effective_from,
            "future-dated cashflow configuration becomes the active one immediately"
        );
    }

    let cashflow = CashflowConfig {
        id: ids.new_id(),
        property_id: property.id.clone(),
        effective_from,
        rent_income: new.rent_income,
        rent_frequency: new.rent_frequency,
        mortgage_payment: new.mortgage_payment,
        insurance_annual: new.insurance_annual,
        rates_strata_quarterly: new.rates_strata_quarterly,
        other_expenses: new.other_expenses,
        notes: non_empty(new.notes),
        created_at: clock.now(),
    };
    storage.append_cashflow(&cashflow).await?;
    info!(property_id = %property.id, %effective_from, "recorded cashflow configuration");

    Ok(serde_json::json!({
        "success": true,
        "cashflow": cashflow
    }))
}

/// Fetch the profile, creating a free-tier one if none is stored yet.
pub async fn ensure_user(storage: &dyn Storage, user_id: &Id) -> Result<UserProfile> {
    if let Some(user) = storage.get_user(user_id).await? {
        return Ok(user);
    }
    let user = UserProfile::new(user_id.clone(), "");
    storage.save_user(&user).await?;
    Ok(user)
}
