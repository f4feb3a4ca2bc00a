#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use propfolio::config::{DisplayConfig, LimitsConfig, ResolvedConfig};
use propfolio::models::{
    AustralianState, CashflowConfig, Id, Property, PropertyType, ValuationEntry,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A property owned by `user_id` with no loan.
pub fn property(id: &str, user_id: &str, price: Decimal, purchased: NaiveDate) -> Property {
    let created = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    Property {
        id: Id::from(id),
        user_id: Id::from(user_id),
        street: format!("{id} Example St"),
        suburb: "Newtown".to_string(),
        state: AustralianState::Nsw,
        postcode: "2042".to_string(),
        property_type: PropertyType::House,
        bedrooms: Some(3),
        purchase_price: price,
        purchase_date: purchased,
        initial_loan_amount: None,
        current_loan_amount: None,
        interest_rate: None,
        lender_name: None,
        created_at: created,
        updated_at: created,
    }
}

pub fn valuation(property_id: &str, value: Decimal, on: NaiveDate) -> ValuationEntry {
    ValuationEntry::new(Id::from(property_id), value, on)
}

pub fn cashflow(property_id: &str, effective_from: NaiveDate) -> CashflowConfig {
    CashflowConfig::new(Id::from(property_id), effective_from)
}

pub fn resolved_config(data_dir: &std::path::Path, user_id: &str) -> ResolvedConfig {
    ResolvedConfig {
        data_dir: data_dir.to_path_buf(),
        user_id: Id::from(user_id),
        display: DisplayConfig::default(),
        limits: LimitsConfig::default(),
    }
}
