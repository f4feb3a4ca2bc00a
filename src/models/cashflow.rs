use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Id, ParseEnumError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentFrequency {
    Weekly,
    Monthly,
}

impl RentFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentFrequency::Weekly => "weekly",
            RentFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentFrequency {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" | "w" => Ok(RentFrequency::Weekly),
            "monthly" | "month" | "m" => Ok(RentFrequency::Monthly),
            _ => Err(ParseEnumError::new("rent frequency", s)),
        }
    }
}

/// Rent and expense rates for a property, valid from `effective_from` until
/// a later configuration supersedes it.
///
/// Each amount is stored in the period the owner thinks in: mortgage and
/// other expenses per month, insurance per year, council rates and strata
/// per quarter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashflowConfig {
    pub id: Id,
    pub property_id: Id,
    pub effective_from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_income: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_frequency: Option<RentFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_payment: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_annual: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates_strata_quarterly: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_expenses: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl CashflowConfig {
    /// An empty configuration; fill in the rates with struct update syntax.
    pub fn new(property_id: Id, effective_from: NaiveDate) -> Self {
        Self {
            id: Id::new(),
            property_id,
            effective_from,
            created_at: Utc::now(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_rows() {
        let json = r#"{
            "id": "c1",
            "property_id": "p1",
            "effective_from": "2024-01-01",
            "rent_income": "550",
            "rent_frequency": "weekly"
        }"#;
        let config: CashflowConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rent_frequency, Some(RentFrequency::Weekly));
        assert_eq!(config.mortgage_payment, None);
        assert_eq!(config.notes, None);
    }

    #[test]
    fn parses_frequency_aliases() {
        assert_eq!("Week".parse::<RentFrequency>().unwrap(), RentFrequency::Weekly);
        assert_eq!("monthly".parse::<RentFrequency>().unwrap(), RentFrequency::Monthly);
        assert!("fortnightly".parse::<RentFrequency>().is_err());
    }
}
