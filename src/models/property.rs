use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Id, ParseEnumError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    House,
    Apartment,
    Townhouse,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Apartment => "Apartment",
            PropertyType::Townhouse => "Townhouse",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            "townhouse" => Ok(PropertyType::Townhouse),
            _ => Err(ParseEnumError::new("property type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AustralianState {
    Nsw,
    Vic,
    Qld,
    Sa,
    Wa,
    Tas,
    Nt,
    Act,
}

impl AustralianState {
    pub const ALL: [AustralianState; 8] = [
        AustralianState::Nsw,
        AustralianState::Vic,
        AustralianState::Qld,
        AustralianState::Sa,
        AustralianState::Wa,
        AustralianState::Tas,
        AustralianState::Nt,
        AustralianState::Act,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AustralianState::Nsw => "NSW",
            AustralianState::Vic => "VIC",
            AustralianState::Qld => "QLD",
            AustralianState::Sa => "SA",
            AustralianState::Wa => "WA",
            AustralianState::Tas => "TAS",
            AustralianState::Nt => "NT",
            AustralianState::Act => "ACT",
        }
    }
}

impl fmt::Display for AustralianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AustralianState {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseEnumError::new("state", s))
    }
}

/// An investment property owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Id,
    pub user_id: Id,
    pub street: String,
    pub suburb: String,
    pub state: AustralianState,
    pub postcode: String,
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_loan_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_loan_amount: Option<Decimal>,
    /// Annual interest rate as a percentage (e.g. `6.19`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lender_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn current_loan(&self) -> Decimal {
        self.current_loan_amount.unwrap_or(Decimal::ZERO)
    }

    /// `"{street}, {suburb}, {state} {postcode}"`
    pub fn address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.street, self.suburb, self.state, self.postcode
        )
    }

    /// `"{street}, {suburb}"`, used for sorting and compact labels.
    pub fn short_address(&self) -> String {
        format!("{}, {}", self.street, self.suburb)
    }
}
