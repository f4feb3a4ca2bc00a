mod cashflow;
mod id;
mod id_generator;
mod property;
mod user;
mod valuation;

pub use cashflow::{CashflowConfig, RentFrequency};
pub use id::{Id, IdError};
pub use id_generator::{FixedIdGenerator, IdGenerator, UuidIdGenerator};
pub use property::{AustralianState, Property, PropertyType};
pub use user::{SubscriptionTier, UserProfile, FREE_TIER_MAX_PROPERTIES};
pub use valuation::{ValuationEntry, PURCHASE_SOURCE};

/// A string did not name a known variant of one of the model enums.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
