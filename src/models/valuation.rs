use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Id;

/// Source label recorded for the valuation created alongside a new property.
pub const PURCHASE_SOURCE: &str = "Purchase";

/// A recorded value for a property on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationEntry {
    pub id: Id,
    pub property_id: Id,
    pub value: Decimal,
    pub date_recorded: NaiveDate,
    /// Where the figure came from (e.g. "Purchase", "Bank valuation").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ValuationEntry {
    pub fn new(property_id: Id, value: Decimal, date_recorded: NaiveDate) -> Self {
        Self {
            id: Id::new(),
            property_id,
            value,
            date_recorded,
            source: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
