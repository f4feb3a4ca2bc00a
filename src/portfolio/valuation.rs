//! Point-in-time lookup of a property's value.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::ValuationEntry;

/// Value in effect on `query_date`.
///
/// `entries` must be sorted descending by `date_recorded`. Returns the value
/// of the first entry recorded on or before `query_date`, or
/// `purchase_price` when there is none. Ties go to whichever entry comes
/// first in `entries`.
///
/// Does not check the purchase date; callers exclude properties that were
/// not yet owned on `query_date`.
pub fn value_at(entries: &[ValuationEntry], purchase_price: Decimal, query_date: NaiveDate) -> Decimal {
    entries
        .iter()
        .find(|entry| entry.date_recorded <= query_date)
        .map(|entry| entry.value)
        .unwrap_or(purchase_price)
}

/// A property's valuation entries, kept sorted newest first.
#[derive(Debug, Clone, Default)]
pub struct ValuationHistory {
    entries: Vec<ValuationEntry>,
}

impl ValuationHistory {
    /// Sorts descending by `date_recorded`. The sort is stable, so entries
    /// sharing a date keep their relative input order.
    pub fn new(mut entries: Vec<ValuationEntry>) -> Self {
        entries.sort_by(|a, b| b.date_recorded.cmp(&a.date_recorded));
        Self { entries }
    }

    pub fn entries(&self) -> &[ValuationEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Most recently dated entry, including any dated after today.
    pub fn latest(&self) -> Option<&ValuationEntry> {
        self.entries.first()
    }

    pub fn value_at(&self, purchase_price: Decimal, query_date: NaiveDate) -> Decimal {
        value_at(&self.entries, purchase_price, query_date)
    }

    /// Value known as of `today`; entries dated in the future are ignored.
    pub fn current_value(&self, purchase_price: Decimal, today: NaiveDate) -> Decimal {
        self.value_at(purchase_price, today)
    }

    /// Recorded dates, ascending. Repeats are kept.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.iter().rev().map(|entry| entry.date_recorded)
    }
}

impl From<Vec<ValuationEntry>> for ValuationHistory {
    fn from(entries: Vec<ValuationEntry>) -> Self {
        Self::new(entries)
    }
}
