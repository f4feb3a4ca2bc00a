//! Portfolio value over time.
//!
//! Every purchase and every recorded valuation is a date on which the
//! portfolio's total could have changed. The series has one point per such
//! date, with each owned property contributing its forward-filled value.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Id, ParseEnumError};

use super::PortfolioHolding;

/// A date on which portfolio value could have changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePoint {
    pub date: NaiveDate,
    pub triggers: Vec<ChangeTrigger>,
}

/// What caused a change point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeTrigger {
    Purchase { property_id: Id },
    Valuation { property_id: Id },
}

/// Collects change points keyed by date, merging events on the same day.
#[derive(Debug, Default)]
pub struct ChangePointCollector {
    points: BTreeMap<NaiveDate, Vec<ChangeTrigger>>,
}

impl ChangePointCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_purchase(&mut self, date: NaiveDate, property_id: Id) {
        self.points
            .entry(date)
            .or_default()
            .push(ChangeTrigger::Purchase { property_id });
    }

    pub fn add_valuation(&mut self, date: NaiveDate, property_id: Id) {
        self.points
            .entry(date)
            .or_default()
            .push(ChangeTrigger::Valuation { property_id });
    }

    /// Adds the purchase and every valuation of each holding.
    pub fn add_holdings(&mut self, holdings: &[PortfolioHolding]) {
        for holding in holdings {
            let property = &holding.property;
            self.add_purchase(property.purchase_date, property.id.clone());
            for date in holding.valuations.dates() {
                self.add_valuation(date, property.id.clone());
            }
        }
    }

    /// Consume the collector and return change points in ascending date order.
    pub fn into_change_points(self) -> Vec<ChangePoint> {
        self.points
            .into_iter()
            .map(|(date, triggers)| ChangePoint { date, triggers })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Total portfolio value on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub total_value: Decimal,
    /// Properties purchased on or before `date`.
    pub properties_owned: usize,
}

/// Total value of `holdings` on `date`.
///
/// Properties purchased after `date` are left out of the sum and the count.
pub fn portfolio_value_at(holdings: &[PortfolioHolding], date: NaiveDate) -> ValuePoint {
    let mut total_value = Decimal::ZERO;
    let mut properties_owned = 0;
    for holding in holdings {
        let property = &holding.property;
        if date < property.purchase_date {
            continue;
        }
        total_value = total_value
            .saturating_add(holding.valuations.value_at(property.purchase_price, date));
        properties_owned += 1;
    }
    ValuePoint {
        date,
        total_value,
        properties_owned,
    }
}

/// One point per distinct purchase or valuation date, ascending.
pub fn portfolio_value_series(holdings: &[PortfolioHolding]) -> Vec<ValuePoint> {
    let mut collector = ChangePointCollector::new();
    collector.add_holdings(holdings);
    debug!(
        properties = holdings.len(),
        dates = collector.len(),
        "building portfolio value series"
    );

    collector
        .into_change_points()
        .into_iter()
        .map(|point| portfolio_value_at(holdings, point.date))
        .collect()
}

/// Bucket size for thinning a series before charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Keep every point.
    #[default]
    Full,
    /// At most one point per ISO week.
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl FromStr for Granularity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "all" => Ok(Granularity::Full),
            "weekly" | "week" => Ok(Granularity::Weekly),
            "monthly" | "month" => Ok(Granularity::Monthly),
            "quarterly" | "quarter" => Ok(Granularity::Quarterly),
            "yearly" | "year" => Ok(Granularity::Yearly),
            _ => Err(ParseEnumError::new("granularity", s)),
        }
    }
}

/// Which point to keep from each bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoalesceStrategy {
    First,
    #[default]
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BucketKey {
    Week(i32, u32),
    Month(i32, u32),
    Quarter(i32, u32),
    Year(i32),
}

fn bucket_key(date: NaiveDate, granularity: Granularity) -> Option<BucketKey> {
    match granularity {
        Granularity::Full => None,
        Granularity::Weekly => {
            let week = date.iso_week();
            Some(BucketKey::Week(week.year(), week.week()))
        }
        Granularity::Monthly => Some(BucketKey::Month(date.year(), date.month())),
        Granularity::Quarterly => Some(BucketKey::Quarter(date.year(), (date.month() - 1) / 3)),
        Granularity::Yearly => Some(BucketKey::Year(date.year())),
    }
}

/// Keep one point per calendar bucket.
pub fn filter_by_granularity(
    points: Vec<ValuePoint>,
    granularity: Granularity,
    strategy: CoalesceStrategy,
) -> Vec<ValuePoint> {
    if points.is_empty() || granularity == Granularity::Full {
        return points;
    }

    let mut buckets: BTreeMap<BucketKey, Vec<ValuePoint>> = BTreeMap::new();
    for point in points {
        if let Some(key) = bucket_key(point.date, granularity) {
            buckets.entry(key).or_default().push(point);
        }
    }

    buckets
        .into_values()
        .filter_map(|mut bucket| match strategy {
            CoalesceStrategy::First => bucket.into_iter().next(),
            CoalesceStrategy::Last => bucket.pop(),
        })
        .collect()
}

/// Keep points with `start <= date <= end`; a missing bound is open.
pub fn filter_by_date_range(
    points: Vec<ValuePoint>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<ValuePoint> {
    points
        .into_iter()
        .filter(|p| start.map_or(true, |s| p.date >= s) && end.map_or(true, |e| p.date <= e))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(on: NaiveDate, total: Decimal) -> ValuePoint {
        ValuePoint {
            date: on,
            total_value: total,
            properties_owned: 1,
        }
    }

    #[test]
    fn collector_merges_same_date() {
        let mut collector = ChangePointCollector::new();
        collector.add_purchase(date(2024, 1, 1), Id::from("a"));
        collector.add_valuation(date(2024, 1, 1), Id::from("b"));

        let points = collector.into_change_points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].triggers.len(), 2);
    }

    #[test]
    fn collector_sorts_by_date() {
        let mut collector = ChangePointCollector::new();
        collector.add_valuation(date(2024, 3, 1), Id::from("a"));
        collector.add_purchase(date(2021, 1, 1), Id::from("a"));
        collector.add_valuation(date(2022, 6, 1), Id::from("a"));

        let dates: Vec<_> = collector
            .into_change_points()
            .into_iter()
            .map(|p| p.date)
            .collect();
        assert_eq!(dates, vec![date(2021, 1, 1), date(2022, 6, 1), date(2024, 3, 1)]);
    }

    #[test]
    fn trigger_serializes_with_type_tag() {
        let trigger = ChangeTrigger::Purchase {
            property_id: Id::from("p1"),
        };
        let json = serde_json::to_string(&trigger).unwrap();
        assert_eq!(json, r#"{"type":"purchase","property_id":"p1"}"#);
    }

    #[test]
    fn empty_portfolio_has_empty_series() {
        assert!(portfolio_value_series(&[]).is_empty());
    }

    #[test]
    fn monthly_keeps_last_point_per_month() {
        let points = vec![
            point(date(2024, 1, 3), dec!(1)),
            point(date(2024, 1, 20), dec!(2)),
            point(date(2024, 2, 10), dec!(3)),
        ];
        let filtered = filter_by_granularity(points, Granularity::Monthly, CoalesceStrategy::Last);
        let totals: Vec<_> = filtered.iter().map(|p| p.total_value).collect();
        assert_eq!(totals, vec![dec!(2), dec!(3)]);
    }

    #[test]
    fn quarterly_first_strategy() {
        let points = vec![
            point(date(2024, 1, 3), dec!(1)),
            point(date(2024, 3, 31), dec!(2)),
            point(date(2024, 4, 1), dec!(3)),
            point(date(2024, 6, 30), dec!(4)),
        ];
        let filtered =
            filter_by_granularity(points, Granularity::Quarterly, CoalesceStrategy::First);
        let totals: Vec<_> = filtered.iter().map(|p| p.total_value).collect();
        assert_eq!(totals, vec![dec!(1), dec!(3)]);
    }

    #[test]
    fn weekly_uses_iso_weeks() {
        // 2024-12-30 falls in ISO week 1 of 2025, together with 2025-01-02.
        let points = vec![
            point(date(2024, 12, 29), dec!(1)),
            point(date(2024, 12, 30), dec!(2)),
            point(date(2025, 1, 2), dec!(3)),
        ];
        let filtered = filter_by_granularity(points, Granularity::Weekly, CoalesceStrategy::Last);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[1].total_value, dec!(3));
    }

    #[test]
    fn yearly_and_full() {
        let points = vec![
            point(date(2023, 5, 1), dec!(1)),
            point(date(2023, 9, 1), dec!(2)),
            point(date(2024, 2, 1), dec!(3)),
        ];
        assert_eq!(
            filter_by_granularity(points.clone(), Granularity::Full, CoalesceStrategy::Last).len(),
            3
        );
        let yearly = filter_by_granularity(points, Granularity::Yearly, CoalesceStrategy::Last);
        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[0].date, date(2023, 9, 1));
    }

    #[test]
    fn date_range_is_inclusive() {
        let points = vec![
            point(date(2024, 1, 10), dec!(1)),
            point(date(2024, 1, 15), dec!(2)),
            point(date(2024, 1, 20), dec!(3)),
        ];
        let filtered =
            filter_by_date_range(points.clone(), Some(date(2024, 1, 15)), Some(date(2024, 1, 20)));
        assert_eq!(filtered.len(), 2);

        let open_start = filter_by_date_range(points, None, Some(date(2024, 1, 12)));
        assert_eq!(open_start.len(), 1);
    }

    #[test]
    fn granularity_parses_aliases() {
        assert_eq!("Monthly".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert_eq!("quarter".parse::<Granularity>().unwrap(), Granularity::Quarterly);
        assert_eq!("all".parse::<Granularity>().unwrap(), Granularity::Full);
        assert!("daily".parse::<Granularity>().is_err());
    }
}
