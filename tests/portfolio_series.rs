use propfolio::portfolio::{
    filter_by_granularity, portfolio_value_at, portfolio_value_series, ChangePointCollector,
    ChangeTrigger, CoalesceStrategy, Granularity, PortfolioHolding,
};
use rust_decimal_macros::dec;

mod support;
use support::{date, property, valuation};

fn two_property_portfolio() -> Vec<PortfolioHolding> {
    vec![
        PortfolioHolding::new(property("a", "u1", dec!(500000), date(2020, 1, 1)), vec![], vec![]),
        PortfolioHolding::new(
            property("b", "u1", dec!(300000), date(2021, 1, 1)),
            vec![valuation("b", dec!(320000), date(2022, 1, 1))],
            vec![],
        ),
    ]
}

#[test]
fn series_forward_fills_purchase_prices_and_valuations() {
    let series = portfolio_value_series(&two_property_portfolio());

    let totals: Vec<_> = series
        .iter()
        .map(|p| (p.date, p.total_value, p.properties_owned))
        .collect();
    assert_eq!(
        totals,
        vec![
            (date(2020, 1, 1), dec!(500000), 1),
            (date(2021, 1, 1), dec!(800000), 2),
            (date(2022, 1, 1), dec!(820000), 2),
        ]
    );
}

#[test]
fn value_between_change_points_carries_the_earlier_total() {
    let holdings = two_property_portfolio();

    let before_any = portfolio_value_at(&holdings, date(2019, 12, 31));
    assert_eq!(before_any.total_value, dec!(0));
    assert_eq!(before_any.properties_owned, 0);

    let mid_2021 = portfolio_value_at(&holdings, date(2021, 6, 30));
    assert_eq!(mid_2021.total_value, dec!(800000));
}

#[test]
fn valuation_dated_before_purchase_is_carried_forward_from_purchase() {
    let holdings = vec![PortfolioHolding::new(
        property("a", "u1", dec!(400000), date(2022, 6, 1)),
        vec![valuation("a", dec!(999999), date(2022, 1, 1))],
        vec![],
    )];

    let series = portfolio_value_series(&holdings);
    // The early valuation still creates a date, with nothing owned yet.
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, date(2022, 1, 1));
    assert_eq!(series[0].total_value, dec!(0));
    assert_eq!(series[1].total_value, dec!(999999));
}

#[test]
fn same_day_valuations_of_different_properties_share_a_point() {
    let holdings = vec![
        PortfolioHolding::new(
            property("a", "u1", dec!(100), date(2020, 1, 1)),
            vec![valuation("a", dec!(150), date(2023, 3, 1))],
            vec![],
        ),
        PortfolioHolding::new(
            property("b", "u1", dec!(200), date(2020, 1, 1)),
            vec![valuation("b", dec!(250), date(2023, 3, 1))],
            vec![],
        ),
    ];

    let mut collector = ChangePointCollector::new();
    collector.add_holdings(&holdings);
    let points = collector.into_change_points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].triggers.len(), 2);
    assert!(points[0]
        .triggers
        .iter()
        .all(|t| matches!(t, ChangeTrigger::Purchase { .. })));

    let series = portfolio_value_series(&holdings);
    assert_eq!(series.last().map(|p| p.total_value), Some(dec!(400)));
}

#[test]
fn empty_portfolio_has_no_points() {
    assert!(portfolio_value_series(&[]).is_empty());
}

#[test]
fn yearly_granularity_keeps_year_end_totals() {
    let series = portfolio_value_series(&two_property_portfolio());
    let yearly = filter_by_granularity(series, Granularity::Yearly, CoalesceStrategy::Last);
    assert_eq!(yearly.len(), 3);
    assert_eq!(yearly[2].total_value, dec!(820000));
}
