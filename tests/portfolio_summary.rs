use propfolio::models::{CashflowConfig, RentFrequency};
use propfolio::portfolio::{
    property_valuations, sort_properties, summarize, PortfolioHolding, PortfolioSummary,
    SortDirection, SortField,
};
use rust_decimal_macros::dec;

mod support;
use support::{cashflow, date, property, valuation};

fn holdings() -> Vec<PortfolioHolding> {
    let mut a = property("a", "u1", dec!(500000), date(2020, 1, 1));
    a.current_loan_amount = Some(dec!(400000));
    let b = property("b", "u1", dec!(300000), date(2022, 1, 1));

    vec![
        PortfolioHolding::new(
            a,
            vec![valuation("a", dec!(600000), date(2024, 1, 1))],
            vec![CashflowConfig {
                rent_income: Some(dec!(2500)),
                rent_frequency: Some(RentFrequency::Monthly),
                mortgage_payment: Some(dec!(2000)),
                ..cashflow("a", date(2023, 1, 1))
            }],
        ),
        PortfolioHolding::new(
            b,
            vec![
                valuation("b", dec!(330000), date(2024, 6, 1)),
                valuation("b", dec!(999999), date(2026, 1, 1)),
            ],
            vec![],
        ),
    ]
}

#[test]
fn totals_add_up() {
    let summary = summarize(&holdings(), date(2025, 1, 1));

    assert_eq!(summary.property_count, 2);
    assert_eq!(summary.total_value, dec!(930000));
    assert_eq!(summary.total_debt, dec!(400000));
    assert_eq!(summary.total_equity, dec!(530000));
    assert_eq!(summary.total_equity + summary.total_debt, summary.total_value);
    assert_eq!(summary.average_lvr.round_dp(4), dec!(43.0108));
}

#[test]
fn future_valuations_are_ignored_until_their_date() {
    let before = summarize(&holdings(), date(2025, 1, 1));
    let after = summarize(&holdings(), date(2026, 1, 1));

    assert_eq!(before.total_value, dec!(930000));
    assert_eq!(after.total_value, dec!(1599999));
}

#[test]
fn growth_and_return() {
    let summary = summarize(&holdings(), date(2025, 1, 1));

    assert_eq!(summary.total_invested, dec!(800000));
    assert_eq!(summary.total_equity_growth, dec!(130000));
    assert_eq!(summary.total_return_percentage, dec!(16.25));
    // Unweighted: (20% + 10%) / 2.
    assert_eq!(summary.average_growth_percentage, dec!(15));
    // (1827 + 1096) days / 365 / 2 properties.
    assert_eq!(summary.average_holding_years.round_dp(4), dec!(4.0041));
    assert_eq!(summary.annualized_growth_rate.round_dp(4), dec!(3.7462));
}

#[test]
fn cashflow_totals() {
    let summary = summarize(&holdings(), date(2025, 1, 1));

    assert_eq!(summary.properties_with_cashflow, 1);
    assert_eq!(summary.total_monthly_income, dec!(2500));
    assert_eq!(summary.total_monthly_expenses, dec!(2000));
    assert_eq!(summary.net_monthly_cashflow, dec!(500));
    assert_eq!(summary.cashflow.net.annual, dec!(6000));
}

#[test]
fn empty_portfolio_is_all_zero() {
    let summary = summarize(&[], date(2025, 1, 1));
    assert_eq!(summary, PortfolioSummary::default());
}

#[test]
fn property_bought_after_today_counts_at_purchase_price() {
    let holdings = vec![PortfolioHolding::new(
        property("c", "u1", dec!(750000), date(2025, 3, 1)),
        vec![],
        vec![],
    )];
    let summary = summarize(&holdings, date(2025, 1, 1));

    assert_eq!(summary.total_value, dec!(750000));
    assert!(summary.average_holding_years < dec!(0));
    assert_eq!(summary.annualized_growth_rate, dec!(0));
}

#[test]
fn sort_by_metric_and_direction() {
    let mut rows = property_valuations(&holdings(), date(2025, 1, 1));

    sort_properties(&mut rows, SortField::Value, SortDirection::Desc);
    let ids: Vec<_> = rows.iter().map(|r| r.property.id.to_string()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    sort_properties(&mut rows, SortField::Lvr, SortDirection::Asc);
    let ids: Vec<_> = rows.iter().map(|r| r.property.id.to_string()).collect();
    assert_eq!(ids, vec!["b", "a"]);

    sort_properties(&mut rows, SortField::GrowthPercent, SortDirection::Desc);
    assert_eq!(rows[0].metrics.growth_percentage, dec!(20));
}

#[test]
fn per_property_metrics() {
    let rows = property_valuations(&holdings(), date(2025, 1, 1));
    let a = &rows[0];

    assert_eq!(a.metrics.current_value, dec!(600000));
    assert_eq!(a.metrics.growth, dec!(100000));
    assert_eq!(a.metrics.equity, dec!(200000));
    assert_eq!(a.metrics.lvr.round_dp(2), dec!(66.67));
    assert!(a.has_cashflow);
    assert_eq!(a.latest_valuation_date, Some(date(2024, 1, 1)));
    assert!(!rows[1].has_cashflow);
}
