use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DisplayConfig;

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Canonical numeric string: optional rounding (half away from zero), then
/// trailing zeros stripped.
pub fn format_decimal(value: Decimal, decimals: Option<u32>) -> String {
    let rounded = match decimals {
        Some(dp) => round(value, dp),
        None => value,
    };
    rounded.normalize().to_string()
}

/// Exactly `dp` decimal places, e.g. `format_fixed(12.5, 2) == "12.50"`.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let s = format_decimal(value, Some(dp));
    pad_fraction_to_dp(&s, dp)
}

fn group_int_digits(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

fn pad_fraction_to_dp(s: &str, dp: u32) -> String {
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
    if dp == 0 {
        return int_part.to_string();
    }

    let mut frac: String = frac_part.chars().take(dp as usize).collect();
    while frac.len() < dp as usize {
        frac.push('0');
    }
    format!("{int_part}.{frac}")
}

fn group_number_string(s: &str) -> String {
    match s.split_once('.') {
        Some((int_part, frac)) if !frac.is_empty() => {
            format!("{}.{frac}", group_int_digits(int_part))
        }
        _ => group_int_digits(s),
    }
}

/// Money for display, e.g. `-$1,234,568`.
///
/// With a configured precision the value is padded to exactly that many
/// decimal places.
pub fn format_currency(value: Decimal, display: &DisplayConfig) -> String {
    let rounded = match display.currency_decimals {
        Some(dp) => round(value, dp),
        None => value,
    };

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let mut s = rounded.abs().normalize().to_string();
    if let Some(dp) = display.currency_decimals {
        s = pad_fraction_to_dp(&s, dp);
    }
    if display.currency_grouping {
        s = group_number_string(&s);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if let Some(sym) = &display.currency_symbol {
        out.push_str(sym);
    }
    out.push_str(&s);
    out
}

/// A value already expressed in percent, e.g. `12.5` → `"12.50%"`.
pub fn format_percentage(value: Decimal, decimals: u32) -> String {
    format!("{}%", format_fixed(value, decimals))
}

/// `dd/mm/yyyy`
pub fn format_date_au(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Accepts ISO `yyyy-mm-dd` or Australian `dd/mm/yyyy`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .with_context(|| format!("Invalid date {value:?}: expected YYYY-MM-DD or DD/MM/YYYY"))
}
