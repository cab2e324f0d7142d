//! Currency codes, display symbols and the static conversion table.

use anyhow::anyhow;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Shown instead of an amount when privacy mode is on.
pub const PRIVACY_MASK: &str = "••••";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPER")]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    INR,
    JPY,
    CAD,
    AUD,
    AED,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 8] = [
        CurrencyCode::USD,
        CurrencyCode::EUR,
        CurrencyCode::GBP,
        CurrencyCode::INR,
        CurrencyCode::JPY,
        CurrencyCode::CAD,
        CurrencyCode::AUD,
        CurrencyCode::AED,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "$",
            CurrencyCode::EUR => "€",
            CurrencyCode::GBP => "£",
            CurrencyCode::INR => "₹",
            CurrencyCode::JPY => "¥",
            CurrencyCode::CAD => "C$",
            CurrencyCode::AUD => "A$",
            CurrencyCode::AED => "AED ",
        }
    }

    /// Units of this currency per US dollar.
    pub fn usd_rate(&self) -> f64 {
        match self {
            CurrencyCode::USD => 1.0,
            CurrencyCode::EUR => 0.92,
            CurrencyCode::GBP => 0.79,
            CurrencyCode::INR => 83.5,
            CurrencyCode::JPY => 151.2,
            CurrencyCode::CAD => 1.36,
            CurrencyCode::AUD => 1.52,
            CurrencyCode::AED => 3.67,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "USD",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::GBP => "GBP",
            CurrencyCode::INR => "INR",
            CurrencyCode::JPY => "JPY",
            CurrencyCode::CAD => "CAD",
            CurrencyCode::AUD => "AUD",
            CurrencyCode::AED => "AED",
        }
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        CurrencyCode::ALL
            .into_iter()
            .find(|c| c.code() == upper)
            .ok_or_else(|| anyhow!("Unsupported currency: {}", s))
    }
}

/// Rate that turns one unit of `from` into `to`.
pub fn exchange_rate(from: CurrencyCode, to: CurrencyCode) -> f64 {
    to.usd_rate() / from.usd_rate()
}

pub fn convert(amount: f64, from: CurrencyCode, to: CurrencyCode) -> f64 {
    amount * exchange_rate(from, to)
}

/// Formats `amount` with the currency symbol, thousands separators and at
/// most two decimals.
pub fn format_money(amount: f64, currency: CurrencyCode, privacy: bool) -> String {
    if privacy {
        return PRIVACY_MASK.to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{}{}", currency.symbol(), group_thousands(amount.abs(), 2))
}

/// Renders a number with comma grouping, dropping trailing zero decimals.
pub fn group_thousands(value: f64, max_decimals: usize) -> String {
    if value < 0.0 {
        return format!("-{}", group_thousands(-value, max_decimals));
    }
    let fixed = format!("{value:.max_decimals$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac_part}")
    }
}
