use std::sync::LazyLock;

use chrono::{DateTime, Local, Utc};
use iso_currency::Currency;
use num_format::{CustomFormat, Grouping, ToFormattedString as _};

static INDIAN_GROUPING: LazyLock<CustomFormat> = LazyLock::new(|| {
    CustomFormat::builder()
        .grouping(Grouping::Indian)
        .separator(",")
        .minus_sign("-")
        .build()
        .expect("hardcoded number format should be valid")
});

/// Format a rupee amount with the currency symbol, lakh/crore digit grouping
/// and two decimals (ex. `₹1,50,000.00`). Non-finite amounts render as zero.
pub fn format_amount(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let decimal_places = Currency::INR.exponent().unwrap_or(2) as u32;
    let scale = 10u64.pow(decimal_places);
    let minor_units = (amount.abs() * scale as f64).round() as u64;
    let sign = if amount < 0.0 && minor_units > 0 { "-" } else { "" };
    format!(
        "{}{}{}.{:0width$}",
        sign,
        Currency::INR.symbol(),
        (minor_units / scale).to_formatted_string(&*INDIAN_GROUPING),
        minor_units % scale,
        width = decimal_places as usize,
    )
}

/// Calendar day in local time (ex. `05 Mar 2024`).
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%d %b %Y").to_string()
}
