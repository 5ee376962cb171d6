//! Display helpers for decimal amounts and percentages

use rust_decimal::Decimal;

/// `$1234.50` style, always two decimals (negative as `-$12.00`)
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Shortest plain form: `4500`, `450.5`
pub fn format_plain(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// One decimal place followed by `%`
pub fn format_percent(percent: Decimal) -> String {
    format!("{:.1}%", percent.round_dp(1))
}

/// Signed change such as `+6.7%`, or `n/a` when there is no baseline
pub fn format_change(change: Option<Decimal>) -> String {
    match change {
        Some(c) if c.is_sign_negative() && !c.round_dp(1).is_zero() => format!("{:.1}%", c.round_dp(1)),
        Some(c) => format!("+{:.1}%", c.round_dp(1).abs()),
        None => "n/a".to_string(),
    }
}
