//! Shared helper functions for CLI commands

use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::identity::ProposalId;

/// Format a ProposalId for display, truncating if too long
///
/// IDs longer than 16 characters are truncated to 13 chars with "..." suffix.
pub fn format_short_id(id: &ProposalId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Symbol shown in front of an amount
pub fn currency_symbol(currency: &str) -> &str {
    match currency {
        "TRY" => "₺",
        "USD" => "$",
        "EUR" => "€",
        other => other,
    }
}

/// Format an amount the way the proposal screen shows money: symbol,
/// `.` thousands separator, `,` decimal separator, two decimals.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}{}{},{}", sign, currency_symbol(currency), grouped, fraction)
}

/// Plain decimal for machine-readable output, at most two places
pub fn format_amount(amount: Decimal) -> String {
    amount.round_dp(2).normalize().to_string()
}
