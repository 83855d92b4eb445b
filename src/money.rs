//! Cash amounts are whole cents (`i64`); share counts are whole units.

use crate::errors::AppError;

/// Rounds a provider price in dollars to cents.
pub fn to_cents(dollars: f64) -> Option<i64> {
    if !dollars.is_finite() || dollars < 0.0 {
        return None;
    }
    Some((dollars * 100.0).round() as i64)
}

/// Formats cents as US dollars, e.g. `$1,234.56`.
pub fn usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, abs % 100)
}

/// Parses a form's share count. Zero, negatives and fractions are rejected.
pub fn parse_shares(raw: &str) -> Result<i64, AppError> {
    let shares: i64 = raw.trim().parse().map_err(|_| AppError::InvalidShares)?;
    if shares <= 0 {
        return Err(AppError::InvalidShares);
    }
    Ok(shares)
}

/// `shares * price`, failing on overflow rather than wrapping.
pub fn cost(shares: i64, price_cents: i64) -> Result<i64, AppError> {
    shares
        .checked_mul(price_cents)
        .ok_or(AppError::InsufficientFunds)
}
