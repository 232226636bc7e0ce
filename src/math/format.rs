// Display formatting and raw <-> human unit conversion.
//
// Nothing here emits scientific notation: downstream consumers parse these strings back
// into integer token units and reject exponents.

use std::str::FromStr;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{MathError, Result};

pub const DEFAULT_PRICE_DECIMALS: u32 = 6;

/// Smallest sub-micro price shown as a number; anything below renders as `<` this.
const PRICE_FLOOR: &str = "0.000000000000000001";
const PRICE_FLOOR_VALUE: f64 = 1e-18;

// --------------------------------- Helpers ---------------------------------

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

fn group_digits(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Thousands-grouped with at most `places` fraction digits.
fn format_grouped(value: f64, places: u32) -> String {
    let fixed = trim_fraction(format!("{:.*}", places as usize, value));
    match fixed.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group_digits(int_part), frac),
        None => group_digits(&fixed),
    }
}

// ------------------------------ Fixed decimal -------------------------------

/// Non-negative `value` rounded down to at most `places` fraction digits, trailing zeros
/// trimmed. Negative or non-finite input yields `"0"`.
///
/// The cut is taken on the exact binary value: `from_f64` would first round to ~15
/// significant digits, which can carry a value just under a cut point up past it.
pub fn to_fixed_decimal(value: f64, places: u32) -> String {
    if !value.is_finite() || value <= 0.0 {
        return "0".to_string();
    }
    match Decimal::from_f64_retain(value) {
        Some(d) => d
            .round_dp_with_strategy(places, RoundingStrategy::ToZero)
            .normalize()
            .to_string(),
        // beyond Decimal's 96-bit mantissa the fraction is meaningless anyway
        None => format!("{:.0}", value.floor()),
    }
}

// ---------------------------------- Prices ----------------------------------

/// Tiered price display:
/// - below 1e-6: up to 4 significant digits, or `<0.000000000000000001` under that floor
/// - below 1: up to `min(decimals, 8)` places
/// - 1e9 and above: compact K/M/B/T
/// - 1,000 to 1e9: grouped thousands, 2 places
/// - otherwise: grouped with up to `min(decimals, 4)` places
pub fn format_price(price: f64, decimals: u32) -> String {
    if !price.is_finite() || price <= 0.0 {
        return "0".to_string();
    }
    if price < 1e-6 {
        if price < PRICE_FLOOR_VALUE {
            return format!("<{}", PRICE_FLOOR);
        }
        let leading_zeros = (-price.log10().floor()) as usize;
        let places = (leading_zeros + 3).min(18);
        return trim_fraction(format!("{:.*}", places, price));
    }
    if price < 1.0 {
        return trim_fraction(format!("{:.*}", decimals.min(8) as usize, price));
    }
    if price >= 1e9 {
        return format_compact(price);
    }
    if price >= 1000.0 {
        return format_grouped(price, 2);
    }
    format_grouped(price, decimals.min(4))
}

/// `1.5K`, `2.35M`, `7B`, `1,200T`. Values under 1,000 are grouped with 2 places.
pub fn format_compact(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in UNITS {
        if value.abs() >= scale {
            return format!("{}{}", format_grouped(value / scale, 2), suffix);
        }
    }
    format_grouped(value, 2)
}

// ------------------------------ Token units ---------------------------------

fn pow10(decimals: u8) -> BigUint {
    num_traits::pow(BigUint::from(10u32), decimals as usize)
}

/// Raw integer units -> exact human decimal string (`1500000`, 6 -> `1.5`).
pub fn format_units(raw: &BigUint, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }
    let (int_part, frac) = raw.div_rem(&pow10(decimals));
    if frac.is_zero() {
        return int_part.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    trim_fraction(format!("{}.{}", int_part, frac))
}

/// Human decimal string -> raw integer units. Fraction digits beyond `decimals` are truncated.
pub fn parse_units(amount: &str, decimals: u8) -> Result<BigUint> {
    let amount = amount.trim();
    let invalid = || MathError::InvalidInput(format!("not a decimal amount: {:?}", amount));

    let (int_part, frac) = amount.split_once('.').unwrap_or((amount, ""));
    if int_part.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let kept: String = frac.chars().take(decimals as usize).collect();
    let digits = format!(
        "{}{:0<width$}",
        if int_part.is_empty() { "0" } else { int_part },
        kept,
        width = decimals as usize
    );
    BigUint::from_str(&digits).map_err(|_| invalid())
}

/// Raw amount string rendered for display: grouped integer part, fraction cut (not rounded)
/// to `max_fraction_digits`. Dust that would display as zero renders as `<0.0001` style.
pub fn format_token_amount(raw: &str, decimals: u8, max_fraction_digits: u32) -> Result<String> {
    let raw_value = BigUint::from_str(raw.trim())
        .map_err(|_| MathError::InvalidInput(format!("not a raw integer amount: {:?}", raw)))?;
    let human = format_units(&raw_value, decimals);

    let (int_part, frac) = human.split_once('.').unwrap_or((human.as_str(), ""));
    let frac: String = frac.chars().take(max_fraction_digits as usize).collect();
    let frac = frac.trim_end_matches('0');

    if int_part == "0" && frac.is_empty() && !raw_value.is_zero() && max_fraction_digits > 0 {
        return Ok(format!("<0.{}1", "0".repeat(max_fraction_digits as usize - 1)));
    }
    if frac.is_empty() {
        Ok(group_digits(int_part))
    } else {
        Ok(format!("{}.{}", group_digits(int_part), frac))
    }
}
