//! Permissive numeric input
//!
//! Cost forms accept whatever is typed. Anything that is not a non-negative
//! number becomes zero instead of an error, so a half-typed row never breaks
//! the running totals.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Largest amount accepted as input; anything above reads as zero
pub const MAX_INPUT: Decimal = dec!(1000000000000000);

/// Parse a user-entered amount, falling back to zero.
///
/// Accepts `.` or `,` as the decimal separator and tolerates digit grouping
/// with spaces, underscores, or the other separator (`1.250,75` and
/// `1,250.75` are both 1250.75). Empty, non-numeric, negative, and
/// above-[`MAX_INPUT`] input yield zero.
pub fn parse_non_negative_decimal(input: &str) -> Decimal {
    parse_decimal(input).map(accept).unwrap_or(Decimal::ZERO)
}

/// Apply the input policy to an already numeric value
fn accept(value: Decimal) -> Decimal {
    if value > Decimal::ZERO && value <= MAX_INPUT {
        value.normalize()
    } else {
        Decimal::ZERO
    }
}

/// Parse a plate count with the same fallback; fractions are truncated.
pub fn parse_plate_count(input: &str) -> u32 {
    parse_non_negative_decimal(input)
        .trunc()
        .to_u32()
        .unwrap_or(0)
}

/// Parse a signed decimal, `None` if the text is not a number at all
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(cleaned.as_str());
    if cleaned.is_empty() {
        return None;
    }

    let normalized = normalize_separators(cleaned);
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

fn normalize_separators(s: &str) -> String {
    let last_dot = s.rfind('.');
    let last_comma = s.rfind(',');
    let dots = s.matches('.').count();
    let commas = s.matches(',').count();

    match (last_dot, last_comma) {
        (Some(d), Some(c)) => {
            // Whichever separator comes last is the decimal point
            if d > c {
                s.replace(',', "")
            } else {
                s.replace('.', "").replace(',', ".")
            }
        }
        (None, Some(_)) if commas == 1 => s.replace(',', "."),
        (None, Some(_)) => s.replace(',', ""),
        (Some(_), None) if dots > 1 => s.replace('.', ""),
        _ => s.to_string(),
    }
}

fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Serde adapters that apply the permissive policy to YAML/JSON fields.
///
/// Numbers, numeric strings, `null`, and junk are all accepted; junk and
/// negative values read as zero.
pub mod lenient {
    use super::*;
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(accept(Decimal::from(v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(accept(Decimal::from(v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Ok(accept(decimal_from_f64(v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            Ok(parse_non_negative_decimal(v))
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Decimal, D::Error> {
            d.deserialize_any(DecimalVisitor)
        }
    }

    /// Lenient `Decimal` field
    pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        d.deserialize_any(DecimalVisitor)
    }

    /// Lenient whole-number field (plate counts, item quantities)
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let value = d.deserialize_any(DecimalVisitor)?;
        Ok(value.trunc().to_u32().unwrap_or(0))
    }
}
