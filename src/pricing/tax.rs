//! Proposal tax breakdown
//!
//! A proposal total is entered either tax-exclusive (tax is added on top) or
//! tax-inclusive (tax is backed out of it). All three figures are rounded to
//! cents with banker's rounding.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{add_or_zero, mul_or_zero, round2};

/// Tax rate in percent used when a proposal does not set one
pub const DEFAULT_TAX_RATE: Decimal = dec!(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub grand_total: Decimal,
}

impl TaxBreakdown {
    /// Split `total` into subtotal and tax. `rate_percent` of 20 means 20%.
    pub fn compute(total: Decimal, include_tax: bool, rate_percent: Decimal) -> Self {
        let rate = rate_percent / dec!(100);

        let subtotal = if include_tax && rate > Decimal::ZERO {
            round2(total / (Decimal::ONE + rate))
        } else {
            round2(total)
        };

        let tax_amount = if rate <= Decimal::ZERO {
            Decimal::ZERO
        } else if include_tax {
            round2(total - subtotal)
        } else {
            round2(mul_or_zero(subtotal, rate))
        };

        let grand_total = if include_tax {
            round2(total)
        } else {
            round2(add_or_zero(subtotal, tax_amount))
        };

        Self {
            subtotal,
            tax_amount,
            grand_total,
        }
    }
}
