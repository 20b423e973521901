//! Proposal pricing calculator
//!
//! Pure functions that turn itemized cost inputs into display figures:
//!
//! - [`product`] - stone product lines (fee per plate × plate count)
//! - [`service`] - the five in-house service kinds and their rate card
//! - [`external`] - subcontracted services
//! - [`summary`] - aggregate cost, profit-adjusted total, final sale price
//! - [`item`] - dimension-based proposal item totals
//! - [`tax`] - subtotal / tax / grand total for a proposal total
//! - [`schedule`] - installment plan preview for a finalized proposal
//!
//! Nothing in here performs I/O or fails on bad numbers: inputs that are not
//! numbers are coerced to zero by [`input`] before they reach the arithmetic,
//! and an amount too large for a `Decimal` counts as zero instead of
//! overflowing.

pub mod external;
pub mod input;
pub mod item;
pub mod product;
pub mod schedule;
pub mod service;
pub mod summary;
pub mod tax;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub use external::{compute_external_service_cost, external_totals, ExternalServiceLine};
pub use input::{parse_non_negative_decimal, parse_plate_count, MAX_INPUT};
pub use item::{compute_item_total, ItemCost, ProposalItem};
pub use product::{compute_product_line_cost, product_totals, ProductLine};
pub use schedule::{build_schedule, Installment, InstallmentMethod, PaymentMethod, PlannedInstallment, ScheduleError};
pub use service::{compute_service_costs, RateCard, ServiceCost, ServiceCosts, ServiceInput, ServiceInputs, ServiceKind};
pub use summary::{compute_summary, PricingSummary};
pub use tax::TaxBreakdown;

/// Fixed 20% VAT applied as a multiplier
pub const VAT_MULTIPLIER: Decimal = dec!(1.2);

/// Profit multiplier used when a draft does not set one
pub const DEFAULT_PROFIT_MULTIPLIER: Decimal = dec!(1.6);

/// Consumables are this share of the other service costs
pub const CONSUMABLES_RATE: Decimal = dec!(0.05);

/// A VAT-exclusive cost and its VAT-inclusive counterpart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostPair {
    pub actual: Decimal,
    pub vat: Decimal,
}

impl CostPair {
    pub fn new(actual: Decimal, vat: Decimal) -> Self {
        Self { actual, vat }
    }

    /// Pair for a cost that carries VAT
    pub fn with_vat(actual: Decimal) -> Self {
        Self {
            actual,
            vat: mul_or_zero(actual, VAT_MULTIPLIER),
        }
    }
}

impl std::ops::Add for CostPair {
    type Output = CostPair;

    fn add(self, rhs: CostPair) -> CostPair {
        CostPair {
            actual: add_or_zero(self.actual, rhs.actual),
            vat: add_or_zero(self.vat, rhs.vat),
        }
    }
}

impl std::iter::Sum for CostPair {
    fn sum<I: Iterator<Item = CostPair>>(iter: I) -> Self {
        iter.fold(CostPair::default(), |acc, pair| acc + pair)
    }
}

/// `a × b`, zero when the product does not fit in a `Decimal`
pub fn mul_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::ZERO)
}

/// `a + b`, zero when the sum does not fit in a `Decimal`
pub fn add_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::ZERO)
}

/// Sum of `values` with the same overflow policy as [`add_or_zero`]
pub fn sum_or_zero(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, add_or_zero)
}

/// Round half to even at two decimal places (currency precision)
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp(2)
}
