//! Subcontracted (external) services

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::lenient;
use super::{mul_or_zero, CostPair};

/// A service bought in from outside: waterjet cutting, polishing, crane hire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalServiceLine {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub quantity: Decimal,

    /// Unit of measure (m, m², piece, hour)
    #[serde(default)]
    pub unit: String,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub unit_price: Decimal,

    /// Days; zero or less counts as a single day
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub duration: Decimal,
}

impl ExternalServiceLine {
    pub fn new(name: impl Into<String>, quantity: Decimal, unit_price: Decimal, duration: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: String::new(),
            unit_price,
            duration,
        }
    }

    /// Duration factor used in the cost; never below one day
    pub fn duration_factor(&self) -> Decimal {
        if self.duration <= Decimal::ZERO {
            Decimal::ONE
        } else {
            self.duration
        }
    }
}

/// VAT-exclusive cost of an external service line
pub fn compute_external_service_cost(line: &ExternalServiceLine) -> Decimal {
    mul_or_zero(mul_or_zero(line.quantity, line.unit_price), line.duration_factor())
}

/// Sum of all external service costs, VAT applied for display
pub fn external_totals(lines: &[ExternalServiceLine]) -> CostPair {
    lines
        .iter()
        .map(|line| CostPair::with_vat(compute_external_service_cost(line)))
        .sum()
}
