//! Aggregate pricing summary

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::service::ServiceCosts;
use super::{mul_or_zero, sum_or_zero, CostPair, VAT_MULTIPLIER};

/// Totals shown at the bottom of the cost tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSummary {
    /// Sum of all actual (VAT-exclusive) costs
    pub general_cost: Decimal,
    /// Sum of all VAT-inclusive costs
    pub vat_cost: Decimal,
    pub profit_multiplier: Decimal,
    /// `general_cost × profit_multiplier`
    pub profit_total: Decimal,
    /// `profit_total × 1.2`, the sale price
    pub final_total: Decimal,
}

impl PricingSummary {
    /// Summary for a known VAT-exclusive cost
    pub fn from_costs(general_cost: Decimal, vat_cost: Decimal, profit_multiplier: Decimal) -> Self {
        let profit_total = mul_or_zero(general_cost, profit_multiplier);
        Self {
            general_cost,
            vat_cost,
            profit_multiplier,
            profit_total,
            final_total: mul_or_zero(profit_total, VAT_MULTIPLIER),
        }
    }

    /// Profit over cost before VAT
    pub fn margin(&self) -> Decimal {
        self.profit_total - self.general_cost
    }
}

/// Combine product, service, and external costs into the sale price
pub fn compute_summary(
    product_totals: &CostPair,
    service_costs: &ServiceCosts,
    external_totals: &CostPair,
    profit_multiplier: Decimal,
) -> PricingSummary {
    let general_cost = sum_or_zero([product_totals.actual, service_costs.actual_total, external_totals.actual]);
    let vat_cost = sum_or_zero([product_totals.vat, service_costs.vat_total, external_totals.vat]);
    PricingSummary::from_costs(general_cost, vat_cost, profit_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::service::{compute_service_costs, RateCard, ServiceInput, ServiceInputs, ServiceKind};
    use crate::pricing::{external_totals, product_totals, ExternalServiceLine, ProductLine};
    use rust_decimal_macros::dec;

    #[test]
    fn test_profit_and_final_total() {
        let summary = PricingSummary::from_costs(dec!(1000), dec!(1200), dec!(1.6));
        assert_eq!(summary.profit_total, dec!(1600));
        assert_eq!(summary.final_total, dec!(1920));
        assert_eq!(summary.margin(), dec!(600));
    }

    #[test]
    fn test_compute_summary_sums_all_categories() {
        let products = product_totals(&[ProductLine::new(dec!(100), 5)]);
        let services = compute_service_costs(
            &ServiceInputs::default().with(ServiceKind::Transport, ServiceInput::new(dec!(1), dec!(0))),
            &RateCard::default(),
        );
        let external = external_totals(&[ExternalServiceLine::new("Waterjet", dec!(3), dec!(50), dec!(0))]);

        let summary = compute_summary(&products, &services, &external, dec!(1.6));

        // 500 + (3500 + 175) + 150
        assert_eq!(summary.general_cost, dec!(4325));
        // 600 + (4200 + 210) + 180
        assert_eq!(summary.vat_cost, dec!(5190));
        assert_eq!(summary.profit_total, dec!(6920));
        assert_eq!(summary.final_total, dec!(8304));
    }

    #[test]
    fn test_compute_summary_is_idempotent() {
        let products = product_totals(&[ProductLine::new(dec!(845.5), 3)]);
        let services = compute_service_costs(&ServiceInputs::default(), &RateCard::default());
        let external = CostPair::default();

        let first = compute_summary(&products, &services, &external, dec!(1.45));
        let second = compute_summary(&products, &services, &external, dec!(1.45));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let services = compute_service_costs(&ServiceInputs::default(), &RateCard::default());
        let summary = compute_summary(&CostPair::default(), &services, &CostPair::default(), dec!(1.6));
        assert_eq!(summary.final_total, Decimal::ZERO);
    }
}
