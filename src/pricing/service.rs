//! In-house service costs
//!
//! Five service kinds are priced on every proposal. Four are priced directly
//! from the rate card (`unit price × total × duration`); consumables are a
//! fixed share of those four.
//!
//! Only transport and consumables carry VAT. Labor, atelier overhead, and site
//! labor report their VAT-inclusive value equal to the actual cost.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::input::lenient;
use super::{mul_or_zero, sum_or_zero, CONSUMABLES_RATE, VAT_MULTIPLIER};

/// Service kinds, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Labor,
    AtelierOverhead,
    Consumables,
    SiteLabor,
    Transport,
}

impl ServiceKind {
    pub fn all() -> &'static [ServiceKind] {
        &[
            ServiceKind::Labor,
            ServiceKind::AtelierOverhead,
            ServiceKind::Consumables,
            ServiceKind::SiteLabor,
            ServiceKind::Transport,
        ]
    }

    /// Kinds priced from the rate card (everything except consumables)
    pub fn priced() -> &'static [ServiceKind] {
        &[
            ServiceKind::Labor,
            ServiceKind::AtelierOverhead,
            ServiceKind::SiteLabor,
            ServiceKind::Transport,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Labor => "labor",
            ServiceKind::AtelierOverhead => "atelier_overhead",
            ServiceKind::Consumables => "consumables",
            ServiceKind::SiteLabor => "site_labor",
            ServiceKind::Transport => "transport",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Labor => "Labor",
            ServiceKind::AtelierOverhead => "Atelier overhead",
            ServiceKind::Consumables => "Consumables",
            ServiceKind::SiteLabor => "Site labor",
            ServiceKind::Transport => "Transport",
        }
    }

    /// Whether the VAT multiplier applies to this kind's cost
    pub fn carries_vat(&self) -> bool {
        matches!(self, ServiceKind::Transport | ServiceKind::Consumables)
    }

    /// Total is pinned to 1 for the overhead service
    pub fn fixed_total(&self) -> Option<Decimal> {
        match self {
            ServiceKind::AtelierOverhead => Some(Decimal::ONE),
            _ => None,
        }
    }

    /// Duration is pinned to 1 for transport
    pub fn fixed_duration(&self) -> Option<Decimal> {
        match self {
            ServiceKind::Transport => Some(Decimal::ONE),
            _ => None,
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "labor" | "labour" => Ok(ServiceKind::Labor),
            "atelier_overhead" | "overhead" | "atelier" => Ok(ServiceKind::AtelierOverhead),
            "consumables" => Ok(ServiceKind::Consumables),
            "site_labor" | "site" => Ok(ServiceKind::SiteLabor),
            "transport" => Ok(ServiceKind::Transport),
            _ => Err(format!("Unknown service: {}", s)),
        }
    }
}

/// Editable quantities for one service
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInput {
    /// Headcount, trips, or units depending on the service
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total: Decimal,

    /// Days
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub duration: Decimal,
}

impl ServiceInput {
    pub fn new(total: Decimal, duration: Decimal) -> Self {
        Self { total, duration }
    }
}

/// Inputs for the four directly priced services
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInputs {
    #[serde(default)]
    pub labor: ServiceInput,
    #[serde(default)]
    pub atelier_overhead: ServiceInput,
    #[serde(default)]
    pub site_labor: ServiceInput,
    #[serde(default)]
    pub transport: ServiceInput,
}

impl ServiceInputs {
    /// Input for a kind; consumables have none and read as zero
    pub fn get(&self, kind: ServiceKind) -> ServiceInput {
        match kind {
            ServiceKind::Labor => self.labor,
            ServiceKind::AtelierOverhead => self.atelier_overhead,
            ServiceKind::SiteLabor => self.site_labor,
            ServiceKind::Transport => self.transport,
            ServiceKind::Consumables => ServiceInput::default(),
        }
    }

    /// Replace the input for a kind. Consumables are derived, so setting them
    /// leaves the inputs unchanged.
    pub fn with(mut self, kind: ServiceKind, input: ServiceInput) -> Self {
        match kind {
            ServiceKind::Labor => self.labor = input,
            ServiceKind::AtelierOverhead => self.atelier_overhead = input,
            ServiceKind::SiteLabor => self.site_labor = input,
            ServiceKind::Transport => self.transport = input,
            ServiceKind::Consumables => {}
        }
        self
    }
}

/// Unit prices for the directly priced services
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateCard {
    pub labor: Decimal,
    pub atelier_overhead: Decimal,
    pub site_labor: Decimal,
    pub transport: Decimal,
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            labor: dec!(1500),
            atelier_overhead: dec!(6350),
            site_labor: dec!(2000),
            transport: dec!(3500),
        }
    }
}

impl RateCard {
    pub fn unit_price(&self, kind: ServiceKind) -> Option<Decimal> {
        match kind {
            ServiceKind::Labor => Some(self.labor),
            ServiceKind::AtelierOverhead => Some(self.atelier_overhead),
            ServiceKind::SiteLabor => Some(self.site_labor),
            ServiceKind::Transport => Some(self.transport),
            ServiceKind::Consumables => None,
        }
    }
}

/// Cost figures for one service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceCost {
    /// Rate card price; `None` for consumables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    /// Total after fixed values are applied
    pub total: Decimal,
    /// Duration after fixed values are applied
    pub duration: Decimal,
    pub actual: Decimal,
    pub vat: Decimal,
}

/// Costs for all five services plus their totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCosts {
    pub per_service: BTreeMap<ServiceKind, ServiceCost>,
    pub actual_total: Decimal,
    pub vat_total: Decimal,
}

impl ServiceCosts {
    pub fn get(&self, kind: ServiceKind) -> Option<&ServiceCost> {
        self.per_service.get(&kind)
    }
}

fn vat_value(kind: ServiceKind, actual: Decimal) -> Decimal {
    if kind.carries_vat() {
        mul_or_zero(actual, VAT_MULTIPLIER)
    } else {
        actual
    }
}

/// Price the five services from their inputs and the rate card
pub fn compute_service_costs(inputs: &ServiceInputs, rates: &RateCard) -> ServiceCosts {
    let mut per_service = BTreeMap::new();

    for &kind in ServiceKind::priced() {
        let input = inputs.get(kind);
        let unit_price = rates.unit_price(kind).unwrap_or(Decimal::ZERO);
        let total = kind.fixed_total().unwrap_or(input.total);
        let duration = kind.fixed_duration().unwrap_or(input.duration);
        let actual = mul_or_zero(mul_or_zero(unit_price, total), duration);

        per_service.insert(
            kind,
            ServiceCost {
                unit_price: Some(unit_price),
                total,
                duration,
                actual,
                vat: vat_value(kind, actual),
            },
        );
    }

    let priced_actual = sum_or_zero(per_service.values().map(|c| c.actual));
    let consumables_actual = mul_or_zero(CONSUMABLES_RATE, priced_actual);
    per_service.insert(
        ServiceKind::Consumables,
        ServiceCost {
            unit_price: None,
            total: Decimal::ZERO,
            duration: Decimal::ZERO,
            actual: consumables_actual,
            vat: vat_value(ServiceKind::Consumables, consumables_actual),
        },
    );

    let actual_total = sum_or_zero(per_service.values().map(|c| c.actual));
    let vat_total = sum_or_zero(per_service.values().map(|c| c.vat));

    ServiceCosts {
        per_service,
        actual_total,
        vat_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overhead_only() {
        let inputs = ServiceInputs::default()
            .with(ServiceKind::AtelierOverhead, ServiceInput::new(dec!(0), dec!(2)));
        let costs = compute_service_costs(&inputs, &RateCard::default());

        let overhead = costs.get(ServiceKind::AtelierOverhead).unwrap();
        assert_eq!(overhead.unit_price, Some(dec!(6350)));
        assert_eq!(overhead.total, dec!(1));
        assert_eq!(overhead.actual, dec!(12700));
        assert_eq!(overhead.vat, dec!(12700));

        let consumables = costs.get(ServiceKind::Consumables).unwrap();
        assert_eq!(consumables.actual, dec!(635));
        assert_eq!(consumables.vat, dec!(762));

        assert_eq!(costs.actual_total, dec!(13335));
        assert_eq!(costs.vat_total, dec!(13462));
    }

    #[test]
    fn test_overhead_total_is_fixed() {
        let inputs = ServiceInputs::default()
            .with(ServiceKind::AtelierOverhead, ServiceInput::new(dec!(9), dec!(2)));
        let costs = compute_service_costs(&inputs, &RateCard::default());
        assert_eq!(costs.get(ServiceKind::AtelierOverhead).unwrap().actual, dec!(12700));
    }

    #[test]
    fn test_transport_duration_is_fixed_and_carries_vat() {
        let inputs = ServiceInputs::default()
            .with(ServiceKind::Transport, ServiceInput::new(dec!(2), dec!(30)));
        let costs = compute_service_costs(&inputs, &RateCard::default());

        let transport = costs.get(ServiceKind::Transport).unwrap();
        assert_eq!(transport.duration, dec!(1));
        assert_eq!(transport.actual, dec!(7000));
        assert_eq!(transport.vat, dec!(8400));
    }

    #[test]
    fn test_labor_has_no_vat() {
        let inputs = ServiceInputs::default()
            .with(ServiceKind::Labor, ServiceInput::new(dec!(2), dec!(3)))
            .with(ServiceKind::SiteLabor, ServiceInput::new(dec!(1), dec!(2)));
        let costs = compute_service_costs(&inputs, &RateCard::default());

        let labor = costs.get(ServiceKind::Labor).unwrap();
        assert_eq!(labor.actual, dec!(9000));
        assert_eq!(labor.vat, labor.actual);

        let site = costs.get(ServiceKind::SiteLabor).unwrap();
        assert_eq!(site.actual, dec!(4000));
        assert_eq!(site.vat, site.actual);
    }

    #[test]
    fn test_all_services_totals() {
        let rates = RateCard {
            labor: dec!(100),
            atelier_overhead: dec!(200),
            site_labor: dec!(50),
            transport: dec!(300),
        };
        let inputs = ServiceInputs {
            labor: ServiceInput::new(dec!(2), dec!(5)),
            atelier_overhead: ServiceInput::new(dec!(0), dec!(3)),
            site_labor: ServiceInput::new(dec!(4), dec!(1)),
            transport: ServiceInput::new(dec!(1), dec!(0)),
        };
        let costs = compute_service_costs(&inputs, &rates);

        // 1000 + 600 + 200 + 300 = 2100, consumables 105
        assert_eq!(costs.actual_total, dec!(2205));
        // 1000 + 600 + 200 + 360 + 126
        assert_eq!(costs.vat_total, dec!(2286));
        assert_eq!(costs.per_service.len(), 5);
    }

    #[test]
    fn test_empty_inputs_cost_nothing() {
        let costs = compute_service_costs(&ServiceInputs::default(), &RateCard::default());
        assert_eq!(costs.actual_total, Decimal::ZERO);
        assert_eq!(costs.vat_total, Decimal::ZERO);
    }

    #[test]
    fn test_huge_rate_card_does_not_overflow() {
        let rates = RateCard {
            labor: Decimal::MAX,
            ..RateCard::default()
        };
        let inputs = ServiceInputs::default()
            .with(ServiceKind::Labor, ServiceInput::new(dec!(1000000000000000), dec!(1000000000000000)))
            .with(ServiceKind::SiteLabor, ServiceInput::new(dec!(1), dec!(1)));
        let costs = compute_service_costs(&inputs, &rates);

        assert_eq!(costs.get(ServiceKind::Labor).unwrap().actual, Decimal::ZERO);
        assert_eq!(costs.get(ServiceKind::SiteLabor).unwrap().actual, dec!(2000));
        assert_eq!(costs.actual_total, dec!(2100));
    }

    #[test]
    fn test_service_kind_parse() {
        assert_eq!("site-labor".parse::<ServiceKind>().unwrap(), ServiceKind::SiteLabor);
        assert_eq!("overhead".parse::<ServiceKind>().unwrap(), ServiceKind::AtelierOverhead);
        assert!("cleaning".parse::<ServiceKind>().is_err());
    }
}
