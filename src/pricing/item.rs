//! Dimension-based proposal items
//!
//! A cut item is priced from its size: the area in m² (dimensions are in
//! cm), the stone price per m², a waste ("fire") allowance, and a flat labor
//! amount.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::input::lenient;
use super::{add_or_zero, mul_or_zero, round2};

const CM2_PER_M2: Decimal = dec!(10000);

/// Waste allowance used when an item does not specify one
pub const DEFAULT_FIRE_RATE: Decimal = dec!(10);

fn default_quantity() -> u32 {
    1
}

fn default_fire_rate() -> Decimal {
    DEFAULT_FIRE_RATE
}

/// A proposal item as it is submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalItem {
    /// Product reference (name or inventory ID)
    #[serde(default)]
    pub product: String,

    /// Width in cm
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub width: Decimal,

    /// Length in cm
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub length: Decimal,

    #[serde(default = "default_quantity", deserialize_with = "lenient::count")]
    pub quantity: u32,

    /// Price per m²
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub unit_price: Decimal,

    /// Waste percentage
    #[serde(default = "default_fire_rate", deserialize_with = "lenient::decimal")]
    pub fire_rate: Decimal,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub labor_cost: Decimal,
}

impl Default for ProposalItem {
    fn default() -> Self {
        Self {
            product: String::new(),
            width: Decimal::ZERO,
            length: Decimal::ZERO,
            quantity: default_quantity(),
            unit_price: Decimal::ZERO,
            fire_rate: DEFAULT_FIRE_RATE,
            labor_cost: Decimal::ZERO,
        }
    }
}

impl ProposalItem {
    /// Item with the given size and price, default waste, no labor
    pub fn new(product: impl Into<String>, width: Decimal, length: Decimal, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product: product.into(),
            width,
            length,
            quantity,
            unit_price,
            ..Default::default()
        }
    }

    /// Items without a size are refused when added to a proposal
    pub fn has_dimensions(&self) -> bool {
        self.width > Decimal::ZERO && self.length > Decimal::ZERO
    }
}

/// Breakdown of an item's price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCost {
    pub area_m2: Decimal,
    pub waste_multiplier: Decimal,
    pub material_cost: Decimal,
    /// Material plus labor, rounded to cents
    pub total: Decimal,
}

/// Price an item the way the stored proposal item is priced
pub fn compute_item_total(item: &ProposalItem) -> ItemCost {
    let area_m2 = mul_or_zero(mul_or_zero(item.width, item.length), Decimal::from(item.quantity)) / CM2_PER_M2;
    let waste_multiplier = Decimal::ONE + item.fire_rate / dec!(100);
    let material_cost = mul_or_zero(mul_or_zero(area_m2, item.unit_price), waste_multiplier);

    ItemCost {
        area_m2,
        waste_multiplier,
        material_cost,
        total: round2(add_or_zero(material_cost, item.labor_cost)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_total() {
        let mut item = ProposalItem::new("Calacatta", dec!(60), dec!(300), 2, dec!(1000));
        item.labor_cost = dec!(250);

        let cost = compute_item_total(&item);
        assert_eq!(cost.area_m2, dec!(3.6));
        assert_eq!(cost.waste_multiplier, dec!(1.1));
        assert_eq!(cost.material_cost, dec!(3960));
        assert_eq!(cost.total, dec!(4210.00));
    }

    #[test]
    fn test_item_total_rounds_to_cents() {
        let mut item = ProposalItem::new("Nero", dec!(33.3), dec!(10), 1, dec!(99.99));
        item.fire_rate = dec!(0);
        // 0.0333 m² × 99.99 = 3.329667
        assert_eq!(compute_item_total(&item).total, dec!(3.33));
    }

    #[test]
    fn test_defaults() {
        let item: ProposalItem = serde_yml::from_str("product: Nero\nwidth: 100\nlength: 100\nunit_price: 10\n").unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.fire_rate, dec!(10));
        assert_eq!(compute_item_total(&item).total, dec!(11.00));
    }

    #[test]
    fn test_has_dimensions() {
        let item = ProposalItem::new("Nero", dec!(0), dec!(100), 1, dec!(10));
        assert!(!item.has_dimensions());
        assert_eq!(compute_item_total(&item).total, Decimal::ZERO);
    }
}
