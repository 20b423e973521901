//! Stone product lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::lenient;
use super::{mul_or_zero, CostPair};

/// One stone product on a proposal: a brand/color of slab and how many
/// plates of it the job consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    /// Product category (countertop, flooring, cladding, ...)
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub color: String,

    /// Total measured area of the job in m²
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_area: Decimal,

    /// Area of a single plate in m²
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub unit_area: Decimal,

    /// Number of plates used
    #[serde(default, deserialize_with = "lenient::count")]
    pub plate_count: u32,

    /// Stone fee per plate
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub stone_fee: Decimal,
}

impl ProductLine {
    pub fn new(stone_fee: Decimal, plate_count: u32) -> Self {
        Self {
            stone_fee,
            plate_count,
            ..Default::default()
        }
    }

    /// Short display label, e.g. "Countertop / Belenco / White"
    pub fn label(&self) -> String {
        let parts: Vec<&str> = [&self.category, &self.brand, &self.color]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(" / ")
        }
    }
}

/// Cost of a product line: fee × plates, VAT applied on top
pub fn compute_product_line_cost(line: &ProductLine) -> CostPair {
    let actual = mul_or_zero(line.stone_fee, Decimal::from(line.plate_count));
    CostPair::with_vat(actual)
}

/// Sum of all product line costs
pub fn product_totals(lines: &[ProductLine]) -> CostPair {
    lines.iter().map(compute_product_line_cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_line_cost() {
        let line = ProductLine::new(dec!(100), 5);
        let cost = compute_product_line_cost(&line);
        assert_eq!(cost.actual, dec!(500));
        assert_eq!(cost.vat, dec!(600));
    }

    #[test]
    fn test_product_line_cost_is_fee_times_plates() {
        for (fee, plates) in [(dec!(0), 3), (dec!(12.75), 0), (dec!(845.5), 7), (dec!(1), 1)] {
            let cost = compute_product_line_cost(&ProductLine::new(fee, plates));
            let expected = fee * Decimal::from(plates);
            assert_eq!(cost.actual, expected);
            assert_eq!(cost.vat, expected * dec!(1.2));
        }
    }

    #[test]
    fn test_product_totals() {
        let lines = vec![ProductLine::new(dec!(100), 5), ProductLine::new(dec!(250), 2)];
        let totals = product_totals(&lines);
        assert_eq!(totals.actual, dec!(1000));
        assert_eq!(totals.vat, dec!(1200));
        assert_eq!(product_totals(&[]), CostPair::default());
    }

    #[test]
    fn test_overflowing_line_costs_nothing() {
        let line = ProductLine::new(Decimal::MAX, 2);
        assert_eq!(compute_product_line_cost(&line), CostPair::default());

        let totals = product_totals(&[ProductLine::new(Decimal::MAX, 1), ProductLine::new(dec!(100), 5)]);
        assert_eq!(totals.actual, dec!(500));
    }

    #[test]
    fn test_label() {
        let mut line = ProductLine::new(dec!(1), 1);
        assert_eq!(line.label(), "-");
        line.category = "Countertop".to_string();
        line.color = "Calacatta".to_string();
        assert_eq!(line.label(), "Countertop / Calacatta");
    }
}
