//! Draft validation
//!
//! A draft that parses is always priceable: bad numbers simply count as
//! zero. Validation makes those silent coercions visible so they can be
//! fixed before a proposal goes out.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_yml::Value;
use std::fmt;

use crate::entities::{DraftError, ProposalDraft};
use crate::pricing::input::parse_decimal;
use crate::pricing::MAX_INPUT;

const TOP_LEVEL_KEYS: &[&str] = &[
    "id",
    "title",
    "customer",
    "currency",
    "valid_until",
    "notes",
    "profit_multiplier",
    "products",
    "services",
    "external_services",
    "items",
    "tax",
    "author",
    "created",
];

const PRODUCT_NUMBERS: &[&str] = &["total_area", "unit_area", "plate_count", "stone_fee"];
const SERVICE_KEYS: &[&str] = &["labor", "atelier_overhead", "site_labor", "transport"];
const EXTERNAL_NUMBERS: &[&str] = &["quantity", "unit_price", "duration"];
const ITEM_NUMBERS: &[&str] = &["width", "length", "quantity", "unit_price", "fire_rate", "labor_cost"];

/// Whole-number fields, read as `u32`
const COUNT_FIELDS: &[(&str, &str)] = &[("product", "plate_count"), ("item", "quantity")];

/// Something in a draft that will not be read the way it looks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Field path, as accepted by `stw set`
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of validating one draft
#[derive(Debug)]
pub struct ValidationReport {
    /// Set when the file cannot be read as a draft at all
    pub error: Option<DraftError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Validate draft text
pub fn validate_draft_source(source: &str, filename: &str) -> ValidationReport {
    let draft = match ProposalDraft::from_yaml(source, filename) {
        Ok(draft) => draft,
        Err(e) => {
            return ValidationReport {
                error: Some(e),
                warnings: Vec::new(),
            }
        }
    };

    let mut warnings = Vec::new();

    // The draft parsed, so the raw document is valid YAML as well
    if let Ok(raw) = serde_yml::from_str::<Value>(source) {
        check_raw_document(&raw, &mut warnings);
    }

    if draft.profit_multiplier < Decimal::ONE {
        warnings.push(ValidationWarning {
            path: "profit".to_string(),
            message: format!("multiplier {} sells below cost", draft.profit_multiplier),
        });
    }

    for (i, item) in draft.items.iter().enumerate() {
        if !item.has_dimensions() {
            warnings.push(ValidationWarning {
                path: format!("item.{}", i),
                message: "width and length must both be above 0; the item is not submitted".to_string(),
            });
        }
    }

    ValidationReport { error: None, warnings }
}

fn check_raw_document(raw: &Value, warnings: &mut Vec<ValidationWarning>) {
    let Some(map) = raw.as_mapping() else {
        return;
    };

    for key in map.keys() {
        if let Some(key) = key.as_str() {
            if !TOP_LEVEL_KEYS.contains(&key) {
                warnings.push(ValidationWarning {
                    path: key.to_string(),
                    message: "unknown field, ignored".to_string(),
                });
            }
        }
    }

    check_number("profit", raw.get("profit_multiplier"), MAX_INPUT, warnings);
    check_number("tax.rate", raw.get("tax").and_then(|t| t.get("rate")), MAX_INPUT, warnings);
    check_lines("product", raw.get("products"), PRODUCT_NUMBERS, warnings);
    check_lines("external", raw.get("external_services"), EXTERNAL_NUMBERS, warnings);
    check_lines("item", raw.get("items"), ITEM_NUMBERS, warnings);

    if let Some(services) = raw.get("services") {
        for kind in SERVICE_KEYS {
            for field in ["total", "duration"] {
                let value = services.get(kind).and_then(|s| s.get(field));
                check_number(&format!("service.{}.{}", kind, field), value, MAX_INPUT, warnings);
            }
        }
    }
}

fn check_lines(prefix: &str, lines: Option<&Value>, fields: &[&str], warnings: &mut Vec<ValidationWarning>) {
    let Some(lines) = lines.and_then(Value::as_sequence) else {
        return;
    };

    for (i, line) in lines.iter().enumerate() {
        for field in fields {
            let limit = if COUNT_FIELDS.iter().any(|&(p, f)| p == prefix && f == *field) {
                Decimal::from(u32::MAX)
            } else {
                MAX_INPUT
            };
            check_number(&format!("{}.{}.{}", prefix, i, field), line.get(field), limit, warnings);
        }
    }
}

fn check_number(path: &str, value: Option<&Value>, limit: Decimal, warnings: &mut Vec<ValidationWarning>) {
    let problem = match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f < 0.0 => Some("negative, treated as 0".to_string()),
            Some(f) if !f.is_finite() => Some("not a number, treated as 0".to_string()),
            Some(f) if f > limit.to_f64().unwrap_or(f64::MAX) => Some(too_large(limit)),
            _ => None,
        },
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match parse_decimal(s) {
            None => Some("not a number, treated as 0".to_string()),
            Some(d) if d < Decimal::ZERO => Some("negative, treated as 0".to_string()),
            Some(d) if d > limit => Some(too_large(limit)),
            Some(_) => None,
        },
        Some(_) => Some("not a number, treated as 0".to_string()),
    };

    if let Some(message) = problem {
        warnings.push(ValidationWarning {
            path: path.to_string(),
            message,
        });
    }
}

fn too_large(limit: Decimal) -> String {
    format!("above {}, treated as 0", limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id: PRP-01HQ3K4N5M6P7R8S9T0VWXYZAB\ntitle: Test\n";

    fn validate(body: &str) -> ValidationReport {
        validate_draft_source(&format!("{}{}", HEADER, body), "test.stw.yaml")
    }

    fn paths(report: &ValidationReport) -> Vec<&str> {
        report.warnings.iter().map(|w| w.path.as_str()).collect()
    }

    #[test]
    fn test_clean_draft_has_no_warnings() {
        let report = validate(
            "products:\n  - stone_fee: \"12,5\"\n    plate_count: 2\nitems:\n  - width: 60\n    length: 300\n",
        );
        assert!(report.is_valid());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_coercions_are_reported() {
        let report = validate(
            "products:\n  - stone_fee: abc\n    plate_count: -2\nservices:\n  labor:\n    total: lots\nexternal_services:\n  - unit_price: true\n",
        );
        assert!(report.is_valid());
        assert_eq!(
            paths(&report),
            vec![
                "product.0.plate_count",
                "product.0.stone_fee",
                "external.0.unit_price",
                "service.labor.total",
            ]
        );
        assert!(report.warnings[0].message.contains("negative"));
        assert!(report.warnings[1].message.contains("not a number"));
    }

    #[test]
    fn test_out_of_range_numbers_are_reported() {
        let report = validate(
            "products:\n  - stone_fee: \"1e28\"\n    plate_count: 5000000000\nexternal_services:\n  - unit_price: 1000000000000000\n    quantity: 2000000000000000\n",
        );
        assert!(report.is_valid());
        assert_eq!(
            paths(&report),
            vec!["product.0.plate_count", "product.0.stone_fee", "external.0.quantity"]
        );
        assert!(report.warnings.iter().all(|w| w.message.starts_with("above ")));
    }

    #[test]
    fn test_low_profit_multiplier_warns() {
        let report = validate("profit_multiplier: \"0.9\"\n");
        assert_eq!(paths(&report), vec!["profit"]);
    }

    #[test]
    fn test_item_without_size_warns() {
        let report = validate("items:\n  - width: 0\n    length: 100\n");
        assert_eq!(paths(&report), vec!["item.0"]);
    }

    #[test]
    fn test_unknown_field_warns() {
        let report = validate("discount: 5\n");
        assert_eq!(paths(&report), vec!["discount"]);
    }

    #[test]
    fn test_syntax_error_fails() {
        let report = validate_draft_source("title: [broken\n", "bad.stw.yaml");
        assert!(!report.is_valid());
    }

    #[test]
    fn test_missing_id_fails() {
        let report = validate_draft_source("title: no id\n", "bad.stw.yaml");
        assert!(!report.is_valid());
    }
}
