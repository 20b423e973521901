//! Field-path edits for `stw set`
//!
//! A path names one editable field of a draft:
//!
//! ```text
//! title | customer | currency | notes | valid_until | profit
//! product.N.(category|brand|color|total_area|unit_area|plate_count|stone_fee)
//! service.KIND.(total|duration)
//! external.N.(name|quantity|unit|unit_price|duration)
//! item.N.(product|width|length|quantity|unit_price|fire_rate|labor_cost)
//! tax.include | tax.rate
//! ```
//!
//! Line paths without a field (`product.N`) are used to remove a line.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::entities::proposal::CURRENCIES;
use crate::pricing::{parse_non_negative_decimal, parse_plate_count};
use crate::pricing::{ExternalServiceLine, ProductLine, ProposalItem, ServiceInput, ServiceKind};

/// The repeatable line collections of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Product,
    External,
    Item,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Product => write!(f, "product"),
            LineKind::External => write!(f, "external"),
            LineKind::Item => write!(f, "item"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Category,
    Brand,
    Color,
    TotalArea,
    UnitArea,
    PlateCount,
    StoneFee,
}

impl ProductField {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "category" => Self::Category,
            "brand" => Self::Brand,
            "color" => Self::Color,
            "total_area" => Self::TotalArea,
            "unit_area" => Self::UnitArea,
            "plate_count" | "plates" => Self::PlateCount,
            "stone_fee" | "fee" => Self::StoneFee,
            _ => return None,
        })
    }

    pub fn apply(self, line: &mut ProductLine, value: &str) {
        match self {
            Self::Category => line.category = value.trim().to_string(),
            Self::Brand => line.brand = value.trim().to_string(),
            Self::Color => line.color = value.trim().to_string(),
            Self::TotalArea => line.total_area = parse_non_negative_decimal(value),
            Self::UnitArea => line.unit_area = parse_non_negative_decimal(value),
            Self::PlateCount => line.plate_count = parse_plate_count(value),
            Self::StoneFee => line.stone_fee = parse_non_negative_decimal(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceField {
    Total,
    Duration,
}

impl ServiceField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "total" => Some(Self::Total),
            "duration" | "days" => Some(Self::Duration),
            _ => None,
        }
    }

    pub fn apply(self, mut input: ServiceInput, value: Decimal) -> ServiceInput {
        match self {
            Self::Total => input.total = value,
            Self::Duration => input.duration = value,
        }
        input
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalField {
    Name,
    Quantity,
    Unit,
    UnitPrice,
    Duration,
}

impl ExternalField {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "name" => Self::Name,
            "quantity" => Self::Quantity,
            "unit" => Self::Unit,
            "unit_price" | "price" => Self::UnitPrice,
            "duration" | "days" => Self::Duration,
            _ => return None,
        })
    }

    pub fn apply(self, line: &mut ExternalServiceLine, value: &str) {
        match self {
            Self::Name => line.name = value.trim().to_string(),
            Self::Quantity => line.quantity = parse_non_negative_decimal(value),
            Self::Unit => line.unit = value.trim().to_string(),
            Self::UnitPrice => line.unit_price = parse_non_negative_decimal(value),
            Self::Duration => line.duration = parse_non_negative_decimal(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Product,
    Width,
    Length,
    Quantity,
    UnitPrice,
    FireRate,
    LaborCost,
}

impl ItemField {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "product" => Self::Product,
            "width" => Self::Width,
            "length" => Self::Length,
            "quantity" => Self::Quantity,
            "unit_price" | "price" => Self::UnitPrice,
            "fire_rate" | "fire" => Self::FireRate,
            "labor_cost" | "labor" => Self::LaborCost,
            _ => return None,
        })
    }

    pub fn apply(self, item: &mut ProposalItem, value: &str) {
        match self {
            Self::Product => item.product = value.trim().to_string(),
            Self::Width => item.width = parse_non_negative_decimal(value),
            Self::Length => item.length = parse_non_negative_decimal(value),
            Self::Quantity => item.quantity = parse_plate_count(value),
            Self::UnitPrice => item.unit_price = parse_non_negative_decimal(value),
            Self::FireRate => item.fire_rate = parse_non_negative_decimal(value),
            Self::LaborCost => item.labor_cost = parse_non_negative_decimal(value),
        }
    }
}

/// One edit to a draft
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Title(String),
    Customer(String),
    Currency(String),
    Notes(String),
    ValidUntil(Option<NaiveDate>),
    ProfitMultiplier(Decimal),
    Product {
        index: usize,
        field: ProductField,
        value: String,
    },
    Service {
        kind: ServiceKind,
        field: ServiceField,
        value: Decimal,
    },
    External {
        index: usize,
        field: ExternalField,
        value: String,
    },
    Item {
        index: usize,
        field: ItemField,
        value: String,
    },
    TaxInclude(bool),
    TaxRate(Decimal),
    Remove(LineKind, usize),
}

impl DraftEdit {
    /// Parse a field path and its new value
    pub fn parse(path: &str, value: &str) -> Result<Self, EditError> {
        let unknown = || EditError::UnknownField(path.to_string());
        let segments: Vec<&str> = path.trim().split('.').collect();

        match segments.as_slice() {
            ["title"] => Ok(Self::Title(value.trim().to_string())),
            ["customer"] => Ok(Self::Customer(value.trim().to_string())),
            ["notes"] => Ok(Self::Notes(value.to_string())),
            ["currency"] => {
                let currency = value.trim().to_uppercase();
                if CURRENCIES.contains(&currency.as_str()) {
                    Ok(Self::Currency(currency))
                } else {
                    Err(EditError::InvalidValue {
                        field: path.to_string(),
                        value: value.to_string(),
                        expected: "one of TRY, USD, EUR",
                    })
                }
            }
            ["valid_until"] => {
                let value = value.trim();
                if value.is_empty() {
                    return Ok(Self::ValidUntil(None));
                }
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map(|d| Self::ValidUntil(Some(d)))
                    .map_err(|_| EditError::InvalidValue {
                        field: path.to_string(),
                        value: value.to_string(),
                        expected: "a date as YYYY-MM-DD",
                    })
            }
            ["profit"] | ["profit_multiplier"] => Ok(Self::ProfitMultiplier(parse_non_negative_decimal(value))),
            ["tax", "include"] | ["tax", "include_tax"] => parse_bool(value)
                .map(Self::TaxInclude)
                .ok_or_else(|| EditError::InvalidValue {
                    field: path.to_string(),
                    value: value.to_string(),
                    expected: "true or false",
                }),
            ["tax", "rate"] => Ok(Self::TaxRate(parse_non_negative_decimal(value))),
            ["service", kind, field] => {
                let kind: ServiceKind = kind.parse().map_err(|_| unknown())?;
                if kind == ServiceKind::Consumables {
                    return Err(EditError::DerivedField(path.to_string()));
                }
                let field = ServiceField::parse(field).ok_or_else(unknown)?;
                if (field == ServiceField::Total && kind.fixed_total().is_some())
                    || (field == ServiceField::Duration && kind.fixed_duration().is_some())
                {
                    return Err(EditError::DerivedField(path.to_string()));
                }
                Ok(Self::Service {
                    kind,
                    field,
                    value: parse_non_negative_decimal(value),
                })
            }
            [line, index, field] => {
                let index = parse_index(path, index)?;
                let value = value.to_string();
                match *line {
                    "product" => Ok(Self::Product {
                        index,
                        field: ProductField::parse(field).ok_or_else(unknown)?,
                        value,
                    }),
                    "external" => Ok(Self::External {
                        index,
                        field: ExternalField::parse(field).ok_or_else(unknown)?,
                        value,
                    }),
                    "item" => Ok(Self::Item {
                        index,
                        field: ItemField::parse(field).ok_or_else(unknown)?,
                        value,
                    }),
                    _ => Err(unknown()),
                }
            }
            _ => Err(unknown()),
        }
    }

    /// Parse a line path (`product.N`, `external.N`, `item.N`) into a removal
    pub fn removal(path: &str) -> Result<Self, EditError> {
        let segments: Vec<&str> = path.trim().split('.').collect();
        let [line, index] = segments.as_slice() else {
            return Err(EditError::UnknownField(path.to_string()));
        };

        let kind = match *line {
            "product" => LineKind::Product,
            "external" => LineKind::External,
            "item" => LineKind::Item,
            _ => return Err(EditError::UnknownField(path.to_string())),
        };
        Ok(Self::Remove(kind, parse_index(path, index)?))
    }
}

fn parse_index(path: &str, index: &str) -> Result<usize, EditError> {
    index.parse().map_err(|_| EditError::InvalidValue {
        field: path.to_string(),
        value: index.to_string(),
        expected: "a line index starting at 0",
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Errors applying an edit to a draft
#[derive(Debug, Error)]
pub enum EditError {
    #[error("unknown field path '{0}'")]
    UnknownField(String),

    #[error("'{0}' is computed and cannot be set")]
    DerivedField(String),

    #[error("invalid value '{value}' for {field}: expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("{kind} line {index} does not exist (draft has {len})")]
    IndexOutOfRange { kind: LineKind, index: usize, len: usize },
}
