//! PRP entity type - Proposal draft
//!
//! A draft holds everything the proposal screen lets a salesperson edit.
//! It is a plain value: every update consumes the draft and returns the
//! edited one, and [`ProposalDraft::evaluate`] derives all displayed
//! figures from it.

use chrono::{DateTime, NaiveDate, Utc};
use miette::Diagnostic;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::identity::ProposalId;
use crate::entities::edit::{DraftEdit, EditError, LineKind};
use crate::pricing::input::lenient;
use crate::pricing::tax::DEFAULT_TAX_RATE;
use crate::pricing::{
    compute_external_service_cost, compute_item_total, compute_product_line_cost, compute_service_costs,
    compute_summary, external_totals, product_totals, sum_or_zero, CostPair, ExternalServiceLine, ItemCost,
    PricingSummary, ProductLine, ProposalItem, RateCard, ServiceCosts, ServiceInput, ServiceInputs, ServiceKind,
    TaxBreakdown, DEFAULT_PROFIT_MULTIPLIER,
};
use crate::yaml::YamlSyntaxError;

/// Currencies the proposal screen offers
pub const CURRENCIES: &[&str] = &["TRY", "USD", "EUR"];

/// How the proposal total is taxed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Whether item prices already include tax
    #[serde(default)]
    pub include_tax: bool,

    /// Tax rate in percent
    #[serde(default = "default_tax_rate", deserialize_with = "lenient::decimal")]
    pub rate: Decimal,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            include_tax: false,
            rate: DEFAULT_TAX_RATE,
        }
    }
}

fn default_tax_rate() -> Decimal {
    DEFAULT_TAX_RATE
}

fn default_profit_multiplier() -> Decimal {
    DEFAULT_PROFIT_MULTIPLIER
}

fn default_currency() -> String {
    "TRY".to_string()
}

/// A proposal draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalDraft {
    /// Unique identifier
    pub id: ProposalId,

    /// Short title shown in lists
    pub title: String,

    /// Customer name
    #[serde(default)]
    pub customer: String,

    /// TRY, USD or EUR
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Last day the offer is valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Applied to the VAT-exclusive cost before final VAT
    #[serde(default = "default_profit_multiplier", deserialize_with = "lenient::decimal")]
    pub profit_multiplier: Decimal,

    /// Stone product lines
    #[serde(default)]
    pub products: Vec<ProductLine>,

    /// In-house service quantities
    #[serde(default)]
    pub services: ServiceInputs,

    /// Subcontracted services
    #[serde(default)]
    pub external_services: Vec<ExternalServiceLine>,

    /// Dimension-based items submitted with the proposal
    #[serde(default)]
    pub items: Vec<ProposalItem>,

    /// Tax settings for the item total
    #[serde(default)]
    pub tax: TaxSettings,

    /// Author (who created this draft)
    #[serde(default)]
    pub author: String,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

impl ProposalDraft {
    /// Create an empty draft
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: ProposalId::new(),
            title: title.into(),
            customer: String::new(),
            currency: default_currency(),
            valid_until: None,
            notes: String::new(),
            profit_multiplier: DEFAULT_PROFIT_MULTIPLIER,
            products: Vec::new(),
            services: ServiceInputs::default(),
            external_services: Vec::new(),
            items: Vec::new(),
            tax: TaxSettings::default(),
            author: author.into(),
            created: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_profit_multiplier(mut self, multiplier: Decimal) -> Self {
        self.profit_multiplier = multiplier;
        self
    }

    /// Append a product line
    pub fn with_product(mut self, line: ProductLine) -> Self {
        self.products.push(line);
        self
    }

    /// Remove the product line at `index`
    pub fn without_product(mut self, index: usize) -> Result<Self, EditError> {
        remove_line(&mut self.products, LineKind::Product, index)?;
        Ok(self)
    }

    /// Replace a service's quantities. Consumables are derived and cannot be set.
    pub fn with_service_input(mut self, kind: ServiceKind, input: ServiceInput) -> Result<Self, EditError> {
        if kind == ServiceKind::Consumables {
            return Err(EditError::DerivedField("service.consumables".to_string()));
        }
        self.services = self.services.with(kind, input);
        Ok(self)
    }

    /// Append an external service line
    pub fn with_external_service(mut self, line: ExternalServiceLine) -> Self {
        self.external_services.push(line);
        self
    }

    /// Remove the external service line at `index`
    pub fn without_external_service(mut self, index: usize) -> Result<Self, EditError> {
        remove_line(&mut self.external_services, LineKind::External, index)?;
        Ok(self)
    }

    /// Append a proposal item
    pub fn with_item(mut self, item: ProposalItem) -> Self {
        self.items.push(item);
        self
    }

    /// Remove the proposal item at `index`
    pub fn without_item(mut self, index: usize) -> Result<Self, EditError> {
        remove_line(&mut self.items, LineKind::Item, index)?;
        Ok(self)
    }

    pub fn with_tax(mut self, include_tax: bool, rate: Decimal) -> Self {
        self.tax = TaxSettings { include_tax, rate };
        self
    }

    /// Apply one parsed edit
    pub fn apply(mut self, edit: DraftEdit) -> Result<Self, EditError> {
        tracing::debug!(id = %self.id, ?edit, "applying edit");

        match edit {
            DraftEdit::Title(title) => Ok(self.with_title(title)),
            DraftEdit::Customer(customer) => {
                self.customer = customer;
                Ok(self)
            }
            DraftEdit::Currency(currency) => {
                self.currency = currency;
                Ok(self)
            }
            DraftEdit::Notes(notes) => {
                self.notes = notes;
                Ok(self)
            }
            DraftEdit::ValidUntil(date) => {
                self.valid_until = date;
                Ok(self)
            }
            DraftEdit::ProfitMultiplier(m) => Ok(self.with_profit_multiplier(m)),
            DraftEdit::Product { index, field, value } => {
                field.apply(line_for_edit(&mut self.products, LineKind::Product, index)?, &value);
                Ok(self)
            }
            DraftEdit::Service { kind, field, value } => {
                let input = field.apply(self.services.get(kind), value);
                self.with_service_input(kind, input)
            }
            DraftEdit::External { index, field, value } => {
                field.apply(line_for_edit(&mut self.external_services, LineKind::External, index)?, &value);
                Ok(self)
            }
            DraftEdit::Item { index, field, value } => {
                field.apply(line_for_edit(&mut self.items, LineKind::Item, index)?, &value);
                Ok(self)
            }
            DraftEdit::TaxInclude(include) => {
                self.tax.include_tax = include;
                Ok(self)
            }
            DraftEdit::TaxRate(rate) => {
                self.tax.rate = rate;
                Ok(self)
            }
            DraftEdit::Remove(LineKind::Product, index) => self.without_product(index),
            DraftEdit::Remove(LineKind::External, index) => self.without_external_service(index),
            DraftEdit::Remove(LineKind::Item, index) => self.without_item(index),
        }
    }

    /// Run the whole pricing pipeline over this draft
    pub fn evaluate(&self, rates: &RateCard) -> CostBreakdown {
        let products = self
            .products
            .iter()
            .map(|line| ProductCostRow {
                label: line.label(),
                plate_count: line.plate_count,
                stone_fee: line.stone_fee,
                cost: compute_product_line_cost(line),
            })
            .collect();
        let product_totals = product_totals(&self.products);

        let services = compute_service_costs(&self.services, rates);

        let external = self
            .external_services
            .iter()
            .map(|line| {
                let actual = compute_external_service_cost(line);
                ExternalCostRow {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit: line.unit.clone(),
                    unit_price: line.unit_price,
                    duration: line.duration_factor(),
                    cost: CostPair::with_vat(actual),
                }
            })
            .collect();
        let external_totals = external_totals(&self.external_services);

        let summary = compute_summary(&product_totals, &services, &external_totals, self.profit_multiplier);

        let items: Vec<ItemCostRow> = self
            .items
            .iter()
            .map(|item| ItemCostRow {
                product: item.product.clone(),
                cost: compute_item_total(item),
            })
            .collect();
        let items_total = sum_or_zero(items.iter().map(|row| row.cost.total));
        let tax = TaxBreakdown::compute(items_total, self.tax.include_tax, self.tax.rate);

        tracing::debug!(
            id = %self.id,
            general = %summary.general_cost,
            final_total = %summary.final_total,
            items_total = %items_total,
            "evaluated draft"
        );

        CostBreakdown {
            products,
            product_totals,
            services,
            external,
            external_totals,
            summary,
            items,
            items_total,
            tax,
        }
    }

    /// Parse a draft from YAML text
    pub fn from_yaml(source: &str, filename: &str) -> Result<Self, DraftError> {
        serde_yml::from_str(source)
            .map_err(|e| DraftError::Syntax(YamlSyntaxError::from_serde_error(&e, source, filename)))
    }

    /// Serialize the draft to YAML
    pub fn to_yaml(&self) -> Result<String, DraftError> {
        serde_yml::to_string(self).map_err(|e| DraftError::Serialize(e.to_string()))
    }

    /// Load a draft file
    pub fn load(path: &Path) -> Result<Self, DraftError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source, &path.display().to_string())
    }

    /// Write the draft to a file
    pub fn save(&self, path: &Path) -> Result<(), DraftError> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml)?;
        tracing::debug!(id = %self.id, path = %path.display(), "saved draft");
        Ok(())
    }
}

/// Line for an edit at `index`; `index == len` appends a default line
fn line_for_edit<T: Default>(lines: &mut Vec<T>, kind: LineKind, index: usize) -> Result<&mut T, EditError> {
    if index == lines.len() {
        lines.push(T::default());
    }
    let len = lines.len();
    lines
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { kind, index, len })
}

fn remove_line<T>(lines: &mut Vec<T>, kind: LineKind, index: usize) -> Result<(), EditError> {
    if index >= lines.len() {
        return Err(EditError::IndexOutOfRange {
            kind,
            index,
            len: lines.len(),
        });
    }
    lines.remove(index);
    Ok(())
}

/// One evaluated product line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCostRow {
    pub label: String,
    pub plate_count: u32,
    pub stone_fee: Decimal,
    #[serde(flatten)]
    pub cost: CostPair,
}

/// One evaluated external service line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalCostRow {
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    /// Effective duration (1 when the line has none)
    pub duration: Decimal,
    #[serde(flatten)]
    pub cost: CostPair,
}

/// One evaluated proposal item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCostRow {
    pub product: String,
    #[serde(flatten)]
    pub cost: ItemCost,
}

/// Every figure derived from a draft
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub products: Vec<ProductCostRow>,
    pub product_totals: CostPair,
    pub services: ServiceCosts,
    pub external: Vec<ExternalCostRow>,
    pub external_totals: CostPair,
    pub summary: PricingSummary,
    pub items: Vec<ItemCostRow>,
    pub items_total: Decimal,
    pub tax: TaxBreakdown,
}

/// Errors reading or writing a draft file
#[derive(Debug, Error, Diagnostic)]
pub enum DraftError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize draft: {0}")]
    Serialize(String),
}
