//! What gets posted when a draft is submitted
//!
//! The server computes every total itself, so the payload carries only the
//! raw inputs: a proposal header and one entry per dimensioned item.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::proposal::ProposalDraft;

/// Description attached to every submitted item
pub const ITEM_DESCRIPTION: &str = "Standard production";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub customer: String,
    pub valid_until: Option<NaiveDate>,
    pub currency: String,
    pub description: String,
    pub include_tax: bool,
    pub tax_rate: Decimal,
    pub items: Vec<SubmissionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionItem {
    pub product: String,
    pub width: Decimal,
    pub length: Decimal,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub fire_rate: Decimal,
    pub labor_cost: Decimal,
    pub description: String,
}

impl SubmissionPayload {
    /// Build the payload; items without both dimensions are left out, as
    /// the proposal screen never lets them into the cart
    pub fn from_draft(draft: &ProposalDraft) -> Self {
        let items = draft
            .items
            .iter()
            .filter(|item| item.has_dimensions())
            .map(|item| SubmissionItem {
                product: item.product.clone(),
                width: item.width,
                length: item.length,
                quantity: item.quantity,
                unit_price: item.unit_price,
                fire_rate: item.fire_rate,
                labor_cost: item.labor_cost,
                description: ITEM_DESCRIPTION.to_string(),
            })
            .collect();

        Self {
            customer: draft.customer.clone(),
            valid_until: draft.valid_until,
            currency: draft.currency.clone(),
            description: draft.notes.clone(),
            include_tax: draft.tax.include_tax,
            tax_rate: draft.tax.rate,
            items,
        }
    }
}
