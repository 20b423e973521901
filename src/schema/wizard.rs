//! Interactive wizard for `stw new --interactive`
//!
//! Asks for the proposal header the way the proposal screen's first step
//! does, then optionally collects product lines and sized items.

use chrono::NaiveDate;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;

use crate::entities::proposal::CURRENCIES;
use crate::pricing::input::parse_decimal;
use crate::pricing::{parse_non_negative_decimal, parse_plate_count, ProductLine, ProposalItem};

/// Values collected by the wizard
#[derive(Debug, Default)]
pub struct WizardResult {
    pub title: String,
    pub customer: String,
    pub currency: String,
    pub valid_until: Option<NaiveDate>,
    pub profit_multiplier: Decimal,
    pub products: Vec<ProductLine>,
    pub items: Vec<ProposalItem>,
}

pub struct ProposalWizard {
    theme: ColorfulTheme,
}

impl ProposalWizard {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Run the wizard, starting from the configured defaults
    pub fn run(&self, default_currency: &str, default_profit: Decimal) -> Result<WizardResult> {
        println!();
        println!("{} Creating new proposal", style("◆").cyan());
        println!("{}", style("─".repeat(50)).dim());
        println!();

        let title: String = Input::with_theme(&self.theme)
            .with_prompt("Title")
            .interact_text()
            .into_diagnostic()?;

        let customer: String = Input::with_theme(&self.theme)
            .with_prompt("Customer")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        let default_idx = CURRENCIES.iter().position(|c| *c == default_currency).unwrap_or(0);
        let currency_idx = Select::with_theme(&self.theme)
            .with_prompt("Currency")
            .items(CURRENCIES)
            .default(default_idx)
            .interact()
            .into_diagnostic()?;

        let valid_until: String = Input::with_theme(&self.theme)
            .with_prompt("Valid until (YYYY-MM-DD, empty for none)")
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() || NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").is_ok() {
                    Ok(())
                } else {
                    Err("expected a date as YYYY-MM-DD")
                }
            })
            .interact_text()
            .into_diagnostic()?;

        let profit: String = Input::with_theme(&self.theme)
            .with_prompt("Profit multiplier")
            .default(default_profit.to_string())
            .validate_with(|input: &String| -> Result<(), &str> {
                match parse_decimal(input) {
                    Some(d) if d >= Decimal::ONE => Ok(()),
                    Some(_) => Err("a multiplier below 1 sells below cost"),
                    None => Err("expected a number"),
                }
            })
            .interact_text()
            .into_diagnostic()?;

        let mut result = WizardResult {
            title: title.trim().to_string(),
            customer: customer.trim().to_string(),
            currency: CURRENCIES[currency_idx].to_string(),
            valid_until: NaiveDate::parse_from_str(valid_until.trim(), "%Y-%m-%d").ok(),
            profit_multiplier: parse_non_negative_decimal(&profit),
            ..Default::default()
        };

        while self.confirm("Add a product line?")? {
            result.products.push(self.prompt_product()?);
        }

        while self.confirm("Add a sized item?")? {
            match self.prompt_item()? {
                Some(item) => result.items.push(item),
                None => println!("{} Width and length must both be above 0", style("!").yellow()),
            }
        }

        println!();
        println!("{} Values collected!", style("✓").green());

        Ok(result)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .into_diagnostic()
    }

    fn text(&self, prompt: &str, default: &str) -> Result<String> {
        Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()
    }

    fn prompt_product(&self) -> Result<ProductLine> {
        Ok(ProductLine {
            category: self.text("  Category", "")?,
            brand: self.text("  Brand", "")?,
            color: self.text("  Color", "")?,
            total_area: parse_non_negative_decimal(&self.text("  Total area (m²)", "0")?),
            unit_area: parse_non_negative_decimal(&self.text("  Area per plate (m²)", "0")?),
            plate_count: parse_plate_count(&self.text("  Plate count", "0")?),
            stone_fee: parse_non_negative_decimal(&self.text("  Fee per plate", "0")?),
        })
    }

    /// `None` when the item has no size
    fn prompt_item(&self) -> Result<Option<ProposalItem>> {
        let item = ProposalItem {
            product: self.text("  Product", "")?,
            width: parse_non_negative_decimal(&self.text("  Width (cm)", "0")?),
            length: parse_non_negative_decimal(&self.text("  Length (cm)", "0")?),
            quantity: parse_plate_count(&self.text("  Quantity", "1")?),
            unit_price: parse_non_negative_decimal(&self.text("  Unit price (per m²)", "0")?),
            fire_rate: parse_non_negative_decimal(&self.text("  Fire rate (%)", "10")?),
            labor_cost: parse_non_negative_decimal(&self.text("  Labor cost", "0")?),
        };

        Ok(item.has_dimensions().then_some(item))
    }
}

impl Default for ProposalWizard {
    fn default() -> Self {
        Self::new()
    }
}
