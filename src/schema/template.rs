//! Template generation for new drafts

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::core::identity::ProposalId;
use crate::pricing::tax::DEFAULT_TAX_RATE;
use crate::pricing::DEFAULT_PROFIT_MULTIPLIER;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const PROPOSAL_TEMPLATE: &str = "proposal.yaml.tera";

/// Context for template generation
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub id: ProposalId,
    pub author: String,
    pub created: DateTime<Utc>,
    pub title: Option<String>,
    pub customer: Option<String>,
    pub currency: String,
    pub valid_until: Option<NaiveDate>,
    pub profit_multiplier: Decimal,
}

impl TemplateContext {
    pub fn new(id: ProposalId, author: String) -> Self {
        Self {
            id,
            author,
            created: Utc::now(),
            title: None,
            customer: None,
            currency: "TRY".to_string(),
            valid_until: None,
            profit_multiplier: DEFAULT_PROFIT_MULTIPLIER,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_valid_until(mut self, date: NaiveDate) -> Self {
        self.valid_until = Some(date);
        self
    }

    pub fn with_profit_multiplier(mut self, multiplier: Decimal) -> Self {
        self.profit_multiplier = multiplier;
        self
    }
}

/// Template generator for new draft files
pub struct TemplateGenerator {
    tera: Tera,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template rendering error: {0}")]
    RenderError(String),
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render a new proposal draft
    pub fn generate_proposal(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let title = ctx.title.clone().unwrap_or_default();
        let customer = ctx.customer.clone().unwrap_or_default();

        let mut context = tera::Context::new();
        context.insert("id", &ctx.id.to_string());
        context.insert("title", &quoted(&title));
        context.insert("title_plain", &title.replace('\n', " "));
        context.insert("customer", &quoted(&customer));
        context.insert("currency", &ctx.currency);
        context.insert("valid_until", &ctx.valid_until.map(|d| d.to_string()));
        context.insert("profit_multiplier", &ctx.profit_multiplier.to_string());
        context.insert("tax_rate", &DEFAULT_TAX_RATE.to_string());
        context.insert("author", &quoted(&ctx.author));
        context.insert("created", &ctx.created.to_rfc3339());
        context.insert("created_date", &ctx.created.format("%Y-%m-%d").to_string());

        if self.tera.get_template_names().any(|n| n == PROPOSAL_TEMPLATE) {
            self.tera
                .render(PROPOSAL_TEMPLATE, &context)
                .map_err(|e| TemplateError::RenderError(e.to_string()))
        } else {
            tracing::debug!("embedded proposal template missing, using fallback");
            Ok(self.hardcoded_proposal_template(ctx))
        }
    }

    fn hardcoded_proposal_template(&self, ctx: &TemplateContext) -> String {
        let valid_until = ctx
            .valid_until
            .map(|d| format!("valid_until: {}\n", d))
            .unwrap_or_default();

        format!(
            r#"id: {id}
title: {title}
customer: {customer}
currency: {currency}
{valid_until}profit_multiplier: "{profit}"
products: []
services:
  labor: {{ total: "0", duration: "0" }}
  atelier_overhead: {{ total: "1", duration: "0" }}
  site_labor: {{ total: "0", duration: "0" }}
  transport: {{ total: "0", duration: "1" }}
external_services: []
items: []
tax:
  include_tax: false
  rate: "{tax_rate}"
author: {author}
created: "{created}"
"#,
            id = ctx.id,
            title = quoted(ctx.title.as_deref().unwrap_or_default()),
            customer = quoted(ctx.customer.as_deref().unwrap_or_default()),
            currency = ctx.currency,
            valid_until = valid_until,
            profit = ctx.profit_multiplier,
            tax_rate = DEFAULT_TAX_RATE,
            author = quoted(&ctx.author),
            created = ctx.created.to_rfc3339(),
        )
    }
}

/// Double-quoted scalar; JSON string syntax is valid YAML
fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProposalDraft;
    use rust_decimal_macros::dec;

    fn context() -> TemplateContext {
        TemplateContext::new(ProposalId::new(), "test".to_string())
            .with_title("Kitchen: \"island\" top")
            .with_customer("Acme")
            .with_currency("USD")
            .with_valid_until(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap())
            .with_profit_multiplier(dec!(1.45))
    }

    #[test]
    fn test_template_generates_loadable_draft() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = context();
        let yaml = generator.generate_proposal(&ctx).unwrap();

        let draft = ProposalDraft::from_yaml(&yaml, "new.stw.yaml").unwrap();
        assert_eq!(draft.id, ctx.id);
        assert_eq!(draft.title, "Kitchen: \"island\" top");
        assert_eq!(draft.currency, "USD");
        assert_eq!(draft.valid_until, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert_eq!(draft.profit_multiplier, dec!(1.45));
        assert_eq!(draft.services.atelier_overhead.total, dec!(1));
        assert!(draft.products.is_empty());
    }

    #[test]
    fn test_template_without_valid_until() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = TemplateContext::new(ProposalId::new(), "test".to_string());
        let yaml = generator.generate_proposal(&ctx).unwrap();

        let draft = ProposalDraft::from_yaml(&yaml, "new.stw.yaml").unwrap();
        assert!(draft.valid_until.is_none());
        assert_eq!(draft.title, "");
    }

    #[test]
    fn test_fallback_template_is_loadable() {
        let generator = TemplateGenerator { tera: Tera::default() };
        let ctx = context();
        let yaml = generator.generate_proposal(&ctx).unwrap();

        let draft = ProposalDraft::from_yaml(&yaml, "fallback.stw.yaml").unwrap();
        assert_eq!(draft.id, ctx.id);
        assert_eq!(draft.tax.rate, dec!(20));
    }
}
