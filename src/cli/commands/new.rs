//! `stw new` command - Create a proposal draft

use chrono::NaiveDate;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;

use crate::cli::commands::utils::require_project;
use crate::cli::helpers::format_short_id;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::identity::ProposalId;
use crate::core::shortid::ShortIdIndex;
use crate::entities::proposal::{ProposalDraft, CURRENCIES};
use crate::schema::template::{TemplateContext, TemplateGenerator};
use crate::schema::wizard::ProposalWizard;

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Proposal title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Customer name
    #[arg(long, short = 'c')]
    pub customer: Option<String>,

    /// Currency (TRY, USD, EUR)
    #[arg(long)]
    pub currency: Option<String>,

    /// Last day the offer is valid (YYYY-MM-DD)
    #[arg(long)]
    pub valid_until: Option<NaiveDate>,

    /// Prompt for the header, products and items
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Don't open the draft in an editor
    #[arg(long)]
    pub no_edit: bool,
}

pub fn run(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = require_project(global)?;
    let config = Config::load_for(Some(&project));

    let currency = match args.currency.as_deref() {
        Some(c) => {
            let upper = c.trim().to_uppercase();
            if !CURRENCIES.contains(&upper.as_str()) {
                return Err(miette::miette!("Unknown currency '{}'. Use TRY, USD or EUR.", c));
            }
            upper
        }
        None => config.currency(),
    };

    let id = ProposalId::new();
    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let mut ctx = TemplateContext::new(id, config.author())
        .with_currency(&currency)
        .with_profit_multiplier(config.profit_multiplier());

    let wizard_result = if args.interactive {
        let result = ProposalWizard::new().run(&currency, config.profit_multiplier())?;
        ctx = ctx
            .with_title(&result.title)
            .with_customer(&result.customer)
            .with_currency(&result.currency)
            .with_profit_multiplier(result.profit_multiplier);
        if let Some(date) = result.valid_until {
            ctx = ctx.with_valid_until(date);
        }
        Some(result)
    } else {
        ctx = ctx.with_title(args.title.clone().unwrap_or_else(|| "New Proposal".to_string()));
        if let Some(ref customer) = args.customer {
            ctx = ctx.with_customer(customer);
        }
        if let Some(date) = args.valid_until {
            ctx = ctx.with_valid_until(date);
        }
        None
    };

    let yaml_content = generator
        .generate_proposal(&ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    let output_dir = project.proposals_dir();
    if !output_dir.exists() {
        fs::create_dir_all(&output_dir).into_diagnostic()?;
    }
    let file_path = project.draft_path(&id);

    match wizard_result {
        // Lines collected by the wizard are added to the rendered draft
        Some(result) if !result.products.is_empty() || !result.items.is_empty() => {
            let filename = file_path.display().to_string();
            let mut draft = ProposalDraft::from_yaml(&yaml_content, &filename)?;
            for line in result.products {
                draft = draft.with_product(line);
            }
            for item in result.items {
                draft = draft.with_item(item);
            }
            draft.save(&file_path)?;
        }
        _ => fs::write(&file_path, &yaml_content).into_diagnostic()?,
    }
    tracing::debug!(id = %id, path = %file_path.display(), "created draft");

    let mut short_ids = ShortIdIndex::load(&project);
    short_ids.add(id.to_string());
    if let Err(e) = short_ids.save(&project) {
        tracing::warn!(error = %e, "could not save short ID index");
    }

    if !global.quiet {
        println!(
            "{} Created proposal {}",
            style("✓").green(),
            style(short_ids.get_short_id(&id.to_string()).unwrap_or_else(|| format_short_id(&id))).cyan()
        );
        println!("   {}", style(file_path.display()).dim());
        println!("   Number: {}", style(id.proposal_number()).yellow());
    }

    if !args.no_edit && !args.interactive {
        println!();
        println!("Opening in {}...", style(config.editor()).yellow());
        config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}
