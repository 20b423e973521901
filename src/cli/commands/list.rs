//! `stw list` command - List drafts with their totals

use clap::ValueEnum;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::{effective_format, print_structured, require_project};
use crate::cli::helpers::{format_amount, format_money, truncate_str};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::loader::load_all_drafts;
use crate::core::shortid::ShortIdIndex;
use crate::pricing::round2;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListColumn {
    #[default]
    Id,
    Title,
    Customer,
    Total,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Sort by column
    #[arg(long, short = 's', default_value = "id")]
    pub sort: ListColumn,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

#[derive(Serialize)]
struct ListRow {
    short_id: String,
    id: String,
    number: String,
    title: String,
    customer: String,
    currency: String,
    general_cost: rust_decimal::Decimal,
    final_total: rust_decimal::Decimal,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = require_project(global)?;
    let config = Config::load_for(Some(&project));
    let rates = config.rate_card();

    let mut rows: Vec<ListRow> = load_all_drafts(&project)
        .into_iter()
        .map(|(_, draft)| {
            let summary = draft.evaluate(&rates).summary;
            ListRow {
                short_id: String::new(),
                id: draft.id.to_string(),
                number: draft.id.proposal_number(),
                title: draft.title,
                customer: draft.customer,
                currency: draft.currency,
                general_cost: round2(summary.general_cost),
                final_total: round2(summary.final_total),
            }
        })
        .collect();

    match args.sort {
        ListColumn::Id => rows.sort_by(|a, b| a.id.cmp(&b.id)),
        ListColumn::Title => rows.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
        ListColumn::Customer => rows.sort_by(|a, b| a.customer.to_lowercase().cmp(&b.customer.to_lowercase())),
        ListColumn::Total => rows.sort_by(|a, b| a.final_total.cmp(&b.final_total)),
    }

    if args.reverse {
        rows.reverse();
    }

    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    if args.count {
        println!("{}", rows.len());
        return Ok(());
    }

    if rows.is_empty() {
        println!("No proposals found.");
        return Ok(());
    }

    // Short IDs follow the order just printed
    let mut short_ids = ShortIdIndex::load(&project);
    short_ids.rebuild(rows.iter().map(|r| r.id.clone()));
    if let Err(e) = short_ids.save(&project) {
        tracing::warn!(error = %e, "could not save short ID index");
    }
    for row in &mut rows {
        row.short_id = short_ids.get_short_id(&row.id).unwrap_or_default();
    }

    let format = effective_format(global, &config);
    if print_structured(&rows, format)? {
        return Ok(());
    }

    let machine = matches!(format, OutputFormat::Tsv | OutputFormat::Csv);
    let mut table = Table::new(["short", "number", "title", "customer", "cost", "final"]);
    for row in &rows {
        let (cost, total) = if machine {
            (format_amount(row.general_cost), format_amount(row.final_total))
        } else {
            (
                format_money(row.general_cost, &row.currency),
                format_money(row.final_total, &row.currency),
            )
        };
        let (title, customer) = if machine {
            (row.title.clone(), row.customer.clone())
        } else {
            (truncate_str(&row.title, 32), truncate_str(&row.customer, 24))
        };
        table.push_row([row.short_id.clone(), row.number.clone(), title, customer, cost, total]);
    }
    print!("{}", table.render(format)?);

    if !machine && !global.quiet {
        println!();
        println!("{} proposal(s) found", style(rows.len()).cyan());
    }

    Ok(())
}
