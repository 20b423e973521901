//! `stw calc` command - Price a draft

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::{effective_format, optional_project, print_structured};
use crate::cli::helpers::{format_amount, format_money};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::loader::load_draft;
use crate::entities::proposal::{CostBreakdown, ProposalDraft};
use crate::pricing::{parse_non_negative_decimal, ServiceKind};

#[derive(clap::Args, Debug)]
pub struct CalcArgs {
    /// Draft file, ID, or short ID (PRP@N)
    pub draft: String,

    /// Price with this profit multiplier instead of the draft's
    #[arg(long)]
    pub profit: Option<String>,
}

#[derive(Serialize)]
struct CalcOutput<'a> {
    id: String,
    title: &'a str,
    currency: &'a str,
    #[serde(flatten)]
    breakdown: &'a CostBreakdown,
}

pub fn run(args: CalcArgs, global: &GlobalOpts) -> Result<()> {
    let project = optional_project(global);
    let config = Config::load_for(project.as_ref());
    let (_, mut draft) = load_draft(&args.draft, project.as_ref())?;

    if let Some(ref profit) = args.profit {
        draft = draft.with_profit_multiplier(parse_non_negative_decimal(profit));
    }

    let breakdown = draft.evaluate(&config.rate_card());
    let format = effective_format(global, &config);

    let output = CalcOutput {
        id: draft.id.to_string(),
        title: &draft.title,
        currency: &draft.currency,
        breakdown: &breakdown,
    };
    if print_structured(&output, format)? {
        return Ok(());
    }

    match format {
        OutputFormat::Tsv | OutputFormat::Csv => print!("{}", flat_table(&breakdown).render(format)?),
        _ => print_report(&draft, &breakdown, format, global.quiet)?,
    }

    Ok(())
}

/// Every line and total as one table, for piping
fn flat_table(b: &CostBreakdown) -> Table {
    let mut table = Table::new(["section", "name", "quantity", "unit_price", "duration", "actual", "vat"]);

    for row in &b.products {
        table.push_row([
            "product".to_string(),
            row.label.clone(),
            row.plate_count.to_string(),
            format_amount(row.stone_fee),
            String::new(),
            format_amount(row.cost.actual),
            format_amount(row.cost.vat),
        ]);
    }

    for &kind in ServiceKind::all() {
        if let Some(cost) = b.services.get(kind) {
            table.push_row([
                "service".to_string(),
                kind.as_str().to_string(),
                format_amount(cost.total),
                cost.unit_price.map(format_amount).unwrap_or_default(),
                format_amount(cost.duration),
                format_amount(cost.actual),
                format_amount(cost.vat),
            ]);
        }
    }

    for row in &b.external {
        table.push_row([
            "external".to_string(),
            row.name.clone(),
            format_amount(row.quantity),
            format_amount(row.unit_price),
            format_amount(row.duration),
            format_amount(row.cost.actual),
            format_amount(row.cost.vat),
        ]);
    }

    for row in &b.items {
        table.push_row([
            "item".to_string(),
            row.product.clone(),
            format_amount(row.cost.area_m2),
            String::new(),
            String::new(),
            format_amount(row.cost.total),
            String::new(),
        ]);
    }

    let s = &b.summary;
    for (name, actual, vat) in [
        ("general_cost", s.general_cost, s.vat_cost),
        ("profit_total", s.profit_total, s.profit_total),
        ("final_total", s.final_total, s.final_total),
    ] {
        table.push_row([
            "summary".to_string(),
            name.to_string(),
            String::new(),
            String::new(),
            String::new(),
            format_amount(actual),
            format_amount(vat),
        ]);
    }

    table
}

fn print_report(draft: &ProposalDraft, b: &CostBreakdown, format: OutputFormat, quiet: bool) -> Result<()> {
    let money = |v| format_money(v, &draft.currency);

    if !quiet {
        println!(
            "{} {}  {}",
            style(draft.id.proposal_number()).cyan(),
            style(&draft.title).bold(),
            style(&draft.customer).dim()
        );
        println!();
    }

    if !b.products.is_empty() {
        let mut table = Table::new(["Product", "Plates", "Fee / plate", "Cost", "Cost + VAT"]);
        for row in &b.products {
            table.push_row([
                row.label.clone(),
                row.plate_count.to_string(),
                money(row.stone_fee),
                money(row.cost.actual),
                money(row.cost.vat),
            ]);
        }
        table.push_row([
            "Total".to_string(),
            String::new(),
            String::new(),
            money(b.product_totals.actual),
            money(b.product_totals.vat),
        ]);
        section("Products", quiet);
        print!("{}", table.render(format)?);
    }

    let mut services = Table::new(["Service", "Unit price", "Total", "Days", "Cost", "Cost + VAT"]);
    for &kind in ServiceKind::all() {
        if let Some(cost) = b.services.get(kind) {
            let (total, days) = if kind == ServiceKind::Consumables {
                ("5%".to_string(), String::new())
            } else {
                (format_amount(cost.total), format_amount(cost.duration))
            };
            services.push_row([
                kind.display_name().to_string(),
                cost.unit_price.map(money).unwrap_or_default(),
                total,
                days,
                money(cost.actual),
                money(cost.vat),
            ]);
        }
    }
    services.push_row([
        "Total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        money(b.services.actual_total),
        money(b.services.vat_total),
    ]);
    section("Services", quiet);
    print!("{}", services.render(format)?);

    if !b.external.is_empty() {
        let mut table = Table::new(["External service", "Quantity", "Unit", "Unit price", "Days", "Cost", "Cost + VAT"]);
        for row in &b.external {
            table.push_row([
                row.name.clone(),
                format_amount(row.quantity),
                row.unit.clone(),
                money(row.unit_price),
                format_amount(row.duration),
                money(row.cost.actual),
                money(row.cost.vat),
            ]);
        }
        section("External services", quiet);
        print!("{}", table.render(format)?);
    }

    let s = &b.summary;
    let mut summary = Table::new(["", "Amount"]);
    summary.push_row(["General cost".to_string(), money(s.general_cost)]);
    summary.push_row(["Cost incl. VAT".to_string(), money(s.vat_cost)]);
    summary.push_row([format!("With profit (x{})", s.profit_multiplier.normalize()), money(s.profit_total)]);
    summary.push_row(["Profit".to_string(), money(s.margin())]);
    summary.push_row(["Final price (incl. VAT)".to_string(), money(s.final_total)]);
    section("Summary", quiet);
    print!("{}", summary.render(format)?);

    if !b.items.is_empty() {
        let mut items = Table::new(["Item", "Area m²", "Waste", "Material", "Total"]);
        for row in &b.items {
            items.push_row([
                row.product.clone(),
                format_amount(row.cost.area_m2),
                format!("x{}", row.cost.waste_multiplier.normalize()),
                money(row.cost.material_cost),
                money(row.cost.total),
            ]);
        }
        items.push_row([
            "Subtotal".to_string(),
            String::new(),
            String::new(),
            String::new(),
            money(b.tax.subtotal),
        ]);
        items.push_row([
            format!("Tax ({}%)", draft.tax.rate.normalize()),
            String::new(),
            String::new(),
            String::new(),
            money(b.tax.tax_amount),
        ]);
        items.push_row([
            "Grand total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            money(b.tax.grand_total),
        ]);
        section("Items", quiet);
        print!("{}", items.render(format)?);
    }

    Ok(())
}

fn section(title: &str, quiet: bool) {
    if !quiet {
        println!();
        println!("{}", style(title).bold());
    }
}
