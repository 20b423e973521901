//! `stw item` command - Price a single sized item

use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::{effective_format, optional_project, print_structured};
use crate::cli::helpers::{format_amount, format_money};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::pricing::item::DEFAULT_FIRE_RATE;
use crate::pricing::{compute_item_total, parse_non_negative_decimal, parse_plate_count, ItemCost, ProposalItem};

#[derive(clap::Args, Debug)]
pub struct ItemArgs {
    /// Width in cm
    #[arg(long, short = 'w')]
    pub width: String,

    /// Length in cm
    #[arg(long, short = 'l')]
    pub length: String,

    /// Number of pieces
    #[arg(long, default_value = "1")]
    pub quantity: String,

    /// Price per m²
    #[arg(long, short = 'p')]
    pub unit_price: String,

    /// Waste percentage added to the material
    #[arg(long)]
    pub fire_rate: Option<String>,

    /// Labor cost added after waste
    #[arg(long, default_value = "0")]
    pub labor: String,
}

#[derive(Serialize)]
struct ItemOutput<'a> {
    item: &'a ProposalItem,
    #[serde(flatten)]
    cost: ItemCost,
}

pub fn run(args: ItemArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load_for(optional_project(global).as_ref());
    let currency = config.currency();

    let item = ProposalItem {
        product: String::new(),
        width: parse_non_negative_decimal(&args.width),
        length: parse_non_negative_decimal(&args.length),
        quantity: parse_plate_count(&args.quantity),
        unit_price: parse_non_negative_decimal(&args.unit_price),
        fire_rate: args
            .fire_rate
            .as_deref()
            .map(parse_non_negative_decimal)
            .unwrap_or(DEFAULT_FIRE_RATE),
        labor_cost: parse_non_negative_decimal(&args.labor),
    };

    if !item.has_dimensions() {
        tracing::warn!("item has no size; the proposal screen would not accept it");
    }

    let cost = compute_item_total(&item);
    let format = effective_format(global, &config);
    if print_structured(&ItemOutput { item: &item, cost }, format)? {
        return Ok(());
    }

    let machine = matches!(format, OutputFormat::Tsv | OutputFormat::Csv);
    let money = |v| if machine { format_amount(v) } else { format_money(v, &currency) };

    let mut table = Table::new(["area_m2", "waste", "material", "labor", "total"]);
    table.push_row([
        format_amount(cost.area_m2),
        format_amount(cost.waste_multiplier),
        money(cost.material_cost),
        money(item.labor_cost),
        money(cost.total),
    ]);
    print!("{}", table.render(format)?);

    Ok(())
}
