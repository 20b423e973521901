//! `stw tax` command - Split an amount into subtotal and tax

use miette::Result;

use crate::cli::commands::utils::{effective_format, optional_project, print_structured};
use crate::cli::helpers::{format_amount, format_money};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::pricing::tax::DEFAULT_TAX_RATE;
use crate::pricing::{parse_non_negative_decimal, TaxBreakdown};

#[derive(clap::Args, Debug)]
pub struct TaxArgs {
    /// Total amount
    pub amount: String,

    /// The amount already includes tax
    #[arg(long)]
    pub include_tax: bool,

    /// Tax rate in percent
    #[arg(long)]
    pub rate: Option<String>,
}

pub fn run(args: TaxArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load_for(optional_project(global).as_ref());
    let currency = config.currency();

    let rate = args
        .rate
        .as_deref()
        .map(parse_non_negative_decimal)
        .unwrap_or(DEFAULT_TAX_RATE);
    let breakdown = TaxBreakdown::compute(parse_non_negative_decimal(&args.amount), args.include_tax, rate);

    let format = effective_format(global, &config);
    if print_structured(&breakdown, format)? {
        return Ok(());
    }

    let machine = matches!(format, OutputFormat::Tsv | OutputFormat::Csv);
    let money = |v| if machine { format_amount(v) } else { format_money(v, &currency) };

    let mut table = Table::new(["subtotal", "tax", "grand_total"]);
    table.push_row([
        money(breakdown.subtotal),
        money(breakdown.tax_amount),
        money(breakdown.grand_total),
    ]);
    print!("{}", table.render(format)?);

    Ok(())
}
