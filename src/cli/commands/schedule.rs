//! `stw schedule` command - Preview a payment plan

use chrono::{Local, NaiveDate};
use miette::Result;

use crate::cli::commands::utils::{effective_format, optional_project, print_structured};
use crate::cli::helpers::{format_amount, format_money};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::pricing::schedule::DEFAULT_INSTALLMENT_COUNT;
use crate::pricing::{build_schedule, parse_non_negative_decimal, PaymentMethod, PlannedInstallment};

#[derive(clap::Args, Debug)]
pub struct ScheduleArgs {
    /// Contract total
    pub amount: String,

    /// cash, installment, cheque or mixed
    #[arg(long, short = 'm', default_value = "cash")]
    pub method: PaymentMethod,

    /// Number of monthly installments (0 means the default)
    #[arg(long, short = 'c', default_value_t = DEFAULT_INSTALLMENT_COUNT)]
    pub count: u32,

    /// First due date (default: today)
    #[arg(long)]
    pub first_due: Option<NaiveDate>,

    /// Explicit installment DATE:AMOUNT[:METHOD]; repeat for a mixed plan
    #[arg(long = "installment")]
    pub installments: Vec<PlannedInstallment>,
}

pub fn run(args: ScheduleArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load_for(optional_project(global).as_ref());
    let currency = config.currency();

    let first_due = args.first_due.unwrap_or_else(|| Local::now().date_naive());
    let total = parse_non_negative_decimal(&args.amount);

    let method = if args.installments.is_empty() {
        args.method
    } else {
        PaymentMethod::Mixed
    };

    let plan = build_schedule(method, total, first_due, args.count, &args.installments)
        .map_err(|e| miette::miette!("{}", e))?;

    let format = effective_format(global, &config);
    if print_structured(&plan, format)? {
        return Ok(());
    }

    let machine = matches!(format, OutputFormat::Tsv | OutputFormat::Csv);
    let mut table = Table::new(["no", "due_date", "amount", "method"]);
    for installment in &plan {
        table.push_row([
            installment.installment_no.to_string(),
            installment.due_date.to_string(),
            if machine {
                format_amount(installment.amount)
            } else {
                format_money(installment.amount, &currency)
            },
            installment.method.to_string(),
        ]);
    }
    print!("{}", table.render(format)?);

    Ok(())
}
