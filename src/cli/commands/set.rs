//! `stw set` command - Change one field of a draft

use console::style;
use miette::Result;

use crate::cli::commands::utils::optional_project;
use crate::cli::helpers::format_money;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::loader::load_draft;
use crate::entities::edit::DraftEdit;

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Draft file, ID, or short ID (PRP@N)
    pub draft: String,

    /// Field path, e.g. product.0.stone_fee, service.labor.total, tax.include
    pub field: String,

    /// New value; numbers accept "12,5" and anything unreadable counts as 0
    #[arg(required_unless_present = "remove")]
    pub value: Option<String>,

    /// Remove the line named by FIELD (product.N, external.N, item.N)
    #[arg(long, conflicts_with = "value")]
    pub remove: bool,
}

pub fn run(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let project = optional_project(global);
    let config = Config::load_for(project.as_ref());
    let (path, draft) = load_draft(&args.draft, project.as_ref())?;

    let edit = match (&args.value, args.remove) {
        (_, true) => DraftEdit::removal(&args.field),
        (Some(value), false) => DraftEdit::parse(&args.field, value),
        (None, false) => return Err(miette::miette!("A value is required unless --remove is given")),
    }
    .map_err(|e| miette::miette!("{}", e))?;

    let draft = draft.apply(edit).map_err(|e| miette::miette!("{}", e))?;
    draft.save(&path)?;

    if !global.quiet {
        let summary = draft.evaluate(&config.rate_card()).summary;
        if args.remove {
            println!("{} Removed {}", style("✓").green(), style(&args.field).cyan());
        } else {
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                style(&args.field).cyan(),
                style(args.value.as_deref().unwrap_or_default()).yellow()
            );
        }
        println!("   {}", style(path.display()).dim());
        println!("   Final price: {}", style(format_money(summary.final_total, &draft.currency)).bold());
    }

    Ok(())
}
