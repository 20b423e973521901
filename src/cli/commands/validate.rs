//! `stw validate` command - Validate drafts

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::utils::optional_project;
use crate::cli::GlobalOpts;
use crate::core::loader::{read_draft_source, resolve_draft_path};
use crate::schema::validator::validate_draft_source;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Drafts to validate: files, IDs, or short IDs (default: every draft in the project)
    pub drafts: Vec<String>,

    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,

    /// Show summary only, don't show individual issues
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_warnings: usize,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let project = optional_project(global);

    let files: Vec<PathBuf> = if args.drafts.is_empty() {
        let project = project
            .as_ref()
            .ok_or_else(|| miette::miette!("No drafts given and no stoneworks project found"))?;
        project.iter_draft_files().collect()
    } else {
        args.drafts
            .iter()
            .map(|d| resolve_draft_path(d, project.as_ref()))
            .collect::<Result<_>>()?
    };

    let mut stats = ValidationStats::default();
    let verbose = !args.summary && !global.quiet;

    if verbose {
        println!("{} Validating {} draft(s)...\n", style("→").blue(), files.len());
    }

    for path in &files {
        stats.files_checked += 1;

        let source = match read_draft_source(path) {
            Ok(source) => source,
            Err(e) => {
                stats.files_failed += 1;
                if verbose {
                    println!("{} {} - {}", style("✗").red(), path.display(), e);
                }
                continue;
            }
        };

        let report = validate_draft_source(&source, &path.display().to_string());
        stats.total_warnings += report.warnings.len();

        if let Some(error) = report.error {
            stats.files_failed += 1;
            if verbose {
                println!("{} {}", style("✗").red(), path.display());
                println!("{:?}", miette::Report::new(error));
            }
            continue;
        }

        let failed = args.strict && !report.warnings.is_empty();
        if failed {
            stats.files_failed += 1;
        } else {
            stats.files_passed += 1;
        }

        if verbose {
            if report.warnings.is_empty() {
                println!("{} {}", style("✓").green(), path.display());
            } else {
                let mark = if failed { style("✗").red() } else { style("!").yellow() };
                println!(
                    "{} {} - {} warning(s)",
                    mark,
                    path.display(),
                    report.warnings.len()
                );
                for warning in &report.warnings {
                    println!("    {}", style(warning).yellow());
                }
            }
        }
    }

    if !global.quiet {
        println!();
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", style("Validation Summary").bold());
        println!("{}", style("─".repeat(60)).dim());
        println!("  Drafts checked: {}", style(stats.files_checked).cyan());
        println!("  Drafts passed:  {}", style(stats.files_passed).green());
        println!("  Drafts failed:  {}", style(stats.files_failed).red());
        if stats.total_warnings > 0 {
            println!("  Warnings:       {}", style(stats.total_warnings).yellow());
        }
        println!();
    }

    match stats.files_failed {
        0 => {
            if !global.quiet {
                println!("{} All drafts passed validation!", style("✓").green().bold());
            }
            Ok(())
        }
        1 => Err(miette::miette!("Validation failed: 1 draft has errors")),
        n => Err(miette::miette!("Validation failed: {} drafts have errors", n)),
    }
}
