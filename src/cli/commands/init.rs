//! `stw init` command - Initialize a new stoneworks project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::core::project::{Project, ProjectError, PROJECT_DIR, PROPOSALS_DIR};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Rewrite .stw/config.yaml even if the project already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            println!(
                "{} Initialized stoneworks project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            print_structure(project.root());
            println!();
            println!("Next steps:");
            println!("  {} Create your first proposal", style("stw new --title \"...\"").yellow());
            println!("  {} List proposals", style("stw list").yellow());
            println!("  {} Price a proposal", style("stw calc PRP@1").yellow());
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} stoneworks project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("stw init --force").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    println!("Created project structure:");
    println!("  {}/", style(root.display()).dim());
    println!("  ├── {}/", PROJECT_DIR);
    println!("  │   └── config.yaml");
    println!("  └── {}/", PROPOSALS_DIR);
}
