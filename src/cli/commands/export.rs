//! `stw export` command - Print the submission payload of a draft

use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::optional_project;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::loader::load_draft;
use crate::entities::submission::SubmissionPayload;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Draft file, ID, or short ID (PRP@N)
    pub draft: String,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let project = optional_project(global);
    let (_, draft) = load_draft(&args.draft, project.as_ref())?;

    let payload = SubmissionPayload::from_draft(&draft);
    if payload.items.len() < draft.items.len() {
        tracing::warn!(
            skipped = draft.items.len() - payload.items.len(),
            "items without width or length are not exported"
        );
    }

    match global.format {
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&payload).into_diagnostic()?),
        _ => println!("{}", serde_json::to_string_pretty(&payload).into_diagnostic()?),
    }

    Ok(())
}
