//! Draft loading utilities
//!
//! Commands refer to a draft by file path, by full or partial ID, or by a
//! short ID from the last `stw list`. This module turns such a reference
//! into a file and loads it.

use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::project::{Project, DRAFT_SUFFIX};
use crate::core::shortid::ShortIdIndex;
use crate::entities::ProposalDraft;

/// Load every readable draft in the project
///
/// Files that fail to parse are skipped with a warning; `stw validate`
/// is the place to see why.
pub fn load_all_drafts(project: &Project) -> Vec<(PathBuf, ProposalDraft)> {
    let mut drafts = Vec::new();

    for path in project.iter_draft_files() {
        match ProposalDraft::load(&path) {
            Ok(draft) => drafts.push((path, draft)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable draft"),
        }
    }

    drafts
}

/// Find a draft file by ID (supports partial matching)
///
/// Matching is case-insensitive on the file name without its suffix.
/// An ambiguous partial ID matches nothing.
pub fn find_draft_file(dir: &Path, id: &str) -> Option<PathBuf> {
    if !dir.exists() || id.is_empty() {
        return None;
    }

    let needle = id.to_uppercase();
    let mut matches = Vec::new();

    for entry in fs::read_dir(dir).ok()? {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let Some(stem) = name.strip_suffix(DRAFT_SUFFIX) else {
            continue;
        };

        let stem = stem.to_uppercase();
        if stem == needle {
            return Some(path);
        }
        if stem.contains(&needle) {
            matches.push(path);
        }
    }

    if matches.len() == 1 {
        matches.pop()
    } else {
        if matches.len() > 1 {
            tracing::debug!(id, count = matches.len(), "ambiguous draft reference");
        }
        None
    }
}

/// Resolve a draft reference to a file path
///
/// An existing file wins. Otherwise the reference is looked up as a short
/// ID and then as a (partial) ID inside the project's proposals directory.
pub fn resolve_draft_path(reference: &str, project: Option<&Project>) -> Result<PathBuf> {
    let as_path = Path::new(reference);
    if as_path.is_file() {
        return Ok(as_path.to_path_buf());
    }

    let project = project.ok_or_else(|| {
        miette::miette!(
            "'{}' is not a file and no stoneworks project was found to look it up in",
            reference
        )
    })?;

    let short_ids = ShortIdIndex::load(project);
    let id = short_ids
        .resolve(reference)
        .ok_or_else(|| miette::miette!("Unknown short ID '{}'. Run 'stw list' to refresh it.", reference))?;

    find_draft_file(&project.proposals_dir(), &id)
        .ok_or_else(|| miette::miette!("No draft found matching '{}'", reference))
}

/// Resolve a reference and load the draft it points at
pub fn load_draft(reference: &str, project: Option<&Project>) -> Result<(PathBuf, ProposalDraft)> {
    let path = resolve_draft_path(reference, project)?;
    tracing::debug!(path = %path.display(), "loading draft");
    let draft = ProposalDraft::load(&path)?;
    Ok((path, draft))
}

/// Read a draft file's raw text
pub fn read_draft_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).into_diagnostic()
}
