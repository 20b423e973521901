//! Project discovery and structure
//!
//! A project is any directory containing `.stw/`. Drafts live under
//! `proposals/` next to it.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::ProposalId;

/// Name of the project marker directory
pub const PROJECT_DIR: &str = ".stw";

/// Directory holding proposal drafts
pub const PROPOSALS_DIR: &str = "proposals";

/// File suffix of a proposal draft
pub const DRAFT_SUFFIX: &str = ".stw.yaml";

/// Represents a stoneworks project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .stw/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                tracing::debug!(root = %current.display(), "discovered project");
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Resolve the project from `--project` if given, otherwise discover it
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ProjectError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        Self::init_force(&root)
    }

    /// Initialize even if .stw/ exists, rewriting the default config
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let stw_dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(&stw_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(stw_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::create_dir_all(root.join(PROPOSALS_DIR))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        tracing::debug!(root = %root.display(), "initialized project");
        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Stoneworks project configuration

# Default author for new drafts (can be overridden by global config)
# author: ""

# Editor to use for `stw new` (default: $EDITOR)
# editor: ""

# Default output format (auto, yaml, json, tsv, csv, md)
# default_format: auto

# Currency for new drafts (TRY, USD, EUR)
# currency: TRY

# Profit multiplier for new drafts
# profit_multiplier: "1.6"

# Unit prices of the in-house services
# rates:
#   labor: "1500"
#   atelier_overhead: "6350"
#   site_labor: "2000"
#   transport: "3500"
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .stw configuration directory
    pub fn stw_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Directory holding the drafts
    pub fn proposals_dir(&self) -> PathBuf {
        self.root.join(PROPOSALS_DIR)
    }

    /// Path for a draft file
    pub fn draft_path(&self, id: &ProposalId) -> PathBuf {
        self.proposals_dir().join(format!("{}{}", id, DRAFT_SUFFIX))
    }

    /// Iterate all draft files in the project
    pub fn iter_draft_files(&self) -> impl Iterator<Item = PathBuf> {
        walkdir::WalkDir::new(self.proposals_dir())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().to_string_lossy().ends_with(DRAFT_SUFFIX))
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a stoneworks project (searched from {searched_from:?}). Run 'stw init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("stoneworks project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.stw_dir().exists());
        assert!(project.stw_dir().join("config.yaml").exists());
        assert!(project.proposals_dir().is_dir());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_project_init_force() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();
        assert!(Project::init_force(tmp.path()).is_ok());
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let nested = tmp.path().join("proposals/archive");
        std::fs::create_dir_all(&nested).unwrap();

        let project = Project::discover_from(&nested).unwrap();
        assert_eq!(project.root(), tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_discover_not_found() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }

    #[test]
    fn test_iter_draft_files() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        let id = ProposalId::new();
        std::fs::write(project.draft_path(&id), "title: x\n").unwrap();
        std::fs::write(project.proposals_dir().join("notes.txt"), "ignore").unwrap();

        let files: Vec<_> = project.iter_draft_files().collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].to_string_lossy().contains(&id.to_string()));
    }
}
