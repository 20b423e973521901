//! Core module - fundamental types and utilities

pub mod config;
pub mod identity;
pub mod loader;
pub mod logging;
pub mod project;
pub mod shortid;

pub use config::Config;
pub use identity::{IdParseError, ProposalId};
pub use project::{Project, ProjectError};
pub use shortid::ShortIdIndex;
