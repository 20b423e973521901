//! Stoneworks: proposal pricing for stone fabrication
//!
//! Proposal drafts live as plain YAML files in a project directory. The
//! [`pricing`] module turns a draft's cost inputs into the figures a sales
//! proposal is built from; [`cli`] is the `stw` command-line front end.

pub mod cli;
pub mod core;
pub mod entities;
pub mod pricing;
pub mod schema;
pub mod yaml;
