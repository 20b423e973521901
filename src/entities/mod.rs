//! Entity type definitions
//!
//! - [`ProposalDraft`] - an editable proposal with its pricing inputs
//! - [`DraftEdit`] - a single field-path edit applied by `stw set`
//! - [`SubmissionPayload`] - the header and items posted on submission

pub mod edit;
pub mod proposal;
pub mod submission;

pub use edit::{DraftEdit, EditError, LineKind};
pub use proposal::{CostBreakdown, DraftError, ProposalDraft, TaxSettings};
pub use submission::SubmissionPayload;
