//! Draft templates, the interactive wizard, and draft validation

pub mod template;
pub mod validator;
pub mod wizard;

pub use template::{TemplateContext, TemplateError, TemplateGenerator};
pub use validator::{validate_draft_source, ValidationReport, ValidationWarning};
pub use wizard::{ProposalWizard, WizardResult};
