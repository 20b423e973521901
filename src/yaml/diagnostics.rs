//! YAML error diagnostics pointing at the offending spot in a draft

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A draft that is not valid YAML, or not shaped like a draft
#[derive(Debug, Error, Diagnostic)]
#[error("cannot read draft: {message}")]
#[diagnostic(code(stw::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error and the text it came from
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help,
            message,
        }
    }

    /// The underlying parser message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convert a 1-based line/column to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();

    let line_text = source[line_start.min(source.len())..]
        .split('\n')
        .next()
        .unwrap_or("");

    let col_offset = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(line_text.len());

    (line_start + col_offset).min(source.len())
}

/// Suggest a fix for the parser messages people hit most when hand-editing drafts
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string());
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg_lower.contains("expected block end") || msg_lower.contains("did not find expected") {
        return Some("Check your indentation - it may be inconsistent.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    if msg_lower.contains("unknown variant") {
        return Some(
            "Service keys are labor, atelier_overhead, site_labor and transport; consumables are derived."
                .to_string(),
        );
    }

    if msg_lower.contains("invalid type") && msg_lower.contains("sequence") {
        return Some("products, external_services and items are lists; start each entry with '- '.".to_string());
    }

    if msg_lower.contains("missing field") {
        return Some("Every draft needs an 'id' and a 'title'. Create drafts with 'stw new'.".to_string());
    }

    None
}
