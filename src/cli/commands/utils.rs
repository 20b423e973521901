//! Shared utilities for CLI commands

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::project::Project;

/// The project named by `--project`, or the one around the current directory
pub fn require_project(global: &GlobalOpts) -> Result<Project> {
    Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))
}

/// Like [`require_project`] for commands that also work on loose files
pub fn optional_project(global: &GlobalOpts) -> Option<Project> {
    match Project::locate(global.project.as_deref()) {
        Ok(project) => Some(project),
        Err(e) => {
            tracing::debug!(error = %e, "no project");
            None
        }
    }
}

/// `--format`, falling back to the configured default format
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }

    config
        .default_format
        .as_deref()
        .and_then(|f| OutputFormat::from_str(f, true).ok())
        .unwrap_or(OutputFormat::Auto)
}

/// Print `value` when the format is JSON or YAML. Returns false for the
/// tabular formats, which the caller renders itself.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(format: OutputFormat) -> GlobalOpts {
        GlobalOpts {
            format,
            quiet: false,
            verbose: false,
            project: None,
        }
    }

    #[test]
    fn test_effective_format_prefers_flag() {
        let config = Config {
            default_format: Some("csv".to_string()),
            ..Default::default()
        };
        assert_eq!(effective_format(&global(OutputFormat::Json), &config), OutputFormat::Json);
        assert_eq!(effective_format(&global(OutputFormat::Auto), &config), OutputFormat::Csv);
    }

    #[test]
    fn test_effective_format_ignores_unknown_config() {
        let config = Config {
            default_format: Some("xml".to_string()),
            ..Default::default()
        };
        assert_eq!(effective_format(&global(OutputFormat::Auto), &config), OutputFormat::Auto);
    }
}
