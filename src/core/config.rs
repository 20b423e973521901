//! Configuration management with layered hierarchy

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Project;
use crate::pricing::{RateCard, DEFAULT_PROFIT_MULTIPLIER};

/// Partial rate card; unset services keep the built-in price
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RatesConfig {
    pub labor: Option<Decimal>,
    pub atelier_overhead: Option<Decimal>,
    pub site_labor: Option<Decimal>,
    pub transport: Option<Decimal>,
}

impl RatesConfig {
    fn merge(&mut self, other: RatesConfig) {
        if other.labor.is_some() {
            self.labor = other.labor;
        }
        if other.atelier_overhead.is_some() {
            self.atelier_overhead = other.atelier_overhead;
        }
        if other.site_labor.is_some() {
            self.site_labor = other.site_labor;
        }
        if other.transport.is_some() {
            self.transport = other.transport;
        }
    }
}

/// Stoneworks configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author for new drafts
    pub author: Option<String>,

    /// Editor command for `stw new`
    pub editor: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Currency for new drafts
    pub currency: Option<String>,

    /// Profit multiplier for new drafts
    pub profit_multiplier: Option<Decimal>,

    /// Service unit price overrides
    pub rates: RatesConfig,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/stw/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.stw/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.stw_dir().join("config.yaml")) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("STW_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(editor) = std::env::var("STW_EDITOR") {
            config.editor = Some(editor);
        }
        if let Ok(currency) = std::env::var("STW_CURRENCY") {
            config.currency = Some(currency);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "stw").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.currency.is_some() {
            self.currency = other.currency;
        }
        if other.profit_multiplier.is_some() {
            self.profit_multiplier = other.profit_multiplier;
        }
        self.rates.merge(other.rates);
    }

    /// Rate card with configured overrides applied
    pub fn rate_card(&self) -> RateCard {
        let defaults = RateCard::default();
        RateCard {
            labor: self.rates.labor.unwrap_or(defaults.labor),
            atelier_overhead: self.rates.atelier_overhead.unwrap_or(defaults.atelier_overhead),
            site_labor: self.rates.site_labor.unwrap_or(defaults.site_labor),
            transport: self.rates.transport.unwrap_or(defaults.transport),
        }
    }

    /// Profit multiplier for new drafts
    pub fn profit_multiplier(&self) -> Decimal {
        self.profit_multiplier.unwrap_or(DEFAULT_PROFIT_MULTIPLIER)
    }

    /// Currency for new drafts
    pub fn currency(&self) -> String {
        self.currency
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "TRY".to_string())
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        // Try git config
        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        // Fall back to username
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Get the editor command
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file, handling commands with arguments
    /// (e.g., "emacsclient -nw" or "code --wait")
    pub fn run_editor(&self, file_path: &Path) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let parts: Vec<&str> = editor.split_whitespace().collect();

        match parts.split_first() {
            Some((cmd, args)) => std::process::Command::new(cmd).args(args).arg(file_path).status(),
            None => std::process::Command::new("vi").arg(file_path).status(),
        }
    }
}
