use super::{DomainBinding, Palette, PhraseGroup, SchedulerSettings};
use crate::types::StyleMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// User-facing highlighting configuration, persisted as config.toml.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub groups: Vec<PhraseGroup>,
    #[serde(default)]
    pub domains: Vec<DomainBinding>,
}

/// What the highlighting engine consumes for one host.
#[derive(Clone, Debug)]
pub struct ResolvedHighlights {
    pub palette: Palette,
    pub styles: Arc<StyleMap>,
}

impl AppConfig {
    /// Returns the config file path within the given data directory.
    pub fn path(data_dir: &Path) -> std::path::PathBuf {
        data_dir.join("config.toml")
    }

    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parses the JSON shape kept in browser-style key/value storage.
    pub fn from_json(json: &str) -> Result<Self, AppConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, AppConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.scheduler.throttle_ms == 0 {
            errors.push("throttle_ms must be at least 1".to_string());
        }

        if self.scheduler.pending_capacity == 0 {
            errors.push("pending_capacity must be at least 1".to_string());
        }

        let mut names = HashSet::new();
        for group in &self.groups {
            if !names.insert(group.name.as_str()) {
                errors.push(format!("duplicate group name: {}", group.name));
            }
        }

        for binding in &self.domains {
            if binding.host.trim().is_empty() {
                errors.push("domain host pattern must not be empty".to_string());
            }
            if let Some(filter) = &binding.filter {
                for name in &filter.groups {
                    if !names.contains(name.as_str()) {
                        errors.push(format!(
                            "domain {} filters unknown group: {}",
                            binding.host, name
                        ));
                    }
                }
            }
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = SchedulerSettings::default();
        Self {
            scheduler: SchedulerSettings {
                throttle_ms: if self.scheduler.throttle_ms == 0 {
                    defaults.throttle_ms
                } else {
                    self.scheduler.throttle_ms
                },
                debounce_ms: self.scheduler.debounce_ms,
                pending_capacity: if self.scheduler.pending_capacity == 0 {
                    defaults.pending_capacity
                } else {
                    self.scheduler.pending_capacity
                },
            },
            groups: self.groups.clone(),
            domains: self.domains.clone(),
        }
    }

    /// Resolves the phrase→style map for a host.
    ///
    /// The first binding matching the host wins. Enabled groups it admits
    /// contribute their phrases in configuration order; a phrase already
    /// contributed by an earlier group keeps that group's style. Returns
    /// `None` when nothing applies, which suspends highlighting.
    pub fn resolve(&self, host: &str, system_prefers_dark: bool) -> Option<ResolvedHighlights> {
        let Some(binding) = self.domains.iter().find(|b| b.matches_host(host)) else {
            tracing::debug!(host, "no domain binding matches host");
            return None;
        };

        let palette = binding.palette.resolve(system_prefers_dark);
        let styles: StyleMap = self
            .groups
            .iter()
            .filter(|group| group.enabled && binding.admits_group(&group.name))
            .flat_map(|group| group.styles(palette))
            .collect();

        if styles.is_empty() {
            tracing::debug!(host, pattern = %binding.host, "no enabled phrases for host");
            return None;
        }

        Some(ResolvedHighlights {
            palette,
            styles: Arc::new(styles),
        })
    }
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
