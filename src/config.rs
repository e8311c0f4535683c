//! Application configuration.
//!
//! One JSON document at `~/.config/skm/config.json`: remote registries,
//! custom skill repos, and per-provider enable/path overrides. A missing
//! file yields the defaults; saving writes pretty JSON. Registry search
//! itself lives outside this crate; the registry list is carried here so
//! the config file round-trips whole.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkmError};
use crate::provider::ProviderKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    pub name: String,
    pub url: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub registries: Vec<Registry>,
    #[serde(default)]
    pub repos: Vec<String>,
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl Config {
    /// Defaults: both public registries, the starter repos, and every
    /// known provider with the common ones enabled.
    #[must_use]
    pub fn default_for_home(home: &Path) -> Self {
        let provider = |kind: ProviderKind, enabled: bool| {
            (
                kind.name().to_string(),
                ProviderConfig {
                    enabled,
                    path: home.join(format!(".{}", kind.name())).join("skills"),
                },
            )
        };

        Self {
            registries: vec![
                Registry {
                    name: "skills.sh".into(),
                    url: "https://skills.sh/api/search".into(),
                    enabled: true,
                },
                Registry {
                    name: "playbooks.com".into(),
                    url: "https://playbooks.com/api/skills".into(),
                    enabled: true,
                },
            ],
            repos: vec![
                "yoanbernabeu/grepai-skills".into(),
                "better-auth/skills".into(),
                "awni/mlx-skills".into(),
            ],
            providers: [
                provider(ProviderKind::Claude, true),
                provider(ProviderKind::Cursor, true),
                provider(ProviderKind::Qoder, true),
                provider(ProviderKind::Windsurf, false),
                provider(ProviderKind::Copilot, false),
                provider(ProviderKind::Opencode, false),
                provider(ProviderKind::Codex, false),
                provider(ProviderKind::Gemini, false),
                provider(ProviderKind::Amp, false),
            ]
            .into(),
        }
    }

    /// Load from `path`; a missing file is the default config for `home`.
    pub fn load(path: &Path, home: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default_for_home(home));
            }
            Err(err) => {
                return Err(SkmError::Config(format!("read {}: {err}", path.display())));
            }
        };
        serde_json::from_str(&raw)
            .map_err(|err| SkmError::Config(format!("parse {}: {err}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn add_repo(&mut self, repo: &str) {
        if !self.repos.iter().any(|r| r == repo) {
            self.repos.push(repo.to_string());
        }
    }

    pub fn remove_repo(&mut self, repo: &str) {
        self.repos.retain(|r| r != repo);
    }

    pub fn set_registry_enabled(&mut self, name: &str, enabled: bool) {
        if let Some(registry) = self.registries.iter_mut().find(|r| r.name == name) {
            registry.enabled = enabled;
        }
    }

    pub fn set_provider_enabled(&mut self, kind: ProviderKind, enabled: bool) {
        if let Some(provider) = self.providers.get_mut(kind.name()) {
            provider.enabled = enabled;
        }
    }

    /// Enabled providers that map onto the closed set; unknown names in
    /// the config file are ignored, providers missing from the file
    /// default to enabled.
    #[must_use]
    pub fn enabled_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.providers.get(kind.name()).is_none_or(|p| p.enabled))
            .collect()
    }

    /// Explicit path overrides from the config file, for providers whose
    /// directory differs from the `~/.<tool>/skills` convention.
    #[must_use]
    pub fn provider_overrides(&self, home: &Path) -> Vec<(ProviderKind, PathBuf)> {
        self.providers
            .iter()
            .filter_map(|(name, config)| {
                let kind = ProviderKind::from_name(name)?;
                let conventional = home.join(format!(".{name}")).join("skills");
                (config.path != conventional).then(|| (kind, config.path.clone()))
            })
            .collect()
    }
}
