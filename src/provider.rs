//! Provider registry.
//!
//! Providers are a closed set of consumer tools, each with a flat skills
//! directory under the home root. Configured/unconfigured state is
//! derived from the filesystem at probe time and never persisted. The
//! home root is injected at construction so the registry runs against a
//! synthetic root in tests instead of reading global process state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// The closed set of known providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Claude,
    Cursor,
    Qoder,
    Windsurf,
    Copilot,
    Opencode,
    Codex,
    Gemini,
    Amp,
}

impl ProviderKind {
    pub const ALL: [Self; 9] = [
        Self::Claude,
        Self::Cursor,
        Self::Qoder,
        Self::Windsurf,
        Self::Copilot,
        Self::Opencode,
        Self::Codex,
        Self::Gemini,
        Self::Amp,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Cursor => "cursor",
            Self::Qoder => "qoder",
            Self::Windsurf => "windsurf",
            Self::Copilot => "copilot",
            Self::Opencode => "opencode",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
            Self::Amp => "amp",
        }
    }

    /// Parse a provider name as used in config files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Derived state of one provider at probe time.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderStatus {
    pub configured: bool,
    pub link_count: usize,
}

#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    home: PathBuf,
    overrides: BTreeMap<ProviderKind, PathBuf>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            overrides: BTreeMap::new(),
        }
    }

    /// Replace the default directory for one provider (config override).
    #[must_use]
    pub fn with_override(mut self, kind: ProviderKind, path: PathBuf) -> Self {
        self.overrides.insert(kind, path);
        self
    }

    /// Skills directory for a provider, resolved fresh on every call.
    #[must_use]
    pub fn path(&self, kind: ProviderKind) -> PathBuf {
        self.overrides.get(&kind).cloned().unwrap_or_else(|| {
            self.home.join(format!(".{}", kind.name())).join("skills")
        })
    }

    /// One existence check plus, if configured, one listing. The listing
    /// may race a concurrent delete; that degrades to zero links rather
    /// than escalating.
    #[must_use]
    pub fn probe(&self, kind: ProviderKind) -> ProviderStatus {
        let path = self.path(kind);
        let configured = path.is_dir();
        if !configured {
            return ProviderStatus {
                configured: false,
                link_count: 0,
            };
        }

        let link_count = std::fs::read_dir(&path).map_or(0, |entries| {
            entries
                .filter_map(std::result::Result::ok)
                .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
                .count()
        });

        debug!(target: "provider", provider = kind.name(), link_count, "probed");
        ProviderStatus {
            configured: true,
            link_count,
        }
    }

    /// Create the provider directory. Idempotent: an existing directory
    /// is success.
    pub fn configure(&self, kind: ProviderKind) -> Result<PathBuf> {
        let path = self.path(kind);
        std::fs::create_dir_all(&path)?;
        debug!(target: "provider", provider = kind.name(), path = %path.display(), "configured");
        Ok(path)
    }
}
