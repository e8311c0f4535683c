//! Lock ledger: installation provenance per skill name.
//!
//! Persisted as one JSON document at `<home>/.agents/.skill-lock.json`,
//! shape `{version, skills: {name: entry}}`. Entries are created on
//! install and updated on re-install; they are never deleted here.
//! Unknown fields round-trip through flattened maps so a rewrite cannot
//! drop data written by newer tooling. Writes overwrite the whole file;
//! concurrent writers are unsupported (single local CLI process).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SkmError};

/// Current lock document schema version.
pub const LOCK_VERSION: u32 = 3;

const LOCK_FILE: &str = ".agents/.skill-lock.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LockEntry {
    pub source: String,
    #[serde(rename = "sourceType")]
    pub source_type: String,
    #[serde(rename = "sourceUrl")]
    pub source_url: String,
    #[serde(rename = "skillPath", skip_serializing_if = "Option::is_none")]
    pub skill_path: Option<String>,
    /// Carried verbatim for the installer; never computed or verified
    /// by the reconciliation core.
    #[serde(rename = "skillFolderHash", skip_serializing_if = "Option::is_none")]
    pub skill_folder_hash: Option<String>,
    #[serde(rename = "installedAt")]
    pub installed_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LockDocument {
    pub version: u32,
    #[serde(default)]
    pub skills: BTreeMap<String, LockEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for LockDocument {
    fn default() -> Self {
        Self {
            version: LOCK_VERSION,
            skills: BTreeMap::new(),
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LockLedger {
    path: PathBuf,
}

impl LockLedger {
    #[must_use]
    pub fn new(home: &Path) -> Self {
        Self {
            path: home.join(LOCK_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the lock document. A missing file is an empty version-stamped
    /// document, never an error.
    pub fn load(&self) -> Result<LockDocument> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LockDocument::default());
            }
            Err(err) => {
                return Err(SkmError::Lock(format!(
                    "read {}: {err}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&raw)
            .map_err(|err| SkmError::Lock(format!("parse {}: {err}", self.path.display())))
    }

    /// Write the full document, creating the parent directory if needed.
    pub fn persist(&self, document: &LockDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.path, raw)?;
        debug!(target: "lock", path = %self.path.display(), entries = document.skills.len(), "lock persisted");
        Ok(())
    }

    /// Upsert one entry. A re-install keeps the original `installedAt`
    /// and bumps `updatedAt`; a first install sets both equal.
    pub fn record(&self, skill_name: &str, source: &str) -> Result<()> {
        let mut document = self.load()?;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let entry = match document.skills.remove(skill_name) {
            Some(existing) => LockEntry {
                source: source.to_string(),
                source_url: github_url(source),
                updated_at: now,
                ..existing
            },
            None => LockEntry {
                source: source.to_string(),
                source_type: "github".to_string(),
                source_url: github_url(source),
                skill_path: None,
                skill_folder_hash: None,
                installed_at: now.clone(),
                updated_at: now,
                extra: serde_json::Map::new(),
            },
        };
        document.skills.insert(skill_name.to_string(), entry);
        self.persist(&document)
    }
}

fn github_url(source: &str) -> String {
    format!("https://github.com/{source}.git")
}
