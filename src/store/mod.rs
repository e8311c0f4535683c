//! Central skill store.
//!
//! One directory (`<home>/.agents/skills`) owns every installed skill:
//! each subdirectory is one skill, identified by its directory name.
//! Providers only ever hold symlinks back into this tree. Every listing
//! is a fresh snapshot; nothing is cached across reconciliation passes.

pub mod lock;

pub use lock::{LockDocument, LockEntry, LockLedger};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SkmError};

/// Relative location of the central store under the home root.
const STORE_SUBDIR: &str = ".agents/skills";

#[derive(Debug, Clone)]
pub struct SkillStore {
    root: PathBuf,
}

impl SkillStore {
    #[must_use]
    pub fn new(home: &Path) -> Self {
        Self {
            root: home.join(STORE_SUBDIR),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical store path for a skill name, whether or not it exists.
    #[must_use]
    pub fn skill_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Enumerate installed skill names, non-recursively.
    ///
    /// Only directories count; hidden/platform artifacts (dot entries
    /// such as `.DS_Store`) are skipped. A missing store directory is a
    /// fresh install and yields an empty set; any other read failure is
    /// [`SkmError::StoreUnavailable`] and aborts the pass.
    pub fn list_skills(&self) -> Result<BTreeSet<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(target: "store", path = %self.root.display(), "store absent, empty inventory");
                return Ok(BTreeSet::new());
            }
            Err(err) => {
                return Err(SkmError::StoreUnavailable {
                    path: self.root.clone(),
                    source: err,
                });
            }
        };

        let mut skills = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|err| SkmError::StoreUnavailable {
                path: self.root.clone(),
                source: err,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            if entry.file_type().is_ok_and(|ft| ft.is_dir()) {
                skills.insert(name);
            }
        }

        debug!(target: "store", count = skills.len(), "inventory scanned");
        Ok(skills)
    }

    /// A skill counts as installed when its documentation file exists.
    /// Content is never inspected here.
    #[must_use]
    pub fn is_installed(&self, name: &str) -> bool {
        self.skill_path(name).join("SKILL.md").exists()
    }
}
