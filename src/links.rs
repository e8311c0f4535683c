//! Link state reader.
//!
//! Classifies each entry of a provider directory as a managed link
//! (symlink resolving back into the central store under the same name)
//! or foreign content. Classification is a pure function over a
//! directory snapshot; the filesystem read that takes the snapshot is
//! separate, so the reconciler's transition table tests against fake
//! snapshots without touching disk. Foreign entries are never mutated
//! anywhere in this crate.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::trace;

use crate::error::{Result, SkmError};

/// Observable state of one (provider, skill) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// No entry under this name in the provider directory.
    Absent,
    /// Symlink whose target resolves to the store path for this name.
    ManagedLinked,
    /// Present but not ours: regular file, directory, or a symlink
    /// pointing elsewhere. Never touched.
    Foreign,
}

/// What one directory entry is, as captured at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Raw (unresolved) symlink target as stored on disk.
    Symlink { target: PathBuf },
    File,
    Dir,
}

/// One provider-directory entry, decoupled from the live filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub name: String,
    pub kind: EntryKind,
}

/// Classify one snapshot entry against the central store root.
///
/// A relative symlink target is resolved lexically against the provider
/// directory; the entry is managed iff the resolved target equals
/// `<store_root>/<entry name>`. Resolution is lexical on purpose: a
/// dangling managed link (skill since removed from the store) still
/// classifies as managed so it can be cleaned up, while anything
/// pointing elsewhere stays foreign.
#[must_use]
pub fn classify(entry: &EntrySnapshot, provider_dir: &Path, store_root: &Path) -> LinkStatus {
    match &entry.kind {
        EntryKind::Symlink { target } => {
            let resolved = if target.is_absolute() {
                normalize_lexical(target)
            } else {
                normalize_lexical(&provider_dir.join(target))
            };
            if resolved == normalize_lexical(&store_root.join(&entry.name)) {
                LinkStatus::ManagedLinked
            } else {
                LinkStatus::Foreign
            }
        }
        EntryKind::File | EntryKind::Dir => LinkStatus::Foreign,
    }
}

/// Take a snapshot of a provider directory, excluding platform
/// artifacts (dot entries). A missing directory is an empty snapshot
/// (unconfigured provider); any other failure is
/// [`SkmError::ProviderDirUnavailable`] so callers can degrade that one
/// provider and continue.
pub fn read_snapshot(provider_dir: &Path) -> Result<Vec<EntrySnapshot>> {
    let entries = match std::fs::read_dir(provider_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(SkmError::ProviderDirUnavailable {
                path: provider_dir.to_path_buf(),
                source: err,
            });
        }
    };

    let mut snapshot = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| SkmError::ProviderDirUnavailable {
            path: provider_dir.to_path_buf(),
            source: err,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        let meta = std::fs::symlink_metadata(&path).map_err(|err| {
            SkmError::ProviderDirUnavailable {
                path: provider_dir.to_path_buf(),
                source: err,
            }
        })?;
        let kind = if meta.file_type().is_symlink() {
            let target = std::fs::read_link(&path)?;
            EntryKind::Symlink { target }
        } else if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        snapshot.push(EntrySnapshot { name, kind });
    }
    Ok(snapshot)
}

/// Live snapshot of one entry name, for pre-mutation re-verification.
/// `None` means no entry exists under that name.
pub fn probe_entry(provider_dir: &Path, name: &str) -> Result<Option<EntrySnapshot>> {
    let path = provider_dir.join(name);
    let meta = match std::fs::symlink_metadata(&path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let kind = if meta.file_type().is_symlink() {
        let target = std::fs::read_link(&path)?;
        EntryKind::Symlink { target }
    } else if meta.is_dir() {
        EntryKind::Dir
    } else {
        EntryKind::File
    };
    Ok(Some(EntrySnapshot {
        name: name.to_string(),
        kind,
    }))
}

/// Full link state for one provider: every inventory skill mapped to its
/// status, plus any non-inventory entries present in the directory
/// (stale managed links, foreign content).
pub fn read_links(
    provider_dir: &Path,
    store_root: &Path,
    inventory: &BTreeSet<String>,
) -> Result<BTreeMap<String, LinkStatus>> {
    let snapshot = read_snapshot(provider_dir)?;
    let mut state: BTreeMap<String, LinkStatus> = inventory
        .iter()
        .map(|name| (name.clone(), LinkStatus::Absent))
        .collect();

    for entry in &snapshot {
        let status = classify(entry, provider_dir, store_root);
        trace!(target: "links", name = %entry.name, ?status, "classified");
        state.insert(entry.name.clone(), status);
    }
    Ok(state)
}

/// Lexical path normalization: folds `.` and `..` without consulting
/// the filesystem, so classification works on dangling links and fake
/// snapshots alike.
fn normalize_lexical(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
