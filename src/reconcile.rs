//! Link reconciliation engine.
//!
//! `plan` is pure: given the current link state and a desired selection
//! it produces an ordered, inspectable action list (dry-run friendly).
//! `apply` executes a plan item by item, re-verifying the live entry
//! immediately before each mutation so a stale plan can never delete or
//! overwrite foreign content. One item failing never aborts the rest;
//! every planned item gets an outcome in the report.
//!
//! Known limitations, accepted by design: a narrow window remains
//! between re-verification and mutation, and concurrent skm processes
//! are not coordinated (no file locking).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::groups::group_of;
use crate::links::{self, LinkStatus};
use crate::store::SkillStore;

/// Desired link state per skill for one provider. Ephemeral input,
/// produced by the presentation layer and consumed by one plan/apply.
/// Skills with no entry are left as they are.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    desired: BTreeMap<String, bool>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Want every given skill linked.
    pub fn link_all<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            desired: names.into_iter().map(|n| (n.into(), true)).collect(),
        }
    }

    /// Want every given skill unlinked.
    pub fn unlink_all<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            desired: names.into_iter().map(|n| (n.into(), false)).collect(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, linked: bool) {
        self.desired.insert(name.into(), linked);
    }

    #[must_use]
    pub fn desired(&self, name: &str) -> Option<bool> {
        self.desired.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.desired.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    CreateLink,
    RemoveLink,
    /// A foreign entry occupies the desired name; nothing will be done.
    SkipConflict,
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanItem {
    pub skill: String,
    pub action: PlanAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum ApplyOutcome {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyResult {
    pub skill: String,
    pub action: PlanAction,
    pub outcome: ApplyOutcome,
}

/// Per-item outcomes for one apply pass, in plan order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub items: Vec<ApplyResult>,
}

impl ApplyReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.outcome == ApplyOutcome::Succeeded)
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    /// Links created or removed, as opposed to no-ops.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.items
            .iter()
            .filter(|i| {
                i.outcome == ApplyOutcome::Succeeded
                    && matches!(i.action, PlanAction::CreateLink | PlanAction::RemoveLink)
            })
            .count()
    }
}

/// Compute the ordered diff between current state and selection.
///
/// Pure: no I/O, deterministic. Items are ordered by group then name so
/// apply/log output is reproducible for the same input. The transition
/// table:
///
/// | current       | desired  | action       |
/// |---------------|----------|--------------|
/// | Absent        | linked   | CreateLink   |
/// | Absent        | unlinked | NoOp         |
/// | ManagedLinked | linked   | NoOp         |
/// | ManagedLinked | unlinked | RemoveLink   |
/// | Foreign       | linked   | SkipConflict |
/// | Foreign       | unlinked | NoOp         |
#[must_use]
pub fn plan(current: &BTreeMap<String, LinkStatus>, selection: &Selection) -> Vec<PlanItem> {
    let mut names: Vec<&str> = current
        .keys()
        .map(String::as_str)
        .chain(selection.names())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    names.sort_by_cached_key(|name| (group_of(name), (*name).to_string()));

    names
        .into_iter()
        .map(|name| {
            let status = current.get(name).copied().unwrap_or(LinkStatus::Absent);
            let action = match (status, selection.desired(name)) {
                (LinkStatus::Absent, Some(true)) => PlanAction::CreateLink,
                (LinkStatus::ManagedLinked, Some(false)) => PlanAction::RemoveLink,
                (LinkStatus::Foreign, Some(true)) => PlanAction::SkipConflict,
                _ => PlanAction::NoOp,
            };
            PlanItem {
                skill: name.to_string(),
                action,
            }
        })
        .collect()
}

/// Reconciler for one provider directory against the central store.
#[derive(Debug)]
pub struct Reconciler<'a> {
    store: &'a SkillStore,
    provider_dir: PathBuf,
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub fn new(store: &'a SkillStore, provider_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            provider_dir: provider_dir.into(),
        }
    }

    /// Fresh link state for this provider: inventory scan plus directory
    /// snapshot, never cached.
    pub fn read_state(&self) -> Result<BTreeMap<String, LinkStatus>> {
        let inventory = self.store.list_skills()?;
        links::read_links(&self.provider_dir, self.store.root(), &inventory)
    }

    /// Read, plan, apply in one pass. Returns the plan alongside the
    /// per-item report so callers can render both.
    pub fn reconcile(&self, selection: &Selection) -> Result<(Vec<PlanItem>, ApplyReport)> {
        let state = self.read_state()?;
        let plan = plan(&state, selection);
        let report = self.apply(&plan);
        Ok((plan, report))
    }

    /// Execute a plan. Items run independently and in plan order; a
    /// failure is recorded and the remaining items still run. Each
    /// mutation re-classifies the live entry first, so a plan computed
    /// earlier cannot touch an entry that has become foreign since.
    pub fn apply(&self, plan: &[PlanItem]) -> ApplyReport {
        // The provider dir may not exist yet when the plan only creates
        // links; failure here surfaces per item below.
        if plan.iter().any(|i| i.action == PlanAction::CreateLink) {
            let _ = std::fs::create_dir_all(&self.provider_dir);
        }

        let mut report = ApplyReport::default();
        for item in plan {
            let outcome = match item.action {
                PlanAction::NoOp => ApplyOutcome::Succeeded,
                PlanAction::SkipConflict => {
                    warn!(target: "reconcile", skill = %item.skill, "foreign entry blocks link");
                    ApplyOutcome::Failed("foreign entry under this name; left untouched".into())
                }
                PlanAction::CreateLink => self.create_link(&item.skill),
                PlanAction::RemoveLink => self.remove_link(&item.skill),
            };
            debug!(target: "reconcile", skill = %item.skill, action = ?item.action, ?outcome, "applied");
            report.items.push(ApplyResult {
                skill: item.skill.clone(),
                action: item.action,
                outcome,
            });
        }
        report
    }

    fn create_link(&self, skill: &str) -> ApplyOutcome {
        let link_path = self.provider_dir.join(skill);

        // Re-verify against the live entry, not the stale plan.
        match links::probe_entry(&self.provider_dir, skill) {
            Ok(None) => {}
            Ok(Some(entry)) => {
                match links::classify(&entry, &self.provider_dir, self.store.root()) {
                    LinkStatus::Foreign => {
                        return ApplyOutcome::Failed(
                            "foreign entry appeared under this name; left untouched".into(),
                        );
                    }
                    // Stale or already-correct managed link: re-create.
                    LinkStatus::ManagedLinked => {
                        if let Err(err) = std::fs::remove_file(&link_path) {
                            return ApplyOutcome::Failed(format!("remove stale link: {err}"));
                        }
                    }
                    LinkStatus::Absent => {}
                }
            }
            Err(err) => return ApplyOutcome::Failed(format!("probe entry: {err}")),
        }

        // Relative target keeps the provider tree portable when the home
        // directory is relocated as a whole.
        let target = relative_path(&self.provider_dir, &self.store.skill_path(skill));
        match create_symlink(&target, &link_path) {
            Ok(()) => ApplyOutcome::Succeeded,
            Err(err) => ApplyOutcome::Failed(format!("create symlink: {err}")),
        }
    }

    fn remove_link(&self, skill: &str) -> ApplyOutcome {
        let link_path = self.provider_dir.join(skill);

        match links::probe_entry(&self.provider_dir, skill) {
            // Already gone: idempotent success.
            Ok(None) => ApplyOutcome::Succeeded,
            Ok(Some(entry)) => {
                match links::classify(&entry, &self.provider_dir, self.store.root()) {
                    LinkStatus::Foreign => ApplyOutcome::Failed(
                        "entry became foreign since planning; refusing to remove".into(),
                    ),
                    LinkStatus::ManagedLinked | LinkStatus::Absent => {
                        match std::fs::remove_file(&link_path) {
                            Ok(()) => ApplyOutcome::Succeeded,
                            Err(err) => ApplyOutcome::Failed(format!("remove symlink: {err}")),
                        }
                    }
                }
            }
            Err(err) => ApplyOutcome::Failed(format!("probe entry: {err}")),
        }
    }
}

/// Lexical relative path from `from` (a directory) to `to`.
fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for component in &to[common..] {
        rel.push(component.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    // Skill entries are directories.
    std::os::windows::fs::symlink_dir(target, link)
}
