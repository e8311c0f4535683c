//! skm manage - link or unlink skills for one provider
//!
//! Non-interactive projection of the management view: the selection
//! starts from the current managed-link state, then `--all`/`--none`
//! and per-skill `--link`/`--unlink` overrides are layered on top.
//! `--dry-run` prints the plan without mutating anything.

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output;
use crate::error::{Result, SkmError};
use crate::links::LinkStatus;
use crate::provider::ProviderKind;
use crate::reconcile::{ApplyOutcome, ApplyReport, PlanAction, PlanItem, Reconciler, Selection};

#[derive(Args, Debug)]
pub struct ManageArgs {
    /// Target provider
    pub provider: ProviderKind,

    /// Skills to link
    #[arg(long)]
    pub link: Vec<String>,

    /// Skills to unlink
    #[arg(long)]
    pub unlink: Vec<String>,

    /// Select every skill in the store
    #[arg(long, conflicts_with = "none")]
    pub all: bool,

    /// Deselect every skill in the store
    #[arg(long)]
    pub none: bool,

    /// Compute and print the plan without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct ManageData {
    provider: ProviderKind,
    dry_run: bool,
    plan: Vec<PlanItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ApplyReport>,
}

pub fn run(ctx: &AppContext, args: &ManageArgs) -> Result<()> {
    let inventory = ctx.store.list_skills()?;
    for name in args.link.iter().chain(&args.unlink) {
        if !inventory.contains(name) {
            return Err(SkmError::UnknownSkill(name.clone()));
        }
    }

    let provider_dir = ctx.registry.path(args.provider);
    let reconciler = Reconciler::new(&ctx.store, &provider_dir);
    let state = reconciler.read_state()?;

    // Baseline: keep what is currently managed-linked.
    let mut selection = if args.all {
        Selection::link_all(inventory.iter().cloned())
    } else if args.none {
        Selection::unlink_all(inventory.iter().cloned())
    } else {
        let mut selection = Selection::new();
        for (name, status) in &state {
            if inventory.contains(name) {
                selection.set(name.clone(), *status == LinkStatus::ManagedLinked);
            }
        }
        selection
    };
    for name in &args.link {
        selection.set(name.clone(), true);
    }
    for name in &args.unlink {
        selection.set(name.clone(), false);
    }

    let plan = crate::reconcile::plan(&state, &selection);
    let report = if args.dry_run {
        None
    } else {
        Some(reconciler.apply(&plan))
    };

    let data = ManageData {
        provider: args.provider,
        dry_run: args.dry_run,
        plan,
        report,
    };

    if ctx.robot {
        let (completed, failed) = data
            .report
            .as_ref()
            .map_or((0, 0), |r| (r.succeeded(), r.failed()));
        return if failed > 0 {
            output::emit_robot(&output::robot_partial(data, completed, failed))
        } else {
            output::emit_robot(&output::robot_ok(data))
        };
    }

    render_human(&data);
    Ok(())
}

fn render_human(data: &ManageData) {
    output::heading(&format!("Manage Provider: {}", data.provider));

    match &data.report {
        None => {
            println!("{}", output::dimmed("dry run, no changes made"));
            for item in &data.plan {
                let verb = match item.action {
                    PlanAction::CreateLink => "add",
                    PlanAction::RemoveLink => "remove",
                    PlanAction::SkipConflict => "conflict",
                    PlanAction::NoOp => continue,
                };
                println!("  {verb:<8} {}", item.skill);
            }
        }
        Some(report) => {
            for item in &report.items {
                match (&item.action, &item.outcome) {
                    (PlanAction::NoOp, _) => {}
                    (PlanAction::CreateLink, ApplyOutcome::Succeeded) => {
                        output::success(&format!("linked   {}", item.skill));
                    }
                    (PlanAction::RemoveLink, ApplyOutcome::Succeeded) => {
                        output::success(&format!("unlinked {}", item.skill));
                    }
                    (_, ApplyOutcome::Failed(reason)) => {
                        output::failure(&format!("{}: {reason}", item.skill));
                    }
                    (_, ApplyOutcome::Succeeded) => {}
                }
            }
            println!(
                "\n{} changed, {} failed",
                report.changed(),
                report.failed()
            );
        }
    }
}
