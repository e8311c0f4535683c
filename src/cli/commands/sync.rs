//! skm sync - link the full inventory to every enabled provider
//!
//! Unconfigured providers are skipped (use `skm configure` first); an
//! unreadable provider directory degrades that one provider and the
//! rest still run.

use clap::Args;
use serde::Serialize;
use tracing::warn;

use crate::app::AppContext;
use crate::cli::output;
use crate::error::{Result, SkmError};
use crate::provider::ProviderKind;
use crate::reconcile::{ApplyReport, Reconciler, Selection};

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Restrict to these providers (default: all enabled)
    #[arg(long, short)]
    pub provider: Vec<ProviderKind>,
}

#[derive(Serialize)]
struct ProviderSync {
    provider: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ApplyReport>,
}

pub fn run(ctx: &AppContext, args: &SyncArgs) -> Result<()> {
    let inventory = ctx.store.list_skills()?;
    let selection = Selection::link_all(inventory.iter().cloned());

    let targets: Vec<ProviderKind> = if args.provider.is_empty() {
        ctx.config.enabled_providers()
    } else {
        args.provider.clone()
    };

    let mut results = Vec::new();
    for kind in targets {
        if !ctx.registry.probe(kind).configured {
            results.push(ProviderSync {
                provider: kind,
                skipped: Some("not configured".into()),
                report: None,
            });
            continue;
        }

        let reconciler = Reconciler::new(&ctx.store, ctx.registry.path(kind));
        match reconciler.reconcile(&selection) {
            Ok((_, report)) => results.push(ProviderSync {
                provider: kind,
                skipped: None,
                report: Some(report),
            }),
            // One unreadable provider must not stop the others.
            Err(SkmError::ProviderDirUnavailable { path, source }) => {
                warn!(target: "sync", provider = kind.name(), path = %path.display(), %source, "provider degraded");
                results.push(ProviderSync {
                    provider: kind,
                    skipped: Some(format!("directory unavailable: {source}")),
                    report: None,
                });
            }
            Err(err) => return Err(err),
        }
    }

    let failed: usize = results
        .iter()
        .filter_map(|r| r.report.as_ref())
        .map(ApplyReport::failed)
        .sum();

    if ctx.robot {
        let completed: usize = results
            .iter()
            .filter_map(|r| r.report.as_ref())
            .map(ApplyReport::succeeded)
            .sum();
        let response = if failed > 0 {
            output::robot_partial(results, completed, failed)
        } else {
            output::robot_ok(results)
        };
        return output::emit_robot(&response);
    }

    output::heading("Sync");
    println!("Skills in store: {}\n", inventory.len());
    for result in &results {
        match (&result.skipped, &result.report) {
            (Some(reason), _) => {
                output::warning(&format!("{:<10} skipped: {reason}", result.provider));
            }
            (None, Some(report)) => {
                let line = format!(
                    "{:<10} {} linked, {} failed",
                    result.provider,
                    report.changed(),
                    report.failed()
                );
                if report.failed() > 0 {
                    output::failure(&line);
                } else {
                    output::success(&line);
                }
            }
            (None, None) => {}
        }
    }
    Ok(())
}
