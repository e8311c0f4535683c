//! skm status - provider status panel

use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;
use crate::provider::ProviderKind;

#[derive(Args, Debug)]
pub struct StatusArgs {}

#[derive(Serialize)]
struct ProviderRow {
    provider: ProviderKind,
    enabled: bool,
    configured: bool,
    link_count: usize,
}

#[derive(Serialize)]
struct StatusData {
    total_skills: usize,
    providers: Vec<ProviderRow>,
}

pub fn run(ctx: &AppContext, _args: &StatusArgs) -> Result<()> {
    let total_skills = ctx.store.list_skills()?.len();
    let enabled = ctx.config.enabled_providers();

    let providers: Vec<ProviderRow> = ProviderKind::ALL
        .into_iter()
        .map(|kind| {
            let status = ctx.registry.probe(kind);
            ProviderRow {
                provider: kind,
                enabled: enabled.contains(&kind),
                configured: status.configured,
                link_count: status.link_count,
            }
        })
        .collect();

    debug!(target: "status", total_skills, "probed all providers");

    let data = StatusData {
        total_skills,
        providers,
    };

    if ctx.robot {
        return output::emit_robot(&output::robot_ok(data));
    }

    output::heading("Provider Status");
    println!("Central store: {}", ctx.store.root().display());
    println!("Total skills: {}\n", data.total_skills);
    for row in &data.providers {
        let line = format!(
            "{:<10} {:>3} linked{}",
            row.provider,
            row.link_count,
            if row.enabled { "" } else { "  (disabled)" },
        );
        if row.configured {
            output::success(&line);
        } else {
            output::warning(&format!("{line}  (not configured)"));
        }
    }
    Ok(())
}
