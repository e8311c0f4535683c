//! skm list - list installed skills, grouped

use std::collections::BTreeMap;

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;
use crate::groups;
use crate::links::LinkStatus;
use crate::provider::ProviderKind;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show link state for this provider next to each skill
    #[arg(long, short)]
    pub provider: Option<ProviderKind>,
}

#[derive(Serialize)]
struct ListData {
    total: usize,
    groups: BTreeMap<String, Vec<SkillRow>>,
}

#[derive(Serialize)]
struct SkillRow {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<LinkStatus>,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let inventory = ctx.store.list_skills()?;

    // Optional per-provider link state overlay.
    let state = match args.provider {
        Some(kind) => Some(crate::links::read_links(
            &ctx.registry.path(kind),
            ctx.store.root(),
            &inventory,
        )?),
        None => None,
    };

    let grouped = groups::group_members(inventory.iter().cloned());
    let data = ListData {
        total: inventory.len(),
        groups: grouped
            .into_iter()
            .map(|(group, names)| {
                let rows = names
                    .into_iter()
                    .map(|name| {
                        let status = state.as_ref().and_then(|s| s.get(&name).copied());
                        SkillRow { name, status }
                    })
                    .collect();
                (group.to_string(), rows)
            })
            .collect(),
    };

    if ctx.robot {
        return output::emit_robot(&output::robot_ok(data));
    }

    output::heading("Installed Skills");
    println!("Central store: {}", ctx.store.root().display());
    println!("Total skills: {}\n", data.total);
    for (group, rows) in &data.groups {
        println!("{group}");
        for row in rows {
            let marker = match row.status {
                Some(LinkStatus::ManagedLinked) => " [linked]",
                Some(LinkStatus::Foreign) => " [foreign]",
                _ => "",
            };
            println!("  • {}{}", row.name, output::dimmed(marker));
        }
    }
    Ok(())
}
