//! skm configure - create a provider's skills directory

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;
use crate::provider::ProviderKind;

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Provider to configure
    pub provider: ProviderKind,
}

#[derive(Serialize)]
struct ConfigureData {
    provider: ProviderKind,
    path: String,
}

pub fn run(ctx: &AppContext, args: &ConfigureArgs) -> Result<()> {
    let path = ctx.registry.configure(args.provider)?;

    let data = ConfigureData {
        provider: args.provider,
        path: path.display().to_string(),
    };

    if ctx.robot {
        return output::emit_robot(&output::robot_ok(data));
    }
    output::success(&format!("{} configured at {}", data.provider, data.path));
    Ok(())
}
