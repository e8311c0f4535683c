//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod configure;
pub mod list;
pub mod manage;
pub mod status;
pub mod sync;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Status(args) => status::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Manage(args) => manage::run(ctx, args),
        Commands::Sync(args) => sync::run(ctx, args),
        Commands::Configure(args) => configure::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show provider status panel
    Status(status::StatusArgs),

    /// List installed skills, grouped
    List(list::ListArgs),

    /// Link or unlink skills for one provider
    Manage(manage::ManageArgs),

    /// Link the full skill inventory to every enabled provider
    Sync(sync::SyncArgs),

    /// Create a provider's skills directory
    Configure(configure::ConfigureArgs),
}
