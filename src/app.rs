use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, SkmError};
use crate::provider::ProviderRegistry;
use crate::store::{LockLedger, SkillStore};

/// Shared context for all commands: home root resolved once, config
/// loaded once, store/registry/ledger constructed against that root.
/// `SKM_HOME` overrides the real home directory so every command can run
/// against a synthetic root in tests.
pub struct AppContext {
    pub home: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
    pub store: SkillStore,
    pub registry: ProviderRegistry,
    pub lock: LockLedger,
    pub robot: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let home = Self::find_home()?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| default_config_path(&home));
        let config = Config::load(&config_path, &home)?;

        let mut registry = ProviderRegistry::new(&home);
        for (kind, path) in config.provider_overrides(&home) {
            registry = registry.with_override(kind, path);
        }

        Ok(Self {
            store: SkillStore::new(&home),
            lock: LockLedger::new(&home),
            registry,
            home,
            config_path,
            config,
            robot: cli.robot,
            verbosity: cli.verbose,
        })
    }

    fn find_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("SKM_HOME") {
            return Ok(PathBuf::from(home));
        }
        dirs::home_dir().ok_or(SkmError::MissingHome)
    }
}

fn default_config_path(home: &Path) -> PathBuf {
    // Under SKM_HOME everything, config included, lives below the
    // synthetic root; otherwise the platform config dir applies.
    if std::env::var_os("SKM_HOME").is_some() {
        home.join(".config/skm/config.json")
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| home.join(".config"))
            .join("skm/config.json")
    }
}
