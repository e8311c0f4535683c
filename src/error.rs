//! Error types for skm.
//!
//! Only store-level unavailability aborts a whole reconciliation pass.
//! Per-item link failures (conflicts, permission errors) are carried as
//! data inside apply reports, never raised through this enum, so a batch
//! always runs to completion.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkmError>;

#[derive(Debug, Error)]
pub enum SkmError {
    /// The central skill store exists but cannot be read. Fatal to the
    /// whole pass. A missing store is not an error (empty inventory).
    #[error("central skill store unavailable at {path}: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One provider's directory cannot be read. Callers degrade that
    /// provider to unconfigured/zero links and continue with the rest.
    #[error("provider directory unavailable at {path}: {source}")]
    ProviderDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("home directory could not be determined (set SKM_HOME)")]
    MissingHome,

    #[error("config error: {0}")]
    Config(String),

    #[error("lock file error: {0}")]
    Lock(String),

    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
