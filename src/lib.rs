//! skm - unified AI agent skills manager.
//!
//! Skills live once in a central store (`~/.agents/skills`) and are
//! projected into each provider's skills directory as relative symlinks.
//! The reconciliation core computes a pure, inspectable plan from the
//! current link state and a desired selection, then applies it with
//! per-item failure isolation. Foreign entries (anything that does not
//! resolve back into the central store) are never touched.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod groups;
pub mod links;
pub mod provider;
pub mod reconcile;
pub mod store;

pub use error::{Result, SkmError};
