//! Common test utilities shared across integration tests.
//!
//! `TestHome` is a synthetic home root: a tempdir holding the central
//! store, the lock file, and provider directories, so every test runs
//! fully isolated from the real filesystem layout.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use skm::provider::{ProviderKind, ProviderRegistry};
use skm::store::SkillStore;

pub struct TestHome {
    dir: tempfile::TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> SkillStore {
        SkillStore::new(self.path())
    }

    pub fn registry(&self) -> ProviderRegistry {
        ProviderRegistry::new(self.path())
    }

    /// Install a skill into the central store (directory + SKILL.md).
    pub fn add_skill(&self, name: &str) -> PathBuf {
        let path = self.store().skill_path(name);
        std::fs::create_dir_all(&path).expect("create skill dir");
        std::fs::write(path.join("SKILL.md"), format!("# {name}\n")).expect("write SKILL.md");
        path
    }

    /// Create a provider's skills directory.
    pub fn configure(&self, kind: ProviderKind) -> PathBuf {
        self.registry().configure(kind).expect("configure provider")
    }

    /// Create a managed relative symlink, as the reconciler would.
    #[cfg(unix)]
    pub fn link(&self, kind: ProviderKind, name: &str) {
        let provider_dir = self.configure(kind);
        let target = format!("../../.agents/skills/{name}");
        std::os::unix::fs::symlink(target, provider_dir.join(name)).expect("create symlink");
    }

    /// Drop a foreign regular file into a provider directory.
    pub fn add_foreign_file(&self, kind: ProviderKind, name: &str, contents: &[u8]) -> PathBuf {
        let provider_dir = self.configure(kind);
        let path = provider_dir.join(name);
        std::fs::write(&path, contents).expect("write foreign file");
        path
    }
}
