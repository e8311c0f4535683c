#![cfg(unix)]

use skm::links;
use skm::provider::ProviderKind;
use skm::reconcile::{Reconciler, Selection};
use skm::SkmError;

use super::common::TestHome;

/// Linking the whole inventory into several providers: each provider
/// ends up with one managed link per skill.
#[test]
fn full_inventory_links_into_every_configured_provider() {
    let home = TestHome::new();
    let store = home.store();
    home.add_skill("auth-jwt");
    home.add_skill("vue-testing");

    let selection = Selection::link_all(store.list_skills().unwrap());
    for kind in [ProviderKind::Claude, ProviderKind::Cursor, ProviderKind::Qoder] {
        home.configure(kind);
        let reconciler = Reconciler::new(&store, home.registry().path(kind));
        let (_, report) = reconciler.reconcile(&selection).unwrap();
        assert_eq!(report.failed(), 0, "provider {kind}");
        assert_eq!(home.registry().probe(kind).link_count, 2);
    }
}

/// An unreadable provider directory surfaces as ProviderDirUnavailable
/// so a multi-provider pass can degrade just that provider.
#[test]
fn unreadable_provider_dir_degrades_not_aborts() {
    use std::os::unix::fs::PermissionsExt;

    let home = TestHome::new();
    let store = home.store();
    home.add_skill("auth-jwt");
    let broken_dir = home.configure(ProviderKind::Claude);
    home.configure(ProviderKind::Cursor);

    std::fs::set_permissions(&broken_dir, std::fs::Permissions::from_mode(0o000)).unwrap();
    if std::fs::read_dir(&broken_dir).is_ok() {
        // Privileged user: permission bits are not enforced, nothing to test.
        std::fs::set_permissions(&broken_dir, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let selection = Selection::link_all(["auth-jwt"]);
    let mut degraded = 0;
    let mut synced = 0;
    for kind in [ProviderKind::Claude, ProviderKind::Cursor] {
        let reconciler = Reconciler::new(&store, home.registry().path(kind));
        match reconciler.reconcile(&selection) {
            Ok((_, report)) => {
                assert_eq!(report.failed(), 0);
                synced += 1;
            }
            Err(SkmError::ProviderDirUnavailable { .. }) => degraded += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    std::fs::set_permissions(&broken_dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(degraded, 1);
    assert_eq!(synced, 1);
}

/// A store that exists but cannot be opened aborts the pass with
/// StoreUnavailable; a missing store is just an empty inventory.
#[test]
fn store_unavailable_is_fatal_missing_store_is_not() {
    use std::os::unix::fs::PermissionsExt;

    let home = TestHome::new();
    let store = home.store();
    assert!(store.list_skills().unwrap().is_empty());

    home.add_skill("auth-jwt");
    std::fs::set_permissions(store.root(), std::fs::Permissions::from_mode(0o000)).unwrap();
    let result = store.list_skills();
    std::fs::set_permissions(store.root(), std::fs::Permissions::from_mode(0o755)).unwrap();
    match result {
        // Privileged user: permission bits are not enforced.
        Ok(skills) => assert_eq!(skills.len(), 1),
        Err(err) => assert!(matches!(err, SkmError::StoreUnavailable { .. })),
    }
}

/// Foreign content in one provider never leaks into another pass: the
/// conflicting name is reported, everything else still links.
#[test]
fn conflict_in_one_provider_does_not_stop_other_skills() {
    let home = TestHome::new();
    let store = home.store();
    home.add_skill("auth-jwt");
    home.add_skill("vue-testing");
    home.add_foreign_file(ProviderKind::Claude, "auth-jwt", b"occupied");

    let provider_dir = home.registry().path(ProviderKind::Claude);
    let reconciler = Reconciler::new(&store, &provider_dir);
    let (_, report) = reconciler
        .reconcile(&Selection::link_all(["auth-jwt", "vue-testing"]))
        .unwrap();

    assert_eq!(report.failed(), 1);
    let state = links::read_links(&provider_dir, store.root(), &store.list_skills().unwrap()).unwrap();
    assert_eq!(state["vue-testing"], skm::links::LinkStatus::ManagedLinked);
    assert_eq!(state["auth-jwt"], skm::links::LinkStatus::Foreign);
}
