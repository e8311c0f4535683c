use skm::store::{LockDocument, LockLedger};

#[test]
fn persist_of_loaded_document_is_byte_stable() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = LockLedger::new(dir.path());
    ledger.record("react-best-practices", "vercel/skills").unwrap();
    ledger.record("auth-jwt", "better-auth/skills").unwrap();

    let before = std::fs::read(ledger.path()).unwrap();
    let loaded = ledger.load().unwrap();
    ledger.persist(&loaded).unwrap();
    let after = std::fs::read(ledger.path()).unwrap();

    assert_eq!(before, after);
}

#[test]
fn record_sets_github_provenance() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = LockLedger::new(dir.path());
    ledger.record("vue-testing", "vuejs/skills").unwrap();

    let doc = ledger.load().unwrap();
    let entry = &doc.skills["vue-testing"];
    assert_eq!(entry.source, "vuejs/skills");
    assert_eq!(entry.source_type, "github");
    assert_eq!(entry.source_url, "https://github.com/vuejs/skills.git");
    assert_eq!(entry.installed_at, entry.updated_at);
}

#[test]
fn entries_are_never_removed_by_record() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = LockLedger::new(dir.path());
    ledger.record("auth-jwt", "better-auth/skills").unwrap();
    ledger.record("vue-testing", "vuejs/skills").unwrap();

    let doc = ledger.load().unwrap();
    assert_eq!(doc.skills.len(), 2);
}

#[test]
fn default_document_is_version_stamped() {
    let doc = LockDocument::default();
    assert_eq!(doc.version, 3);
    assert!(doc.skills.is_empty());
}

#[test]
fn version_field_survives_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = LockLedger::new(dir.path());
    std::fs::create_dir_all(ledger.path().parent().unwrap()).unwrap();
    std::fs::write(ledger.path(), br#"{"version": 4, "skills": {}}"#).unwrap();

    ledger.record("auth-jwt", "better-auth/skills").unwrap();
    assert_eq!(ledger.load().unwrap().version, 4);
}
