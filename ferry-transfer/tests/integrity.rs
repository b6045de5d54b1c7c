mod common;

use std::fs;

use common::MockConnector;
use ferry_core::{Environment, HashAlgorithm, LogicalPath};
use ferry_transfer::{ContentDigest, IntegrityCheck, StoreSession};
use rstest::rstest;
use tempfile::TempDir;

fn fp(bytes: &[u8]) -> ferry_core::Fingerprint {
    ContentDigest::default().digest_bytes(bytes)
}

#[rstest]
#[case(b"same".as_slice(), b"same".as_slice(), true)]
#[case(b"local".as_slice(), b"remote".as_slice(), false)]
fn matches_iff_fingerprints_equal(#[case] local: &[u8], #[case] remote: &[u8], #[case] expected: bool) {
    let tmp = TempDir::new().expect("tmp");
    let file = tmp.path().join("f");
    fs::write(&file, local).expect("write");
    let connector = MockConnector::default().with_file("remote://f", fp(remote), remote);
    let mut session = StoreSession::new(connector.clone(), HashAlgorithm::Sha256);

    let matched = IntegrityCheck::new(&mut session)
        .verify_match(&LogicalPath::new("remote://f"), &file, &Environment::default())
        .expect("verify");

    assert_eq!(matched, expected);
    assert_eq!(connector.fetch_count(), 0, "a check never transfers");
}

#[test]
fn missing_local_file_fails_closed_without_asking_the_store() {
    let tmp = TempDir::new().expect("tmp");
    let connector = MockConnector::default().with_file("remote://f", fp(b"x"), b"x");
    let mut session = StoreSession::new(connector.clone(), HashAlgorithm::Sha256);

    let matched = IntegrityCheck::new(&mut session)
        .verify_match(
            &LogicalPath::new("remote://f"),
            &tmp.path().join("missing"),
            &Environment::default(),
        )
        .expect("verify");

    assert!(!matched);
    assert!(connector.resolves().is_empty());
}

#[test]
fn absent_remote_never_matches() {
    let tmp = TempDir::new().expect("tmp");
    let file = tmp.path().join("f");
    fs::write(&file, b"x").expect("write");
    let mut session = StoreSession::new(MockConnector::default(), HashAlgorithm::Sha256);

    let matched = IntegrityCheck::new(&mut session)
        .verify_match(&LogicalPath::new("remote://f"), &file, &Environment::default())
        .expect("verify");

    assert!(!matched);
}

#[test]
fn local_against_local_compares_contents() {
    let tmp = TempDir::new().expect("tmp");
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    fs::write(&a, b"same").expect("write");
    fs::write(&b, b"same").expect("write");
    let connector = MockConnector::default();
    let mut session = StoreSession::new(connector.clone(), HashAlgorithm::Sha256);

    let matched = IntegrityCheck::new(&mut session)
        .verify_match(
            &LogicalPath::new(a.to_string_lossy()),
            &b,
            &Environment::default(),
        )
        .expect("verify");

    assert!(matched);
    assert_eq!(connector.connects(), 0);
}
