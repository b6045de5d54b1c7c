//! Parameterised tests for logical paths and fingerprints.
//!
//! Each `#[case]` is isolated: no shared state.

use ferry_core::{Fingerprint, HashAlgorithm, LogicalPath};
use rstest::rstest;

#[rstest]
#[case("remote://etc/motd", true, Some("etc/motd"))]
#[case("remote:///etc/motd", true, Some("etc/motd"))]
#[case("remote://", true, Some(""))]
#[case("/etc/motd", false, None)]
#[case("relative/file", false, None)]
fn logical_path_namespace(
    #[case] raw: &str,
    #[case] remote: bool,
    #[case] relative: Option<&str>,
) {
    let path = LogicalPath::from(raw);
    assert_eq!(path.is_remote(), remote);
    assert_eq!(path.remote_relative(), relative);
    assert_eq!(path.to_string(), raw);
}

#[rstest]
#[case(HashAlgorithm::Sha256, 32)]
#[case(HashAlgorithm::Sha512, 64)]
fn fingerprint_text_form(#[case] algorithm: HashAlgorithm, #[case] len: usize) {
    let fp = Fingerprint::new(algorithm, vec![0xab; len]).expect("fingerprint");
    let text = fp.to_string();
    assert_eq!(text, format!("{}:{}", algorithm.tag(), "ab".repeat(len)));
    assert_eq!(text.parse::<Fingerprint>().expect("parse"), fp);
}

#[rstest]
#[case("SHA256", HashAlgorithm::Sha256)]
#[case("sha512", HashAlgorithm::Sha512)]
fn hash_algorithm_parses_case_insensitively(#[case] raw: &str, #[case] expected: HashAlgorithm) {
    assert_eq!(raw.parse::<HashAlgorithm>().expect("parse"), expected);
}
