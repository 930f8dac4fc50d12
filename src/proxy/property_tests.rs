//! Property-Based Tests for the Proxy Module
//!
//! Uses proptest to verify the key de-prefixing and rewrite behavior
//! over generated inputs.

use proptest::prelude::*;
use regex::bytes::{NoExpand, Regex};

use super::catalog::strip_prefix_once;

// == Strategies ==
/// Generates request-path-shaped strings.
fn path_strategy() -> impl Strategy<Value = String> {
    "/[a-zA-Z0-9@/._-]{1,40}"
}

/// Generates hostnames without path separators or quotes.
fn host_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9.-]{1,24}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Stripping the prefix from a key built as prefix + path must give
    // back exactly the path, even when the path itself contains the
    // prefix string.
    #[test]
    fn prop_strip_prefix_round_trip(path in path_strategy()) {
        let prefix = "registry-proxy:";
        let key = format!("{prefix}{path}");
        prop_assert_eq!(strip_prefix_once(prefix, key), path);
    }

    #[test]
    fn prop_strip_prefix_only_leading(path in path_strategy()) {
        let prefix = "registry-proxy:";
        // Embed the prefix inside the path; only the leading copy goes.
        let embedded = format!("/{prefix}{path}");
        let key = format!("{prefix}{embedded}");
        prop_assert_eq!(strip_prefix_once(prefix, key), embedded);
    }

    // A document without a tarball field is untouched by the rewrite.
    #[test]
    fn prop_rewrite_passthrough(body in "[a-zA-Z0-9 :,{}\\[\\]._-]{0,200}") {
        let pattern = Regex::new(r#""tarball":"https?://.*?/"#).unwrap();
        let replacement = br#""dist":"http://localhost:8080/"#;
        let rewritten = pattern.replace_all(body.as_bytes(), NoExpand(replacement));
        prop_assert_eq!(rewritten.as_ref(), body.as_bytes());
    }

    // Any well-formed tarball field has its scheme-and-host prefix
    // replaced while the path after the host survives.
    #[test]
    fn prop_rewrite_preserves_tarball_path(host in host_strategy(), rest in "[a-zA-Z0-9/._-]{1,40}") {
        let pattern = Regex::new(r#""tarball":"https?://.*?/"#).unwrap();
        let replacement = br#""dist":"http://localhost:8080/"#;

        let document = format!(r#"{{"tarball":"https://{host}/{rest}"}}"#);
        let rewritten = pattern.replace_all(document.as_bytes(), NoExpand(replacement));
        let rewritten = String::from_utf8(rewritten.into_owned()).unwrap();

        prop_assert!(rewritten.starts_with(r#"{"dist":"http://localhost:8080/"#), "rewritten prefix mismatch");
        prop_assert!(rewritten.ends_with(&format!(r#"{rest}"}}"#)), "rewritten tarball path mismatch");
    }
}
