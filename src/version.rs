//! Signing-tool version detection.
//!
//! `openssl version` prints something like `OpenSSL 1.0.1g 7 Apr 2014`.
//! The version is the single dotted triple in that string; output with no
//! triple, or more than one, is treated as unsupported.

use std::sync::LazyLock;

use regex::Regex;
use semver::{Version, VersionReq};

use crate::constants::MIN_OPENSSL_VERSION;

static DOTTED_TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").unwrap());

static MIN_VERSION: LazyLock<VersionReq> =
    LazyLock::new(|| VersionReq::parse(&format!(">={MIN_OPENSSL_VERSION}")).unwrap());

/// Extract the tool version from `version` output.
///
/// Returns `None` unless exactly one dotted triple is present.
pub fn parse_tool_version(output: &str) -> Option<Version> {
    let mut matches = DOTTED_TRIPLE.find_iter(output);
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Version::parse(first.as_str()).ok()
}

/// Returns `true` if `output` names a tool version `>= 1.0.1`.
pub fn is_tool_version_supported(output: &str) -> bool {
    parse_tool_version(output).is_some_and(|version| MIN_VERSION.matches(&version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_old_versions() {
        for s in [
            "OpenSSL 0.9.8g 7 Apr 2009",
            "OpenSSL 0.9.7b 7 Apr 2004",
            "OpenSSL 0.9.9b 7 Apr 2005",
            "OpenSSL 1.0.0b 7 Apr 2013",
            "some unpredictable format 0.9.7b 21/04/2004",
            "0.9.9b 21/04/2004",
            "1.0.0b 21/04/2004",
        ] {
            assert!(!is_tool_version_supported(s), "{s} should be unsupported");
        }
    }

    #[test]
    fn accepts_supported_versions() {
        for s in [
            "OpenSSL 1.0.1g 7 Apr 2014",
            "OpenSSL 1.0.8g 8 Apr 2014",
            "OpenSSL 1.0.9g 10 Apr 2014",
            "OpenSSL 2.0.1g 7 Apr 2014",
            "some unpredictable format 2.0.1b 21/04/2016",
            "1.0.1g 21/04/2014",
            "1.0.7g 21/04/2018",
            "OpenSSL 3.0.2 15 Mar 2022",
        ] {
            assert!(is_tool_version_supported(s), "{s} should be supported");
        }
    }

    #[test]
    fn rejects_output_without_a_version() {
        assert!(!is_tool_version_supported(""));
        assert!(!is_tool_version_supported("command not found"));
        assert!(!is_tool_version_supported("LibreSSL 2.8"));
    }

    #[test]
    fn rejects_output_with_several_versions() {
        assert!(!is_tool_version_supported(
            "OpenSSL 3.0.2 15 Mar 2022 (Library: OpenSSL 3.0.2 15 Mar 2022)"
        ));
        assert!(!is_tool_version_supported("1.0.1 or 2.0.0"));
    }

    #[test]
    fn parse_extracts_the_triple() {
        assert_eq!(
            parse_tool_version("OpenSSL 1.0.1g 7 Apr 2014"),
            Some(Version::new(1, 0, 1))
        );
        assert_eq!(parse_tool_version("no version here"), None);
    }
}
