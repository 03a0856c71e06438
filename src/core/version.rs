//! Version tokens recorded in the compatibility matrix.
//!
//! A token is either a released version number (`"6.5"`, `"49"`) or an
//! environment-specific unreleased label (`"tp"` for Safari Technology
//! Preview). Unreleased labels always compare newer than any number.

use std::cmp::Ordering;
use std::fmt;

use semver::Version;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minimum version of an environment that implements a feature.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionToken {
    /// A released version, e.g. `10.1`.
    Number(f64),
    /// An unreleased build label, e.g. `tp`.
    Unreleased(String),
}

impl VersionToken {
    /// Parse a persisted token. Anything that is not a plain number is
    /// treated as an unreleased label.
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => VersionToken::Number(n),
            _ => VersionToken::Unreleased(s.to_string()),
        }
    }

    /// Get the numeric value, if this is a released version.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            VersionToken::Number(n) => Some(*n),
            VersionToken::Unreleased(_) => None,
        }
    }

    /// Check if this is an unreleased label.
    pub fn is_unreleased(&self) -> bool {
        matches!(self, VersionToken::Unreleased(_))
    }

    /// Whether a target minimum of `target` predates this version.
    pub fn is_newer_than(&self, target: f64) -> bool {
        match self {
            VersionToken::Number(n) => target < *n,
            VersionToken::Unreleased(_) => true,
        }
    }
}

impl PartialOrd for VersionToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (VersionToken::Number(a), VersionToken::Number(b)) => a.partial_cmp(b),
            (VersionToken::Number(_), VersionToken::Unreleased(_)) => Some(Ordering::Less),
            (VersionToken::Unreleased(_), VersionToken::Number(_)) => Some(Ordering::Greater),
            (VersionToken::Unreleased(_), VersionToken::Unreleased(_)) => Some(Ordering::Equal),
        }
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionToken::Number(n) => write!(f, "{}", format_number(*n)),
            VersionToken::Unreleased(label) => write!(f, "{}", label),
        }
    }
}

impl Serialize for VersionToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => VersionToken::Number(n),
            Raw::Text(s) => VersionToken::parse(&s),
        })
    }
}

/// Render a number the way the persisted artifacts spell it: `1` not `1.0`.
pub fn format_number(n: f64) -> String {
    format!("{}", n)
}

/// Parse the leading decimal number of a string, ignoring trailing text.
///
/// `"10_1"` yields `10`, `"5harmony"` yields `5`, `"tp"` yields nothing.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    s[..end].parse().ok()
}

/// Parse a version string, allowing for incomplete versions.
pub fn parse_version_lenient(s: &str) -> Option<Version> {
    let s = s.trim().trim_start_matches('v');

    if let Ok(v) = s.parse() {
        return Some(v);
    }

    let parts: Vec<&str> = s.split('.').collect();
    match parts.len() {
        1 => {
            let major: u64 = parts[0].parse().ok()?;
            Some(Version::new(major, 0, 0))
        }
        2 => {
            let major: u64 = parts[0].parse().ok()?;
            let minor: u64 = parts[1].parse().ok()?;
            Some(Version::new(major, minor, 0))
        }
        _ => None,
    }
}

/// Reduce a full runtime version (`v8.9.1-pre`) to its `major.minor` number.
pub fn desemverify(version: &str) -> Option<f64> {
    let cleaned = version.trim().trim_start_matches('v');
    let core = cleaned
        .split(|c| c == '-' || c == '+')
        .next()
        .unwrap_or(cleaned);
    let parsed = parse_version_lenient(core)?;
    format!("{}.{}", parsed.major, parsed.minor).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        assert_eq!(VersionToken::parse("6.5"), VersionToken::Number(6.5));
        assert_eq!(VersionToken::parse("49"), VersionToken::Number(49.0));
        assert_eq!(
            VersionToken::parse("tp"),
            VersionToken::Unreleased("tp".to_string())
        );
    }

    #[test]
    fn test_unreleased_is_newest() {
        let tp = VersionToken::Unreleased("tp".to_string());
        assert!(tp > VersionToken::Number(1000.0));
        assert!(VersionToken::Number(10.0) < VersionToken::Number(10.1));
        assert!(tp.is_newer_than(9999.0));
    }

    #[test]
    fn test_display_matches_artifacts() {
        assert_eq!(VersionToken::Number(1.0).to_string(), "1");
        assert_eq!(VersionToken::Number(0.12).to_string(), "0.12");
        assert_eq!(VersionToken::Number(10.1).to_string(), "10.1");
        assert_eq!(VersionToken::Unreleased("tp".into()).to_string(), "tp");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&VersionToken::Number(6.5)).unwrap();
        assert_eq!(json, "\"6.5\"");

        let back: VersionToken = serde_json::from_str("\"tp\"").unwrap();
        assert!(back.is_unreleased());

        let number: VersionToken = serde_json::from_str("52").unwrap();
        assert_eq!(number, VersionToken::Number(52.0));
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("10_1"), Some(10.0));
        assert_eq!(parse_float_prefix("10.1"), Some(10.1));
        assert_eq!(parse_float_prefix("5harmony"), Some(5.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("tp"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("."), None);
    }

    #[test]
    fn test_parse_version_lenient() {
        assert_eq!(parse_version_lenient("1"), Some(Version::new(1, 0, 0)));
        assert_eq!(parse_version_lenient("6.5"), Some(Version::new(6, 5, 0)));
        assert_eq!(parse_version_lenient("v7.4.0"), Some(Version::new(7, 4, 0)));
        assert_eq!(parse_version_lenient("tp"), None);
    }

    #[test]
    fn test_desemverify() {
        assert_eq!(desemverify("v8.9.1"), Some(8.9));
        assert_eq!(desemverify("6.11.0-pre"), Some(6.11));
        assert_eq!(desemverify("v10.0.0+build.7"), Some(10.0));
        assert_eq!(desemverify("garbage"), None);
    }
}
