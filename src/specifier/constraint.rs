use std::fmt;

use serde::{Deserialize, Serialize};

use super::version::Version;
use super::ParseError;

/// Comparison operator of a version constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "===")]
    ArbitraryEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "~=")]
    Compatible,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
}

impl Operator {
    /// Longest first, so prefixes never shadow longer operators.
    pub const ALL: [Operator; 8] = [
        Operator::ArbitraryEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Compatible,
        Operator::LessEqual,
        Operator::GreaterEqual,
        Operator::Less,
        Operator::Greater,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::ArbitraryEqual => "===",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Compatible => "~=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
        }
    }

    /// Match an operator at the start of `input`.
    pub fn strip_prefix(input: &str) -> Option<(Operator, &str)> {
        Self::ALL
            .iter()
            .find_map(|op| input.strip_prefix(op.as_str()).map(|rest| (*op, rest)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `op version` clause of a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub op: Operator,
    /// Version token as written (minus any `.*`).
    pub text: String,
    /// Parsed token; `None` only for `===`, which compares strings.
    pub version: Option<Version>,
    pub wildcard: bool,
}

impl Specifier {
    pub fn parse(op: Operator, token: &str) -> Result<Self, ParseError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ParseError::at(1, format!("expected version after `{op}`")));
        }

        if op == Operator::ArbitraryEqual {
            return Ok(Self {
                op,
                text: token.to_string(),
                version: None,
                wildcard: false,
            });
        }

        let (body, wildcard) = match token.strip_suffix(".*") {
            Some(body) => (body, true),
            None => (token, false),
        };
        if wildcard && !matches!(op, Operator::Equal | Operator::NotEqual) {
            return Err(ParseError::at(
                body.len() + 1,
                format!("`.*` is only allowed with `==` and `!=`, not `{op}`"),
            ));
        }

        let version = Version::parse(body)?;

        if wildcard && !version.is_plain_release() {
            return Err(ParseError::at(
                body.len() + 1,
                "`.*` must directly follow release segments",
            ));
        }
        if version.has_local() && !matches!(op, Operator::Equal | Operator::NotEqual) {
            return Err(ParseError::at(
                1,
                format!("local version `{version}` is only allowed with `==` and `!=`"),
            ));
        }
        if op == Operator::Compatible && version.release.len() < 2 {
            return Err(ParseError::at(
                1,
                format!("`~=` needs at least two release segments, got `{body}`"),
            ));
        }

        Ok(Self {
            op,
            text: body.to_string(),
            version: Some(version),
            wildcard,
        })
    }

    /// Whether `candidate` satisfies this clause. `===` compares the
    /// normalized rendering of `candidate` with the written token.
    pub fn contains(&self, candidate: &Version) -> bool {
        let Some(target) = &self.version else {
            return candidate.to_string().eq_ignore_ascii_case(&self.text);
        };
        match self.op {
            Operator::Equal => self.matches_exact(target, candidate),
            Operator::NotEqual => !self.matches_exact(target, candidate),
            Operator::GreaterEqual => candidate.public() >= *target,
            Operator::LessEqual => candidate.public() <= *target,
            Operator::Greater => candidate.public() > *target,
            Operator::Less => candidate.public() < *target,
            Operator::Compatible => {
                let prefix = &target.release[..target.release.len() - 1];
                candidate.public() >= *target
                    && candidate.epoch == target.epoch
                    && has_release_prefix(candidate, prefix)
            }
            Operator::ArbitraryEqual => false,
        }
    }

    fn matches_exact(&self, target: &Version, candidate: &Version) -> bool {
        if self.wildcard {
            return candidate.epoch == target.epoch && has_release_prefix(candidate, &target.release);
        }
        if target.has_local() {
            candidate == target
        } else {
            candidate.public() == *target
        }
    }
}

fn has_release_prefix(candidate: &Version, prefix: &[u64]) -> bool {
    (0..prefix.len()).all(|i| candidate.release.get(i).copied().unwrap_or(0) == prefix[i])
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) if self.wildcard => write!(f, "{}{v}.*", self.op),
            Some(v) => write!(f, "{}{v}", self.op),
            None => write!(f, "{}{}", self.op, self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(op: Operator, token: &str) -> Specifier {
        Specifier::parse(op, token).unwrap()
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn operator_prefix_prefers_longest() {
        assert_eq!(Operator::strip_prefix("===1.0"), Some((Operator::ArbitraryEqual, "1.0")));
        assert_eq!(Operator::strip_prefix("==1.0"), Some((Operator::Equal, "1.0")));
        assert_eq!(Operator::strip_prefix("<=1.0"), Some((Operator::LessEqual, "1.0")));
        assert_eq!(Operator::strip_prefix("<1.0"), Some((Operator::Less, "1.0")));
        assert_eq!(Operator::strip_prefix("1.0"), None);
    }

    #[test]
    fn wildcard_only_with_equality() {
        assert!(Specifier::parse(Operator::Equal, "1.4.*").unwrap().wildcard);
        assert!(Specifier::parse(Operator::NotEqual, "1.4.*").is_ok());
        assert!(Specifier::parse(Operator::GreaterEqual, "1.4.*").is_err());
        assert!(Specifier::parse(Operator::Equal, "1.4rc1.*").is_err());
    }

    #[test]
    fn compatible_needs_two_segments() {
        assert!(Specifier::parse(Operator::Compatible, "2").is_err());
        assert!(Specifier::parse(Operator::Compatible, "2.2").is_ok());
    }

    #[test]
    fn local_only_with_equality() {
        assert!(Specifier::parse(Operator::Equal, "1.0+abc").is_ok());
        assert!(Specifier::parse(Operator::GreaterEqual, "1.0+abc").is_err());
    }

    #[test]
    fn arbitrary_equal_keeps_raw_token() {
        let s = spec(Operator::ArbitraryEqual, "foobar");
        assert!(s.version.is_none());
        assert_eq!(s.to_string(), "===foobar");
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = Specifier::parse(Operator::GreaterEqual, "  ").unwrap_err();
        assert!(err.message.contains("expected version after `>=`"));
    }

    #[test]
    fn contains_handles_each_operator() {
        assert!(spec(Operator::GreaterEqual, "1.0").contains(&v("1.0")));
        assert!(!spec(Operator::Greater, "1.0").contains(&v("1.0")));
        assert!(spec(Operator::Less, "2").contains(&v("1.9.9")));
        assert!(spec(Operator::LessEqual, "2").contains(&v("2.0.0")));
        assert!(spec(Operator::Equal, "1.0").contains(&v("1.0+local")));
        assert!(!spec(Operator::Equal, "1.0+a").contains(&v("1.0+b")));
        assert!(spec(Operator::NotEqual, "1.0").contains(&v("1.1")));
        assert!(spec(Operator::Equal, "1.4.*").contains(&v("1.4.7")));
        assert!(!spec(Operator::Equal, "1.4.*").contains(&v("1.5")));
        assert!(spec(Operator::Compatible, "2.2").contains(&v("2.9")));
        assert!(!spec(Operator::Compatible, "2.2").contains(&v("3.0")));
        assert!(!spec(Operator::Compatible, "2.2").contains(&v("2.1")));
        assert!(spec(Operator::ArbitraryEqual, "1.0").contains(&v("1.0")));
    }

    #[test]
    fn display_normalizes_version() {
        assert_eq!(spec(Operator::GreaterEqual, "1.0-ALPHA1").to_string(), ">=1.0a1");
        assert_eq!(spec(Operator::NotEqual, "2.1.*").to_string(), "!=2.1.*");
    }
}
