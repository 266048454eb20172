//! Decide whether the clauses of one requirement can hold at once.
//!
//! The clauses form a conjunction. Range clauses are folded into a single
//! interval; exact pins are then checked against every other clause.

use std::cmp::Ordering;
use std::fmt;

use super::constraint::{Operator, Specifier};
use super::version::Version;

/// Two clauses of the same requirement that exclude each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub left: String,
    pub right: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` contradicts `{}`", self.left, self.right)
    }
}

#[derive(Debug, Clone)]
struct Bound {
    version: Version,
    inclusive: bool,
    source: String,
}

pub fn satisfiable(specs: &[Specifier]) -> Result<(), Conflict> {
    check_arbitrary_pins(specs)?;

    let pins: Vec<&Specifier> = specs
        .iter()
        .filter(|s| s.op == Operator::Equal && !s.wildcard)
        .collect();
    if let Some(first) = pins.first() {
        return check_pin(first, specs);
    }

    let mut lower: Option<Bound> = None;
    let mut upper: Option<Bound> = None;
    for spec in specs {
        let (lo, hi) = bounds_of(spec);
        if let Some(lo) = lo {
            lower = Some(tighter_lower(lower, lo));
        }
        if let Some(hi) = hi {
            upper = Some(tighter_upper(upper, hi));
        }
    }

    let (Some(lo), Some(hi)) = (&lower, &upper) else {
        return Ok(());
    };
    match lo.version.cmp(&hi.version) {
        Ordering::Greater => Err(conflict(&lo.source, &hi.source)),
        Ordering::Equal if !(lo.inclusive && hi.inclusive) => Err(conflict(&lo.source, &hi.source)),
        Ordering::Equal => {
            // The interval collapsed to one version; exclusions may remove it.
            let point = &lo.version;
            match specs.iter().find(|s| s.op == Operator::NotEqual && !s.contains(point)) {
                Some(excluder) => Err(conflict(&lo.source, &excluder.to_string())),
                None => Ok(()),
            }
        }
        Ordering::Less => check_wildcard_exclusions(lo, hi, specs),
    }
}

// `!=X.*` removes `[X.dev0, (X+1).dev0)`. When that span holds the whole
// folded interval nothing is left.
fn check_wildcard_exclusions(lo: &Bound, hi: &Bound, specs: &[Specifier]) -> Result<(), Conflict> {
    let top = effective_upper(hi);
    for excluder in specs.iter().filter(|s| s.op == Operator::NotEqual && s.wildcard) {
        let Some(v) = &excluder.version else {
            continue;
        };
        let floor = Version::floor_of(v.epoch, v.release.clone());
        let ceiling = Version::floor_of(v.epoch, Version::bump_prefix(&v.release));
        let covers_top = if hi.inclusive { top < ceiling } else { top <= ceiling };
        if lo.version >= floor && covers_top {
            return Err(conflict(&lo.source, &excluder.to_string()));
        }
    }
    Ok(())
}

// `<V` for a final release V admits no pre-release of V itself.
fn effective_upper(hi: &Bound) -> Version {
    if !hi.inclusive && hi.version.is_plain_release() {
        Version::floor_of(hi.version.epoch, hi.version.release.clone())
    } else {
        hi.version.clone()
    }
}

fn check_arbitrary_pins(specs: &[Specifier]) -> Result<(), Conflict> {
    let arbitrary: Vec<&Specifier> = specs
        .iter()
        .filter(|s| s.op == Operator::ArbitraryEqual)
        .collect();
    for pair in arbitrary.windows(2) {
        if !pair[0].text.eq_ignore_ascii_case(&pair[1].text) {
            return Err(conflict(&pair[0].to_string(), &pair[1].to_string()));
        }
    }
    // `===` against a parsed pin only conflicts when the token is itself
    // a version and the two differ.
    if let Some(arb) = arbitrary.first() {
        if let Ok(arb_version) = Version::parse(&arb.text) {
            for spec in specs.iter().filter(|s| s.op == Operator::Equal && !s.wildcard) {
                if let Some(pinned) = &spec.version {
                    if pinned.public() != arb_version.public() {
                        return Err(conflict(&spec.to_string(), &arb.to_string()));
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_pin(pin: &Specifier, specs: &[Specifier]) -> Result<(), Conflict> {
    let Some(pinned) = &pin.version else {
        return Ok(());
    };
    for other in specs {
        if std::ptr::eq(other, pin) || other.op == Operator::ArbitraryEqual {
            continue;
        }
        if !other.contains(pinned) {
            return Err(conflict(&pin.to_string(), &other.to_string()));
        }
    }
    Ok(())
}

fn bounds_of(spec: &Specifier) -> (Option<Bound>, Option<Bound>) {
    let Some(v) = &spec.version else {
        return (None, None);
    };
    let source = spec.to_string();
    let bound = |version: Version, inclusive: bool| Bound {
        version,
        inclusive,
        source: source.clone(),
    };
    match spec.op {
        Operator::GreaterEqual => (Some(bound(v.clone(), true)), None),
        Operator::Greater => (Some(bound(v.clone(), false)), None),
        Operator::LessEqual => (None, Some(bound(v.clone(), true))),
        Operator::Less => (None, Some(bound(v.clone(), false))),
        Operator::Compatible => {
            let prefix = &v.release[..v.release.len() - 1];
            let ceiling = Version::floor_of(v.epoch, Version::bump_prefix(prefix));
            (Some(bound(v.clone(), true)), Some(bound(ceiling, false)))
        }
        Operator::Equal if spec.wildcard => {
            let floor = Version::floor_of(v.epoch, v.release.clone());
            let ceiling = Version::floor_of(v.epoch, Version::bump_prefix(&v.release));
            (Some(bound(floor, true)), Some(bound(ceiling, false)))
        }
        _ => (None, None),
    }
}

fn tighter_lower(current: Option<Bound>, candidate: Bound) -> Bound {
    match current {
        None => candidate,
        Some(cur) => match candidate.version.cmp(&cur.version) {
            Ordering::Greater => candidate,
            Ordering::Equal if !candidate.inclusive => candidate,
            _ => cur,
        },
    }
}

fn tighter_upper(current: Option<Bound>, candidate: Bound) -> Bound {
    match current {
        None => candidate,
        Some(cur) => match candidate.version.cmp(&cur.version) {
            Ordering::Less => candidate,
            Ordering::Equal if !candidate.inclusive => candidate,
            _ => cur,
        },
    }
}

fn conflict(left: &str, right: &str) -> Conflict {
    Conflict {
        left: left.to_string(),
        right: right.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specifier::parse_requirement;

    fn check(line: &str) -> Result<(), Conflict> {
        satisfiable(&parse_requirement(line).unwrap().specifiers)
    }

    #[test]
    fn ordinary_ranges_are_satisfiable() {
        assert!(check("foo").is_ok());
        assert!(check("foo>=1.0").is_ok());
        assert!(check("foo>=1.0,<2.0,!=1.5").is_ok());
        assert!(check("foo~=2.2,!=2.3.1").is_ok());
        assert!(check("foo==1.4.*").is_ok());
        assert!(check("foo>=1.0,<=1.0").is_ok());
    }

    #[test]
    fn inverted_range_conflicts() {
        let err = check("foo>=2.0,<1.0").unwrap_err();
        assert_eq!(err.left, ">=2.0");
        assert_eq!(err.right, "<1.0");
        assert_eq!(err.to_string(), "`>=2.0` contradicts `<1.0`");
    }

    #[test]
    fn empty_open_interval_conflicts() {
        assert!(check("foo>1.0,<1.0").is_err());
        assert!(check("foo>=1.0,<1.0.0").is_err());
    }

    #[test]
    fn point_interval_removed_by_exclusion() {
        let err = check("foo>=1.0,<=1.0,!=1.0").unwrap_err();
        assert_eq!(err.right, "!=1.0");
    }

    #[test]
    fn pin_checked_against_every_clause() {
        assert!(check("foo==1.2,>=1.0,<2").is_ok());
        let err = check("foo==1.2,!=1.2").unwrap_err();
        assert_eq!(err.left, "==1.2");
        assert_eq!(err.right, "!=1.2");
        assert!(check("foo==1.0,==2.0").is_err());
        assert!(check("foo==3.0,~=2.2").is_err());
    }

    #[test]
    fn compatible_release_ceiling() {
        assert!(check("foo~=2.2,>=3.0").is_err());
        assert!(check("foo~=2.2,<2.2").is_err());
        assert!(check("foo~=2.2.1,>=2.2.5").is_ok());
    }

    #[test]
    fn wildcard_ranges() {
        assert!(check("foo==1.4.*,>=1.5").is_err());
        assert!(check("foo==1.4.*,<1.4.5").is_ok());
        assert!(check("foo==1.4.*,==1.5.*").is_err());
    }

    #[test]
    fn wildcard_exclusion_covering_the_range() {
        let err = check("foo==1.4.*,!=1.4.*").unwrap_err();
        assert_eq!(err.left, "==1.4.*");
        assert_eq!(err.right, "!=1.4.*");

        let err = check("foo>=1.0,<2.0,!=1.*").unwrap_err();
        assert_eq!(err.left, ">=1.0");
        assert_eq!(err.right, "!=1.*");

        let err = check("foo~=1.4,!=1.*").unwrap_err();
        assert_eq!(err.left, "~=1.4");
    }

    #[test]
    fn wildcard_exclusion_leaving_room() {
        assert!(check("foo>=1.0,<2.1,!=1.*").is_ok());
        assert!(check("foo~=1.4,!=1.4.*").is_ok());
        assert!(check("foo>=0.9,<2.0,!=1.*").is_ok());
        assert!(check("foo>=1.0,<=2.0,!=1.*").is_ok());
    }

    #[test]
    fn arbitrary_equality() {
        assert!(check("foo===1.0,===1.0").is_ok());
        assert!(check("foo===1.0,===2.0").is_err());
        assert!(check("foo===1.0,==2.0").is_err());
        assert!(check("foo===custom,==2.0").is_ok());
    }
}
