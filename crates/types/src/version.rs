//! Semantic version parsing and constraint matching (component G: Version Matcher).
//!
//! The grammar deliberately diverges from the `semver` crate's own constraint
//! syntax: prerelease ordering is byte-lexicographic rather than dot-segment
//! precedence, and the caret operator's `MAJOR == 0` branch admits only the
//! same `MAJOR.MINOR`.

use cforge_errors::VersionError;
use std::cmp::Ordering;
use std::fmt;

/// A concrete, fully-specified version. Never contains a wildcard component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

impl Version {
    /// Parse a version string, accepting an optional leading `v`/`V`.
    ///
    /// # Errors
    /// Returns [`VersionError::InvalidVersion`] when the input does not match
    /// `[v]MAJOR[.MINOR[.PATCH]][-PRERELEASE][+BUILD]`.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let original = input;
        let s = input.strip_prefix(['v', 'V']).unwrap_or(input);

        let (core_and_pre, build) = match s.split_once('+') {
            Some((a, b)) => (a, Some(b.to_string())),
            None => (s, None),
        };
        let (core, prerelease) = match core_and_pre.split_once('-') {
            Some((a, b)) => (a, Some(b.to_string())),
            None => (core_and_pre, None),
        };

        let mut parts = core.split('.');
        let major = parse_component(parts.next(), original)?;
        let minor = match parts.next() {
            Some(p) => parse_component(Some(p), original)?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) => parse_component(Some(p), original)?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(VersionError::InvalidVersion {
                input: original.to_string(),
            });
        }

        Ok(Self {
            major,
            minor,
            patch,
            prerelease,
            build,
        })
    }

    #[must_use]
    pub fn core_cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

fn parse_component(part: Option<&str>, original: &str) -> Result<u64, VersionError> {
    part.and_then(|p| p.parse::<u64>().ok())
        .ok_or_else(|| VersionError::InvalidVersion {
            input: original.to_string(),
        })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{pre}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.core_cmp(other) {
            Ordering::Equal => {}
            ord => return ord,
        }
        // A prerelease sorts below the same release core; byte-lexicographic
        // otherwise (not full SemVer 2.0 dot-identifier precedence).
        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.as_bytes().cmp(b.as_bytes()),
        }
    }
}

/// A version component that may be a wildcard (`*`, `x`, `X`) inside a
/// constraint atom. A concrete [`Version`] never contains one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartialComponent {
    Num(u64),
    Wildcard,
}

fn is_wildcard_token(s: &str) -> bool {
    matches!(s, "*" | "x" | "X")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Caret,
    Tilde,
}

#[derive(Debug, Clone)]
struct Atom {
    op: Op,
    major: PartialComponent,
    minor: PartialComponent,
    patch: PartialComponent,
    prerelease: Option<String>,
}

impl Atom {
    /// Parse a single constraint atom, e.g. `^1.2.3`, `>=1.0`, `1.2.*`, `*`.
    fn parse(raw: &str, original: &str) -> Result<Self, VersionError> {
        let raw = raw.trim();
        if raw == "*" {
            return Ok(Self {
                op: Op::Eq,
                major: PartialComponent::Wildcard,
                minor: PartialComponent::Wildcard,
                patch: PartialComponent::Wildcard,
                prerelease: None,
            });
        }

        let (op, rest) = if let Some(r) = raw.strip_prefix(">=") {
            (Op::Ge, r)
        } else if let Some(r) = raw.strip_prefix("<=") {
            (Op::Le, r)
        } else if let Some(r) = raw.strip_prefix("!=") {
            (Op::Ne, r)
        } else if let Some(r) = raw.strip_prefix('>') {
            (Op::Gt, r)
        } else if let Some(r) = raw.strip_prefix('<') {
            (Op::Lt, r)
        } else if let Some(r) = raw.strip_prefix('^') {
            (Op::Caret, r)
        } else if let Some(r) = raw.strip_prefix('~') {
            (Op::Tilde, r)
        } else if let Some(r) = raw.strip_prefix('=') {
            (Op::Eq, r)
        } else {
            (Op::Eq, raw)
        };

        let rest = rest.strip_prefix(['v', 'V']).unwrap_or(rest);
        let (core, prerelease) = match rest.split_once('-') {
            Some((a, b)) => (a, Some(b.to_string())),
            None => (rest, None),
        };

        let mut parts = core.split('.');
        let major = parse_partial(parts.next(), original)?;
        let minor = match parts.next() {
            Some(p) => parse_partial(Some(p), original)?,
            None => PartialComponent::Wildcard,
        };
        let patch = match parts.next() {
            Some(p) => parse_partial(Some(p), original)?,
            None => PartialComponent::Wildcard,
        };
        if parts.next().is_some() {
            return Err(VersionError::InvalidConstraint {
                input: original.to_string(),
            });
        }

        // A wildcard component makes every following component a wildcard
        // for matching purposes in a plain equality atom.
        let (minor, patch) = if matches!(major, PartialComponent::Wildcard) {
            (PartialComponent::Wildcard, PartialComponent::Wildcard)
        } else if matches!(minor, PartialComponent::Wildcard) {
            (minor, PartialComponent::Wildcard)
        } else {
            (minor, patch)
        };

        Ok(Self {
            op,
            major,
            minor,
            patch,
            prerelease,
        })
    }

    fn required_major(&self) -> u64 {
        match self.major {
            PartialComponent::Num(n) => n,
            PartialComponent::Wildcard => 0,
        }
    }

    fn required_minor(&self) -> u64 {
        match self.minor {
            PartialComponent::Num(n) => n,
            PartialComponent::Wildcard => 0,
        }
    }

    fn required_patch(&self) -> u64 {
        match self.patch {
            PartialComponent::Num(n) => n,
            PartialComponent::Wildcard => 0,
        }
    }

    fn as_version(&self) -> Version {
        Version {
            major: self.required_major(),
            minor: self.required_minor(),
            patch: self.required_patch(),
            prerelease: self.prerelease.clone(),
            build: None,
        }
    }

    fn matches(&self, v: &Version) -> bool {
        match self.op {
            Op::Eq => self.matches_eq(v),
            Op::Ne => !self.matches_eq(v),
            Op::Lt => v.core_cmp(&self.as_version()) == Ordering::Less,
            Op::Le => v.core_cmp(&self.as_version()) != Ordering::Greater,
            Op::Gt => v.core_cmp(&self.as_version()) == Ordering::Greater,
            Op::Ge => v.core_cmp(&self.as_version()) != Ordering::Less,
            Op::Caret => self.matches_caret(v),
            Op::Tilde => self.matches_tilde(v),
        }
    }

    fn matches_eq(&self, v: &Version) -> bool {
        if !matches!(self.major, PartialComponent::Wildcard) && v.major != self.required_major() {
            return false;
        }
        if !matches!(self.minor, PartialComponent::Wildcard) && v.minor != self.required_minor() {
            return false;
        }
        if !matches!(self.patch, PartialComponent::Wildcard) && v.patch != self.required_patch() {
            return false;
        }
        match (&self.prerelease, &v.prerelease) {
            (None, _) => true,
            (Some(a), Some(b)) => a == b,
            (Some(_), None) => false,
        }
    }

    fn matches_caret(&self, v: &Version) -> bool {
        let lo = self.as_version();
        if v.core_cmp(&lo) == Ordering::Less {
            return false;
        }
        let major = self.required_major();
        if major > 0 {
            v.major == major
        } else {
            // MAJOR == 0: admits only the same MAJOR.MINOR, per the
            // original tool's explicit `major == 0` branch.
            v.major == 0 && v.minor == self.required_minor()
        }
    }

    fn matches_tilde(&self, v: &Version) -> bool {
        let lo = self.as_version();
        if v.core_cmp(&lo) == Ordering::Less {
            return false;
        }
        v.major == self.required_major() && v.minor == self.required_minor()
    }
}

fn parse_partial(part: Option<&str>, original: &str) -> Result<PartialComponent, VersionError> {
    match part {
        None => Ok(PartialComponent::Wildcard),
        Some(p) if is_wildcard_token(p) => Ok(PartialComponent::Wildcard),
        Some(p) => p
            .parse::<u64>()
            .map(PartialComponent::Num)
            .map_err(|_| VersionError::InvalidConstraint {
                input: original.to_string(),
            }),
    }
}

/// A comma-separated (AND) list of [`Atom`]s.
#[derive(Debug, Clone)]
pub struct VersionConstraint {
    raw: String,
    atoms: Vec<Atom>,
}

impl VersionConstraint {
    /// Parse a constraint expression.
    ///
    /// # Errors
    /// Returns [`VersionError::InvalidConstraint`] on malformed syntax.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let atoms = input
            .split(',')
            .map(|part| Atom::parse(part, input))
            .collect::<Result<Vec<_>, _>>()?;
        if atoms.is_empty() {
            return Err(VersionError::InvalidConstraint {
                input: input.to_string(),
            });
        }
        Ok(Self {
            raw: input.to_string(),
            atoms,
        })
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.atoms.iter().all(|atom| atom.matches(version))
    }

    /// Return the highest version in `candidates` admissible by this
    /// constraint.
    #[must_use]
    pub fn best_match<'a, I>(&self, candidates: I) -> Option<&'a Version>
    where
        I: IntoIterator<Item = &'a Version>,
    {
        candidates
            .into_iter()
            .filter(|v| self.matches(v))
            .max_by(|a, b| a.cmp(b))
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn parses_bare_and_prefixed() {
        assert_eq!(v("1.2.3").major, 1);
        assert_eq!(v("v1.2.3").major, 1);
        assert_eq!(v("V2").minor, 0);
    }

    #[test]
    fn caret_major_nonzero() {
        let c = VersionConstraint::parse("^1.2.3").unwrap();
        assert!(c.matches(&v("1.2.3")));
        assert!(c.matches(&v("1.9.9")));
        assert!(!c.matches(&v("2.0.0")));
    }

    #[test]
    fn caret_major_zero() {
        let c = VersionConstraint::parse("^0.2.3").unwrap();
        assert!(c.matches(&v("0.2.3")));
        assert!(c.matches(&v("0.2.9")));
        assert!(!c.matches(&v("0.3.0")));
    }

    #[test]
    fn tilde() {
        let c = VersionConstraint::parse("~1.2.3").unwrap();
        assert!(c.matches(&v("1.2.9")));
        assert!(!c.matches(&v("1.3.0")));
    }

    #[test]
    fn prerelease_sorts_below_release() {
        assert!(v("1.0.0-beta") < v("1.0.0"));
    }

    #[test]
    fn wildcard_equality() {
        let c = VersionConstraint::parse("1.2.*").unwrap();
        assert!(c.matches(&v("1.2.0")));
        assert!(c.matches(&v("1.2.99")));
        assert!(!c.matches(&v("1.3.0")));
    }

    #[test]
    fn best_match_picks_highest() {
        let versions = vec![v("10.0.0"), v("10.2.1"), v("11.0.0")];
        let c = VersionConstraint::parse("^10").unwrap();
        let best = c.best_match(versions.iter()).unwrap();
        assert_eq!(best.to_string(), "10.2.1");
    }

    #[test]
    fn range_and_semantics() {
        let c = VersionConstraint::parse(">=1.0,<2.0").unwrap();
        assert!(c.matches(&v("1.5.0")));
        assert!(!c.matches(&v("2.0.0")));
    }
}
