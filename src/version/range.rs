//! npm version range semantics
//!
//! Handles range formats:
//! - Primitive comparators: `1.2.3`, `=1.2.3`, `>1.2.3`, `>=1.2.3`, `<1.2.3`, `<=1.2.3`
//! - Caret and tilde: `^1.2.3`, `~1.2.3`, `~>1.2`
//! - X-ranges: `*`, `1.x`, `1.2.*`, `1`, `>1.2`
//! - Hyphen ranges: `1.2.3 - 2.3.4`
//! - Intersections (`>=1.0.0 <2.0.0`) and unions (`^1.0.0 || ^2.0.0`)
//!
//! A prerelease version only satisfies a comparator set that names a
//! prerelease on the same `major.minor.patch` tuple.

use crate::version::parse_version;
use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static OR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\|\|\s*").unwrap());
static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());
static OPERATOR_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<=|>=|<|>|=|\^|~>|~)\s+").unwrap());
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(<=|>=|<|>|=|\^|~>|~)?\s*(.*)$").unwrap());
static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[=v]*(\d+|[xX*])(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?(?:-([0-9A-Za-z.-]+))?(?:\+[0-9A-Za-z.-]+)?$",
    )
    .unwrap()
});

/// Error produced when a range string cannot be interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeError {
    /// Offending token or range
    pub input: String,
    /// What went wrong
    pub message: String,
}

impl RangeError {
    fn new(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid range '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for RangeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, version: &Version) -> bool {
        let ordering = precedence(version, &self.version);
        match self.op {
            Op::Eq => ordering == Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Version part of a comparator token, with `None` for wildcard parts
#[derive(Debug, Clone)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(input: &str) -> Result<Self, RangeError> {
        let caps = PARTIAL_RE
            .captures(input)
            .ok_or_else(|| RangeError::new(input, "not a version"))?;

        let number = |index: usize| -> Result<Option<u64>, RangeError> {
            match caps.get(index).map(|m| m.as_str()) {
                None | Some("x") | Some("X") | Some("*") => Ok(None),
                Some(digits) => digits
                    .parse()
                    .map(Some)
                    .map_err(|_| RangeError::new(input, "version number too large")),
            }
        };

        let major = number(1)?;
        let mut minor = number(2)?;
        let mut patch = number(3)?;
        // `1.x.3` is treated as `1.x`
        if major.is_none() {
            minor = None;
        }
        if minor.is_none() {
            patch = None;
        }

        let pre = match caps.get(4) {
            Some(m) => Prerelease::new(m.as_str())
                .map_err(|e| RangeError::new(input, format!("invalid prerelease: {}", e)))?,
            None => Prerelease::EMPTY,
        };

        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    fn any() -> Self {
        Self {
            major: None,
            minor: None,
            patch: None,
            pre: Prerelease::EMPTY,
        }
    }

    /// Lowest version matched by the partial, wildcards filled with zero
    fn floor(&self) -> Version {
        let mut version = v(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        if self.patch.is_some() {
            version.pre = self.pre.clone();
        }
        version
    }
}

/// A parsed npm version range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    /// Union of intersections; an empty set matches any release
    sets: Vec<Vec<Comparator>>,
}

impl VersionRange {
    /// Parse an npm range string
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let trimmed = input.trim();
        let sets = OR_RE
            .split(trimmed)
            .map(parse_comparator_set)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: trimmed.to_string(),
            sets,
        })
    }

    /// Returns true if the version falls inside the range
    pub fn matches(&self, version: &Version) -> bool {
        self.sets.iter().any(|set| set_matches(set, version))
    }

    /// Lowest version that can possibly satisfy the range
    pub fn min_version(&self) -> Option<Version> {
        let zero = v(0, 0, 0);
        if self.matches(&zero) {
            return Some(zero);
        }
        let zero_pre = with_zero_pre(v(0, 0, 0));
        if self.matches(&zero_pre) {
            return Some(zero_pre);
        }

        let mut minimum: Option<Version> = None;
        for set in &self.sets {
            let mut set_minimum: Option<Version> = None;
            for comparator in set {
                let candidate = match comparator.op {
                    Op::Gt => {
                        let mut bumped = comparator.version.clone();
                        if bumped.pre.is_empty() {
                            // Nothing follows the largest patch of a tuple
                            let Some(patch) = bumped.patch.checked_add(1) else {
                                continue;
                            };
                            bumped.patch = patch;
                        } else {
                            bumped.pre = Prerelease::new(&format!("{}.0", bumped.pre.as_str()))
                                .unwrap_or_else(|_| bumped.pre.clone());
                        }
                        bumped
                    }
                    Op::Eq | Op::Gte => comparator.version.clone(),
                    Op::Lt | Op::Lte => continue,
                };
                if set_minimum
                    .as_ref()
                    .map_or(true, |current| precedence(&candidate, current) == Ordering::Greater)
                {
                    set_minimum = Some(candidate);
                }
            }
            if let Some(set_minimum) = set_minimum {
                if minimum
                    .as_ref()
                    .map_or(true, |current| precedence(current, &set_minimum) == Ordering::Greater)
                {
                    minimum = Some(set_minimum);
                }
            }
        }

        minimum.filter(|version| self.matches(version))
    }

    /// The range as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Returns true if `version` satisfies `range`; unparseable input never does
pub fn satisfies(version: &str, range: &str) -> bool {
    match (parse_version(version), VersionRange::parse(range)) {
        (Some(version), Ok(range)) => range.matches(&version),
        _ => false,
    }
}

fn parse_comparator_set(input: &str) -> Result<Vec<Comparator>, RangeError> {
    let input = input.trim();
    if let Some(caps) = HYPHEN_RE.captures(input) {
        return hyphen(&caps[1], &caps[2]);
    }

    let normalized = OPERATOR_SPACE_RE.replace_all(input, "$1");
    let mut comparators = Vec::new();
    for token in normalized.split_whitespace() {
        comparators.extend(parse_token(token)?);
    }
    Ok(comparators)
}

fn parse_token(token: &str) -> Result<Vec<Comparator>, RangeError> {
    let caps = TOKEN_RE
        .captures(token)
        .ok_or_else(|| RangeError::new(token, "unrecognized comparator"))?;
    let operator = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let partial = if rest.is_empty() {
        Partial::any()
    } else {
        Partial::parse(rest)?
    };

    Ok(match operator {
        "^" => caret(token, &partial)?,
        "~" | "~>" => tilde(token, &partial)?,
        "" | "=" => x_range(token, Op::Eq, &partial)?,
        ">" => x_range(token, Op::Gt, &partial)?,
        ">=" => x_range(token, Op::Gte, &partial)?,
        "<" => x_range(token, Op::Lt, &partial)?,
        "<=" => x_range(token, Op::Lte, &partial)?,
        _ => return Err(RangeError::new(token, "unknown operator")),
    })
}

fn caret(token: &str, p: &Partial) -> Result<Vec<Comparator>, RangeError> {
    let Some(major) = p.major else {
        return Ok(Vec::new());
    };
    let upper = match (p.minor, p.patch) {
        (None, _) => v(bump(token, major)?, 0, 0),
        (Some(minor), None) if major == 0 => v(0, bump(token, minor)?, 0),
        (Some(_), None) => v(bump(token, major)?, 0, 0),
        (Some(_), Some(_)) if major > 0 => v(bump(token, major)?, 0, 0),
        (Some(minor), Some(_)) if minor > 0 => v(0, bump(token, minor)?, 0),
        (Some(_), Some(patch)) => v(0, 0, bump(token, patch)?),
    };
    Ok(bounded(p.floor(), upper))
}

fn tilde(token: &str, p: &Partial) -> Result<Vec<Comparator>, RangeError> {
    let Some(major) = p.major else {
        return Ok(Vec::new());
    };
    Ok(bounded(p.floor(), next_wildcard(token, major, p.minor)?))
}

fn x_range(token: &str, op: Op, p: &Partial) -> Result<Vec<Comparator>, RangeError> {
    let Some(major) = p.major else {
        return Ok(match op {
            // Nothing is below 0.0.0-0 or above every version
            Op::Gt | Op::Lt => vec![Comparator::new(Op::Lt, with_zero_pre(v(0, 0, 0)))],
            _ => Vec::new(),
        });
    };

    if p.patch.is_some() {
        return Ok(vec![Comparator::new(op, p.floor())]);
    }

    // Version with a wildcard minor or patch
    let next = next_wildcard(token, major, p.minor)?;
    Ok(match op {
        Op::Eq => bounded(p.floor(), next),
        Op::Gt => vec![Comparator::new(Op::Gte, next)],
        Op::Gte => vec![Comparator::new(Op::Gte, p.floor())],
        Op::Lt => vec![Comparator::new(Op::Lt, with_zero_pre(p.floor()))],
        Op::Lte => vec![Comparator::new(Op::Lt, with_zero_pre(next))],
    })
}

fn hyphen(from: &str, to: &str) -> Result<Vec<Comparator>, RangeError> {
    let lower = Partial::parse(from)?;
    let upper = Partial::parse(to)?;
    let mut comparators = Vec::new();

    if lower.major.is_some() {
        comparators.push(Comparator::new(Op::Gte, lower.floor()));
    }
    if let Some(major) = upper.major {
        comparators.push(if upper.patch.is_some() {
            Comparator::new(Op::Lte, upper.floor())
        } else {
            Comparator::new(Op::Lt, with_zero_pre(next_wildcard(to, major, upper.minor)?))
        });
    }
    Ok(comparators)
}

/// First version past `major.x` or `major.minor.x`
fn next_wildcard(token: &str, major: u64, minor: Option<u64>) -> Result<Version, RangeError> {
    Ok(match minor {
        None => v(bump(token, major)?, 0, 0),
        Some(minor) => v(major, bump(token, minor)?, 0),
    })
}

fn bump(token: &str, number: u64) -> Result<u64, RangeError> {
    number
        .checked_add(1)
        .ok_or_else(|| RangeError::new(token, "version number too large"))
}

fn bounded(lower: Version, upper: Version) -> Vec<Comparator> {
    vec![
        Comparator::new(Op::Gte, lower),
        Comparator::new(Op::Lt, with_zero_pre(upper)),
    ]
}

fn set_matches(set: &[Comparator], version: &Version) -> bool {
    if !set.iter().all(|c| c.matches(version)) {
        return false;
    }
    if version.pre.is_empty() {
        return true;
    }
    set.iter().any(|c| {
        !c.version.pre.is_empty()
            && c.version.major == version.major
            && c.version.minor == version.minor
            && c.version.patch == version.patch
    })
}

/// Semver precedence, ignoring build metadata
fn precedence(a: &Version, b: &Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then(a.minor.cmp(&b.minor))
        .then(a.patch.cmp(&b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

fn v(major: u64, minor: u64, patch: u64) -> Version {
    Version {
        major,
        minor,
        patch,
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
    }
}

/// `x.y.z-0`, the lowest prerelease of a tuple
fn with_zero_pre(mut version: Version) -> Version {
    version.pre = Prerelease::new("0").unwrap_or(Prerelease::EMPTY);
    version
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min(range: &str) -> Option<String> {
        VersionRange::parse(range)
            .unwrap()
            .min_version()
            .map(|v| v.to_string())
    }

    #[test]
    fn test_exact() {
        assert!(satisfies("1.2.3", "1.2.3"));
        assert!(satisfies("1.2.3", "=1.2.3"));
        assert!(satisfies("1.2.3", "v1.2.3"));
        assert!(!satisfies("1.2.4", "1.2.3"));
    }

    #[test]
    fn test_caret() {
        assert!(satisfies("2.0.0", "^2.0.0"));
        assert!(satisfies("2.9.1", "^2.0.0"));
        assert!(!satisfies("3.0.0", "^2.0.0"));
        assert!(!satisfies("1.9.9", "^2.0.0"));
    }

    #[test]
    fn test_caret_zero_major() {
        assert!(satisfies("0.2.5", "^0.2.3"));
        assert!(!satisfies("0.3.0", "^0.2.3"));
        assert!(satisfies("0.0.3", "^0.0.3"));
        assert!(!satisfies("0.0.4", "^0.0.3"));
        assert!(satisfies("0.9.0", "^0.x"));
        assert!(!satisfies("1.0.0", "^0.x"));
    }

    #[test]
    fn test_caret_partial() {
        assert!(satisfies("1.9.0", "^1.2"));
        assert!(!satisfies("1.1.9", "^1.2"));
        assert!(satisfies("1.0.0", "^1"));
        assert!(!satisfies("2.0.0", "^1"));
    }

    #[test]
    fn test_tilde() {
        assert!(satisfies("1.2.9", "~1.2.3"));
        assert!(!satisfies("1.3.0", "~1.2.3"));
        assert!(satisfies("1.9.0", "~1"));
        assert!(!satisfies("2.0.0", "~1"));
        assert!(satisfies("1.2.0", "~>1.2"));
    }

    #[test]
    fn test_x_ranges() {
        assert!(satisfies("5.0.0", "*"));
        assert!(satisfies("5.0.0", ""));
        assert!(satisfies("1.4.0", "1.x"));
        assert!(!satisfies("2.0.0", "1.x"));
        assert!(satisfies("1.2.7", "1.2.*"));
        assert!(!satisfies("1.3.0", "1.2.*"));
        assert!(satisfies("3.0.0", ">2"));
        assert!(!satisfies("2.5.0", ">2"));
        assert!(satisfies("1.2.9", "<=1.2"));
        assert!(!satisfies("1.3.0", "<=1.2"));
    }

    #[test]
    fn test_comparator_intersection() {
        assert!(satisfies("1.5.0", ">=1.0.0 <2.0.0"));
        assert!(satisfies("1.5.0", ">= 1.0.0 < 2.0.0"));
        assert!(!satisfies("2.0.0", ">=1.0.0 <2.0.0"));
    }

    #[test]
    fn test_union() {
        assert!(satisfies("17.0.2", "^16.8.0 || ^17.0.0"));
        assert!(satisfies("16.14.0", "^16.8.0 || ^17.0.0"));
        assert!(!satisfies("18.0.0", "^16.8.0 || ^17.0.0"));
    }

    #[test]
    fn test_hyphen() {
        assert!(satisfies("1.2.3", "1.2.3 - 2.3.4"));
        assert!(satisfies("2.3.4", "1.2.3 - 2.3.4"));
        assert!(!satisfies("2.3.5", "1.2.3 - 2.3.4"));
        assert!(satisfies("2.3.9", "1.2 - 2.3"));
        assert!(!satisfies("2.4.0", "1.2 - 2.3"));
    }

    #[test]
    fn test_prerelease_excluded_by_default() {
        assert!(!satisfies("2.1.0-beta.1", "^2.0.0"));
        assert!(!satisfies("1.0.0-rc.1", "*"));
        assert!(satisfies("2.0.0-beta.2", "^2.0.0-beta.1"));
        assert!(!satisfies("2.1.0-beta.2", "^2.0.0-beta.1"));
    }

    #[test]
    fn test_invalid_input_never_satisfies() {
        assert!(!satisfies("not-a-version", "^1.0.0"));
        assert!(!satisfies("1.0.0", "latest"));
        assert!(!satisfies("1.0.0", "workspace:*"));
        assert!(VersionRange::parse("github:user/repo").is_err());
    }

    #[test]
    fn test_min_version() {
        assert_eq!(min("^2.0.0").as_deref(), Some("2.0.0"));
        assert_eq!(min("~1.2").as_deref(), Some("1.2.0"));
        assert_eq!(min(">1.2.3").as_deref(), Some("1.2.4"));
        assert_eq!(min(">=1.2.3-beta").as_deref(), Some("1.2.3-beta"));
        assert_eq!(min("^16.8.0 || ^17.0.0").as_deref(), Some("16.8.0"));
        assert_eq!(min("*").as_deref(), Some("0.0.0"));
        assert_eq!(min("<2.0.0").as_deref(), Some("0.0.0"));
        assert_eq!(min("1.2.3 - 2.0.0").as_deref(), Some("1.2.3"));
    }

    #[test]
    fn test_min_version_unsatisfiable() {
        assert_eq!(min(">2.0.0 <1.0.0"), None);
    }

    #[test]
    fn test_numbers_at_the_limit_are_rejected() {
        let max = u64::MAX;
        for range in [
            format!("^{}", max),
            format!("^0.{}", max),
            format!("^0.0.{}", max),
            format!("~1.{}", max),
            format!("{}.x", max),
            format!("<={}", max),
            format!("1.0.0 - {}", max),
        ] {
            let err = VersionRange::parse(&range).unwrap_err();
            assert_eq!(err.message, "version number too large", "{}", range);
        }
        assert!(!satisfies("1.0.0", &format!("^{}", max)));
    }

    #[test]
    fn test_greater_than_largest_patch() {
        let range = VersionRange::parse(&format!(">1.0.{}", u64::MAX)).unwrap();
        assert_eq!(range.min_version(), None);
    }

    #[test]
    fn test_display_keeps_raw_text() {
        let range = VersionRange::parse(" ^1.2.3 ").unwrap();
        assert_eq!(range.to_string(), "^1.2.3");
        assert_eq!(range.as_str(), "^1.2.3");
    }
}
