//! Version parsing and npm range semantics
//!
//! Registry versions and manifest ranges are carried around as strings;
//! this module gives them semver meaning where the resolver needs it.

mod range;

pub use range::{satisfies, RangeError, VersionRange};

use semver::Version;
use std::cmp::Ordering;

/// Parse a published version, accepting a leading `v` or `=`
pub fn parse_version(input: &str) -> Option<Version> {
    let trimmed = input.trim().trim_start_matches(['=', 'v']);
    Version::parse(trimmed).ok()
}

/// Order version strings by semver precedence; unparseable versions sort first
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a.cmp_precedence(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}
