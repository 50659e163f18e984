//! Retention rules for cleanup sweeps
//!
//! A file is a delete candidate only when all three gates agree: its name
//! matches the rule's pattern, its name carries a date token, and its
//! creation timestamp falls strictly before the rule's threshold. The date
//! token gate keeps a loose pattern from ever deleting files that were not
//! produced by date-partitioned naming.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

/// Length of the digit run that marks a dated file name
pub const DATE_TOKEN_LEN: usize = 8;

/// Whether the name contains a run of at least eight consecutive ASCII digits
///
/// The run is interpreted as an embedded date such as `20240115`, though the
/// digits themselves are never parsed; only the creation timestamp decides
/// whether a file is old enough to delete.
pub fn has_date_token(name: &str) -> bool {
    let mut run = 0;
    for byte in name.bytes() {
        if byte.is_ascii_digit() {
            run += 1;
            if run >= DATE_TOKEN_LEN {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Which files a cleanup sweep may delete
#[derive(Debug, Clone)]
pub struct RetentionRule {
    pattern: Regex,
    age_threshold: DateTime<Utc>,
}

impl RetentionRule {
    /// Rule deleting files that match `pattern` and were created strictly
    /// before `age_threshold`
    pub fn new(pattern: Regex, age_threshold: DateTime<Utc>) -> Self {
        Self {
            pattern,
            age_threshold,
        }
    }

    /// Rule whose threshold lies `max_age` before the current time
    pub fn older_than(pattern: Regex, max_age: Duration) -> Self {
        Self::new(pattern, Utc::now() - max_age)
    }

    /// The filename pattern files must match
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The cutoff; files created at or after it are kept
    pub fn age_threshold(&self) -> DateTime<Utc> {
        self.age_threshold
    }

    /// Whether the name passes the pattern gate
    pub fn pattern_matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    /// Whether a file created at `created` falls before the threshold
    ///
    /// The comparison is strict; a file created exactly at the threshold
    /// survives.
    pub fn is_expired(&self, created: DateTime<Utc>) -> bool {
        created < self.age_threshold
    }
}
