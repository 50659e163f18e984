//! Daily file naming
//!
//! Event files carry the UTC date of the events they hold, e.g.
//! `log-20240115.txt`, so one file accumulates per day. The embedded date is
//! also the token a retention sweep looks for before it will delete
//! anything.

use chrono::{DateTime, Utc};
use regex::Regex;

/// Naming scheme for per-day event files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNaming {
    prefix: String,
    extension: String,
}

impl Default for FileNaming {
    fn default() -> Self {
        Self::new("log", "txt")
    }
}

impl FileNaming {
    /// Create a scheme with a custom prefix and extension
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Leading component of generated names
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Extension of generated names, without the dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name for events stamped with `timestamp`
    pub fn file_name(&self, timestamp: DateTime<Utc>) -> String {
        format!(
            "{}-{}.{}",
            self.prefix,
            timestamp.format("%Y%m%d"),
            self.extension
        )
    }

    /// Anchored pattern matching exactly the names this scheme produces
    ///
    /// Suitable as the pattern of a retention rule scoped to this sink's own
    /// files.
    pub fn pattern(&self) -> Regex {
        let source = format!(
            r"^{}-\d{{8}}\.{}$",
            regex::escape(&self.prefix),
            regex::escape(&self.extension)
        );
        Regex::new(&source).expect("escaped literals form a valid pattern")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retention::has_date_token;
    use chrono::TimeZone;

    #[test]
    fn test_default_names_file_by_utc_date() {
        let naming = FileNaming::default();
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap();

        assert_eq!(naming.file_name(ts), "log-20240115.txt");
    }

    #[test]
    fn test_custom_prefix_and_extension() {
        let naming = FileNaming::new("audit", "log");
        let ts = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();

        assert_eq!(naming.prefix(), "audit");
        assert_eq!(naming.extension(), "log");
        assert_eq!(naming.file_name(ts), "audit-20260826.log");
    }

    #[test]
    fn test_generated_names_carry_a_date_token() {
        let naming = FileNaming::default();
        assert!(has_date_token(&naming.file_name(Utc::now())));
    }

    #[test]
    fn test_pattern_matches_generated_names() {
        let naming = FileNaming::default();
        let pattern = naming.pattern();

        assert!(pattern.is_match(&naming.file_name(Utc::now())));
        assert!(pattern.is_match("log-20200101.txt"));
    }

    #[test]
    fn test_pattern_rejects_foreign_names() {
        let pattern = FileNaming::default().pattern();

        assert!(!pattern.is_match("log-2024011.txt"));
        assert!(!pattern.is_match("audit-20240115.txt"));
        assert!(!pattern.is_match("log-20240115.txt.bak"));
        assert!(!pattern.is_match("log-20240115.bak"));
    }

    #[test]
    fn test_pattern_escapes_literal_dots() {
        let pattern = FileNaming::new("my.app", "txt").pattern();

        assert!(pattern.is_match("my.app-20240115.txt"));
        assert!(!pattern.is_match("myxapp-20240115.txt"));
    }
}
