//! Git types

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

/// Identity and timestamp exactly as stored in the commit object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignature {
    /// Name
    pub name: String,
    /// Email
    pub email: String,
    /// Seconds since the epoch
    pub seconds: i64,
    /// Offset from UTC in minutes
    pub offset_minutes: i32,
}

impl RawSignature {
    /// Create a new signature record
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        seconds: i64,
        offset_minutes: i32,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            seconds,
            offset_minutes,
        }
    }

    /// The timestamp with its original offset, if representable
    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        to_datetime(self.seconds, self.offset_minutes)
    }

    pub(crate) fn from_git(sig: &git2::Signature<'_>) -> Self {
        let when = sig.when();
        Self {
            name: String::from_utf8_lossy(sig.name_bytes()).into_owned(),
            email: String::from_utf8_lossy(sig.email_bytes()).into_owned(),
            seconds: when.seconds(),
            offset_minutes: when.offset_minutes(),
        }
    }
}

/// One commit as read from the log, before any message parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCommit {
    /// Full hex object id
    pub sha: String,
    /// Author identity
    pub author: RawSignature,
    /// Committer identity
    pub committer: RawSignature,
    /// Full message, verbatim
    pub message: String,
    /// Number of parents
    pub parent_count: usize,
    /// Nearest tag containing the commit, when requested
    pub tag: Option<TagInfo>,
}

/// Information about a git tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit the tag points to
    pub commit_hash: String,
    /// Tagger time for annotated tags, commit time otherwise
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl TagInfo {
    /// Create a new TagInfo
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_hash: commit_hash.into(),
            timestamp: None,
        }
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: Option<DateTime<FixedOffset>>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Convert a git time into a zoned timestamp
pub fn to_datetime(seconds: i64, offset_minutes: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
    offset.timestamp_opt(seconds, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_keeps_offset() {
        let sig = RawSignature::new("A", "a@example.com", 1_700_000_000, -300);
        let dt = sig.datetime().unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -300 * 60);
        assert_eq!(dt.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_datetime_rejects_bad_offset() {
        assert!(to_datetime(0, 24 * 60).is_none());
    }
}
