use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Private,
    Deleted,
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        PostStatus::Draft,
        PostStatus::Published,
        PostStatus::Private,
        PostStatus::Deleted,
    ];

    /// Parse one of the four literal status strings. Case-sensitive.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "private" => Ok(Self::Private),
            "deleted" => Ok(Self::Deleted),
            _ => Err(DomainError::invalid(format!("invalid post status: {raw:?}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Private => "private",
            Self::Deleted => "deleted",
        }
    }

    /// Check whether a post may move from `self` to `target`.
    ///
    /// Same-state requests are not handled here; the aggregate treats them as
    /// no-ops before consulting this table.
    pub(crate) fn check_transition(self, target: PostStatus) -> Result<(), DomainError> {
        use PostStatus::*;

        let allowed = match target {
            Draft => self == Draft,
            Published => matches!(self, Draft | Private),
            Private => self == Published,
            Deleted => matches!(self, Draft | Private),
        };
        if allowed {
            return Ok(());
        }

        let message = match target {
            Draft => "only draft posts can be drafted".to_string(),
            Published => "only draft and private posts can be published".to_string(),
            Private => "only published posts can be made private".to_string(),
            Deleted => "only draft and private posts can be deleted".to_string(),
        };
        tracing::debug!(from = %self, to = %target, "status transition rejected");
        Err(DomainError::invalid(message))
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact() {
        for status in PostStatus::ALL {
            assert_eq!(PostStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(PostStatus::parse("Draft").is_err());
        assert!(PostStatus::parse(" draft").is_err());
        assert!(PostStatus::parse("archived").is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_literals() {
        let json = serde_json::to_string(&PostStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
        let parsed: PostStatus = serde_json::from_str("\"private\"").unwrap();
        assert_eq!(parsed, PostStatus::Private);
    }
}
