//! Validated newtypes for post fields.
//!
//! Construction validates and normalizes; a value that exists is valid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Maximum title length in characters, measured after trimming.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum title length in characters once HTML entities are expanded.
pub const MAX_ESCAPED_TITLE_LENGTH: usize = 255;

/// Maximum content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Maximum tag name length in characters.
pub const MAX_TAG_NAME_LENGTH: usize = 50;

const FORBIDDEN_TITLE_CHARS: [char; 9] = ['<', '>', '"', '\'', '\\', '/', '\n', '\r', '\t'];

/// Escape the five HTML-significant characters.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            other => out.push(other),
        }
    }
    out
}

// ============================================================================
// PostTitle
// ============================================================================

/// A post title, stored in its HTML-escaped form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct PostTitle(String);

impl PostTitle {
    /// Build a title from user input.
    ///
    /// # Errors
    ///
    /// Returns an Invalid error if the trimmed input is empty or longer than
    /// 200 characters, if the escaped form is longer than 255 characters, or
    /// if the escaped form still contains a forbidden character.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid("title must not be empty"));
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::invalid(format!(
                "title must be at most {MAX_TITLE_LENGTH} characters"
            )));
        }
        Self::from_escaped(escape_html(trimmed))
    }

    /// Rebuild a title that is already escaped, e.g. when loading a stored row.
    pub fn from_escaped(escaped: impl Into<String>) -> Result<Self, DomainError> {
        let escaped = escaped.into();
        if escaped.chars().count() > MAX_ESCAPED_TITLE_LENGTH {
            return Err(DomainError::invalid(format!(
                "escaped title must be at most {MAX_ESCAPED_TITLE_LENGTH} characters"
            )));
        }
        if escaped.contains(FORBIDDEN_TITLE_CHARS) {
            return Err(DomainError::invalid("title contains forbidden characters"));
        }
        Ok(Self(escaped))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PostTitle> for String {
    fn from(title: PostTitle) -> String {
        title.0
    }
}

// ============================================================================
// PostContent
// ============================================================================

/// Post body. Empty is allowed; no escaping is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostContent(String);

impl PostContent {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.chars().count() > MAX_CONTENT_LENGTH {
            return Err(DomainError::invalid(format!(
                "content must be at most {MAX_CONTENT_LENGTH} characters"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PostContent {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PostContent> for String {
    fn from(content: PostContent) -> String {
        content.0
    }
}

// ============================================================================
// TagName
// ============================================================================

/// A normalized tag name: trimmed, lowercased, letters/digits/`-`/`_` only.
///
/// Letters and digits are Unicode-aware, so names in non-Latin scripts are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::invalid("tag name must not be empty"));
        }
        if normalized.chars().count() > MAX_TAG_NAME_LENGTH {
            return Err(DomainError::invalid(format!(
                "tag name must be at most {MAX_TAG_NAME_LENGTH} characters"
            )));
        }
        if !normalized
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(DomainError::invalid(format!(
                "tag name {normalized:?} may only contain letters, digits, '-' and '_'"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TagName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TagName> for String {
    fn from(name: TagName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed_and_escaped() {
        let title = PostTitle::new("  <b>hi</b>  ");
        // '/' survives escaping and is forbidden
        assert!(title.is_err());

        let title = PostTitle::new("Tom & \"Jerry\"").unwrap();
        assert_eq!(title.as_str(), "Tom &amp; &#34;Jerry&#34;");
    }

    #[test]
    fn test_title_markup_never_survives_raw() {
        let title = PostTitle::new("<b>hi<b>").unwrap();
        for ch in ['<', '>', '"', '\'', '\\'] {
            assert!(!title.as_str().contains(ch));
        }
        assert_eq!(title.as_str(), "&lt;b&gt;hi&lt;b&gt;");
    }

    #[test]
    fn test_title_length_limits_are_distinct() {
        assert!(PostTitle::new("a".repeat(200)).is_ok());

        let too_long = PostTitle::new("a".repeat(201)).unwrap_err();
        assert!(too_long.message().contains("200"));

        // 60 raw characters, 300 once escaped
        let escaped_too_long = PostTitle::new("&".repeat(60)).unwrap_err();
        assert!(escaped_too_long.message().contains("255"));
        assert_ne!(too_long.message(), escaped_too_long.message());
    }

    #[test]
    fn test_title_rejects_forbidden_characters() {
        for raw in ["a/b", "a\\b", "line\nbreak", "tab\there"] {
            let err = PostTitle::new(raw).unwrap_err();
            assert!(err.is_invalid(), "{raw:?}");
        }
    }

    #[test]
    fn test_title_must_not_be_blank() {
        for raw in ["", "   ", "\t\n"] {
            let err = PostTitle::new(raw).unwrap_err();
            assert_eq!(err.message(), "title must not be empty", "{raw:?}");
        }
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        assert!(PostTitle::new("あ".repeat(200)).is_ok());
    }

    #[test]
    fn test_from_escaped_does_not_double_escape() {
        let title = PostTitle::from_escaped("Tom &amp; Jerry").unwrap();
        assert_eq!(title.as_str(), "Tom &amp; Jerry");
        assert!(PostTitle::from_escaped("<script>").is_err());
    }

    #[test]
    fn test_content_bound() {
        assert!(PostContent::new("").is_ok());
        assert!(PostContent::new("x".repeat(10_000)).is_ok());
        assert!(PostContent::new("x".repeat(10_001)).is_err());
    }

    #[test]
    fn test_content_is_not_escaped() {
        let content = PostContent::new("<p>body</p>").unwrap();
        assert_eq!(content.as_str(), "<p>body</p>");
    }

    #[test]
    fn test_tag_name_normalization() {
        assert_eq!(TagName::new("  Rust_Lang ").unwrap().as_str(), "rust_lang");
        assert_eq!(TagName::new("web-dev").unwrap().as_str(), "web-dev");
        assert_eq!(TagName::new("日本語").unwrap().as_str(), "日本語");
    }

    #[test]
    fn test_tag_name_rejections() {
        assert!(TagName::new("   ").is_err());
        assert!(TagName::new("a".repeat(51)).is_err());
        assert!(TagName::new("a".repeat(50)).is_ok());
        assert!(TagName::new("c++").is_err());
        assert!(TagName::new("two words").is_err());
    }

    #[test]
    fn test_tag_name_deserializes_through_validation() {
        let name: TagName = serde_json::from_str("\"GoLang\"").unwrap();
        assert_eq!(name.as_str(), "golang");
        assert!(serde_json::from_str::<TagName>("\"bad tag\"").is_err());
    }
}
