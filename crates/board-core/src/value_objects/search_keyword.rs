//! Full-text search keyword sanitizing

use crate::error::DomainError;

/// Longest keyword accepted, in characters
pub const MAX_KEYWORD_CHARS: usize = 100;

/// A keyword that is safe to hand to the text-search query parser.
///
/// Only ASCII word characters, whitespace and Hangul (compatibility jamo and
/// precomposed syllables) survive sanitizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKeyword(String);

impl SearchKeyword {
    /// Validate and sanitize a raw keyword.
    ///
    /// Returns `Ok(None)` when there is nothing to search for: the input is
    /// blank, or nothing is left after sanitizing.
    pub fn parse(raw: &str) -> Result<Option<Self>, DomainError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }

        if raw.chars().count() > MAX_KEYWORD_CHARS {
            return Err(DomainError::SearchKeywordTooLong {
                max: MAX_KEYWORD_CHARS,
            });
        }

        let sanitized: String = raw.chars().filter(|c| is_searchable(*c)).collect();
        let sanitized = sanitized.trim();

        if sanitized.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self(sanitized.to_string())))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SearchKeyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_searchable(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c.is_whitespace()
        // ㄱ-ㅎ
        || ('\u{3131}'..='\u{314E}').contains(&c)
        // ㅏ-ㅣ
        || ('\u{314F}'..='\u{3163}').contains(&c)
        // 가-힣
        || ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_none() {
        assert_eq!(SearchKeyword::parse("").unwrap(), None);
        assert_eq!(SearchKeyword::parse("   \t").unwrap(), None);
    }

    #[test]
    fn test_punctuation_only_is_none() {
        assert_eq!(SearchKeyword::parse("!@#$%^&*()").unwrap(), None);
        assert_eq!(SearchKeyword::parse(" ?! ").unwrap(), None);
    }

    #[test]
    fn test_strips_punctuation() {
        let kw = SearchKeyword::parse("  rust's <async> ").unwrap().unwrap();
        assert_eq!(kw.as_str(), "rusts async");
    }

    #[test]
    fn test_keeps_hangul() {
        let kw = SearchKeyword::parse("러스트 게시판! ㅋㅋ").unwrap().unwrap();
        assert_eq!(kw.as_str(), "러스트 게시판 ㅋㅋ");
    }

    #[test]
    fn test_too_long() {
        let raw = "a".repeat(MAX_KEYWORD_CHARS + 1);
        let err = SearchKeyword::parse(&raw).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_length_counts_characters() {
        let raw = "가".repeat(MAX_KEYWORD_CHARS);
        assert!(SearchKeyword::parse(&raw).unwrap().is_some());
    }
}
