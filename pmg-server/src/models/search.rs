//! Search input and output types

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use super::ValidationError;
use crate::serializer::api_date;

/// Maximum length of a search phrase
const MAX_SEARCH_LEN: usize = 256;

/// Searchable content types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    CommitteeMeeting,
    Bill,
    Member,
    Hansard,
    Briefing,
    #[serde(rename = "question_reply")]
    QuestionReply,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        Self::CommitteeMeeting,
        Self::Bill,
        Self::Member,
        Self::Hansard,
        Self::Briefing,
        Self::QuestionReply,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommitteeMeeting => "committee-meeting",
            Self::Bill => "bill",
            Self::Member => "member",
            Self::Hansard => "hansard",
            Self::Briefing => "briefing",
            Self::QuestionReply => "question_reply",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "type",
                value: s.to_owned(),
            })
    }
}

/// Validated full-text search phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "q" });
        }
        if s.chars().count() > MAX_SEARCH_LEN {
            return Err(ValidationError::TooLong {
                field: "q",
                max: MAX_SEARCH_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One search hit
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: i32,
    pub content_type: String,
    pub title: Option<String>,
    #[serde(serialize_with = "api_date::option::serialize")]
    pub date: Option<NaiveDate>,
    pub highlight: Option<String>,
    pub score: f64,
}

/// The `hits` block of a search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchHits {
    pub total: i64,
    pub max_score: Option<f64>,
    pub hits: Vec<SearchHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_types() {
        assert_eq!("committee-meeting".parse::<ContentType>().unwrap(), ContentType::CommitteeMeeting);
        assert_eq!("question_reply".parse::<ContentType>().unwrap(), ContentType::QuestionReply);
        assert!("gazette".parse::<ContentType>().is_err());
    }

    #[test]
    fn content_type_serializes_like_its_name() {
        for t in ContentType::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), t.as_str());
        }
    }

    #[test]
    fn search_term_is_trimmed_and_bounded() {
        assert_eq!(SearchTerm::new("  water  ").unwrap().as_str(), "water");
        assert!(matches!(SearchTerm::new("   "), Err(ValidationError::Empty { .. })));
        assert!(matches!(
            SearchTerm::new(&"x".repeat(300)),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
