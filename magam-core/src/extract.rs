//! Field extraction from free-form assignment text.
//!
//! Each field has a fixed, ordered pattern list; the first capture wins and
//! an exhausted list leaves the field `Unknown`. Extraction is total: any
//! input produces a result, there is no failure path past construction.

use anyhow::Result;
use regex::Regex;
use std::fmt;

/// Sentinel shown wherever a field had no match.
pub const UNKNOWN: &str = "알 수 없음";

/// A single extracted field; the no-match case is first-class rather than a
/// magic string, and renders as the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Found(String),
    Unknown,
}

impl FieldValue {
    pub fn found(&self) -> Option<&str> {
        match self {
            FieldValue::Found(s) => Some(s),
            FieldValue::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, FieldValue::Unknown)
    }

    /// The field text, sentinel included.
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Found(s) => s,
            FieldValue::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one extraction pass. Immutable once produced: either accepted
/// into an `AssignmentRecord` or discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub title: FieldValue,
    pub deadline: FieldValue,
    pub points: FieldValue,
    pub location: FieldValue,
}

impl Extraction {
    /// Acceptance gate: anything at all recognizable in the text?
    pub fn has_any_match(&self) -> bool {
        !self.title.is_unknown() || !self.deadline.is_unknown()
    }
}

/// Title: labeled forms first (the value ends at a newline or at a following
/// 마감/제출/배점/점수 keyword; a label with neither does not match), then a
/// bracketed span, then leading text before the word 과제/assignment/homework.
const TITLE_PATTERNS: &[&str] = &[
    r"과제\s*[:：]\s*(.+?)(?:\n|마감|제출|배점|점수)",
    r"제목\s*[:：]\s*(.+?)(?:\n|마감|제출|배점|점수)",
    r"주제\s*[:：]\s*(.+?)(?:\n|마감|제출|배점|점수)",
    r"[\[<【](.+?)[\]>】]",
    r"(?i)^(.+?)(?:과제|assignment|homework)",
];

/// Deadline: labeled full dates, a "…까지" full date, then bare date forms.
/// Labels precede the bare fallbacks so a labeled deadline beats a stray
/// date earlier in the text. The captured value is the raw date substring;
/// normalization happens in `dates::parse_deadline_date`.
const DEADLINE_PATTERNS: &[&str] = &[
    r"마감일?\s*[:：]\s*(\d{4}[-/년]\s*\d{1,2}[-/월]\s*\d{1,2}일?)",
    r"제출일?\s*[:：]\s*(\d{4}[-/년]\s*\d{1,2}[-/월]\s*\d{1,2}일?)",
    r"기한\s*[:：]\s*(\d{4}[-/년]\s*\d{1,2}[-/월]\s*\d{1,2}일?)",
    r"(\d{4}[-/년]\s*\d{1,2}[-/월]\s*\d{1,2}일?)까지",
    r"(\d{1,2}/\d{1,2}/?\d{0,4})",
    r"(\d{1,2}월\s*\d{1,2}일)",
    r"(\d{4}-\d{1,2}-\d{1,2})",
];

/// Points: labeled, "N점 만점", then a bare "N점". The stored value is the
/// captured digits with 점 re-appended.
const POINTS_PATTERNS: &[&str] = &[
    r"배점\s*[:：]\s*(\d+)\s*점",
    r"점수\s*[:：]\s*(\d+)\s*점",
    r"(\d+)\s*점\s*만점",
    r"(\d+)\s*점",
];

/// Location: labeled rest-of-line forms, an email address, then a bare
/// 온라인/사이버/웹 keyword as a hint.
const LOCATION_PATTERNS: &[&str] = &[
    r"제출\s*장소\s*[:：]\s*([^\n]+)",
    r"제출\s*방법\s*[:：]\s*([^\n]+)",
    r"제출\s*[:：]\s*([^\n]+)",
    r"장소\s*[:：]\s*([^\n]+)",
    r"(?i)(?:이메일|email)\s*[:：]\s*(\S+@\S+)",
    r"(온라인|사이버|웹)",
];

/// Compiled pattern lists for the four fields.
pub struct Extractor {
    title: Vec<Regex>,
    deadline: Vec<Regex>,
    points: Vec<Regex>,
    location: Vec<Regex>,
}

impl Extractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: compile(TITLE_PATTERNS)?,
            deadline: compile(DEADLINE_PATTERNS)?,
            points: compile(POINTS_PATTERNS)?,
            location: compile(LOCATION_PATTERNS)?,
        })
    }

    /// Run all four pattern lists over `text`. Total: the empty string and
    /// pattern-free text both come back with every field `Unknown`.
    pub fn extract(&self, text: &str) -> Extraction {
        Extraction {
            title: first_capture(&self.title, text),
            deadline: first_capture(&self.deadline, text),
            points: self.extract_points(text),
            location: first_capture(&self.location, text),
        }
    }

    fn extract_points(&self, text: &str) -> FieldValue {
        for pattern in &self.points {
            if let Some(m) = pattern.captures(text).and_then(|c| c.get(1)) {
                return FieldValue::Found(format!("{}점", m.as_str()));
            }
        }
        FieldValue::Unknown
    }
}

/// One-shot convenience: compile and run in a single call.
pub fn extract_assignment_info(text: &str) -> Result<Extraction> {
    Ok(Extractor::new()?.extract(text))
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(anyhow::Error::from))
        .collect()
}

fn first_capture(patterns: &[Regex], text: &str) -> FieldValue {
    for pattern in patterns {
        if let Some(m) = pattern.captures(text).and_then(|c| c.get(1)) {
            let value = m.as_str().trim();
            if !value.is_empty() {
                return FieldValue::Found(value.to_string());
            }
        }
    }
    FieldValue::Unknown
}
