//! # Sleep Quality Heuristic
//! Maps a free-text description of a night's sleep onto the integer quality
//! scale the classifier was fit on.
//!
//! Matching is a lower-cased, unanchored substring check against an ordered
//! keyword table. The first category with any hit wins, so "restful but anxiety"
//! scores as restorative. Unanchored matching is intentional: "goodbye" hits
//! `good`, "nightmares" hits `nightmare`. "nightmarish" does not
//! (the trailing `e` is missing) and falls through to the default.
//!
//! No I/O, no state: the same text always yields the same score.

use serde::Serialize;

/// Score used when no keyword matches (including the empty string).
pub const DEFAULT_QUALITY_SCORE: u8 = 6;

/// Keyword buckets, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCategory {
    Restorative,
    Adequate,
    Fragmented,
    Distressed,
}

impl QualityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restorative => "restorative",
            Self::Adequate => "adequate",
            Self::Fragmented => "fragmented",
            Self::Distressed => "distressed",
        }
    }
}

/// One row of the heuristic: any keyword hit maps the text to `score`.
#[derive(Debug)]
pub struct QualityRule {
    pub category: QualityCategory,
    pub keywords: &'static [&'static str],
    pub score: u8,
}

/// Evaluated top to bottom; order is part of the contract.
pub const QUALITY_TABLE: [QualityRule; 4] = [
    QualityRule {
        category: QualityCategory::Restorative,
        keywords: &["excellent", "peaceful", "deep", "restful"],
        score: 9,
    },
    QualityRule {
        category: QualityCategory::Adequate,
        keywords: &["good", "fine", "okay"],
        score: 7,
    },
    QualityRule {
        category: QualityCategory::Fragmented,
        keywords: &["waking", "disturbed", "light sleep", "restless"],
        score: 5,
    },
    QualityRule {
        category: QualityCategory::Distressed,
        keywords: &["insomnia", "no sleep", "nightmare", "anxiety", "stress"],
        score: 3,
    },
];

/// Which rule fired for a given text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityMatch {
    pub category: QualityCategory,
    pub keyword: &'static str,
    pub score: u8,
}

/// Find the first matching rule. `None` means the default score applies.
pub fn explain(text: &str) -> Option<QualityMatch> {
    let text = text.to_lowercase();

    QUALITY_TABLE.iter().find_map(|rule| {
        rule.keywords
            .iter()
            .find(|kw| text.contains(*kw))
            .map(|kw| QualityMatch {
                category: rule.category,
                keyword: *kw,
                score: rule.score,
            })
    })
}

/// Derive the sleep quality score from a free-text description.
/// Total: always returns one of {9, 7, 5, 3, 6}.
pub fn quality_from_text(text: &str) -> u8 {
    explain(text)
        .map(|m| m.score)
        .unwrap_or(DEFAULT_QUALITY_SCORE)
}
