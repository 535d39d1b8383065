//! Keyword heuristics that pick a node's fill category from its text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorCategory {
    StartEnd,
    Decision,
    Action,
    Negative,
}

const START_KEYWORDS: &[&str] = &["start", "begin", "receive"];
const END_KEYWORDS: &[&str] = &["end", "complete", "close"];
const NEGATIVE_KEYWORDS: &[&str] = &["reject", "fail", "decline", "no"];

/// Maps step text, or a choice outcome, to a color category.
///
/// Decision questions never go through a policy; the graph builder always
/// gives them [`ColorCategory::Decision`]. Implementations should therefore
/// only return `StartEnd`, `Negative` or `Action`.
pub trait ColorPolicy {
    fn classify(&self, text: &str) -> ColorCategory;
}

/// Case-insensitive substring matching. Any keyword occurring anywhere in
/// the text counts, so "known" matches "no" and is classed as negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordPolicy;

impl ColorPolicy for KeywordPolicy {
    fn classify(&self, text: &str) -> ColorCategory {
        let lower = text.to_lowercase();
        categorize(|keyword| lower.contains(keyword))
    }
}

/// Case-insensitive matching against whole words. Keywords shorter than four
/// characters must equal a word; longer ones may also prefix it, so
/// "rejection" still matches "reject" while "known" no longer matches "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeWordPolicy;

impl ColorPolicy for WholeWordPolicy {
    fn classify(&self, text: &str) -> ColorCategory {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        categorize(|keyword| {
            words.iter().any(|word| {
                if keyword.len() < 4 {
                    *word == keyword
                } else {
                    word.starts_with(keyword)
                }
            })
        })
    }
}

fn categorize(matches: impl Fn(&str) -> bool) -> ColorCategory {
    let any = |keywords: &[&str]| keywords.iter().any(|&k| matches(k));
    if any(START_KEYWORDS) || any(END_KEYWORDS) {
        ColorCategory::StartEnd
    } else if any(NEGATIVE_KEYWORDS) {
        ColorCategory::Negative
    } else {
        ColorCategory::Action
    }
}

/// Classify with the default substring heuristic.
pub fn classify(text: &str) -> ColorCategory {
    KeywordPolicy.classify(text)
}

/// Which built-in policy to use, as named in configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Matching {
    #[default]
    Substring,
    WholeWord,
}

impl Matching {
    pub fn policy(self) -> &'static dyn ColorPolicy {
        match self {
            Matching::Substring => &KeywordPolicy,
            Matching::WholeWord => &WholeWordPolicy,
        }
    }
}
